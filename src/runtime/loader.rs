//! Loading the real module and resolving its function table

use std::ffi::CString;
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};

use tracing::{debug, info};

use crate::config::LIBRARY_PATH_VAR;
use crate::ffi::{self, CK_FUNCTION_LIST, CK_FUNCTION_LIST_PTR, CKR_OK, GetFunctionListFn, Library};
use crate::proxy;
use crate::runtime::{ConfigError, Result};

/// The real module: its function table and the library that backs it
pub struct LoadedModule {
	library: Option<Library>,
	functions: CK_FUNCTION_LIST,
}

impl fmt::Debug for LoadedModule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LoadedModule")
			.field("library", &self.library)
			.field("version", &(self.functions.version.major, self.functions.version.minor))
			.finish_non_exhaustive()
	}
}

impl LoadedModule {
	/// Wrap a table whose functions live in the current process image
	#[must_use]
	pub const fn from_function_list(functions: CK_FUNCTION_LIST) -> Self {
		Self {
			library: None,
			functions,
		}
	}

	/// The real function table
	#[must_use]
	pub const fn functions(&self) -> &CK_FUNCTION_LIST {
		&self.functions
	}

	/// Whether the module is backed by a dynamically loaded library
	#[must_use]
	pub const fn is_dynamic(&self) -> bool {
		self.library.is_some()
	}
}

/// Something that can produce the real module from its configured path
pub trait ModuleLoader {
	fn load(&self, path: &str) -> Result<LoadedModule>;
}

/// Loads the module with the platform dynamic loader
#[derive(Debug, Default, Clone, Copy)]
pub struct DlLoader;

impl ModuleLoader for DlLoader {
	fn load(&self, path: &str) -> Result<LoadedModule> {
		let c_path = CString::new(path).map_err(|_| ConfigError::InvalidPath(LIBRARY_PATH_VAR))?;
		let library = Library::open(&c_path).map_err(|reason| ConfigError::LoadFailed {
			path: path.to_owned(),
			reason,
		})?;

		let mut functions = match library.symbol("C_GetFunctionList") {
			Some(symbol) => unsafe { fetch_function_list(symbol)? },
			None => {
				debug!("{} does not export C_GetFunctionList, resolving symbols individually", path);
				ffi::empty_function_list()
			},
		};
		proxy::resolve_symbols(&mut functions, &library);

		info!(
			"Loaded {} (Cryptoki {}.{})",
			path, functions.version.major, functions.version.minor
		);
		Ok(LoadedModule {
			library: Some(library),
			functions,
		})
	}
}

/// Call the module's `C_GetFunctionList` and copy the table it hands out
unsafe fn fetch_function_list(symbol: NonNull<std::ffi::c_void>) -> Result<CK_FUNCTION_LIST> {
	let get_function_list: GetFunctionListFn = unsafe { mem::transmute(symbol.as_ptr()) };
	let mut list: CK_FUNCTION_LIST_PTR = ptr::null_mut();
	let rv = unsafe { get_function_list(&mut list) };
	if rv != CKR_OK {
		return Err(ConfigError::GetFunctionListFailed(rv));
	}
	if list.is_null() {
		return Err(ConfigError::MissingFunctionList);
	}
	Ok(unsafe { ptr::read(list) })
}
