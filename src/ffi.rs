//! Raw PKCS#11 and platform bindings
//!
//! The Cryptoki ABI types come from `pkcs11-sys`. The status codes and flag
//! bits the proxy itself branches on are defined here so that the rest of the
//! crate does not depend on how the bindings type their constants.

use std::ffi::{CStr, CString, c_void};
use std::ptr::NonNull;

use tracing::debug;

pub use pkcs11_sys::{
	CK_ATTRIBUTE, CK_ATTRIBUTE_PTR, CK_BBOOL, CK_BYTE_PTR, CK_C_INITIALIZE_ARGS, CK_FLAGS,
	CK_FUNCTION_LIST, CK_FUNCTION_LIST_PTR, CK_FUNCTION_LIST_PTR_PTR, CK_INFO, CK_INFO_PTR,
	CK_MECHANISM, CK_MECHANISM_INFO, CK_MECHANISM_INFO_PTR, CK_MECHANISM_PTR, CK_MECHANISM_TYPE,
	CK_MECHANISM_TYPE_PTR, CK_NOTIFY, CK_OBJECT_HANDLE, CK_OBJECT_HANDLE_PTR, CK_RV,
	CK_SESSION_HANDLE, CK_SESSION_HANDLE_PTR, CK_SESSION_INFO, CK_SESSION_INFO_PTR, CK_SLOT_ID,
	CK_SLOT_ID_PTR, CK_SLOT_INFO, CK_SLOT_INFO_PTR, CK_TOKEN_INFO, CK_TOKEN_INFO_PTR, CK_ULONG,
	CK_ULONG_PTR, CK_USER_TYPE, CK_UTF8CHAR_PTR, CK_VERSION, CK_VOID_PTR,
};

pub const CKR_OK: CK_RV = 0x0000_0000;
pub const CKR_GENERAL_ERROR: CK_RV = 0x0000_0005;
pub const CKR_ARGUMENTS_BAD: CK_RV = 0x0000_0007;
pub const CKR_ATTRIBUTE_SENSITIVE: CK_RV = 0x0000_0011;
pub const CKR_ATTRIBUTE_TYPE_INVALID: CK_RV = 0x0000_0012;
pub const CKR_BUFFER_TOO_SMALL: CK_RV = 0x0000_0150;

pub const CK_UNAVAILABLE_INFORMATION: CK_ULONG = !0;
pub const CKF_ARRAY_ATTRIBUTE: CK_ULONG = 0x4000_0000;

/// Interface version reported when the real module does not state one
pub const CRYPTOKI_VERSION: CK_VERSION = CK_VERSION { major: 2, minor: 40 };

/// Signature of the `C_GetFunctionList` symbol exported by every module
pub type GetFunctionListFn = unsafe extern "C" fn(CK_FUNCTION_LIST_PTR_PTR) -> CK_RV;

/// Identifier of the calling process
#[must_use]
pub fn process_id() -> u32 {
	nix::unistd::getpid().as_raw() as u32
}

/// Identifier of the calling thread, as reported by `pthread_self`
#[must_use]
pub fn thread_id() -> u64 {
	unsafe { libc::pthread_self() as usize as u64 }
}

/// Owned handle to a dynamically loaded library
///
/// The handle is closed when dropped.
#[derive(Debug)]
pub struct Library {
	handle: NonNull<c_void>,
}

// SAFETY: a dlopen handle is a process-global token. dlsym and dlclose are
// thread-safe, and the handle is never mutated after it is obtained.
unsafe impl Send for Library {}
unsafe impl Sync for Library {}

impl Library {
	/// Load a library with `RTLD_NOW | RTLD_LOCAL`
	///
	/// On failure the text reported by `dlerror` is returned.
	pub fn open(path: &CStr) -> Result<Self, String> {
		unsafe {
			libc::dlerror();
			let handle = libc::dlopen(path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL);
			match NonNull::new(handle) {
				Some(handle) => Ok(Self { handle }),
				None => Err(last_dl_error().unwrap_or_else(|| "unknown dlopen error".to_string())),
			}
		}
	}

	/// Resolve a symbol by name, `None` if the library does not export it
	pub fn symbol(&self, name: &str) -> Option<NonNull<c_void>> {
		let name = CString::new(name).ok()?;
		let address = unsafe { libc::dlsym(self.handle.as_ptr(), name.as_ptr()) };
		if address.is_null() {
			debug!("Symbol {:?} not exported: {:?}", name, last_dl_error());
		}
		NonNull::new(address)
	}
}

impl Drop for Library {
	fn drop(&mut self) {
		unsafe {
			if libc::dlclose(self.handle.as_ptr()) != 0 {
				debug!("dlclose failed: {:?}", last_dl_error());
			}
		}
	}
}

fn last_dl_error() -> Option<String> {
	let error = unsafe { libc::dlerror() };
	if error.is_null() {
		None
	} else {
		Some(unsafe { CStr::from_ptr(error) }.to_string_lossy().into_owned())
	}
}

/// A function list with every slot empty
#[must_use]
pub fn empty_function_list() -> CK_FUNCTION_LIST {
	// SAFETY: the list holds only a version and nullable function pointers,
	// for which all-zero bytes are a valid `None`.
	unsafe { std::mem::zeroed() }
}
