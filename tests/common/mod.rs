//! A fake PKCS#11 module made of Rust functions
#![allow(dead_code, non_snake_case)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use pkcs11_logger::ffi::{
	self, CK_ATTRIBUTE_PTR, CK_BBOOL, CK_FUNCTION_LIST, CK_INFO, CK_INFO_PTR, CK_OBJECT_HANDLE, CK_RV,
	CK_SESSION_HANDLE, CK_SLOT_ID_PTR, CK_ULONG, CK_ULONG_PTR, CK_USER_TYPE, CK_UTF8CHAR_PTR, CK_VERSION,
	CK_VOID_PTR, CKR_ATTRIBUTE_SENSITIVE, CKR_BUFFER_TOO_SMALL, CKR_OK, CK_UNAVAILABLE_INFORMATION,
};
use pkcs11_logger::{ConfigError, LoadedModule, ModuleLoader};

pub const CKR_PIN_INCORRECT: CK_RV = 0xA0;
pub const CKA_LABEL: CK_ULONG = 0x03;
pub const CKA_VALUE: CK_ULONG = 0x11;

pub const USER_PIN: &[u8] = b"123456";
pub const LABEL: &[u8] = b"token";
pub const SLOTS: [CK_ULONG; 2] = [1, 7];

pub fn padded<const N: usize>(text: &[u8]) -> [u8; N] {
	let mut out = [b' '; N];
	out[..text.len()].copy_from_slice(text);
	out
}

unsafe extern "C" fn initialize(_init_args: CK_VOID_PTR) -> CK_RV {
	CKR_OK
}

unsafe extern "C" fn finalize(_reserved: CK_VOID_PTR) -> CK_RV {
	CKR_OK
}

unsafe extern "C" fn get_info(info: CK_INFO_PTR) -> CK_RV {
	unsafe {
		*info = CK_INFO {
			cryptokiVersion: CK_VERSION { major: 2, minor: 40 },
			manufacturerID: padded(b"Fake Manufacturer"),
			flags: 0,
			libraryDescription: padded(b"Fake Module"),
			libraryVersion: CK_VERSION { major: 1, minor: 2 },
		};
	}
	CKR_OK
}

unsafe extern "C" fn get_slot_list(_token_present: CK_BBOOL, slots: CK_SLOT_ID_PTR, count: CK_ULONG_PTR) -> CK_RV {
	unsafe {
		if slots.is_null() {
			*count = SLOTS.len() as CK_ULONG;
			return CKR_OK;
		}
		if (*count as usize) < SLOTS.len() {
			*count = SLOTS.len() as CK_ULONG;
			return CKR_BUFFER_TOO_SMALL;
		}
		for (i, slot) in SLOTS.iter().enumerate() {
			*slots.add(i) = *slot;
		}
		*count = SLOTS.len() as CK_ULONG;
	}
	CKR_OK
}

unsafe extern "C" fn login(_session: CK_SESSION_HANDLE, _user: CK_USER_TYPE, pin: CK_UTF8CHAR_PTR, len: CK_ULONG) -> CK_RV {
	let pin = unsafe { std::slice::from_raw_parts(pin, len as usize) };
	if pin == USER_PIN { CKR_OK } else { CKR_PIN_INCORRECT }
}

unsafe extern "C" fn get_attribute_value(
	_session: CK_SESSION_HANDLE,
	_object: CK_OBJECT_HANDLE,
	template: CK_ATTRIBUTE_PTR,
	count: CK_ULONG,
) -> CK_RV {
	let mut rv = CKR_OK;
	for i in 0..count as usize {
		let attribute = unsafe { &mut *template.add(i) };
		match attribute.type_ {
			CKA_LABEL => {
				if !attribute.pValue.is_null() {
					unsafe { std::ptr::copy_nonoverlapping(LABEL.as_ptr(), attribute.pValue.cast::<u8>(), LABEL.len()) };
				}
				attribute.ulValueLen = LABEL.len() as CK_ULONG;
			},
			_ => {
				attribute.ulValueLen = CK_UNAVAILABLE_INFORMATION;
				rv = CKR_ATTRIBUTE_SENSITIVE;
			},
		}
	}
	rv
}

/// The fake module's table; slots it does not implement stay empty
pub fn function_list() -> CK_FUNCTION_LIST {
	let mut list = ffi::empty_function_list();
	list.version = CK_VERSION { major: 2, minor: 40 };
	list.C_Initialize = Some(initialize);
	list.C_Finalize = Some(finalize);
	list.C_GetInfo = Some(get_info);
	list.C_GetSlotList = Some(get_slot_list);
	list.C_Login = Some(login);
	list.C_GetAttributeValue = Some(get_attribute_value);
	list
}

/// Hands out the fake module and counts how often it was asked to
#[derive(Debug, Default)]
pub struct FakeLoader {
	pub loads: AtomicUsize,
}

impl FakeLoader {
	pub fn loads(&self) -> usize {
		self.loads.load(Ordering::SeqCst)
	}
}

impl ModuleLoader for FakeLoader {
	fn load(&self, _path: &str) -> Result<LoadedModule, ConfigError> {
		self.loads.fetch_add(1, Ordering::SeqCst);
		Ok(LoadedModule::from_function_list(function_list()))
	}
}

/// A variable lookup over a fixed set of values
pub fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
	let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
	move |name| vars.get(name).cloned()
}
