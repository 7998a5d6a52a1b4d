//! A process whose configuration is unusable fails every call

mod common;

use std::ptr;

use common::{FakeLoader, lookup};
use pkcs11_logger::config::LIBRARY_PATH_VAR;
use pkcs11_logger::ffi::{CK_FUNCTION_LIST_PTR, CK_ULONG, CKR_GENERAL_ERROR};
use pkcs11_logger::proxy::{C_Finalize, C_GetFunctionList, C_GetSlotList, C_Initialize, C_Login};
use pkcs11_logger::{ConfigError, runtime};

#[test]
fn every_entry_point_reports_general_error() {
	let loader = FakeLoader::default();
	let outcome = runtime::init_with(lookup(&[]), &loader);
	assert!(matches!(outcome, Err(ConfigError::MissingVariable(LIBRARY_PATH_VAR))), "{outcome:?}");

	let mut list: CK_FUNCTION_LIST_PTR = ptr::null_mut();
	let mut count: CK_ULONG = 0;
	let pin = *b"123456";
	unsafe {
		assert_eq!(C_GetFunctionList(&mut list), CKR_GENERAL_ERROR);
		assert_eq!(C_Initialize(ptr::null_mut()), CKR_GENERAL_ERROR);
		assert_eq!(C_GetSlotList(0, ptr::null_mut(), &mut count), CKR_GENERAL_ERROR);
		assert_eq!(C_Login(1, 1, pin.as_ptr().cast_mut(), 6), CKR_GENERAL_ERROR);
		assert_eq!(C_Finalize(ptr::null_mut()), CKR_GENERAL_ERROR);
	}
	assert!(list.is_null());
	assert_eq!(count, 0);

	// The failed attempt is final
	let retry = runtime::init_with(lookup(&[(LIBRARY_PATH_VAR, "/fake/module.so")]), &loader);
	assert!(retry.is_err());
	assert_eq!(loader.loads(), 0);
}
