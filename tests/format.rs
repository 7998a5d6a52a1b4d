mod common;

use std::collections::HashSet;
use std::ffi::c_void;
use std::ptr;

use pkcs11_logger::Phase;
use pkcs11_logger::ffi::{
	CK_ATTRIBUTE, CK_INFO, CK_MECHANISM, CK_NOTIFY, CK_RV, CK_ULONG, CK_UNAVAILABLE_INFORMATION, CK_VERSION,
	CKR_ATTRIBUTE_SENSITIVE, CKR_BUFFER_TOO_SMALL, CKR_OK,
};
use pkcs11_logger::format::{ArgValue, FunctionDescriptor, REDACTED, UNREADABLE, format_arguments, format_rv, registry};

fn call(descriptor: &FunctionDescriptor, args: &[ArgValue], reveal: bool) -> String {
	unsafe { format_arguments(descriptor, Phase::Call, args, CKR_OK, reveal) }
}

fn ret(descriptor: &FunctionDescriptor, args: &[ArgValue], rv: CK_RV) -> String {
	unsafe { format_arguments(descriptor, Phase::Return, args, rv, false) }
}

fn null() -> ArgValue {
	ArgValue::from(ptr::null::<c_void>())
}

fn attribute(kind: CK_ULONG, value: &[u8]) -> CK_ATTRIBUTE {
	CK_ATTRIBUTE {
		type_: kind,
		pValue: value.as_ptr().cast_mut().cast(),
		ulValueLen: value.len() as CK_ULONG,
	}
}

fn login_args(pin: &[u8]) -> Vec<ArgValue> {
	vec![
		ArgValue::from(1 as CK_ULONG),
		ArgValue::from(1 as CK_ULONG),
		ArgValue::from(pin.as_ptr()),
		ArgValue::from(pin.len() as CK_ULONG),
	]
}

#[test]
fn pin_is_redacted_by_default() {
	let body = call(&registry::C_Login, &login_args(b"123456"), false);

	assert!(body.starts_with("hSession: 1, userType: 1 (CKU_USER), pPin: 0x"), "{body}");
	assert!(body.contains(&format!("*pPin: {REDACTED}")), "{body}");
	assert!(body.ends_with(", ulPinLen: 6"), "{body}");
	assert!(!body.contains("123456"));
}

#[test]
fn pin_is_shown_when_enabled() {
	let body = call(&registry::C_Login, &login_args(b"123456"), true);

	assert!(body.contains("*pPin: 123456"), "{body}");
	assert!(!body.contains(REDACTED));
}

#[test]
fn revealed_pin_stays_on_one_line() {
	let pin = b"12\n0x00000001 : 0x0000000000000001 : C_Forged : call\0zz";
	let body = call(&registry::C_Login, &login_args(pin), true);

	assert!(!body.contains('\n') && !body.contains('\0'), "{body:?}");
	assert!(
		body.contains(r"*pPin: 12\n0x00000001 : 0x0000000000000001 : C_Forged : call, ulPinLen: 55"),
		"{body}"
	);
	assert!(!body.contains("zz"), "{body}");
}

#[test]
fn text_fields_escape_control_characters() {
	let pin = b"0000";
	let label = common::padded::<32>(b"evil\r\nline\0rest");
	let args = [
		ArgValue::from(0 as CK_ULONG),
		ArgValue::from(pin.as_ptr()),
		ArgValue::from(pin.len() as CK_ULONG),
		ArgValue::from(label.as_ptr()),
	];
	let body = call(&registry::C_InitToken, &args, false);
	assert!(body.ends_with(r"*pLabel: evil\r\nline"), "{body}");

	let info = CK_INFO {
		cryptokiVersion: CK_VERSION { major: 2, minor: 40 },
		manufacturerID: common::padded(b"Acme\nCorp\t"),
		flags: 0,
		libraryDescription: common::padded(b"Module"),
		libraryVersion: CK_VERSION { major: 1, minor: 0 },
	};
	let body = ret(&registry::C_GetInfo, &[ArgValue::from(&raw const info)], CKR_OK);
	assert!(body.contains(r"manufacturerID: Acme\nCorp\t"), "{body}");
	assert!(!body.contains('\n') && !body.contains('\t'), "{body:?}");
}

#[test]
fn both_pins_of_set_pin_are_redacted() {
	let old = b"1111";
	let new = b"2222";
	let args = [
		ArgValue::from(3 as CK_ULONG),
		ArgValue::from(old.as_ptr()),
		ArgValue::from(old.len() as CK_ULONG),
		ArgValue::from(new.as_ptr()),
		ArgValue::from(new.len() as CK_ULONG),
	];
	let body = call(&registry::C_SetPIN, &args, false);

	assert!(body.contains(&format!("*pOldPin: {REDACTED}")));
	assert!(body.contains(&format!("*pNewPin: {REDACTED}")));
	assert!(!body.contains("1111") && !body.contains("2222"));
}

#[test]
fn return_line_starts_with_status() {
	let body = ret(&registry::C_Login, &login_args(b"123456"), 0xA0);

	assert!(body.starts_with("rv: 160 (CKR_PIN_INCORRECT), hSession: 1"), "{body}");
	assert!(!body.contains("*pPin"));
}

#[test]
fn null_pointer_is_not_dereferenced() {
	assert_eq!(call(&registry::C_Initialize, &[null()], false), "pInitArgs: NULL");
	assert_eq!(ret(&registry::C_Finalize, &[null()], CKR_OK), "rv: 0 (CKR_OK), pReserved: NULL");
}

#[test]
fn buffers_render_as_uppercase_hex() {
	let data = [0x0a_u8, 0xff, 0x10];
	let mut digest = [0_u8; 4];
	let mut digest_len: CK_ULONG = digest.len() as CK_ULONG;
	let args = [
		ArgValue::from(5 as CK_ULONG),
		ArgValue::from(data.as_ptr()),
		ArgValue::from(data.len() as CK_ULONG),
		ArgValue::from(digest.as_mut_ptr()),
		ArgValue::from(&raw mut digest_len),
	];

	let body = call(&registry::C_Digest, &args, false);
	assert!(body.contains("*pData: HEX(0AFF10)"), "{body}");
	assert!(body.contains("*pulDigestLen: 4"), "{body}");
	assert!(!body.contains("*pDigest:"), "outputs are not shown before the call: {body}");

	let mut written = [0xde_u8, 0xad, 0xbe, 0xef];
	let mut written_len: CK_ULONG = 3;
	let args = [
		args[0],
		args[1],
		args[2],
		ArgValue::from(written.as_mut_ptr()),
		ArgValue::from(&raw mut written_len),
	];
	let body = ret(&registry::C_Digest, &args, CKR_OK);
	assert!(body.contains("*pDigest: HEX(DEADBE)"), "{body}");
	assert!(body.contains("*pulDigestLen: 3"), "{body}");
	assert!(!body.contains("*pData"), "{body}");
}

#[test]
fn outputs_are_skipped_after_failure() {
	let data = [1_u8];
	let mut digest = [0_u8; 1];
	let mut digest_len: CK_ULONG = 32;
	let args = [
		ArgValue::from(5 as CK_ULONG),
		ArgValue::from(data.as_ptr()),
		ArgValue::from(1 as CK_ULONG),
		ArgValue::from(digest.as_mut_ptr()),
		ArgValue::from(&raw mut digest_len),
	];

	let body = ret(&registry::C_Digest, &args, CKR_BUFFER_TOO_SMALL);
	assert!(body.starts_with("rv: 336 (CKR_BUFFER_TOO_SMALL)"), "{body}");
	assert!(!body.contains("*pDigest"), "{body}");
}

#[test]
fn unusable_lengths_are_unreadable() {
	let data = [1_u8, 2, 3];
	let huge = [
		ArgValue::from(5 as CK_ULONG),
		ArgValue::from(data.as_ptr()),
		ArgValue::from(CK_ULONG::MAX - 1),
	];
	let body = call(&registry::C_DigestUpdate, &huge, false);
	assert!(body.contains(&format!("*pPart: {UNREADABLE}")), "{body}");

	let mut digest = [0_u8; 4];
	let missing_length = [ArgValue::from(5 as CK_ULONG), ArgValue::from(digest.as_mut_ptr()), null()];
	let body = ret(&registry::C_DigestFinal, &missing_length, CKR_OK);
	assert!(body.contains(&format!("*pDigest: {UNREADABLE}")), "{body}");
	assert!(body.contains("pulDigestLen: NULL"), "{body}");
}

#[test]
fn templates_render_each_attribute() {
	let label = b"token";
	let template = [attribute(0x03, label)];
	let args = [
		ArgValue::from(9 as CK_ULONG),
		ArgValue::from(template.as_ptr()),
		ArgValue::from(1 as CK_ULONG),
	];

	let body = call(&registry::C_FindObjectsInit, &args, false);
	assert!(
		body.contains("[{type: 3 (CKA_LABEL), pValue: 0x"),
		"{body}"
	);
	assert!(body.contains("ulValueLen: 5, *pValue: HEX(746F6B656E)}]"), "{body}");
}

#[test]
fn attribute_values_wait_for_the_module() {
	let mut label = [0_u8; 8];
	let secret = [0_u8; 4];
	let template = [
		CK_ATTRIBUTE {
			type_: 0x03,
			pValue: label.as_mut_ptr().cast(),
			ulValueLen: label.len() as CK_ULONG,
		},
		attribute(0x11, &secret),
	];
	let args = [
		ArgValue::from(1 as CK_ULONG),
		ArgValue::from(2 as CK_ULONG),
		ArgValue::from(template.as_ptr()),
		ArgValue::from(2 as CK_ULONG),
	];

	let body = call(&registry::C_GetAttributeValue, &args, false);
	assert!(!body.contains("*pValue"), "{body}");
	assert!(body.contains("type: 17 (CKA_VALUE)"), "{body}");

	label[..5].copy_from_slice(b"token");
	let written = [
		CK_ATTRIBUTE {
			type_: 0x03,
			pValue: label.as_mut_ptr().cast(),
			ulValueLen: 5,
		},
		CK_ATTRIBUTE {
			ulValueLen: CK_UNAVAILABLE_INFORMATION,
			..attribute(0x11, &secret)
		},
	];
	let args = [args[0], args[1], ArgValue::from(written.as_ptr()), args[3]];
	let body = ret(&registry::C_GetAttributeValue, &args, CKR_ATTRIBUTE_SENSITIVE);
	assert!(body.starts_with("rv: 17 (CKR_ATTRIBUTE_SENSITIVE)"), "{body}");
	assert!(body.contains("*pValue: HEX(746F6B656E)"), "{body}");
	assert!(body.contains(&format!("*pValue: {UNREADABLE}")), "{body}");
}

#[test]
fn array_attributes_are_nested() {
	let token = [1_u8];
	let inner = [attribute(0x01, &token)];
	let inner_bytes =
		unsafe { std::slice::from_raw_parts(inner.as_ptr().cast::<u8>(), std::mem::size_of_val(&inner)) };
	let outer = [attribute(0x4000_0211, inner_bytes)];
	let args = [
		ArgValue::from(1 as CK_ULONG),
		ArgValue::from(outer.as_ptr()),
		ArgValue::from(1 as CK_ULONG),
	];

	let body = call(&registry::C_FindObjectsInit, &args, false);
	assert!(body.contains("type: 1073742353 (CKA_WRAP_TEMPLATE)"), "{body}");
	assert!(body.contains("*pValue: [{type: 1 (CKA_TOKEN)"), "{body}");
	assert!(body.contains("*pValue: HEX(01)}]}]"), "{body}");
}

#[test]
fn mechanism_parameters_are_dumped() {
	let iv = [0x11_u8; 4];
	let mechanism = CK_MECHANISM {
		mechanism: 0x1082,
		pParameter: iv.as_ptr().cast_mut().cast(),
		ulParameterLen: iv.len() as CK_ULONG,
	};
	let args = [
		ArgValue::from(1 as CK_ULONG),
		ArgValue::from(&raw const mechanism),
		ArgValue::from(42 as CK_ULONG),
	];

	let body = call(&registry::C_EncryptInit, &args, false);
	assert!(body.contains("*pMechanism: {mechanism: 4226 (CKM_AES_CBC), pParameter: 0x"), "{body}");
	assert!(body.contains("ulParameterLen: 4, *pParameter: HEX(11111111)}"), "{body}");
	assert!(body.ends_with("hKey: 42"), "{body}");
}

#[test]
fn session_flags_are_named() {
	let notify: CK_NOTIFY = None;
	let mut session: CK_ULONG = 77;
	let args = [
		ArgValue::from(1 as CK_ULONG),
		ArgValue::from(6 as CK_ULONG),
		null(),
		ArgValue::from(notify),
		ArgValue::from(&raw mut session),
	];

	let body = call(&registry::C_OpenSession, &args, false);
	assert!(body.contains("flags: 6 (CKF_RW_SESSION | CKF_SERIAL_SESSION)"), "{body}");
	assert!(body.contains("pApplication: NULL, Notify: NULL"), "{body}");
	assert!(!body.contains("*phSession"), "{body}");

	let body = ret(&registry::C_OpenSession, &args, CKR_OK);
	assert!(body.contains("*phSession: 77"), "{body}");
}

#[test]
fn slot_list_follows_returned_count() {
	let mut slots: [CK_ULONG; 4] = [1, 7, 0, 0];
	let mut count: CK_ULONG = 2;
	let args = [
		ArgValue::from(1_u8),
		ArgValue::from(slots.as_mut_ptr()),
		ArgValue::from(&raw mut count),
	];

	let body = ret(&registry::C_GetSlotList, &args, CKR_OK);
	assert_eq!(
		body,
		format!(
			"rv: 0 (CKR_OK), tokenPresent: 1, pSlotList: {:p}, *pSlotList: [1, 7], pulCount: {:p}, *pulCount: 2",
			slots.as_ptr(),
			&raw const count
		)
	);
}

#[test]
fn info_structure_is_expanded() {
	let info = CK_INFO {
		cryptokiVersion: CK_VERSION { major: 2, minor: 40 },
		manufacturerID: common::padded(b"Fake Manufacturer"),
		flags: 0,
		libraryDescription: common::padded(b"Fake Module"),
		libraryVersion: CK_VERSION { major: 1, minor: 2 },
	};
	let body = ret(&registry::C_GetInfo, &[ArgValue::from(&raw const info)], CKR_OK);

	assert!(body.contains("*pInfo: {cryptokiVersion: 2.40, manufacturerID: Fake Manufacturer"), "{body}");
	assert!(body.contains("libraryVersion: 1.2}"), "{body}");
}

#[test]
fn status_names() {
	assert_eq!(format_rv(CKR_OK), "rv: 0 (CKR_OK)");
	assert_eq!(format_rv(0x190), "rv: 400 (CKR_CRYPTOKI_NOT_INITIALIZED)");
	assert_eq!(format_rv(0x12345), "rv: 74565 (Unknown)");
}

#[test]
fn registry_covers_the_whole_table() {
	assert_eq!(registry::ALL.len(), 68);

	let names = registry::ALL.iter().map(|d| d.name).collect::<HashSet<_>>();
	assert_eq!(names.len(), 68);

	for descriptor in registry::ALL {
		assert!(descriptor.name.starts_with("C_"));
		let found = registry::descriptor(descriptor.name).unwrap();
		assert!(std::ptr::eq(found, *descriptor));
	}
	assert!(registry::descriptor("C_NotAFunction").is_none());
}

#[test]
fn only_pins_are_sensitive() {
	let sensitive = registry::ALL
		.iter()
		.flat_map(|d| d.sensitive_params().map(move |p| format!("{}.{p}", d.name)))
		.collect::<HashSet<_>>();

	let expected = [
		"C_InitToken.pPin",
		"C_InitPIN.pPin",
		"C_SetPIN.pOldPin",
		"C_SetPIN.pNewPin",
		"C_Login.pPin",
	]
	.into_iter()
	.map(str::to_owned)
	.collect::<HashSet<_>>();

	assert_eq!(sensitive, expected);
}
