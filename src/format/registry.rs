//! Static descriptors of every PKCS#11 v2.40 entry point
#![allow(non_upper_case_globals)]

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ffi::{CKR_ATTRIBUTE_SENSITIVE, CKR_ATTRIBUTE_TYPE_INVALID, CKR_BUFFER_TOO_SMALL};
use crate::format::descriptor::LengthSource::{Arg, Deref, Fixed};
use crate::format::descriptor::ParamKind::{
	Bool, Bytes, Callback, Flags, FunctionList, Handle, Info, InitArgs, Mechanism, MechanismInfo, Named, Opaque,
	Secret, SessionInfo, SlotInfo, Template, Text, TokenInfo, Ulong, UlongArray, UlongRef,
};
use crate::format::descriptor::{FunctionDescriptor, ParamKind, ParamSpec};
use crate::format::names::{MECHANISM_TYPES, SESSION_FLAGS, USER_TYPES, WAIT_FLAGS};

const fn input(name: &'static str, kind: ParamKind) -> ParamSpec {
	ParamSpec::input(name, kind)
}

const fn output(name: &'static str, kind: ParamKind) -> ParamSpec {
	ParamSpec::output(name, kind)
}

const fn in_out(name: &'static str, kind: ParamKind) -> ParamSpec {
	ParamSpec::in_out(name, kind)
}

const SESSION: ParamSpec = input("hSession", Handle);

macro_rules! descriptors {
	($($name:ident $([$codes:expr])? => [$($param:expr),* $(,)?];)*) => {
		$(
			pub static $name: FunctionDescriptor = {
				const PARAMS: &[ParamSpec] = &[$($param),*];
				FunctionDescriptor::new(stringify!($name), PARAMS)$(.with_output_codes($codes))?
			};
		)*

		/// Every descriptor, in function list order
		pub static ALL: &[&FunctionDescriptor] = &[$(&$name),*];
	};
}

descriptors! {
	C_Initialize => [input("pInitArgs", InitArgs)];
	C_Finalize => [input("pReserved", Opaque)];
	C_GetInfo => [output("pInfo", Info)];
	C_GetFunctionList => [output("ppFunctionList", FunctionList)];
	C_GetSlotList => [
		input("tokenPresent", Bool),
		output("pSlotList", UlongArray { count: Deref(2), names: None }),
		in_out("pulCount", UlongRef),
	];
	C_GetSlotInfo => [input("slotID", Ulong), output("pInfo", SlotInfo)];
	C_GetTokenInfo => [input("slotID", Ulong), output("pInfo", TokenInfo)];
	C_GetMechanismList => [
		input("slotID", Ulong),
		output("pMechanismList", UlongArray { count: Deref(2), names: Some(MECHANISM_TYPES) }),
		in_out("pulCount", UlongRef),
	];
	C_GetMechanismInfo => [
		input("slotID", Ulong),
		input("type", Named(MECHANISM_TYPES)),
		output("pInfo", MechanismInfo),
	];
	C_InitToken => [
		input("slotID", Ulong),
		input("pPin", Secret(Arg(2))),
		input("ulPinLen", Ulong),
		input("pLabel", Text(Fixed(32))),
	];
	C_InitPIN => [SESSION, input("pPin", Secret(Arg(2))), input("ulPinLen", Ulong)];
	C_SetPIN => [
		SESSION,
		input("pOldPin", Secret(Arg(2))),
		input("ulOldLen", Ulong),
		input("pNewPin", Secret(Arg(4))),
		input("ulNewLen", Ulong),
	];
	C_OpenSession => [
		input("slotID", Ulong),
		input("flags", Flags(SESSION_FLAGS)),
		input("pApplication", Opaque),
		input("Notify", Callback),
		output("phSession", UlongRef),
	];
	C_CloseSession => [SESSION];
	C_CloseAllSessions => [input("slotID", Ulong)];
	C_GetSessionInfo => [SESSION, output("pInfo", SessionInfo)];
	C_GetOperationState => [
		SESSION,
		output("pOperationState", Bytes(Deref(2))),
		in_out("pulOperationStateLen", UlongRef),
	];
	C_SetOperationState => [
		SESSION,
		input("pOperationState", Bytes(Arg(2))),
		input("ulOperationStateLen", Ulong),
		input("hEncryptionKey", Handle),
		input("hAuthenticationKey", Handle),
	];
	C_Login => [
		SESSION,
		input("userType", Named(USER_TYPES)),
		input("pPin", Secret(Arg(3))),
		input("ulPinLen", Ulong),
	];
	C_Logout => [SESSION];
	C_CreateObject => [
		SESSION,
		input("pTemplate", Template(Arg(2))),
		input("ulCount", Ulong),
		output("phObject", UlongRef),
	];
	C_CopyObject => [
		SESSION,
		input("hObject", Handle),
		input("pTemplate", Template(Arg(3))),
		input("ulCount", Ulong),
		output("phNewObject", UlongRef),
	];
	C_DestroyObject => [SESSION, input("hObject", Handle)];
	C_GetObjectSize => [SESSION, input("hObject", Handle), output("pulSize", UlongRef)];
	C_GetAttributeValue [&[CKR_ATTRIBUTE_SENSITIVE, CKR_ATTRIBUTE_TYPE_INVALID, CKR_BUFFER_TOO_SMALL]] => [
		SESSION,
		input("hObject", Handle),
		in_out("pTemplate", Template(Arg(3))),
		input("ulCount", Ulong),
	];
	C_SetAttributeValue => [
		SESSION,
		input("hObject", Handle),
		input("pTemplate", Template(Arg(3))),
		input("ulCount", Ulong),
	];
	C_FindObjectsInit => [SESSION, input("pTemplate", Template(Arg(2))), input("ulCount", Ulong)];
	C_FindObjects => [
		SESSION,
		output("phObject", UlongArray { count: Deref(3), names: None }),
		input("ulMaxObjectCount", Ulong),
		output("pulObjectCount", UlongRef),
	];
	C_FindObjectsFinal => [SESSION];
	C_EncryptInit => [SESSION, input("pMechanism", Mechanism), input("hKey", Handle)];
	C_Encrypt => [
		SESSION,
		input("pData", Bytes(Arg(2))),
		input("ulDataLen", Ulong),
		output("pEncryptedData", Bytes(Deref(4))),
		in_out("pulEncryptedDataLen", UlongRef),
	];
	C_EncryptUpdate => [
		SESSION,
		input("pPart", Bytes(Arg(2))),
		input("ulPartLen", Ulong),
		output("pEncryptedPart", Bytes(Deref(4))),
		in_out("pulEncryptedPartLen", UlongRef),
	];
	C_EncryptFinal => [
		SESSION,
		output("pLastEncryptedPart", Bytes(Deref(2))),
		in_out("pulLastEncryptedPartLen", UlongRef),
	];
	C_DecryptInit => [SESSION, input("pMechanism", Mechanism), input("hKey", Handle)];
	C_Decrypt => [
		SESSION,
		input("pEncryptedData", Bytes(Arg(2))),
		input("ulEncryptedDataLen", Ulong),
		output("pData", Bytes(Deref(4))),
		in_out("pulDataLen", UlongRef),
	];
	C_DecryptUpdate => [
		SESSION,
		input("pEncryptedPart", Bytes(Arg(2))),
		input("ulEncryptedPartLen", Ulong),
		output("pPart", Bytes(Deref(4))),
		in_out("pulPartLen", UlongRef),
	];
	C_DecryptFinal => [SESSION, output("pLastPart", Bytes(Deref(2))), in_out("pulLastPartLen", UlongRef)];
	C_DigestInit => [SESSION, input("pMechanism", Mechanism)];
	C_Digest => [
		SESSION,
		input("pData", Bytes(Arg(2))),
		input("ulDataLen", Ulong),
		output("pDigest", Bytes(Deref(4))),
		in_out("pulDigestLen", UlongRef),
	];
	C_DigestUpdate => [SESSION, input("pPart", Bytes(Arg(2))), input("ulPartLen", Ulong)];
	C_DigestKey => [SESSION, input("hKey", Handle)];
	C_DigestFinal => [SESSION, output("pDigest", Bytes(Deref(2))), in_out("pulDigestLen", UlongRef)];
	C_SignInit => [SESSION, input("pMechanism", Mechanism), input("hKey", Handle)];
	C_Sign => [
		SESSION,
		input("pData", Bytes(Arg(2))),
		input("ulDataLen", Ulong),
		output("pSignature", Bytes(Deref(4))),
		in_out("pulSignatureLen", UlongRef),
	];
	C_SignUpdate => [SESSION, input("pPart", Bytes(Arg(2))), input("ulPartLen", Ulong)];
	C_SignFinal => [SESSION, output("pSignature", Bytes(Deref(2))), in_out("pulSignatureLen", UlongRef)];
	C_SignRecoverInit => [SESSION, input("pMechanism", Mechanism), input("hKey", Handle)];
	C_SignRecover => [
		SESSION,
		input("pData", Bytes(Arg(2))),
		input("ulDataLen", Ulong),
		output("pSignature", Bytes(Deref(4))),
		in_out("pulSignatureLen", UlongRef),
	];
	C_VerifyInit => [SESSION, input("pMechanism", Mechanism), input("hKey", Handle)];
	C_Verify => [
		SESSION,
		input("pData", Bytes(Arg(2))),
		input("ulDataLen", Ulong),
		input("pSignature", Bytes(Arg(4))),
		input("ulSignatureLen", Ulong),
	];
	C_VerifyUpdate => [SESSION, input("pPart", Bytes(Arg(2))), input("ulPartLen", Ulong)];
	C_VerifyFinal => [SESSION, input("pSignature", Bytes(Arg(2))), input("ulSignatureLen", Ulong)];
	C_VerifyRecoverInit => [SESSION, input("pMechanism", Mechanism), input("hKey", Handle)];
	C_VerifyRecover => [
		SESSION,
		input("pSignature", Bytes(Arg(2))),
		input("ulSignatureLen", Ulong),
		output("pData", Bytes(Deref(4))),
		in_out("pulDataLen", UlongRef),
	];
	C_DigestEncryptUpdate => [
		SESSION,
		input("pPart", Bytes(Arg(2))),
		input("ulPartLen", Ulong),
		output("pEncryptedPart", Bytes(Deref(4))),
		in_out("pulEncryptedPartLen", UlongRef),
	];
	C_DecryptDigestUpdate => [
		SESSION,
		input("pEncryptedPart", Bytes(Arg(2))),
		input("ulEncryptedPartLen", Ulong),
		output("pPart", Bytes(Deref(4))),
		in_out("pulPartLen", UlongRef),
	];
	C_SignEncryptUpdate => [
		SESSION,
		input("pPart", Bytes(Arg(2))),
		input("ulPartLen", Ulong),
		output("pEncryptedPart", Bytes(Deref(4))),
		in_out("pulEncryptedPartLen", UlongRef),
	];
	C_DecryptVerifyUpdate => [
		SESSION,
		input("pEncryptedPart", Bytes(Arg(2))),
		input("ulEncryptedPartLen", Ulong),
		output("pPart", Bytes(Deref(4))),
		in_out("pulPartLen", UlongRef),
	];
	C_GenerateKey => [
		SESSION,
		input("pMechanism", Mechanism),
		input("pTemplate", Template(Arg(3))),
		input("ulCount", Ulong),
		output("phKey", UlongRef),
	];
	C_GenerateKeyPair => [
		SESSION,
		input("pMechanism", Mechanism),
		input("pPublicKeyTemplate", Template(Arg(3))),
		input("ulPublicKeyAttributeCount", Ulong),
		input("pPrivateKeyTemplate", Template(Arg(5))),
		input("ulPrivateKeyAttributeCount", Ulong),
		output("phPublicKey", UlongRef),
		output("phPrivateKey", UlongRef),
	];
	C_WrapKey => [
		SESSION,
		input("pMechanism", Mechanism),
		input("hWrappingKey", Handle),
		input("hKey", Handle),
		output("pWrappedKey", Bytes(Deref(5))),
		in_out("pulWrappedKeyLen", UlongRef),
	];
	C_UnwrapKey => [
		SESSION,
		input("pMechanism", Mechanism),
		input("hUnwrappingKey", Handle),
		input("pWrappedKey", Bytes(Arg(4))),
		input("ulWrappedKeyLen", Ulong),
		input("pTemplate", Template(Arg(6))),
		input("ulAttributeCount", Ulong),
		output("phKey", UlongRef),
	];
	C_DeriveKey => [
		SESSION,
		input("pMechanism", Mechanism),
		input("hBaseKey", Handle),
		input("pTemplate", Template(Arg(4))),
		input("ulAttributeCount", Ulong),
		output("phKey", UlongRef),
	];
	C_SeedRandom => [SESSION, input("pSeed", Bytes(Arg(2))), input("ulSeedLen", Ulong)];
	C_GenerateRandom => [SESSION, output("RandomData", Bytes(Arg(2))), input("ulRandomLen", Ulong)];
	C_GetFunctionStatus => [SESSION];
	C_CancelFunction => [SESSION];
	C_WaitForSlotEvent => [
		input("flags", Flags(WAIT_FLAGS)),
		output("pSlot", UlongRef),
		input("pReserved", Opaque),
	];
}

lazy_static! {
	static ref BY_NAME: HashMap<&'static str, &'static FunctionDescriptor> =
		ALL.iter().map(|descriptor| (descriptor.name, *descriptor)).collect();
}

/// Descriptor of the entry point called `name`
#[must_use]
pub fn descriptor(name: &str) -> Option<&'static FunctionDescriptor> {
	BY_NAME.get(name).copied()
}
