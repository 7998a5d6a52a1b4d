//! Exported Cryptoki entry points
//!
//! Every function of the v2.40 table is exported under its C name. Each one
//! hands its arguments and its descriptor to the recorder and forwards to the
//! matching slot of the real module's table.
#![allow(non_snake_case)]

use std::ffi::c_void;
use std::mem;

use crate::ffi::{
	CK_ATTRIBUTE_PTR, CK_BBOOL, CK_BYTE_PTR, CK_FLAGS, CK_FUNCTION_LIST, CK_FUNCTION_LIST_PTR_PTR, CK_INFO_PTR,
	CK_MECHANISM_INFO_PTR, CK_MECHANISM_PTR, CK_MECHANISM_TYPE, CK_MECHANISM_TYPE_PTR, CK_NOTIFY, CK_OBJECT_HANDLE,
	CK_OBJECT_HANDLE_PTR, CK_RV, CK_SESSION_HANDLE, CK_SESSION_HANDLE_PTR, CK_SESSION_INFO_PTR, CK_SLOT_ID,
	CK_SLOT_ID_PTR, CK_SLOT_INFO_PTR, CK_TOKEN_INFO_PTR, CK_ULONG, CK_ULONG_PTR, CK_USER_TYPE, CK_UTF8CHAR_PTR,
	CK_VERSION, CK_VOID_PTR, CKR_ARGUMENTS_BAD, CKR_OK, Library,
};
use crate::format::ArgValue;
use crate::format::registry;
use crate::recorder;

/// Returns the proxy's own function list
///
/// Never forwarded: the application must keep calling through the proxy.
///
/// # Safety
///
/// `ppFunctionList` must be null or valid for a pointer write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_GetFunctionList(ppFunctionList: CK_FUNCTION_LIST_PTR_PTR) -> CK_RV {
	unsafe {
		recorder::record(
			&registry::C_GetFunctionList,
			&[ArgValue::from(ppFunctionList)],
			|runtime| {
				if ppFunctionList.is_null() {
					return Some(CKR_ARGUMENTS_BAD);
				}
				*ppFunctionList = runtime.function_list_ptr();
				Some(CKR_OK)
			},
		)
	}
}

macro_rules! entry_points {
	($(fn $name:ident($($arg:ident: $ty:ty),* $(,)?);)*) => {
		$(
			/// # Safety
			///
			/// Same contract as the function of the real module.
			#[unsafe(no_mangle)]
			pub unsafe extern "C" fn $name($($arg: $ty),*) -> CK_RV {
				unsafe {
					recorder::record(&registry::$name, &[$(ArgValue::from($arg)),*], |runtime| {
						runtime.functions().$name.map(|real| real($($arg),*))
					})
				}
			}
		)*

		/// The table handed to applications, reporting `version`
		pub(crate) fn function_list(version: CK_VERSION) -> CK_FUNCTION_LIST {
			CK_FUNCTION_LIST {
				version,
				C_GetFunctionList: Some(C_GetFunctionList),
				$($name: Some($name),)*
			}
		}

		/// Fill every empty slot of `functions` from the symbols of `library`
		pub(crate) fn resolve_symbols(functions: &mut CK_FUNCTION_LIST, library: &Library) {
			$(
				if functions.$name.is_none() {
					functions.$name = library.symbol(stringify!($name)).map(|symbol| unsafe {
						mem::transmute::<*mut c_void, unsafe extern "C" fn($($ty),*) -> CK_RV>(symbol.as_ptr())
					});
				}
			)*
		}
	};
}

entry_points! {
	fn C_Initialize(pInitArgs: CK_VOID_PTR);
	fn C_Finalize(pReserved: CK_VOID_PTR);
	fn C_GetInfo(pInfo: CK_INFO_PTR);
	fn C_GetSlotList(tokenPresent: CK_BBOOL, pSlotList: CK_SLOT_ID_PTR, pulCount: CK_ULONG_PTR);
	fn C_GetSlotInfo(slotID: CK_SLOT_ID, pInfo: CK_SLOT_INFO_PTR);
	fn C_GetTokenInfo(slotID: CK_SLOT_ID, pInfo: CK_TOKEN_INFO_PTR);
	fn C_GetMechanismList(slotID: CK_SLOT_ID, pMechanismList: CK_MECHANISM_TYPE_PTR, pulCount: CK_ULONG_PTR);
	fn C_GetMechanismInfo(slotID: CK_SLOT_ID, type_: CK_MECHANISM_TYPE, pInfo: CK_MECHANISM_INFO_PTR);
	fn C_InitToken(slotID: CK_SLOT_ID, pPin: CK_UTF8CHAR_PTR, ulPinLen: CK_ULONG, pLabel: CK_UTF8CHAR_PTR);
	fn C_InitPIN(hSession: CK_SESSION_HANDLE, pPin: CK_UTF8CHAR_PTR, ulPinLen: CK_ULONG);
	fn C_SetPIN(
		hSession: CK_SESSION_HANDLE,
		pOldPin: CK_UTF8CHAR_PTR,
		ulOldLen: CK_ULONG,
		pNewPin: CK_UTF8CHAR_PTR,
		ulNewLen: CK_ULONG,
	);
	fn C_OpenSession(
		slotID: CK_SLOT_ID,
		flags: CK_FLAGS,
		pApplication: CK_VOID_PTR,
		Notify: CK_NOTIFY,
		phSession: CK_SESSION_HANDLE_PTR,
	);
	fn C_CloseSession(hSession: CK_SESSION_HANDLE);
	fn C_CloseAllSessions(slotID: CK_SLOT_ID);
	fn C_GetSessionInfo(hSession: CK_SESSION_HANDLE, pInfo: CK_SESSION_INFO_PTR);
	fn C_GetOperationState(hSession: CK_SESSION_HANDLE, pOperationState: CK_BYTE_PTR, pulOperationStateLen: CK_ULONG_PTR);
	fn C_SetOperationState(
		hSession: CK_SESSION_HANDLE,
		pOperationState: CK_BYTE_PTR,
		ulOperationStateLen: CK_ULONG,
		hEncryptionKey: CK_OBJECT_HANDLE,
		hAuthenticationKey: CK_OBJECT_HANDLE,
	);
	fn C_Login(hSession: CK_SESSION_HANDLE, userType: CK_USER_TYPE, pPin: CK_UTF8CHAR_PTR, ulPinLen: CK_ULONG);
	fn C_Logout(hSession: CK_SESSION_HANDLE);
	fn C_CreateObject(
		hSession: CK_SESSION_HANDLE,
		pTemplate: CK_ATTRIBUTE_PTR,
		ulCount: CK_ULONG,
		phObject: CK_OBJECT_HANDLE_PTR,
	);
	fn C_CopyObject(
		hSession: CK_SESSION_HANDLE,
		hObject: CK_OBJECT_HANDLE,
		pTemplate: CK_ATTRIBUTE_PTR,
		ulCount: CK_ULONG,
		phNewObject: CK_OBJECT_HANDLE_PTR,
	);
	fn C_DestroyObject(hSession: CK_SESSION_HANDLE, hObject: CK_OBJECT_HANDLE);
	fn C_GetObjectSize(hSession: CK_SESSION_HANDLE, hObject: CK_OBJECT_HANDLE, pulSize: CK_ULONG_PTR);
	fn C_GetAttributeValue(
		hSession: CK_SESSION_HANDLE,
		hObject: CK_OBJECT_HANDLE,
		pTemplate: CK_ATTRIBUTE_PTR,
		ulCount: CK_ULONG,
	);
	fn C_SetAttributeValue(
		hSession: CK_SESSION_HANDLE,
		hObject: CK_OBJECT_HANDLE,
		pTemplate: CK_ATTRIBUTE_PTR,
		ulCount: CK_ULONG,
	);
	fn C_FindObjectsInit(hSession: CK_SESSION_HANDLE, pTemplate: CK_ATTRIBUTE_PTR, ulCount: CK_ULONG);
	fn C_FindObjects(
		hSession: CK_SESSION_HANDLE,
		phObject: CK_OBJECT_HANDLE_PTR,
		ulMaxObjectCount: CK_ULONG,
		pulObjectCount: CK_ULONG_PTR,
	);
	fn C_FindObjectsFinal(hSession: CK_SESSION_HANDLE);
	fn C_EncryptInit(hSession: CK_SESSION_HANDLE, pMechanism: CK_MECHANISM_PTR, hKey: CK_OBJECT_HANDLE);
	fn C_Encrypt(
		hSession: CK_SESSION_HANDLE,
		pData: CK_BYTE_PTR,
		ulDataLen: CK_ULONG,
		pEncryptedData: CK_BYTE_PTR,
		pulEncryptedDataLen: CK_ULONG_PTR,
	);
	fn C_EncryptUpdate(
		hSession: CK_SESSION_HANDLE,
		pPart: CK_BYTE_PTR,
		ulPartLen: CK_ULONG,
		pEncryptedPart: CK_BYTE_PTR,
		pulEncryptedPartLen: CK_ULONG_PTR,
	);
	fn C_EncryptFinal(
		hSession: CK_SESSION_HANDLE,
		pLastEncryptedPart: CK_BYTE_PTR,
		pulLastEncryptedPartLen: CK_ULONG_PTR,
	);
	fn C_DecryptInit(hSession: CK_SESSION_HANDLE, pMechanism: CK_MECHANISM_PTR, hKey: CK_OBJECT_HANDLE);
	fn C_Decrypt(
		hSession: CK_SESSION_HANDLE,
		pEncryptedData: CK_BYTE_PTR,
		ulEncryptedDataLen: CK_ULONG,
		pData: CK_BYTE_PTR,
		pulDataLen: CK_ULONG_PTR,
	);
	fn C_DecryptUpdate(
		hSession: CK_SESSION_HANDLE,
		pEncryptedPart: CK_BYTE_PTR,
		ulEncryptedPartLen: CK_ULONG,
		pPart: CK_BYTE_PTR,
		pulPartLen: CK_ULONG_PTR,
	);
	fn C_DecryptFinal(hSession: CK_SESSION_HANDLE, pLastPart: CK_BYTE_PTR, pulLastPartLen: CK_ULONG_PTR);
	fn C_DigestInit(hSession: CK_SESSION_HANDLE, pMechanism: CK_MECHANISM_PTR);
	fn C_Digest(
		hSession: CK_SESSION_HANDLE,
		pData: CK_BYTE_PTR,
		ulDataLen: CK_ULONG,
		pDigest: CK_BYTE_PTR,
		pulDigestLen: CK_ULONG_PTR,
	);
	fn C_DigestUpdate(hSession: CK_SESSION_HANDLE, pPart: CK_BYTE_PTR, ulPartLen: CK_ULONG);
	fn C_DigestKey(hSession: CK_SESSION_HANDLE, hKey: CK_OBJECT_HANDLE);
	fn C_DigestFinal(hSession: CK_SESSION_HANDLE, pDigest: CK_BYTE_PTR, pulDigestLen: CK_ULONG_PTR);
	fn C_SignInit(hSession: CK_SESSION_HANDLE, pMechanism: CK_MECHANISM_PTR, hKey: CK_OBJECT_HANDLE);
	fn C_Sign(
		hSession: CK_SESSION_HANDLE,
		pData: CK_BYTE_PTR,
		ulDataLen: CK_ULONG,
		pSignature: CK_BYTE_PTR,
		pulSignatureLen: CK_ULONG_PTR,
	);
	fn C_SignUpdate(hSession: CK_SESSION_HANDLE, pPart: CK_BYTE_PTR, ulPartLen: CK_ULONG);
	fn C_SignFinal(hSession: CK_SESSION_HANDLE, pSignature: CK_BYTE_PTR, pulSignatureLen: CK_ULONG_PTR);
	fn C_SignRecoverInit(hSession: CK_SESSION_HANDLE, pMechanism: CK_MECHANISM_PTR, hKey: CK_OBJECT_HANDLE);
	fn C_SignRecover(
		hSession: CK_SESSION_HANDLE,
		pData: CK_BYTE_PTR,
		ulDataLen: CK_ULONG,
		pSignature: CK_BYTE_PTR,
		pulSignatureLen: CK_ULONG_PTR,
	);
	fn C_VerifyInit(hSession: CK_SESSION_HANDLE, pMechanism: CK_MECHANISM_PTR, hKey: CK_OBJECT_HANDLE);
	fn C_Verify(
		hSession: CK_SESSION_HANDLE,
		pData: CK_BYTE_PTR,
		ulDataLen: CK_ULONG,
		pSignature: CK_BYTE_PTR,
		ulSignatureLen: CK_ULONG,
	);
	fn C_VerifyUpdate(hSession: CK_SESSION_HANDLE, pPart: CK_BYTE_PTR, ulPartLen: CK_ULONG);
	fn C_VerifyFinal(hSession: CK_SESSION_HANDLE, pSignature: CK_BYTE_PTR, ulSignatureLen: CK_ULONG);
	fn C_VerifyRecoverInit(hSession: CK_SESSION_HANDLE, pMechanism: CK_MECHANISM_PTR, hKey: CK_OBJECT_HANDLE);
	fn C_VerifyRecover(
		hSession: CK_SESSION_HANDLE,
		pSignature: CK_BYTE_PTR,
		ulSignatureLen: CK_ULONG,
		pData: CK_BYTE_PTR,
		pulDataLen: CK_ULONG_PTR,
	);
	fn C_DigestEncryptUpdate(
		hSession: CK_SESSION_HANDLE,
		pPart: CK_BYTE_PTR,
		ulPartLen: CK_ULONG,
		pEncryptedPart: CK_BYTE_PTR,
		pulEncryptedPartLen: CK_ULONG_PTR,
	);
	fn C_DecryptDigestUpdate(
		hSession: CK_SESSION_HANDLE,
		pEncryptedPart: CK_BYTE_PTR,
		ulEncryptedPartLen: CK_ULONG,
		pPart: CK_BYTE_PTR,
		pulPartLen: CK_ULONG_PTR,
	);
	fn C_SignEncryptUpdate(
		hSession: CK_SESSION_HANDLE,
		pPart: CK_BYTE_PTR,
		ulPartLen: CK_ULONG,
		pEncryptedPart: CK_BYTE_PTR,
		pulEncryptedPartLen: CK_ULONG_PTR,
	);
	fn C_DecryptVerifyUpdate(
		hSession: CK_SESSION_HANDLE,
		pEncryptedPart: CK_BYTE_PTR,
		ulEncryptedPartLen: CK_ULONG,
		pPart: CK_BYTE_PTR,
		pulPartLen: CK_ULONG_PTR,
	);
	fn C_GenerateKey(
		hSession: CK_SESSION_HANDLE,
		pMechanism: CK_MECHANISM_PTR,
		pTemplate: CK_ATTRIBUTE_PTR,
		ulCount: CK_ULONG,
		phKey: CK_OBJECT_HANDLE_PTR,
	);
	fn C_GenerateKeyPair(
		hSession: CK_SESSION_HANDLE,
		pMechanism: CK_MECHANISM_PTR,
		pPublicKeyTemplate: CK_ATTRIBUTE_PTR,
		ulPublicKeyAttributeCount: CK_ULONG,
		pPrivateKeyTemplate: CK_ATTRIBUTE_PTR,
		ulPrivateKeyAttributeCount: CK_ULONG,
		phPublicKey: CK_OBJECT_HANDLE_PTR,
		phPrivateKey: CK_OBJECT_HANDLE_PTR,
	);
	fn C_WrapKey(
		hSession: CK_SESSION_HANDLE,
		pMechanism: CK_MECHANISM_PTR,
		hWrappingKey: CK_OBJECT_HANDLE,
		hKey: CK_OBJECT_HANDLE,
		pWrappedKey: CK_BYTE_PTR,
		pulWrappedKeyLen: CK_ULONG_PTR,
	);
	fn C_UnwrapKey(
		hSession: CK_SESSION_HANDLE,
		pMechanism: CK_MECHANISM_PTR,
		hUnwrappingKey: CK_OBJECT_HANDLE,
		pWrappedKey: CK_BYTE_PTR,
		ulWrappedKeyLen: CK_ULONG,
		pTemplate: CK_ATTRIBUTE_PTR,
		ulAttributeCount: CK_ULONG,
		phKey: CK_OBJECT_HANDLE_PTR,
	);
	fn C_DeriveKey(
		hSession: CK_SESSION_HANDLE,
		pMechanism: CK_MECHANISM_PTR,
		hBaseKey: CK_OBJECT_HANDLE,
		pTemplate: CK_ATTRIBUTE_PTR,
		ulAttributeCount: CK_ULONG,
		phKey: CK_OBJECT_HANDLE_PTR,
	);
	fn C_SeedRandom(hSession: CK_SESSION_HANDLE, pSeed: CK_BYTE_PTR, ulSeedLen: CK_ULONG);
	fn C_GenerateRandom(hSession: CK_SESSION_HANDLE, RandomData: CK_BYTE_PTR, ulRandomLen: CK_ULONG);
	fn C_GetFunctionStatus(hSession: CK_SESSION_HANDLE);
	fn C_CancelFunction(hSession: CK_SESSION_HANDLE);
	fn C_WaitForSlotEvent(flags: CK_FLAGS, pSlot: CK_SLOT_ID_PTR, pReserved: CK_VOID_PTR);
}
