//! Symbolic names for Cryptoki constants

use crate::ffi::CK_ULONG;

/// Value to name mapping
pub type NameTable = &'static [(CK_ULONG, &'static str)];

/// Placeholder for values missing from a table
pub const UNKNOWN: &str = "Unknown";

/// Look up the name of `value`
#[must_use]
pub fn lookup(table: NameTable, value: CK_ULONG) -> &'static str {
	table
		.iter()
		.find(|(known, _)| *known == value)
		.map_or(UNKNOWN, |(_, name)| name)
}

/// Names of every bit of `value` present in `table`, joined by `" | "`
#[must_use]
pub fn flag_names(table: NameTable, value: CK_ULONG) -> String {
	table
		.iter()
		.filter(|(bit, _)| *bit != 0 && value & *bit == *bit)
		.map(|(_, name)| *name)
		.collect::<Vec<_>>()
		.join(" | ")
}

pub const RETURN_VALUES: NameTable = &[
	(0x0000_0000, "CKR_OK"),
	(0x0000_0001, "CKR_CANCEL"),
	(0x0000_0002, "CKR_HOST_MEMORY"),
	(0x0000_0003, "CKR_SLOT_ID_INVALID"),
	(0x0000_0005, "CKR_GENERAL_ERROR"),
	(0x0000_0006, "CKR_FUNCTION_FAILED"),
	(0x0000_0007, "CKR_ARGUMENTS_BAD"),
	(0x0000_0008, "CKR_NO_EVENT"),
	(0x0000_0009, "CKR_NEED_TO_CREATE_THREADS"),
	(0x0000_000A, "CKR_CANT_LOCK"),
	(0x0000_0010, "CKR_ATTRIBUTE_READ_ONLY"),
	(0x0000_0011, "CKR_ATTRIBUTE_SENSITIVE"),
	(0x0000_0012, "CKR_ATTRIBUTE_TYPE_INVALID"),
	(0x0000_0013, "CKR_ATTRIBUTE_VALUE_INVALID"),
	(0x0000_001B, "CKR_ACTION_PROHIBITED"),
	(0x0000_0020, "CKR_DATA_INVALID"),
	(0x0000_0021, "CKR_DATA_LEN_RANGE"),
	(0x0000_0030, "CKR_DEVICE_ERROR"),
	(0x0000_0031, "CKR_DEVICE_MEMORY"),
	(0x0000_0032, "CKR_DEVICE_REMOVED"),
	(0x0000_0040, "CKR_ENCRYPTED_DATA_INVALID"),
	(0x0000_0041, "CKR_ENCRYPTED_DATA_LEN_RANGE"),
	(0x0000_0050, "CKR_FUNCTION_CANCELED"),
	(0x0000_0051, "CKR_FUNCTION_NOT_PARALLEL"),
	(0x0000_0054, "CKR_FUNCTION_NOT_SUPPORTED"),
	(0x0000_0060, "CKR_KEY_HANDLE_INVALID"),
	(0x0000_0062, "CKR_KEY_SIZE_RANGE"),
	(0x0000_0063, "CKR_KEY_TYPE_INCONSISTENT"),
	(0x0000_0064, "CKR_KEY_NOT_NEEDED"),
	(0x0000_0065, "CKR_KEY_CHANGED"),
	(0x0000_0066, "CKR_KEY_NEEDED"),
	(0x0000_0067, "CKR_KEY_INDIGESTIBLE"),
	(0x0000_0068, "CKR_KEY_FUNCTION_NOT_PERMITTED"),
	(0x0000_0069, "CKR_KEY_NOT_WRAPPABLE"),
	(0x0000_006A, "CKR_KEY_UNEXTRACTABLE"),
	(0x0000_0070, "CKR_MECHANISM_INVALID"),
	(0x0000_0071, "CKR_MECHANISM_PARAM_INVALID"),
	(0x0000_0082, "CKR_OBJECT_HANDLE_INVALID"),
	(0x0000_0090, "CKR_OPERATION_ACTIVE"),
	(0x0000_0091, "CKR_OPERATION_NOT_INITIALIZED"),
	(0x0000_00A0, "CKR_PIN_INCORRECT"),
	(0x0000_00A1, "CKR_PIN_INVALID"),
	(0x0000_00A2, "CKR_PIN_LEN_RANGE"),
	(0x0000_00A3, "CKR_PIN_EXPIRED"),
	(0x0000_00A4, "CKR_PIN_LOCKED"),
	(0x0000_00B0, "CKR_SESSION_CLOSED"),
	(0x0000_00B1, "CKR_SESSION_COUNT"),
	(0x0000_00B3, "CKR_SESSION_HANDLE_INVALID"),
	(0x0000_00B4, "CKR_SESSION_PARALLEL_NOT_SUPPORTED"),
	(0x0000_00B5, "CKR_SESSION_READ_ONLY"),
	(0x0000_00B6, "CKR_SESSION_EXISTS"),
	(0x0000_00B7, "CKR_SESSION_READ_ONLY_EXISTS"),
	(0x0000_00B8, "CKR_SESSION_READ_WRITE_SO_EXISTS"),
	(0x0000_00C0, "CKR_SIGNATURE_INVALID"),
	(0x0000_00C1, "CKR_SIGNATURE_LEN_RANGE"),
	(0x0000_00D0, "CKR_TEMPLATE_INCOMPLETE"),
	(0x0000_00D1, "CKR_TEMPLATE_INCONSISTENT"),
	(0x0000_00E0, "CKR_TOKEN_NOT_PRESENT"),
	(0x0000_00E1, "CKR_TOKEN_NOT_RECOGNIZED"),
	(0x0000_00E2, "CKR_TOKEN_WRITE_PROTECTED"),
	(0x0000_00F0, "CKR_UNWRAPPING_KEY_HANDLE_INVALID"),
	(0x0000_00F1, "CKR_UNWRAPPING_KEY_SIZE_RANGE"),
	(0x0000_00F2, "CKR_UNWRAPPING_KEY_TYPE_INCONSISTENT"),
	(0x0000_0100, "CKR_USER_ALREADY_LOGGED_IN"),
	(0x0000_0101, "CKR_USER_NOT_LOGGED_IN"),
	(0x0000_0102, "CKR_USER_PIN_NOT_INITIALIZED"),
	(0x0000_0103, "CKR_USER_TYPE_INVALID"),
	(0x0000_0104, "CKR_USER_ANOTHER_ALREADY_LOGGED_IN"),
	(0x0000_0105, "CKR_USER_TOO_MANY_TYPES"),
	(0x0000_0110, "CKR_WRAPPED_KEY_INVALID"),
	(0x0000_0112, "CKR_WRAPPED_KEY_LEN_RANGE"),
	(0x0000_0113, "CKR_WRAPPING_KEY_HANDLE_INVALID"),
	(0x0000_0114, "CKR_WRAPPING_KEY_SIZE_RANGE"),
	(0x0000_0115, "CKR_WRAPPING_KEY_TYPE_INCONSISTENT"),
	(0x0000_0120, "CKR_RANDOM_SEED_NOT_SUPPORTED"),
	(0x0000_0121, "CKR_RANDOM_NO_RNG"),
	(0x0000_0130, "CKR_DOMAIN_PARAMS_INVALID"),
	(0x0000_0140, "CKR_CURVE_NOT_SUPPORTED"),
	(0x0000_0150, "CKR_BUFFER_TOO_SMALL"),
	(0x0000_0160, "CKR_SAVED_STATE_INVALID"),
	(0x0000_0170, "CKR_INFORMATION_SENSITIVE"),
	(0x0000_0180, "CKR_STATE_UNSAVEABLE"),
	(0x0000_0190, "CKR_CRYPTOKI_NOT_INITIALIZED"),
	(0x0000_0191, "CKR_CRYPTOKI_ALREADY_INITIALIZED"),
	(0x0000_01A0, "CKR_MUTEX_BAD"),
	(0x0000_01A1, "CKR_MUTEX_NOT_LOCKED"),
	(0x0000_01B0, "CKR_NEW_PIN_MODE"),
	(0x0000_01B1, "CKR_NEXT_OTP"),
	(0x0000_01B5, "CKR_EXCEEDED_MAX_ITERATIONS"),
	(0x0000_01B6, "CKR_FIPS_SELF_TEST_FAILED"),
	(0x0000_01B7, "CKR_LIBRARY_LOAD_FAILED"),
	(0x0000_01B8, "CKR_PIN_TOO_WEAK"),
	(0x0000_01B9, "CKR_PUBLIC_KEY_INVALID"),
	(0x0000_0200, "CKR_FUNCTION_REJECTED"),
	(0x8000_0000, "CKR_VENDOR_DEFINED"),
];

pub const USER_TYPES: NameTable = &[(0, "CKU_SO"), (1, "CKU_USER"), (2, "CKU_CONTEXT_SPECIFIC")];

pub const SESSION_STATES: NameTable = &[
	(0, "CKS_RO_PUBLIC_SESSION"),
	(1, "CKS_RO_USER_FUNCTIONS"),
	(2, "CKS_RW_PUBLIC_SESSION"),
	(3, "CKS_RW_USER_FUNCTIONS"),
	(4, "CKS_RW_SO_FUNCTIONS"),
];

pub const ATTRIBUTE_TYPES: NameTable = &[
	(0x0000_0000, "CKA_CLASS"),
	(0x0000_0001, "CKA_TOKEN"),
	(0x0000_0002, "CKA_PRIVATE"),
	(0x0000_0003, "CKA_LABEL"),
	(0x0000_0010, "CKA_APPLICATION"),
	(0x0000_0011, "CKA_VALUE"),
	(0x0000_0012, "CKA_OBJECT_ID"),
	(0x0000_0080, "CKA_CERTIFICATE_TYPE"),
	(0x0000_0081, "CKA_ISSUER"),
	(0x0000_0082, "CKA_SERIAL_NUMBER"),
	(0x0000_0083, "CKA_AC_ISSUER"),
	(0x0000_0084, "CKA_OWNER"),
	(0x0000_0085, "CKA_ATTR_TYPES"),
	(0x0000_0086, "CKA_TRUSTED"),
	(0x0000_0087, "CKA_CERTIFICATE_CATEGORY"),
	(0x0000_0088, "CKA_JAVA_MIDP_SECURITY_DOMAIN"),
	(0x0000_0089, "CKA_URL"),
	(0x0000_008A, "CKA_HASH_OF_SUBJECT_PUBLIC_KEY"),
	(0x0000_008B, "CKA_HASH_OF_ISSUER_PUBLIC_KEY"),
	(0x0000_008C, "CKA_NAME_HASH_ALGORITHM"),
	(0x0000_0090, "CKA_CHECK_VALUE"),
	(0x0000_0100, "CKA_KEY_TYPE"),
	(0x0000_0101, "CKA_SUBJECT"),
	(0x0000_0102, "CKA_ID"),
	(0x0000_0103, "CKA_SENSITIVE"),
	(0x0000_0104, "CKA_ENCRYPT"),
	(0x0000_0105, "CKA_DECRYPT"),
	(0x0000_0106, "CKA_WRAP"),
	(0x0000_0107, "CKA_UNWRAP"),
	(0x0000_0108, "CKA_SIGN"),
	(0x0000_0109, "CKA_SIGN_RECOVER"),
	(0x0000_010A, "CKA_VERIFY"),
	(0x0000_010B, "CKA_VERIFY_RECOVER"),
	(0x0000_010C, "CKA_DERIVE"),
	(0x0000_0110, "CKA_START_DATE"),
	(0x0000_0111, "CKA_END_DATE"),
	(0x0000_0120, "CKA_MODULUS"),
	(0x0000_0121, "CKA_MODULUS_BITS"),
	(0x0000_0122, "CKA_PUBLIC_EXPONENT"),
	(0x0000_0123, "CKA_PRIVATE_EXPONENT"),
	(0x0000_0124, "CKA_PRIME_1"),
	(0x0000_0125, "CKA_PRIME_2"),
	(0x0000_0126, "CKA_EXPONENT_1"),
	(0x0000_0127, "CKA_EXPONENT_2"),
	(0x0000_0128, "CKA_COEFFICIENT"),
	(0x0000_0129, "CKA_PUBLIC_KEY_INFO"),
	(0x0000_0130, "CKA_PRIME"),
	(0x0000_0131, "CKA_SUBPRIME"),
	(0x0000_0132, "CKA_BASE"),
	(0x0000_0133, "CKA_PRIME_BITS"),
	(0x0000_0134, "CKA_SUBPRIME_BITS"),
	(0x0000_0160, "CKA_VALUE_BITS"),
	(0x0000_0161, "CKA_VALUE_LEN"),
	(0x0000_0162, "CKA_EXTRACTABLE"),
	(0x0000_0163, "CKA_LOCAL"),
	(0x0000_0164, "CKA_NEVER_EXTRACTABLE"),
	(0x0000_0165, "CKA_ALWAYS_SENSITIVE"),
	(0x0000_0166, "CKA_KEY_GEN_MECHANISM"),
	(0x0000_0170, "CKA_MODIFIABLE"),
	(0x0000_0171, "CKA_COPYABLE"),
	(0x0000_0172, "CKA_DESTROYABLE"),
	(0x0000_0180, "CKA_EC_PARAMS"),
	(0x0000_0181, "CKA_EC_POINT"),
	(0x0000_0202, "CKA_ALWAYS_AUTHENTICATE"),
	(0x0000_0210, "CKA_WRAP_WITH_TRUSTED"),
	(0x4000_0211, "CKA_WRAP_TEMPLATE"),
	(0x4000_0212, "CKA_UNWRAP_TEMPLATE"),
	(0x4000_0213, "CKA_DERIVE_TEMPLATE"),
	(0x0000_0300, "CKA_HW_FEATURE_TYPE"),
	(0x0000_0301, "CKA_RESET_ON_INIT"),
	(0x0000_0302, "CKA_HAS_RESET"),
	(0x4000_0600, "CKA_ALLOWED_MECHANISMS"),
	(0x8000_0000, "CKA_VENDOR_DEFINED"),
];

pub const MECHANISM_TYPES: NameTable = &[
	(0x0000_0000, "CKM_RSA_PKCS_KEY_PAIR_GEN"),
	(0x0000_0001, "CKM_RSA_PKCS"),
	(0x0000_0002, "CKM_RSA_9796"),
	(0x0000_0003, "CKM_RSA_X_509"),
	(0x0000_0004, "CKM_MD2_RSA_PKCS"),
	(0x0000_0005, "CKM_MD5_RSA_PKCS"),
	(0x0000_0006, "CKM_SHA1_RSA_PKCS"),
	(0x0000_0009, "CKM_RSA_PKCS_OAEP"),
	(0x0000_000D, "CKM_RSA_PKCS_PSS"),
	(0x0000_000E, "CKM_SHA1_RSA_PKCS_PSS"),
	(0x0000_0010, "CKM_DSA_KEY_PAIR_GEN"),
	(0x0000_0011, "CKM_DSA"),
	(0x0000_0012, "CKM_DSA_SHA1"),
	(0x0000_0020, "CKM_DH_PKCS_KEY_PAIR_GEN"),
	(0x0000_0021, "CKM_DH_PKCS_DERIVE"),
	(0x0000_0040, "CKM_SHA256_RSA_PKCS"),
	(0x0000_0041, "CKM_SHA384_RSA_PKCS"),
	(0x0000_0042, "CKM_SHA512_RSA_PKCS"),
	(0x0000_0043, "CKM_SHA256_RSA_PKCS_PSS"),
	(0x0000_0044, "CKM_SHA384_RSA_PKCS_PSS"),
	(0x0000_0045, "CKM_SHA512_RSA_PKCS_PSS"),
	(0x0000_0046, "CKM_SHA224_RSA_PKCS"),
	(0x0000_0047, "CKM_SHA224_RSA_PKCS_PSS"),
	(0x0000_0120, "CKM_DES_KEY_GEN"),
	(0x0000_0121, "CKM_DES_ECB"),
	(0x0000_0122, "CKM_DES_CBC"),
	(0x0000_0125, "CKM_DES_CBC_PAD"),
	(0x0000_0131, "CKM_DES3_KEY_GEN"),
	(0x0000_0132, "CKM_DES3_ECB"),
	(0x0000_0133, "CKM_DES3_CBC"),
	(0x0000_0136, "CKM_DES3_CBC_PAD"),
	(0x0000_0200, "CKM_MD2"),
	(0x0000_0210, "CKM_MD5"),
	(0x0000_0220, "CKM_SHA_1"),
	(0x0000_0221, "CKM_SHA_1_HMAC"),
	(0x0000_0250, "CKM_SHA256"),
	(0x0000_0251, "CKM_SHA256_HMAC"),
	(0x0000_0255, "CKM_SHA224"),
	(0x0000_0256, "CKM_SHA224_HMAC"),
	(0x0000_0260, "CKM_SHA384"),
	(0x0000_0261, "CKM_SHA384_HMAC"),
	(0x0000_0270, "CKM_SHA512"),
	(0x0000_0271, "CKM_SHA512_HMAC"),
	(0x0000_0350, "CKM_GENERIC_SECRET_KEY_GEN"),
	(0x0000_1040, "CKM_EC_KEY_PAIR_GEN"),
	(0x0000_1041, "CKM_ECDSA"),
	(0x0000_1042, "CKM_ECDSA_SHA1"),
	(0x0000_1043, "CKM_ECDSA_SHA224"),
	(0x0000_1044, "CKM_ECDSA_SHA256"),
	(0x0000_1045, "CKM_ECDSA_SHA384"),
	(0x0000_1046, "CKM_ECDSA_SHA512"),
	(0x0000_1050, "CKM_ECDH1_DERIVE"),
	(0x0000_1051, "CKM_ECDH1_COFACTOR_DERIVE"),
	(0x0000_1080, "CKM_AES_KEY_GEN"),
	(0x0000_1081, "CKM_AES_ECB"),
	(0x0000_1082, "CKM_AES_CBC"),
	(0x0000_1083, "CKM_AES_MAC"),
	(0x0000_1084, "CKM_AES_MAC_GENERAL"),
	(0x0000_1085, "CKM_AES_CBC_PAD"),
	(0x0000_1086, "CKM_AES_CTR"),
	(0x0000_1087, "CKM_AES_GCM"),
	(0x0000_1088, "CKM_AES_CCM"),
	(0x0000_108A, "CKM_AES_CMAC"),
	(0x0000_2109, "CKM_AES_KEY_WRAP"),
	(0x0000_210A, "CKM_AES_KEY_WRAP_PAD"),
	(0x8000_0000, "CKM_VENDOR_DEFINED"),
];

pub const SESSION_FLAGS: NameTable = &[(0x0000_0002, "CKF_RW_SESSION"), (0x0000_0004, "CKF_SERIAL_SESSION")];

pub const INITIALIZE_FLAGS: NameTable = &[
	(0x0000_0001, "CKF_LIBRARY_CANT_CREATE_OS_THREADS"),
	(0x0000_0002, "CKF_OS_LOCKING_OK"),
];

pub const SLOT_FLAGS: NameTable = &[
	(0x0000_0001, "CKF_TOKEN_PRESENT"),
	(0x0000_0002, "CKF_REMOVABLE_DEVICE"),
	(0x0000_0004, "CKF_HW_SLOT"),
];

pub const TOKEN_FLAGS: NameTable = &[
	(0x0000_0001, "CKF_RNG"),
	(0x0000_0002, "CKF_WRITE_PROTECTED"),
	(0x0000_0004, "CKF_LOGIN_REQUIRED"),
	(0x0000_0008, "CKF_USER_PIN_INITIALIZED"),
	(0x0000_0020, "CKF_RESTORE_KEY_NOT_NEEDED"),
	(0x0000_0040, "CKF_CLOCK_ON_TOKEN"),
	(0x0000_0100, "CKF_PROTECTED_AUTHENTICATION_PATH"),
	(0x0000_0200, "CKF_DUAL_CRYPTO_OPERATIONS"),
	(0x0000_0400, "CKF_TOKEN_INITIALIZED"),
	(0x0000_0800, "CKF_SECONDARY_AUTHENTICATION"),
	(0x0001_0000, "CKF_USER_PIN_COUNT_LOW"),
	(0x0002_0000, "CKF_USER_PIN_FINAL_TRY"),
	(0x0004_0000, "CKF_USER_PIN_LOCKED"),
	(0x0008_0000, "CKF_USER_PIN_TO_BE_CHANGED"),
	(0x0010_0000, "CKF_SO_PIN_COUNT_LOW"),
	(0x0020_0000, "CKF_SO_PIN_FINAL_TRY"),
	(0x0040_0000, "CKF_SO_PIN_LOCKED"),
	(0x0080_0000, "CKF_SO_PIN_TO_BE_CHANGED"),
];

pub const MECHANISM_FLAGS: NameTable = &[
	(0x0000_0001, "CKF_HW"),
	(0x0000_0100, "CKF_ENCRYPT"),
	(0x0000_0200, "CKF_DECRYPT"),
	(0x0000_0400, "CKF_DIGEST"),
	(0x0000_0800, "CKF_SIGN"),
	(0x0000_1000, "CKF_SIGN_RECOVER"),
	(0x0000_2000, "CKF_VERIFY"),
	(0x0000_4000, "CKF_VERIFY_RECOVER"),
	(0x0000_8000, "CKF_GENERATE"),
	(0x0001_0000, "CKF_GENERATE_KEY_PAIR"),
	(0x0002_0000, "CKF_WRAP"),
	(0x0004_0000, "CKF_UNWRAP"),
	(0x0008_0000, "CKF_DERIVE"),
	(0x0010_0000, "CKF_EC_F_P"),
	(0x0020_0000, "CKF_EC_F_2M"),
	(0x0040_0000, "CKF_EC_ECPARAMETERS"),
	(0x0080_0000, "CKF_EC_NAMEDCURVE"),
	(0x0100_0000, "CKF_EC_UNCOMPRESS"),
	(0x0200_0000, "CKF_EC_COMPRESS"),
	(0x8000_0000, "CKF_EXTENSION"),
];

pub const WAIT_FLAGS: NameTable = &[(0x0000_0001, "CKF_DONT_BLOCK")];
