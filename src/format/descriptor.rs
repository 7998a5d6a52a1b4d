//! Declarative description of entry point parameters
//!
//! Every entry point has one static [`FunctionDescriptor`]. The formatter
//! renders any call from its descriptor and the captured [`ArgValue`]s, so
//! no entry point carries formatting code of its own.

use std::ffi::c_void;
use std::ptr;

use crate::ffi::{CK_BBOOL, CK_NOTIFY, CK_RV, CK_ULONG, CKR_OK};
use crate::format::names::NameTable;

/// Whether a parameter carries data into the call, out of it, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	In,
	Out,
	InOut,
}

impl Direction {
	#[must_use]
	pub const fn is_input(self) -> bool {
		matches!(self, Self::In | Self::InOut)
	}

	#[must_use]
	pub const fn is_output(self) -> bool {
		matches!(self, Self::Out | Self::InOut)
	}
}

/// Where the element count or byte length of a pointer parameter comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthSource {
	/// The scalar argument at this position
	Arg(usize),
	/// The `CK_ULONG` pointed to by the argument at this position
	Deref(usize),
	/// A fixed size, for blank padded fields
	Fixed(usize),
}

/// Semantic kind of a parameter
#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
	/// Plain `CK_ULONG`
	Ulong,
	/// Session, object, key or slot handle
	Handle,
	/// `CK_BBOOL`
	Bool,
	/// Bitmask with named bits
	Flags(NameTable),
	/// Enumerated value with symbolic names
	Named(NameTable),
	/// Pointer passed through untouched and never dereferenced
	Opaque,
	/// Function pointer supplied by the application
	Callback,
	/// Byte buffer
	Bytes(LengthSource),
	/// Byte buffer holding a secret such as a PIN
	Secret(LengthSource),
	/// Blank padded UTF-8 text
	Text(LengthSource),
	/// Pointer to a single `CK_ULONG`
	UlongRef,
	/// Array of `CK_ULONG` values, optionally with symbolic names
	UlongArray {
		count: LengthSource,
		names: Option<NameTable>,
	},
	/// `CK_MECHANISM_PTR`
	Mechanism,
	/// `CK_C_INITIALIZE_ARGS_PTR` passed as `CK_VOID_PTR`
	InitArgs,
	/// `CK_INFO_PTR`
	Info,
	/// `CK_SLOT_INFO_PTR`
	SlotInfo,
	/// `CK_TOKEN_INFO_PTR`
	TokenInfo,
	/// `CK_SESSION_INFO_PTR`
	SessionInfo,
	/// `CK_MECHANISM_INFO_PTR`
	MechanismInfo,
	/// Array of `CK_ATTRIBUTE`
	Template(LengthSource),
	/// `CK_FUNCTION_LIST_PTR_PTR`
	FunctionList,
}

/// One parameter of an entry point
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
	pub name: &'static str,
	pub kind: ParamKind,
	pub direction: Direction,
}

impl ParamSpec {
	#[must_use]
	pub const fn input(name: &'static str, kind: ParamKind) -> Self {
		Self {
			name,
			kind,
			direction: Direction::In,
		}
	}

	#[must_use]
	pub const fn output(name: &'static str, kind: ParamKind) -> Self {
		Self {
			name,
			kind,
			direction: Direction::Out,
		}
	}

	#[must_use]
	pub const fn in_out(name: &'static str, kind: ParamKind) -> Self {
		Self {
			name,
			kind,
			direction: Direction::InOut,
		}
	}

	/// Whether this parameter must be rendered as a secret
	#[must_use]
	pub const fn is_sensitive(&self) -> bool {
		matches!(self.kind, ParamKind::Secret(_))
	}
}

/// Static description of one entry point
#[derive(Debug)]
pub struct FunctionDescriptor {
	/// C name of the entry point
	pub name: &'static str,
	/// Parameters in call order
	pub params: &'static [ParamSpec],
	/// Statuses besides `CKR_OK` after which outputs are meaningful
	pub output_codes: &'static [CK_RV],
}

impl FunctionDescriptor {
	#[must_use]
	pub const fn new(name: &'static str, params: &'static [ParamSpec]) -> Self {
		Self {
			name,
			params,
			output_codes: &[],
		}
	}

	#[must_use]
	pub const fn with_output_codes(mut self, codes: &'static [CK_RV]) -> Self {
		self.output_codes = codes;
		self
	}

	/// Whether the real module wrote its outputs when returning `rv`
	#[must_use]
	pub fn outputs_valid(&self, rv: CK_RV) -> bool {
		rv == CKR_OK || self.output_codes.contains(&rv)
	}

	/// Names of the parameters rendered through the redaction placeholder
	pub fn sensitive_params(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.params.iter().filter(|p| p.is_sensitive()).map(|p| p.name)
	}
}

/// A captured argument value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgValue {
	Ulong(CK_ULONG),
	Byte(u8),
	Ptr(*const c_void),
}

impl ArgValue {
	/// The value as an unsigned integer
	#[must_use]
	pub fn as_ulong(self) -> CK_ULONG {
		match self {
			Self::Ulong(value) => value,
			Self::Byte(value) => CK_ULONG::from(value),
			Self::Ptr(ptr) => ptr as usize as CK_ULONG,
		}
	}

	/// The value as a pointer, null for non-pointer values
	#[must_use]
	pub const fn as_ptr(self) -> *const c_void {
		match self {
			Self::Ptr(ptr) => ptr,
			_ => ptr::null(),
		}
	}
}

impl From<CK_ULONG> for ArgValue {
	fn from(value: CK_ULONG) -> Self {
		Self::Ulong(value)
	}
}

impl From<CK_BBOOL> for ArgValue {
	fn from(value: CK_BBOOL) -> Self {
		Self::Byte(value)
	}
}

impl<T> From<*mut T> for ArgValue {
	fn from(value: *mut T) -> Self {
		Self::Ptr(value.cast_const().cast())
	}
}

impl<T> From<*const T> for ArgValue {
	fn from(value: *const T) -> Self {
		Self::Ptr(value.cast())
	}
}

impl From<CK_NOTIFY> for ArgValue {
	fn from(value: CK_NOTIFY) -> Self {
		Self::Ptr(value.map_or(ptr::null(), |f| f as *const c_void))
	}
}
