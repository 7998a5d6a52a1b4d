//! Generic rendering of captured arguments into a line body

use std::ffi::c_void;
use std::fmt::Write;
use std::mem;
use std::ptr;
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use crate::ffi::{
	CK_ATTRIBUTE, CK_C_INITIALIZE_ARGS, CK_FUNCTION_LIST_PTR, CK_INFO, CK_MECHANISM, CK_MECHANISM_INFO, CK_RV,
	CK_SESSION_INFO, CK_SLOT_INFO, CK_TOKEN_INFO, CK_ULONG, CK_UNAVAILABLE_INFORMATION, CK_VERSION,
	CKF_ARRAY_ATTRIBUTE,
};
use crate::format::descriptor::{ArgValue, FunctionDescriptor, LengthSource, ParamKind, ParamSpec};
use crate::format::names::{self, NameTable};
use crate::runtime::FormatError;
use crate::sink::Phase;

/// Marker for a null pointer
pub const NULL: &str = "NULL";
/// Marker for a value that cannot be rendered safely
pub const UNREADABLE: &str = "*** cannot be displayed ***";
/// Placeholder for a redacted secret
pub const REDACTED: &str = "*** Intentionally hidden ***";
/// Largest buffer the formatter will read, in bytes
pub const DUMP_LIMIT: usize = 64 * 1024 * 1024;
/// Deepest level of nested attribute templates that is followed
pub const MAX_TEMPLATE_DEPTH: usize = 4;

type FormatResult<T> = std::result::Result<T, FormatError>;

/// Render the body of a trace line
///
/// On [`Phase::Call`] the body lists every parameter, with the contents of
/// input pointers. On [`Phase::Return`] it starts with the status, lists every
/// parameter again and adds the contents of output pointers when `rv` says the
/// module wrote them. `rv` is ignored for call lines.
///
/// Never panics; anything that cannot be rendered becomes [`UNREADABLE`].
///
/// # Safety
///
/// Every non-null pointer in `args` must be valid for the reads implied by
/// `descriptor`, with lengths taken from the arguments it names.
#[must_use]
pub unsafe fn format_arguments(
	descriptor: &FunctionDescriptor,
	phase: Phase,
	args: &[ArgValue],
	rv: CK_RV,
	reveal_secrets: bool,
) -> String {
	let renderer = Renderer {
		descriptor,
		args,
		phase,
		rv,
		reveal_secrets,
	};
	panic::catch_unwind(AssertUnwindSafe(|| unsafe { renderer.render() })).unwrap_or_else(|_| UNREADABLE.to_owned())
}

/// `rv: <decimal> (<name>)`
#[must_use]
pub fn format_rv(rv: CK_RV) -> String {
	format!("rv: {rv} ({})", names::lookup(names::RETURN_VALUES, rv))
}

struct Renderer<'a> {
	descriptor: &'a FunctionDescriptor,
	args: &'a [ArgValue],
	phase: Phase,
	rv: CK_RV,
	reveal_secrets: bool,
}

impl Renderer<'_> {
	unsafe fn render(&self) -> String {
		let mut fragments = Vec::with_capacity(self.descriptor.params.len() * 2 + 1);
		if self.phase == Phase::Return {
			fragments.push(format_rv(self.rv));
		}

		for (index, param) in self.descriptor.params.iter().enumerate() {
			let value = self.arg(index);
			unsafe { self.render_param(param, value, &mut fragments) };
		}

		fragments.join(", ")
	}

	fn arg(&self, index: usize) -> ArgValue {
		self.args.get(index).copied().unwrap_or(ArgValue::Ulong(0))
	}

	/// Whether the pointee of `param` is meaningful on this line
	fn contents_visible(&self, param: &ParamSpec) -> bool {
		match self.phase {
			Phase::Call => param.direction.is_input(),
			Phase::Return => param.direction.is_output() && self.descriptor.outputs_valid(self.rv),
		}
	}

	unsafe fn render_param(&self, param: &ParamSpec, value: ArgValue, out: &mut Vec<String>) {
		let name = param.name;
		match param.kind {
			ParamKind::Ulong | ParamKind::Handle | ParamKind::Bool => {
				out.push(format!("{name}: {}", value.as_ulong()));
			},
			ParamKind::Named(table) => {
				let raw = value.as_ulong();
				out.push(format!("{name}: {raw} ({})", names::lookup(table, raw)));
			},
			ParamKind::Flags(table) => {
				out.push(format!("{name}: {}", flags(table, value.as_ulong())));
			},
			ParamKind::Opaque | ParamKind::Callback => {
				out.push(format!("{name}: {}", address(value.as_ptr())));
			},
			kind => {
				let ptr = value.as_ptr();
				out.push(format!("{name}: {}", address(ptr)));
				if !self.contents_visible(param) {
					return;
				}
				if let ParamKind::Secret(_) = kind {
					if !self.reveal_secrets {
						out.push(format!("*{name}: {REDACTED}"));
						return;
					}
				}
				if ptr.is_null() {
					return;
				}
				let contents = unsafe { self.render_pointee(param, ptr) }.unwrap_or_else(|_| UNREADABLE.to_owned());
				out.push(format!("*{name}: {contents}"));
			},
		}
	}

	unsafe fn render_pointee(&self, param: &ParamSpec, ptr: *const c_void) -> FormatResult<String> {
		unsafe {
			match param.kind {
				ParamKind::Bytes(len) => Ok(hex(bytes(ptr, self.length(len, 1)?))),
				ParamKind::Secret(len) => Ok(text(bytes(ptr, self.length(len, 1)?))),
				ParamKind::Text(len) => Ok(text(bytes(ptr, self.length(len, 1)?))),
				ParamKind::UlongRef => Ok(read::<CK_ULONG>(ptr).to_string()),
				ParamKind::UlongArray { count, names: table } => {
					let count = self.length(count, mem::size_of::<CK_ULONG>())?;
					let items = (0..count)
						.map(|i| {
							let item = ptr.cast::<CK_ULONG>().add(i).read_unaligned();
							match table {
								Some(table) => format!("{item} ({})", names::lookup(table, item)),
								None => item.to_string(),
							}
						})
						.collect::<Vec<_>>();
					Ok(format!("[{}]", items.join(", ")))
				},
				ParamKind::Mechanism => mechanism(&read::<CK_MECHANISM>(ptr)),
				ParamKind::InitArgs => Ok(init_args(&read::<CK_C_INITIALIZE_ARGS>(ptr))),
				ParamKind::Info => Ok(info(&read::<CK_INFO>(ptr))),
				ParamKind::SlotInfo => Ok(slot_info(&read::<CK_SLOT_INFO>(ptr))),
				ParamKind::TokenInfo => Ok(token_info(&read::<CK_TOKEN_INFO>(ptr))),
				ParamKind::SessionInfo => Ok(session_info(&read::<CK_SESSION_INFO>(ptr))),
				ParamKind::MechanismInfo => Ok(mechanism_info(&read::<CK_MECHANISM_INFO>(ptr))),
				ParamKind::Template(count) => {
					let count = self.length(count, mem::size_of::<CK_ATTRIBUTE>())?;
					// Call lines of in/out templates carry no values yet
					let with_values = self.phase == Phase::Return || !param.direction.is_output();
					template(ptr.cast(), count, with_values, 1)
				},
				ParamKind::FunctionList => Ok(address(read::<CK_FUNCTION_LIST_PTR>(ptr).cast_const().cast())),
				ParamKind::Ulong
				| ParamKind::Handle
				| ParamKind::Bool
				| ParamKind::Named(_)
				| ParamKind::Flags(_)
				| ParamKind::Opaque
				| ParamKind::Callback => Ok(String::new()),
			}
		}
	}

	/// Resolve an element count, bounded by [`DUMP_LIMIT`] bytes
	unsafe fn length(&self, source: LengthSource, element_size: usize) -> FormatResult<usize> {
		let raw = match source {
			LengthSource::Fixed(n) => return Ok(n),
			LengthSource::Arg(index) => self.arg(index).as_ulong(),
			LengthSource::Deref(index) => {
				let ptr = self.arg(index).as_ptr();
				if ptr.is_null() {
					return Err(FormatError::NullLengthPointer);
				}
				unsafe { read::<CK_ULONG>(ptr) }
			},
		};
		checked_count(raw, element_size)
	}
}

fn checked_count(raw: CK_ULONG, element_size: usize) -> FormatResult<usize> {
	if raw == CK_UNAVAILABLE_INFORMATION {
		return Err(FormatError::UnavailableLength);
	}
	let wide = u64::from(raw);
	usize::try_from(raw)
		.ok()
		.filter(|count| count.checked_mul(element_size).is_some_and(|bytes| bytes <= DUMP_LIMIT))
		.ok_or(FormatError::LengthOutOfRange(wide))
}

unsafe fn read<T>(ptr: *const c_void) -> T {
	unsafe { ptr.cast::<T>().read_unaligned() }
}

unsafe fn bytes<'a>(ptr: *const c_void, len: usize) -> &'a [u8] {
	if len == 0 {
		return &[];
	}
	unsafe { slice::from_raw_parts(ptr.cast::<u8>(), len) }
}

fn address(ptr: *const c_void) -> String {
	if ptr.is_null() { NULL.to_owned() } else { format!("{ptr:p}") }
}

fn hex(data: &[u8]) -> String {
	let mut out = String::with_capacity(data.len() * 2 + 5);
	out.push_str("HEX(");
	for byte in data {
		let _ = write!(out, "{byte:02X}");
	}
	out.push(')');
	out
}

/// Lossy UTF-8 with control characters escaped, keeping the record on one line
fn lossy(data: &[u8]) -> String {
	let decoded = String::from_utf8_lossy(data);
	let mut out = String::with_capacity(decoded.len());
	for c in decoded.chars() {
		if c.is_control() {
			out.extend(c.escape_default());
		} else {
			out.push(c);
		}
	}
	out
}

/// Fixed size text, cut at the first NUL
fn text(data: &[u8]) -> String {
	let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
	lossy(&data[..end])
}

fn flags(table: NameTable, value: CK_ULONG) -> String {
	let set = names::flag_names(table, value);
	if set.is_empty() { value.to_string() } else { format!("{value} ({set})") }
}

fn version(v: &CK_VERSION) -> String {
	format!("{}.{}", v.major, v.minor)
}

fn structure(fields: &[(&str, String)]) -> String {
	let body = fields
		.iter()
		.map(|(name, value)| format!("{name}: {value}"))
		.collect::<Vec<_>>()
		.join(", ");
	format!("{{{body}}}")
}

unsafe fn mechanism(m: &CK_MECHANISM) -> FormatResult<String> {
	let mut fields = vec![
		(
			"mechanism",
			format!("{} ({})", m.mechanism, names::lookup(names::MECHANISM_TYPES, m.mechanism)),
		),
		("pParameter", address(m.pParameter.cast_const())),
		("ulParameterLen", m.ulParameterLen.to_string()),
	];
	if !m.pParameter.is_null() {
		let len = checked_count(m.ulParameterLen, 1)?;
		let data = unsafe { bytes(m.pParameter.cast_const(), len) };
		fields.push(("*pParameter", hex(data)));
	}
	Ok(structure(&fields))
}

fn callback(f: Option<*const c_void>) -> String {
	address(f.unwrap_or(ptr::null()))
}

fn init_args(args: &CK_C_INITIALIZE_ARGS) -> String {
	structure(&[
		("CreateMutex", callback(args.CreateMutex.map(|f| f as *const c_void))),
		("DestroyMutex", callback(args.DestroyMutex.map(|f| f as *const c_void))),
		("LockMutex", callback(args.LockMutex.map(|f| f as *const c_void))),
		("UnlockMutex", callback(args.UnlockMutex.map(|f| f as *const c_void))),
		("flags", flags(names::INITIALIZE_FLAGS, args.flags)),
		("pReserved", address(args.pReserved.cast_const())),
	])
}

fn info(i: &CK_INFO) -> String {
	structure(&[
		("cryptokiVersion", version(&i.cryptokiVersion)),
		("manufacturerID", text(&i.manufacturerID)),
		("flags", i.flags.to_string()),
		("libraryDescription", text(&i.libraryDescription)),
		("libraryVersion", version(&i.libraryVersion)),
	])
}

fn slot_info(i: &CK_SLOT_INFO) -> String {
	structure(&[
		("slotDescription", text(&i.slotDescription)),
		("manufacturerID", text(&i.manufacturerID)),
		("flags", flags(names::SLOT_FLAGS, i.flags)),
		("hardwareVersion", version(&i.hardwareVersion)),
		("firmwareVersion", version(&i.firmwareVersion)),
	])
}

fn token_info(i: &CK_TOKEN_INFO) -> String {
	structure(&[
		("label", text(&i.label)),
		("manufacturerID", text(&i.manufacturerID)),
		("model", text(&i.model)),
		("serialNumber", text(&i.serialNumber)),
		("flags", flags(names::TOKEN_FLAGS, i.flags)),
		("ulMaxSessionCount", i.ulMaxSessionCount.to_string()),
		("ulSessionCount", i.ulSessionCount.to_string()),
		("ulMaxRwSessionCount", i.ulMaxRwSessionCount.to_string()),
		("ulRwSessionCount", i.ulRwSessionCount.to_string()),
		("ulMaxPinLen", i.ulMaxPinLen.to_string()),
		("ulMinPinLen", i.ulMinPinLen.to_string()),
		("ulTotalPublicMemory", i.ulTotalPublicMemory.to_string()),
		("ulFreePublicMemory", i.ulFreePublicMemory.to_string()),
		("ulTotalPrivateMemory", i.ulTotalPrivateMemory.to_string()),
		("ulFreePrivateMemory", i.ulFreePrivateMemory.to_string()),
		("hardwareVersion", version(&i.hardwareVersion)),
		("firmwareVersion", version(&i.firmwareVersion)),
		("utcTime", text(&i.utcTime)),
	])
}

fn session_info(i: &CK_SESSION_INFO) -> String {
	structure(&[
		("slotID", i.slotID.to_string()),
		(
			"state",
			format!("{} ({})", i.state, names::lookup(names::SESSION_STATES, i.state)),
		),
		("flags", flags(names::SESSION_FLAGS, i.flags)),
		("ulDeviceError", i.ulDeviceError.to_string()),
	])
}

fn mechanism_info(i: &CK_MECHANISM_INFO) -> String {
	structure(&[
		("ulMinKeySize", i.ulMinKeySize.to_string()),
		("ulMaxKeySize", i.ulMaxKeySize.to_string()),
		("flags", flags(names::MECHANISM_FLAGS, i.flags)),
	])
}

/// Render `count` attributes starting at `first`
unsafe fn template(first: *const CK_ATTRIBUTE, count: usize, with_values: bool, depth: usize) -> FormatResult<String> {
	if depth > MAX_TEMPLATE_DEPTH {
		return Err(FormatError::NestingTooDeep);
	}
	let mut items = Vec::with_capacity(count);
	for i in 0..count {
		let attr = unsafe { first.add(i).read_unaligned() };
		items.push(unsafe { attribute(&attr, with_values, depth) });
	}
	Ok(format!("[{}]", items.join(", ")))
}

unsafe fn attribute(attr: &CK_ATTRIBUTE, with_values: bool, depth: usize) -> String {
	let mut fields = vec![
		(
			"type",
			format!("{} ({})", attr.type_, names::lookup(names::ATTRIBUTE_TYPES, attr.type_)),
		),
		("pValue", address(attr.pValue.cast_const())),
		("ulValueLen", attr.ulValueLen.to_string()),
	];
	if with_values && !attr.pValue.is_null() {
		let value = unsafe { attribute_value(attr, depth) }.unwrap_or_else(|_| UNREADABLE.to_owned());
		fields.push(("*pValue", value));
	}
	structure(&fields)
}

unsafe fn attribute_value(attr: &CK_ATTRIBUTE, depth: usize) -> FormatResult<String> {
	let len = checked_count(attr.ulValueLen, 1)?;
	let nested = mem::size_of::<CK_ATTRIBUTE>();
	if attr.type_ & CKF_ARRAY_ATTRIBUTE != 0 && len % nested == 0 {
		return unsafe { template(attr.pValue.cast_const().cast(), len / nested, true, depth + 1) };
	}
	Ok(hex(unsafe { bytes(attr.pValue.cast_const(), len) }))
}
