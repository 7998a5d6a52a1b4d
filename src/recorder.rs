//! Call recording against the process-wide runtime

use tracing::trace;

use crate::ffi::{CK_RV, CKR_GENERAL_ERROR};
use crate::format::{ArgValue, FunctionDescriptor};
use crate::runtime::{self, Runtime};

/// Record one intercepted call
///
/// Initializes the runtime if needed. When initialization failed the real
/// module is never reached and `CKR_GENERAL_ERROR` is returned.
///
/// # Safety
///
/// Same contract as [`Runtime::record`].
pub unsafe fn record<F>(descriptor: &FunctionDescriptor, args: &[ArgValue], invoke: F) -> CK_RV
where
	F: FnOnce(&Runtime) -> Option<CK_RV>,
{
	match runtime::get() {
		Ok(runtime) => unsafe { runtime.record(descriptor, args, invoke) },
		Err(e) => {
			trace!("{} rejected: {}", descriptor.name, e);
			CKR_GENERAL_ERROR
		},
	}
}
