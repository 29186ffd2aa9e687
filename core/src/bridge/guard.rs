use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::api::{Error, Result};

/// Run `f`, turning a panic into [`Error::Panic`].
///
/// Panics must not unwind through the Lua runtime's frames.
pub fn contain<R>(f: impl FnOnce() -> R) -> Result<R> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let details = panic_details(payload.as_ref());
        warn!(%details, "host function panicked");
        Error::Panic(details)
    })
}

fn panic_details(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
