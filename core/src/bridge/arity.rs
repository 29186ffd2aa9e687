use crate::api::{Error, Result};

/// Number of arguments a call binds.
///
/// A fixed function binds exactly `params` arguments; surplus ones are
/// ignored. A variadic function whose fixed parameters are all covered binds
/// everything supplied, and otherwise needs the full parameter count.
pub fn resolve_arity(params: usize, variadic: bool, supplied: usize) -> Result<usize> {
    let resolved = if variadic && supplied + 1 >= params {
        supplied
    } else {
        params
    };
    if resolved > supplied {
        return Err(Error::Arity { resolved, supplied });
    }
    Ok(resolved)
}
