// src/engine/common.rs
//
// Common utilities shared across engine modules.
// Provides unified error handling and type aliases.

use crate::error::SnapStyleError;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Result type used by every engine module.
pub type EngineResult<T> = std::result::Result<T, SnapStyleError>;

/// Run a codec call and turn a panic inside it into `InternalPanic`.
///
/// Third-party decoders occasionally panic on hostile input; callers get an
/// error carrying the stage name instead of an unwinding thread.
pub fn run_with_panic_policy<T, F>(stage: &'static str, f: F) -> EngineResult<T>
where
    F: FnOnce() -> EngineResult<T>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let detail = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            Err(SnapStyleError::internal_panic(format!(
                "panic during {stage}: {detail}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn passes_through_ok_and_err() {
        assert_eq!(run_with_panic_policy("test", || Ok(7)).unwrap(), 7);
        let err = run_with_panic_policy::<(), _>("test", || {
            Err(SnapStyleError::decode_failed("bad"))
        })
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CodecError);
    }

    #[test]
    fn converts_panic_to_internal_error() {
        let err = run_with_panic_policy::<(), _>("decode:test", || panic!("boom")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InternalBug);
        let msg = err.to_string();
        assert!(msg.contains("decode:test"));
        assert!(msg.contains("boom"));
    }
}
