use std::any::Any;
use std::panic::catch_unwind;
use std::panic::AssertUnwindSafe;

/// Runs `f`, turning a panic into its rendered message.
///
/// State captured by `f` may be left half-updated after a panic.
pub(crate) fn catch_unwind_detailed<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| render_payload(payload.as_ref()))
}

fn render_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return (*message).to_owned();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "<non-string panic payload>".to_owned()
}
