use std::sync::Mutex;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Start capturing warnings instead of printing them.
///
/// Used by the JSON output path: captured warnings end up in the report's
/// `warnings` field so stdout stays machine-readable.
pub fn capture() {
    *BUFFER.lock().unwrap() = Some(Vec::new());
}

/// Stop capturing and return everything collected since `capture()`.
pub fn drain() -> Vec<String> {
    BUFFER.lock().unwrap().take().unwrap_or_default()
}

/// Report a warning. Captured while capture mode is active, otherwise
/// printed to stderr immediately.
pub fn warn(msg: String) {
    let mut guard = BUFFER.lock().unwrap();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("warning: {}", msg);
    }
}

/// Like `eprintln!` for warnings, routed through the capture buffer when it
/// is active.
#[macro_export]
macro_rules! warnln {
    ($($arg:tt)*) => {
        $crate::warnings::warn(format!($($arg)*))
    };
}
