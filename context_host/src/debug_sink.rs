//! Receives `GL_KHR_debug` messages and forwards them to the platform debug channel.

use std::ffi::c_void;
use std::os::raw::c_char;

use gl_interop::debug;

/// Registered with `glDebugMessageCallback`. The user parameter is unused.
pub extern "system" fn debug_message_callback(
    _source: u32,
    ty: u32,
    _id: u32,
    severity: u32,
    length: i32,
    message: *const c_char,
    _user_param: *mut c_void,
) {
    emit(&record(ty, severity, length, message));
}

fn record(ty: u32, severity: u32, length: i32, message: *const c_char) -> String {
    let text = unsafe { debug::message_text(message, length) };
    debug::format_message(ty, severity, &text)
}

#[cfg(windows)]
fn emit(record: &str) {
    use std::ffi::CString;

    let record = CString::new(record.replace('\0', " ")).unwrap_or_default();
    unsafe { winapi::um::debugapi::OutputDebugStringA(record.as_ptr()) };
}

#[cfg(not(windows))]
fn emit(record: &str) {
    log::debug!(target: "gl_debug", "{}", record.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_carries_message_type_and_severity() {
        let message = b"X\0";
        let record = record(
            0x824C, // GL_DEBUG_TYPE_ERROR
            0x9146, // GL_DEBUG_SEVERITY_HIGH
            1,
            message.as_ptr() as *const c_char,
        );
        assert_eq!(record, "\nOPENGL DEBUG MESSAGE: X\nType: ERROR\nSeverity: HIGH\n");
    }

    #[test]
    fn null_message_yields_empty_text() {
        let record = record(0, 0, -1, std::ptr::null());
        assert_eq!(record, "\nOPENGL DEBUG MESSAGE: \nType: \nSeverity: \n");
    }
}
