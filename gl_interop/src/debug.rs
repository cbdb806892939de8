//! Classification and formatting of `GL_KHR_debug` messages.

use std::borrow::Cow;
use std::ffi::CStr;
use std::fmt::Write;
use std::os::raw::c_char;

use crate::apis::opengl::bindings as gl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugType {
    Error,
    DeprecatedBehavior,
    UndefinedBehavior,
    Portability,
    Performance,
    Other,
}

impl DebugType {
    pub fn from_gl(ty: u32) -> Option<Self> {
        match ty {
            gl::DEBUG_TYPE_ERROR => Some(DebugType::Error),
            gl::DEBUG_TYPE_DEPRECATED_BEHAVIOR => Some(DebugType::DeprecatedBehavior),
            gl::DEBUG_TYPE_UNDEFINED_BEHAVIOR => Some(DebugType::UndefinedBehavior),
            gl::DEBUG_TYPE_PORTABILITY => Some(DebugType::Portability),
            gl::DEBUG_TYPE_PERFORMANCE => Some(DebugType::Performance),
            gl::DEBUG_TYPE_OTHER => Some(DebugType::Other),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DebugType::Error => "ERROR",
            DebugType::DeprecatedBehavior => "DEPRECATED_BEHAVIOR",
            DebugType::UndefinedBehavior => "UNDEFINED_BEHAVIOR",
            DebugType::Portability => "PORTABILITY",
            DebugType::Performance => "PERFORMANCE",
            DebugType::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DebugSeverity {
    Low,
    Medium,
    High,
}

impl DebugSeverity {
    /// `GL_DEBUG_SEVERITY_NOTIFICATION` has no label and maps to `None`
    pub fn from_gl(severity: u32) -> Option<Self> {
        match severity {
            gl::DEBUG_SEVERITY_LOW => Some(DebugSeverity::Low),
            gl::DEBUG_SEVERITY_MEDIUM => Some(DebugSeverity::Medium),
            gl::DEBUG_SEVERITY_HIGH => Some(DebugSeverity::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DebugSeverity::Low => "LOW",
            DebugSeverity::Medium => "MEDIUM",
            DebugSeverity::High => "HIGH",
        }
    }
}

/// Builds the multi-line record written to the debug channel.
///
/// Unknown type or severity codes leave their field empty; the message body is
/// always present.
pub fn format_message(ty: u32, severity: u32, message: &str) -> String {
    let mut record = String::with_capacity(message.len() + 64);

    let _ = writeln!(record);
    let _ = writeln!(record, "OPENGL DEBUG MESSAGE: {}", message);
    let _ = writeln!(
        record,
        "Type: {}",
        DebugType::from_gl(ty).map_or("", DebugType::label)
    );
    let _ = writeln!(
        record,
        "Severity: {}",
        DebugSeverity::from_gl(severity).map_or("", DebugSeverity::label)
    );

    record
}

/// Reads the text handed to a debug callback.
///
/// # Safety
///
/// `message` must be null, or point to at least `length` readable bytes when
/// `length` is non-negative, or to a NUL-terminated string otherwise.
pub unsafe fn message_text<'a>(message: *const c_char, length: i32) -> Cow<'a, str> {
    if message.is_null() {
        return Cow::Borrowed("");
    }
    if length >= 0 {
        let bytes = std::slice::from_raw_parts(message as *const u8, length as usize);
        // Some drivers count the terminator in `length`
        let bytes = bytes.strip_suffix(b"\0").unwrap_or(bytes);
        String::from_utf8_lossy(bytes)
    } else {
        CStr::from_ptr(message).to_string_lossy()
    }
}
