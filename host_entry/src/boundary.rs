//! Pointer-level operations behind the exported functions, generic over the platform.

use std::ffi::c_void;
use std::panic::{catch_unwind, AssertUnwindSafe};

use context_host::{GlContextHost, Platform, WindowHandle};
use log::error;

pub const STATUS_OK: i32 = 0;
pub const STATUS_PANIC: i32 = -100;
pub const STATUS_NULL_HOST: i32 = -101;
pub const STATUS_INVALID_ARGUMENT: i32 = -102;
pub const STATUS_NOT_INITIALIZED: i32 = -103;

pub fn create<P: Platform>(platform: P) -> *mut GlContextHost<P> {
    Box::into_raw(Box::new(GlContextHost::new(platform)))
}

fn guarded<T, F: FnOnce() -> T>(name: &str, fallback: T, f: F) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!("Panic in {}", name);
        fallback
    })
}

/// # Safety
///
/// `host` must be null or come from [`create`] and not have been destroyed.
pub unsafe fn init<P: Platform>(
    host: *mut GlContextHost<P>,
    window: *mut c_void,
    major: i32,
    minor: i32,
) -> i32 {
    let host = match host.as_mut() {
        Some(host) => host,
        None => return STATUS_NULL_HOST,
    };
    let (major, minor) = match (u32::try_from(major), u32::try_from(minor)) {
        (Ok(major), Ok(minor)) => (major, minor),
        _ => {
            error!("Invalid GL version requested: {}.{}", major, minor);
            return STATUS_INVALID_ARGUMENT;
        }
    };

    guarded("init", STATUS_PANIC, || {
        match host.init(WindowHandle(window), major, minor) {
            Ok(_) => STATUS_OK,
            Err(err) => err.code(),
        }
    })
}

/// # Safety
///
/// See [`init`].
pub unsafe fn resize<P: Platform>(host: *mut GlContextHost<P>, width: i32, height: i32) {
    if let Some(host) = host.as_mut() {
        host.resize(width.max(0) as u32, height.max(0) as u32);
    }
}

/// # Safety
///
/// See [`init`].
pub unsafe fn present<P: Platform>(host: *mut GlContextHost<P>) {
    if let Some(host) = host.as_mut() {
        guarded("present", (), || host.present());
    }
}

/// # Safety
///
/// See [`init`]. `width` and `height` must be null or writable.
pub unsafe fn backbuffer_size<P: Platform>(
    host: *const GlContextHost<P>,
    width: *mut i32,
    height: *mut i32,
) {
    let (w, h) = host.as_ref().map_or((0, 0), |host| host.backbuffer_size());
    if let Some(width) = width.as_mut() {
        *width = i32::try_from(w).unwrap_or(i32::MAX);
    }
    if let Some(height) = height.as_mut() {
        *height = i32::try_from(h).unwrap_or(i32::MAX);
    }
}

/// # Safety
///
/// See [`backbuffer_size`].
pub unsafe fn version<P: Platform>(
    host: *const GlContextHost<P>,
    major: *mut i32,
    minor: *mut i32,
) -> i32 {
    let host = match host.as_ref() {
        Some(host) => host,
        None => return STATUS_NULL_HOST,
    };
    let version = match host.version() {
        Some(version) => version,
        None => return STATUS_NOT_INITIALIZED,
    };
    if let Some(major) = major.as_mut() {
        *major = version.major as i32;
    }
    if let Some(minor) = minor.as_mut() {
        *minor = version.minor as i32;
    }
    STATUS_OK
}

/// # Safety
///
/// `host` must be null or come from [`create`]; it is invalid afterwards.
pub unsafe fn destroy<P: Platform>(host: *mut GlContextHost<P>) {
    if host.is_null() {
        return;
    }
    let host = Box::from_raw(host);
    guarded("destroy", (), move || drop(host));
}
