pub mod boundary;

use std::{fs::File, path::Path, sync::atomic::AtomicBool};

use log::info;
use simplelog::*;

static LOGGER_LOADED: AtomicBool = AtomicBool::new(false);

const LOG_FILE: &str = "gl_host.log";

/// Installs the terminal and file loggers the first time it is called.
pub fn init_logging() {
    install_loggers(Some(Path::new(LOG_FILE)));
}

fn install_loggers(log_file: Option<&Path>) {
    if LOGGER_LOADED.swap(true, std::sync::atomic::Ordering::Relaxed) {
        return;
    }

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Trace, Config::default(), file)),
            Err(err) => eprintln!("Could not create `{}`: {}", path.display(), err),
        }
    }

    // Another logger may already be installed by the embedding process
    if CombinedLogger::init(loggers).is_ok() {
        info!("Logging initialized");
    }
}

#[cfg(windows)]
mod exports {
    use std::ffi::c_void;

    use context_host::{NativeHost, WglPlatform};

    use crate::boundary;

    #[no_mangle]
    pub extern "system" fn gl_host_create() -> *mut NativeHost {
        crate::init_logging();
        boundary::create(WglPlatform::new())
    }

    #[no_mangle]
    #[allow(clippy::missing_safety_doc)]
    pub unsafe extern "system" fn gl_host_init(
        host: *mut NativeHost,
        window: *mut c_void,
        major: i32,
        minor: i32,
    ) -> i32 {
        boundary::init(host, window, major, minor)
    }

    #[no_mangle]
    #[allow(clippy::missing_safety_doc)]
    pub unsafe extern "system" fn gl_host_resize(host: *mut NativeHost, width: i32, height: i32) {
        boundary::resize(host, width, height)
    }

    #[no_mangle]
    #[allow(clippy::missing_safety_doc)]
    pub unsafe extern "system" fn gl_host_present(host: *mut NativeHost) {
        boundary::present(host)
    }

    #[no_mangle]
    #[allow(clippy::missing_safety_doc)]
    pub unsafe extern "system" fn gl_host_backbuffer_size(
        host: *const NativeHost,
        width: *mut i32,
        height: *mut i32,
    ) {
        boundary::backbuffer_size(host, width, height)
    }

    #[no_mangle]
    #[allow(clippy::missing_safety_doc)]
    pub unsafe extern "system" fn gl_host_version(
        host: *const NativeHost,
        major: *mut i32,
        minor: *mut i32,
    ) -> i32 {
        boundary::version(host, major, minor)
    }

    #[no_mangle]
    #[allow(clippy::missing_safety_doc)]
    pub unsafe extern "system" fn gl_host_destroy(host: *mut NativeHost) {
        boundary::destroy(host)
    }
}
