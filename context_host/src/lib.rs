pub mod config;
pub mod debug_sink;
mod error;
mod host;
pub mod platform;

pub use config::HostConfig;
pub use error::HostError;
pub use gl_interop::GlVersion;
pub use host::{ContextKind, GlContextHost};
pub use platform::{Platform, WindowHandle};

#[cfg(windows)]
pub use platform::windows::WglPlatform;

/// The host the emulator uses on Windows
#[cfg(windows)]
pub type NativeHost = GlContextHost<WglPlatform>;
