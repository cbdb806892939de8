use thiserror::Error;

/// Failures raised while bringing up a context. All of them are fatal for `init`
/// and leave the host without a context.
///
/// The `u32` payloads carry the platform's last-error code (`GetLastError` on
/// Windows), 0 when none was available.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Could not acquire a drawing surface for the window (os error {0})")]
    SurfaceUnavailable(u32),
    #[error("Invalid Pixel Format: no pixel format matches the request (os error {0})")]
    PixelFormatUnavailable(u32),
    #[error("Failed to set Pixel Format (os error {0})")]
    PixelFormatBindFailed(u32),
    #[error("Failed to initialize the GL function loader: {0}")]
    LoaderInitFailed(String),
    #[error("Failed to create an OpenGL rendering context (os error {0})")]
    ContextCreationFailed(u32),
    #[error("The host already owns a rendering context")]
    AlreadyInitialized,
}

impl HostError {
    /// Status reported across the C ABI, always negative
    pub fn code(&self) -> i32 {
        match self {
            HostError::SurfaceUnavailable(_) => -1,
            HostError::PixelFormatUnavailable(_) => -2,
            HostError::PixelFormatBindFailed(_) => -3,
            HostError::LoaderInitFailed(_) => -4,
            HostError::ContextCreationFailed(_) => -5,
            HostError::AlreadyInitialized => -6,
        }
    }
}
