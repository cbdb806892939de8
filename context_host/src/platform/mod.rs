#[cfg(windows)]
pub mod windows;

use std::ffi::c_void;
use std::fmt::Debug;

use bitflags::bitflags;
use gl_interop::apis::opengl::GlDevice;

use crate::config::{ContextAttribs, PixelFormatRequest};

/// Native window the host draws into. Borrowed: the host never destroys it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(pub *mut c_void);

impl WindowHandle {
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

/// Index of a pixel format offered by the drawing surface, always non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatId(pub i32);

bitflags! {
    /// Context-creation extensions advertised by the windowing system
    pub struct PlatformExtensions: u8 {
        const CREATE_CONTEXT         = 0b0000_0001;
        const CREATE_CONTEXT_PROFILE = 0b0000_0010;
        const SWAP_CONTROL           = 0b0000_0100;
    }
}

/// The windowing-system primitives the context host is built from.
///
/// Everything here runs on the thread that owns the context. Methods that can
/// fail return `None`/`false` and leave the reason in [`Platform::last_error`].
pub trait Platform {
    type Surface: Copy + Debug;
    type Context: Copy + PartialEq + Debug;
    type Device: GlDevice;

    fn client_size(&self, window: WindowHandle) -> (u32, u32);

    fn acquire_surface(&mut self, window: WindowHandle) -> Option<Self::Surface>;

    fn choose_pixel_format(
        &mut self,
        surface: Self::Surface,
        request: &PixelFormatRequest,
    ) -> Option<PixelFormatId>;

    fn set_pixel_format(
        &mut self,
        surface: Self::Surface,
        format: PixelFormatId,
        request: &PixelFormatRequest,
    ) -> bool;

    /// Creates a context without version attributes
    fn create_legacy_context(&mut self, surface: Self::Surface) -> Option<Self::Context>;

    /// Binds `context` to `surface` on this thread, `None` unbinds whatever is current.
    fn make_current(&mut self, binding: Option<(Self::Surface, Self::Context)>) -> bool;

    fn delete_context(&mut self, context: Self::Context) -> bool;

    /// Resolves GL and platform extension entrypoints against the current context.
    fn load_device(&mut self, surface: Self::Surface) -> Result<Self::Device, String>;

    /// Only meaningful after [`Platform::load_device`]
    fn extensions(&self, surface: Self::Surface) -> PlatformExtensions;

    fn create_context_attribs(
        &mut self,
        surface: Self::Surface,
        attribs: &ContextAttribs,
    ) -> Option<Self::Context>;

    fn set_swap_interval(&mut self, interval: i32) -> bool;

    fn swap_interval(&self) -> Option<i32>;

    fn swap_buffers(&mut self, surface: Self::Surface) -> bool;

    fn last_error(&self) -> u32;
}
