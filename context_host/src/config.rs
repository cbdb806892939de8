use bitflags::bitflags;

bitflags! {
    /// Pixel format requirements, bit values match `PIXELFORMATDESCRIPTOR::dwFlags`
    pub struct PixelFormatFlags: u32 {
        const DOUBLEBUFFER   = 0x0000_0001;
        const DRAW_TO_WINDOW = 0x0000_0004;
        const SUPPORT_OPENGL = 0x0000_0020;
    }
}

bitflags! {
    /// Bit values match `WGL_CONTEXT_FLAGS_ARB`
    pub struct ContextFlags: u32 {
        const DEBUG              = 0x0000_0001;
        const FORWARD_COMPATIBLE = 0x0000_0002;
    }
}

/// The pixel format asked of the drawing surface. Pixel type is always RGBA and
/// the layer is always the main plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatRequest {
    pub flags: PixelFormatFlags,
    pub color_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
}

impl Default for PixelFormatRequest {
    fn default() -> Self {
        Self {
            flags: PixelFormatFlags::DOUBLEBUFFER
                | PixelFormatFlags::SUPPORT_OPENGL
                | PixelFormatFlags::DRAW_TO_WINDOW,
            color_bits: 32,
            depth_bits: 32,
            stencil_bits: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Core,
    Compatibility,
}

/// Attributes for the attributed (`wglCreateContextAttribsARB`) context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextAttribs {
    pub major: u32,
    pub minor: u32,
    pub flags: ContextFlags,
    /// `None` when the platform cannot take a profile mask
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub pixel_format: PixelFormatRequest,
    /// Request a debug context. Defaults to on in debug builds.
    pub debug_context: bool,
    pub forward_compatible: bool,
    /// 0 disables vsync
    pub swap_interval: i32,
    pub enable_seamless_cubemap: bool,
    pub enable_srgb_framebuffer: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormatRequest::default(),
            debug_context: cfg!(debug_assertions),
            forward_compatible: true,
            swap_interval: 0,
            enable_seamless_cubemap: true,
            enable_srgb_framebuffer: true,
        }
    }
}

impl HostConfig {
    pub fn context_attribs(&self, major: u32, minor: u32, core_profile: bool) -> ContextAttribs {
        let mut flags = ContextFlags::empty();
        flags.set(ContextFlags::FORWARD_COMPATIBLE, self.forward_compatible);
        flags.set(ContextFlags::DEBUG, self.debug_context);

        ContextAttribs {
            major,
            minor,
            flags,
            profile: core_profile.then(|| Profile::Core),
        }
    }
}
