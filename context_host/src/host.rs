use gl_interop::apis::opengl::GlDevice;
use gl_interop::{Capability, GlVersion};
use log::{debug, error, info, trace, warn};

use crate::config::HostConfig;
use crate::debug_sink;
use crate::error::HostError;
use crate::platform::{Platform, PlatformExtensions, WindowHandle};

/// Which creation path produced the working context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Created through `wglCreateContextAttribsARB` with the requested version
    Core,
    /// The bootstrap context, kept because no attributed context could be made
    Legacy,
}

struct ActiveContext<P: Platform> {
    window: WindowHandle,
    surface: P::Surface,
    context: P::Context,
    kind: ContextKind,
    device: P::Device,
    version: GlVersion,
    version_string: Option<String>,
    debug_output: bool,
}

/// Owns one OpenGL rendering context bound to a host window.
///
/// Every method must be called on the thread that called [`GlContextHost::init`].
/// Dropping the host unbinds and deletes the context; the window and its drawing
/// surface belong to the caller.
pub struct GlContextHost<P: Platform> {
    platform: P,
    config: HostConfig,
    backbuffer_width: u32,
    backbuffer_height: u32,
    active: Option<ActiveContext<P>>,
    /// Contexts created by an init that has not finished yet
    pending: Vec<P::Context>,
}

impl<P: Platform> GlContextHost<P> {
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, HostConfig::default())
    }

    pub fn with_config(platform: P, config: HostConfig) -> Self {
        Self {
            platform,
            config,
            backbuffer_width: 0,
            backbuffer_height: 0,
            active: None,
            pending: Vec::new(),
        }
    }

    /// Creates the rendering context for `window` and makes it current.
    ///
    /// A legacy context is created first because the attributed-context entrypoint
    /// can only be resolved while a context is current. If the platform cannot make
    /// an attributed context the legacy one is kept, so callers needing 3.x features
    /// must check the returned version.
    pub fn init(
        &mut self,
        window: WindowHandle,
        major: u32,
        minor: u32,
    ) -> Result<GlVersion, HostError> {
        if self.active.is_some() {
            error!("init called on a host that already owns a context");
            return Err(HostError::AlreadyInitialized);
        }
        if window.is_null() {
            error!("init called with a null window handle");
            return Err(HostError::SurfaceUnavailable(0));
        }
        self.release_pending();

        let (width, height) = self.platform.client_size(window);
        debug!("Window client area is {}x{}", width, height);

        let surface = self.platform.acquire_surface(window).ok_or_else(|| {
            let err = HostError::SurfaceUnavailable(self.platform.last_error());
            error!("{}", err);
            err
        })?;

        let request = self.config.pixel_format;
        let format = self
            .platform
            .choose_pixel_format(surface, &request)
            .ok_or_else(|| {
                let err = HostError::PixelFormatUnavailable(self.platform.last_error());
                error!("{}", err);
                err
            })?;
        trace!("Chose pixel format {}", format.0);

        if !self.platform.set_pixel_format(surface, format, &request) {
            let err = HostError::PixelFormatBindFailed(self.platform.last_error());
            error!("{}", err);
            return Err(err);
        }

        let legacy = self.platform.create_legacy_context(surface).ok_or_else(|| {
            let err = HostError::ContextCreationFailed(self.platform.last_error());
            error!("Could not create the bootstrap context: {}", err);
            err
        })?;
        self.pending.push(legacy);
        if !self.platform.make_current(Some((surface, legacy))) {
            let err = HostError::ContextCreationFailed(self.platform.last_error());
            error!("Could not make the bootstrap context current: {}", err);
            self.forget(legacy);
            self.platform.delete_context(legacy);
            return Err(err);
        }
        debug!("Bootstrap context created");

        let device = match self.platform.load_device(surface) {
            Ok(device) => device,
            Err(msg) => {
                error!("Failed to initialize the GL function loader: {}", msg);
                self.discard(legacy);
                return Err(HostError::LoaderInitFailed(msg));
            }
        };

        let (context, kind, device) = self.upgrade(surface, legacy, device, major, minor)?;

        if !self.platform.set_swap_interval(self.config.swap_interval) {
            warn!(
                "Could not set the swap interval to {}",
                self.config.swap_interval
            );
        }

        let version = device.version();
        let version_string = device.version_string();
        info!(
            "Initialized OpenGL {} context ({})",
            version,
            version_string.as_deref().unwrap_or("unknown")
        );

        let debug_output = self.install_debug_sink(&device);
        self.enable_optional_features(&device);

        self.backbuffer_width = width;
        self.backbuffer_height = height;
        self.pending.clear();
        self.active = Some(ActiveContext {
            window,
            surface,
            context,
            kind,
            device,
            version,
            version_string,
            debug_output,
        });

        Ok(version)
    }

    /// Swaps the bootstrap context for an attributed one when the platform allows it.
    fn upgrade(
        &mut self,
        surface: P::Surface,
        legacy: P::Context,
        device: P::Device,
        major: u32,
        minor: u32,
    ) -> Result<(P::Context, ContextKind, P::Device), HostError> {
        let extensions = self.platform.extensions(surface);
        if !extensions.contains(PlatformExtensions::CREATE_CONTEXT) {
            warn!(
                "Attributed context creation is unavailable, keeping the legacy context instead of {}.{}",
                major, minor
            );
            return Ok((legacy, ContextKind::Legacy, device));
        }

        let profile_mask = extensions.contains(PlatformExtensions::CREATE_CONTEXT_PROFILE);
        if !profile_mask {
            warn!(
                "WGL_ARB_create_context_profile is unavailable, requesting {}.{} without a profile mask",
                major, minor
            );
        }
        let attribs = self.config.context_attribs(major, minor, profile_mask);
        debug!("Requesting context {:?}", attribs);

        let target = match self.platform.create_context_attribs(surface, &attribs) {
            Some(target) => target,
            None => {
                warn!(
                    "Could not create an OpenGL {}.{} context (os error {}), keeping the legacy context",
                    major,
                    minor,
                    self.platform.last_error()
                );
                return Ok((legacy, ContextKind::Legacy, device));
            }
        };
        self.pending.push(target);

        self.platform.make_current(None);
        if !self.platform.make_current(Some((surface, target))) {
            warn!(
                "Could not make the OpenGL {}.{} context current (os error {}), keeping the legacy context",
                major,
                minor,
                self.platform.last_error()
            );
            self.forget(target);
            self.platform.delete_context(target);
            if !self.platform.make_current(Some((surface, legacy))) {
                let err = HostError::ContextCreationFailed(self.platform.last_error());
                error!("Could not rebind the legacy context: {}", err);
                self.forget(legacy);
                self.platform.delete_context(legacy);
                return Err(err);
            }
            return Ok((legacy, ContextKind::Legacy, device));
        }
        self.forget(legacy);
        self.platform.delete_context(legacy);

        // Entrypoints are only guaranteed for the context they were resolved against
        match self.platform.load_device(surface) {
            Ok(device) => Ok((target, ContextKind::Core, device)),
            Err(msg) => {
                error!("Failed to reload GL functions for the new context: {}", msg);
                self.discard(target);
                Err(HostError::LoaderInitFailed(msg))
            }
        }
    }

    fn install_debug_sink(&self, device: &P::Device) -> bool {
        if !device.supports_debug_output() {
            debug!("Debug output is not supported by this context");
            return false;
        }
        if let Err(err) = device.enable(Capability::DebugOutputSynchronous) {
            error!("Failed to enable {} (GL error {:#x})", Capability::DebugOutputSynchronous, err);
        }
        unsafe {
            device.install_debug_callback(
                Some(debug_sink::debug_message_callback),
                std::ptr::null(),
            );
        }
        debug!("Debug message callback installed");
        true
    }

    fn enable_optional_features(&self, device: &P::Device) {
        let features = [
            (self.config.enable_seamless_cubemap, Capability::SeamlessCubeMap),
            (self.config.enable_srgb_framebuffer, Capability::FramebufferSrgb),
        ];
        for (wanted, capability) in features {
            if !wanted {
                continue;
            }
            if let Err(err) = device.enable(capability) {
                error!("Failed to enable {} (GL error {:#x})", capability, err);
            }
        }
    }

    fn forget(&mut self, context: P::Context) {
        self.pending.retain(|pending| *pending != context);
    }

    /// Releases contexts left behind when an earlier init unwound before finishing.
    fn release_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        warn!(
            "Releasing {} context(s) from an interrupted init",
            self.pending.len()
        );
        self.platform.make_current(None);
        for context in std::mem::take(&mut self.pending) {
            if !self.platform.delete_context(context) {
                warn!(
                    "Failed to delete rendering context (os error {})",
                    self.platform.last_error()
                );
            }
        }
    }

    fn discard(&mut self, context: P::Context) {
        self.forget(context);
        self.platform.make_current(None);
        if !self.platform.delete_context(context) {
            warn!(
                "Failed to delete rendering context (os error {})",
                self.platform.last_error()
            );
        }
    }

    /// Records the new backbuffer size. The GL surface follows the window by itself.
    pub fn resize(&mut self, width: u32, height: u32) {
        trace!("Backbuffer resized to {}x{}", width, height);
        self.backbuffer_width = width;
        self.backbuffer_height = height;
    }

    pub fn present(&mut self) {
        if let Some(active) = &self.active {
            if !self.platform.swap_buffers(active.surface) {
                warn!("SwapBuffers failed (os error {})", self.platform.last_error());
            }
        }
    }

    pub fn backbuffer_size(&self) -> (u32, u32) {
        (self.backbuffer_width, self.backbuffer_height)
    }

    /// The version the driver actually gave us, `None` before a successful init
    pub fn version(&self) -> Option<GlVersion> {
        self.active.as_ref().map(|active| active.version)
    }

    pub fn version_string(&self) -> Option<&str> {
        self.active
            .as_ref()
            .and_then(|active| active.version_string.as_deref())
    }

    pub fn context_kind(&self) -> Option<ContextKind> {
        self.active.as_ref().map(|active| active.kind)
    }

    pub fn debug_output_enabled(&self) -> bool {
        self.active.as_ref().map_or(false, |active| active.debug_output)
    }

    pub fn window(&self) -> Option<WindowHandle> {
        self.active.as_ref().map(|active| active.window)
    }

    pub fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    /// GL entrypoints for the current context
    pub fn device(&self) -> Option<&P::Device> {
        self.active.as_ref().map(|active| &active.device)
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Unbinds and deletes the context. Does nothing if there is none.
    pub fn destroy(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("Destroying OpenGL {} context", active.version);
            self.discard(active.context);
        }
        self.release_pending();
    }
}

impl<P: Platform> Drop for GlContextHost<P> {
    fn drop(&mut self) {
        self.destroy();
    }
}
