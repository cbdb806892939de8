use std::ffi::{c_void, CStr};

use log::{trace, warn};

use crate::{Capability, GlVersion};

#[allow(clippy::all, non_camel_case_types, non_snake_case, non_upper_case_globals)]
pub mod bindings {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

pub use bindings::types::GLDEBUGPROC as DebugProc;

lazy_static::lazy_static! {
    static ref GL_CAPABILITIES: bimap::BiHashMap<Capability, u32> = {
        [
            (Capability::SeamlessCubeMap, bindings::TEXTURE_CUBE_MAP_SEAMLESS),
            (Capability::FramebufferSrgb, bindings::FRAMEBUFFER_SRGB),
            (Capability::DebugOutputSynchronous, bindings::DEBUG_OUTPUT_SYNCHRONOUS),
        ]
        .into_iter()
        .collect::<bimap::BiHashMap<_, _>>()
    };
}

pub type GlError = u32;
pub type GlResult<T> = Result<T, GlError>;

/// Upper bound on `glGetError` polling, a lost context can report errors forever
const MAX_DRAINED_ERRORS: usize = 64;

/// The handful of GL entrypoints the context host needs, over the current context.
///
/// Implementors provide the raw calls; version negotiation, extension lookup and
/// capability enables are built on top of them.
pub trait GlDevice {
    fn get_error(&self) -> GlError;

    fn get_integer(&self, pname: u32) -> i32;

    fn get_string(&self, name: u32) -> Option<String>;

    fn get_string_i(&self, name: u32, index: u32) -> Option<String>;

    fn enable_raw(&self, cap: u32);

    /// Whether `glDebugMessageCallback` resolved to a real symbol
    fn debug_callback_loaded(&self) -> bool;

    /// Registers `callback` and subscribes it to every source, type and severity.
    ///
    /// # Safety
    ///
    /// `user_param` must stay valid for as long as the callback can fire.
    unsafe fn install_debug_callback(&self, callback: DebugProc, user_param: *const c_void);

    /// Clears pending errors, returning the first one seen.
    fn drain_errors(&self) -> Option<GlError> {
        let mut first = None;
        for _ in 0..MAX_DRAINED_ERRORS {
            match self.get_error() {
                bindings::NO_ERROR => break,
                err => {
                    first.get_or_insert(err);
                }
            }
        }
        first
    }

    fn version_string(&self) -> Option<String> {
        self.get_string(bindings::VERSION)
    }

    /// The version of the current context.
    ///
    /// `GL_MAJOR_VERSION` only exists from 3.0, on older contexts the query raises
    /// `GL_INVALID_ENUM` and the `GL_VERSION` string is parsed instead.
    fn version(&self) -> GlVersion {
        self.drain_errors();

        let major = self.get_integer(bindings::MAJOR_VERSION);
        if self.get_error() == bindings::NO_ERROR && major > 0 {
            let minor = self.get_integer(bindings::MINOR_VERSION);
            if self.get_error() == bindings::NO_ERROR && minor >= 0 {
                return GlVersion::new(major as u32, minor as u32);
            }
        }

        self.version_string()
            .as_deref()
            .and_then(GlVersion::parse)
            .unwrap_or_else(|| {
                warn!("Could not determine the context version, assuming {}", GlVersion::LEGACY);
                GlVersion::LEGACY
            })
    }

    fn extensions(&self) -> Vec<String> {
        self.extensions_for(self.version())
    }

    /// Lists extensions without re-querying the version of the current context.
    fn extensions_for(&self, version: GlVersion) -> Vec<String> {
        if version >= GlVersion::new(3, 0) {
            let count = self.get_integer(bindings::NUM_EXTENSIONS).max(0) as u32;
            (0..count)
                .filter_map(|i| self.get_string_i(bindings::EXTENSIONS, i))
                .collect()
        } else {
            self.get_string(bindings::EXTENSIONS)
                .map(|all| all.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default()
        }
    }

    fn has_extension(&self, name: &str) -> bool {
        self.extensions().iter().any(|ext| ext == name)
    }

    /// `glDebugMessageCallback` can resolve to a stub on drivers that do not implement
    /// debug output, so the symbol alone is not trusted.
    fn supports_debug_output(&self) -> bool {
        if !self.debug_callback_loaded() {
            return false;
        }
        let version = self.version();
        if version >= GlVersion::new(4, 3) {
            return true;
        }
        self.extensions_for(version)
            .iter()
            .any(|ext| ext == "GL_KHR_debug" || ext == "GL_ARB_debug_output")
    }

    fn enable(&self, capability: Capability) -> GlResult<()> {
        self.drain_errors();
        self.enable_raw(capability.to_gl());
        match self.get_error() {
            bindings::NO_ERROR => {
                trace!("Enabled {}", capability);
                Ok(())
            }
            err => {
                self.drain_errors();
                Err(err)
            }
        }
    }
}

pub struct OpenGLInterop {
    pub gl: bindings::Gl,
}

impl OpenGLInterop {
    pub fn new<F: FnMut(&'static str) -> *const c_void>(f: F) -> Self {
        Self {
            gl: bindings::Gl::load_with(f),
        }
    }

    /// `glGetString` is part of GL 1.1, if it failed to load nothing else will work
    pub fn is_loaded(&self) -> bool {
        self.gl.GetString.is_loaded() && self.gl.GetError.is_loaded()
    }
}

impl GlDevice for OpenGLInterop {
    fn get_error(&self) -> GlError {
        unsafe { self.gl.GetError() }
    }

    fn get_integer(&self, pname: u32) -> i32 {
        let mut value = 0;
        unsafe { self.gl.GetIntegerv(pname, &mut value) };
        value
    }

    fn get_string(&self, name: u32) -> Option<String> {
        let ptr = unsafe { self.gl.GetString(name) };
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(ptr as *const _) }.to_string_lossy().into_owned())
        }
    }

    fn get_string_i(&self, name: u32, index: u32) -> Option<String> {
        if !self.gl.GetStringi.is_loaded() {
            return None;
        }
        let ptr = unsafe { self.gl.GetStringi(name, index) };
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(ptr as *const _) }.to_string_lossy().into_owned())
        }
    }

    fn enable_raw(&self, cap: u32) {
        unsafe { self.gl.Enable(cap) }
    }

    fn debug_callback_loaded(&self) -> bool {
        self.gl.DebugMessageCallback.is_loaded() && self.gl.DebugMessageControl.is_loaded()
    }

    unsafe fn install_debug_callback(&self, callback: DebugProc, user_param: *const c_void) {
        self.gl.DebugMessageCallback(callback, user_param);
        self.gl.DebugMessageControl(
            bindings::DONT_CARE,
            bindings::DONT_CARE,
            bindings::DONT_CARE,
            0,
            std::ptr::null(),
            bindings::TRUE,
        );
    }
}

impl Capability {
    pub fn to_gl(&self) -> u32 {
        *GL_CAPABILITIES.get_by_left(self).unwrap()
    }

    pub fn from_gl(gl_cap: u32) -> Option<Self> {
        GL_CAPABILITIES.get_by_right(&gl_cap).copied()
    }
}
