#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::c_void;
use std::rc::Rc;

use context_host::config::{ContextAttribs, PixelFormatRequest};
use context_host::platform::{Platform, PixelFormatId, PlatformExtensions, WindowHandle};
use context_host::{GlContextHost, HostConfig};
use gl_interop::apis::opengl::{bindings as gl, DebugProc, GlDevice, GlError};

pub const WINDOW: WindowHandle = WindowHandle(0x1000 as *mut c_void);
pub const SURFACE: u32 = 7;
pub const LEGACY_VERSION: (u32, u32) = (2, 1);

/// `ERROR_INVALID_PIXEL_FORMAT`
pub const INVALID_PIXEL_FORMAT: u32 = 2000;

/// Headless stand-in for a display driver. Records every context, binding and
/// swap the host performs.
pub struct Driver {
    pub client_size: (u32, u32),
    pub fail_surface: bool,
    pub fail_choose: bool,
    pub fail_set: bool,
    pub fail_legacy: bool,
    pub fail_load: bool,
    pub extensions: PlatformExtensions,
    pub max_version: (u32, u32),
    pub gl_extensions: Vec<&'static str>,
    pub debug_symbol: bool,
    pub reject_srgb: bool,
    /// Refuse to make any context but the bootstrap one current
    pub fail_target_bind: bool,
    /// Refuse to make the bootstrap context current a second time
    pub fail_legacy_rebind: bool,
    /// Fail the loader once the target context is current
    pub fail_reload: bool,
    pub panic_on_swap_interval: bool,

    pub next_id: u32,
    pub created: u32,
    pub bootstrap: Option<u32>,
    pub binds: Vec<u32>,
    pub live: Vec<u32>,
    pub versions: HashMap<u32, (u32, u32)>,
    pub current: Option<(u32, u32)>,
    pub unbinds: u32,
    pub deleted: Vec<u32>,
    pub requested: Vec<ContextAttribs>,
    pub loads: u32,
    pub swap_interval: i32,
    pub swaps: u32,
    pub gl_errors: Vec<GlError>,
    pub enabled: Vec<u32>,
    pub debug_callback: DebugProc,
    pub last_error: u32,
}

impl Driver {
    /// A driver offering everything up to 4.6 core
    pub fn core_capable() -> Self {
        Self {
            client_size: (800, 600),
            fail_surface: false,
            fail_choose: false,
            fail_set: false,
            fail_legacy: false,
            fail_load: false,
            extensions: PlatformExtensions::all(),
            max_version: (4, 6),
            gl_extensions: vec!["GL_ARB_seamless_cube_map", "GL_KHR_debug"],
            debug_symbol: true,
            reject_srgb: false,
            fail_target_bind: false,
            fail_legacy_rebind: false,
            fail_reload: false,
            panic_on_swap_interval: false,
            next_id: 0,
            created: 0,
            bootstrap: None,
            binds: Vec::new(),
            live: Vec::new(),
            versions: HashMap::new(),
            current: None,
            unbinds: 0,
            deleted: Vec::new(),
            requested: Vec::new(),
            loads: 0,
            swap_interval: 1,
            swaps: 0,
            gl_errors: Vec::new(),
            enabled: Vec::new(),
            debug_callback: None,
            last_error: 0,
        }
    }

    /// A driver without `WGL_ARB_create_context`
    pub fn legacy_only() -> Self {
        Self {
            extensions: PlatformExtensions::SWAP_CONTROL,
            ..Self::core_capable()
        }
    }

    fn new_context(&mut self, version: (u32, u32)) -> u32 {
        self.next_id += 1;
        self.created += 1;
        self.live.push(self.next_id);
        self.versions.insert(self.next_id, version);
        self.next_id
    }

    fn current_version(&self) -> Option<(u32, u32)> {
        self.current
            .and_then(|(_, context)| self.versions.get(&context).copied())
    }
}

pub struct MockPlatform {
    pub driver: Rc<RefCell<Driver>>,
}

pub struct MockDevice {
    driver: Rc<RefCell<Driver>>,
}

impl Platform for MockPlatform {
    type Surface = u32;
    type Context = u32;
    type Device = MockDevice;

    fn client_size(&self, _window: WindowHandle) -> (u32, u32) {
        self.driver.borrow().client_size
    }

    fn acquire_surface(&mut self, _window: WindowHandle) -> Option<u32> {
        let mut driver = self.driver.borrow_mut();
        if driver.fail_surface {
            driver.last_error = 1400;
            None
        } else {
            Some(SURFACE)
        }
    }

    fn choose_pixel_format(&mut self, _surface: u32, request: &PixelFormatRequest) -> Option<PixelFormatId> {
        assert_eq!(*request, PixelFormatRequest::default());
        let mut driver = self.driver.borrow_mut();
        if driver.fail_choose {
            driver.last_error = INVALID_PIXEL_FORMAT;
            None
        } else {
            Some(PixelFormatId(9))
        }
    }

    fn set_pixel_format(&mut self, _surface: u32, format: PixelFormatId, _request: &PixelFormatRequest) -> bool {
        assert_eq!(format, PixelFormatId(9));
        let mut driver = self.driver.borrow_mut();
        if driver.fail_set {
            driver.last_error = INVALID_PIXEL_FORMAT;
            false
        } else {
            true
        }
    }

    fn create_legacy_context(&mut self, _surface: u32) -> Option<u32> {
        let mut driver = self.driver.borrow_mut();
        if driver.fail_legacy {
            driver.last_error = 1;
            None
        } else {
            let context = driver.new_context(LEGACY_VERSION);
            driver.bootstrap = Some(context);
            Some(context)
        }
    }

    fn make_current(&mut self, binding: Option<(u32, u32)>) -> bool {
        let mut driver = self.driver.borrow_mut();
        match binding {
            Some((surface, context)) => {
                let is_bootstrap = driver.bootstrap == Some(context);
                let refused = (driver.fail_target_bind && !is_bootstrap)
                    || (driver.fail_legacy_rebind && is_bootstrap && driver.binds.contains(&context));
                if !driver.live.contains(&context) || refused {
                    driver.last_error = INVALID_PIXEL_FORMAT;
                    return false;
                }
                driver.binds.push(context);
                driver.current = Some((surface, context));
            }
            None => {
                driver.current = None;
                driver.unbinds += 1;
            }
        }
        true
    }

    fn delete_context(&mut self, context: u32) -> bool {
        let mut driver = self.driver.borrow_mut();
        let before = driver.live.len();
        driver.live.retain(|live| *live != context);
        if driver.live.len() == before {
            return false;
        }
        if matches!(driver.current, Some((_, current)) if current == context) {
            driver.current = None;
        }
        driver.deleted.push(context);
        true
    }

    fn load_device(&mut self, _surface: u32) -> Result<MockDevice, String> {
        let mut driver = self.driver.borrow_mut();
        assert!(driver.current.is_some(), "functions loaded without a current context");
        driver.loads += 1;
        if driver.fail_load || (driver.fail_reload && driver.loads > 1) {
            return Err("mock loader refused".to_owned());
        }
        Ok(MockDevice {
            driver: self.driver.clone(),
        })
    }

    fn extensions(&self, _surface: u32) -> PlatformExtensions {
        let driver = self.driver.borrow();
        assert!(driver.loads > 0, "extensions queried before loading");
        driver.extensions
    }

    fn create_context_attribs(&mut self, _surface: u32, attribs: &ContextAttribs) -> Option<u32> {
        let mut driver = self.driver.borrow_mut();
        assert!(driver.extensions.contains(PlatformExtensions::CREATE_CONTEXT));
        assert!(driver.current.is_some(), "attributed context created without a current context");
        driver.requested.push(*attribs);
        if (attribs.major, attribs.minor) > driver.max_version {
            driver.last_error = 0x2095;
            return None;
        }
        Some(driver.new_context((attribs.major, attribs.minor)))
    }

    fn set_swap_interval(&mut self, interval: i32) -> bool {
        if self.driver.borrow().panic_on_swap_interval {
            panic!("driver crashed while setting the swap interval");
        }
        let mut driver = self.driver.borrow_mut();
        if !driver.extensions.contains(PlatformExtensions::SWAP_CONTROL) {
            return false;
        }
        driver.swap_interval = interval;
        true
    }

    fn swap_interval(&self) -> Option<i32> {
        let driver = self.driver.borrow();
        driver
            .extensions
            .contains(PlatformExtensions::SWAP_CONTROL)
            .then(|| driver.swap_interval)
    }

    fn swap_buffers(&mut self, surface: u32) -> bool {
        let mut driver = self.driver.borrow_mut();
        assert_eq!(surface, SURFACE);
        if driver.current.is_none() {
            return false;
        }
        driver.swaps += 1;
        true
    }

    fn last_error(&self) -> u32 {
        self.driver.borrow().last_error
    }
}

impl GlDevice for MockDevice {
    fn get_error(&self) -> GlError {
        let mut driver = self.driver.borrow_mut();
        if driver.gl_errors.is_empty() {
            gl::NO_ERROR
        } else {
            driver.gl_errors.remove(0)
        }
    }

    fn get_integer(&self, pname: u32) -> i32 {
        let mut driver = self.driver.borrow_mut();
        let version = driver.current_version().unwrap_or((0, 0));
        if version < (3, 0) {
            driver.gl_errors.push(gl::INVALID_ENUM);
            return 0;
        }
        match pname {
            gl::MAJOR_VERSION => version.0 as i32,
            gl::MINOR_VERSION => version.1 as i32,
            gl::NUM_EXTENSIONS => driver.gl_extensions.len() as i32,
            _ => {
                driver.gl_errors.push(gl::INVALID_ENUM);
                0
            }
        }
    }

    fn get_string(&self, name: u32) -> Option<String> {
        let driver = self.driver.borrow();
        let (major, minor) = driver.current_version()?;
        match name {
            gl::VERSION => Some(format!("{}.{}.0 Mock Driver", major, minor)),
            gl::EXTENSIONS => Some(driver.gl_extensions.join(" ")),
            _ => None,
        }
    }

    fn get_string_i(&self, name: u32, index: u32) -> Option<String> {
        let driver = self.driver.borrow();
        if name != gl::EXTENSIONS {
            return None;
        }
        driver.gl_extensions.get(index as usize).map(|ext| ext.to_string())
    }

    fn enable_raw(&self, cap: u32) {
        let mut driver = self.driver.borrow_mut();
        if driver.reject_srgb && cap == gl::FRAMEBUFFER_SRGB {
            driver.gl_errors.push(gl::INVALID_ENUM);
        } else {
            driver.enabled.push(cap);
        }
    }

    fn debug_callback_loaded(&self) -> bool {
        self.driver.borrow().debug_symbol
    }

    unsafe fn install_debug_callback(&self, callback: DebugProc, _user_param: *const c_void) {
        self.driver.borrow_mut().debug_callback = callback;
    }
}

pub fn host(driver: Driver) -> (GlContextHost<MockPlatform>, Rc<RefCell<Driver>>) {
    host_with_config(driver, HostConfig::default())
}

pub fn host_with_config(
    driver: Driver,
    config: HostConfig,
) -> (GlContextHost<MockPlatform>, Rc<RefCell<Driver>>) {
    let driver = Rc::new(RefCell::new(driver));
    let platform = MockPlatform {
        driver: driver.clone(),
    };
    (GlContextHost::with_config(platform, config), driver)
}
