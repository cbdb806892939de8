use std::{
    ffi::{c_void, CStr, CString},
    mem,
    ptr,
};

use gl_interop::apis::opengl::OpenGLInterop;
use gl_interop::apis::wgl::{self, bindings as wgl_ext};
use log::{debug, trace};
use winapi::shared::windef::{HDC, HGLRC, HWND, RECT};
use winapi::um::{errhandlingapi::GetLastError, wingdi, winuser};

use super::{Platform, PixelFormatId, PlatformExtensions, WindowHandle};
use crate::config::{ContextAttribs, PixelFormatRequest, Profile};

/// WGL on top of GDI.
///
/// Core WGL entrypoints come from `opengl32.dll`, extension entrypoints are
/// resolved through `wglGetProcAddress` once a context is current.
#[derive(Default)]
pub struct WglPlatform {
    gl_library: Option<libloading::Library>,
    extensions: Option<wgl_ext::Wgl>,
}

impl WglPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    fn library(&mut self) -> Result<&libloading::Library, String> {
        if self.gl_library.is_none() {
            let lib = unsafe { libloading::Library::new("opengl32.dll") }
                .map_err(|err| format!("Could not load opengl32.dll: {}", err))?;
            self.gl_library = Some(lib);
        }
        self.gl_library
            .as_ref()
            .ok_or_else(|| "opengl32.dll is not loaded".to_owned())
    }

    fn extension_string(&self, surface: HDC) -> String {
        let wgl = match &self.extensions {
            Some(wgl) => wgl,
            None => return String::new(),
        };
        let ptr = unsafe {
            if wgl.GetExtensionsStringARB.is_loaded() {
                wgl.GetExtensionsStringARB(surface as _)
            } else if wgl.GetExtensionsStringEXT.is_loaded() {
                wgl.GetExtensionsStringEXT()
            } else {
                ptr::null()
            }
        };
        if ptr.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
        }
    }
}

/// Looks `name` up through WGL first, then in `opengl32.dll` for the GL 1.1 entrypoints
/// `wglGetProcAddress` refuses to return.
unsafe fn get_proc_address(gl_library: &libloading::Library, name: &str) -> *const c_void {
    let addr = match CString::new(name.as_bytes()) {
        Ok(addr) => addr,
        Err(_) => return ptr::null(),
    };
    let p = glutin_wgl_sys::wgl::GetProcAddress(addr.as_ptr()) as *const c_void;
    // Some ICDs return small sentinels instead of null
    if !matches!(p as isize, -1 | 0 | 1 | 2 | 3) {
        p
    } else {
        gl_library
            .get::<*const c_void>(addr.as_bytes_with_nul())
            .map(|sym| *sym)
            .unwrap_or(ptr::null())
    }
}

impl Platform for WglPlatform {
    type Surface = HDC;
    type Context = HGLRC;
    type Device = OpenGLInterop;

    fn client_size(&self, window: WindowHandle) -> (u32, u32) {
        let mut rc: RECT = unsafe { mem::zeroed() };
        if unsafe { winuser::GetClientRect(window.0 as HWND, &mut rc) } == 0 {
            return (0, 0);
        }
        (
            (rc.right - rc.left).max(0) as u32,
            (rc.bottom - rc.top).max(0) as u32,
        )
    }

    fn acquire_surface(&mut self, window: WindowHandle) -> Option<HDC> {
        let h_dc = unsafe { winuser::GetDC(window.0 as HWND) };
        (!h_dc.is_null()).then(|| h_dc)
    }

    fn choose_pixel_format(
        &mut self,
        surface: HDC,
        request: &PixelFormatRequest,
    ) -> Option<PixelFormatId> {
        let pfd = descriptor(request);
        let format = unsafe { wingdi::ChoosePixelFormat(surface, &pfd) };
        (format != 0).then(|| PixelFormatId(format))
    }

    fn set_pixel_format(
        &mut self,
        surface: HDC,
        format: PixelFormatId,
        request: &PixelFormatRequest,
    ) -> bool {
        let pfd = descriptor(request);
        unsafe { wingdi::SetPixelFormat(surface, format.0, &pfd) != 0 }
    }

    fn create_legacy_context(&mut self, surface: HDC) -> Option<HGLRC> {
        let h_glrc = unsafe { glutin_wgl_sys::wgl::CreateContext(surface as _) } as HGLRC;
        (!h_glrc.is_null()).then(|| h_glrc)
    }

    fn make_current(&mut self, binding: Option<(HDC, HGLRC)>) -> bool {
        let (h_dc, h_glrc) = binding.unwrap_or((ptr::null_mut(), ptr::null_mut()));
        unsafe { glutin_wgl_sys::wgl::MakeCurrent(h_dc as _, h_glrc as _) != 0 }
    }

    fn delete_context(&mut self, context: HGLRC) -> bool {
        unsafe { glutin_wgl_sys::wgl::DeleteContext(context as _) != 0 }
    }

    fn load_device(&mut self, _surface: HDC) -> Result<OpenGLInterop, String> {
        let gl_library = self.library()?;

        let interop = OpenGLInterop::new(|name| unsafe { get_proc_address(gl_library, name) });
        if !interop.is_loaded() {
            return Err("glGetString could not be resolved".to_owned());
        }
        let extensions = wgl_ext::Wgl::load_with(|name| unsafe { get_proc_address(gl_library, name) });

        trace!(
            "wglCreateContextAttribsARB loaded: {}",
            extensions.CreateContextAttribsARB.is_loaded()
        );
        self.extensions = Some(extensions);
        Ok(interop)
    }

    fn extensions(&self, surface: HDC) -> PlatformExtensions {
        let wgl = match &self.extensions {
            Some(wgl) => wgl,
            None => return PlatformExtensions::empty(),
        };
        let advertised = self.extension_string(surface);
        debug!("WGL extensions: {}", advertised);
        let advertised = advertised.split_whitespace().collect::<Vec<_>>();

        let mut exts = PlatformExtensions::empty();
        exts.set(
            PlatformExtensions::CREATE_CONTEXT,
            advertised.contains(&wgl::CREATE_CONTEXT) && wgl.CreateContextAttribsARB.is_loaded(),
        );
        exts.set(
            PlatformExtensions::CREATE_CONTEXT_PROFILE,
            advertised.contains(&wgl::CREATE_CONTEXT_PROFILE),
        );
        exts.set(
            PlatformExtensions::SWAP_CONTROL,
            advertised.contains(&wgl::SWAP_CONTROL) && wgl.SwapIntervalEXT.is_loaded(),
        );
        exts
    }

    fn create_context_attribs(
        &mut self,
        surface: HDC,
        attribs: &ContextAttribs,
    ) -> Option<HGLRC> {
        let wgl = self.extensions.as_ref()?;
        let list = attrib_list(attribs);
        let h_glrc =
            unsafe { wgl.CreateContextAttribsARB(surface as _, ptr::null(), list.as_ptr()) }
                as HGLRC;
        (!h_glrc.is_null()).then(|| h_glrc)
    }

    fn set_swap_interval(&mut self, interval: i32) -> bool {
        match &self.extensions {
            Some(wgl) if wgl.SwapIntervalEXT.is_loaded() => unsafe {
                wgl.SwapIntervalEXT(interval) != 0
            },
            _ => false,
        }
    }

    fn swap_interval(&self) -> Option<i32> {
        match &self.extensions {
            Some(wgl) if wgl.GetSwapIntervalEXT.is_loaded() => {
                Some(unsafe { wgl.GetSwapIntervalEXT() })
            }
            _ => None,
        }
    }

    fn swap_buffers(&mut self, surface: HDC) -> bool {
        unsafe { wingdi::SwapBuffers(surface) != 0 }
    }

    fn last_error(&self) -> u32 {
        unsafe { GetLastError() }
    }
}

fn descriptor(request: &PixelFormatRequest) -> wingdi::PIXELFORMATDESCRIPTOR {
    wingdi::PIXELFORMATDESCRIPTOR {
        nSize: mem::size_of::<wingdi::PIXELFORMATDESCRIPTOR>() as u16,
        nVersion: 1,
        dwFlags: request.flags.bits(),
        iPixelType: wingdi::PFD_TYPE_RGBA,
        cColorBits: request.color_bits,
        cDepthBits: request.depth_bits,
        cStencilBits: request.stencil_bits,
        iLayerType: wingdi::PFD_MAIN_PLANE,
        ..unsafe { mem::zeroed() }
    }
}

/// Zero-terminated `wglCreateContextAttribsARB` list
fn attrib_list(attribs: &ContextAttribs) -> Vec<i32> {
    let mut list = vec![
        wgl_ext::CONTEXT_MAJOR_VERSION_ARB as i32,
        attribs.major as i32,
        wgl_ext::CONTEXT_MINOR_VERSION_ARB as i32,
        attribs.minor as i32,
    ];
    if !attribs.flags.is_empty() {
        list.extend([wgl_ext::CONTEXT_FLAGS_ARB as i32, attribs.flags.bits() as i32]);
    }
    if let Some(profile) = attribs.profile {
        let mask = match profile {
            Profile::Core => wgl_ext::CONTEXT_CORE_PROFILE_BIT_ARB,
            Profile::Compatibility => wgl_ext::CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB,
        };
        list.extend([wgl_ext::CONTEXT_PROFILE_MASK_ARB as i32, mask as i32]);
    }
    list.push(0);
    list
}
