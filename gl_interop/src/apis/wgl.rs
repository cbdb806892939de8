//! WGL extension entrypoints, resolved through `wglGetProcAddress` once a context is current.

#[allow(clippy::all, non_camel_case_types, non_snake_case, non_upper_case_globals)]
pub mod bindings {
    include!(concat!(env!("OUT_DIR"), "/wgl_bindings.rs"));
}

pub use bindings::Wgl;

pub const CREATE_CONTEXT: &str = "WGL_ARB_create_context";
pub const CREATE_CONTEXT_PROFILE: &str = "WGL_ARB_create_context_profile";
pub const SWAP_CONTROL: &str = "WGL_EXT_swap_control";
