use gl_generator::{Api, Fallbacks, Profile, Registry};
use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let dest = env::var("OUT_DIR").unwrap();
    let dest = Path::new(&dest);

    println!("cargo:rerun-if-changed=build.rs");

    let mut file_output = File::create(&dest.join("gl_bindings.rs")).unwrap();
    generate_gl_bindings(&mut file_output);

    // The build script runs on the host, so ask cargo about the target instead of using cfg
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        let mut file_output = File::create(&dest.join("wgl_bindings.rs")).unwrap();
        generate_wgl_bindings(&mut file_output);
    }
}

fn generate_gl_bindings<W>(dest: &mut W)
where
    W: Write,
{
    let gl_registry = Registry::new(
        Api::Gl,
        (4, 6),
        Profile::Core,
        Fallbacks::All,
        vec![
            "GL_ARB_debug_output",
            "GL_ARB_framebuffer_sRGB",
            "GL_ARB_seamless_cube_map",
            "GL_EXT_framebuffer_sRGB",
            "GL_KHR_debug",
        ],
    );

    (gl_registry)
        .write_bindings(gl_generator::StructGenerator, dest)
        .unwrap();
}

fn generate_wgl_bindings<W>(dest: &mut W)
where
    W: Write,
{
    let wgl_registry = Registry::new(
        Api::Wgl,
        (1, 0),
        Profile::Core,
        Fallbacks::All,
        vec![
            "WGL_ARB_create_context",
            "WGL_ARB_create_context_profile",
            "WGL_ARB_extensions_string",
            "WGL_EXT_extensions_string",
            "WGL_EXT_swap_control",
        ],
    );

    (wgl_registry)
        .write_bindings(gl_generator::StructGenerator, dest)
        .unwrap();
}
