pub mod opengl;

#[cfg(windows)]
pub mod wgl;
