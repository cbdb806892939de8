pub mod apis;
pub mod debug;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
}

impl GlVersion {
    /// What a default WGL context advertises on drivers without the attributed path
    pub const LEGACY: GlVersion = GlVersion::new(2, 1);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses the leading `major.minor` of a `GL_VERSION` string such as
    /// `"4.6.0 NVIDIA 535.98"` or `"2.1 Mesa 23.0.4"`.
    pub fn parse(version_string: &str) -> Option<Self> {
        let numbers = version_string.split_whitespace().next()?;
        let mut parts = numbers.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts
            .next()?
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .ok()?;
        Some(Self { major, minor })
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    SeamlessCubeMap,
    FramebufferSrgb,
    DebugOutputSynchronous,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::SeamlessCubeMap => "seamless cubemap filtering",
            Capability::FramebufferSrgb => "SRGB framebuffers",
            Capability::DebugOutputSynchronous => "synchronous debug output",
        };
        f.write_str(name)
    }
}
