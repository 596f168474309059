/// A target firmware version, `(major, minor, build)`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Version {
    /// Major version component.
    pub major: u16,
    /// Minor version component.
    pub minor: u16,
    /// Build number, informational only.
    pub build: u16,
}

/// Lowest version this controller will attempt a mission upload against.
pub const MIN_TARGET_VERSION: Version = Version {
    major: 6,
    minor: 5,
    build: 0,
};

impl Version {
    /// Whether this version meets `minimum`, comparing `(major, minor)`
    /// lexicographically and ignoring `build` entirely.
    #[must_use]
    pub fn meets_minimum(&self, minimum: &Version) -> bool {
        (self.major, self.minor) >= (minimum.major, minimum.minor)
    }
}
