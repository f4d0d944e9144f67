//! HNS version detection and gating

use crate::error::{Error, Result};
use crate::hns::HnsClient;
use serde::Deserialize;
use std::fmt;
use tracing::{error, info};

/// HNS version (major, minor), ordered lexicographically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct HnsVersion {
    #[serde(alias = "Major")]
    pub major: u32,
    #[serde(alias = "Minor")]
    pub minor: u32,
}

impl HnsVersion {
    /// HNS shipped with Windows Server 1803
    pub const V1803: HnsVersion = HnsVersion::new(7, 2);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn is_at_least(&self, minimum: &HnsVersion) -> bool {
        self >= minimum
    }
}

impl Default for HnsVersion {
    fn default() -> Self {
        Self::V1803
    }
}

impl fmt::Display for HnsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Check that the running HNS is not older than `minimum`
///
/// Returns the running version on success.
pub fn check_version<C: HnsClient + ?Sized>(client: &C, minimum: &HnsVersion) -> Result<HnsVersion> {
    let current = client.globals()?.version;
    info!(version = %current, "Running on HNS version");

    if !current.is_at_least(minimum) {
        error!(version = %current, minimum = %minimum, "HNS version is not supported");
        return Err(Error::UnsupportedVersion {
            minimum: minimum.to_string(),
            current: current.to_string(),
        });
    }

    Ok(current)
}
