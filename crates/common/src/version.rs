use serde::{Deserialize, Serialize};
use std::fmt;

const UNKNOWN: &str = "unknown";

/// Compile-time facts about this binary, stamped in by `build.rs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub version: String,
    /// `git describe` output, `-dirty` suffixed for uncommitted trees
    pub git_hash: String,
    pub build_profile: String,
    pub build_timestamp: String,
    pub target: String,
    pub host: String,
}

impl BuildInfo {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_hash: option_env!("REPO_VERSION").unwrap_or(UNKNOWN).to_string(),
            build_profile: option_env!("BUILD_PROFILE").unwrap_or(UNKNOWN).to_string(),
            build_timestamp: option_env!("BUILD_TIMESTAMP").unwrap_or(UNKNOWN).to_string(),
            target: option_env!("BUILD_TARGET").unwrap_or(UNKNOWN).to_string(),
            host: option_env!("BUILD_HOST").unwrap_or(UNKNOWN).to_string(),
        }
    }

    pub fn short_hash(&self) -> &str {
        self.git_hash.get(..7).unwrap_or(&self.git_hash)
    }

    pub fn is_dirty(&self) -> bool {
        self.git_hash.ends_with("-dirty")
    }

    /// Value for the `User-Agent` header on outbound Graph, identity and
    /// storage requests.
    pub fn user_agent(&self) -> String {
        format!("spsync/{}", self.version)
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}{}) {} build on {} for {}",
            self.version,
            self.short_hash(),
            if self.is_dirty() { ", dirty" } else { "" },
            self.build_profile,
            self.build_timestamp,
            self.target
        )
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::new()
}
