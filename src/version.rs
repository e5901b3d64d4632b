//! Build metadata embedded by `build.rs`.

use std::fmt;

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version and git state of the running binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub branch: &'static str,
    pub sha: &'static str,
    pub dirty: bool,
}

impl BuildInfo {
    /// Metadata captured at compile time; git fields read "unknown" when
    /// the build ran outside a checkout.
    pub fn current() -> Self {
        Self {
            version: PKG_VERSION,
            branch: match option_env!("VERGEN_GIT_BRANCH") {
                Some(branch) => branch,
                None => "unknown",
            },
            sha: match option_env!("VERGEN_GIT_SHA") {
                Some(sha) => sha,
                None => "unknown",
            },
            dirty: matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true")),
        }
    }

    fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(self.sha)
    }
}

/// `{version}+{branch}.{sha7}`, with a `.dirty` suffix for unclean trees.
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}.{}", self.version, self.branch, self.short_sha())?;
        if self.dirty {
            f.write_str(".dirty")?;
        }
        Ok(())
    }
}

/// Full version string of the running build.
pub fn version_string() -> String {
    BuildInfo::current().to_string()
}
