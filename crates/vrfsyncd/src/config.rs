//! Synchronizer configuration.

use vrfsync_types::AddressFamily;

/// Default path of the route toolkit binary, resolved through `PATH`.
pub const DEFAULT_RT_PATH: &str = "rt";

/// Settings shared by the dump and monitor collaborators.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Route toolkit binary used for `--dump` and `--monitor` invocations.
    pub rt_path: String,
    /// The one address family this daemon synchronizes; records of any
    /// other family are discarded.
    pub family: AddressFamily,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            rt_path: DEFAULT_RT_PATH.to_string(),
            family: AddressFamily::Inet,
        }
    }
}

impl SyncConfig {
    /// Creates a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the route toolkit path.
    pub fn with_rt_path(mut self, rt_path: impl Into<String>) -> Self {
        self.rt_path = rt_path.into();
        self
    }

    /// Overrides the synchronized address family.
    pub fn with_family(mut self, family: AddressFamily) -> Self {
        self.family = family;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::new();
        assert_eq!(config.rt_path, DEFAULT_RT_PATH);
        assert_eq!(config.family, AddressFamily::Inet);
    }

    #[test]
    fn test_builder_overrides() {
        let config = SyncConfig::new()
            .with_rt_path("/usr/bin/rt")
            .with_family(AddressFamily::Inet6);
        assert_eq!(config.rt_path, "/usr/bin/rt");
        assert_eq!(config.family, AddressFamily::Inet6);
    }
}
