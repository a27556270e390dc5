use std::path::{Path, PathBuf};

pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const PROC_ROOT_ENV: &str = "PROCPEEK_PROC_ROOT";

/// Where the process pseudo-filesystem lives and how sessions are opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub proc_root: PathBuf,
    /// Fail `begin` early with `AccessDenied` when the target refuses reads.
    pub probe_access: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            probe_access: true,
        }
    }
}

impl Config {
    /// Defaults, with the proc root taken from `PROCPEEK_PROC_ROOT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(PROC_ROOT_ENV) {
            if !root.is_empty() {
                config.proc_root = PathBuf::from(root);
            }
        }
        config
    }

    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    pub fn with_probe_access(mut self, probe: bool) -> Self {
        self.probe_access = probe;
        self
    }

    pub(crate) fn process_dir(&self, pid: u32) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }

    pub(crate) fn root(&self) -> &Path {
        &self.proc_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_proc() {
        let config = Config::default();
        assert_eq!(config.proc_root, PathBuf::from("/proc"));
        assert!(config.probe_access);
    }

    #[test]
    fn builder_overrides() {
        let config = Config::default()
            .with_proc_root("/tmp/fakeproc")
            .with_probe_access(false);
        assert_eq!(config.root(), Path::new("/tmp/fakeproc"));
        assert!(!config.probe_access);
        assert_eq!(config.process_dir(77), PathBuf::from("/tmp/fakeproc/77"));
    }

    #[test]
    fn env_overrides_root() {
        std::env::set_var(PROC_ROOT_ENV, "/data/local/tmp/proc");
        let config = Config::from_env();
        std::env::remove_var(PROC_ROOT_ENV);

        assert_eq!(config.proc_root, PathBuf::from("/data/local/tmp/proc"));
        assert!(config.probe_access);
    }
}
