use once_cell::sync::OnceCell;

const SELF_ALIASES: [&str; 2] = ["self", "thread-self"];

static IDENTITY: OnceCell<ProcessIdentity> = OnceCell::new();

/// The calling process, as it appears under the process pseudo-filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub pid: u32,
    /// Decimal form of `pid`, the directory name of this process.
    pub token: String,
}

impl ProcessIdentity {
    /// Capture the identity. Call once before enumerating; later calls are no-ops.
    pub fn startup() -> &'static ProcessIdentity {
        let identity = Self::current();
        log::debug!("running as pid {}", identity.token);
        identity
    }

    pub fn current() -> &'static ProcessIdentity {
        IDENTITY.get_or_init(|| Self::from_pid(std::process::id()))
    }

    pub(crate) fn from_pid(pid: u32) -> Self {
        Self {
            pid,
            token: pid.to_string(),
        }
    }

    /// True when a `/proc` entry name refers to this process.
    pub fn is_self(&self, name: &str) -> bool {
        name == self.token || SELF_ALIASES.contains(&name)
    }
}
