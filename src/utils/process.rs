use std::ffi::{OsStr, OsString};
use std::fs::{self, ReadDir};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Error;
use crate::identity::ProcessIdentity;

/// Cursor over the process directory, looking for processes by executable path.
///
/// Listing order is whatever the kernel returns, so with several processes
/// sharing an image the "first" match may differ between runs.
#[derive(Debug)]
pub struct ProcessLocator {
    root: PathBuf,
    entries: Option<ReadDir>,
    identity: ProcessIdentity,
}

impl ProcessLocator {
    pub fn open(config: &Config) -> Result<Self, Error> {
        Self::open_as(config, ProcessIdentity::current().clone())
    }

    pub(crate) fn open_as(config: &Config, identity: ProcessIdentity) -> Result<Self, Error> {
        let root = config.root().to_path_buf();
        let entries = fs::read_dir(&root).map_err(|source| Error::EnumerationUnavailable {
            root: root.clone(),
            source,
        })?;

        Ok(Self {
            root,
            entries: Some(entries),
            identity,
        })
    }

    /// Advance to the next process whose `exe` link ends with `suffix`.
    ///
    /// The comparison is a raw byte suffix match: `"true"` also matches
    /// `/usr/bin/ntrue`, pass `"/true"` to anchor on a path component.
    /// Returns `None` once the listing is exhausted, and keeps doing so.
    pub fn next_match(&mut self, suffix: impl AsRef<OsStr>) -> Option<u32> {
        let suffix = suffix.as_ref().as_bytes();
        let entries = self.entries.as_mut()?;

        for entry in entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::trace!("skipping unreadable entry in {}: {}", self.root.display(), e);
                    continue;
                }
            };

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };

            if self.identity.is_self(name) {
                continue;
            }

            let Some(pid) = parse_pid(name) else {
                continue;
            };

            // Processes exit and deny access while we walk; both are routine.
            let link = match fs::read_link(entry.path().join("exe")) {
                Ok(link) => link,
                Err(e) => {
                    log::trace!("pid {}: cannot resolve exe: {}", pid, e);
                    continue;
                }
            };

            if link.as_os_str().as_bytes().ends_with(suffix) {
                log::debug!("pid {} matches: {}", pid, link.display());
                return Some(pid);
            }
        }

        self.entries = None;
        None
    }

    /// Every remaining match, consuming the locator.
    pub fn matches(self, suffix: impl Into<OsString>) -> Matches {
        Matches {
            locator: self,
            suffix: suffix.into(),
        }
    }

    pub fn close(self) {
        log::trace!("closing process listing of {}", self.root.display());
    }
}

/// Iterator over the pids returned by [`ProcessLocator::matches`].
#[derive(Debug)]
pub struct Matches {
    locator: ProcessLocator,
    suffix: OsString,
}

impl Iterator for Matches {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        self.locator.next_match(&self.suffix)
    }
}

/// Open, search and close in one call.
pub fn find_process(config: &Config, suffix: impl AsRef<OsStr>) -> Result<Option<u32>, Error> {
    let mut locator = ProcessLocator::open(config)?;
    let pid = locator.next_match(suffix);
    locator.close();
    Ok(pid)
}

/// Resolved executable image of `pid`, if it can be read.
pub fn exe_path(config: &Config, pid: u32) -> Option<PathBuf> {
    fs::read_link(config.process_dir(pid).join("exe")).ok()
}

fn parse_pid(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse::<u32>().ok().filter(|&pid| pid != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_names() {
        assert_eq!(parse_pid("1"), Some(1));
        assert_eq!(parse_pid("31337"), Some(31337));
        assert_eq!(parse_pid("0"), None);
        assert_eq!(parse_pid(""), None);
        assert_eq!(parse_pid("+12"), None);
        assert_eq!(parse_pid("self"), None);
        assert_eq!(parse_pid("12a"), None);
        assert_eq!(parse_pid("99999999999"), None);
    }

    #[test]
    fn missing_root_is_unavailable() {
        let config = Config::default().with_proc_root("/nonexistent/procpeek-root");
        match ProcessLocator::open(&config) {
            Err(Error::EnumerationUnavailable { root, .. }) => {
                assert_eq!(root, PathBuf::from("/nonexistent/procpeek-root"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn skips_given_identity() {
        let root = tempfile::tempdir().unwrap();
        for name in ["41", "42", "self"] {
            let dir = root.path().join(name);
            std::fs::create_dir(&dir).unwrap();
            std::os::unix::fs::symlink("/system/bin/app_process64", dir.join("exe")).unwrap();
        }

        let config = Config::default().with_proc_root(root.path());
        let mut locator = ProcessLocator::open_as(&config, ProcessIdentity::from_pid(41)).unwrap();
        assert_eq!(locator.next_match("/app_process64"), Some(42));
        assert_eq!(locator.next_match("/app_process64"), None);
    }

    #[test]
    fn matches_iterator_is_debuggable() {
        let root = tempfile::tempdir().unwrap();
        let config = Config::default().with_proc_root(root.path());
        let mut matches = ProcessLocator::open(&config).unwrap().matches("/bin/sh");

        assert!(format!("{:?}", matches).starts_with("Matches"));
        assert_eq!(matches.next(), None);
    }
}
