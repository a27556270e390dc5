use nix::errno::Errno;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the open/begin style operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot list processes under {}: {source}", root.display())]
    EnumerationUnavailable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open memory map listing of process {pid}: {source}")]
    MapsUnavailable {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("insufficient privilege to read memory of process {pid}")]
    AccessDenied { pid: u32 },
}

/// Why a remote read transferred nothing.
///
/// Callers that only care whether anything was read can keep using
/// [`RemoteSession::read`](crate::RemoteSession::read), which folds every
/// variant into `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("address range is not mapped in the target")]
    Unmapped,

    #[error("target process no longer exists")]
    ProcessGone,

    #[error("address {0:#x} does not fit the native pointer width")]
    AddressOutOfRange(u64),

    #[error("remote read failed: {0}")]
    Os(Errno),
}

impl ReadError {
    pub fn is_denied(&self) -> bool {
        matches!(self, ReadError::PermissionDenied)
    }
}

impl From<Errno> for ReadError {
    fn from(errno: Errno) -> Self {
        match errno {
            Errno::EPERM => ReadError::PermissionDenied,
            Errno::EFAULT | Errno::EIO => ReadError::Unmapped,
            Errno::ESRCH => ReadError::ProcessGone,
            other => ReadError::Os(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_classes() {
        assert_eq!(ReadError::from(Errno::EPERM), ReadError::PermissionDenied);
        assert_eq!(ReadError::from(Errno::EACCES), ReadError::Os(Errno::EACCES));
        assert_eq!(ReadError::from(Errno::EFAULT), ReadError::Unmapped);
        assert_eq!(ReadError::from(Errno::ESRCH), ReadError::ProcessGone);
        assert_eq!(ReadError::from(Errno::EINVAL), ReadError::Os(Errno::EINVAL));
    }

    #[test]
    fn only_permission_is_denied() {
        assert!(ReadError::PermissionDenied.is_denied());
        assert!(!ReadError::Unmapped.is_denied());
        assert!(!ReadError::Os(Errno::EPERM).is_denied());
        assert!(!ReadError::from(Errno::EACCES).is_denied());
    }

    #[test]
    fn messages_name_the_process() {
        let err = Error::AccessDenied { pid: 42 };
        assert_eq!(
            err.to_string(),
            "insufficient privilege to read memory of process 42"
        );
    }
}
