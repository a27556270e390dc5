use crate::error::ReadError;

/// A primitive that copies bytes out of another process.
pub trait MemoryReader {
    /// Read up to `buf.len()` bytes at `address` of `pid`, returning how many
    /// were copied.
    fn read_remote(&self, pid: u32, address: u64, buf: &mut [u8]) -> Result<usize, ReadError>;
}

impl<T: MemoryReader + ?Sized> MemoryReader for &T {
    fn read_remote(&self, pid: u32, address: u64, buf: &mut [u8]) -> Result<usize, ReadError> {
        (**self).read_remote(pid, address, buf)
    }
}

/// `process_vm_readv(2)`.
///
/// On Android the syscall is issued directly, since bionic only exports the
/// wrapper from API level 23.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessVmReader;

impl MemoryReader for ProcessVmReader {
    fn read_remote(&self, pid: u32, address: u64, buf: &mut [u8]) -> Result<usize, ReadError> {
        if buf.is_empty() {
            return Ok(0);
        }

        let base = usize::try_from(address).map_err(|_| ReadError::AddressOutOfRange(address))?;
        let pid = i32::try_from(pid).map_err(|_| ReadError::ProcessGone)?;
        let len = buf.len();

        let read = vm_readv(pid, base, buf)?;
        Ok(read.min(len))
    }
}

#[cfg(not(target_os = "android"))]
fn vm_readv(pid: i32, base: usize, buf: &mut [u8]) -> Result<usize, ReadError> {
    use nix::sys::uio::{process_vm_readv, RemoteIoVec};
    use nix::unistd::Pid;
    use std::io::IoSliceMut;

    let remote = [RemoteIoVec {
        base,
        len: buf.len(),
    }];
    let mut local = [IoSliceMut::new(buf)];
    Ok(process_vm_readv(Pid::from_raw(pid), &mut local, &remote)?)
}

#[cfg(target_os = "android")]
fn vm_readv(pid: i32, base: usize, buf: &mut [u8]) -> Result<usize, ReadError> {
    use nix::errno::Errno;
    use nix::libc;

    let local = libc::iovec {
        iov_base: buf.as_mut_ptr().cast(),
        iov_len: buf.len(),
    };
    let remote = libc::iovec {
        iov_base: base as *mut libc::c_void,
        iov_len: buf.len(),
    };

    // SAFETY: `local` covers exactly `buf`, so the kernel writes at most
    // `buf.len()` bytes into memory we own. `remote` is only dereferenced
    // inside the target's address space.
    let read = unsafe {
        libc::syscall(
            libc::SYS_process_vm_readv,
            pid as libc::c_long,
            &local as *const libc::iovec,
            1 as libc::c_ulong,
            &remote as *const libc::iovec,
            1 as libc::c_ulong,
            0 as libc::c_ulong,
        )
    };

    if read < 0 {
        return Err(Errno::last().into());
    }
    Ok(read as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_own_memory() {
        let source: [u8; 8] = *b"procpeek";
        let mut dest = [0u8; 8];

        let read = ProcessVmReader
            .read_remote(std::process::id(), source.as_ptr() as u64, &mut dest)
            .unwrap();

        assert_eq!(read, 8);
        assert_eq!(&dest, b"procpeek");
    }

    #[test]
    fn empty_buffer_skips_syscall() {
        let read = ProcessVmReader.read_remote(std::process::id(), 0, &mut []);
        assert_eq!(read, Ok(0));
    }

    #[test]
    fn null_page_is_unmapped() {
        let mut byte = [0u8; 1];
        let err = ProcessVmReader
            .read_remote(std::process::id(), 0, &mut byte)
            .unwrap_err();
        assert_eq!(err, ReadError::Unmapped);
    }

    #[test]
    fn reads_through_reference() {
        let value: u32 = 0x0102_0304;
        let mut dest = [0u8; 4];
        let reader = &ProcessVmReader;

        let read = reader
            .read_remote(std::process::id(), &value as *const u32 as u64, &mut dest)
            .unwrap();
        assert_eq!(read, 4);
        assert_eq!(u32::from_ne_bytes(dest), value);
    }
}
