use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::BufReader;

use super::maps::MapCursor;
use super::reader::{MemoryReader, ProcessVmReader};
use crate::config::Config;
use crate::error::{Error, ReadError};
use crate::utils::MemoryRegion;

/// An open view on one target process: its region listing plus remote reads.
///
/// The listing is consumed once, front to back. Reads can be issued at any
/// point while the session is alive and do not move the region cursor.
pub struct RemoteSession<R: MemoryReader = ProcessVmReader> {
    pid: u32,
    maps: MapCursor<BufReader<File>>,
    reader: R,
}

impl RemoteSession<ProcessVmReader> {
    pub fn begin(pid: u32) -> Result<Self, Error> {
        Self::begin_with(&Config::default(), pid)
    }

    pub fn begin_with(config: &Config, pid: u32) -> Result<Self, Error> {
        Self::with_reader(config, pid, ProcessVmReader)
    }
}

impl<R: MemoryReader> RemoteSession<R> {
    /// Open the `maps` listing of `pid` and check that its memory may be read.
    ///
    /// The check is a one byte read at address 0. Only a permission failure
    /// counts; the page is normally unmapped and that outcome is ignored.
    pub fn with_reader(config: &Config, pid: u32, reader: R) -> Result<Self, Error> {
        let path = config.process_dir(pid).join("maps");
        let file = File::open(&path).map_err(|source| Error::MapsUnavailable { pid, source })?;

        let session = Self {
            pid,
            maps: MapCursor::new(BufReader::new(file)),
            reader,
        };

        if config.probe_access {
            session.probe()?;
        }

        log::debug!("session opened for pid {}", pid);
        Ok(session)
    }

    fn probe(&self) -> Result<(), Error> {
        let mut byte = [0u8; 1];
        match self.reader.read_remote(self.pid, 0, &mut byte) {
            Err(e) if e.is_denied() => {
                log::warn!("pid {}: memory read not permitted", self.pid);
                Err(Error::AccessDenied { pid: self.pid })
            }
            _ => Ok(()),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Next readable region of the listing, `None` at the end.
    pub fn next_region(&mut self) -> Option<MemoryRegion> {
        self.maps.next_region()
    }

    /// Copy up to `buf.len()` bytes from `address`; 0 means nothing usable was read.
    ///
    /// A single attempt: a short count is returned as is and the target may
    /// change its memory between two reads.
    pub fn read(&self, address: u64, buf: &mut [u8]) -> usize {
        match self.try_read(address, buf) {
            Ok(read) => read,
            Err(e) => {
                log::trace!("pid {}: read of {:#x} failed: {}", self.pid, address, e);
                0
            }
        }
    }

    pub fn try_read(&self, address: u64, buf: &mut [u8]) -> Result<usize, ReadError> {
        let len = buf.len();
        self.reader
            .read_remote(self.pid, address, buf)
            .map(|read| read.min(len))
    }

    /// Read up to `len` bytes, truncated to what was actually copied.
    pub fn read_vec(&self, address: u64, len: usize) -> Vec<u8> {
        let mut buffer = vec![0u8; len];
        let read = self.read(address, &mut buffer);
        buffer.truncate(read);
        buffer
    }

    pub fn read_u32(&self, address: u64) -> Option<u32> {
        let mut bytes = [0u8; 4];
        if self.read(address, &mut bytes) != bytes.len() {
            return None;
        }
        (&bytes[..]).read_u32::<LittleEndian>().ok()
    }

    pub fn read_u64(&self, address: u64) -> Option<u64> {
        let mut bytes = [0u8; 8];
        if self.read(address, &mut bytes) != bytes.len() {
            return None;
        }
        (&bytes[..]).read_u64::<LittleEndian>().ok()
    }

    pub fn end(self) {
        log::debug!("session closed for pid {}", self.pid);
    }
}

impl<R: MemoryReader> Iterator for RemoteSession<R> {
    type Item = MemoryRegion;

    fn next(&mut self) -> Option<MemoryRegion> {
        self.next_region()
    }
}

impl<R: MemoryReader> std::fmt::Debug for RemoteSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSession").field("pid", &self.pid).finish()
    }
}
