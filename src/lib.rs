//! Process discovery and out-of-process memory reads through `/proc`.
//!
//! Typical use:
//!
//! ```no_run
//! use procpeek::{Config, ProcessIdentity, ProcessLocator, RemoteSession};
//!
//! ProcessIdentity::startup();
//!
//! let config = Config::default();
//! let mut locator = ProcessLocator::open(&config)?;
//! let pid = locator.next_match("/bin/target");
//! locator.close();
//!
//! if let Some(pid) = pid {
//!     let mut session = RemoteSession::begin_with(&config, pid)?;
//!     let mut buf = vec![0u8; 4096];
//!     while let Some(region) = session.next_region() {
//!         let n = session.read(region.start, &mut buf);
//!         println!("{:#x}: {} of {} bytes", region.start, n, region.size);
//!     }
//!     session.end();
//! }
//! # Ok::<(), procpeek::Error>(())
//! ```
//!
//! Linux and Android only.

#![cfg(any(target_os = "linux", target_os = "android"))]

mod accessor;
mod config;
mod error;
mod identity;
mod utils;

pub use accessor::{parse_map_line, MapCursor, MemoryReader, ProcessVmReader, RemoteSession};
pub use config::{Config, DEFAULT_PROC_ROOT, PROC_ROOT_ENV};
pub use error::{Error, ReadError};
pub use identity::ProcessIdentity;
pub use utils::{exe_path, find_process, Matches, MemoryRegion, ProcessLocator};
