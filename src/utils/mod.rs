mod process;
mod types;

pub use process::{exe_path, find_process, Matches, ProcessLocator};
pub use types::MemoryRegion;
