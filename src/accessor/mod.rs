mod maps;
mod reader;
mod session;

pub use maps::{parse_map_line, MapCursor};
pub use reader::{MemoryReader, ProcessVmReader};
pub use session::RemoteSession;
