use std::io::{BufRead, ErrorKind};

use crate::utils::MemoryRegion;

const READ_FLAG: u8 = b'r';

/// Sequential reader over a `maps` listing, yielding readable regions.
///
/// Each line is expected to start with `<start>-<end> <perms>`, see proc(5).
/// Anything else is skipped without stopping the walk.
#[derive(Debug)]
pub struct MapCursor<R> {
    reader: R,
    line: Vec<u8>,
    done: bool,
}

impl<R: BufRead> MapCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            done: false,
        }
    }

    pub fn next_region(&mut self) -> Option<MemoryRegion> {
        while !self.done {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => self.done = true,
                Ok(_) => match parse_map_line(&self.line) {
                    Some(region) if region.readable => return Some(region),
                    Some(region) => {
                        log::trace!("skipping unreadable region {:#x}", region.start)
                    }
                    None => log::trace!(
                        "skipping malformed maps line: {}",
                        String::from_utf8_lossy(&self.line).trim_end()
                    ),
                },
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    log::warn!("maps listing read failed, stopping: {}", e);
                    self.done = true;
                }
            }
        }
        None
    }
}

impl<R: BufRead> Iterator for MapCursor<R> {
    type Item = MemoryRegion;

    fn next(&mut self) -> Option<MemoryRegion> {
        self.next_region()
    }
}

/// Parse the leading `<hex>-<hex> <perm>` fields of a `maps` line.
///
/// Returns `None` for lines that do not have that shape or describe an empty
/// or inverted range.
pub fn parse_map_line(line: &[u8]) -> Option<MemoryRegion> {
    let (start, rest) = take_hex(line)?;
    let rest = rest.strip_prefix(b"-")?;
    let (end, rest) = take_hex(rest)?;
    let perm = *skip_space(rest).first()?;

    let size = end.checked_sub(start).filter(|&size| size > 0)?;
    Some(MemoryRegion {
        start,
        size,
        readable: perm == READ_FLAG,
    })
}

fn skip_space(input: &[u8]) -> &[u8] {
    let skip = input
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    &input[skip..]
}

fn take_hex(input: &[u8]) -> Option<(u64, &[u8])> {
    let mut input = skip_space(input);
    if let [b'0', b'x' | b'X', next, ..] = input {
        if next.is_ascii_hexdigit() {
            input = &input[2..];
        }
    }

    let digits = input.iter().take_while(|b| b.is_ascii_hexdigit()).count();
    if digits == 0 {
        return None;
    }

    let mut value: u64 = 0;
    for &b in &input[..digits] {
        let nibble = (b as char).to_digit(16)? as u64;
        value = value.checked_mul(16)?.checked_add(nibble)?;
    }
    Some((value, &input[digits..]))
}
