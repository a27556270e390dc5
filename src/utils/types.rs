/// One contiguous mapping of the target, in listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRegion {
    pub start: u64,
    pub size: u64,
    pub readable: bool,
}

impl MemoryRegion {
    pub fn end(&self) -> u64 {
        self.start + self.size
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.start && address - self.start < self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        let region = MemoryRegion {
            start: 0x400000,
            size: 0x1000,
            readable: true,
        };
        assert_eq!(region.end(), 0x401000);
        assert!(region.contains(0x400000));
        assert!(region.contains(0x400fff));
        assert!(!region.contains(0x401000));
        assert!(!region.contains(0x3fffff));
    }
}
