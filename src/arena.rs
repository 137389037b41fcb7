use crate::{Error, Result};

/// Offset-based descriptor of a region handed out by a [`ScratchArena`].
/// Regions stay valid as the arena grows; contents are stable until `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaRegion {
    offset: usize,
    len: usize,
}

impl ArenaRegion {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

const DEFAULT_MAX_BYTES: usize = 64 * 1024 * 1024;

/// Per-batch scratch allocator for variable-length and fixed-length encoded
/// payloads. Every allocation is zero-initialized; exhaustion past the byte
/// budget is fatal for the batch.
#[derive(Debug, Clone)]
pub struct ScratchArena {
    bytes: Vec<u8>,
    max_bytes: usize,
}

impl Default for ScratchArena {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_BYTES)
    }
}

impl ScratchArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(max_bytes: usize) -> Self {
        Self {
            bytes: Vec::new(),
            max_bytes,
        }
    }

    pub fn alloc(&mut self, len: usize) -> Result<ArenaRegion> {
        let offset = self.bytes.len();
        let end = offset.checked_add(len).ok_or(Error::AllocationFailure {
            requested: len,
            available: self.max_bytes - offset,
        })?;
        if end > self.max_bytes {
            return Err(Error::AllocationFailure {
                requested: len,
                available: self.max_bytes - offset,
            });
        }
        self.bytes.resize(end, 0u8);
        Ok(ArenaRegion { offset, len })
    }

    pub fn alloc_bytes(&mut self, src: &[u8]) -> Result<ArenaRegion> {
        let region = self.alloc(src.len())?;
        self.bytes[region.offset..region.offset + region.len].copy_from_slice(src);
        Ok(region)
    }

    pub fn get(&self, region: ArenaRegion) -> Result<&[u8]> {
        let end = region
            .offset
            .checked_add(region.len)
            .ok_or_else(|| Error::Layout("arena region out of bounds".to_string()))?;
        if end > self.bytes.len() {
            return Err(Error::Layout("arena region out of bounds".to_string()));
        }
        Ok(&self.bytes[region.offset..end])
    }

    /// Invalidates all regions. The next allocation of the same length hands
    /// out a zeroed region again.
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    pub fn used(&self) -> usize {
        self.bytes.len()
    }
}
