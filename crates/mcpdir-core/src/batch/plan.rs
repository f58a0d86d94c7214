//! Splitting a total into fixed-size batch slices.

use serde::{Deserialize, Serialize};

/// One batch: `size` items starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSlice {
    /// Position of this batch in the full run, counting from 0.
    pub index: u64,
    pub offset: u64,
    pub size: u32,
}

impl BatchSlice {
    pub fn end(&self) -> u64 {
        self.offset + u64::from(self.size)
    }
}

/// Batches covering `[start_offset, total)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    total: u64,
    batch_size: u32,
    start_offset: u64,
}

impl BatchPlan {
    /// A zero batch size is treated as 1.
    pub fn new(total: u64, batch_size: u32, start_offset: u64) -> Self {
        Self {
            total,
            batch_size: batch_size.max(1),
            start_offset: start_offset.min(total),
        }
    }

    pub const fn total(&self) -> u64 {
        self.total
    }

    pub const fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// ⌈total / batch_size⌉ for the whole run, ignoring the start offset.
    pub fn total_batches(&self) -> u64 {
        self.total.div_ceil(u64::from(self.batch_size))
    }

    /// Batches this plan will actually run.
    pub fn remaining_batches(&self) -> u64 {
        (self.total - self.start_offset).div_ceil(u64::from(self.batch_size))
    }

    pub fn slices(&self) -> impl Iterator<Item = BatchSlice> + '_ {
        let size = u64::from(self.batch_size);
        (0..self.remaining_batches()).map(move |n| {
            let offset = self.start_offset + n * size;
            let len = size.min(self.total - offset);
            BatchSlice {
                index: offset / size,
                offset,
                size: u32::try_from(len).unwrap_or(self.batch_size),
            }
        })
    }
}
