//! Ordered in-memory queue of records awaiting delivery

use super::log_record::LogRecord;
use std::collections::VecDeque;

/// Default number of lines buffered before a flush is forced
pub const DEFAULT_LINE_BUFFER: usize = 50;

/// Append-only queue drained wholesale by the flush path
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: VecDeque<LogRecord>,
    capacity: usize,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity bound; existing lines are kept
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
    }

    /// Push to the tail; returns true once the buffer has reached capacity
    pub fn append(&mut self, record: LogRecord) -> bool {
        self.lines.push_back(record);
        self.is_full()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.capacity
    }

    /// Take every buffered line, leaving the buffer empty
    pub fn drain_all(&mut self) -> Vec<LogRecord> {
        std::mem::take(&mut self.lines).into()
    }

    /// Remove the first `n` lines
    pub fn drop_oldest(&mut self, n: usize) {
        let n = n.min(self.lines.len());
        self.lines.drain(..n);
    }

    /// Keep only the newest `capacity` lines, returning how many were dropped
    pub fn retain_newest(&mut self) -> usize {
        let overflow = self.lines.len().saturating_sub(self.capacity);
        if overflow > 0 {
            self.drop_oldest(overflow);
        }
        overflow
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogRecord> {
        self.lines.iter()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_BUFFER)
    }
}
