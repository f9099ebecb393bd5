//! Gesture Sequence Buffer
//!
//! INVARIANT: never holds more than `capacity` entries
//! INVARIANT: no two adjacent entries are equal
//! INVARIANT: empty immediately after a batch is handed out

/// Batch size handed to the interpretation service
pub const SEQUENCE_CAPACITY: usize = 10;

/// Category the classifier reports when it sees a hand but no gesture
pub const NO_GESTURE: &str = "None";

/// Outcome of a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferPush {
    /// `NO_GESTURE` is never buffered
    Ignored,
    /// Same as the last entry; buffer unchanged
    Duplicate,
    /// Appended; carries the new length
    Appended(usize),
    /// Capacity reached: the whole batch, buffer now empty
    Full(Vec<String>),
}

/// Bounded, deduplicated sequence of accepted gesture names
#[derive(Debug, Clone)]
pub struct GestureSequenceBuffer {
    entries: Vec<String>,
    capacity: usize,
}

impl GestureSequenceBuffer {
    pub fn new() -> Self {
        Self::with_capacity(SEQUENCE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, gesture: &str) -> BufferPush {
        if gesture == NO_GESTURE {
            return BufferPush::Ignored;
        }
        if self.entries.last().map(String::as_str) == Some(gesture) {
            return BufferPush::Duplicate;
        }

        self.entries.push(gesture.to_string());
        if self.entries.len() >= self.capacity {
            // Non-overlapping batches: hand everything out and start over
            return BufferPush::Full(std::mem::take(&mut self.entries));
        }
        BufferPush::Appended(self.entries.len())
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for GestureSequenceBuffer {
    fn default() -> Self {
        Self::new()
    }
}
