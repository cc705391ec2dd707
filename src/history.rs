// Fixed-capacity rolling history feeding the utilization charts

use crate::models::UtilizationSample;

/// Samples kept per chart (one per tick).
pub const DEFAULT_HISTORY_CAPACITY: usize = 120;

/// Ring buffer: once full, each append overwrites the oldest slot.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T> {
    slots: Vec<T>,
    /// Slot holding the oldest entry once the buffer is full.
    head: usize,
    capacity: usize,
}

impl<T: Clone> HistoryBuffer<T> {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    pub fn append(&mut self, item: T) {
        if self.slots.len() < self.capacity {
            self.slots.push(item);
        } else {
            self.slots[self.head] = item;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl HistoryBuffer<UtilizationSample> {
    pub fn rx_series(&self) -> Vec<f64> {
        self.iter().map(|s| s.rx_percent).collect()
    }

    pub fn tx_series(&self) -> Vec<f64> {
        self.iter().map(|s| s.tx_percent).collect()
    }
}

impl<T: Clone> Default for HistoryBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
