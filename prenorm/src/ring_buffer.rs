use crate::error::{Error, Result};

/// Delay line: accumulates contributions for future steps.
///
/// Slot for `lag` is `(origin + lag) % capacity`, where `origin` is the first
/// step of the current delivery interval. Reading a slot hands out its value
/// and zeroes it, so the slot can be reused `capacity` steps later.
#[derive(Debug, Clone, Default)]
pub struct RingBuffer {
    slots: Vec<f64>,
    origin: u64,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0.0; capacity.max(1)],
            origin: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Zero every slot and resize to `capacity`.
    pub fn resize(&mut self, capacity: usize) {
        self.slots.clear();
        self.slots.resize(capacity.max(1), 0.0);
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = 0.0);
    }

    pub fn set_origin(&mut self, origin: u64) {
        self.origin = origin;
    }

    #[inline]
    pub fn origin(&self) -> u64 {
        self.origin
    }

    #[inline]
    fn index(&self, lag: u64) -> usize {
        ((self.origin + lag) % self.slots.len() as u64) as usize
    }

    /// Add `value` to the slot `lag` steps after the current origin.
    pub fn add_value(&mut self, lag: u64, value: f64) -> Result<()> {
        if lag >= self.slots.len() as u64 {
            return Err(Error::DelayOutOfRange {
                offset: lag,
                capacity: self.slots.len(),
            });
        }
        let i = self.index(lag);
        self.slots[i] += value;
        Ok(())
    }

    /// Take the accumulated value for `lag`, leaving the slot at zero.
    #[inline]
    pub fn get_value(&mut self, lag: u64) -> f64 {
        let i = self.index(lag);
        std::mem::take(&mut self.slots[i])
    }
}
