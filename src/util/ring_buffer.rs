// Ring Buffer - Fixed set of reusable slots handed out in circular order
//
// Used to recycle frequently rebuilt values (frame rasters) instead of
// allocating a new one every frame.

/// Fixed-size ring of `T` slots
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    index: usize,
}

impl<T: Clone> RingBuffer<T> {
    /// Create a ring of `size` slots, each initialized to `initial`
    ///
    /// # Panics
    /// Panics if `size` is zero
    pub fn new(size: usize, initial: T) -> Self {
        assert!(size > 0, "ring buffer needs at least one slot");
        RingBuffer {
            slots: vec![initial; size],
            index: 0,
        }
    }
}

impl<T> RingBuffer<T> {
    /// Create a ring from explicit slot values
    ///
    /// # Panics
    /// Panics if `slots` is empty
    pub fn from_slots(slots: Vec<T>) -> Self {
        assert!(!slots.is_empty(), "ring buffer needs at least one slot");
        RingBuffer { slots, index: 0 }
    }

    /// Index of the slot the next call to `next_mut` returns
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Return the current slot and advance, wrapping back to slot zero
    pub fn next_mut(&mut self) -> &mut T {
        let current = self.index;
        self.index = (self.index + 1) % self.slots.len();
        &mut self.slots[current]
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    /// Replace the value at `index`
    ///
    /// # Panics
    /// Panics if `index` is out of range
    pub fn set(&mut self, index: usize, value: T) {
        self.slots[index] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps() {
        let mut ring = RingBuffer::from_slots(vec![1, 2, 3]);
        assert_eq!(*ring.next_mut(), 1);
        assert_eq!(*ring.next_mut(), 2);
        assert_eq!(*ring.next_mut(), 3);
        assert_eq!(ring.index(), 0);
        assert_eq!(*ring.next_mut(), 1);
    }

    #[test]
    fn test_slot_mutation_persists() {
        let mut ring = RingBuffer::new(2, 0u8);
        *ring.next_mut() = 7;
        ring.next_mut();
        assert_eq!(*ring.next_mut(), 7);
    }

    #[test]
    fn test_set_get() {
        let mut ring = RingBuffer::new(2, 'a');
        ring.set(1, 'b');
        assert_eq!(ring.get(1), Some(&'b'));
        assert_eq!(ring.get(2), None);
        assert_eq!(ring.len(), 2);
        assert!(!ring.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_empty_ring_rejected() {
        let _ = RingBuffer::<u8>::from_slots(Vec::new());
    }
}
