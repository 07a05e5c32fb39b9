//! Fixed-capacity FIFO queue
//!
//! Bytes move between the interrupt handler and foreground code through
//! these queues. Capacity is fixed at compile time; a push into a full queue
//! is rejected and the item is dropped, never retried.

use heapless::Deque;

/// Capacity of the bus driver's receive and transmit queues
///
/// This is wire-visible: a transaction moving more bytes than this through
/// either queue loses the excess.
pub const BUS_QUEUE_CAPACITY: usize = 32;

/// Bounded circular FIFO
#[derive(Debug)]
pub struct BoundedQueue<T, const N: usize> {
    items: Deque<T, N>,
    dropped: u32,
}

impl<T, const N: usize> Default for BoundedQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> BoundedQueue<T, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            items: Deque::new(),
            dropped: 0,
        }
    }

    /// Append an item at the tail
    ///
    /// Returns `false` and discards `item` if the queue is full.
    pub fn push(&mut self, item: T) -> bool {
        match self.items.push_back(item) {
            Ok(()) => true,
            Err(_) => {
                self.dropped = self.dropped.saturating_add(1);
                false
            }
        }
    }

    /// Remove the item at the head
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Number of queued items
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue holds no items
    pub fn empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a push would be rejected
    pub fn full(&self) -> bool {
        self.items.is_full()
    }

    /// Maximum number of items
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Total pushes rejected since creation
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Discard all queued items
    ///
    /// The dropped-push count is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_pop_fifo() {
        let mut q: BoundedQueue<u8, 4> = BoundedQueue::new();
        assert!(q.empty());
        assert!(q.push(1));
        assert!(q.push(2));
        assert_eq!(q.size(), 2);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), None);
        assert!(q.empty());
    }

    #[test]
    fn test_full_queue_rejects_and_counts() {
        let mut q: BoundedQueue<u8, 2> = BoundedQueue::new();
        assert!(q.push(1));
        assert!(q.push(2));
        assert!(q.full());
        assert!(!q.push(3));
        assert!(!q.push(4));
        assert_eq!(q.dropped(), 2);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
    }

    #[test]
    fn test_wraps_around_capacity() {
        let mut q: BoundedQueue<u8, 3> = BoundedQueue::new();
        for round in 0..10u8 {
            assert!(q.push(round));
            assert!(q.push(round.wrapping_add(100)));
            assert_eq!(q.pop(), Some(round));
            assert_eq!(q.pop(), Some(round.wrapping_add(100)));
        }
        assert!(q.empty());
        assert_eq!(q.dropped(), 0);
    }

    #[test]
    fn test_does_not_only_accept_when_full() {
        // A push must succeed into a queue that has room, and every push
        // after the capacity is reached must fail.
        let mut q: BoundedQueue<u8, BUS_QUEUE_CAPACITY> = BoundedQueue::new();
        assert!(q.push(0));
        for i in 1..BUS_QUEUE_CAPACITY as u8 {
            assert!(q.push(i));
        }
        for i in 0..5 {
            assert!(!q.push(i));
        }
        assert_eq!(q.size(), BUS_QUEUE_CAPACITY);
    }

    #[test]
    fn test_clear_keeps_drop_count() {
        let mut q: BoundedQueue<u8, 1> = BoundedQueue::new();
        q.push(1);
        q.push(2);
        q.clear();
        assert!(q.empty());
        assert_eq!(q.dropped(), 1);
    }

    proptest! {
        #[test]
        fn test_fifo_order_up_to_capacity(items in proptest::collection::vec(any::<u8>(), 0..=BUS_QUEUE_CAPACITY)) {
            let mut q: BoundedQueue<u8, BUS_QUEUE_CAPACITY> = BoundedQueue::new();
            for &item in &items {
                prop_assert!(q.push(item));
            }
            for &item in &items {
                prop_assert_eq!(q.pop(), Some(item));
            }
            prop_assert_eq!(q.size(), 0);
        }

        #[test]
        fn test_overflow_rejects_exactly_excess(extra in 1usize..64) {
            let mut q: BoundedQueue<usize, BUS_QUEUE_CAPACITY> = BoundedQueue::new();
            for i in 0..BUS_QUEUE_CAPACITY + extra {
                let accepted = q.push(i);
                prop_assert_eq!(accepted, i < BUS_QUEUE_CAPACITY);
                prop_assert!(q.size() <= BUS_QUEUE_CAPACITY);
            }
            prop_assert_eq!(q.dropped() as usize, extra);
            // Survivors are the first pushes, in order
            for i in 0..BUS_QUEUE_CAPACITY {
                prop_assert_eq!(q.pop(), Some(i));
            }
        }
    }
}
