//! Blocking Ring Buffer Implementation

use crate::semaphore::CountingSemaphore;
use crate::BufferError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Slot storage and the two ring cursors, guarded together
struct Ring<T> {
    /// Pre-allocated slots, used circularly
    slots: Box<[Option<T>]>,
    /// Next slot to write (advanced by the producer only)
    write_index: usize,
    /// Next slot to read (advanced by the consumer only)
    read_index: usize,
}

impl<T> Ring<T> {
    fn put(&mut self, value: T) {
        let capacity = self.slots.len();
        self.slots[self.write_index] = Some(value);
        self.write_index = (self.write_index + 1) % capacity;
    }

    fn take(&mut self) -> T {
        let capacity = self.slots.len();
        let value = self.slots[self.read_index]
            .take()
            .expect("filled semaphore guarantees an occupied slot");
        self.read_index = (self.read_index + 1) % capacity;
        value
    }
}

/// Fixed-capacity FIFO shared by one producer and one consumer.
///
/// `empty` counts free slots and `filled` counts readable ones, so
/// `empty + filled == capacity` whenever no call is in flight. The ring
/// mutex is only held for the slot access and index bump, never while
/// waiting on either semaphore.
pub struct BoundedBuffer<T> {
    ring: Mutex<Ring<T>>,
    capacity: usize,
    empty: CountingSemaphore,
    filled: CountingSemaphore,
    /// Total values enqueued (for statistics)
    total_enqueued: AtomicUsize,
}

impl<T> BoundedBuffer<T> {
    /// Create a new buffer with `capacity` slots
    pub fn new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        let slots: Vec<Option<T>> = (0..capacity).map(|_| None).collect();
        Ok(Self {
            ring: Mutex::new(Ring {
                slots: slots.into_boxed_slice(),
                write_index: 0,
                read_index: 0,
            }),
            capacity,
            empty: CountingSemaphore::new(capacity),
            filled: CountingSemaphore::new(0),
            total_enqueued: AtomicUsize::new(0),
        })
    }

    /// Append a value, blocking while the buffer is full
    pub fn enqueue(&self, value: T) {
        self.empty.acquire();
        self.lock().put(value);
        self.total_enqueued.fetch_add(1, Ordering::Relaxed);
        self.filled.release();
    }

    /// Append a value if a slot is free, otherwise hand it back
    pub fn try_enqueue(&self, value: T) -> Result<(), T> {
        if !self.empty.try_acquire() {
            return Err(value);
        }
        self.lock().put(value);
        self.total_enqueued.fetch_add(1, Ordering::Relaxed);
        self.filled.release();
        Ok(())
    }

    /// Remove the oldest value, blocking while the buffer is empty
    pub fn dequeue(&self) -> T {
        self.filled.acquire();
        let value = self.lock().take();
        self.empty.release();
        value
    }

    /// Remove the oldest value if one is ready
    pub fn try_dequeue(&self) -> Option<T> {
        if !self.filled.try_acquire() {
            return None;
        }
        let value = self.lock().take();
        self.empty.release();
        Some(value)
    }

    /// Number of values ready to be dequeued
    pub fn len(&self) -> usize {
        self.filled.available()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.empty.available() == 0
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get total values enqueued (for statistics)
    pub fn total_enqueued(&self) -> usize {
        self.total_enqueued.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ring<T>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for BoundedBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedBuffer")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("total_enqueued", &self.total_enqueued())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{mpsc, Arc};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            BoundedBuffer::<f64>::new(0).unwrap_err(),
            BufferError::ZeroCapacity
        );
    }

    #[test]
    fn test_enqueue_and_dequeue() {
        let buffer = BoundedBuffer::new(3).unwrap();
        assert_eq!(buffer.capacity(), 3);
        buffer.enqueue(1.0);
        buffer.enqueue(2.0);

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.dequeue(), 1.0);
        assert_eq!(buffer.dequeue(), 2.0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.total_enqueued(), 2);
    }

    #[test]
    fn test_indices_wrap_around() {
        let buffer = BoundedBuffer::new(2).unwrap();

        for i in 0..10 {
            buffer.enqueue(i);
            buffer.enqueue(i + 100);
            assert!(buffer.is_full());
            assert_eq!(buffer.dequeue(), i);
            assert_eq!(buffer.dequeue(), i + 100);
        }
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_try_variants_respect_capacity() {
        let buffer = BoundedBuffer::new(1).unwrap();
        assert_eq!(buffer.try_dequeue(), None);
        assert_eq!(buffer.try_enqueue(5), Ok(()));
        assert_eq!(buffer.try_enqueue(6), Err(6));
        assert_eq!(buffer.try_dequeue(), Some(5));
        assert_eq!(buffer.try_dequeue(), None);
    }

    #[test]
    fn test_full_buffer_blocks_producer() {
        let buffer = Arc::new(BoundedBuffer::new(2).unwrap());
        buffer.enqueue(1.0);
        buffer.enqueue(2.0);

        let (done_tx, done_rx) = mpsc::channel();
        let producer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                buffer.enqueue(3.0);
                done_tx.send(()).unwrap();
            })
        };

        // Producer must stay parked until a slot frees up
        assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(buffer.dequeue(), 1.0);
        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        producer.join().unwrap();

        assert_eq!(buffer.dequeue(), 2.0);
        assert_eq!(buffer.dequeue(), 3.0);
    }

    #[test]
    fn test_empty_buffer_blocks_consumer() {
        let buffer = Arc::new(BoundedBuffer::<f64>::new(2).unwrap());

        let (value_tx, value_rx) = mpsc::channel();
        let consumer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                value_tx.send(buffer.dequeue()).unwrap();
            })
        };

        assert!(value_rx.recv_timeout(Duration::from_millis(100)).is_err());
        buffer.enqueue(42.0);
        assert_eq!(value_rx.recv_timeout(Duration::from_secs(5)), Ok(42.0));
        consumer.join().unwrap();
    }

    #[test]
    fn test_concurrent_producer_consumer_preserves_order() {
        let buffer = Arc::new(BoundedBuffer::new(4).unwrap());
        let count = 10_000;

        let producer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for i in 0..count {
                    buffer.enqueue(i);
                }
            })
        };

        let received: Vec<usize> = (0..count).map(|_| buffer.dequeue()).collect();
        producer.join().unwrap();

        assert_eq!(received, (0..count).collect::<Vec<_>>());
        assert!(buffer.is_empty());
    }

    proptest! {
        #[test]
        fn fifo_order_preserved(values in proptest::collection::vec(0.0f64..1000.0, 1..64)) {
            let buffer = BoundedBuffer::new(values.len()).unwrap();
            for value in &values {
                buffer.enqueue(*value);
            }
            let drained: Vec<f64> = (0..values.len()).map(|_| buffer.dequeue()).collect();
            prop_assert_eq!(drained, values);
        }
    }
}
