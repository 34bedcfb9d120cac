//! Bounded Blocking Ring Buffer
//!
//! Provides a fixed-capacity circular queue shared between one producer
//! and one consumer. Flow control uses a pair of counting semaphores
//! (free slots / filled slots) and a mutex guards the slots and indices.

mod buffer;
mod semaphore;

pub use buffer::BoundedBuffer;
pub use semaphore::CountingSemaphore;

use thiserror::Error;

/// Errors raised when building a buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Capacity must be at least one slot
    #[error("Buffer capacity must be at least 1")]
    ZeroCapacity,
}
