//! A bounded, lock-free single-producer/single-consumer ring buffer.
//!
//! [`channel`] splits the ring into a [`Producer`] and a [`Consumer`]
//! handle. Single-producer and single-consumer discipline is enforced at
//! compile time: neither handle is `Clone`, so only one of each can ever
//! exist. Callers that need many senders (the mailbox's MPSC facade) serialize
//! them externally rather than cloning the `Producer`.

// Layer 1: Standard library imports
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::CachePadded;

/// Errors raised when constructing a ring.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// `capacity` was not a power of two, or was zero.
    #[error("ring capacity {0} must be a non-zero power of two")]
    InvalidCapacity(u32),
}

struct Shared<T> {
    mask: u32,
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
    // head (consumer-owned) and tail (producer-owned) are cache-line padded
    // so a spinning producer never shares a line with the consumer index.
    head: CachePadded<AtomicU32>,
    tail: CachePadded<AtomicU32>,
}

// SAFETY: access to `buffer` slots is partitioned by index between the
// single Producer and single Consumer handles; `T: Send` is all that's
// needed to move values across the thread boundary between them.
unsafe impl<T: Send> Sync for Shared<T> {}

impl<T> Shared<T> {
    fn len(&self) -> u32 {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        tail.wrapping_sub(head)
    }

    fn capacity(&self) -> u32 {
        self.mask.wrapping_add(1)
    }
}

/// The single producer handle for a ring created by [`channel`].
pub struct Producer<T> {
    shared: Arc<Shared<T>>,
}

/// The single consumer handle for a ring created by [`channel`].
pub struct Consumer<T> {
    shared: Arc<Shared<T>>,
}

// SAFETY: Producer only ever touches the tail index and the slots it
// writes through it; safe to hand to whichever single thread owns it.
unsafe impl<T: Send> Send for Producer<T> {}
unsafe impl<T: Send> Send for Consumer<T> {}

/// Construct a ring of the given power-of-two capacity, returning its
/// producer and consumer halves.
pub fn channel<T>(capacity: u32) -> Result<(Producer<T>, Consumer<T>), RingError> {
    if capacity == 0 || !capacity.is_power_of_two() {
        return Err(RingError::InvalidCapacity(capacity));
    }
    let mut buffer = Vec::with_capacity(capacity as usize);
    for _ in 0..capacity {
        buffer.push(UnsafeCell::new(MaybeUninit::uninit()));
    }
    let shared = Arc::new(Shared {
        mask: capacity - 1,
        buffer: buffer.into_boxed_slice(),
        head: CachePadded::new(AtomicU32::new(0)),
        tail: CachePadded::new(AtomicU32::new(0)),
    });
    Ok((
        Producer {
            shared: Arc::clone(&shared),
        },
        Consumer { shared },
    ))
}

impl<T> Producer<T> {
    /// Push one item. Returns the item back (as `Err`) if the ring is
    /// currently full; the fast path does not allocate or block.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        let tail = self.shared.tail.load(Ordering::Relaxed);
        let next = tail.wrapping_add(1);
        let head = self.shared.head.load(Ordering::Acquire);
        if next.wrapping_sub(head) > self.shared.capacity() {
            return Err(item);
        }
        let slot = &self.shared.buffer[(tail & self.shared.mask) as usize];
        // SAFETY: this slot's index is owned by the producer until `tail`
        // is published below; the consumer will not read it until then.
        unsafe { (*slot.get()).write(item) };
        self.shared.tail.store(next, Ordering::Release);
        Ok(())
    }

    /// Push a contiguous batch, stopping (and returning the number
    /// accepted) at the first item that does not fit. Equivalent to
    /// calling [`Producer::push`] in a loop.
    pub fn push_batch(&mut self, items: impl IntoIterator<Item = T>) -> u32 {
        let mut accepted = 0;
        for item in items {
            if self.push(item).is_err() {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Number of items currently queued.
    pub fn len(&self) -> u32 {
        self.shared.len()
    }

    /// `true` if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ring capacity this producer/consumer pair was created with.
    pub fn capacity(&self) -> u32 {
        self.shared.capacity()
    }
}

impl<T> Consumer<T> {
    /// Pop one item, or `None` if the ring is empty.
    pub fn pop(&mut self) -> Option<T> {
        let head = self.shared.head.load(Ordering::Relaxed);
        let tail = self.shared.tail.load(Ordering::Acquire);
        if head == tail {
            return None;
        }
        let slot = &self.shared.buffer[(head & self.shared.mask) as usize];
        // SAFETY: the producer has already published this slot via the
        // Release store to `tail` observed above; we own it until we
        // advance `head`.
        let item = unsafe { (*slot.get()).assume_init_read() };
        self.shared.head.store(head.wrapping_add(1), Ordering::Release);
        Some(item)
    }

    /// Pop up to `max` items in FIFO order.
    pub fn pop_batch(&mut self, max: u32) -> Vec<T> {
        let mut out = Vec::with_capacity(max as usize);
        for _ in 0..max {
            match self.pop() {
                Some(item) => out.push(item),
                None => break,
            }
        }
        out
    }

    /// Number of items currently queued.
    pub fn len(&self) -> u32 {
        self.shared.len()
    }

    /// `true` if no items are queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ring capacity this producer/consumer pair was created with.
    pub fn capacity(&self) -> u32 {
        self.shared.capacity()
    }
}

impl<T> Drop for Consumer<T> {
    fn drop(&mut self) {
        // Drain and drop any remaining items so `T`'s destructor still runs.
        while self.pop().is_some() {}
    }
}
