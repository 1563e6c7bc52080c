use std::cell::UnsafeCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{fence, AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_utils::{Backoff, CachePadded};

/// Fixed-capacity lock-free ring shared by exactly one [`Producer`] and one
/// [`Consumer`].
///
/// The ring consists of a preallocated slice of slots and two cursors. Both
/// cursors only ever increase (wrapping at the integer limit) and a slot index is
/// `cursor & mask`. Occupancy is `write - read`, which always lies in
/// `[0, capacity]`.
///
/// # Memory ordering
///
/// - The producer writes the slot, then stores `write_index` with `Release`.
///   The consumer loads `write_index` with `Acquire` before touching the slot,
///   so a published record is fully visible once it is counted.
/// - The consumer reads the slot, then stores `read_index` with `Release`.
///   The producer loads `read_index` with `Acquire` before reusing the slot,
///   so a slot is never overwritten while it is still being read.
struct Ring<T> {
    slots: Box<[UnsafeCell<T>]>,
    mask: usize,
    write_index: CachePadded<AtomicUsize>,
    read_index: CachePadded<AtomicUsize>,
}

// SAFETY: a slot is only accessed by the producer while it is unpublished and by
// the consumer while it is published and unreleased; the cursor protocol above
// keeps those windows disjoint.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T> Ring<T> {
    #[inline(always)]
    fn capacity(&self) -> usize {
        self.mask + 1
    }

    #[inline]
    fn len(&self) -> usize {
        // Read the consumer cursor first so the difference can only overestimate.
        let read = self.read_index.load(Ordering::Acquire);
        let write = self.write_index.load(Ordering::Acquire);
        write.wrapping_sub(read).min(self.capacity())
    }

    #[inline(always)]
    fn slot(&self, cursor: usize) -> *mut T {
        self.slots[cursor & self.mask].get()
    }
}

/// Creates a single-producer/single-consumer channel with room for at least
/// `capacity` elements.
///
/// All slots are allocated up front and filled with `T::default()`; nothing is
/// allocated afterwards. The capacity is rounded up to the next power of two
/// (minimum 1) and [`Producer::capacity`] reports the effective value.
///
/// Neither handle is `Clone`, so a channel can never gain a second producer or
/// a second consumer.
///
/// # Examples
///
/// ```
/// # use spsc_logger::spsc_queue::channel;
/// let (mut tx, mut rx) = channel::<u32>(3);
/// assert_eq!(tx.capacity(), 4);
///
/// tx.push(7);
/// tx.push(8);
/// assert_eq!(rx.len(), 2);
/// assert_eq!(rx.pop(), Some(7));
/// assert_eq!(rx.pop(), Some(8));
/// assert_eq!(rx.pop(), None);
/// ```
pub fn channel<T: Default + Send>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    let capacity = capacity.max(1).next_power_of_two();
    let slots: Box<[UnsafeCell<T>]> = (0..capacity).map(|_| UnsafeCell::new(T::default())).collect();

    let ring = Arc::new(Ring {
        slots,
        mask: capacity - 1,
        write_index: CachePadded::new(AtomicUsize::new(0)),
        read_index: CachePadded::new(AtomicUsize::new(0)),
    });

    let producer = Producer {
        ring: Arc::clone(&ring),
        write_cursor: 0,
        cached_read: 0,
    };
    let consumer = Consumer {
        ring,
        read_cursor: 0,
        cached_write: 0,
    };
    (producer, consumer)
}

/// Write half of a [`channel`].
pub struct Producer<T> {
    ring: Arc<Ring<T>>,
    // Owned copy of `ring.write_index`; only this handle advances it.
    write_cursor: usize,
    // Last observed `ring.read_index`; refreshed only when the ring looks full.
    cached_read: usize,
}

impl<T> Producer<T> {
    /// Reserves the next free slot, waiting while the ring is full.
    ///
    /// The wait is a spin with exponential backoff that yields to the scheduler
    /// once spinning stops paying off. It has no timeout: a full ring holds the
    /// producer until the consumer releases a slot, so an element is never
    /// dropped or overwritten.
    ///
    /// The returned slot still holds whatever value was last stored there.
    /// Nothing becomes visible to the consumer until [`WriteSlot::commit`].
    ///
    /// # Panics
    ///
    /// If the ring is full and the [`Consumer`] has been dropped, the wait could
    /// never end, so this panics with a `FATAL` message instead.
    #[inline]
    pub fn reserve(&mut self) -> WriteSlot<'_, T> {
        let capacity = self.ring.capacity();
        if self.write_cursor.wrapping_sub(self.cached_read) >= capacity {
            let backoff = Backoff::new();
            loop {
                self.cached_read = self.ring.read_index.load(Ordering::Acquire);
                if self.write_cursor.wrapping_sub(self.cached_read) < capacity {
                    break;
                }
                // Only this producer holds the ring: nothing will ever free a slot.
                if Arc::strong_count(&self.ring) == 1 {
                    // The consumer may have released a slot just before dropping.
                    fence(Ordering::Acquire);
                    self.cached_read = self.ring.read_index.load(Ordering::Acquire);
                    if self.write_cursor.wrapping_sub(self.cached_read) < capacity {
                        break;
                    }
                    crate::error::fatal("log consumer is gone; element would never be delivered");
                }
                backoff.snooze();
            }
        }
        WriteSlot { producer: self }
    }

    /// Writes `value` into the next slot and publishes it.
    #[inline(always)]
    pub fn push(&mut self, value: T) {
        let mut slot = self.reserve();
        *slot = value;
        slot.commit();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("capacity", &self.capacity())
            .field("write_cursor", &self.write_cursor)
            .field("len", &self.len())
            .finish()
    }
}

/// A reserved, not yet published slot.
///
/// Dereferences to the slot's value. Dropping it without calling
/// [`commit`](WriteSlot::commit) leaves the element unpublished and the slot is
/// handed out again by the next [`Producer::reserve`].
pub struct WriteSlot<'a, T> {
    producer: &'a mut Producer<T>,
}

impl<T> WriteSlot<'_, T> {
    /// Publishes the slot to the consumer.
    #[inline(always)]
    pub fn commit(self) {
        let producer = self.producer;
        producer.write_cursor = producer.write_cursor.wrapping_add(1);
        producer.ring.write_index.store(producer.write_cursor, Ordering::Release);
    }
}

impl<T> Deref for WriteSlot<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: `reserve` established that the consumer has released this
        // slot, and the exclusive borrow of the producer keeps it ours.
        unsafe { &*self.producer.ring.slot(self.producer.write_cursor) }
    }
}

impl<T> DerefMut for WriteSlot<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: see `deref`.
        unsafe { &mut *self.producer.ring.slot(self.producer.write_cursor) }
    }
}

/// Read half of a [`channel`].
pub struct Consumer<T> {
    ring: Arc<Ring<T>>,
    // Owned copy of `ring.read_index`; only this handle advances it.
    read_cursor: usize,
    // Last observed `ring.write_index`; refreshed only when the ring looks empty.
    cached_write: usize,
}

impl<T> Consumer<T> {
    /// Returns the oldest published slot, or `None` if nothing is available.
    ///
    /// The slot stays owned by the consumer until [`ReadSlot::release`] hands it
    /// back to the producer; dropping the slot without releasing it means the
    /// same element is returned by the next `peek`.
    #[inline]
    pub fn peek(&mut self) -> Option<ReadSlot<'_, T>> {
        if self.cached_write == self.read_cursor {
            self.cached_write = self.ring.write_index.load(Ordering::Acquire);
            if self.cached_write == self.read_cursor {
                return None;
            }
        }
        Some(ReadSlot { consumer: self })
    }

    /// Copies out the oldest element and releases its slot.
    #[inline]
    pub fn pop(&mut self) -> Option<T>
    where
        T: Clone,
    {
        let slot = self.peek()?;
        let value = (*slot).clone();
        slot.release();
        Some(value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("capacity", &self.capacity())
            .field("read_cursor", &self.read_cursor)
            .field("len", &self.len())
            .finish()
    }
}

/// A published slot that the consumer is reading.
pub struct ReadSlot<'a, T> {
    consumer: &'a mut Consumer<T>,
}

impl<T> ReadSlot<'_, T> {
    /// Hands the slot back to the producer for reuse.
    #[inline(always)]
    pub fn release(self) {
        let consumer = self.consumer;
        consumer.read_cursor = consumer.read_cursor.wrapping_add(1);
        consumer.ring.read_index.store(consumer.read_cursor, Ordering::Release);
    }
}

impl<T> Deref for ReadSlot<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: `peek` observed a `write_index` past this cursor with
        // `Acquire`, and the producer cannot reuse the slot before `release`.
        unsafe { &*self.consumer.ring.slot(self.consumer.read_cursor) }
    }
}
