//! Lock-free single-producer single-consumer (SPSC) byte ring buffer.
//!
//! [`RingBuffer`] is the transport underneath every serial path in this
//! crate: the UART receive ISR stores into one, the UART transmit ISR drains
//! another, and the PDM DMA-completion handler stores captured PCM bytes into
//! a third. Foreground code sits on the other end of each.
//!
//! # Safety Contract
//!
//! - Only ONE context may call the store operations (the "producer").
//! - Only ONE context may call the read operations (the "consumer").
//! - These may be an interrupt handler and the main loop, preempting each
//!   other at any instruction boundary.
//!
//! Code that wants the contract checked by the compiler can take the two
//! roles apart with [`RingBuffer::split`].
//!
//! # Memory ordering
//!
//! Each cursor has exactly one writer. A side loads its own cursor
//! `Relaxed` and the opposite cursor `Acquire`, and publishes its own cursor
//! with `Release` only after the payload copy is complete. Only atomic
//! `load`/`store` are used, so the buffer also works on cores without
//! compare-and-swap (`thumbv6m`).

use core::cell::UnsafeCell;
use core::fmt;
use core::ptr;
use core::sync::atomic::{AtomicUsize, Ordering};

mod split;

pub use split::{Consumer, Producer};

/// A lock-free SPSC ring buffer of `N` bytes.
///
/// The usable capacity is `N - 1`: one slot is sacrificed so that
/// `head == tail` always means empty and `head + 1 == tail` always means
/// full, without a separate count field.
///
/// Overflow drops the newest data (a full buffer rejects the incoming byte),
/// underflow reports `None`. Nothing ever blocks.
///
/// `N` need not be a power of two; cursors wrap with `% N`. A capacity
/// below 2 is rejected at compile time:
///
/// ```compile_fail
/// let ring = artemis_io::ring::RingBuffer::<1>::new();
/// ```
pub struct RingBuffer<const N: usize> {
    storage: UnsafeCell<[u8; N]>,
    /// Write position (only modified by the producer).
    head: AtomicUsize,
    /// Read position (only modified by the consumer).
    tail: AtomicUsize,
}

// SAFETY: The SPSC contract ensures that head and tail are only modified by
// their respective sides. The producer only writes storage slots outside the
// unread region and the consumer only reads slots inside it; Release/Acquire
// on the cursors orders those accesses across contexts.
unsafe impl<const N: usize> Sync for RingBuffer<N> {}

impl<const N: usize> RingBuffer<N> {
    const CAPACITY_CHECK: () = assert!(N >= 2, "ring buffer must have at least 2 slots (1 usable)");

    /// Create a new, zero-filled, empty buffer.
    ///
    /// `const`, so buffers can live in `static`s without a runtime initializer.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_CHECK;

        RingBuffer {
            storage: UnsafeCell::new([0; N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    #[inline]
    fn base(&self) -> *mut u8 {
        self.storage.get().cast::<u8>()
    }

    // ── Producer side ──────────────────────────────────────────────────

    /// Store one byte (producer side).
    ///
    /// Returns `false` if the buffer is full; the byte is dropped.
    pub fn store(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % N;

        if next == self.tail.load(Ordering::Acquire) {
            return false;
        }

        // SAFETY: We are the sole producer and `head < N`. `next != tail`
        // means slot `head` is outside the unread region, so the consumer
        // is not reading it.
        unsafe {
            self.base().add(head).write(byte);
        }

        // Release: the payload write is visible before the new head.
        self.head.store(next, Ordering::Release);
        true
    }

    /// Store as much of `data` as fits (producer side).
    ///
    /// Copies the longest prefix of `data` that fits in the free space, in at
    /// most two contiguous copies: up to the physical end of storage, then
    /// from index 0. Returns the number of bytes stored; the remainder is
    /// dropped. Stored bytes keep their order.
    pub fn store_buffer(&self, data: &[u8]) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        let free = (tail + N - head - 1) % N;
        let count = data.len().min(free);
        if count == 0 {
            return 0;
        }

        let first = count.min(N - head);
        let second = count - first;

        // SAFETY: Both segments lie in the free region [head, tail - 1) mod N,
        // which the consumer never touches. `first <= N - head` and
        // `second < tail` keep both copies inside storage.
        unsafe {
            ptr::copy_nonoverlapping(data.as_ptr(), self.base().add(head), first);
            ptr::copy_nonoverlapping(data.as_ptr().add(first), self.base(), second);
        }

        self.head.store((head + count) % N, Ordering::Release);
        count
    }

    /// Number of bytes that can still be stored before the buffer is full.
    pub fn available_for_store(&self) -> usize {
        N - 1 - self.available()
    }

    /// Whether the next [`store()`](Self::store) would be rejected.
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + 1) % N == tail
    }

    // ── Consumer side ──────────────────────────────────────────────────

    /// Read one byte (consumer side).
    ///
    /// Returns `None` if the buffer is empty.
    pub fn read(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: We are the sole consumer and `tail != head`, so slot
        // `tail` holds published data the producer will not overwrite until
        // we advance past it.
        let byte = unsafe { self.base().add(tail).read() };

        // Release: the read completes before the slot is handed back.
        self.tail.store((tail + 1) % N, Ordering::Release);
        Some(byte)
    }

    /// Return the next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: Same as `read()`; the cursor is left untouched.
        Some(unsafe { self.base().add(tail).read() })
    }

    /// Copy pending bytes into `dest` (consumer side).
    ///
    /// Returns `None` if the buffer is empty, which lets callers tell "nothing
    /// to read" apart from "read zero of zero requested". Otherwise copies
    /// `min(dest.len(), available())` bytes, advances past them and returns
    /// `Some(count)`.
    pub fn read_buffer(&self, dest: &mut [u8]) -> Option<usize> {
        let len = dest.len();
        self.consume(Some(dest), len)
    }

    /// Discard up to `len` pending bytes without copying them.
    ///
    /// Same accounting and return value as [`read_buffer()`](Self::read_buffer).
    pub fn skip(&self, len: usize) -> Option<usize> {
        self.consume(None, len)
    }

    /// Discard everything pending. Returns the number of bytes dropped.
    ///
    /// Unlike [`clear()`](Self::clear) this is a consumer-side operation: it
    /// only moves `tail`, so the producer may keep running.
    pub fn drain(&self) -> usize {
        self.skip(usize::MAX).unwrap_or(0)
    }

    fn consume(&self, dest: Option<&mut [u8]>, len: usize) -> Option<usize> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None;
        }

        let count = len.min((head + N - tail) % N);
        let first = count.min(N - tail);
        let second = count - first;

        if let Some(dest) = dest {
            // SAFETY: Both segments lie in the unread region published by the
            // producer (Acquire on head above). `dest` holds at least `count`
            // bytes and cannot alias storage, which is only reachable
            // through raw pointers.
            unsafe {
                ptr::copy_nonoverlapping(self.base().add(tail), dest.as_mut_ptr(), first);
                ptr::copy_nonoverlapping(self.base(), dest.as_mut_ptr().add(first), second);
            }
        }

        self.tail.store((tail + count) % N, Ordering::Release);
        Some(count)
    }

    /// Number of unread bytes, in `[0, N)`.
    pub fn available(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + N - tail) % N
    }

    /// Whether there is nothing to read.
    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Acquire) == self.head.load(Ordering::Acquire)
    }

    // ── Exclusive access ───────────────────────────────────────────────

    /// Reset both cursors to 0, logically discarding all pending data.
    ///
    /// Storage is not wiped; old bytes stay until overwritten. Requires
    /// `&mut self`, so neither role can be active concurrently.
    pub fn clear(&mut self) {
        *self.head.get_mut() = 0;
        *self.tail.get_mut() = 0;
    }

    /// Usable capacity (`N - 1`).
    pub const fn capacity(&self) -> usize {
        N - 1
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for RingBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &(N - 1))
            .field("head", &self.head.load(Ordering::Relaxed))
            .field("tail", &self.tail.load(Ordering::Relaxed))
            .finish()
    }
}
