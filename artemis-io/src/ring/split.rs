//! Producer/consumer handles for a [`RingBuffer`].
//!
//! [`RingBuffer::split`] hands out exactly one [`Producer`] and one
//! [`Consumer`] for the lifetime of an exclusive borrow, so code that only
//! ever touches the buffer through the handles cannot break the
//! single-producer single-consumer rule.

use super::RingBuffer;

/// The storing half of a split [`RingBuffer`].
pub struct Producer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

/// The reading half of a split [`RingBuffer`].
pub struct Consumer<'a, const N: usize> {
    ring: &'a RingBuffer<N>,
}

impl<const N: usize> RingBuffer<N> {
    /// Split the buffer into its producer and consumer roles.
    ///
    /// Both handles are `Send`, so each can move into the context that owns
    /// that role (an interrupt handler and the main loop, or two threads).
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let ring = &*self;
        (Producer { ring }, Consumer { ring })
    }
}

impl<const N: usize> Producer<'_, N> {
    /// See [`RingBuffer::store`].
    pub fn store(&self, byte: u8) -> bool {
        self.ring.store(byte)
    }

    /// See [`RingBuffer::store_buffer`].
    pub fn store_buffer(&self, data: &[u8]) -> usize {
        self.ring.store_buffer(data)
    }

    /// See [`RingBuffer::available_for_store`].
    pub fn available_for_store(&self) -> usize {
        self.ring.available_for_store()
    }

    /// See [`RingBuffer::is_full`].
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }
}

impl<const N: usize> Consumer<'_, N> {
    /// See [`RingBuffer::read`].
    pub fn read(&self) -> Option<u8> {
        self.ring.read()
    }

    /// See [`RingBuffer::peek`].
    pub fn peek(&self) -> Option<u8> {
        self.ring.peek()
    }

    /// See [`RingBuffer::read_buffer`].
    pub fn read_buffer(&self, dest: &mut [u8]) -> Option<usize> {
        self.ring.read_buffer(dest)
    }

    /// See [`RingBuffer::skip`].
    pub fn skip(&self, len: usize) -> Option<usize> {
        self.ring.skip(len)
    }

    /// See [`RingBuffer::drain`].
    pub fn drain(&self) -> usize {
        self.ring.drain()
    }

    /// See [`RingBuffer::available`].
    pub fn available(&self) -> usize {
        self.ring.available()
    }

    /// See [`RingBuffer::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}
