use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;

use super::config::UartConfig;
use super::port::{InterruptMask, UartPort};
use crate::constants::UART_FIFO_DEPTH;
use crate::error::UartError;
use crate::isr::IsrSlot;
use crate::ring::RingBuffer;

/// Timeout applied to the final flush in [`Uart::end`].
pub const END_FLUSH_TIMEOUT_MS: u32 = 100;

/// Polling granularity for the deadline-based helpers.
const POLL_INTERVAL_US: u32 = 100;

/// Interrupt-driven UART with an RX and a TX ring buffer.
///
/// Roles per ring:
///
/// | Ring | Producer | Consumer |
/// |------|----------|----------|
/// | RX (`RX` bytes) | [`on_interrupt()`](Self::on_interrupt) | foreground `read*` |
/// | TX (`TX` bytes) | foreground `write*` / `print` | [`on_interrupt()`](Self::on_interrupt) |
///
/// Neither side masks the interrupt on the hot path. Foreground methods must
/// all be called from one context, and `on_interrupt` only from the UART
/// vector.
pub struct Uart<P, const RX: usize, const TX: usize> {
    port: P,
    config: UartConfig,
    rx: RingBuffer<RX>,
    tx: RingBuffer<TX>,
    initialized: AtomicBool,
    /// Bytes dropped because the RX ring was full (written by the ISR only).
    rx_dropped: AtomicU32,
}

impl<P: UartPort, const RX: usize, const TX: usize> Uart<P, RX, TX> {
    /// Create an idle driver. Nothing touches the hardware until
    /// [`begin()`](Self::begin).
    pub const fn new(port: P, config: UartConfig) -> Self {
        Uart {
            port,
            config,
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            initialized: AtomicBool::new(false),
            rx_dropped: AtomicU32::new(0),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Configure and power the port, register in `slot`, and unmask the IRQ.
    ///
    /// The IRQ is enabled last, after the slot points at this instance.
    pub fn begin(&'static self, slot: &'static IsrSlot<Self>) -> Result<(), UartError>
    where
        Self: Sync,
    {
        self.config.validate()?;
        slot.register(self)?;

        self.port.power(true);
        self.port.configure(&self.config);
        self.port.enable_interrupts(InterruptMask::DRIVER);
        // Discard anything latched before we were listening.
        let _ = self.port.take_status();

        self.initialized.store(true, Ordering::Release);
        self.port.set_irq(true);

        debug!("uart: started at {} baud", self.config.baud_rate);
        Ok(())
    }

    /// Flush pending output, then mask, power down and release the slot.
    ///
    /// The port is shut down even if the flush times out; the timeout is
    /// still reported.
    pub fn end<D: DelayNs>(&self, slot: &IsrSlot<Self>, delay: &mut D) -> Result<(), UartError>
    where
        Self: Sync + 'static,
    {
        if !self.is_initialized() {
            return Err(UartError::NotInitialized);
        }

        let flushed = self.flush(delay, END_FLUSH_TIMEOUT_MS);
        if flushed.is_err() {
            warn!("uart: {} bytes unsent at shutdown", self.tx.available());
        }

        self.port.set_irq(false);
        self.port.disable_interrupts(InterruptMask::DRIVER);
        self.port.power(false);
        if !slot.unregister(self) {
            warn!("uart: slot owned by another instance, left registered");
        }
        self.initialized.store(false, Ordering::Release);

        debug!("uart: stopped");
        flushed
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    // ── Foreground: receive ────────────────────────────────────────────

    /// Number of received bytes waiting to be read.
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    /// Oldest received byte, or `None` if nothing is pending.
    pub fn read(&self) -> Option<u8> {
        self.rx.read()
    }

    pub fn peek(&self) -> Option<u8> {
        self.rx.peek()
    }

    /// Copy received bytes into `buf`. Returns the count (0 when nothing is
    /// pending).
    pub fn read_into(&self, buf: &mut [u8]) -> usize {
        self.rx.read_buffer(buf).unwrap_or(0)
    }

    /// Drop all pending received bytes. Returns how many were dropped.
    pub fn discard_input(&self) -> usize {
        self.rx.drain()
    }

    /// Total bytes lost to RX overflow since construction.
    pub fn rx_dropped(&self) -> u32 {
        self.rx_dropped.load(Ordering::Relaxed)
    }

    // ── Foreground: transmit ───────────────────────────────────────────

    /// Queue bytes for transmission without waiting.
    ///
    /// Returns how many were accepted; the rest were dropped because the TX
    /// ring is full. Returns 0 before [`begin()`](Self::begin).
    pub fn write(&self, data: &[u8]) -> usize {
        if !self.is_initialized() {
            return 0;
        }
        let stored = self.tx.store_buffer(data);
        if stored > 0 {
            self.port.pend();
        }
        stored
    }

    /// Queue one byte. Returns `false` if it was dropped.
    pub fn write_byte(&self, byte: u8) -> bool {
        self.write(&[byte]) == 1
    }

    /// Queue all of `data`, polling for TX space until `timeout_ms` elapses.
    pub fn write_all<D: DelayNs>(
        &self,
        data: &[u8],
        delay: &mut D,
        timeout_ms: u32,
    ) -> Result<(), UartError> {
        if !self.is_initialized() {
            return Err(UartError::NotInitialized);
        }

        let mut remaining = data;
        let done = poll_until(delay, timeout_ms, || {
            let n = self.write(remaining);
            remaining = &remaining[n..];
            remaining.is_empty()
        });

        if done {
            Ok(())
        } else {
            Err(UartError::Timeout)
        }
    }

    /// Format `args` straight into the TX ring.
    ///
    /// Returns the number of bytes queued; output that does not fit is
    /// dropped from the end.
    ///
    /// ```ignore
    /// serial.print(format_args!("Chip ID: 0x{:08X}\n", chip_id));
    /// ```
    pub fn print(&self, args: fmt::Arguments<'_>) -> usize {
        let mut writer = TxWriter {
            uart: self,
            written: 0,
        };
        // TxWriter never fails; overflow shows up as a short count.
        let _ = fmt::write(&mut writer, args);
        writer.written
    }

    /// Wait until the TX ring is empty and the transmitter is idle.
    pub fn flush<D: DelayNs>(&self, delay: &mut D, timeout_ms: u32) -> Result<(), UartError> {
        if !self.is_initialized() {
            return Err(UartError::NotInitialized);
        }

        if !self.tx.is_empty() {
            self.port.pend();
        }
        if poll_until(delay, timeout_ms, || self.is_tx_idle()) {
            Ok(())
        } else {
            Err(UartError::Timeout)
        }
    }

    /// Whether all queued output has left the wire.
    pub fn is_tx_idle(&self) -> bool {
        self.tx.is_empty() && !self.port.tx_busy()
    }

    /// Bytes queued but not yet handed to the hardware FIFO.
    pub fn pending_output(&self) -> usize {
        self.tx.available()
    }

    // ── Interrupt side ─────────────────────────────────────────────────

    /// Service the UART interrupt. Call this from the vector.
    ///
    /// Drains the RX FIFO into the RX ring, then tops the TX FIFO up from
    /// the TX ring. TX is serviced on every call so a software
    /// [`pend()`](UartPort::pend) from `write` starts transmission.
    pub fn on_interrupt(&self) {
        let status = self.port.take_status();

        if status.intersects(InterruptMask::RX.union(InterruptMask::RX_TIMEOUT)) {
            self.service_rx();
        }
        self.service_tx();
    }

    fn service_rx(&self) {
        let mut chunk = [0u8; UART_FIFO_DEPTH];
        let mut dropped = 0u32;

        // Keep reading even when the ring is full: the FIFO must be emptied
        // to clear the interrupt.
        loop {
            let n = self.port.read_fifo(&mut chunk);
            if n == 0 {
                break;
            }
            let stored = self.rx.store_buffer(&chunk[..n]);
            dropped += (n - stored) as u32;
        }

        if dropped > 0 {
            let total = self.rx_dropped.load(Ordering::Relaxed).wrapping_add(dropped);
            self.rx_dropped.store(total, Ordering::Relaxed);
            warn!("uart: rx overflow, dropped {} bytes", dropped);
        }
    }

    fn service_tx(&self) {
        let mut chunk = [0u8; UART_FIFO_DEPTH];

        loop {
            let space = self.port.tx_fifo_space().min(chunk.len());
            if space == 0 {
                break;
            }
            match self.tx.read_buffer(&mut chunk[..space]) {
                Some(n) => self.port.write_fifo(&chunk[..n]),
                None => break,
            }
        }
    }
}

/// `core::fmt::Write` adapter that queues into the TX ring.
struct TxWriter<'a, P, const RX: usize, const TX: usize> {
    uart: &'a Uart<P, RX, TX>,
    written: usize,
}

impl<P: UartPort, const RX: usize, const TX: usize> fmt::Write for TxWriter<'_, P, RX, TX> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.written += self.uart.write(s.as_bytes());
        Ok(())
    }
}

/// Poll `done` every [`POLL_INTERVAL_US`] until it holds or `timeout_ms`
/// has elapsed. `done` is always evaluated at least once.
fn poll_until<D: DelayNs>(delay: &mut D, timeout_ms: u32, mut done: impl FnMut() -> bool) -> bool {
    let budget_us = timeout_ms.saturating_mul(1_000);
    let mut waited_us = 0u32;

    loop {
        if done() {
            return true;
        }
        if waited_us >= budget_us {
            return false;
        }
        delay.delay_us(POLL_INTERVAL_US);
        waited_us = waited_us.saturating_add(POLL_INTERVAL_US);
    }
}
