//! Software stand-ins for the board layer, used by unit and integration
//! tests.

use std::boxed::Box;
#[cfg(feature = "uart")]
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::vec::Vec;

#[cfg(feature = "uart")]
use embedded_hal::delay::DelayNs;

#[cfg(feature = "pdm")]
use crate::pdm::{PdmConfig, PdmInterrupts, PdmPort};
#[cfg(feature = "uart")]
use crate::constants::UART_FIFO_DEPTH;
#[cfg(feature = "uart")]
use crate::uart::{InterruptMask, UartConfig, UartPort};

/// Give a test value the `'static` lifetime drivers need for `begin()`.
pub fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

// ── Delay ──────────────────────────────────────────────────────────────

#[cfg(feature = "uart")]
/// `DelayNs` that advances a virtual clock and runs a hook on every tick,
/// standing in for the interrupts that would fire while foreground waits.
pub struct MockDelay<F: FnMut()> {
    pub elapsed_ns: u64,
    on_tick: F,
}

#[cfg(feature = "uart")]
impl<F: FnMut()> MockDelay<F> {
    pub fn new(on_tick: F) -> Self {
        MockDelay {
            elapsed_ns: 0,
            on_tick,
        }
    }
}

#[cfg(feature = "uart")]
impl<F: FnMut()> DelayNs for MockDelay<F> {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += ns as u64;
        (self.on_tick)();
    }
}

// ── UART ───────────────────────────────────────────────────────────────

#[cfg(feature = "uart")]
#[derive(Default)]
pub struct UartState {
    pub config: Option<UartConfig>,
    pub powered: bool,
    pub enabled: InterruptMask,
    pub status: InterruptMask,
    pub irq_enabled: bool,
    pub pend_count: usize,
    pub rx_fifo: VecDeque<u8>,
    pub tx_fifo: VecDeque<u8>,
    /// Everything that has left the TX FIFO.
    pub wire: Vec<u8>,
}

/// A UART whose FIFOs are queues and whose wire is a `Vec`.
#[cfg(feature = "uart")]
pub struct MockUartPort {
    state: Mutex<UartState>,
}

#[cfg(feature = "uart")]
impl MockUartPort {
    pub fn new() -> Self {
        MockUartPort {
            state: Mutex::new(UartState::default()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, UartState> {
        self.state.lock().unwrap()
    }

    /// Bytes arrive on the RX pin and cross the FIFO threshold.
    pub fn receive(&self, bytes: &[u8]) {
        self.receive_with_status(bytes, InterruptMask::RX);
    }

    pub fn receive_with_status(&self, bytes: &[u8], status: InterruptMask) {
        let mut state = self.state();
        state.rx_fifo.extend(bytes.iter().copied());
        state.status = state.status | status;
    }

    /// Shift the whole TX FIFO onto the wire. Returns the byte count.
    pub fn transmit(&self) -> usize {
        let mut state = self.state();
        let n = state.tx_fifo.len();
        while let Some(b) = state.tx_fifo.pop_front() {
            state.wire.push(b);
        }
        if n > 0 {
            state.status = state.status | InterruptMask::TX | InterruptMask::TX_COMPLETE;
        }
        n
    }

    pub fn wire(&self) -> Vec<u8> {
        self.state().wire.clone()
    }
}

#[cfg(feature = "uart")]
impl UartPort for MockUartPort {
    fn configure(&self, config: &UartConfig) {
        self.state().config = Some(*config);
    }

    fn power(&self, on: bool) {
        self.state().powered = on;
    }

    fn enable_interrupts(&self, mask: InterruptMask) {
        let mut state = self.state();
        state.enabled = state.enabled | mask;
    }

    fn disable_interrupts(&self, mask: InterruptMask) {
        let mut state = self.state();
        state.enabled = InterruptMask::from_bits(state.enabled.bits() & !mask.bits());
    }

    fn take_status(&self) -> InterruptMask {
        core::mem::take(&mut self.state().status)
    }

    fn read_fifo(&self, buf: &mut [u8]) -> usize {
        let mut state = self.state();
        let mut n = 0;
        while n < buf.len() {
            match state.rx_fifo.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    fn tx_fifo_space(&self) -> usize {
        UART_FIFO_DEPTH - self.state().tx_fifo.len()
    }

    fn write_fifo(&self, data: &[u8]) {
        let mut state = self.state();
        assert!(state.tx_fifo.len() + data.len() <= UART_FIFO_DEPTH, "tx fifo overrun");
        state.tx_fifo.extend(data.iter().copied());
    }

    fn tx_busy(&self) -> bool {
        !self.state().tx_fifo.is_empty()
    }

    fn set_irq(&self, enabled: bool) {
        self.state().irq_enabled = enabled;
    }

    fn pend(&self) {
        self.state().pend_count += 1;
    }
}

// ── PDM ────────────────────────────────────────────────────────────────

#[cfg(feature = "pdm")]
#[derive(Default)]
pub struct PdmState {
    pub config: Option<PdmConfig>,
    pub powered: bool,
    pub enabled: bool,
    pub interrupts: PdmInterrupts,
    pub status: PdmInterrupts,
    pub irq_enabled: bool,
    pub fifo_flushes: usize,
    pub dma_starts: usize,
    pub dma_stops: usize,
    /// IRQ enable/disable transitions, oldest first.
    pub irq_log: Vec<bool>,
}

#[cfg(feature = "pdm")]
pub struct MockPdmPort {
    state: Mutex<PdmState>,
}

#[cfg(feature = "pdm")]
impl MockPdmPort {
    pub fn new() -> Self {
        MockPdmPort {
            state: Mutex::new(PdmState::default()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, PdmState> {
        self.state.lock().unwrap()
    }

    /// Latch interrupt status as the hardware would.
    pub fn raise(&self, status: PdmInterrupts) {
        let mut state = self.state();
        state.status = state.status | status;
    }
}

#[cfg(feature = "pdm")]
impl PdmPort for MockPdmPort {
    fn configure(&self, config: &PdmConfig) {
        self.state().config = Some(*config);
    }

    fn power(&self, on: bool) {
        self.state().powered = on;
    }

    fn enable(&self, on: bool) {
        self.state().enabled = on;
    }

    fn enable_interrupts(&self, mask: PdmInterrupts) {
        let mut state = self.state();
        state.interrupts = state.interrupts | mask;
    }

    fn disable_interrupts(&self, mask: PdmInterrupts) {
        let mut state = self.state();
        state.interrupts = PdmInterrupts::from_bits(state.interrupts.bits() & !mask.bits());
    }

    fn take_status(&self) -> PdmInterrupts {
        core::mem::take(&mut self.state().status)
    }

    fn flush_fifo(&self) {
        self.state().fifo_flushes += 1;
    }

    fn start_dma(&self) {
        self.state().dma_starts += 1;
    }

    fn stop_dma(&self) {
        self.state().dma_stops += 1;
    }

    fn set_irq(&self, enabled: bool) {
        let mut state = self.state();
        state.irq_enabled = enabled;
        state.irq_log.push(enabled);
    }
}
