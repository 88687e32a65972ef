use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::config::PdmConfig;
use super::port::{PdmInterrupts, PdmPort};
use crate::error::PdmError;
use crate::isr::IsrSlot;
use crate::pcm;
use crate::ring::RingBuffer;

/// Samples moved per staging pass in the interrupt and in `read_samples`.
const CHUNK_SAMPLES: usize = 64;

/// DMA-driven PDM capture into a PCM byte ring of `N` bytes.
///
/// The interrupt converts each completed DMA block to little-endian 16-bit
/// samples and stores them in the ring; foreground code reads samples back
/// out. Only whole samples are ever stored, so the ring always holds an
/// even number of bytes.
///
/// Capture runs for one recording window of
/// [`PdmConfig::recording_samples`]. DMA is re-armed after every block until
/// the window is full; [`reset()`](Self::reset) opens a new one.
pub struct Pdm<P, const N: usize> {
    port: P,
    config: PdmConfig,
    pcm: RingBuffer<N>,
    initialized: AtomicBool,
    // A DMA transfer is in flight. The interrupt clears it when the window
    // fills; `start()`, `reset()` and `end()` write it only with no transfer
    // running or the IRQ masked.
    dma_armed: AtomicBool,
    // Written by the interrupt only, except in `reset()` with the IRQ masked.
    samples_recorded: AtomicUsize,
    samples_dropped: AtomicUsize,
    blocks_completed: AtomicUsize,
    // Written by foreground only.
    blocks_seen: AtomicUsize,
}

impl<P: PdmPort, const N: usize> Pdm<P, N> {
    pub const fn new(port: P, config: PdmConfig) -> Self {
        Pdm {
            port,
            config,
            pcm: RingBuffer::new(),
            initialized: AtomicBool::new(false),
            dma_armed: AtomicBool::new(false),
            samples_recorded: AtomicUsize::new(0),
            samples_dropped: AtomicUsize::new(0),
            blocks_completed: AtomicUsize::new(0),
            blocks_seen: AtomicUsize::new(0),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Power and configure the PDM block, register in `slot`, unmask the
    /// IRQ and start the decimation clock. No data moves until
    /// [`start()`](Self::start).
    pub fn begin(&'static self, slot: &'static IsrSlot<Self>) -> Result<(), PdmError>
    where
        Self: Sync,
    {
        self.config.validate()?;
        slot.register(self)?;

        self.port.power(true);
        self.port.configure(&self.config);
        self.port.flush_fifo();
        self.port.enable_interrupts(PdmInterrupts::ALL);
        let _ = self.port.take_status();

        self.initialized.store(true, Ordering::Release);
        self.port.set_irq(true);
        self.port.enable(true);

        debug!(
            "pdm: started, {} Hz output, window of {} samples",
            self.config.output_rate_hz(),
            self.config.recording_samples
        );
        Ok(())
    }

    /// Stop the clock, mask and power down, and release the slot.
    pub fn end(&self, slot: &IsrSlot<Self>) -> Result<(), PdmError>
    where
        Self: Sync + 'static,
    {
        if !self.is_initialized() {
            return Err(PdmError::NotInitialized);
        }

        self.port.set_irq(false);
        self.port.stop_dma();
        self.dma_armed.store(false, Ordering::Relaxed);
        self.port.disable_interrupts(PdmInterrupts::ALL);
        let _ = self.port.take_status();
        self.port.enable(false);
        self.port.power(false);
        if !slot.unregister(self) {
            warn!("pdm: slot owned by another instance, left registered");
        }
        self.initialized.store(false, Ordering::Release);

        debug!("pdm: stopped");
        Ok(())
    }

    /// Arm the first DMA transfer of the current window.
    ///
    /// Returns `Ok(false)` without touching the hardware when the window is
    /// already full or a transfer is already in flight.
    pub fn start(&self) -> Result<bool, PdmError> {
        if !self.is_initialized() {
            return Err(PdmError::NotInitialized);
        }
        if !self.is_recording() || self.is_dma_armed() {
            return Ok(false);
        }
        // No transfer is running, so the interrupt cannot race this store.
        self.dma_armed.store(true, Ordering::Release);
        self.port.start_dma();
        Ok(true)
    }

    /// Whether a DMA transfer is in flight.
    pub fn is_dma_armed(&self) -> bool {
        self.dma_armed.load(Ordering::Acquire)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &PdmConfig {
        &self.config
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    // ── Foreground ─────────────────────────────────────────────────────

    /// Whole samples waiting to be read.
    pub fn samples_available(&self) -> usize {
        self.pcm.available() / 2
    }

    /// Copy buffered samples into `out`, oldest first.
    ///
    /// Returns `None` when no samples are buffered, otherwise the count
    /// copied (which may be less than `out.len()`).
    pub fn read_samples(&self, out: &mut [i16]) -> Option<usize> {
        if self.pcm.is_empty() {
            return None;
        }

        let mut bytes = [0u8; CHUNK_SAMPLES * 2];
        let mut total = 0;
        for chunk in out.chunks_mut(CHUNK_SAMPLES) {
            let want = chunk.len() * 2;
            let Some(n) = self.pcm.read_buffer(&mut bytes[..want]) else {
                break;
            };
            for (sample, le) in chunk.iter_mut().zip(bytes[..n].chunks_exact(2)) {
                *sample = i16::from_le_bytes([le[0], le[1]]);
            }
            total += n / 2;
            if n < want {
                break;
            }
        }
        Some(total)
    }

    /// Samples captured in the current window, including dropped ones.
    pub fn samples_recorded(&self) -> usize {
        self.samples_recorded.load(Ordering::Acquire)
    }

    /// Samples lost because the PCM ring was full.
    pub fn samples_dropped(&self) -> usize {
        self.samples_dropped.load(Ordering::Relaxed)
    }

    /// Whether a DMA block has completed since the last
    /// [`take_data_ready()`](Self::take_data_ready).
    pub fn data_ready(&self) -> bool {
        self.blocks_completed.load(Ordering::Acquire) != self.blocks_seen.load(Ordering::Relaxed)
    }

    /// Like [`data_ready()`](Self::data_ready), but acknowledges the blocks.
    pub fn take_data_ready(&self) -> bool {
        let completed = self.blocks_completed.load(Ordering::Acquire);
        let ready = completed != self.blocks_seen.load(Ordering::Relaxed);
        self.blocks_seen.store(completed, Ordering::Relaxed);
        ready
    }

    /// Whether the current window still has room.
    pub fn is_recording(&self) -> bool {
        self.is_initialized() && self.samples_recorded() < self.config.recording_samples
    }

    /// Discard buffered samples and open a new recording window.
    ///
    /// Masks the PDM IRQ, aborts any transfer in flight and discards its
    /// latched completion, then rewrites the interrupt-owned state. Call
    /// [`start()`](Self::start) afterwards to resume capture.
    pub fn reset(&self) {
        self.port.set_irq(false);

        self.port.stop_dma();
        self.dma_armed.store(false, Ordering::Relaxed);
        let _ = self.port.take_status();

        self.pcm.drain();
        self.samples_recorded.store(0, Ordering::Relaxed);
        self.samples_dropped.store(0, Ordering::Relaxed);
        self.blocks_seen
            .store(self.blocks_completed.load(Ordering::Relaxed), Ordering::Relaxed);

        if self.is_initialized() {
            self.port.set_irq(true);
        }
    }

    // ── Interrupt side ─────────────────────────────────────────────────

    /// Service the PDM interrupt. `dma` is the block the transfer just
    /// filled, as raw 32-bit FIFO words.
    pub fn on_interrupt(&self, dma: &[u32]) {
        let status = self.port.take_status();

        if status.contains(PdmInterrupts::DMA_ERROR) {
            error!("pdm: dma error");
        }
        if status.contains(PdmInterrupts::OVERFLOW) {
            warn!("pdm: fifo overflow");
        }
        if status.contains(PdmInterrupts::UNDERFLOW) {
            warn!("pdm: fifo underflow");
        }
        if !status.contains(PdmInterrupts::DMA_COMPLETE) {
            return;
        }
        if !self.is_dma_armed() {
            trace!("pdm: completion with no transfer armed, ignored");
            return;
        }

        self.capture(dma);
        let completed = self.blocks_completed.load(Ordering::Relaxed);
        self.blocks_completed
            .store(completed.wrapping_add(1), Ordering::Release);

        if self.is_recording() {
            self.port.start_dma();
        } else {
            self.dma_armed.store(false, Ordering::Release);
            debug!("pdm: window complete, {} samples", self.samples_recorded());
        }
    }

    fn capture(&self, dma: &[u32]) {
        let recorded = self.samples_recorded.load(Ordering::Relaxed);
        let mut remaining = self.config.recording_samples.saturating_sub(recorded);
        let words_per_chunk = if self.config.data_packing {
            CHUNK_SAMPLES / 2
        } else {
            CHUNK_SAMPLES
        };

        let mut samples = [0i16; CHUNK_SAMPLES];
        let mut bytes = [0u8; CHUNK_SAMPLES * 2];
        let mut captured = 0;
        let mut dropped = 0;

        for words in dma.chunks(words_per_chunk) {
            if remaining == 0 {
                break;
            }
            let n = pcm::unpack(words, self.config.data_packing, &mut samples).min(remaining);
            for (le, sample) in bytes.chunks_exact_mut(2).zip(&samples[..n]) {
                le.copy_from_slice(&sample.to_le_bytes());
            }

            // Whole samples only.
            let room = self.pcm.available_for_store() & !1;
            let stored = self.pcm.store_buffer(&bytes[..(n * 2).min(room)]);
            dropped += n - stored / 2;
            captured += n;
            remaining -= n;
        }

        self.samples_recorded
            .store(recorded + captured, Ordering::Release);
        if dropped > 0 {
            let total = self.samples_dropped.load(Ordering::Relaxed) + dropped;
            self.samples_dropped.store(total, Ordering::Relaxed);
            warn!("pdm: pcm ring full, dropped {} samples", dropped);
        }
    }
}
