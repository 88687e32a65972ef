//! DMA-driven PDM microphone capture.
//!
//! [`Pdm`] sits between a board-supplied [`PdmPort`] and a PCM byte
//! [`RingBuffer`](crate::ring::RingBuffer). The PDM interrupt is the ring's
//! producer; foreground code reads samples out and ships them elsewhere,
//! typically over a [`Uart`](crate::uart::Uart).
//!
//! ## Data flow
//!
//! ```text
//!  mic ──► PDM FIFO ──DMA──► capture buffer ──on_interrupt()──► PCM ring ──read_samples()──► app
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! static MIC_SLOT: IsrSlot<Mic> = IsrSlot::new();
//! type Mic = Pdm<Pdm0, PCM_RING_SIZE>;
//!
//! // DMA target owned by the board; `Pdm0::start_dma` points the transfer here.
//! static mut DMA_BUF: [u32; PDM_BLOCK_SAMPLES / 2] = [0; PDM_BLOCK_SAMPLES / 2];
//!
//! mic.begin(&MIC_SLOT)?;
//! mic.start()?;
//!
//! #[interrupt]
//! fn PDM() {
//!     // SAFETY: the transfer into DMA_BUF has completed, and `on_interrupt`
//!     // copies the block out before it re-arms DMA.
//!     let block: &[u32] = unsafe { &*core::ptr::addr_of!(DMA_BUF) };
//!     MIC_SLOT.dispatch(|mic| mic.on_interrupt(block));
//! }
//!
//! // Main loop:
//! let mut block = [0i16; 256];
//! while let Some(n) = mic.read_samples(&mut block) {
//!     send(&block[..n]);
//! }
//! ```

mod capture;
mod config;
mod port;

pub use capture::Pdm;
pub use config::{Channels, ClockDivider, Gain, PdmClock, PdmConfig};
pub use port::{PdmInterrupts, PdmPort};
