//! # artemis-io
//!
//! A `no_std`, zero-allocation serial and microphone I/O layer for
//! SparkFun Artemis (Ambiq Apollo3, Cortex-M4F) boards, built around a
//! lock-free single-producer single-consumer byte ring that is safe to
//! share between one interrupt handler and foreground code.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Buffer | [`ring`] | `RingBuffer<N>` and its `Producer`/`Consumer` halves |
//! | Dispatch | [`isr`] | `IsrSlot` hands a `'static` driver to its interrupt vector |
//! | Serial | [`uart`] | Interrupt-driven UART over two rings (feature-gated) |
//! | Capture | [`pdm`] | DMA-driven PDM microphone into a PCM ring (feature-gated) |
//! | Samples | [`pcm`] | Word unpacking, level metering, WAV headers (feature-gated) |
//!
//! Register access is left to the board: drivers are generic over the
//! [`uart::UartPort`] and [`pdm::PdmPort`] traits.
//!
//! ## Quick start
//!
//! ```
//! use artemis_io::ring::RingBuffer;
//!
//! static RX: RingBuffer<8> = RingBuffer::new();
//!
//! // Interrupt handler:
//! RX.store(b'y');
//!
//! // Main loop:
//! assert_eq!(RX.read(), Some(b'y'));
//! assert_eq!(RX.read(), None);
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `uart` | yes | UART driver (requires `embedded-hal` for delays) |
//! | `pdm` | yes | PDM capture driver and PCM helpers |
//! | `log` | no | Driver diagnostics through the `log` facade |
//! | `defmt` | no | Driver diagnostics and `defmt::Format` impls through `defmt` |
//!
//! ## Defaults
//!
//! - **UART rings:** 256 bytes each ([`constants::UART_BUFFER_SIZE`])
//! - **PDM block:** 4096 samples ([`constants::PDM_BLOCK_SAMPLES`])
//! - **PCM rate:** 16 kHz ([`constants::PCM_SAMPLE_RATE`])
//! - **Recording window:** 2 s, rounded to whole blocks ([`constants::RECORDING_SAMPLES`])

#![no_std]

#[cfg(test)]
extern crate std;

// Must come first so the macros are visible to every module below.
mod fmt;

pub mod constants;
pub mod error;
pub mod isr;
pub mod ring;

#[cfg(feature = "uart")]
pub mod uart;

#[cfg(feature = "pdm")]
pub mod pdm;

#[cfg(feature = "pdm")]
pub mod pcm;

#[cfg(test)]
mod mock;
