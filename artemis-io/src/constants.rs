/// Default RX/TX ring size for the UART driver (255 usable bytes).
pub const UART_BUFFER_SIZE: usize = 256;

/// Depth of the Apollo3 UART hardware FIFOs, in bytes.
pub const UART_FIFO_DEPTH: usize = 32;

/// Samples delivered by one PDM DMA transfer.
pub const PDM_BLOCK_SAMPLES: usize = 4096;

/// Bytes moved by one PDM DMA transfer (16-bit samples).
pub const PDM_BLOCK_BYTES: usize = PDM_BLOCK_SAMPLES * 2;

/// Default PCM ring size: exactly one DMA block of usable space.
pub const PCM_RING_SIZE: usize = PDM_BLOCK_BYTES + 1;

/// PCM output sample rate in Hz.
pub const PCM_SAMPLE_RATE: u32 = 16_000;

/// Length of one recording window.
pub const RECORDING_DURATION_SECONDS: u32 = 2;

/// Samples in one recording window, rounded down to whole DMA blocks so a
/// transfer never straddles the end of the window.
pub const RECORDING_SAMPLES: usize =
    (PCM_SAMPLE_RATE as usize * RECORDING_DURATION_SECONDS as usize / PDM_BLOCK_SAMPLES)
        * PDM_BLOCK_SAMPLES;
