use core::ops::BitOr;

use super::config::PdmConfig;

/// A set of PDM interrupt sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdmInterrupts(u32);

impl PdmInterrupts {
    pub const NONE: Self = PdmInterrupts(0);
    pub const DMA_ERROR: Self = PdmInterrupts(1 << 0);
    /// The DMA transfer filled the capture buffer.
    pub const DMA_COMPLETE: Self = PdmInterrupts(1 << 1);
    pub const UNDERFLOW: Self = PdmInterrupts(1 << 2);
    pub const OVERFLOW: Self = PdmInterrupts(1 << 3);
    pub const ALL: Self = PdmInterrupts(0b1111);

    pub const fn from_bits(bits: u32) -> Self {
        PdmInterrupts(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for PdmInterrupts {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        PdmInterrupts(self.0 | rhs.0)
    }
}

/// Board-level access to the PDM block and its DMA channel.
///
/// The port owns the DMA target buffer; the driver only sees it as the
/// `&[u32]` handed to [`Pdm::on_interrupt`](super::Pdm::on_interrupt).
pub trait PdmPort {
    fn configure(&self, config: &PdmConfig);

    fn power(&self, on: bool);

    /// Start or stop the decimation filter clock.
    fn enable(&self, on: bool);

    fn enable_interrupts(&self, mask: PdmInterrupts);

    fn disable_interrupts(&self, mask: PdmInterrupts);

    /// Read and clear the pending interrupt status.
    fn take_status(&self) -> PdmInterrupts;

    /// Discard anything left in the PDM FIFO.
    fn flush_fifo(&self);

    /// Arm one DMA transfer into the port's capture buffer.
    fn start_dma(&self);

    /// Abort any transfer in flight. A no-op when none is armed.
    fn stop_dma(&self);

    /// Enable or disable the PDM interrupt line in the NVIC.
    fn set_irq(&self, enabled: bool);
}
