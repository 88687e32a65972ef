use core::ops::BitOr;

use super::config::UartConfig;

/// A set of UART interrupt sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptMask(u32);

impl InterruptMask {
    pub const NONE: Self = InterruptMask(0);
    /// RX FIFO reached its threshold.
    pub const RX: Self = InterruptMask(1 << 0);
    /// RX FIFO holds data below threshold and the line went quiet.
    pub const RX_TIMEOUT: Self = InterruptMask(1 << 1);
    /// TX FIFO drained to its threshold.
    pub const TX: Self = InterruptMask(1 << 2);
    /// TX FIFO and shift register are empty.
    pub const TX_COMPLETE: Self = InterruptMask(1 << 3);
    /// Every source the driver services.
    pub const DRIVER: Self = InterruptMask(0b1111);

    pub const fn from_bits(bits: u32) -> Self {
        InterruptMask(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn union(self, other: Self) -> Self {
        InterruptMask(self.0 | other.0)
    }

    /// Whether every source in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether any source in `other` is set.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for InterruptMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Board-level access to one UART instance.
///
/// Every method takes `&self`: implementations wrap a memory-mapped register
/// block, which is shared between the interrupt handler and foreground code
/// the same way the ring buffers are. The driver calls each method from a
/// fixed context:
///
/// | Method | Context |
/// |--------|---------|
/// | `configure`, `power`, `enable_interrupts`, `disable_interrupts`, `set_irq` | foreground, IRQ masked or not yet enabled |
/// | `take_status`, `read_fifo`, `write_fifo`, `tx_fifo_space` | interrupt |
/// | `tx_busy`, `pend` | either |
pub trait UartPort {
    /// Apply line settings and FIFO thresholds.
    fn configure(&self, config: &UartConfig);

    /// Power the peripheral up or down.
    fn power(&self, on: bool);

    /// Unmask the given sources in the peripheral.
    fn enable_interrupts(&self, mask: InterruptMask);

    /// Mask the given sources in the peripheral.
    fn disable_interrupts(&self, mask: InterruptMask);

    /// Read and clear the pending interrupt status.
    fn take_status(&self) -> InterruptMask;

    /// Move bytes out of the RX FIFO. Returns the count; 0 means the FIFO is
    /// empty.
    fn read_fifo(&self, buf: &mut [u8]) -> usize;

    /// Free space in the TX FIFO, in bytes.
    fn tx_fifo_space(&self) -> usize;

    /// Push bytes into the TX FIFO. The driver never offers more than
    /// [`tx_fifo_space()`](Self::tx_fifo_space) reported, so implementations
    /// accept all of `data`.
    fn write_fifo(&self, data: &[u8]);

    /// Whether the transmitter is still shifting bytes out.
    fn tx_busy(&self) -> bool;

    /// Enable or disable the UART interrupt line in the NVIC.
    fn set_irq(&self, enabled: bool);

    /// Software-trigger the UART interrupt.
    fn pend(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_operations() {
        let m = InterruptMask::RX | InterruptMask::TX;
        assert!(m.contains(InterruptMask::RX));
        assert!(!m.contains(InterruptMask::RX | InterruptMask::RX_TIMEOUT));
        assert!(m.intersects(InterruptMask::RX | InterruptMask::RX_TIMEOUT));
        assert!(!m.intersects(InterruptMask::TX_COMPLETE));
        assert_eq!(m.bits(), 0b0101);
        assert!(InterruptMask::NONE.is_empty());
        assert!(InterruptMask::DRIVER.contains(
            InterruptMask::RX | InterruptMask::RX_TIMEOUT | InterruptMask::TX | InterruptMask::TX_COMPLETE
        ));
        assert_eq!(InterruptMask::from_bits(0b1000), InterruptMask::TX_COMPLETE);
    }
}
