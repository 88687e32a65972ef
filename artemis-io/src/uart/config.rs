use crate::error::ConfigError;

/// Highest baud rate the Apollo3 UART clock tree can generate.
pub const MAX_BAUD_RATE: u32 = 1_500_000;

/// Number of data bits per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One = 1,
    Two = 2,
}

/// Hardware flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    None,
    RtsCts,
}

/// FIFO fill level at which the TX/RX interrupt fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoLevel {
    OneEighth,
    OneQuarter,
    OneHalf,
    ThreeQuarters,
    SevenEighths,
}

impl FifoLevel {
    /// Threshold in bytes for a FIFO of `depth` bytes.
    pub const fn bytes(self, depth: usize) -> usize {
        match self {
            FifoLevel::OneEighth => depth / 8,
            FifoLevel::OneQuarter => depth / 4,
            FifoLevel::OneHalf => depth / 2,
            FifoLevel::ThreeQuarters => depth * 3 / 4,
            FifoLevel::SevenEighths => depth * 7 / 8,
        }
    }
}

/// UART line and FIFO configuration.
///
/// ```
/// use artemis_io::uart::{Parity, UartConfig};
///
/// let config = UartConfig::new(9_600).with_parity(Parity::Even);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.frame_bits(), 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    pub tx_fifo_level: FifoLevel,
    pub rx_fifo_level: FifoLevel,
}

impl UartConfig {
    /// 8-N-1 at `baud_rate`, no flow control, both FIFO thresholds at 1/2.
    pub const fn new(baud_rate: u32) -> Self {
        UartConfig {
            baud_rate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            tx_fifo_level: FifoLevel::OneHalf,
            rx_fifo_level: FifoLevel::OneHalf,
        }
    }

    pub const fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub const fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub const fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub const fn with_flow_control(mut self, flow_control: FlowControl) -> Self {
        self.flow_control = flow_control;
        self
    }

    pub const fn with_fifo_levels(mut self, tx: FifoLevel, rx: FifoLevel) -> Self {
        self.tx_fifo_level = tx;
        self.rx_fifo_level = rx;
        self
    }

    /// Check the configuration before it reaches the hardware.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if self.baud_rate > MAX_BAUD_RATE {
            return Err(ConfigError::BaudRateTooHigh(self.baud_rate));
        }
        Ok(())
    }

    /// Bits on the wire per character: start + data + parity + stop.
    pub const fn frame_bits(&self) -> u32 {
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Odd | Parity::Even => 1,
        };
        1 + self.data_bits as u32 + parity + self.stop_bits as u32
    }

    /// Line throughput in characters per second.
    pub const fn bytes_per_second(&self) -> u32 {
        self.baud_rate / self.frame_bits()
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        UartConfig::new(115_200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_115200_8n1() {
        let c = UartConfig::default();
        assert_eq!(c.baud_rate, 115_200);
        assert_eq!(c.data_bits, DataBits::Eight);
        assert_eq!(c.parity, Parity::None);
        assert_eq!(c.stop_bits, StopBits::One);
        assert_eq!(c.flow_control, FlowControl::None);
        assert_eq!(c.tx_fifo_level, FifoLevel::OneHalf);
        assert_eq!(c.rx_fifo_level, FifoLevel::OneHalf);
        assert_eq!(c.frame_bits(), 10);
        assert_eq!(c.bytes_per_second(), 11_520);
    }

    #[test]
    fn builder_chain() {
        let c = UartConfig::new(57_600)
            .with_data_bits(DataBits::Seven)
            .with_parity(Parity::Odd)
            .with_stop_bits(StopBits::Two)
            .with_flow_control(FlowControl::RtsCts)
            .with_fifo_levels(FifoLevel::OneQuarter, FifoLevel::SevenEighths);
        assert_eq!(c.frame_bits(), 11);
        assert_eq!(c.flow_control, FlowControl::RtsCts);
        assert_eq!(c.tx_fifo_level.bytes(32), 8);
        assert_eq!(c.rx_fifo_level.bytes(32), 28);
    }

    #[test]
    fn validate_rejects_bad_baud() {
        assert_eq!(UartConfig::new(0).validate(), Err(ConfigError::ZeroBaudRate));
        assert_eq!(
            UartConfig::new(3_000_000).validate(),
            Err(ConfigError::BaudRateTooHigh(3_000_000))
        );
        assert!(UartConfig::new(MAX_BAUD_RATE).validate().is_ok());
    }
}
