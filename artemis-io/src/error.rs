//! Driver error types.
//!
//! The ring buffer itself has no error type: overflow is a `false` or a
//! short count, underflow is `None`. Errors here come from the drivers
//! built on top of it.

use core::fmt;

/// An invalid UART or PDM configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate of zero.
    ZeroBaudRate,
    /// Baud rate above what the peripheral can generate.
    BaudRateTooHigh(u32),
    /// PCM sample rate of zero.
    ZeroSampleRate,
    /// PDM decimation rate outside `1..=63`.
    DecimationOutOfRange(u32),
    /// High-pass cutoff code outside `0..=15`.
    HighPassCutoffOutOfRange(u8),
    /// PDM gain that is not a 1.5 dB step in `-12.0..=40.5` dB.
    InvalidGain(i16),
    /// Recording window of zero samples.
    EmptyRecordingWindow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroBaudRate => f.write_str("baud rate must be non-zero"),
            ConfigError::BaudRateTooHigh(baud) => write!(f, "baud rate {baud} is too high"),
            ConfigError::ZeroSampleRate => f.write_str("sample rate must be non-zero"),
            ConfigError::DecimationOutOfRange(rate) => {
                write!(f, "decimation rate {rate} is outside 1..=63")
            }
            ConfigError::HighPassCutoffOutOfRange(code) => {
                write!(f, "high-pass cutoff code {code} is outside 0..=15")
            }
            ConfigError::InvalidGain(tenths) => {
                write!(f, "gain of {tenths} tenths of a dB is not a supported step")
            }
            ConfigError::EmptyRecordingWindow => f.write_str("recording window must be non-empty"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Returned by [`IsrSlot::register`](crate::isr::IsrSlot::register) when a
/// different instance already owns the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterError;

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("interrupt slot already registered")
    }
}

impl core::error::Error for RegisterError {}

/// UART driver errors.
#[cfg(feature = "uart")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// `begin()` has not been called (or `end()` has).
    NotInitialized,
    /// The deadline passed before the operation completed.
    Timeout,
    /// The interrupt slot belongs to another instance.
    AlreadyRegistered,
    /// The configuration was rejected.
    Config(ConfigError),
}

#[cfg(feature = "uart")]
impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UartError::NotInitialized => f.write_str("uart not initialized"),
            UartError::Timeout => f.write_str("uart operation timed out"),
            UartError::AlreadyRegistered => f.write_str("uart interrupt slot already registered"),
            UartError::Config(e) => write!(f, "invalid uart configuration: {e}"),
        }
    }
}

#[cfg(feature = "uart")]
impl core::error::Error for UartError {}

#[cfg(feature = "uart")]
impl From<ConfigError> for UartError {
    fn from(e: ConfigError) -> Self {
        UartError::Config(e)
    }
}

#[cfg(feature = "uart")]
impl From<RegisterError> for UartError {
    fn from(_: RegisterError) -> Self {
        UartError::AlreadyRegistered
    }
}

/// PDM driver errors.
#[cfg(feature = "pdm")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdmError {
    /// `begin()` has not been called (or `end()` has).
    NotInitialized,
    /// The interrupt slot belongs to another instance.
    AlreadyRegistered,
    /// The configuration was rejected.
    Config(ConfigError),
}

#[cfg(feature = "pdm")]
impl fmt::Display for PdmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdmError::NotInitialized => f.write_str("pdm not initialized"),
            PdmError::AlreadyRegistered => f.write_str("pdm interrupt slot already registered"),
            PdmError::Config(e) => write!(f, "invalid pdm configuration: {e}"),
        }
    }
}

#[cfg(feature = "pdm")]
impl core::error::Error for PdmError {}

#[cfg(feature = "pdm")]
impl From<ConfigError> for PdmError {
    fn from(e: ConfigError) -> Self {
        PdmError::Config(e)
    }
}

#[cfg(feature = "pdm")]
impl From<RegisterError> for PdmError {
    fn from(_: RegisterError) -> Self {
        PdmError::AlreadyRegistered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn config_error_messages() {
        assert_eq!(ConfigError::ZeroBaudRate.to_string(), "baud rate must be non-zero");
        assert_eq!(
            ConfigError::DecimationOutOfRange(64).to_string(),
            "decimation rate 64 is outside 1..=63"
        );
    }

    #[cfg(feature = "uart")]
    #[test]
    fn uart_error_wraps_config() {
        let e: UartError = ConfigError::ZeroBaudRate.into();
        assert_eq!(e, UartError::Config(ConfigError::ZeroBaudRate));
        assert_eq!(e.to_string(), "invalid uart configuration: baud rate must be non-zero");
        assert_eq!(UartError::from(RegisterError), UartError::AlreadyRegistered);
    }

    #[cfg(feature = "pdm")]
    #[test]
    fn pdm_error_wraps_register() {
        assert_eq!(PdmError::from(RegisterError), PdmError::AlreadyRegistered);
    }
}
