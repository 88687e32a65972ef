/// Peak and RMS level of a block of samples, both normalized to 0.0–1.0.
///
/// # Example
/// ```
/// use artemis_io::pcm::Level;
///
/// let level = Level::measure(&[16384, -16384, 16384, -16384]);
/// assert!((level.rms - 0.5).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub peak: f32,
    pub rms: f32,
}

impl Level {
    pub const SILENT: Level = Level { peak: 0.0, rms: 0.0 };

    pub fn measure(samples: &[i16]) -> Self {
        if samples.is_empty() {
            return Level::SILENT;
        }

        let mut peak = 0u32;
        let mut sum = 0u64;
        for &s in samples {
            let s = s as i32;
            peak = peak.max(s.unsigned_abs());
            sum += (s * s) as u64;
        }

        let mean_sq = sum as f64 / samples.len() as f64;
        let rms = libm::sqrt(mean_sq) / 32767.0;
        Level {
            // -32768 normalizes slightly above 1.0.
            peak: (peak as f32 / 32767.0).min(1.0),
            rms: (rms as f32).min(1.0),
        }
    }

    /// RMS level in dBFS; negative infinity for silence.
    pub fn rms_dbfs(&self) -> f32 {
        if self.rms <= 0.0 {
            return f32::NEG_INFINITY;
        }
        20.0 * libm::log10f(self.rms)
    }
}
