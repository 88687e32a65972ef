/// Size of the canonical RIFF/WAVE header.
pub const WAV_HEADER_LEN: usize = 44;

/// Header for a mono 16-bit PCM WAV stream of `num_samples` samples.
///
/// Send it ahead of the little-endian sample bytes to make a capture
/// directly playable on the host.
pub fn wav_header(num_samples: u32, sample_rate: u32) -> [u8; WAV_HEADER_LEN] {
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;
    const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;

    let data_len = num_samples.saturating_mul(BLOCK_ALIGN as u32);
    let byte_rate = sample_rate.saturating_mul(BLOCK_ALIGN as u32);

    let mut h = [0u8; WAV_HEADER_LEN];
    h[0..4].copy_from_slice(b"RIFF");
    h[4..8].copy_from_slice(&data_len.saturating_add(36).to_le_bytes());
    h[8..12].copy_from_slice(b"WAVE");
    h[12..16].copy_from_slice(b"fmt ");
    h[16..20].copy_from_slice(&16u32.to_le_bytes());
    // PCM
    h[20..22].copy_from_slice(&1u16.to_le_bytes());
    h[22..24].copy_from_slice(&CHANNELS.to_le_bytes());
    h[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    h[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    h[32..34].copy_from_slice(&BLOCK_ALIGN.to_le_bytes());
    h[34..36].copy_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    h[36..40].copy_from_slice(b"data");
    h[40..44].copy_from_slice(&data_len.to_le_bytes());
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(h: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([h[at], h[at + 1], h[at + 2], h[at + 3]])
    }

    fn u16_at(h: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([h[at], h[at + 1]])
    }

    #[test]
    fn mono_16k_layout() {
        let h = wav_header(32_000, 16_000);
        assert_eq!(&h[0..4], b"RIFF");
        assert_eq!(u32_at(&h, 4), 36 + 64_000);
        assert_eq!(&h[8..16], b"WAVEfmt ");
        assert_eq!(u32_at(&h, 16), 16);
        assert_eq!(u16_at(&h, 20), 1);
        assert_eq!(u16_at(&h, 22), 1);
        assert_eq!(u32_at(&h, 24), 16_000);
        assert_eq!(u32_at(&h, 28), 32_000);
        assert_eq!(u16_at(&h, 32), 2);
        assert_eq!(u16_at(&h, 34), 16);
        assert_eq!(&h[36..40], b"data");
        assert_eq!(u32_at(&h, 40), 64_000);
    }

    #[test]
    fn oversized_fields_saturate() {
        let h = wav_header(u32::MAX, 3_000_000_000);
        assert_eq!(u32_at(&h, 24), 3_000_000_000);
        assert_eq!(u32_at(&h, 28), u32::MAX);
        assert_eq!(u32_at(&h, 4), u32::MAX);
        assert_eq!(u32_at(&h, 40), u32::MAX);
    }

    #[test]
    fn empty_stream() {
        let h = wav_header(0, 8_000);
        assert_eq!(u32_at(&h, 4), 36);
        assert_eq!(u32_at(&h, 40), 0);
    }
}
