//! PCM sample helpers for the PDM capture path.
//!
//! ## DMA word format
//!
//! With data packing enabled each `u32` read from the PDM FIFO carries two
//! consecutive samples:
//! - Lower 16 bits (bits 0–15): earlier sample (`i16`)
//! - Upper 16 bits (bits 16–31): later sample (`i16`)
//!
//! Without packing only the lower 16 bits are meaningful. In stereo mode
//! consecutive samples alternate left, right.

mod level;
mod wav;

pub use level::Level;
pub use wav::{wav_header, WAV_HEADER_LEN};

/// Unpack raw PDM FIFO words into 16-bit samples.
///
/// Converts as many whole words as fit in `out` and returns the number of
/// samples written.
pub fn unpack(words: &[u32], packed: bool, out: &mut [i16]) -> usize {
    if packed {
        let n = words.len().min(out.len() / 2);
        for (pair, &word) in out.chunks_exact_mut(2).zip(&words[..n]) {
            pair[0] = word as i16;
            pair[1] = (word >> 16) as i16;
        }
        n * 2
    } else {
        let n = words.len().min(out.len());
        for (sample, &word) in out.iter_mut().zip(&words[..n]) {
            *sample = word as i16;
        }
        n
    }
}

/// Split interleaved stereo samples into separate left and right channels.
///
/// Writes `min(src.len() / 2, left.len(), right.len())` frames and returns
/// that count. A trailing unpaired sample in `src` is ignored.
pub fn split_stereo(src: &[i16], left: &mut [i16], right: &mut [i16]) -> usize {
    let mut frames = 0;
    for ((frame, l), r) in src.chunks_exact(2).zip(left.iter_mut()).zip(right.iter_mut()) {
        *l = frame[0];
        *r = frame[1];
        frames += 1;
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_packed_low_half_first() {
        let words = [0xFFFF_0001, 0x8000_7FFF];
        let mut out = [0i16; 4];
        assert_eq!(unpack(&words, true, &mut out), 4);
        assert_eq!(out, [1, -1, 32767, -32768]);
    }

    #[test]
    fn unpack_unpacked_ignores_upper_half() {
        let words = [0xABCD_0010, 0x0000_FFF0];
        let mut out = [0i16; 2];
        assert_eq!(unpack(&words, false, &mut out), 2);
        assert_eq!(out, [16, -16]);
    }

    #[test]
    fn unpack_stops_at_whole_words() {
        let words = [0x0002_0001, 0x0004_0003];
        let mut out = [0i16; 3];
        // Only one packed word fits.
        assert_eq!(unpack(&words, true, &mut out), 2);
        assert_eq!(out[..2], [1, 2]);

        let mut out = [0i16; 1];
        assert_eq!(unpack(&words, false, &mut out), 1);
        assert_eq!(unpack(&[], false, &mut out), 0);
    }

    #[test]
    fn split_stereo_frames() {
        let src = [1i16, -1, 2, -2, 3, -3];
        let mut left = [0i16; 3];
        let mut right = [0i16; 3];
        assert_eq!(split_stereo(&src, &mut left, &mut right), 3);
        assert_eq!(left, [1, 2, 3]);
        assert_eq!(right, [-1, -2, -3]);
    }

    #[test]
    fn split_stereo_short_outputs_truncate() {
        let src = [1i16, -1, 2, -2, 3, -3, 4];
        let mut left = [0i16; 2];
        let mut right = [0i16; 1];
        assert_eq!(split_stereo(&src, &mut left, &mut right), 1);
        assert_eq!(left, [1, 0]);
        assert_eq!(right, [-1]);

        let mut left = [0i16; 4];
        let mut right = [0i16; 4];
        assert_eq!(split_stereo(&src, &mut left, &mut right), 3);
        assert_eq!(left, [1, 2, 3, 0]);
    }
}
