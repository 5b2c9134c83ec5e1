//! Pixel bucketing and candidate selection.
//!
//! Every opaque pixel is rounded per channel to the nearest multiple of the
//! quantization step and counted. Buckets keep the order in which their color
//! was first seen, so sorting by count is deterministic.

use std::collections::HashMap;

/// One quantized color and how many pixels fell into it.
///
/// Channels are `u16` because rounding can overshoot 255 (`round(255/8)*8`
/// is 256). They are clamped only when a palette entry is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSample {
    pub rgb: [u16; 3],
    pub weight: u32,
}

/// Round a channel to the nearest multiple of `step`, ties upward.
pub fn quantize_channel(value: u8, step: u16) -> u16 {
    let step = step.max(1);
    (u16::from(value) + step / 2) / step * step
}

/// Count quantized colors of all pixels with alpha at or above
/// `alpha_threshold`, in first-seen order.
pub fn bucket_pixels(rgba: &[u8], alpha_threshold: u8, step: u16) -> Vec<PixelSample> {
    let mut index: HashMap<[u16; 3], usize> = HashMap::new();
    let mut buckets: Vec<PixelSample> = Vec::new();

    for px in rgba.chunks_exact(4) {
        if px[3] < alpha_threshold {
            continue;
        }
        let key = [
            quantize_channel(px[0], step),
            quantize_channel(px[1], step),
            quantize_channel(px[2], step),
        ];
        match index.get(&key) {
            Some(&i) => buckets[i].weight += 1,
            None => {
                index.insert(key, buckets.len());
                buckets.push(PixelSample { rgb: key, weight: 1 });
            }
        }
    }
    buckets
}

/// The `limit` heaviest buckets, heaviest first. Equal counts keep their
/// first-seen order.
pub fn top_candidates(mut buckets: Vec<PixelSample>, limit: usize) -> Vec<PixelSample> {
    buckets.sort_by(|a, b| b.weight.cmp(&a.weight));
    buckets.truncate(limit);
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_rounding() {
        assert_eq!(quantize_channel(0, 8), 0);
        assert_eq!(quantize_channel(3, 8), 0);
        assert_eq!(quantize_channel(4, 8), 8);
        assert_eq!(quantize_channel(0x33, 8), 48);
        assert_eq!(quantize_channel(0x66, 8), 104);
        assert_eq!(quantize_channel(252, 8), 256);
        assert_eq!(quantize_channel(255, 8), 256);
        assert_eq!(quantize_channel(17, 0), 17);
    }

    #[test]
    fn transparent_pixels_are_skipped() {
        let rgba = [
            10, 10, 10, 255, //
            10, 10, 10, 127, //
            10, 10, 10, 128, //
        ];
        let buckets = bucket_pixels(&rgba, 128, 8);
        assert_eq!(buckets, vec![PixelSample { rgb: [8, 8, 8], weight: 2 }]);
    }

    #[test]
    fn buckets_keep_first_seen_order() {
        let rgba = [
            200, 0, 0, 255, //
            0, 200, 0, 255, //
            1, 201, 2, 255, //
            0, 0, 200, 255, //
        ];
        let buckets = bucket_pixels(&rgba, 128, 8);
        let colors: Vec<[u16; 3]> = buckets.iter().map(|b| b.rgb).collect();
        assert_eq!(colors, vec![[200, 0, 0], [0, 200, 0], [0, 0, 200]]);
        assert_eq!(buckets[1].weight, 2);
    }

    #[test]
    fn candidates_sorted_stably_and_truncated() {
        let s = |r: u16, weight: u32| PixelSample { rgb: [r, 0, 0], weight };
        let picked = top_candidates(vec![s(1, 2), s(2, 5), s(3, 2), s(4, 7), s(5, 1)], 4);
        let order: Vec<u16> = picked.iter().map(|p| p.rgb[0]).collect();
        assert_eq!(order, vec![4, 2, 1, 3]);
    }

    #[test]
    fn trailing_partial_pixel_is_ignored() {
        let buckets = bucket_pixels(&[255, 255, 255, 255, 9, 9], 128, 8);
        assert_eq!(buckets.len(), 1);
    }
}
