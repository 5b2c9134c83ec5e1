//! Weighted k-means over quantized color candidates.
//!
//! Deterministic by construction: centroids start at the `k` heaviest
//! candidates, the loop runs a fixed number of iterations with no convergence
//! test, distance ties go to the lowest centroid index, and a centroid that
//! loses all its points stays where it was.

use super::quantize::PixelSample;

/// Iteration count used when nothing else is configured.
pub const DEFAULT_ITERATIONS: usize = 10;

/// A final cluster: centroid color and total weight of its points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster {
    pub rgb: [u16; 3],
    pub weight: u64,
}

/// Cluster `points` (heaviest first) into at most `k` groups, heaviest
/// first. With `k` or fewer points every point is its own cluster.
pub fn cluster(points: &[PixelSample], k: usize, iterations: usize) -> Vec<Cluster> {
    if k == 0 {
        return Vec::new();
    }
    if points.len() <= k {
        return points
            .iter()
            .map(|p| Cluster {
                rgb: p.rgb,
                weight: u64::from(p.weight),
            })
            .collect();
    }

    let mut centroids: Vec<[u16; 3]> = points[..k].iter().map(|p| p.rgb).collect();

    for _ in 0..iterations {
        let mut sums = vec![[0u64; 3]; k];
        let mut totals = vec![0u64; k];
        for point in points {
            let i = nearest(&centroids, point.rgb);
            let w = u64::from(point.weight);
            for (sum, channel) in sums[i].iter_mut().zip(point.rgb) {
                *sum += u64::from(channel) * w;
            }
            totals[i] += w;
        }
        for ((centroid, sum), total) in centroids.iter_mut().zip(&sums).zip(&totals) {
            if *total == 0 {
                continue;
            }
            *centroid = sum.map(|s| weighted_mean(s, *total));
        }
    }

    let mut clusters: Vec<Cluster> = centroids
        .iter()
        .map(|&rgb| Cluster { rgb, weight: 0 })
        .collect();
    for point in points {
        let i = nearest(&centroids, point.rgb);
        clusters[i].weight += u64::from(point.weight);
    }
    clusters.retain(|c| c.weight > 0);
    clusters.sort_by(|a, b| b.weight.cmp(&a.weight));
    clusters
}

/// Index of the closest centroid; the first one wins on equal distance.
fn nearest(centroids: &[[u16; 3]], rgb: [u16; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = u64::MAX;
    for (i, c) in centroids.iter().enumerate() {
        let dist = distance_sq(*c, rgb);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

fn distance_sq(a: [u16; 3], b: [u16; 3]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(&x, y)| u64::from(x.abs_diff(y)).pow(2))
        .sum()
}

/// `sum / total` rounded half up.
fn weighted_mean(sum: u64, total: u64) -> u16 {
    ((2 * sum + total) / (2 * total)) as u16
}
