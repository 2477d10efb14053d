//! Biased tier sampling
//!
//! Draws a tier from a two-sided normal distribution centered on the level's
//! tier. The left and right halves get their own spread so that boundary
//! tiers don't pile up on the clamped edge.

use rand::Rng;

/// Standard normal value (mean 0, unit variance), polar method
pub fn gauss_random<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u = 2.0 * rng.random::<f64>() - 1.0;
        let v = 2.0 * rng.random::<f64>() - 1.0;
        let r = u * u + v * v;
        if r == 0.0 || r >= 1.0 {
            continue;
        }
        return u * (-2.0 * r.ln() / r).sqrt();
    }
}

/// Normal draw around `mean` using `left` deviation below it and `right` above
pub fn skewed_normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, left: f64, right: f64) -> f64 {
    let raw = gauss_random(rng);
    let deviation = if raw < 0.0 { left } else { right };
    mean + raw * deviation
}

/// Sample a tier in `0..tier_count`, biased toward `center`.
///
/// The spread on each side is the distance to the boundary, capped by
/// `max_spread`; the deviation used is two thirds of that spread.
pub fn sample_tier<R: Rng + ?Sized>(
    rng: &mut R,
    tier_count: usize,
    center: usize,
    max_spread: Option<usize>,
) -> usize {
    if tier_count == 0 {
        return 0;
    }
    let last = tier_count - 1;
    let center = center.min(last);
    let left = max_spread.map_or(center, |spread| center.min(spread));
    let right = max_spread.map_or(last - center, |spread| (last - center).min(spread));

    let sample = skewed_normal(
        rng,
        center as f64,
        left as f64 * 2.0 / 3.0,
        right as f64 * 2.0 / 3.0,
    );
    sample.round().clamp(0.0, last as f64) as usize
}
