//! Uniform draws used by the scatter planner.
//!
//! Every helper consumes a fixed number of values from the generator regardless of
//! its arguments, so a seeded stream stays aligned even when a range collapses to a
//! single value.
use rand::Rng;

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Uniform float between `a` and `b`, both ends included.
///
/// The bounds may be given in either order; the result always lies between them.
/// Interpolating from both ends keeps the draw finite when `b - a` overflows.
pub fn uniform_closed<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let u = rand01(rng);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (lo * (1.0 - u) + hi * u).clamp(lo, hi)
}

/// Uniform float in `[lo, hi)`. Requires `lo < hi`.
pub fn uniform_half_open<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    debug_assert!(lo < hi, "half-open range must not be empty");
    let u = rand01(rng);
    (lo * (1.0 - u) + hi * u).clamp(lo, hi.next_down())
}

/// Unbiased uniform integer in `[lo, hi]` (widening multiply with rejection).
pub fn uniform_u32_inclusive<R: Rng + ?Sized>(rng: &mut R, lo: u32, hi: u32) -> u32 {
    debug_assert!(lo <= hi, "integer range must be ordered");
    let span = hi - lo;
    if span == u32::MAX {
        return rng.next_u32();
    }

    let range = span + 1;
    // Low words below this threshold map to over-represented outputs.
    let threshold = range.wrapping_neg() % range;
    loop {
        let wide = u64::from(rng.next_u32()) * u64::from(range);
        if (wide as u32) >= threshold {
            return lo + (wide >> 32) as u32;
        }
    }
}
