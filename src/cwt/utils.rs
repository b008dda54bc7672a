//! Utility functions for CWT
//!
//! FFT sizing, fallible buffer allocation, normalization and dB conversion.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use super::error::{CwtError, Result};

/// Compute next power of 2 (FFT length for a signal of `n` samples)
pub fn next_fast_len(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Allocate a zero-filled complex buffer, reporting allocation failure
/// instead of aborting.
pub fn try_zeroed(len: usize, what: &str) -> Result<Vec<Complex64>> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|e| {
        CwtError::ResourceExhausted(format!("{} of {} complex samples: {}", what, len, e))
    })?;
    buffer.resize(len, Complex64::new(0.0, 0.0));
    Ok(buffer)
}

/// Largest finite-or-infinite magnitude in the buffer; NaN entries are ignored.
pub fn max_magnitude(values: &[Complex64]) -> f64 {
    values.iter().map(|c| c.norm()).fold(0.0, f64::max)
}

/// Rescale every value so the largest magnitude becomes 1.
///
/// Needs the global maximum, so it runs as a second pass after all scales
/// are computed. An all-zero buffer is left untouched.
///
/// Returns the divisor that was applied (1.0 when skipped).
pub fn normalize_by_max(values: &mut [Complex64]) -> f64 {
    let peak = max_magnitude(values);
    if peak > 0.0 {
        let inv = 1.0 / peak;
        for c in values.iter_mut() {
            *c *= inv;
        }
        peak
    } else {
        1.0
    }
}

/// Convert complex CWT coefficients to dB scale
///
/// dB = 20 * log10(abs(cwt_coef) + epsilon)
pub fn to_db(cwtmat: &ArrayView2<Complex64>, epsilon: f64) -> Array2<f64> {
    cwtmat.mapv(|c| 20.0 * (c.norm() + epsilon).log10())
}
