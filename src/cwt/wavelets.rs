//! Wavelet kernels
//!
//! Mother wavelets are evaluated directly in the frequency domain, so a
//! daughter wavelet at any scale is a pure function of the FFT bin index.
//! Only the Morlet family is provided.

use ndarray::Array1;
use num_complex::Complex64;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use super::error::{CwtError, Result};

/// Default Morlet bandwidth
pub const DEFAULT_BANDWIDTH: f64 = 2.0;

/// Supported wavelet families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveletFamily {
    #[default]
    Morlet,
}

impl FromStr for WaveletFamily {
    type Err = CwtError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("morlet") {
            Ok(WaveletFamily::Morlet)
        } else {
            Err(CwtError::invalid(
                "wavelet",
                format!("unsupported family '{}', expected MORLET", s),
            ))
        }
    }
}

impl fmt::Display for WaveletFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveletFamily::Morlet => f.write_str("MORLET"),
        }
    }
}

/// Morlet wavelet parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Morlet {
    /// Bandwidth (time/frequency trade-off, higher = sharper in frequency)
    bandwidth: f64,
    /// sqrt(2*pi) / pi^(1/4)
    norm: f64,
}

impl Morlet {
    pub fn new(bandwidth: f64) -> Result<Self> {
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return Err(CwtError::invalid(
                "bandwidth",
                format!("must be finite and > 0, got {}", bandwidth),
            ));
        }
        Ok(Self {
            bandwidth,
            norm: (2.0 * PI).sqrt() * PI.powf(-0.25),
        })
    }

    /// Frequency response at `ratio` = bin frequency / analysed frequency
    ///
    /// # Formula
    /// ```text
    /// psi_hat(r) = sqrt(2*pi) * pi^(-1/4) * exp(-(2*pi*fb*(r - 1))^2 / 2)
    /// ```
    /// A Gaussian centred on r = 1.
    #[inline]
    pub fn response(&self, ratio: f64) -> f64 {
        let x = 2.0 * PI * self.bandwidth * (ratio - 1.0);
        self.norm * (-0.5 * x * x).exp()
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

/// A wavelet bound to its shape parameter. Read-only and `Sync`, so a
/// single instance is shared by all workers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wavelet {
    Morlet(Morlet),
}

impl Wavelet {
    /// Build the kernel evaluator for `family`
    pub fn build(family: WaveletFamily, bandwidth: f64) -> Result<Self> {
        match family {
            WaveletFamily::Morlet => Ok(Wavelet::Morlet(Morlet::new(bandwidth)?)),
        }
    }

    pub fn family(&self) -> WaveletFamily {
        match self {
            Wavelet::Morlet(_) => WaveletFamily::Morlet,
        }
    }

    pub fn bandwidth(&self) -> f64 {
        match self {
            Wavelet::Morlet(m) => m.bandwidth(),
        }
    }

    /// Check that `scale` is a usable dilation: finite and positive
    ///
    /// The evaluators below assume this holds; callers that accept a
    /// scale from outside a generated axis check it first.
    pub fn check_scale(scale: f64) -> Result<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CwtError::invalid(
                "scale",
                format!("must be finite and > 0, got {}", scale),
            ));
        }
        Ok(())
    }

    /// Number of leading FFT bins where the daughter wavelet is non-zero
    ///
    /// The kernel is analytic: it covers bins `0..=fft_len/2` only, and is
    /// cut off once the bin frequency reaches twice the analysed frequency.
    pub fn support(&self, scale: f64, fft_len: usize) -> usize {
        match self {
            Wavelet::Morlet(_) => {
                let one_sided = fft_len / 2 + 1;
                let cutoff = (2.0 * fft_len as f64 / scale).ceil();
                if cutoff.is_finite() && cutoff >= 0.0 {
                    one_sided.min(cutoff as usize)
                } else {
                    one_sided
                }
            }
        }
    }

    /// Daughter wavelet at `scale` (samples) for FFT bin `bin` of an
    /// `fft_len`-point transform
    #[inline]
    pub fn evaluate(&self, scale: f64, bin: usize, fft_len: usize) -> Complex64 {
        if bin >= self.support(scale, fft_len) {
            return Complex64::new(0.0, 0.0);
        }
        match self {
            Wavelet::Morlet(m) => {
                let ratio = bin as f64 * scale / fft_len as f64;
                Complex64::new(m.response(ratio), 0.0)
            }
        }
    }

    /// Full frequency-domain kernel over all `fft_len` bins
    pub fn kernel(&self, scale: f64, fft_len: usize) -> Array1<Complex64> {
        Array1::from_shape_fn(fft_len, |q| self.evaluate(scale, q, fft_len))
    }

    /// Multiply `spectrum` by the daughter wavelet at `scale`, writing into
    /// `out`. Bins outside the support are zeroed.
    pub fn apply(&self, scale: f64, spectrum: &[Complex64], out: &mut [Complex64]) {
        let fft_len = spectrum.len();
        let support = self.support(scale, fft_len);
        match self {
            Wavelet::Morlet(m) => {
                let step = scale / fft_len as f64;
                for (q, (o, &s)) in out.iter_mut().zip(spectrum).enumerate().take(support) {
                    *o = s * m.response(q as f64 * step);
                }
            }
        }
        for o in out.iter_mut().skip(support) {
            *o = Complex64::new(0.0, 0.0);
        }
    }
}
