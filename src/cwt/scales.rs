//! Scale / frequency axis generation
//!
//! Scales are wavelet dilations measured in samples, `scale = fs / frequency`.
//! The axis is generated in ascending-scale order (high to low frequency) and
//! can be handed to the caller in either direction.

use ndarray::Array1;
use std::fmt;
use std::str::FromStr;

use super::error::{CwtError, Result};

/// Law used to place the `fn` analysis points between `f0` and `f1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    /// Dilations evenly spaced
    LinearScales,
    /// Dilations evenly spaced in log-space (denser at low frequency)
    LogScales,
    /// Frequencies evenly spaced
    #[default]
    LinearFrequencies,
}

impl FromStr for Distribution {
    type Err = CwtError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LINEAR_SCALES" | "FCWT_LINSCALES" => Ok(Distribution::LinearScales),
            "LOG_SCALES" | "FCWT_LOGSCALES" => Ok(Distribution::LogScales),
            "LINEAR_FREQUENCIES" | "FCWT_LINFREQS" => Ok(Distribution::LinearFrequencies),
            _ => Err(CwtError::invalid(
                "distribution",
                format!(
                    "unknown value '{}', expected LINEAR_SCALES, LOG_SCALES or LINEAR_FREQUENCIES",
                    s
                ),
            )),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Distribution::LinearScales => "LINEAR_SCALES",
            Distribution::LogScales => "LOG_SCALES",
            Distribution::LinearFrequencies => "LINEAR_FREQUENCIES",
        };
        f.write_str(name)
    }
}

/// Direction in which the axis (and the scalogram columns) are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyOrder {
    /// Lowest frequency first
    #[default]
    Ascending,
    /// Engine order: ascending scale, i.e. highest frequency first
    Native,
}

/// One analysis point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// Dilation in samples
    pub scale: f64,
    /// Analysed frequency in Hz
    pub frequency: f64,
}

/// Ordered set of analysis scales
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleAxis {
    points: Vec<Scale>,
    distribution: Distribution,
    order: FrequencyOrder,
    fs: f64,
}

impl ScaleAxis {
    /// Generate `fn_count` scales for `[f0, f1]` at sample rate `fs`
    ///
    /// # Constraints
    /// `fs > 0`, `0 < f0 < f1 <= fs / 2`, `fn_count >= 1`; all finite.
    ///
    /// # Returns
    /// Axis in the requested `order`. `fn_count == 1` yields the single
    /// point at `f1`.
    pub fn generate(
        distribution: Distribution,
        fs: f64,
        f0: f64,
        f1: f64,
        fn_count: usize,
        order: FrequencyOrder,
    ) -> Result<Self> {
        validate_range(fs, f0, f1, fn_count)?;

        let s0 = fs / f1;
        let s1 = fs / f0;
        let last = (fn_count - 1).max(1) as f64;

        // Native order: ascending scale
        let points: Vec<Scale> = (0..fn_count)
            .map(|i| {
                let t = i as f64 / last;
                match distribution {
                    Distribution::LinearFrequencies => {
                        let frequency = if i + 1 == fn_count && fn_count > 1 {
                            f0
                        } else {
                            f1 - (f1 - f0) * t
                        };
                        Scale {
                            scale: fs / frequency,
                            frequency,
                        }
                    }
                    Distribution::LinearScales => {
                        let scale = s0 + (s1 - s0) * t;
                        Scale {
                            scale,
                            frequency: (fs / scale).clamp(f0, f1),
                        }
                    }
                    Distribution::LogScales => {
                        let scale = s0 * (s1 / s0).powf(t);
                        Scale {
                            scale,
                            frequency: (fs / scale).clamp(f0, f1),
                        }
                    }
                }
            })
            .collect();

        let axis = ScaleAxis {
            points,
            distribution,
            order: FrequencyOrder::Native,
            fs,
        };
        Ok(axis.reordered(order))
    }

    /// Same axis presented in `order`
    pub fn reordered(mut self, order: FrequencyOrder) -> Self {
        if self.order != order {
            self.points.reverse();
            self.order = order;
        }
        self
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Scale] {
        &self.points
    }

    pub fn scales(&self) -> Array1<f64> {
        self.points.iter().map(|p| p.scale).collect()
    }

    pub fn frequencies(&self) -> Array1<f64> {
        self.points.iter().map(|p| p.frequency).collect()
    }

    pub fn order(&self) -> FrequencyOrder {
        self.order
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    pub fn sample_rate(&self) -> f64 {
        self.fs
    }
}

fn validate_range(fs: f64, f0: f64, f1: f64, fn_count: usize) -> Result<()> {
    if !(fs.is_finite() && fs > 0.0) {
        return Err(CwtError::invalid("fs", format!("must be finite and > 0, got {}", fs)));
    }
    if !(f0.is_finite() && f0 > 0.0) {
        return Err(CwtError::invalid("f0", format!("must be finite and > 0, got {}", f0)));
    }
    if !f1.is_finite() || f0 >= f1 {
        return Err(CwtError::invalid(
            "f1",
            format!("must be finite and > f0 ({}), got {}", f0, f1),
        ));
    }
    if f1 > fs / 2.0 {
        return Err(CwtError::invalid(
            "f1",
            format!("must not exceed the Nyquist frequency fs/2 ({}), got {}", fs / 2.0, f1),
        ));
    }
    if fn_count == 0 {
        return Err(CwtError::invalid("fn", "must be >= 1, got 0"));
    }
    Ok(())
}
