//! # fast_cwt - Continuous wavelet transform engine
//!
//! Computes complex Morlet scalograms of real signals:
//!
//! - scale axes with linear-frequency, linear-scale or log-scale spacing
//! - frequency-domain Morlet kernels with adjustable bandwidth
//! - one forward FFT per signal, one inverse FFT per scale, fanned out
//!   over a rayon worker pool
//! - optional process-wide FFT plan cache for repeated transforms of the
//!   same length
//! - optional normalization of the result to unit peak magnitude
//!
//! ```no_run
//! use fast_cwt::{cwt, CwtOptions};
//! use ndarray::Array1;
//!
//! let signal = Array1::from_shape_fn(1000, |t| (t as f64 * 0.3).sin());
//! let opts = CwtOptions::new(1.0, 50.0, 100.0, 64).with_threads(4);
//! let out = cwt(&signal, &opts).unwrap();
//! assert_eq!(out.scalogram.dim(), (1000, 64));
//! ```

pub mod cwt;

pub use cwt::{
    cwt, cwt_single_scale, global_plan_cache, CwtEngine, CwtError, CwtOptions, CwtOutput,
    Distribution, FrequencyOrder, PlanCache, PlanEffort, ReusePolicy, ScaleAxis, TransformPlan,
    Wavelet, WaveletFamily,
};
