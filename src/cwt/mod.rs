//! # CWT (Continuous Wavelet Transform) Module
//!
//! FFT-based continuous wavelet transform with a Morlet kernel evaluated in
//! the frequency domain, cached FFT plans and multi-threaded scale fan-out.

pub mod error;
pub mod config;
pub mod scales;
pub mod wavelets;
pub mod plan;
pub mod dispatch;
pub mod utils;
pub mod core;

// Re-export main types and functions
pub use self::config::CwtOptions;
pub use self::core::{cwt, cwt_single_scale, CwtEngine, CwtOutput};
pub use self::dispatch::ThreadDispatcher;
pub use self::error::{CwtError, Result};
pub use self::plan::{global_plan_cache, PlanCache, PlanEffort, PlanKey, ReusePolicy, TransformPlan};
pub use self::scales::{Distribution, FrequencyOrder, Scale, ScaleAxis};
pub use self::wavelets::{Morlet, Wavelet, WaveletFamily, DEFAULT_BANDWIDTH};
