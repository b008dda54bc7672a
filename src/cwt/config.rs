//! Transform options
//!
//! Every parameter of a [`cwt`](super::core::cwt) call, with defaults, a
//! builder, and up-front validation.

use super::error::{CwtError, Result};
use super::plan::{PlanEffort, ReusePolicy};
use super::scales::{Distribution, FrequencyOrder};
use super::wavelets::{WaveletFamily, DEFAULT_BANDWIDTH};

/// Options for a full transform
///
/// # Defaults
/// * `thread_count` - 1
/// * `optimize` - false
/// * `effort` - ESTIMATE
/// * `distribution` - LINEAR_FREQUENCIES
/// * `normalize` - false
/// * `bandwidth` - 2.0
/// * `force_new_plan` - false
/// * `wavelet` - MORLET
/// * `order` - ascending frequency
/// * `plan_fallback` - false (plan failures are returned)
#[derive(Debug, Clone, PartialEq)]
pub struct CwtOptions {
    /// Number of scales (`fn`)
    pub num_scales: usize,
    /// Lowest analysed frequency (Hz)
    pub f0: f64,
    /// Highest analysed frequency (Hz), at most `fs / 2`
    pub f1: f64,
    /// Sample rate (Hz)
    pub fs: f64,
    pub thread_count: usize,
    /// Use a cached FFT plan
    pub optimize: bool,
    pub effort: PlanEffort,
    pub distribution: Distribution,
    /// Rescale the scalogram so the largest magnitude is 1
    pub normalize: bool,
    pub bandwidth: f64,
    /// Rebuild the cached plan even if one exists
    pub force_new_plan: bool,
    pub wavelet: WaveletFamily,
    pub order: FrequencyOrder,
    /// Run unplanned instead of failing when a cached plan cannot be built
    /// for lack of memory. Best-effort: only `ResourceExhausted` from plan
    /// creation degrades, every other error is returned.
    pub plan_fallback: bool,
}

impl CwtOptions {
    pub fn new(f0: f64, f1: f64, fs: f64, num_scales: usize) -> Self {
        Self {
            num_scales,
            f0,
            f1,
            fs,
            thread_count: 1,
            optimize: false,
            effort: PlanEffort::Estimate,
            distribution: Distribution::LinearFrequencies,
            normalize: false,
            bandwidth: DEFAULT_BANDWIDTH,
            force_new_plan: false,
            wavelet: WaveletFamily::Morlet,
            order: FrequencyOrder::Ascending,
            plan_fallback: false,
        }
    }

    pub fn with_threads(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_effort(mut self, effort: PlanEffort) -> Self {
        self.effort = effort;
        self
    }

    /// Set the planning effort from its name (e.g. "ESTIMATE", "FFTW_MEASURE")
    pub fn with_optimization_hint(mut self, hint: &str) -> Result<Self> {
        self.effort = hint.parse()?;
        Ok(self)
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    /// Set the distribution from its name (e.g. "LOG_SCALES", "FCWT_LINFREQS")
    pub fn with_distribution_name(mut self, name: &str) -> Result<Self> {
        self.distribution = name.parse()?;
        Ok(self)
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn with_force_new_plan(mut self, force: bool) -> Self {
        self.force_new_plan = force;
        self
    }

    pub fn with_wavelet(mut self, wavelet: WaveletFamily) -> Self {
        self.wavelet = wavelet;
        self
    }

    pub fn with_wavelet_name(mut self, name: &str) -> Result<Self> {
        self.wavelet = name.parse()?;
        Ok(self)
    }

    pub fn with_order(mut self, order: FrequencyOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_plan_fallback(mut self, fallback: bool) -> Self {
        self.plan_fallback = fallback;
        self
    }

    pub fn reuse_policy(&self) -> ReusePolicy {
        if self.force_new_plan {
            ReusePolicy::ForceNew
        } else {
            ReusePolicy::Reuse
        }
    }

    /// Check options that do not depend on the signal
    ///
    /// Frequency range checks live with the scale axis and run when it is
    /// generated; both happen before any FFT work.
    pub fn validate(&self) -> Result<()> {
        if self.num_scales == 0 {
            return Err(CwtError::invalid("fn", "must be >= 1, got 0"));
        }
        if self.thread_count == 0 {
            return Err(CwtError::invalid("thread_count", "must be >= 1, got 0"));
        }
        if !(self.bandwidth.is_finite() && self.bandwidth > 0.0) {
            return Err(CwtError::invalid(
                "bandwidth",
                format!("must be finite and > 0, got {}", self.bandwidth),
            ));
        }
        Ok(())
    }
}
