//! FFT plans and the process-wide plan cache
//!
//! A [`TransformPlan`] bundles the forward and inverse FFTs for one signal
//! length. Plans can be created ad hoc for a single call, or looked up in a
//! [`PlanCache`] keyed by `(signal length, thread count)` so repeated
//! transforms of the same size skip planning. A cached entry only satisfies
//! requests for the same or a lower [`PlanEffort`]; asking for more effort
//! replans and replaces it.

use num_complex::Complex64;
use parking_lot::RwLock;
use rustfft::{Fft, FftPlanner, FftPlannerScalar};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use super::error::{CwtError, Result};
use super::utils::{next_fast_len, try_zeroed};

/// How much effort to spend choosing an FFT strategy, in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PlanEffort {
    /// Take the planner's default choice
    #[default]
    Estimate,
    /// Time candidate strategies and keep the fastest
    Measure,
    Patient,
    Exhaustive,
}

impl PlanEffort {
    /// Timed runs per candidate strategy
    fn trials(self) -> usize {
        match self {
            PlanEffort::Estimate => 0,
            PlanEffort::Measure => 4,
            PlanEffort::Patient => 16,
            PlanEffort::Exhaustive => 64,
        }
    }
}

impl FromStr for PlanEffort {
    type Err = CwtError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_ascii_uppercase();
        match upper.strip_prefix("FFTW_").unwrap_or(upper.as_str()) {
            "ESTIMATE" => Ok(PlanEffort::Estimate),
            "MEASURE" => Ok(PlanEffort::Measure),
            "PATIENT" => Ok(PlanEffort::Patient),
            "EXHAUSTIVE" => Ok(PlanEffort::Exhaustive),
            _ => Err(CwtError::invalid(
                "optimization_hint",
                format!(
                    "unknown value '{}', expected ESTIMATE, MEASURE, PATIENT or EXHAUSTIVE",
                    s
                ),
            )),
        }
    }
}

impl fmt::Display for PlanEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanEffort::Estimate => "ESTIMATE",
            PlanEffort::Measure => "MEASURE",
            PlanEffort::Patient => "PATIENT",
            PlanEffort::Exhaustive => "EXHAUSTIVE",
        };
        f.write_str(name)
    }
}

/// Whether an existing cache entry may be reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReusePolicy {
    #[default]
    Reuse,
    /// Rebuild and replace the entry
    ForceNew,
}

/// Cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanKey {
    pub signal_len: usize,
    pub threads: usize,
}

/// Forward/inverse FFT pair for one signal length
pub struct TransformPlan {
    key: PlanKey,
    fft_len: usize,
    effort: PlanEffort,
    cached: bool,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for TransformPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformPlan")
            .field("key", &self.key)
            .field("fft_len", &self.fft_len)
            .field("effort", &self.effort)
            .field("cached", &self.cached)
            .finish()
    }
}

impl TransformPlan {
    /// Plan FFTs for signals of `signal_len` samples
    pub fn create(signal_len: usize, threads: usize, effort: PlanEffort) -> Result<Self> {
        let key = validate_key(signal_len, threads)?;
        let fft_len = next_fast_len(signal_len);

        let mut planner = FftPlanner::<f64>::new();
        let mut forward = planner.plan_fft_forward(fft_len);
        let mut inverse = planner.plan_fft_inverse(fft_len);

        if effort != PlanEffort::Estimate {
            let mut scalar = FftPlannerScalar::<f64>::new();
            let scalar_forward = scalar.plan_fft_forward(fft_len);
            let trials = effort.trials();

            let auto_time = time_fft(&forward, trials)?;
            let scalar_time = time_fft(&scalar_forward, trials)?;
            log::debug!(
                "plan n={} fft_len={}: auto {:?} vs scalar {:?} over {} trials",
                signal_len,
                fft_len,
                auto_time,
                scalar_time,
                trials
            );
            if scalar_time < auto_time {
                inverse = scalar.plan_fft_inverse(fft_len);
                forward = scalar_forward;
            }
        }

        Ok(Self {
            key,
            fft_len,
            effort,
            cached: false,
            forward,
            inverse,
        })
    }

    /// One-shot plan for a single call, never stored
    pub fn unplanned(signal_len: usize, threads: usize) -> Result<Self> {
        Self::create(signal_len, threads, PlanEffort::Estimate)
    }

    pub fn key(&self) -> PlanKey {
        self.key
    }

    pub fn signal_len(&self) -> usize {
        self.key.signal_len
    }

    pub fn fft_len(&self) -> usize {
        self.fft_len
    }

    pub fn effort(&self) -> PlanEffort {
        self.effort
    }

    /// True when this plan came from a [`PlanCache`]
    pub fn is_cached(&self) -> bool {
        self.cached
    }

    pub fn forward(&self) -> &Arc<dyn Fft<f64>> {
        &self.forward
    }

    pub fn inverse(&self) -> &Arc<dyn Fft<f64>> {
        &self.inverse
    }

    /// Scratch length needed by either direction, in-place
    pub fn scratch_len(&self) -> usize {
        self.forward
            .get_inplace_scratch_len()
            .max(self.inverse.get_inplace_scratch_len())
    }

    /// Check the plan was built for `fft_len`
    pub(crate) fn check_len(&self, fft_len: usize) -> Result<()> {
        if self.forward.len() != fft_len || self.inverse.len() != fft_len {
            return Err(CwtError::Fatal(format!(
                "plan FFT length {} does not match required {}",
                self.forward.len(),
                fft_len
            )));
        }
        Ok(())
    }
}

fn validate_key(signal_len: usize, threads: usize) -> Result<PlanKey> {
    if signal_len == 0 {
        return Err(CwtError::invalid("signal", "length must be >= 1, got 0"));
    }
    if threads == 0 {
        return Err(CwtError::invalid("thread_count", "must be >= 1, got 0"));
    }
    Ok(PlanKey { signal_len, threads })
}

fn time_fft(fft: &Arc<dyn Fft<f64>>, trials: usize) -> Result<Duration> {
    let mut buffer = try_zeroed(fft.len(), "planning buffer")?;
    let mut scratch = try_zeroed(fft.get_inplace_scratch_len(), "planning scratch")?;
    // Warm-up run so twiddles and caches are hot
    fft.process_with_scratch(&mut buffer, &mut scratch);

    let mut best = Duration::MAX;
    for _ in 0..trials {
        buffer.fill(Complex64::new(1.0, 0.0));
        let start = Instant::now();
        fft.process_with_scratch(&mut buffer, &mut scratch);
        best = best.min(start.elapsed());
    }
    Ok(best)
}

/// Plan cache keyed by `(signal length, thread count)`
///
/// Lookups take a shared lock; creation and replacement take the exclusive
/// lock and re-check, so concurrent acquirers of one key end up sharing a
/// single plan. Entries are handed out as `Arc`s, so replacing an entry does
/// not disturb transforms still running on the old plan.
#[derive(Default)]
pub struct PlanCache {
    plans: RwLock<HashMap<PlanKey, Arc<TransformPlan>>>,
}

static GLOBAL_PLAN_CACHE: OnceLock<PlanCache> = OnceLock::new();

/// Get the process-wide plan cache.
pub fn global_plan_cache() -> &'static PlanCache {
    GLOBAL_PLAN_CACHE.get_or_init(PlanCache::new)
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same as [`global_plan_cache`]
    pub fn global() -> &'static PlanCache {
        global_plan_cache()
    }

    /// Return the cached plan for the key, building it first if needed
    ///
    /// A cached plan is reused when it was built with at least `effort`.
    /// Otherwise, or under [`ReusePolicy::ForceNew`], a new plan is built
    /// at `effort` and replaces the entry.
    pub fn acquire(
        &self,
        signal_len: usize,
        threads: usize,
        effort: PlanEffort,
        policy: ReusePolicy,
    ) -> Result<Arc<TransformPlan>> {
        let key = validate_key(signal_len, threads)?;

        let reusable =
            |plan: &Arc<TransformPlan>| policy == ReusePolicy::Reuse && plan.effort >= effort;

        if let Some(plan) = self.plans.read().get(&key).filter(|p| reusable(*p)) {
            log::trace!("plan cache hit for {:?}", key);
            return Ok(Arc::clone(plan));
        }

        let mut plans = self.plans.write();
        // Another thread may have built it while we waited
        if let Some(plan) = plans.get(&key).filter(|p| reusable(*p)) {
            return Ok(Arc::clone(plan));
        }

        let mut plan = TransformPlan::create(signal_len, threads, effort)?;
        plan.cached = true;
        let plan = Arc::new(plan);
        let replaced = plans.insert(key, Arc::clone(&plan)).is_some();
        log::debug!(
            "{} plan for {:?} (fft_len={}, effort={})",
            if replaced { "replaced" } else { "created" },
            key,
            plan.fft_len,
            effort
        );
        Ok(plan)
    }

    pub fn lookup(&self, signal_len: usize, threads: usize) -> Option<Arc<TransformPlan>> {
        self.plans
            .read()
            .get(&PlanKey { signal_len, threads })
            .cloned()
    }

    /// Drop the entry for the key; returns whether one existed
    pub fn invalidate(&self, signal_len: usize, threads: usize) -> bool {
        self.plans
            .write()
            .remove(&PlanKey { signal_len, threads })
            .is_some()
    }

    pub fn clear(&self) {
        self.plans.write().clear();
    }

    pub fn len(&self) -> usize {
        self.plans.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.read().is_empty()
    }
}
