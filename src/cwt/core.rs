//! Core CWT algorithm implementation
//!
//! Implements the continuous wavelet transform as FFT-based convolution:
//! the signal spectrum is computed once, then every scale multiplies it by
//! the daughter wavelet and runs one inverse FFT.

use ndarray::{Array1, Array2, ArrayView1};
use num_complex::Complex64;
use rustfft::Fft;
use std::sync::Arc;

use super::config::CwtOptions;
use super::dispatch::ThreadDispatcher;
use super::error::{CwtError, Result};
use super::plan::{global_plan_cache, TransformPlan};
use super::scales::{FrequencyOrder, ScaleAxis};
use super::utils::{next_fast_len, normalize_by_max, to_db, try_zeroed};
use super::wavelets::Wavelet;

/// CWT output structure
#[derive(Debug, Clone)]
pub struct CwtOutput {
    /// CWT coefficients matrix (signal_length, num_scales); column `j`
    /// belongs to `frequencies[j]`
    pub scalogram: Array2<Complex64>,
    /// Frequencies (Hz) in `order`
    pub frequencies: Array1<f64>,
    /// Scales (samples) in `order`
    pub scales: Array1<f64>,
    /// Direction of `frequencies` and of the scalogram columns
    pub order: FrequencyOrder,
}

impl CwtOutput {
    /// (signal_length, num_scales)
    pub fn shape(&self) -> (usize, usize) {
        self.scalogram.dim()
    }

    pub fn magnitude(&self) -> Array2<f64> {
        self.scalogram.mapv(|c| c.norm())
    }

    pub fn power(&self) -> Array2<f64> {
        self.scalogram.mapv(|c| c.norm_sqr())
    }

    pub fn phase(&self) -> Array2<f64> {
        self.scalogram.mapv(|c| c.arg())
    }

    /// Magnitudes in dB, `20 * log10(|c| + epsilon)`
    pub fn to_db(&self, epsilon: f64) -> Array2<f64> {
        to_db(&self.scalogram.view(), epsilon)
    }
}

/// Per-worker buffers for one column's inverse FFT
struct ColumnWorkspace {
    buffer: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl ColumnWorkspace {
    fn new(fft_len: usize, scratch_len: usize) -> Result<Self> {
        Ok(Self {
            buffer: try_zeroed(fft_len, "column buffer")?,
            scratch: try_zeroed(scratch_len, "inverse fft scratch")?,
        })
    }
}

/// Zero-pad `signal` to the plan's FFT length and transform it
fn forward_spectrum(signal: ArrayView1<f64>, plan: &TransformPlan) -> Result<Vec<Complex64>> {
    let mut spectrum = try_zeroed(plan.fft_len(), "signal spectrum")?;
    for (s, &x) in spectrum.iter_mut().zip(signal.iter()) {
        *s = Complex64::new(x, 0.0);
    }
    let forward = plan.forward();
    let mut scratch = try_zeroed(forward.get_inplace_scratch_len(), "forward fft scratch")?;
    forward.process_with_scratch(&mut spectrum, &mut scratch);
    Ok(spectrum)
}

/// Fill one scalogram column: multiply by the daughter wavelet, inverse
/// FFT, scale by 1/N and crop to the signal length
fn scale_column(
    wavelet: &Wavelet,
    scale: f64,
    spectrum: &[Complex64],
    inverse: &Arc<dyn Fft<f64>>,
    ws: &mut ColumnWorkspace,
    column: &mut [Complex64],
) {
    wavelet.apply(scale, spectrum, &mut ws.buffer);
    inverse.process_with_scratch(&mut ws.buffer, &mut ws.scratch);

    let norm = 1.0 / spectrum.len() as f64;
    for (out, &c) in column.iter_mut().zip(ws.buffer.iter()) {
        *out = c * norm;
    }
}

/// Compute CWT for a single scale
///
/// # Arguments
/// * `signal` - Input signal
/// * `scale` - Dilation in samples (`fs / frequency`)
/// * `wavelet` - Kernel to apply
///
/// # Returns
/// Complex response of length `signal.len()`, unnormalized
///
/// # Errors
/// `InvalidArgument` when `scale` is not finite and positive or the signal
/// is empty.
pub fn cwt_single_scale(
    signal: ArrayView1<f64>,
    scale: f64,
    wavelet: &Wavelet,
) -> Result<Array1<Complex64>> {
    Wavelet::check_scale(scale)?;
    let n = signal.len();
    let plan = TransformPlan::unplanned(n, 1)?;
    let spectrum = forward_spectrum(signal, &plan)?;

    let mut ws = ColumnWorkspace::new(plan.fft_len(), plan.inverse().get_inplace_scratch_len())?;
    let mut column = try_zeroed(n, "column")?;
    scale_column(wavelet, scale, &spectrum, plan.inverse(), &mut ws, &mut column);
    Ok(Array1::from_vec(column))
}

/// Reusable transform session: a wavelet, a worker pool and the
/// normalization choice
#[derive(Debug)]
pub struct CwtEngine {
    wavelet: Wavelet,
    dispatcher: ThreadDispatcher,
    normalize: bool,
}

impl CwtEngine {
    pub fn new(wavelet: Wavelet, thread_count: usize, normalize: bool) -> Result<Self> {
        Ok(Self {
            wavelet,
            dispatcher: ThreadDispatcher::new(thread_count)?,
            normalize,
        })
    }

    pub fn wavelet(&self) -> &Wavelet {
        &self.wavelet
    }

    pub fn threads(&self) -> usize {
        self.dispatcher.threads()
    }

    pub fn normalizes(&self) -> bool {
        self.normalize
    }

    /// Compute the scalogram of `signal` over `axis`
    ///
    /// # Arguments
    /// * `signal` - Real samples, at least one
    /// * `axis` - Scales to analyse; column order of the result
    /// * `plan` - Cached plan for this signal length, or `None` to plan ad hoc
    ///
    /// # Algorithm
    /// 1. Forward FFT of the zero-padded signal (once, shared by all scales)
    /// 2. Per scale, in parallel: multiply by the daughter wavelet, inverse
    ///    FFT, write the first `n` samples as that scale's column
    /// 3. Optionally rescale so the largest magnitude is 1
    ///
    /// # Returns
    /// Matrix of shape (signal_length, num_scales)
    ///
    /// # Errors
    /// `InvalidArgument` for an empty signal or axis, `ResourceExhausted`
    /// when buffers cannot be allocated, `Fatal` when `plan` was built for
    /// another length.
    pub fn transform(
        &self,
        signal: ArrayView1<f64>,
        axis: &ScaleAxis,
        plan: Option<&TransformPlan>,
    ) -> Result<Array2<Complex64>> {
        let n = signal.len();
        if n == 0 {
            return Err(CwtError::invalid("signal", "length must be >= 1, got 0"));
        }
        if axis.is_empty() {
            return Err(CwtError::invalid("fn", "must be >= 1, got 0"));
        }
        let fn_count = axis.len();
        let fft_len = next_fast_len(n);

        let adhoc;
        let plan = match plan {
            Some(plan) => {
                if plan.signal_len() != n {
                    return Err(CwtError::Fatal(format!(
                        "plan built for {} samples used on a signal of {}",
                        plan.signal_len(),
                        n
                    )));
                }
                plan
            }
            None => {
                adhoc = TransformPlan::unplanned(n, self.threads())?;
                &adhoc
            }
        };
        plan.check_len(fft_len)?;

        log::debug!(
            "cwt: n={} fn={} fft_len={} threads={} cached_plan={} normalize={}",
            n,
            fn_count,
            fft_len,
            self.threads(),
            plan.is_cached(),
            self.normalize
        );

        let spectrum = forward_spectrum(signal, plan)?;

        let total = n.checked_mul(fn_count).ok_or_else(|| {
            CwtError::ResourceExhausted(format!("scalogram of {} x {} overflows", n, fn_count))
        })?;
        // Scale-major: column j occupies data[j * n..(j + 1) * n]
        let mut data = try_zeroed(total, "scalogram")?;

        let points = axis.points();
        let inverse = plan.inverse();
        let scratch_len = inverse.get_inplace_scratch_len();
        let wavelet = &self.wavelet;

        self.dispatcher.run(
            &mut data,
            n,
            || ColumnWorkspace::new(fft_len, scratch_len),
            |j, column, ws| {
                scale_column(wavelet, points[j].scale, &spectrum, inverse, ws, column);
                Ok(())
            },
        )?;

        if self.normalize {
            let peak = normalize_by_max(&mut data);
            log::trace!("normalized scalogram by peak magnitude {}", peak);
        }

        let scalogram = Array2::from_shape_vec((fn_count, n), data)
            .map_err(|e| CwtError::Fatal(format!("scalogram shape: {}", e)))?;
        Ok(scalogram.reversed_axes())
    }
}

/// Resolve a cache acquisition, degrading to an unplanned run on
/// `ResourceExhausted` when `fallback` is set. Other errors always propagate.
fn plan_or_fallback(
    acquired: Result<Arc<TransformPlan>>,
    fallback: bool,
) -> Result<Option<Arc<TransformPlan>>> {
    match acquired {
        Ok(plan) => Ok(Some(plan)),
        Err(CwtError::ResourceExhausted(msg)) if fallback => {
            log::warn!("plan creation failed ({}), running unplanned", msg);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Full CWT computation with all pre/post processing
///
/// This is the main entry point:
/// 1. Validate options, generate the scale axis, build the wavelet
///    (all before any FFT work)
/// 2. Acquire a cached plan when `optimize` is set
/// 3. Run the transform
///
/// # Returns
/// CwtOutput containing:
/// - scalogram: (signal_length, num_scales), columns in `options.order`
/// - frequencies / scales: axis in `options.order`
pub fn cwt(signal: &Array1<f64>, options: &CwtOptions) -> Result<CwtOutput> {
    options.validate()?;
    let n = signal.len();
    if n == 0 {
        return Err(CwtError::invalid("signal", "length must be >= 1, got 0"));
    }

    let axis = ScaleAxis::generate(
        options.distribution,
        options.fs,
        options.f0,
        options.f1,
        options.num_scales,
        options.order,
    )?;
    let wavelet = Wavelet::build(options.wavelet, options.bandwidth)?;
    let engine = CwtEngine::new(wavelet, options.thread_count, options.normalize)?;

    let plan = if options.optimize {
        let acquired = global_plan_cache().acquire(
            n,
            options.thread_count,
            options.effort,
            options.reuse_policy(),
        );
        plan_or_fallback(acquired, options.plan_fallback)?
    } else {
        None
    };

    let scalogram = engine.transform(signal.view(), &axis, plan.as_deref())?;

    Ok(CwtOutput {
        scalogram,
        frequencies: axis.frequencies(),
        scales: axis.scales(),
        order: axis.order(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cwt::scales::Distribution;
    use crate::cwt::wavelets::WaveletFamily;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn sine(freq: f64, fs: f64, n: usize, amplitude: f64) -> Array1<f64> {
        Array1::from_shape_fn(n, |t| amplitude * (2.0 * PI * freq * t as f64 / fs).cos())
    }

    fn chirp_like(n: usize) -> Array1<f64> {
        Array1::from_shape_fn(n, |t| {
            let x = t as f64;
            (0.05 * x).sin() + 0.5 * (0.31 * x).cos() + 0.1 * ((x * 7.0) % 3.0)
        })
    }

    fn assert_matrix_close(a: &Array2<Complex64>, b: &Array2<Complex64>, eps: f64) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(x.re, y.re, epsilon = eps);
            assert_relative_eq!(x.im, y.im, epsilon = eps);
        }
    }

    #[test]
    fn test_cwt_output_shape() {
        for &(n, fn_count) in &[(100, 7), (1000, 64), (256, 1), (37, 20)] {
            let signal = chirp_like(n);
            let out = cwt(&signal, &CwtOptions::new(1.0, 50.0, 100.0, fn_count)).unwrap();
            assert_eq!(out.shape(), (n, fn_count));
            assert_eq!(out.frequencies.len(), fn_count);
            assert_eq!(out.scales.len(), fn_count);
        }
    }

    #[test]
    fn test_frequencies_ascending_and_in_range() {
        let fs = 200.0;
        let signal = chirp_like(300);
        for dist in [
            Distribution::LinearScales,
            Distribution::LogScales,
            Distribution::LinearFrequencies,
        ] {
            let opts = CwtOptions::new(0.5, fs / 2.0, fs, 48).with_distribution(dist);
            let out = cwt(&signal, &opts).unwrap();
            assert_eq!(out.order, FrequencyOrder::Ascending);
            assert!(out.frequencies.iter().all(|&f| f > 0.0 && f <= fs / 2.0));
            assert!(out
                .frequencies
                .iter()
                .zip(out.frequencies.iter().skip(1))
                .all(|(a, b)| a < b));
        }
    }

    #[test]
    fn test_native_order_reverses_columns() {
        let signal = chirp_like(200);
        let base = CwtOptions::new(1.0, 40.0, 100.0, 12);
        let asc = cwt(&signal, &base).unwrap();
        let native = cwt(&signal, &base.clone().with_order(FrequencyOrder::Native)).unwrap();

        assert_eq!(native.order, FrequencyOrder::Native);
        for j in 0..12 {
            assert_eq!(asc.frequencies[j], native.frequencies[11 - j]);
            assert_eq!(asc.scalogram.column(j), native.scalogram.column(11 - j));
        }
    }

    #[test]
    fn test_sine_peaks_at_matching_scale() {
        let fs = 100.0;
        let n = 1000;
        // 1 Hz spacing from 1 to 50 Hz
        let opts = CwtOptions::new(1.0, 50.0, fs, 50);

        for &fk in &[5.0, 12.0, 20.0, 33.0, 45.0] {
            let out = cwt(&sine(fk, fs, n, 1.0), &opts).unwrap();
            let mag = out.magnitude();
            let energy: Vec<f64> = (0..50)
                .map(|j| mag.column(j).iter().skip(200).take(600).sum())
                .collect();
            let best = (0..50)
                .max_by(|&a, &b| energy[a].partial_cmp(&energy[b]).unwrap())
                .unwrap();
            assert!(
                (out.frequencies[best] - fk).abs() <= 1.0 + 1e-9,
                "peak at {} Hz for a {} Hz tone",
                out.frequencies[best],
                fk
            );
        }
    }

    #[test]
    fn test_sine_magnitude_in_steady_state() {
        let fs = 100.0;
        let out = cwt(&sine(10.0, fs, 1000, 1.0), &CwtOptions::new(10.0, 20.0, fs, 11)).unwrap();
        // Column 0 is 10 Hz; analytic kernel keeps half the tone's energy
        let expected = 0.5 * (2.0 * PI).sqrt() * PI.powf(-0.25);
        let mid = out.scalogram[[500, 0]].norm();
        assert_relative_eq!(mid, expected, max_relative = 0.05);
    }

    #[test]
    fn test_normalize_bounds_magnitudes() {
        let signal = sine(7.0, 100.0, 500, 25.0);
        let opts = CwtOptions::new(1.0, 50.0, 100.0, 30).with_normalize(true);
        let out = cwt(&signal, &opts).unwrap();
        let mag = out.magnitude();

        let peak = mag.iter().cloned().fold(0.0, f64::max);
        assert_relative_eq!(peak, 1.0, epsilon = 1e-12);
        assert!(mag.iter().all(|&m| (0.0..=1.0 + 1e-12).contains(&m)));
    }

    #[test]
    fn test_unnormalized_scales_with_amplitude() {
        let opts = CwtOptions::new(1.0, 50.0, 100.0, 16);
        let a = cwt(&sine(9.0, 100.0, 400, 1.0), &opts).unwrap();
        let b = cwt(&sine(9.0, 100.0, 400, 3.0), &opts).unwrap();
        let scaled = a.scalogram.mapv(|c| c * 3.0);
        assert_matrix_close(&scaled, &b.scalogram, 1e-9);
        assert!(b.magnitude().iter().cloned().fold(0.0, f64::max) > 1.0);
    }

    #[test]
    fn test_repeated_calls_identical() {
        let signal = chirp_like(777);
        let opts = CwtOptions::new(0.5, 50.0, 100.0, 40).with_threads(3);
        let a = cwt(&signal, &opts).unwrap();
        let b = cwt(&signal, &opts).unwrap();
        assert_eq!(a.scalogram, b.scalogram);
        assert_eq!(a.frequencies, b.frequencies);
    }

    #[test]
    fn test_thread_count_invariance() {
        let signal = chirp_like(1500);
        let base = CwtOptions::new(0.5, 50.0, 100.0, 33).with_distribution(Distribution::LogScales);
        let one = cwt(&signal, &base.clone().with_threads(1)).unwrap();
        let four = cwt(&signal, &base.with_threads(4)).unwrap();
        assert_matrix_close(&one.scalogram, &four.scalogram, 1e-12);
    }

    #[test]
    fn test_cached_plan_matches_unplanned() {
        let n = 913;
        let signal = chirp_like(n);
        let base = CwtOptions::new(1.0, 45.0, 100.0, 25).with_threads(2);
        let plain = cwt(&signal, &base).unwrap();

        let planned_opts = base.clone().with_optimize(true);
        let planned = cwt(&signal, &planned_opts).unwrap();
        assert!(global_plan_cache().lookup(n, 2).is_some());
        // Second call reuses the cached plan
        let reused = cwt(&signal, &planned_opts).unwrap();
        let forced = cwt(&signal, &planned_opts.clone().with_force_new_plan(true)).unwrap();

        assert_matrix_close(&plain.scalogram, &planned.scalogram, 1e-10);
        assert_matrix_close(&plain.scalogram, &reused.scalogram, 1e-10);
        assert_matrix_close(&plain.scalogram, &forced.scalogram, 1e-10);
    }

    #[test]
    fn test_measured_plan_matches_unplanned() {
        let n = 431;
        let signal = chirp_like(n);
        let base = CwtOptions::new(1.0, 45.0, 100.0, 10);
        let plain = cwt(&signal, &base).unwrap();
        let measured = cwt(
            &signal,
            &base
                .clone()
                .with_optimize(true)
                .with_optimization_hint("MEASURE")
                .unwrap(),
        )
        .unwrap();
        assert_matrix_close(&plain.scalogram, &measured.scalogram, 1e-9);
    }

    #[test]
    fn test_single_scale_matches_direct() {
        let signal = chirp_like(300);
        let opts = CwtOptions::new(2.0, 20.0, 100.0, 1);
        let out = cwt(&signal, &opts).unwrap();
        assert_eq!(out.shape(), (300, 1));

        let wavelet = Wavelet::build(WaveletFamily::Morlet, 2.0).unwrap();
        let direct = cwt_single_scale(signal.view(), out.scales[0], &wavelet).unwrap();
        for (a, b) in out.scalogram.column(0).iter().zip(direct.iter()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-12);
            assert_relative_eq!(a.im, b.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_single_scale_rejects_bad_scale() {
        let signal = chirp_like(64);
        let wavelet = Wavelet::build(WaveletFamily::Morlet, 2.0).unwrap();
        for scale in [0.0, -4.0, f64::NAN, f64::NEG_INFINITY] {
            assert!(matches!(
                cwt_single_scale(signal.view(), scale, &wavelet),
                Err(CwtError::InvalidArgument { ref name, .. }) if name == "scale"
            ));
        }
    }

    #[test]
    fn test_plan_fallback_policy() {
        let exhausted = || Err(CwtError::ResourceExhausted("fft buffer".into()));

        assert!(matches!(plan_or_fallback(exhausted(), true), Ok(None)));
        assert!(matches!(
            plan_or_fallback(exhausted(), false),
            Err(CwtError::ResourceExhausted(_))
        ));
        // Only allocation failures degrade
        assert!(matches!(
            plan_or_fallback(Err(CwtError::Fatal("bad plan".into())), true),
            Err(CwtError::Fatal(_))
        ));

        let plan = Arc::new(TransformPlan::unplanned(64, 1).unwrap());
        let kept = plan_or_fallback(Ok(Arc::clone(&plan)), true).unwrap().unwrap();
        assert!(Arc::ptr_eq(&plan, &kept));

        // A fallback run matches the plain unplanned transform
        let signal = chirp_like(64);
        let axis = ScaleAxis::generate(
            Distribution::LinearFrequencies,
            100.0,
            1.0,
            50.0,
            6,
            FrequencyOrder::Ascending,
        )
        .unwrap();
        let engine = CwtEngine::new(Wavelet::build(WaveletFamily::Morlet, 2.0).unwrap(), 1, false)
            .unwrap();
        let degraded = plan_or_fallback(exhausted(), true).unwrap();
        let a = engine.transform(signal.view(), &axis, degraded.as_deref()).unwrap();
        let b = cwt(&signal, &CwtOptions::new(1.0, 50.0, 100.0, 6)).unwrap();
        assert_eq!(a, b.scalogram);
    }

    #[test]
    fn test_single_sample_is_degenerate() {
        let signal = Array1::from_vec(vec![1.0]);
        let out = cwt(&signal, &CwtOptions::new(1.0, 10.0, 100.0, 5)).unwrap();
        assert_eq!(out.shape(), (1, 5));
        assert!(out.scalogram.iter().all(|c| c.re.is_finite() && c.im.is_finite()));
    }

    #[test]
    fn test_nan_passes_through() {
        let mut signal = chirp_like(128);
        signal[10] = f64::NAN;
        let out = cwt(&signal, &CwtOptions::new(1.0, 50.0, 100.0, 4)).unwrap();
        assert!(out.scalogram.iter().any(|c| c.re.is_nan() || c.im.is_nan()));
    }

    #[test]
    fn test_error_scenarios() {
        let signal = chirp_like(64);

        assert!(matches!(
            CwtOptions::new(1.0, 50.0, 100.0, 8).with_distribution_name("BOGUS"),
            Err(CwtError::InvalidArgument { .. })
        ));
        assert!(matches!(
            cwt(&signal, &CwtOptions::new(0.0, 50.0, 100.0, 8)),
            Err(CwtError::InvalidArgument { ref name, .. }) if name == "f0"
        ));
        assert!(matches!(
            cwt(&signal, &CwtOptions::new(1.0, 60.0, 100.0, 8)),
            Err(CwtError::InvalidArgument { ref name, .. }) if name == "f1"
        ));
        assert!(matches!(
            cwt(&signal, &CwtOptions::new(10.0, 5.0, 100.0, 8)),
            Err(CwtError::InvalidArgument { .. })
        ));
        assert!(matches!(
            cwt(&signal, &CwtOptions::new(1.0, 50.0, 100.0, 0)),
            Err(CwtError::InvalidArgument { ref name, .. }) if name == "fn"
        ));
        assert!(matches!(
            cwt(&Array1::zeros(0), &CwtOptions::new(1.0, 50.0, 100.0, 8)),
            Err(CwtError::InvalidArgument { ref name, .. }) if name == "signal"
        ));
        assert!(matches!(
            cwt(&signal, &CwtOptions::new(1.0, 50.0, 100.0, 8).with_bandwidth(-2.0)),
            Err(CwtError::InvalidArgument { ref name, .. }) if name == "bandwidth"
        ));
    }

    #[test]
    fn test_engine_rejects_mismatched_plan() {
        let wavelet = Wavelet::build(WaveletFamily::Morlet, 2.0).unwrap();
        let engine = CwtEngine::new(wavelet, 1, false).unwrap();
        let axis = ScaleAxis::generate(
            Distribution::LinearFrequencies,
            100.0,
            1.0,
            50.0,
            4,
            FrequencyOrder::Ascending,
        )
        .unwrap();
        let plan = TransformPlan::create(128, 1, Default::default()).unwrap();
        let signal = chirp_like(100);

        assert!(matches!(
            engine.transform(signal.view(), &axis, Some(&plan)),
            Err(CwtError::Fatal(_))
        ));
    }

    #[test]
    fn test_engine_session_reuse() {
        let wavelet = Wavelet::build(WaveletFamily::Morlet, 3.0).unwrap();
        let engine = CwtEngine::new(wavelet, 2, true).unwrap();
        assert_eq!(engine.threads(), 2);
        assert!(engine.normalizes());

        let axis = ScaleAxis::generate(
            Distribution::LogScales,
            100.0,
            2.0,
            40.0,
            16,
            FrequencyOrder::Native,
        )
        .unwrap();
        let plan = TransformPlan::create(256, 2, Default::default()).unwrap();
        for seed in 0..3 {
            let signal = Array1::from_shape_fn(256, |t| ((t + seed) as f64 * 0.2).sin());
            let m = engine.transform(signal.view(), &axis, Some(&plan)).unwrap();
            assert_eq!(m.dim(), (256, 16));
            let peak = m.iter().map(|c| c.norm()).fold(0.0, f64::max);
            assert_relative_eq!(peak, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_output_helpers() {
        let out = cwt(&sine(10.0, 100.0, 200, 1.0), &CwtOptions::new(5.0, 20.0, 100.0, 4)).unwrap();
        let mag = out.magnitude();
        let power = out.power();
        let db = out.to_db(1e-12);
        let phase = out.phase();
        assert_eq!(phase.dim(), (200, 4));
        assert_relative_eq!(power[[100, 1]], mag[[100, 1]] * mag[[100, 1]], epsilon = 1e-12);
        assert_relative_eq!(db[[100, 1]], 20.0 * (mag[[100, 1]] + 1e-12).log10(), epsilon = 1e-9);
    }
}
