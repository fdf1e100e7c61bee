//! Stateless numerical routines shared by the analysis passes.
//!
//! Aggregates over empty sample slices yield NaN rather than an error, and
//! NaN produced by a zero denominator is propagated to callers unchanged.

/// Interface for any per-cycle sample group the aggregate routines read.
///
/// The grouping layer owns the concrete storage; analyses only need the four
/// measured channels as parallel slices.
pub trait CycleSamples {
    /// Cumulative discharge capacity per sample (Ah).
    fn discharge_capacity(&self) -> &[f64];
    /// Terminal voltage per sample (V).
    fn voltage(&self) -> &[f64];
    /// Temperature per sample (°C).
    fn temperature(&self) -> &[f64];
    /// Internal resistance per sample (Ω).
    fn internal_resistance(&self) -> &[f64];
}

// ── Aggregates ────────────────────────────────────────────────────────────────

/// Maximum of a sample slice, ignoring NaN entries. NaN when the slice is
/// empty or holds only NaN.
pub fn peak(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::max)
}

/// Index of the maximum finite value, or `None` when the slice is empty or
/// holds only NaN.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Arithmetic mean of a sample slice. NaN when the slice is empty.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ── Derived quantities ────────────────────────────────────────────────────────

/// Normalize a cumulative discharge-capacity series into state of charge.
///
/// Each sample is divided by the series peak, mapping a nonzero-peak cycle
/// onto `[0, 1]`. A zero peak produces NaN values, which are passed through
/// unguarded; skipping such points is the rendering surface's concern.
pub fn state_of_charge(capacity: &[f64]) -> Vec<f64> {
    let peak = peak(capacity);
    capacity.iter().map(|&c| c / peak).collect()
}

/// Percentage capacity loss relative to a reference peak capacity.
///
/// Zero at the reference cycle by construction, and non-negative everywhere
/// the reference is positive.
pub fn capacity_loss_percent(peak_capacity: f64, reference: f64) -> f64 {
    (peak_capacity - reference).abs() / reference * 100.0
}

/// Average per-cycle capacity loss since the reference cycle.
pub fn capacity_loss_rate(peak_capacity: f64, reference: f64, cycle: u32) -> f64 {
    (peak_capacity - reference).abs() / cycle as f64
}

// ── Polynomial fitting ────────────────────────────────────────────────────────

/// A least-squares polynomial fitted over a centered and scaled abscissa.
///
/// Centering and scaling keeps the normal equations well conditioned for
/// cycle indices in the hundreds; evaluation is transparent to callers.
#[derive(Debug, Clone)]
pub struct PolyFit {
    /// Coefficients in ascending powers of the scaled abscissa.
    coeffs: Vec<f64>,
    x_offset: f64,
    x_scale: f64,
}

impl PolyFit {
    /// Fit a polynomial of `degree` to `(xs, ys)` by least squares.
    ///
    /// The effective degree is clamped to one less than the number of points
    /// so that short sequences still fit exactly. Returns `None` when the
    /// inputs are empty, of unequal length, contain non-finite values, or the
    /// normal equations are singular.
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Option<PolyFit> {
        if xs.is_empty() || xs.len() != ys.len() {
            return None;
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return None;
        }

        let degree = degree.min(xs.len() - 1);
        let n_coeffs = degree + 1;

        let x_offset = mean(xs);
        let x_scale = xs
            .iter()
            .map(|x| (x - x_offset).abs())
            .fold(0.0, f64::max)
            .max(1.0);
        let scaled: Vec<f64> = xs.iter().map(|x| (x - x_offset) / x_scale).collect();

        // Power sums for the normal equations A c = b with
        // A[i][j] = Σ x^(i+j), b[i] = Σ x^i y.
        let mut power_sums = vec![0.0; 2 * degree + 1];
        let mut moment_sums = vec![0.0; n_coeffs];
        for (&x, &y) in scaled.iter().zip(ys) {
            let mut xp = 1.0;
            for (k, sum) in power_sums.iter_mut().enumerate() {
                *sum += xp;
                if k < n_coeffs {
                    moment_sums[k] += xp * y;
                }
                xp *= x;
            }
        }

        let matrix: Vec<Vec<f64>> = (0..n_coeffs)
            .map(|i| (0..n_coeffs).map(|j| power_sums[i + j]).collect())
            .collect();

        let coeffs = solve_linear_system(matrix, moment_sums)?;
        Some(PolyFit {
            coeffs,
            x_offset,
            x_scale,
        })
    }

    /// Evaluate the fitted polynomial at `x` (Horner's method).
    pub fn eval(&self, x: f64) -> f64 {
        let t = (x - self.x_offset) / self.x_scale;
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }

    /// Evaluate the fit at each abscissa in `xs`.
    pub fn predict(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when a pivot is effectively zero (singular system).
fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for k in (row + 1)..n {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }
    Some(x)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
