//! Window and exponentially-weighted helpers over plain `f64` slices.
//!
//! Output is always the same length as the input, with `NaN` wherever the
//! window does not hold enough observations yet.

/// Rolling mean over `window` values, requiring at least `min_periods`
/// non-NaN observations in the window. NaN observations are skipped.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if window == 0 {
        return result;
    }
    let min_periods = min_periods.max(1);

    for (i, out) in result.iter_mut().enumerate() {
        let start = (i + 1).saturating_sub(window);
        let (sum, count) = values[start..=i]
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0usize), |(s, c), &v| (s + v, c + 1));
        if count >= min_periods {
            *out = sum / count as f64;
        }
    }
    result
}

/// Rolling sample standard deviation (divide by `n - 1`) over a full window.
///
/// Any NaN inside the window yields NaN; windows with fewer than two values
/// yield NaN.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if window < 2 || values.len() < window {
        return result;
    }

    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = slice.iter().sum::<f64>() / window as f64;
        let var = slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        result[i] = var.sqrt();
    }
    result
}

/// Smoothing factor for a span: `2 / (span + 1)`.
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Recursive EMA seeded with the first value:
/// `e[0] = x[0]`, `e[t] = alpha * x[t] + (1 - alpha) * e[t-1]`.
///
/// A NaN input poisons every later value.
pub fn ewm_recursive(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = span_alpha(span);
    let mut result = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        result.push(next);
        prev = Some(next);
    }
    result
}

/// Bias-adjusted exponentially weighted mean.
///
/// `y[t] = sum((1-alpha)^k * x[t-k]) / sum((1-alpha)^k)` over the valid
/// observations seen so far. Leading NaNs are skipped, interior NaNs carry
/// the previous mean forward while the weights keep decaying. Values are
/// NaN until `min_periods` valid observations have been seen.
pub fn ewm_adjusted(values: &[f64], span: usize, min_periods: usize) -> Vec<f64> {
    let decay = 1.0 - span_alpha(span);
    let mut result = vec![f64::NAN; values.len()];
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    let mut seen = 0usize;

    for (i, &v) in values.iter().enumerate() {
        if seen > 0 {
            numerator *= decay;
            denominator *= decay;
        }
        if !v.is_nan() {
            numerator += v;
            denominator += 1.0;
            seen += 1;
        }
        if seen > 0 && seen >= min_periods {
            result[i] = numerator / denominator;
        }
    }
    result
}

/// First difference: `d[0] = NaN`, `d[t] = x[t] - x[t-1]`.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        result[i] = values[i] - values[i - 1];
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn rolling_mean_full_window() {
        let r = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3, 3);
        assert!(r[0].is_nan() && r[1].is_nan());
        assert_approx(r[2], 2.0, DEFAULT_EPSILON);
        assert_approx(r[3], 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_mean_partial_windows() {
        let r = rolling_mean(&[2.0, 4.0, 6.0], 2, 1);
        assert_approx(r[0], 2.0, DEFAULT_EPSILON);
        assert_approx(r[1], 3.0, DEFAULT_EPSILON);
        assert_approx(r[2], 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_mean_nan_blocks_full_window() {
        let r = rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2, 2);
        assert!(r[1].is_nan());
        assert!(r[2].is_nan());
        assert_approx(r[3], 3.5, DEFAULT_EPSILON);
    }

    #[test]
    fn rolling_std_is_sample_std() {
        // 2, 4, 4, 4, 5, 5, 7, 9: sample std over all 8 = sqrt(32/7)
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let r = rolling_std(&values, 8);
        assert!(r[6].is_nan());
        assert_approx(r[7], (32.0_f64 / 7.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn ewm_recursive_known_values() {
        // span 3 -> alpha 0.5
        let r = ewm_recursive(&[10.0, 12.0, 14.0], 3);
        assert_approx(r[0], 10.0, DEFAULT_EPSILON);
        assert_approx(r[1], 11.0, DEFAULT_EPSILON);
        assert_approx(r[2], 12.5, DEFAULT_EPSILON);
    }

    #[test]
    fn ewm_adjusted_known_values() {
        // span 3 -> decay 0.5
        // y1 = (12 + 0.5*10) / 1.5 = 11.333..
        // y2 = (14 + 0.5*12 + 0.25*10) / 1.75 = 12.857..
        let r = ewm_adjusted(&[10.0, 12.0, 14.0], 3, 1);
        assert_approx(r[0], 10.0, DEFAULT_EPSILON);
        assert_approx(r[1], 17.0 / 1.5, DEFAULT_EPSILON);
        assert_approx(r[2], 22.5 / 1.75, DEFAULT_EPSILON);
    }

    #[test]
    fn ewm_adjusted_min_periods_and_leading_nan() {
        let r = ewm_adjusted(&[f64::NAN, 10.0, 12.0, 14.0], 3, 2);
        assert!(r[0].is_nan());
        assert!(r[1].is_nan());
        assert_approx(r[2], 17.0 / 1.5, DEFAULT_EPSILON);
        assert_approx(r[3], 22.5 / 1.75, DEFAULT_EPSILON);
    }

    #[test]
    fn ewm_adjusted_interior_nan_holds_value() {
        let r = ewm_adjusted(&[10.0, f64::NAN, 12.0], 3, 1);
        assert_approx(r[1], 10.0, DEFAULT_EPSILON);
        // weights: 12 -> 1, 10 -> 0.25
        assert_approx(r[2], (12.0 + 2.5) / 1.25, DEFAULT_EPSILON);
    }

    #[test]
    fn diff_first_is_nan() {
        let d = diff(&[1.0, 3.0, 2.0]);
        assert!(d[0].is_nan());
        assert_eq!(&d[1..], &[2.0, -1.0]);
    }
}
