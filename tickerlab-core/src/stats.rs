//! Return series and market-relative statistics (beta, alpha).
//!
//! Beta is the OLS slope (with intercept) of the stock's daily returns on the
//! benchmark's daily returns, over the dates both series share. Alpha compares
//! first-to-last simple returns using that beta.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::BarSeries;
use crate::error::AnalysisError;

/// `r[t] = (p[t] - p[t-1]) / p[t-1]`, with `NaN` at index 0.
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; prices.len()];
    for i in 1..prices.len() {
        result[i] = (prices[i] - prices[i - 1]) / prices[i - 1];
    }
    result
}

/// Compounded return to date: `prod(1 + r) - 1`, skipping undefined returns.
///
/// Positions whose own return is `NaN` stay `NaN`.
pub fn cumulative_returns(daily: &[f64]) -> Vec<f64> {
    let mut growth = 1.0;
    daily
        .iter()
        .map(|&r| {
            if r.is_nan() {
                f64::NAN
            } else {
                growth *= 1.0 + r;
                growth - 1.0
            }
        })
        .collect()
}

/// First-to-last simple return: `(last - first) / first`.
pub fn simple_return(prices: &[f64]) -> Result<f64, AnalysisError> {
    let (first, last) = match (prices.first(), prices.last()) {
        (Some(&f), Some(&l)) => (f, l),
        _ => return Err(AnalysisError::invalid("simple return of an empty series")),
    };
    if first == 0.0 {
        return Err(AnalysisError::invalid("simple return from a zero starting price"));
    }
    Ok((last - first) / first)
}

/// Fitted `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub observations: usize,
}

/// Ordinary least squares of `y` on `x` with an intercept.
pub fn ols(x: &[f64], y: &[f64]) -> Result<Regression, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::invalid(format!(
            "regression inputs differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(AnalysisError::invalid(format!(
            "regression needs at least 2 observations, got {n}"
        )));
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        sxy += (xi - mean_x) * (yi - mean_y);
        sxx += (xi - mean_x).powi(2);
    }
    if sxx == 0.0 {
        return Err(AnalysisError::invalid("regressor has zero variance"));
    }

    let slope = sxy / sxx;
    Ok(Regression {
        slope,
        intercept: mean_y - slope * mean_x,
        observations: n,
    })
}

/// Daily adjusted-close returns of both series on the dates they share,
/// dropping any day where either return is undefined.
pub fn aligned_returns(
    stock: &BarSeries,
    index: &BarSeries,
) -> Result<(Vec<f64>, Vec<f64>), AnalysisError> {
    let dated = |s: &BarSeries| -> Vec<(NaiveDate, f64)> {
        s.dates()
            .into_iter()
            .zip(daily_returns(&s.adj_closes()))
            .skip(1)
            .filter(|(_, r)| r.is_finite())
            .collect()
    };

    let index_by_date: HashMap<NaiveDate, f64> = dated(index).into_iter().collect();
    let (stock_r, index_r): (Vec<f64>, Vec<f64>) = dated(stock)
        .into_iter()
        .filter_map(|(d, r)| index_by_date.get(&d).map(|&m| (r, m)))
        .unzip();

    if stock_r.len() < 2 {
        return Err(AnalysisError::InsufficientOverlap(
            stock.symbol().to_string(),
            index.symbol().to_string(),
        ));
    }
    Ok((stock_r, index_r))
}

/// Beta of `stock` against `index`, rounded to two decimals.
pub fn beta(stock: &BarSeries, index: &BarSeries) -> Result<f64, AnalysisError> {
    let (stock_r, index_r) = aligned_returns(stock, index)?;
    let fit = ols(&index_r, &stock_r)?;
    Ok(round2(fit.slope))
}

/// Jensen-style alpha from simple period returns:
/// `r_stock - (risk_free + beta * (r_index - risk_free))`.
pub fn alpha(
    stock: &BarSeries,
    index: &BarSeries,
    risk_free_rate: f64,
) -> Result<f64, AnalysisError> {
    let beta = beta(stock, index)?;
    let r_stock = simple_return(&stock.adj_closes())?;
    let r_index = simple_return(&index.adj_closes())?;
    Ok(r_stock - (risk_free_rate + beta * (r_index - risk_free_rate)))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn series_from_returns(symbol: &str, returns: &[f64], skip_day: Option<usize>) -> BarSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut price = 100.0;
        let mut bars = vec![];
        for i in 0..=returns.len() {
            if i > 0 {
                price *= 1.0 + returns[i - 1];
            }
            if Some(i) == skip_day {
                continue;
            }
            bars.push(Bar {
                date: base + chrono::Duration::days(i as i64),
                open: price,
                high: price,
                low: price,
                close: price,
                adj_close: price,
                volume: 0,
            });
        }
        BarSeries::new(symbol, bars).unwrap()
    }

    const MARKET: [f64; 6] = [0.01, 0.02, -0.01, 0.03, -0.02, 0.015];

    #[test]
    fn daily_and_cumulative_returns() {
        let r = daily_returns(&[100.0, 110.0, 99.0]);
        assert!(r[0].is_nan());
        assert_approx(r[1], 0.1, DEFAULT_EPSILON);
        assert_approx(r[2], -0.1, DEFAULT_EPSILON);

        let c = cumulative_returns(&r);
        assert!(c[0].is_nan());
        assert_approx(c[1], 0.1, DEFAULT_EPSILON);
        assert_approx(c[2], -0.01, DEFAULT_EPSILON);
    }

    #[test]
    fn ols_recovers_line() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0];
        let fit = ols(&x, &y).unwrap();
        assert_approx(fit.slope, 2.0, DEFAULT_EPSILON);
        assert_approx(fit.intercept, 1.0, DEFAULT_EPSILON);
        assert_eq!(fit.observations, 4);
    }

    #[test]
    fn ols_rejects_degenerate_input() {
        assert!(ols(&[1.0], &[1.0]).is_err());
        assert!(ols(&[1.0, 1.0], &[1.0, 2.0]).is_err());
        assert!(ols(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn beta_of_leveraged_series() {
        let stock: Vec<f64> = MARKET.iter().map(|r| 2.0 * r + 0.001).collect();
        let index = series_from_returns("^GSPC", &MARKET, None);
        let stock = series_from_returns("LEV", &stock, None);
        assert_eq!(beta(&stock, &index).unwrap(), 2.0);
        assert_eq!(beta(&index, &index).unwrap(), 1.0);
    }

    #[test]
    fn beta_aligns_by_date() {
        // Stock has no bar on day 3: the market's day-3 return has no partner.
        let index = series_from_returns("^GSPC", &MARKET, None);
        let stock = series_from_returns("GAP", &MARKET, Some(3));
        let (s, m) = aligned_returns(&stock, &index).unwrap();
        assert_eq!(s.len(), 5);
        assert_eq!(m.len(), 5);
        assert_approx(s[0], m[0], 1e-12);
    }

    #[test]
    fn beta_needs_overlap() {
        let index = series_from_returns("^GSPC", &MARKET, None);
        let short = series_from_returns("NEW", &[0.01], None);
        assert_eq!(
            beta(&short, &index),
            Err(AnalysisError::InsufficientOverlap(
                "NEW".to_string(),
                "^GSPC".to_string()
            ))
        );
    }

    #[test]
    fn alpha_matches_formula() {
        let stock_r: Vec<f64> = MARKET.iter().map(|r| 2.0 * r + 0.001).collect();
        let index = series_from_returns("^GSPC", &MARKET, None);
        let stock = series_from_returns("LEV", &stock_r, None);

        let r_s = simple_return(&stock.adj_closes()).unwrap();
        let r_m = simple_return(&index.adj_closes()).unwrap();
        let expected = r_s - (0.05 + 2.0 * (r_m - 0.05));
        assert_approx(alpha(&stock, &index, 0.05).unwrap(), expected, 1e-12);
    }

    #[test]
    fn simple_return_edge_cases() {
        assert!(simple_return(&[]).is_err());
        assert!(simple_return(&[0.0, 1.0]).is_err());
        assert_approx(simple_return(&[50.0, 75.0]).unwrap(), 0.5, DEFAULT_EPSILON);
    }
}
