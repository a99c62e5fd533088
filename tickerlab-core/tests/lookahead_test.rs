//! Look-ahead contamination tests for every indicator.
//!
//! No indicator value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs; any
//! difference means the indicator is leaking future data into past values.

use chrono::NaiveDate;
use tickerlab_core::domain::Bar;
use tickerlab_core::indicators::*;

/// N bars of deterministic OHLCV data with realistic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        // LCG walk
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price = (price + change).max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        let high = open.max(close) + 2.0;
        let low = open.min(close) - 2.0;

        bars.push(Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            adj_close: close * 0.98,
            volume: 1000 + (i as u64 * 100),
        });
    }

    bars
}

fn assert_no_lookahead(indicator: &dyn Indicator, full_bars: &[Bar], truncated_len: usize) {
    let truncated = &full_bars[..truncated_len];
    let full_result = indicator.compute(full_bars).unwrap();
    let truncated_result = indicator.compute(truncated).unwrap();

    assert_eq!(
        truncated_result.len(),
        truncated_len,
        "{}: truncated result length mismatch",
        indicator.name()
    );
    assert_eq!(
        full_result.len(),
        full_bars.len(),
        "{}: full result length mismatch",
        indicator.name()
    );

    for i in 0..truncated_len {
        let t = truncated_result[i];
        let f = full_result[i];

        if t.is_nan() && f.is_nan() {
            continue;
        }

        assert!(
            !t.is_nan() && !f.is_nan(),
            "{}: NaN mismatch at bar {i} (truncated={t}, full={f})",
            indicator.name()
        );
        assert!(
            (t - f).abs() < 1e-10,
            "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}",
            indicator.name()
        );
    }
}

/// Every value from `lookback()` onward is defined on clean input.
fn assert_warmup_matches_lookback(indicator: &dyn Indicator, bars: &[Bar]) {
    let values = indicator.compute(bars).unwrap();
    let lookback = indicator.lookback();
    for (i, v) in values.iter().enumerate().skip(lookback) {
        assert!(
            v.is_finite(),
            "{}: undefined at bar {i} past lookback {lookback}",
            indicator.name()
        );
    }
}

fn all_indicators() -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Sma::new(10).unwrap()),
        Box::new(Sma::new(20).unwrap().on(PriceField::Close)),
        Box::new(Ema::new(10).unwrap()),
        Box::new(Ema::new(20).unwrap()),
        Box::new(Rsi::new(14).unwrap()),
        Box::new(Rsi::new(7).unwrap()),
        Box::new(Macd::new(12, 26, 9).unwrap()),
        Box::new(Macd::new(12, 26, 9).unwrap().component(MacdComponent::Signal)),
        Box::new(Macd::new(12, 26, 9).unwrap().component(MacdComponent::Histogram)),
        Box::new(Bollinger::upper(20, 2.0).unwrap()),
        Box::new(Bollinger::middle(20, 2.0).unwrap()),
        Box::new(Bollinger::lower(20, 2.0).unwrap()),
        Box::new(ParabolicSar::default()),
        Box::new(ParabolicSar::new(0.01, 0.1).unwrap()),
    ]
}

#[test]
fn no_indicator_reads_future_bars() {
    let bars = make_test_bars(200);
    for indicator in all_indicators() {
        assert_no_lookahead(indicator.as_ref(), &bars, 100);
    }
}

#[test]
fn warmup_never_exceeds_declared_lookback() {
    let bars = make_test_bars(200);
    for indicator in all_indicators() {
        assert_warmup_matches_lookback(indicator.as_ref(), &bars);
    }
}

#[test]
fn indicator_names_are_unique() {
    let names: Vec<String> = all_indicators()
        .iter()
        .map(|i| i.name().to_string())
        .collect();
    let mut deduped = names.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), names.len(), "duplicate names in {names:?}");
}

#[test]
fn frame_collects_every_indicator() {
    let bars = make_test_bars(60);
    let series = tickerlab_core::domain::BarSeries::new("TEST", bars).unwrap();
    let mut frame = IndicatorFrame::new(&series);
    for indicator in all_indicators() {
        frame.attach(&series, indicator.as_ref()).unwrap();
    }
    // len() counts columns; the bar count lives in dates()
    assert_eq!(frame.dates().len(), 60);
    assert_eq!(frame.len(), all_indicators().len());
    assert_eq!(frame.names().count(), all_indicators().len());
    assert!(frame.latest("psar_0.02_0.2").is_some());
}
