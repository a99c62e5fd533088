//! Chart artifact export: JSON for renderers, CSV for spreadsheets.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use super::{ChartSpec, TraceKind};
use crate::error::ExportError;

// ─── JSON ───────────────────────────────────────────────────────────

pub fn to_json(spec: &ChartSpec) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(spec)?)
}

pub fn write_chart_json(path: &Path, spec: &ChartSpec) -> Result<(), ExportError> {
    let json = to_json(spec)?;
    write(path, json.as_bytes())?;
    info!(path = %path.display(), title = %spec.title, "wrote chart JSON");
    Ok(())
}

// ─── CSV ────────────────────────────────────────────────────────────

/// One row per date, one column per trace (candlesticks get four).
///
/// Dates missing from a trace and undefined values are empty cells.
pub fn to_csv(spec: &ChartSpec) -> Result<String, ExportError> {
    let mut header = vec!["date".to_string()];
    for trace in &spec.traces {
        match trace.kind {
            TraceKind::Candlestick => {
                for part in ["open", "high", "low", "close"] {
                    header.push(format!("{}_{part}", trace.name));
                }
            }
            TraceKind::Line | TraceKind::Bar => header.push(trace.name.clone()),
        }
    }
    let width = header.len() - 1;

    let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
    let mut col = 0;
    for trace in &spec.traces {
        for p in &trace.points {
            let row = rows.entry(p.date).or_insert_with(|| vec![None; width]);
            match (trace.kind, p.ohlc) {
                (TraceKind::Candlestick, Some(o)) => {
                    row[col] = Some(o.open);
                    row[col + 1] = Some(o.high);
                    row[col + 2] = Some(o.low);
                    row[col + 3] = Some(o.close);
                }
                (TraceKind::Candlestick, None) => row[col + 3] = Some(p.value),
                _ => row[col] = Some(p.value),
            }
        }
        col += if trace.kind == TraceKind::Candlestick { 4 } else { 1 };
    }

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&header)?;
    for (date, values) in rows {
        let mut record = Vec::with_capacity(width + 1);
        record.push(date.to_string());
        record.extend(values.into_iter().map(|v| match v {
            Some(x) if x.is_finite() => x.to_string(),
            _ => String::new(),
        }));
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_chart_csv(path: &Path, spec: &ChartSpec) -> Result<(), ExportError> {
    let csv = to_csv(spec)?;
    write(path, csv.as_bytes())?;
    info!(path = %path.display(), title = %spec.title, "wrote chart CSV");
    Ok(())
}

fn write(path: &Path, contents: &[u8]) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}
