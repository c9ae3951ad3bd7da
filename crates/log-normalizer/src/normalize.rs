//! CSV to Canonical Table Conversion
//!
//! Both recognized shapes funnel into the same accumulation grid: every
//! surviving row contributes `(seconds, column, sample)` triples, duplicate
//! cells average arithmetically, and gaps are closed by forward- then
//! backward-fill.

use std::collections::HashMap;
use std::io::Read;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::NormalizeError;
use crate::format::{LogFormat, LONG_MARKERS, WIDE_MARKER};
use crate::table::{CanonicalTable, Column};

/// Placeholder some loggers emit for a missing sample
const MISSING_PLACEHOLDER: &str = "-";

/// Normalize raw uploaded bytes into a canonical table.
///
/// Malformed rows are skipped, never fatal; only a header row that matches
/// neither shape rejects the upload.
pub fn normalize_csv(raw: &[u8]) -> Result<CanonicalTable, NormalizeError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(raw);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(NormalizeError::EmptyInput);
    }

    match LogFormat::detect(&headers) {
        Some(LogFormat::Long) => Ok(normalize_long(&mut reader, &headers)),
        Some(LogFormat::Wide) => Ok(normalize_wide(&mut reader, &headers)),
        None => Err(NormalizeError::UnrecognizedFormat { columns: headers }),
    }
}

/// Long shape: each row is one `(SECONDS, PID, VALUE)` sample, pivoted to
/// one column per distinct PID.
fn normalize_long<R: Read>(reader: &mut csv::Reader<R>, headers: &[String]) -> CanonicalTable {
    let sec_idx = headers.iter().position(|h| h == LONG_MARKERS[0]);
    let pid_idx = headers.iter().position(|h| h == LONG_MARKERS[1]);
    let val_idx = headers.iter().position(|h| h == LONG_MARKERS[2]);
    let (Some(sec_idx), Some(pid_idx), Some(val_idx)) = (sec_idx, pid_idx, val_idx) else {
        return CanonicalTable::default();
    };

    let expected = headers.len();
    let mut col_index: HashMap<String, usize> = HashMap::new();
    let mut col_names: Vec<String> = Vec::new();
    let mut samples: Vec<(f64, usize, Option<f64>)> = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let Ok(record) = record else {
            skipped += 1;
            continue;
        };
        if record.len() != expected {
            skipped += 1;
            continue;
        }
        let Some(sec) = record.get(sec_idx).and_then(parse_cell).map(canonical_key) else {
            skipped += 1;
            continue;
        };

        let pid = record.get(pid_idx).unwrap_or("");
        let col = match col_index.get(pid) {
            Some(&i) => i,
            None => {
                let i = col_names.len();
                col_index.insert(pid.to_string(), i);
                col_names.push(pid.to_string());
                i
            }
        };

        let value = record.get(val_idx).and_then(parse_cell);
        samples.push((sec, col, value));
    }

    build_table(samples, col_names, skipped, "long")
}

/// Wide shape: `time(ms)` is the row key, every other column is a sensor
/// series.
fn normalize_wide<R: Read>(reader: &mut csv::Reader<R>, headers: &[String]) -> CanonicalTable {
    let Some(time_idx) = headers.iter().position(|h| h == WIDE_MARKER) else {
        return CanonicalTable::default();
    };

    let sensor_fields: Vec<usize> = (0..headers.len()).filter(|&i| i != time_idx).collect();
    let col_names: Vec<String> = sensor_fields.iter().map(|&i| headers[i].clone()).collect();

    let expected = headers.len();
    let mut samples: Vec<(f64, usize, Option<f64>)> = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let Ok(record) = record else {
            skipped += 1;
            continue;
        };
        if record.len() != expected {
            skipped += 1;
            continue;
        }
        let Some(ms) = record.get(time_idx).and_then(parse_cell) else {
            skipped += 1;
            continue;
        };
        let sec = canonical_key(ms / 1000.0);

        for (col, &field) in sensor_fields.iter().enumerate() {
            samples.push((sec, col, record.get(field).and_then(parse_cell)));
        }
    }

    build_table(samples, col_names, skipped, "wide")
}

/// Running mean for one `(seconds, column)` cell
#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    sum: f64,
    count: u32,
}

impl Cell {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Merge samples into sorted unique row keys, average duplicate cells,
/// drop all-missing columns, and close the remaining gaps.
fn build_table(
    samples: Vec<(f64, usize, Option<f64>)>,
    col_names: Vec<String>,
    skipped: usize,
    shape: &str,
) -> CanonicalTable {
    let mut seconds: Vec<f64> = samples.iter().map(|s| s.0).collect();
    seconds.sort_by(f64::total_cmp);
    seconds.dedup();

    let n_rows = seconds.len();
    let mut cells: Vec<Vec<Cell>> = vec![vec![Cell::default(); n_rows]; col_names.len()];
    for (sec, col, value) in samples {
        let Ok(row) = seconds.binary_search_by(|s| s.total_cmp(&sec)) else {
            continue;
        };
        if let Some(v) = value {
            cells[col][row].add(v);
        }
    }

    let columns: Vec<Column> = col_names
        .into_iter()
        .zip(cells)
        .filter_map(|(name, col_cells)| {
            let means: Vec<Option<f64>> = col_cells.iter().map(Cell::mean).collect();
            fill_gaps(means).map(|values| Column { name, values })
        })
        .collect();

    debug!(
        "normalized {} shape log: {} rows x {} columns ({} rows skipped)",
        shape,
        n_rows,
        columns.len(),
        skipped
    );
    CanonicalTable::from_parts(seconds, columns)
}

/// Forward-fill, then backward-fill the leading gap. `None` when every
/// cell was missing.
fn fill_gaps(cells: Vec<Option<f64>>) -> Option<Vec<f64>> {
    let mut filled = cells;

    let mut last: Option<f64> = None;
    for cell in filled.iter_mut() {
        match *cell {
            Some(v) => last = Some(v),
            None => *cell = last,
        }
    }

    let mut next: Option<f64> = None;
    for cell in filled.iter_mut().rev() {
        match *cell {
            Some(v) => next = Some(v),
            None => *cell = next,
        }
    }

    filled.into_iter().collect()
}

/// Parse one cell to a float sample; the `-` placeholder and any
/// non-numeric token become a missing sample.
fn parse_cell(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() || field == MISSING_PLACEHOLDER {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Collapse -0.0 to 0.0 so sort and binary search agree on duplicate keys.
fn canonical_key(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}
