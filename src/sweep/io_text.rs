//! Delimited text sweep reader.
//!
//! # Format Reference
//!
//! Acquisition logs are plain text:
//! - Header lines start with `#`. The last header line carries the column
//!   titles, tab-separated (whitespace-separated if no tab is present).
//! - Data lines hold one number per column, separated by tabs or spaces.
//!   `nan` and `inf` are accepted; blank lines are ignored.
//! - Header lines tagged `#comment:=` or `#com ...:=` are user comments;
//!   every other header line is configuration passed through verbatim.
//! - The third-from-last header line holds the sweep options, e.g.
//!   `#sweep_multi_options:= {'beforewait': [0.02, 0.5], ...}`, from which
//!   settle times and a declared secondary-axis range are read.
//!
//! # 2D Sweeps
//!
//! A 2D sweep is written row by row: the first column (X) stays constant
//! while the second column (Y) runs through its values, then X steps. The
//! reader recovers the inner sweep length from the first run of equal X
//! values and reshapes every column into a `(x count, y count)` plane.
//!
//! # Reading Strategies
//!
//! Two strategies are tried in order, and the first to succeed wins:
//! 1. [`ReadStrategy::MultiSweepForced`] reshapes 2D data, padding an
//!    aborted final row with NaN.
//! 2. [`ReadStrategy::MultiSweepDisabled`] reads plain 1D columns.

use std::path::Path;

use log::{debug, warn};
use ndarray::{Array1, Array2};

use super::build::{build_1d, build_2d, detect_axis_indices};
use super::model::{Dataset, Metadata};
use crate::error::SweepError;

const COMMENT_TAGS: [&str; 2] = ["#comment:=", "#com ...:="];
const BEFORE_WAIT_MARKER: &str = "beforewait': [";

/// Reads a dataset from a text sweep file.
///
/// # Errors
/// Returns [`SweepError::UnreadableSweepFile`] if neither reading strategy
/// can make sense of the file.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use sweepnorm::sweep::io_text::read_sweep_txt;
///
/// let dataset = read_sweep_txt(Path::new("sweep.txt"))?;
/// println!("{} channels", dataset.out_channels.len());
/// # Ok::<(), sweepnorm::SweepError>(())
/// ```
pub fn read_sweep_txt(path: &Path) -> Result<Dataset, SweepError> {
    let bytes = std::fs::read(path).map_err(SweepError::Io)?;
    decode(&String::from_utf8_lossy(&bytes), path)
}

/// Reads a dataset from a text sweep string.
///
/// Useful for testing without file I/O.
pub fn from_sweep_txt_str(text: &str) -> Result<Dataset, SweepError> {
    decode(text, Path::new("<string>"))
}

/// Reads a dataset from text sweep bytes.
///
/// Useful for fuzzing; invalid UTF-8 is replaced rather than rejected.
pub fn from_sweep_txt_slice(bytes: &[u8]) -> Result<Dataset, SweepError> {
    decode(&String::from_utf8_lossy(bytes), Path::new("<bytes>"))
}

/// How the numeric table is turned into sweep columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Detect 2D block structure; pad an incomplete last block with NaN.
    MultiSweepForced,
    /// Treat every column as a plain 1D sequence.
    MultiSweepDisabled,
}

/// Columns recovered by a strategy, before dataset reconstruction.
enum RawSweep {
    Lines(Vec<(String, Array1<f64>)>),
    Planes(Vec<(String, Array2<f64>)>),
}

/// The parsed text file: header lines, column titles and numeric rows.
struct RawTable {
    headers: Vec<String>,
    titles: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl ReadStrategy {
    /// Parses and reconstructs the sweep; any failure belongs to this strategy.
    fn read(self, text: &str) -> Result<(Vec<String>, Dataset), String> {
        let table = parse_table(text)?;
        let sweep = match self {
            ReadStrategy::MultiSweepForced => reshape_multi_sweep(&table)?,
            ReadStrategy::MultiSweepDisabled => RawSweep::Lines(lines(&table)),
        };

        let dataset = match sweep {
            RawSweep::Lines(columns) => {
                let mut columns = columns.into_iter();
                let x = columns.next().ok_or("no columns")?;
                build_1d(x, columns.collect())
            }
            RawSweep::Planes(columns) => {
                let titles: Vec<&str> = columns.iter().map(|(t, _)| t.as_str()).collect();
                let axes = detect_axis_indices(&titles);
                let declared_y = declared_y_range(sweep_options_line(&table.headers));
                build_2d(columns, axes, declared_y)
                    .ok_or("2D sweep without both swept columns")?
            }
        };
        Ok((table.headers, dataset))
    }
}

fn decode(text: &str, path: &Path) -> Result<Dataset, SweepError> {
    let (headers, mut dataset) = match ReadStrategy::MultiSweepForced.read(text) {
        Ok(read) => read,
        Err(forced) => {
            debug!("{}: multi-sweep read failed ({forced}), retrying as plain columns", path.display());
            match ReadStrategy::MultiSweepDisabled.read(text) {
                Ok(read) => read,
                Err(plain) => {
                    return Err(SweepError::UnreadableSweepFile {
                        path: path.to_path_buf(),
                        forced,
                        plain,
                    })
                }
            }
        }
    };

    let options = sweep_options_line(&headers);
    dataset.before_wait = parse_before_wait(options);
    if !dataset.before_wait.is_known() {
        debug!("{}: settle times unknown", path.display());
    }
    let (config_lines, comment_lines) = split_headers(&headers);
    dataset.config_lines = config_lines;
    dataset.comment_lines = comment_lines;

    debug!(
        "{}: decoded {} sweep with {} channels",
        path.display(),
        dataset.sweep_dim,
        dataset.out_channels.len()
    );
    Ok(dataset)
}

// ============================================================================
// Table parsing
// ============================================================================

fn parse_table(text: &str) -> Result<RawTable, String> {
    let mut headers = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.starts_with('#') {
            if rows.is_empty() {
                headers.push(line.to_string());
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(parse_number)
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| format!("line {}: not a numeric row", line_no + 1))?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(format!(
                    "line {}: expected {} values, found {}",
                    line_no + 1,
                    first.len(),
                    row.len()
                ));
            }
        }
        rows.push(row);
    }

    let title_line = headers.last().ok_or("missing column title line")?;
    let titles = split_titles(title_line);
    let columns = rows.first().ok_or("no data rows")?.len();
    if titles.len() != columns {
        return Err(format!(
            "{} column titles for {} data columns",
            titles.len(),
            columns
        ));
    }

    Ok(RawTable {
        headers,
        titles,
        rows,
    })
}

fn split_titles(line: &str) -> Vec<String> {
    let body = line.trim_start_matches('#').trim_end();
    if body.contains('\t') {
        body.split('\t').map(|t| t.trim().to_string()).collect()
    } else {
        body.split_whitespace().map(str::to_string).collect()
    }
}

fn parse_number(token: &str) -> Option<f64> {
    let unsigned = token.trim_start_matches(['+', '-']);
    if unsigned.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    token.parse().ok()
}

fn lines(table: &RawTable) -> Vec<(String, Array1<f64>)> {
    table
        .titles
        .iter()
        .enumerate()
        .map(|(c, title)| {
            let column: Array1<f64> = table.rows.iter().map(|row| row[c]).collect();
            (title.clone(), column)
        })
        .collect()
}

/// Reshapes the table into planes when the first column shows 2D blocks.
fn reshape_multi_sweep(table: &RawTable) -> Result<RawSweep, String> {
    let first = table.rows[0][0];
    let inner = table
        .rows
        .iter()
        .take_while(|row| same_value(row[0], first))
        .count();
    if inner < 2 {
        return Ok(RawSweep::Lines(lines(table)));
    }
    if table.titles.len() < 2 {
        return Err("multi-sweep data needs at least two columns".to_string());
    }

    for (block_no, block) in table.rows.chunks(inner).enumerate() {
        let x = block[0][0];
        if let Some(offset) = block.iter().position(|row| !same_value(row[0], x)) {
            return Err(format!(
                "row {}: swept value changes inside a block of {}",
                block_no * inner + offset + 1,
                inner
            ));
        }
    }

    let outer = table.rows.len().div_ceil(inner);
    if outer * inner != table.rows.len() {
        warn!(
            "incomplete sweep: {} of {} points recorded, padding with NaN",
            table.rows.len(),
            outer * inner
        );
    }

    let planes = table
        .titles
        .iter()
        .enumerate()
        .map(|(c, title)| {
            let plane = Array2::from_shape_fn((outer, inner), |(i, j)| {
                table
                    .rows
                    .get(i * inner + j)
                    .map_or(f64::NAN, |row| row[c])
            });
            (title.clone(), plane)
        })
        .collect();
    Ok(RawSweep::Planes(planes))
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

// ============================================================================
// Header metadata
// ============================================================================

fn sweep_options_line(headers: &[String]) -> Option<&str> {
    headers
        .len()
        .checked_sub(3)
        .map(|i| headers[i].as_str())
}

/// Splits header lines into configuration and user comments.
fn split_headers(headers: &[String]) -> (Vec<String>, Vec<String>) {
    let mut config = Vec::new();
    let mut comments = Vec::new();
    for line in headers {
        match COMMENT_TAGS.iter().find_map(|tag| line.strip_prefix(tag)) {
            Some(comment) => comments.push(comment.to_string()),
            None => config.push(line.clone()),
        }
    }
    (config, comments)
}

/// Settle times from `... 'beforewait': [0.02, 0.5] ...`.
fn parse_before_wait(line: Option<&str>) -> Metadata<Vec<f64>> {
    let parsed = line
        .and_then(|l| l.split(BEFORE_WAIT_MARKER).nth(1))
        .and_then(|rest| rest.split(']').next())
        .and_then(|list| {
            list.split(',')
                .map(|v| v.trim().parse::<f64>().ok())
                .collect::<Option<Vec<f64>>>()
        });
    if parsed.is_none() && line.is_some_and(|l| l.contains("beforewait")) {
        warn!("malformed settle time list in sweep options, treating as unknown");
    }
    parsed.into()
}

/// Declared `(start, stop)` of the secondary axis.
///
/// Only lines mentioning `sweep` are considered. Fragments between commas
/// that mention `start` or `stop` contribute their last token.
fn declared_y_range(line: Option<&str>) -> Option<(f64, f64)> {
    let line = line.filter(|l| l.contains("sweep"))?;

    let mut start = None;
    let mut stop = None;
    for fragment in line.split(',') {
        let value = fragment
            .split_whitespace()
            .last()
            .map(|t| t.trim_matches(|c: char| matches!(c, '{' | '}' | '[' | ']' | '\'' | '"' | ';')))
            .and_then(|t| t.parse::<f64>().ok());
        if fragment.contains("start") {
            start = value;
        } else if fragment.contains("stop") {
            stop = value;
        }
    }

    match (start, stop) {
        (Some(start), Some(stop)) => Some((start, stop)),
        (None, None) => None,
        _ => {
            warn!("incomplete secondary axis range in sweep options, reading it from data");
            None
        }
    }
}

/// Fuzz-only entrypoint for sweep option line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_sweep_options(line: &str) -> (Option<Vec<f64>>, Option<(f64, f64)>) {
    let before_wait = match parse_before_wait(Some(line)) {
        Metadata::Known(v) => Some(v),
        Metadata::Unknown => None,
    };
    (before_wait, declared_y_range(Some(line)))
}
