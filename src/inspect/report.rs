//! Inspect report types and text formatting.

use serde::Serialize;
use std::fmt;

use crate::sweep::Extent;

/// Summary of one loaded sweep file.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    pub file: FileSection,
    pub sweep: SweepSection,
    pub axes: Vec<AxisSummary>,
    /// Padded plot bounds; absent for 1D sweeps or unknown ranges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
    pub channels: Vec<ChannelSummary>,
    pub header: HeaderSection,
}

/// Where the data came from.
#[derive(Clone, Debug, Serialize)]
pub struct FileSection {
    pub name: String,
    pub format: String,
    pub size_bytes: u64,
    pub content_hash: String,
}

/// Shape of the sweep as a whole.
#[derive(Clone, Debug, Serialize)]
pub struct SweepSection {
    /// `1D` or `2D`.
    pub dimension: String,
    pub alternate_scan: bool,
    /// Settle times before each step, when the header declares them.
    pub before_wait: Option<Vec<f64>>,
    /// Wall-clock duration in seconds.
    pub duration_secs: Option<f64>,
    /// Wall-clock duration, human readable.
    pub duration: Option<String>,
}

/// One swept axis. Unknown range components serialize as `null`.
#[derive(Clone, Debug, Serialize)]
pub struct AxisSummary {
    pub role: &'static str,
    pub title: String,
    pub start: f64,
    pub stop: f64,
    pub count: usize,
    pub step: f64,
}

/// One channel with its shape and NaN-ignoring value bounds.
#[derive(Clone, Debug, Serialize)]
pub struct ChannelSummary {
    pub title: String,
    pub shape: Vec<usize>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub computed: bool,
}

/// Header line counts and user comments.
#[derive(Clone, Debug, Default, Serialize)]
pub struct HeaderSection {
    pub config_lines: usize,
    pub comments: Vec<String>,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File:       {} ({})", self.file.name, self.file.format)?;
        writeln!(f, "Size:       {} bytes", self.file.size_bytes)?;
        writeln!(f, "SHA-256:    {}", self.file.content_hash)?;
        writeln!(f)?;

        writeln!(
            f,
            "Sweep:      {}{}",
            self.sweep.dimension,
            if self.sweep.alternate_scan {
                " (alternating scan)"
            } else {
                ""
            }
        )?;
        match &self.sweep.duration {
            Some(duration) => writeln!(f, "Duration:   {duration}")?,
            None => writeln!(f, "Duration:   unknown")?,
        }
        match &self.sweep.before_wait {
            Some(waits) => writeln!(f, "Settle:     {}", join_numbers(waits))?,
            None => writeln!(f, "Settle:     unknown")?,
        }

        writeln!(f)?;
        writeln!(f, "Axes:")?;
        for axis in &self.axes {
            writeln!(
                f,
                "  {}: {:<16} {} .. {} ({} points, step {})",
                axis.role,
                axis.title,
                fmt_value(axis.start),
                fmt_value(axis.stop),
                axis.count,
                fmt_value(axis.step)
            )?;
        }
        if let Some(extent) = &self.extent {
            writeln!(
                f,
                "  extent: x [{}, {}], y [{}, {}]",
                fmt_value(extent.x_min),
                fmt_value(extent.x_max),
                fmt_value(extent.y_min),
                fmt_value(extent.y_max)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Channels ({}):", self.channels.len())?;
        for channel in &self.channels {
            let bounds = match (channel.min, channel.max) {
                (Some(min), Some(max)) => format!("{} .. {}", fmt_value(min), fmt_value(max)),
                _ => "all NaN".to_string(),
            };
            writeln!(
                f,
                "  - {:<20} {:<10} {}{}",
                channel.title,
                format!("{:?}", channel.shape),
                bounds,
                if channel.computed { "  [computed]" } else { "" }
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Header:     {} config line(s)", self.header.config_lines)?;
        if self.header.comments.is_empty() {
            writeln!(f, "Comments:   (none)")?;
        } else {
            writeln!(f, "Comments:")?;
            for comment in &self.header.comments {
                writeln!(f, "  - {comment}")?;
            }
        }
        Ok(())
    }
}

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "?".to_string()
    } else {
        format!("{v}")
    }
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| fmt_value(*v))
        .collect::<Vec<_>>()
        .join(", ")
}
