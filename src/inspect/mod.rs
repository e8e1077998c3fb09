//! Sweep file inspection.
//!
//! Produces a structured summary of a loaded sweep: file identity, sweep
//! shape, axis ranges, plot extent and per-channel value bounds.

mod report;

pub use report::{
    AxisSummary, ChannelSummary, FileSection, HeaderSection, InspectReport, SweepSection,
};

use crate::record::SweepRecord;
use crate::sweep::{Axis, Channel};

/// Inspect a loaded sweep file and produce a report.
pub fn inspect_record(record: &SweepRecord) -> InspectReport {
    let identity = record.identity();
    let dataset = record.dataset();

    let file = FileSection {
        name: record.filename(),
        format: record.format().name().to_string(),
        size_bytes: identity.stat.size,
        content_hash: identity.content_hash.clone(),
    };

    let duration = dataset.sweep_duration();
    let sweep = SweepSection {
        dimension: dataset.sweep_dim.to_string(),
        alternate_scan: dataset.alternate_scan,
        before_wait: dataset.before_wait.known().cloned(),
        duration_secs: duration.map(|d| d.as_secs_f64()),
        // Whole milliseconds keep the humantime output short.
        duration: duration
            .map(|d| std::time::Duration::from_millis(d.as_millis() as u64))
            .map(|d| humantime::format_duration(d).to_string()),
    };

    let mut axes = vec![summarize_axis("x", &dataset.x)];
    if let Some(y) = &dataset.y {
        axes.push(summarize_axis("y", y));
    }

    let channels = dataset
        .out_channels
        .iter()
        .map(|c| summarize_channel(c, false))
        .chain(
            dataset
                .computed_channels
                .iter()
                .map(|c| summarize_channel(c, true)),
        )
        .collect();

    InspectReport {
        file,
        sweep,
        axes,
        extent: dataset.get_extent(false),
        channels,
        header: HeaderSection {
            config_lines: dataset.config_lines.len(),
            comments: dataset.comment_lines.clone(),
        },
    }
}

fn summarize_axis(role: &'static str, axis: &Axis) -> AxisSummary {
    AxisSummary {
        role,
        title: axis.title.clone(),
        start: axis.range.start,
        stop: axis.range.stop,
        count: axis.range.count,
        step: axis.range.step,
    }
}

fn summarize_channel(channel: &Channel, computed: bool) -> ChannelSummary {
    let bounds = channel.data.nan_min_max();
    ChannelSummary {
        title: channel.title.clone(),
        shape: channel.data.shape(),
        min: bounds.map(|(min, _)| min),
        max: bounds.map(|(_, max)| max),
        computed,
    }
}
