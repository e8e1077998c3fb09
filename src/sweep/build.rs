//! Dataset reconstruction shared by every format adapter.
//!
//! Adapters extract raw `(title, samples)` columns in file order and hand
//! them to [`build_1d`] or [`build_2d`], so both encodings end up with the
//! same orientation, reversal and title rules.

use std::collections::HashSet;

use log::{debug, warn};
use ndarray::{Array1, Array2};

use super::model::{
    Axis, Channel, ChannelData, Dataset, Metadata, SweepDim, SweepInterval,
};
use super::range::{infer_range, infer_secondary_range};

/// Builds a 1D dataset.
///
/// The swept column doubles as the first output channel, like every other
/// logged column. When the sweep ran towards decreasing values, all output
/// channels are reversed so storage is in ascending coordinate order.
pub(crate) fn build_1d(x: (String, Array1<f64>), rest: Vec<(String, Array1<f64>)>) -> Dataset {
    let (x_title, x_data) = x;
    let range = infer_range(&x_data.to_vec());
    let reverse = range.is_descending();

    let mut out_channels: Vec<Channel> = std::iter::once((x_title.clone(), x_data.clone()))
        .chain(rest)
        .map(|(title, data)| {
            let mut data = ChannelData::Line(data);
            if reverse {
                data.reverse_axis(0);
            }
            Channel::new(title, data)
        })
        .collect();
    dedupe_titles(&mut out_channels);

    let sweep_time = time_interval(&out_channels);

    Dataset {
        sweep_dim: SweepDim::One,
        x: Axis {
            title: x_title,
            data: ChannelData::Line(x_data),
            range,
        },
        y: None,
        out_channels,
        computed_channels: Vec::new(),
        alternate_scan: false,
        before_wait: Metadata::Unknown,
        config_lines: Vec::new(),
        comment_lines: Vec::new(),
        sweep_time,
    }
}

/// Builds a 2D dataset from planes of shape `(x count, y count)`.
///
/// `axes` holds the X and Y column indices; columns between them are
/// dropped and outputs start after Y. Returns `None` when the swept
/// coordinates are missing or empty.
pub(crate) fn build_2d(
    columns: Vec<(String, Array2<f64>)>,
    axes: (usize, usize),
    declared_y: Option<(f64, f64)>,
) -> Option<Dataset> {
    let (x_index, y_index) = axes;
    if x_index >= y_index || columns.len() <= y_index {
        return None;
    }

    let mut columns = columns;
    let outs = columns.split_off(y_index + 1);
    let (y_title, y_data) = columns.swap_remove(y_index);
    let (mut x_title, x_data) = columns.swap_remove(x_index);
    if x_data.is_empty() || y_data.is_empty() {
        return None;
    }

    if x_title == y_title {
        x_title = format!("{y_title}_");
        warn!("swept axes share the title '{y_title}', renaming X to '{x_title}'");
    }

    let x_range = infer_range(&x_data.column(0).to_vec());
    let y_first_row = y_data.row(0).to_vec();
    let y_range = infer_secondary_range(&y_first_row, declared_y);

    let alternate_scan = y_data.nrows() >= 2 && y_data.row(0) != y_data.row(1);

    let (rev_x, rev_y) = (x_range.is_descending(), y_range.is_descending());
    let mut out_channels: Vec<Channel> = outs
        .into_iter()
        .map(|(title, plane)| {
            let mut data = ChannelData::Plane(plane);
            if rev_x {
                data.reverse_axis(0);
            }
            if rev_y {
                data.reverse_axis(1);
            }
            Channel::new(title, data)
        })
        .collect();
    dedupe_titles(&mut out_channels);

    let sweep_time = time_interval(&out_channels);

    Some(Dataset {
        sweep_dim: SweepDim::Two,
        x: Axis {
            title: x_title,
            data: ChannelData::Plane(x_data),
            range: x_range,
        },
        y: Some(Axis {
            title: y_title,
            data: ChannelData::Plane(y_data),
            range: y_range,
        }),
        out_channels,
        computed_channels: Vec::new(),
        alternate_scan,
        before_wait: Metadata::Unknown,
        config_lines: Vec::new(),
        comment_lines: Vec::new(),
        sweep_time,
    })
}

/// Finds the X and Y column indices among the leading titles.
///
/// Some instruments log a scaled and a raw copy of the same swept quantity
/// in adjacent columns (`field_scale`, `field_raw`). The raw copy is then
/// skipped and Y is the column after it.
pub(crate) fn detect_axis_indices(titles: &[&str]) -> (usize, usize) {
    match titles {
        [first, second, ..] if first.ends_with("scale") && second.ends_with("raw") => {
            debug!("detected scaled/raw axis pair '{first}'/'{second}'");
            (0, 2)
        }
        _ => (0, 1),
    }
}

/// Makes output titles unique by appending `_` to later duplicates.
fn dedupe_titles(channels: &mut [Channel]) {
    let mut seen: HashSet<String> = HashSet::new();
    for channel in channels.iter_mut() {
        if seen.contains(&channel.title) {
            let original = channel.title.clone();
            while seen.contains(&channel.title) {
                channel.title.push('_');
            }
            warn!("duplicate channel title '{original}' renamed to '{}'", channel.title);
        }
        seen.insert(channel.title.clone());
    }
}

/// Time stamps of the last output channel, ignoring NaN.
fn time_interval(out_channels: &[Channel]) -> Option<SweepInterval> {
    let (start, end) = out_channels.last()?.data.nan_min_max()?;
    Some(SweepInterval { start, end })
}
