//! Core dataset model for normalized sweeps.
//!
//! Every format adapter decodes into these types. A [`Dataset`] is built
//! once by an adapter; orientation and reversal corrections happen during
//! construction, never afterwards.

use std::fmt;

use ndarray::{Array1, Array2, Axis as NdAxis};

/// Number of swept parameters in an acquisition run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SweepDim {
    /// One swept parameter; channels are lines.
    One,
    /// Two swept parameters; channels are planes indexed `[x, y]`.
    Two,
}

impl SweepDim {
    /// The dimension as a plain number (1 or 2).
    pub fn as_usize(self) -> usize {
        match self {
            SweepDim::One => 1,
            SweepDim::Two => 2,
        }
    }
}

impl fmt::Display for SweepDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.as_usize())
    }
}

/// The `(start, stop, count, step)` description of a swept axis.
///
/// `count` is always the sample length of the coordinate sequence it was
/// inferred from. `step` is derived from the endpoints. NaN components mean
/// the value could not be determined.
#[derive(Clone, Copy, Debug)]
pub struct AxisRange {
    pub start: f64,
    pub stop: f64,
    pub count: usize,
    pub step: f64,
}

impl AxisRange {
    /// A range whose endpoints and step are unknown.
    pub fn unknown(count: usize) -> Self {
        Self {
            start: f64::NAN,
            stop: f64::NAN,
            count,
            step: f64::NAN,
        }
    }

    /// Builds a range from endpoints, deriving the step.
    ///
    /// With `count == 1` the step is `0/0`, i.e. NaN.
    pub fn from_endpoints(start: f64, stop: f64, count: usize) -> Self {
        let step = (stop - start) / (count as f64 - 1.0);
        Self {
            start,
            stop,
            count,
            step,
        }
    }

    /// True when start, stop and step are all known.
    pub fn is_known(&self) -> bool {
        !(self.start.is_nan() || self.stop.is_nan() || self.step.is_nan())
    }

    /// True when the axis was swept towards decreasing values.
    pub fn is_descending(&self) -> bool {
        self.step < 0.0
    }

    /// Lower and upper bounds padded by half a step on each side.
    ///
    /// Pixel-centred rendering puts sample centres on cell centres this way.
    /// Both bounds are NaN if any of start, stop or step is NaN.
    pub fn padded_bounds(&self) -> (f64, f64) {
        if !self.is_known() {
            return (f64::NAN, f64::NAN);
        }
        let half = self.step.abs() / 2.0;
        (
            self.start.min(self.stop) - half,
            self.start.max(self.stop) + half,
        )
    }
}

// NaN-aware equality: two unknown components compare equal.
impl PartialEq for AxisRange {
    fn eq(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            (a.is_nan() && b.is_nan()) || a == b
        }
        self.count == other.count
            && same(self.start, other.start)
            && same(self.stop, other.stop)
            && same(self.step, other.step)
    }
}

/// Numeric samples of a channel or axis.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelData {
    /// Samples of a 1D sweep.
    Line(Array1<f64>),
    /// Samples of a 2D sweep, first axis X, second axis Y.
    Plane(Array2<f64>),
}

impl ChannelData {
    pub fn is_1d(&self) -> bool {
        matches!(self, ChannelData::Line(_))
    }

    pub fn shape(&self) -> Vec<usize> {
        match self {
            ChannelData::Line(a) => a.shape().to_vec(),
            ChannelData::Plane(a) => a.shape().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ChannelData::Line(a) => a.len(),
            ChannelData::Plane(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_line(&self) -> Option<&Array1<f64>> {
        match self {
            ChannelData::Line(a) => Some(a),
            ChannelData::Plane(_) => None,
        }
    }

    pub fn as_plane(&self) -> Option<&Array2<f64>> {
        match self {
            ChannelData::Line(_) => None,
            ChannelData::Plane(a) => Some(a),
        }
    }

    /// Iterates over all samples in logical (row-major) order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            ChannelData::Line(a) => Box::new(a.iter().copied()),
            ChannelData::Plane(a) => Box::new(a.iter().copied()),
        }
    }

    /// Reverses the samples along `axis`. Axis 1 on a line is a no-op.
    pub fn reverse_axis(&mut self, axis: usize) {
        match self {
            ChannelData::Line(a) if axis == 0 => a.invert_axis(NdAxis(0)),
            ChannelData::Line(_) => {}
            ChannelData::Plane(a) => a.invert_axis(NdAxis(axis)),
        }
    }

    /// Swaps the axes of a plane; lines are returned unchanged.
    pub fn transposed(self) -> Self {
        match self {
            ChannelData::Line(a) => ChannelData::Line(a),
            ChannelData::Plane(a) => ChannelData::Plane(a.reversed_axes()),
        }
    }

    /// Smallest and largest sample, ignoring NaN. `None` if every sample is NaN.
    pub fn nan_min_max(&self) -> Option<(f64, f64)> {
        self.iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// A named measured or derived signal.
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub title: String,
    pub data: ChannelData,
}

impl Channel {
    pub fn new(title: impl Into<String>, data: ChannelData) -> Self {
        Self {
            title: title.into(),
            data,
        }
    }

    pub fn is_1d(&self) -> bool {
        self.data.is_1d()
    }
}

/// A swept coordinate: its title, raw samples and inferred range.
///
/// The samples are kept as recorded; only output channels are
/// reversal-corrected.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub title: String,
    pub data: ChannelData,
    pub range: AxisRange,
}

/// A metadata field that may be missing or malformed in the source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Metadata<T> {
    Known(T),
    #[default]
    Unknown,
}

impl<T> Metadata<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Metadata::Known(_))
    }

    pub fn known(&self) -> Option<&T> {
        match self {
            Metadata::Known(v) => Some(v),
            Metadata::Unknown => None,
        }
    }
}

impl<T> From<Option<T>> for Metadata<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Metadata::Known(v),
            None => Metadata::Unknown,
        }
    }
}

/// Wall-clock interval covered by a sweep, in epoch seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepInterval {
    pub start: f64,
    pub end: f64,
}

/// A sweep file in canonical, format-independent form.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub sweep_dim: SweepDim,

    /// Primary swept axis.
    pub x: Axis,

    /// Secondary swept axis; present exactly for 2D sweeps.
    pub y: Option<Axis>,

    /// Measured signals in file order. The last one holds time stamps.
    pub out_channels: Vec<Channel>,

    /// Channels synthesized by the most recent derived transform.
    pub computed_channels: Vec<Channel>,

    /// Successive rows were acquired in alternating directions.
    pub alternate_scan: bool,

    /// Settle time before each measurement, per swept device.
    pub before_wait: Metadata<Vec<f64>>,

    /// Header lines passed through verbatim.
    pub config_lines: Vec<String>,

    /// User comments found in the header, tag stripped.
    pub comment_lines: Vec<String>,

    pub sweep_time: Option<SweepInterval>,
}

impl Dataset {
    pub fn is_2d(&self) -> bool {
        self.sweep_dim == SweepDim::Two
    }

    /// Titles of the output channels, in order.
    pub fn channel_titles(&self) -> Vec<&str> {
        self.out_channels.iter().map(|c| c.title.as_str()).collect()
    }

    /// First output channel with this exact title.
    pub fn out_channel(&self, title: &str) -> Option<&Channel> {
        self.out_channels.iter().find(|c| c.title == title)
    }

    /// Swept axis with this exact title (X is checked first).
    pub fn axis(&self, title: &str) -> Option<&Axis> {
        std::iter::once(&self.x)
            .chain(self.y.as_ref())
            .find(|a| a.title == title)
    }
}
