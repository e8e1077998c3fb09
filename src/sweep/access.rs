//! Typed extraction of channels and plot extents.
//!
//! # Orientation
//!
//! Output channels of a 2D sweep are stored `[x, y]`. Display arrays are the
//! transpose of that, so [`Dataset::get_channel`] always applies one final
//! transpose after the optional alternation fix and the optional requested
//! transpose. Consumers relying on bit-exact orientation should read this
//! before changing anything here.

use std::time::Duration;

use ndarray::s;
use serde::Serialize;

use super::model::{Channel, ChannelData, Dataset};
use crate::error::SweepError;

/// Rectangular coordinate bounds padded by half a step on every side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    fn has_nan(&self) -> bool {
        [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .any(|v| v.is_nan())
    }
}

impl Dataset {
    /// Returns an output channel prepared for display.
    ///
    /// Computed channels are not searched; see [`Dataset::computed_channel`].
    /// For 2D sweeps, `alternate` reverses every odd row along Y (undoing a
    /// boustrophedon scan), `transpose` swaps the axes, and the result is
    /// then transposed once more from storage to display orientation.
    ///
    /// # Errors
    /// Returns [`SweepError::ChannelNotFound`] if no output channel has this
    /// title.
    pub fn get_channel(
        &self,
        title: &str,
        alternate: bool,
        transpose: bool,
    ) -> Result<ChannelData, SweepError> {
        let channel = self
            .out_channel(title)
            .ok_or_else(|| SweepError::ChannelNotFound(title.to_string()))?;

        let mut plane = match &channel.data {
            ChannelData::Line(line) => return Ok(ChannelData::Line(line.clone())),
            ChannelData::Plane(plane) => plane.clone(),
        };

        if alternate {
            for i in (1..plane.nrows()).step_by(2) {
                let reversed = plane.row(i).slice(s![..;-1]).to_owned();
                plane.row_mut(i).assign(&reversed);
            }
        }
        if transpose {
            plane = plane.reversed_axes();
        }
        let display = plane.reversed_axes();

        Ok(ChannelData::Plane(display.as_standard_layout().into_owned()))
    }

    /// First computed channel with this exact title.
    pub fn computed_channel(&self, title: &str) -> Option<&Channel> {
        self.computed_channels.iter().find(|c| c.title == title)
    }

    /// Plot extent of a 2D sweep.
    ///
    /// Returns `None` for 1D sweeps, or when any bound is NaN: a partially
    /// known extent is never reported.
    pub fn get_extent(&self, transpose: bool) -> Option<Extent> {
        let y = self.y.as_ref()?;
        let (x_min, x_max) = self.x.range.padded_bounds();
        let (y_min, y_max) = y.range.padded_bounds();

        let extent = if transpose {
            Extent {
                x_min: y_min,
                x_max: y_max,
                y_min: x_min,
                y_max: x_max,
            }
        } else {
            Extent {
                x_min,
                x_max,
                y_min,
                y_max,
            }
        };

        if extent.has_nan() {
            None
        } else {
            Some(extent)
        }
    }

    /// Wall-clock duration of the sweep, when its time stamps are usable.
    pub fn sweep_duration(&self) -> Option<Duration> {
        let interval = self.sweep_time?;
        Duration::try_from_secs_f64(interval.end - interval.start).ok()
    }
}
