//! Polar and Cartesian channel synthesis.
//!
//! Each transform replaces the computed channels wholesale; results of a
//! previous transform never survive the next one.

use log::debug;
use ndarray::Zip;

use super::model::{Channel, ChannelData, Dataset};
use crate::error::SweepError;

/// Elementwise `(x, y) = (r·cos θ, r·sin θ)` with `θ` in degrees.
///
/// Returns `None` if the two inputs differ in shape or dimensionality.
pub fn polar_to_cartesian(r: &ChannelData, deg: &ChannelData) -> Option<(ChannelData, ChannelData)> {
    let x = zip_with(r, deg, |r, d| r * d.to_radians().cos())?;
    let y = zip_with(r, deg, |r, d| r * d.to_radians().sin())?;
    Some((x, y))
}

/// Elementwise `(r, θ) = (√(x²+y²), atan2(y, x))` with `θ` in degrees.
///
/// Returns `None` if the two inputs differ in shape or dimensionality.
pub fn cartesian_to_polar(x: &ChannelData, y: &ChannelData) -> Option<(ChannelData, ChannelData)> {
    let r = zip_with(x, y, |x, y| x.hypot(y))?;
    let deg = zip_with(x, y, |x, y| y.atan2(x).to_degrees())?;
    Some((r, deg))
}

fn zip_with(a: &ChannelData, b: &ChannelData, f: impl Fn(f64, f64) -> f64) -> Option<ChannelData> {
    match (a, b) {
        (ChannelData::Line(a), ChannelData::Line(b)) if a.shape() == b.shape() => Some(
            ChannelData::Line(Zip::from(a).and(b).map_collect(|&a, &b| f(a, b))),
        ),
        (ChannelData::Plane(a), ChannelData::Plane(b)) if a.shape() == b.shape() => Some(
            ChannelData::Plane(Zip::from(a).and(b).map_collect(|&a, &b| f(a, b))),
        ),
        _ => None,
    }
}

impl Dataset {
    /// Synthesizes `{r}_X` and `{deg}_Y` from a radius and an angle channel.
    ///
    /// The inputs are read in display orientation (with the optional
    /// alternation fix) and the results are stored transposed back to the
    /// output-channel storage orientation.
    ///
    /// # Errors
    /// [`SweepError::ChannelNotFound`] if either title is not an output
    /// channel, [`SweepError::ShapeMismatch`] if their shapes differ.
    pub fn to_cartesian(
        &mut self,
        r_title: &str,
        deg_title: &str,
        alternate: bool,
    ) -> Result<(), SweepError> {
        let (r, deg) = self.channel_pair(r_title, deg_title, alternate)?;
        let (x, y) = polar_to_cartesian(&r, &deg).ok_or_else(|| mismatch(r_title, &r, deg_title, &deg))?;

        self.replace_computed(vec![
            Channel::new(format!("{r_title}_X"), x.transposed()),
            Channel::new(format!("{deg_title}_Y"), y.transposed()),
        ]);
        Ok(())
    }

    /// Synthesizes `{x}_R` and `{y}_DEG` from two Cartesian channels.
    ///
    /// Orientation handling matches [`Dataset::to_cartesian`]: results are
    /// stored transposed back to storage orientation. Older tooling kept polar
    /// results in display orientation, so arrays from it differ by a transpose.
    ///
    /// # Errors
    /// [`SweepError::ChannelNotFound`] if either title is not an output
    /// channel, [`SweepError::ShapeMismatch`] if their shapes differ.
    pub fn to_polar(&mut self, x_title: &str, y_title: &str, alternate: bool) -> Result<(), SweepError> {
        let (x, y) = self.channel_pair(x_title, y_title, alternate)?;
        let (r, deg) = cartesian_to_polar(&x, &y).ok_or_else(|| mismatch(x_title, &x, y_title, &y))?;

        self.replace_computed(vec![
            Channel::new(format!("{x_title}_R"), r.transposed()),
            Channel::new(format!("{y_title}_DEG"), deg.transposed()),
        ]);
        Ok(())
    }

    /// Drops every computed channel.
    pub fn clear_computed(&mut self) {
        self.computed_channels.clear();
    }

    fn channel_pair(
        &self,
        a: &str,
        b: &str,
        alternate: bool,
    ) -> Result<(ChannelData, ChannelData), SweepError> {
        Ok((
            self.get_channel(a, alternate, false)?,
            self.get_channel(b, alternate, false)?,
        ))
    }

    fn replace_computed(&mut self, channels: Vec<Channel>) {
        debug!(
            "computed channels: {:?}",
            channels.iter().map(|c| c.title.as_str()).collect::<Vec<_>>()
        );
        self.clear_computed();
        self.computed_channels = channels;
    }
}

fn mismatch(a: &str, a_data: &ChannelData, b: &str, b_data: &ChannelData) -> SweepError {
    SweepError::ShapeMismatch {
        a: a.to_string(),
        a_shape: a_data.shape(),
        b: b.to_string(),
        b_shape: b_data.shape(),
    }
}
