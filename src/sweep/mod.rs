//! Canonical sweep datasets and their file adapters.
//!
//! A sweep file records one or more output channels while one (1D) or two
//! (2D) instrument parameters are stepped. Every adapter produces the same
//! [`Dataset`], so consumers never care which encoding a file used.
//!
//! # Conventions
//!
//! 1. **Storage orientation**: 2D output channels are stored as `[x, y]`
//!    planes, with both axes in ascending coordinate order. Sweeps recorded
//!    towards decreasing values are reversed during reconstruction.
//!
//! 2. **Display orientation**: [`Dataset::get_channel`] returns the
//!    transpose of storage, optionally after undoing an alternating
//!    (boustrophedon) scan.
//!
//! 3. **Unknown is explicit**: axis ranges that cannot be inferred carry
//!    NaN, and optional metadata uses [`Metadata::Unknown`] instead of a
//!    sentinel value.
//!
//! # Example
//!
//! ```
//! use sweepnorm::sweep::io_text::from_sweep_txt_str;
//!
//! let text = "#gate\tcurrent\n0\t1\n0.5\t2\n1\t3\n";
//! let dataset = from_sweep_txt_str(text)?;
//! assert!(!dataset.is_2d());
//! assert_eq!(dataset.x.range.step, 0.5);
//! # Ok::<(), sweepnorm::SweepError>(())
//! ```

mod access;
mod build;
mod format;
pub mod io_hdf5;
pub mod io_text;
mod model;
mod range;
mod transform;

pub use access::Extent;
pub use format::Format;
pub use model::{
    Axis, AxisRange, Channel, ChannelData, Dataset, Metadata, SweepDim, SweepInterval,
};
pub use range::{infer_range, infer_secondary_range};
pub use transform::{cartesian_to_polar, polar_to_cartesian};
