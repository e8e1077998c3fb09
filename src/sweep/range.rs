//! Axis range inference from recorded coordinate sequences.

use super::model::AxisRange;

/// Recovers `(start, stop, count, step)` from a 1D coordinate sequence.
///
/// Aborted acquisitions leave NaN rows at the end of a file. When the last
/// sample is not finite, the spacing of the first two samples is assumed to
/// hold and the stop value is extrapolated from it.
///
/// ```
/// use sweepnorm::sweep::infer_range;
///
/// let r = infer_range(&[0.0, 1.0, 2.0, f64::NAN]);
/// assert_eq!((r.start, r.stop, r.count, r.step), (0.0, 3.0, 4, 1.0));
/// ```
pub fn infer_range(samples: &[f64]) -> AxisRange {
    let count = samples.len();
    let Some(&start) = samples.first() else {
        return AxisRange::unknown(count);
    };
    if start.is_nan() {
        return AxisRange::unknown(count);
    }

    let mut range = AxisRange {
        start,
        ..AxisRange::unknown(count)
    };

    let last = samples[count - 1];
    if last.is_finite() {
        range.stop = last;
        range.step = (last - start) / (count as f64 - 1.0);
    } else if let Some(&second) = samples.get(1).filter(|v| v.is_finite()) {
        range.step = second - start;
        range.stop = start + range.step * (count as f64 - 1.0);
    }

    range
}

/// Range of the secondary axis of a 2D sweep.
///
/// A declared `(start, stop)` pair wins when present. Otherwise the first
/// and last element of the first recorded row are used as endpoints. The
/// general 1D rule does not apply here because the row is a slice of a full
/// plane.
pub fn infer_secondary_range(first_row: &[f64], declared: Option<(f64, f64)>) -> AxisRange {
    let count = first_row.len();
    let (start, stop) = match declared {
        Some(pair) => pair,
        None => (
            first_row.first().copied().unwrap_or(f64::NAN),
            first_row.last().copied().unwrap_or(f64::NAN),
        ),
    };
    AxisRange::from_endpoints(start, stop, count)
}
