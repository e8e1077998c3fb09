//! Channel export to CSV.
//!
//! Channels are written in long format: one row per sample, with the sample
//! index first (`i` for lines; `i,j` for planes) and one column per channel.
//! All exported channels must share one shape.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::SweepError;
use crate::sweep::ChannelData;

/// A channel to export, under the given column title.
pub type NamedChannel<'a> = (&'a str, &'a ChannelData);

/// Writes `channels` as CSV to the file at `path`.
pub fn write_channels_csv(path: &Path, channels: &[NamedChannel<'_>]) -> Result<(), SweepError> {
    let file = File::create(path).map_err(SweepError::Io)?;
    write_channels(BufWriter::new(file), channels, path)?
        .flush()
        .map_err(SweepError::Io)?;
    Ok(())
}

/// Writes `channels` as CSV to any writer, e.g. stdout.
pub fn write_channels_csv_to<W: Write>(writer: W, channels: &[NamedChannel<'_>]) -> Result<(), SweepError> {
    write_channels(writer, channels, Path::new("<stdout>"))?
        .flush()
        .map_err(SweepError::Io)?;
    Ok(())
}

/// Renders `channels` as a CSV string.
///
/// Useful for testing without file I/O.
pub fn to_channels_csv_string(channels: &[NamedChannel<'_>]) -> Result<String, SweepError> {
    let bytes = write_channels(Vec::new(), channels, Path::new("<string>"))?;
    String::from_utf8(bytes).map_err(|e| {
        SweepError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn write_channels<W: Write>(
    writer: W,
    channels: &[NamedChannel<'_>],
    path: &Path,
) -> Result<W, SweepError> {
    check_shapes(channels)?;
    let csv_error = |source| SweepError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    let is_plane = channels.first().is_some_and(|(_, data)| !data.is_1d());

    let mut header: Vec<&str> = if is_plane { vec!["i", "j"] } else { vec!["i"] };
    header.extend(channels.iter().map(|(title, _)| *title));
    csv_writer.write_record(&header).map_err(csv_error)?;

    let shape = channels.first().map(|(_, data)| data.shape()).unwrap_or_default();
    let mut record: Vec<String> = Vec::with_capacity(header.len());
    match shape.as_slice() {
        [n] => {
            for i in 0..*n {
                record.clear();
                record.push(i.to_string());
                record.extend(channels.iter().map(|(_, data)| sample(data, i, 0).to_string()));
                csv_writer.write_record(&record).map_err(csv_error)?;
            }
        }
        [rows, cols] => {
            for i in 0..*rows {
                for j in 0..*cols {
                    record.clear();
                    record.push(i.to_string());
                    record.push(j.to_string());
                    record.extend(channels.iter().map(|(_, data)| sample(data, i, j).to_string()));
                    csv_writer.write_record(&record).map_err(csv_error)?;
                }
            }
        }
        _ => {}
    }

    csv_writer
        .into_inner()
        .map_err(|e| SweepError::Io(e.into_error()))
}

fn sample(data: &ChannelData, i: usize, j: usize) -> f64 {
    match data {
        ChannelData::Line(a) => a[i],
        ChannelData::Plane(a) => a[[i, j]],
    }
}

fn check_shapes(channels: &[NamedChannel<'_>]) -> Result<(), SweepError> {
    let Some((first_title, first)) = channels.first() else {
        return Ok(());
    };
    for (title, data) in &channels[1..] {
        if data.shape() != first.shape() {
            return Err(SweepError::ShapeMismatch {
                a: first_title.to_string(),
                a_shape: first.shape(),
                b: title.to_string(),
                b_shape: data.shape(),
            });
        }
    }
    Ok(())
}
