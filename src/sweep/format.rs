//! Extension-based format dispatch.

use std::path::Path;

use super::model::Dataset;
use super::{io_hdf5, io_text};
use crate::error::SweepError;

/// On-disk encoding of a sweep file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Tab-separated text with `#` header lines.
    Text,
    /// Hierarchical binary container.
    Hdf5,
}

impl Format {
    /// Human-readable name for the format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Hdf5 => "hdf5",
        }
    }

    /// Picks a format from a file extension, case-insensitively.
    ///
    /// Only `hdf5` selects the binary reader; any other extension, or none,
    /// is treated as text.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(str::to_ascii_lowercase).as_deref() {
            Some("hdf5") => Format::Hdf5,
            _ => Format::Text,
        }
    }

    /// Picks a format from the extension of `path`.
    pub fn from_path(path: &Path) -> Self {
        Self::from_extension(path.extension().and_then(|e| e.to_str()))
    }

    /// Decodes `path` with this format's reader.
    pub fn decode(&self, path: &Path) -> Result<Dataset, SweepError> {
        match self {
            Format::Text => io_text::read_sweep_txt(path),
            Format::Hdf5 => io_hdf5::read_sweep_hdf5(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_dispatch() {
        assert_eq!(Format::from_path(Path::new("run.hdf5")), Format::Hdf5);
        assert_eq!(Format::from_path(Path::new("run.HDF5")), Format::Hdf5);
        assert_eq!(Format::from_path(Path::new("run.txt")), Format::Text);
        assert_eq!(Format::from_path(Path::new("run.dat")), Format::Text);
        assert_eq!(Format::from_path(Path::new("run")), Format::Text);
        assert_eq!(Format::from_path(Path::new("run.h5")), Format::Text);
    }

    #[test]
    fn test_names() {
        assert_eq!(Format::Text.name(), "text");
        assert_eq!(Format::Hdf5.name(), "hdf5");
    }
}
