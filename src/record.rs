//! Loaded sweep files and the top-level load entry point.

use std::path::Path;

use log::{debug, info};

use crate::error::SweepError;
use crate::identity::{compute_identity, FileIdentity};
use crate::sweep::{Dataset, Format};

/// Identifies and decodes the sweep file at `path`.
///
/// The adapter is chosen from the file extension (see [`Format::from_path`]).
///
/// # Errors
/// [`SweepError::NotFound`] if `path` is not a regular file, otherwise
/// whatever the selected adapter reports.
pub fn load_dataset(path: &Path) -> Result<(FileIdentity, Dataset), SweepError> {
    let format = Format::from_path(path);
    load_with(path, format)
}

fn load_with(path: &Path, format: Format) -> Result<(FileIdentity, Dataset), SweepError> {
    let identity = compute_identity(path)?;
    debug!("{}: decoding with the {} reader", path.display(), format.name());
    let dataset = format.decode(path)?;
    Ok((identity, dataset))
}

/// A sweep file together with its identity and decoded dataset.
#[derive(Clone, Debug)]
pub struct SweepRecord {
    identity: FileIdentity,
    dataset: Dataset,
    format: Format,
}

impl SweepRecord {
    /// Loads `path`, remembering which adapter was used.
    pub fn from_path(path: &Path) -> Result<Self, SweepError> {
        let format = Format::from_path(path);
        let (identity, dataset) = load_with(path, format)?;
        Ok(Self {
            identity,
            dataset,
            format,
        })
    }

    /// Re-reads the file with the stored adapter.
    ///
    /// On failure the record is left unchanged.
    pub fn reload(&mut self) -> Result<(), SweepError> {
        let path = self.identity.path.clone();
        let (identity, dataset) = load_with(&path, self.format)?;
        if identity.content_hash != self.identity.content_hash {
            info!("{}: content changed, reloaded", path.display());
        } else {
            debug!("{}: reloaded, content unchanged", path.display());
        }
        self.identity = identity;
        self.dataset = dataset;
        Ok(())
    }

    pub fn identity(&self) -> &FileIdentity {
        &self.identity
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Mutable access, e.g. for computing derived channels.
    pub fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn path(&self) -> &Path {
        &self.identity.path
    }

    /// The file name without its directory.
    pub fn filename(&self) -> String {
        self.identity.file_name()
    }

    /// Splits the record into its identity and dataset.
    pub fn into_parts(self) -> (FileIdentity, Dataset) {
        (self.identity, self.dataset)
    }
}
