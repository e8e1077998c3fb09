//! Hierarchical binary (HDF5) sweep reader.
//!
//! # Container Layout
//!
//! - Group `meta`, attribute `VERSION` (float, must be `0.1`), attributes
//!   `config` and `cell` (strings or string arrays).
//! - Group `data`, string-array attributes `sweeped_ax_names` and
//!   `result_data_names`, and one numeric dataset per listed name.
//!
//! The sweep dimension is the number of swept axis names; nothing is
//! inferred from the data shapes.
//!
//! Decoding is written against the [`SweepContainer`] trait so that the
//! version and dimension rules do not depend on the HDF5 library.
//! [`Hdf5Container`] (cargo feature `hdf5`) reads real files;
//! [`InMemoryContainer`] serves tests and tooling.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use ndarray::{ArrayD, Ix1, Ix2};

use super::build::{build_1d, build_2d};
use super::model::Dataset;
use crate::error::SweepError;

/// The only container version this reader understands.
pub const SUPPORTED_VERSION: f64 = 0.1;

// Version attributes written as 32-bit floats do not round-trip to 0.1 exactly.
const VERSION_TOLERANCE: f64 = 1e-6;

/// Read access to a sweep container.
pub trait SweepContainer {
    /// Where the container came from, for error messages.
    fn path(&self) -> &Path;

    /// The `meta/VERSION` attribute, if present and numeric.
    fn version(&self) -> Option<f64>;

    /// Names of the swept axes, in sweep order.
    fn swept_axis_names(&self) -> Result<Vec<String>, SweepError>;

    /// Names of the recorded result datasets, in file order.
    fn result_names(&self) -> Result<Vec<String>, SweepError>;

    /// Reads one named dataset as `f64`.
    fn read_column(&self, name: &str) -> Result<ArrayD<f64>, SweepError>;

    /// Configuration lines passed through to the dataset.
    fn config_lines(&self) -> Vec<String>;

    /// User comment lines passed through to the dataset.
    fn comment_lines(&self) -> Vec<String>;
}

/// Reads a dataset from an HDF5 sweep container.
///
/// # Errors
/// [`SweepError::UnsupportedVersion`], [`SweepError::UnsupportedDimension`],
/// or [`SweepError::Hdf5`] for unreadable containers. Without the `hdf5`
/// feature this always fails with [`SweepError::UnsupportedFormat`].
#[cfg(feature = "hdf5")]
pub fn read_sweep_hdf5(path: &Path) -> Result<Dataset, SweepError> {
    let container = Hdf5Container::open(path)?;
    decode_container(&container)
}

/// Reads a dataset from an HDF5 sweep container.
///
/// # Errors
/// Always fails with [`SweepError::UnsupportedFormat`]: this build has no
/// HDF5 support. Enable the `hdf5` feature.
#[cfg(not(feature = "hdf5"))]
pub fn read_sweep_hdf5(path: &Path) -> Result<Dataset, SweepError> {
    Err(SweepError::UnsupportedFormat(format!(
        "{}: HDF5 support not compiled in (enable the 'hdf5' feature)",
        path.display()
    )))
}

/// Decodes any [`SweepContainer`] into a dataset.
pub fn decode_container<C: SweepContainer + ?Sized>(container: &C) -> Result<Dataset, SweepError> {
    let path = container.path();

    match container.version() {
        Some(v) if (v - SUPPORTED_VERSION).abs() < VERSION_TOLERANCE => {}
        found => {
            return Err(SweepError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: found.map_or_else(|| "missing".to_string(), |v| v.to_string()),
            })
        }
    }

    let axes = container.swept_axis_names()?;
    let results = container.result_names()?;
    debug!(
        "{}: swept axes {:?}, results {:?}",
        path.display(),
        axes,
        results
    );

    let mut dataset = match axes.as_slice() {
        [x] => {
            let x_data = read_line(container, x)?;
            let rest = results
                .iter()
                .map(|name| Ok((name.clone(), read_line(container, name)?)))
                .collect::<Result<Vec<_>, SweepError>>()?;
            build_1d((x.clone(), x_data), rest)
        }
        [_, _] => {
            let columns = axes
                .iter()
                .chain(&results)
                .map(|name| Ok((name.clone(), read_plane(container, name)?)))
                .collect::<Result<Vec<_>, SweepError>>()?;
            check_same_shape(path, &columns)?;
            // Axes are declared by name; no scale/raw detection here.
            build_2d(columns, (0, 1), None).ok_or_else(|| SweepError::Hdf5 {
                path: path.to_path_buf(),
                message: "empty swept axis dataset".to_string(),
            })?
        }
        _ => {
            return Err(SweepError::UnsupportedDimension {
                path: path.to_path_buf(),
                count: axes.len(),
            })
        }
    };

    dataset.config_lines = container.config_lines();
    dataset.comment_lines = container.comment_lines();
    Ok(dataset)
}

fn read_line<C: SweepContainer + ?Sized>(
    container: &C,
    name: &str,
) -> Result<ndarray::Array1<f64>, SweepError> {
    let data = container.read_column(name)?;
    let shape = data.shape().to_vec();
    data.into_dimensionality::<Ix1>()
        .map_err(|_| wrong_rank(container.path(), name, 1, &shape))
}

fn read_plane<C: SweepContainer + ?Sized>(
    container: &C,
    name: &str,
) -> Result<ndarray::Array2<f64>, SweepError> {
    let data = container.read_column(name)?;
    let shape = data.shape().to_vec();
    data.into_dimensionality::<Ix2>()
        .map_err(|_| wrong_rank(container.path(), name, 2, &shape))
}

fn wrong_rank(path: &Path, name: &str, expected: usize, shape: &[usize]) -> SweepError {
    SweepError::Hdf5 {
        path: path.to_path_buf(),
        message: format!("dataset '{name}' has shape {shape:?}, expected {expected} dimension(s)"),
    }
}

fn check_same_shape(path: &Path, columns: &[(String, ndarray::Array2<f64>)]) -> Result<(), SweepError> {
    let Some((first_name, first)) = columns.first() else {
        return Ok(());
    };
    for (name, plane) in columns {
        if plane.shape() != first.shape() {
            return Err(SweepError::Hdf5 {
                path: path.to_path_buf(),
                message: format!(
                    "dataset '{name}' has shape {:?} but '{first_name}' has {:?}",
                    plane.shape(),
                    first.shape()
                ),
            });
        }
    }
    Ok(())
}

// ============================================================================
// In-memory container
// ============================================================================

/// A container assembled in memory.
///
/// # Example
/// ```
/// use ndarray::array;
/// use sweepnorm::sweep::io_hdf5::{decode_container, InMemoryContainer};
///
/// let container = InMemoryContainer::new(0.1)
///     .with_swept_axis("gate", array![0.0, 0.5, 1.0].into_dyn())
///     .with_result("current", array![1.0, 2.0, 3.0].into_dyn());
/// let dataset = decode_container(&container)?;
/// assert_eq!(dataset.channel_titles(), vec!["gate", "current"]);
/// # Ok::<(), sweepnorm::SweepError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryContainer {
    pub version: Option<f64>,
    pub swept_axis_names: Vec<String>,
    pub result_names: Vec<String>,
    pub datasets: BTreeMap<String, ArrayD<f64>>,
    pub config: Vec<String>,
    pub cell: Vec<String>,
}

impl InMemoryContainer {
    /// Creates an empty container declaring `version`.
    pub fn new(version: f64) -> Self {
        Self {
            version: Some(version),
            ..Default::default()
        }
    }

    /// Declares a swept axis and stores its samples.
    pub fn with_swept_axis(mut self, name: impl Into<String>, data: ArrayD<f64>) -> Self {
        let name = name.into();
        self.swept_axis_names.push(name.clone());
        self.datasets.insert(name, data);
        self
    }

    /// Declares a result dataset and stores its samples.
    pub fn with_result(mut self, name: impl Into<String>, data: ArrayD<f64>) -> Self {
        let name = name.into();
        self.result_names.push(name.clone());
        self.datasets.insert(name, data);
        self
    }
}

impl SweepContainer for InMemoryContainer {
    fn path(&self) -> &Path {
        Path::new("<memory>")
    }

    fn version(&self) -> Option<f64> {
        self.version
    }

    fn swept_axis_names(&self) -> Result<Vec<String>, SweepError> {
        Ok(self.swept_axis_names.clone())
    }

    fn result_names(&self) -> Result<Vec<String>, SweepError> {
        Ok(self.result_names.clone())
    }

    fn read_column(&self, name: &str) -> Result<ArrayD<f64>, SweepError> {
        self.datasets.get(name).cloned().ok_or_else(|| SweepError::Hdf5 {
            path: PathBuf::from("<memory>"),
            message: format!("missing dataset '{name}'"),
        })
    }

    fn config_lines(&self) -> Vec<String> {
        self.config.clone()
    }

    fn comment_lines(&self) -> Vec<String> {
        self.cell.clone()
    }
}

// ============================================================================
// HDF5 container
// ============================================================================

#[cfg(feature = "hdf5")]
pub use self::hdf5_backend::Hdf5Container;

#[cfg(feature = "hdf5")]
mod hdf5_backend {
    use std::path::{Path, PathBuf};

    use hdf5::types::{VarLenAscii, VarLenUnicode};
    use ndarray::{ArrayD, IxDyn};

    use super::SweepContainer;
    use crate::error::SweepError;

    /// An open HDF5 sweep container.
    pub struct Hdf5Container {
        path: PathBuf,
        data: hdf5::Group,
        meta: hdf5::Group,
        _file: hdf5::File,
    }

    impl Hdf5Container {
        /// Opens `path` and locates the `data` and `meta` groups.
        pub fn open(path: &Path) -> Result<Self, SweepError> {
            let file = hdf5::File::open(path).map_err(|e| hdf5_error(path, e))?;
            let data = file.group("data").map_err(|e| hdf5_error(path, e))?;
            let meta = file.group("meta").map_err(|e| hdf5_error(path, e))?;
            Ok(Self {
                path: path.to_path_buf(),
                data,
                meta,
                _file: file,
            })
        }

        fn string_attr(&self, group: &hdf5::Group, name: &str) -> Result<Vec<String>, SweepError> {
            let attr = group.attr(name).map_err(|e| hdf5_error(&self.path, e))?;
            read_strings(&attr).ok_or_else(|| SweepError::Hdf5 {
                path: self.path.clone(),
                message: format!("attribute '{name}' is not a string list"),
            })
        }
    }

    impl SweepContainer for Hdf5Container {
        fn path(&self) -> &Path {
            &self.path
        }

        fn version(&self) -> Option<f64> {
            self.meta
                .attr("VERSION")
                .and_then(|attr| attr.read_scalar::<f64>())
                .ok()
        }

        fn swept_axis_names(&self) -> Result<Vec<String>, SweepError> {
            self.string_attr(&self.data, "sweeped_ax_names")
        }

        fn result_names(&self) -> Result<Vec<String>, SweepError> {
            self.string_attr(&self.data, "result_data_names")
        }

        fn read_column(&self, name: &str) -> Result<ArrayD<f64>, SweepError> {
            let dataset = self.data.dataset(name).map_err(|e| hdf5_error(&self.path, e))?;
            let shape = dataset.shape();
            let raw = dataset
                .read_raw::<f64>()
                .map_err(|e| hdf5_error(&self.path, e))?;
            ArrayD::from_shape_vec(IxDyn(&shape), raw).map_err(|e| SweepError::Hdf5 {
                path: self.path.clone(),
                message: format!("dataset '{name}': {e}"),
            })
        }

        fn config_lines(&self) -> Vec<String> {
            self.meta
                .attr("config")
                .ok()
                .and_then(|attr| read_strings(&attr))
                .unwrap_or_default()
        }

        fn comment_lines(&self) -> Vec<String> {
            self.meta
                .attr("cell")
                .ok()
                .and_then(|attr| read_strings(&attr))
                .unwrap_or_default()
        }
    }

    /// Reads a string or string-array attribute in either encoding.
    fn read_strings(attr: &hdf5::Attribute) -> Option<Vec<String>> {
        if let Ok(values) = attr.read_raw::<VarLenUnicode>() {
            return Some(values.iter().map(|s| s.as_str().to_string()).collect());
        }
        if let Ok(values) = attr.read_raw::<VarLenAscii>() {
            return Some(values.iter().map(|s| s.as_str().to_string()).collect());
        }
        None
    }

    fn hdf5_error(path: &Path, err: hdf5::Error) -> SweepError {
        SweepError::Hdf5 {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::{AxisRange, ChannelData, SweepDim};
    use ndarray::array;

    #[test]
    fn test_1d_duplicates_axis_into_outputs() {
        let container = InMemoryContainer::new(0.1)
            .with_swept_axis("gate", array![0.0, 1.0, 2.0].into_dyn())
            .with_result("current", array![5.0, 6.0, 7.0].into_dyn())
            .with_result("time", array![10.0, 11.0, 12.0].into_dyn());
        let ds = decode_container(&container).expect("decode");

        assert_eq!(ds.sweep_dim, SweepDim::One);
        assert_eq!(ds.x.title, "gate");
        assert_eq!(ds.x.range, AxisRange::from_endpoints(0.0, 2.0, 3));
        assert_eq!(ds.channel_titles(), vec!["gate", "current", "time"]);
        assert_eq!(ds.out_channels[0].data, ds.x.data);
    }

    #[test]
    fn test_2d_uses_shared_reconstruction() {
        let container = InMemoryContainer::new(0.1)
            .with_swept_axis("b", array![[1.0, 1.0], [0.0, 0.0]].into_dyn())
            .with_swept_axis("g", array![[0.0, 1.0], [0.0, 1.0]].into_dyn())
            .with_result("r", array![[1.0, 2.0], [3.0, 4.0]].into_dyn());
        let ds = decode_container(&container).expect("decode");

        assert_eq!(ds.sweep_dim, SweepDim::Two);
        assert!(!ds.alternate_scan);
        assert_eq!(ds.channel_titles(), vec!["r"]);
        assert_eq!(
            ds.out_channels[0].data,
            ChannelData::Plane(array![[3.0, 4.0], [1.0, 2.0]])
        );
    }

    #[test]
    fn test_unsupported_version() {
        let container = InMemoryContainer::new(0.2)
            .with_swept_axis("gate", array![0.0, 1.0].into_dyn());
        let err = decode_container(&container).unwrap_err();
        assert!(matches!(err, SweepError::UnsupportedVersion { found, .. } if found == "0.2"));
    }

    #[test]
    fn test_missing_version() {
        let container = InMemoryContainer::default();
        let err = decode_container(&container).unwrap_err();
        assert!(matches!(err, SweepError::UnsupportedVersion { found, .. } if found == "missing"));
    }

    #[test]
    fn test_version_written_as_f32_is_accepted() {
        let container = InMemoryContainer::new(f64::from(0.1f32))
            .with_swept_axis("gate", array![0.0, 1.0].into_dyn());
        assert!(decode_container(&container).is_ok());
    }

    #[test]
    fn test_zero_axes_is_unsupported_dimension() {
        let container = InMemoryContainer::new(0.1);
        let err = decode_container(&container).unwrap_err();
        assert!(matches!(err, SweepError::UnsupportedDimension { count: 0, .. }));
    }

    #[test]
    fn test_three_axes_is_unsupported_dimension() {
        let container = InMemoryContainer::new(0.1)
            .with_swept_axis("a", array![[0.0]].into_dyn())
            .with_swept_axis("b", array![[0.0]].into_dyn())
            .with_swept_axis("c", array![[0.0]].into_dyn())
            .with_result("r", array![[1.0]].into_dyn());
        let err = decode_container(&container).unwrap_err();
        assert!(matches!(err, SweepError::UnsupportedDimension { count: 3, .. }));
    }

    #[test]
    fn test_declared_axes_skip_scale_raw_detection() {
        let container = InMemoryContainer::new(0.1)
            .with_swept_axis("field_scale", array![[0.0, 0.0], [1.0, 1.0]].into_dyn())
            .with_swept_axis("gate_raw", array![[0.0, 1.0], [0.0, 1.0]].into_dyn())
            .with_result("current", array![[1.0, 2.0], [3.0, 4.0]].into_dyn())
            .with_result("time", array![[5.0, 6.0], [7.0, 8.0]].into_dyn());
        let ds = decode_container(&container).expect("decode");

        assert_eq!(ds.x.title, "field_scale");
        assert_eq!(ds.y.as_ref().map(|y| y.title.as_str()), Some("gate_raw"));
        assert_eq!(ds.channel_titles(), vec!["current", "time"]);
    }

    #[test]
    fn test_wrong_rank_is_reported() {
        let container = InMemoryContainer::new(0.1)
            .with_swept_axis("gate", array![[0.0, 1.0]].into_dyn());
        let err = decode_container(&container).unwrap_err();
        assert!(matches!(err, SweepError::Hdf5 { .. }));
    }

    #[test]
    fn test_mismatched_planes_are_reported() {
        let container = InMemoryContainer::new(0.1)
            .with_swept_axis("a", array![[0.0, 1.0]].into_dyn())
            .with_swept_axis("b", array![[0.0, 1.0]].into_dyn())
            .with_result("r", array![[1.0, 2.0, 3.0]].into_dyn());
        let err = decode_container(&container).unwrap_err();
        assert!(matches!(err, SweepError::Hdf5 { message, .. } if message.contains("'r'")));
    }

    #[test]
    fn test_metadata_passthrough() {
        let mut container = InMemoryContainer::new(0.1)
            .with_swept_axis("gate", array![0.0, 1.0].into_dyn());
        container.config = vec!["dev1 = 3".into()];
        container.cell = vec!["sweep(gate, 0, 1, 2)".into()];
        let ds = decode_container(&container).expect("decode");
        assert_eq!(ds.config_lines, vec!["dev1 = 3".to_string()]);
        assert_eq!(ds.comment_lines, vec!["sweep(gate, 0, 1, 2)".to_string()]);
    }
}
