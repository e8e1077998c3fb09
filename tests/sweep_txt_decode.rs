//! Decoding text sweep files from disk through the public entry points.

use ndarray::array;
use sweepnorm::sweep::{io_text, ChannelData, Format, Metadata, SweepDim};
use sweepnorm::{load_dataset, SweepError};

mod common;

#[test]
fn decodes_aborted_1d_sweep() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = common::write_fixture(dir.path(), "gate.txt", common::SWEEP_1D);

    let (identity, ds) = load_dataset(&path).expect("load");
    assert_eq!(identity.file_name(), "gate.txt");
    assert_eq!(ds.sweep_dim, SweepDim::One);
    assert_eq!(ds.x.title, "gate");
    assert_eq!(
        (ds.x.range.start, ds.x.range.stop, ds.x.range.count, ds.x.range.step),
        (0.0, 1.5, 4, 0.5)
    );
    assert_eq!(ds.channel_titles(), vec!["gate", "current", "time"]);
    assert_eq!(ds.before_wait, Metadata::Known(vec![0.02, 0.5]));
    assert_eq!(ds.comment_lines, vec!["leakage check".to_string()]);
    assert_eq!(ds.config_lines.len(), 4);
    assert_eq!(ds.sweep_duration(), Some(std::time::Duration::from_secs(2)));
    assert!(ds.get_extent(false).is_none());
}

#[test]
fn alternating_scan_is_detected_and_undone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = common::write_fixture(dir.path(), "map.dat", common::SWEEP_2D_ALTERNATING);

    let (_, ds) = load_dataset(&path).expect("load");
    assert_eq!(ds.sweep_dim, SweepDim::Two);
    assert!(ds.alternate_scan);
    assert_eq!(ds.channel_titles(), vec!["v", "time"]);

    let storage = ds.get_channel("v", true, true).expect("channel");
    assert_eq!(storage, ChannelData::Plane(array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));

    let display = ds.get_channel("v", false, false).expect("channel");
    assert_eq!(display, ChannelData::Plane(array![[1.0, 6.0], [2.0, 5.0], [3.0, 4.0]]));

    let extent = ds.get_extent(false).expect("extent");
    assert_eq!(
        (extent.x_min, extent.x_max, extent.y_min, extent.y_max),
        (-0.5, 1.5, -0.5, 2.5)
    );
}

#[test]
fn colliding_axis_titles_stay_addressable() {
    let ds = io_text::from_sweep_txt_str(common::SWEEP_2D_SAME_TITLES).expect("parse");
    assert_eq!(ds.x.title, "dev_");
    assert_eq!(ds.y.as_ref().map(|y| y.title.as_str()), Some("dev"));
    assert!(ds.axis("dev_").is_some());
    assert!(ds.axis("dev").is_some());
}

#[test]
fn unreadable_file_reports_both_strategies() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = common::write_fixture(dir.path(), "bad.txt", "#a\tb\n1\tx\n");

    let err = load_dataset(&path).unwrap_err();
    match err {
        SweepError::UnreadableSweepFile { forced, plain, .. } => {
            assert!(forced.contains("not a numeric row"));
            assert!(plain.contains("not a numeric row"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_dataset(&dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, SweepError::NotFound { .. }));
}

#[test]
fn any_extension_but_hdf5_reads_as_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let text = common::sweep_text(&["x", "v"], &[vec![0.0, 1.0], vec![1.0, 2.0]]);
    for name in ["a.txt", "a.dat", "a.log", "a"] {
        let path = common::write_fixture(dir.path(), name, &text);
        assert_eq!(Format::from_path(&path), Format::Text);
        assert!(load_dataset(&path).is_ok(), "{name}");
    }
}

#[cfg(not(feature = "hdf5"))]
#[test]
fn hdf5_without_feature_is_unsupported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = common::write_fixture(dir.path(), "a.hdf5", "not really hdf5");
    let err = load_dataset(&path).unwrap_err();
    assert!(matches!(err, SweepError::UnsupportedFormat(_)));
}
