#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// A 1D gate sweep with a time column and an aborted final row.
pub const SWEEP_1D: &str = "\
#dev1 = keithley
#comment:=leakage check
#sweep_options:= {'beforewait': [0.02, 0.5]}
#unused
#gate\tcurrent\ttime
0\t1e-9\t100
0.5\t2e-9\t101
1\t3e-9\t102
nan\tnan\tnan
";

/// A 2D alternating scan: Y runs up on even rows and down on odd rows.
pub const SWEEP_2D_ALTERNATING: &str = "\
#x\ty\tv\ttime
0\t0\t1\t10
0\t1\t2\t11
0\t2\t3\t12
1\t2\t6\t13
1\t1\t5\t14
1\t0\t4\t15
";

/// A 2D sweep whose swept columns share a title.
pub const SWEEP_2D_SAME_TITLES: &str = "\
#dev\tdev\tv
0\t0\t1
0\t1\t2
1\t0\t3
1\t1\t4
";

/// A polar scan suitable for the coordinate transforms.
pub const SWEEP_POLAR: &str = "\
#step\tr\tdeg
0\t1\t0
1\t2\t90
2\t2\t180
";

pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Renders a plain tab-separated sweep file from titles and rows.
pub fn sweep_text(titles: &[&str], rows: &[Vec<f64>]) -> String {
    let mut text = format!("#{}\n", titles.join("\t"));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        text.push_str(&cells.join("\t"));
        text.push('\n');
    }
    text
}
