use proptest::prelude::*;
use sweepnorm::sweep::{infer_range, ChannelData};

mod proptest_helpers;

use proptest_helpers::{arb_sweep, assert_close, linspace};

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn finite_endpoints_give_exact_step(samples in prop::collection::vec(-1e3f64..1e3, 2..40)) {
        let r = infer_range(&samples);
        let n = samples.len();
        prop_assert_eq!(r.count, n);
        prop_assert_eq!(r.start, samples[0]);
        prop_assert_eq!(r.stop, samples[n - 1]);
        prop_assert_eq!(r.step, (samples[n - 1] - samples[0]) / (n as f64 - 1.0));
    }

    #[test]
    fn nan_tail_extrapolates_from_first_step((start, step, count) in arb_sweep(), tail in 1usize..5) {
        let mut samples = linspace(start, step, count);
        samples.extend(std::iter::repeat(f64::NAN).take(tail));

        let r = infer_range(&samples);
        let total = count + tail;
        prop_assert_eq!(r.count, total);
        let res = assert_close(r.step, step, 1e-9);
        prop_assert!(res.is_ok(), "{}", res.unwrap_err());
        let res = assert_close(r.stop, start + r.step * (total as f64 - 1.0), 1e-12);
        prop_assert!(res.is_ok(), "{}", res.unwrap_err());
    }

    #[test]
    fn nan_start_is_unknown(rest in prop::collection::vec(-1e3f64..1e3, 0..10)) {
        let mut samples = vec![f64::NAN];
        samples.extend(rest);
        let r = infer_range(&samples);
        prop_assert!(r.start.is_nan());
        prop_assert!(r.stop.is_nan());
        prop_assert!(r.step.is_nan());
        prop_assert!(!r.is_known());
    }

    #[test]
    fn reversing_twice_is_identity(data in proptest_helpers::arb_channel_data(8), axis in 0usize..2) {
        let mut twice = data.clone();
        twice.reverse_axis(axis);
        twice.reverse_axis(axis);
        prop_assert_eq!(&twice, &data);
    }

    #[test]
    fn reversing_a_line_reverses_its_samples(v in prop::collection::vec(-1e3f64..1e3, 1..20)) {
        let mut data = ChannelData::Line(ndarray::Array1::from(v.clone()));
        data.reverse_axis(0);
        let got: Vec<f64> = data.iter().collect();
        let mut expected = v;
        expected.reverse();
        prop_assert_eq!(got, expected);
    }
}

#[test]
fn aborted_sweep_extrapolates_stop() {
    let r = infer_range(&[0.0, 1.0, 2.0, f64::NAN]);
    assert_eq!((r.start, r.stop, r.count, r.step), (0.0, 3.0, 4, 1.0));
}

#[test]
fn complete_sweep_uses_last_sample() {
    let r = infer_range(&[0.0, 1.0, 2.0, 3.0]);
    assert_eq!((r.start, r.stop, r.count, r.step), (0.0, 3.0, 4, 1.0));
}
