// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use approx::assert_abs_diff_eq;
use marlu::c32;
use ndarray::prelude::*;

use super::*;
use crate::io::read::memory::{bandpass_solutions, delay_solutions, gain_solutions};

fn arr(v: &[f64]) -> Array1<f64> {
    Array1::from(v.to_vec())
}

#[test]
fn test_classify_table_names() {
    assert_eq!(TableKind::from_table_name("obs.G0"), Some(TableKind::Gain));
    assert_eq!(TableKind::from_table_name("obs.g"), Some(TableKind::Gain));
    assert_eq!(TableKind::from_table_name("obs.B12"), Some(TableKind::Bandpass));
    assert_eq!(TableKind::from_table_name("obs.k1"), Some(TableKind::Delay));
    // Trailing slashes from shell completion don't matter.
    assert_eq!(
        TableKind::from_table_name("/data/1234.ms.G1/"),
        Some(TableKind::Gain)
    );
    // Only the final suffix counts.
    assert_eq!(
        TableKind::from_table_name("/data/cal.K0/obs.B0"),
        Some(TableKind::Bandpass)
    );

    assert_eq!(TableKind::from_table_name("obs.ms"), None);
    assert_eq!(TableKind::from_table_name("obs.G0x"), None);
    assert_eq!(TableKind::from_table_name("obs.Gain"), None);
    assert_eq!(TableKind::from_table_name("G0"), None);
    assert_eq!(TableKind::from_table_name(""), None);
}

#[test]
fn test_display_modes_parse() {
    assert_eq!(
        DisplayMode::from_str("ap").unwrap(),
        DisplayMode::AmplitudePhase
    );
    assert_eq!(
        DisplayMode::from_str("ri").unwrap(),
        DisplayMode::RealImaginary
    );
    assert!(DisplayMode::from_str("amp").is_err());
    assert_eq!(DisplayMode::default(), DisplayMode::AmplitudePhase);
    assert_eq!(DISPLAY_MODES.as_str(), "ap, ri");
}

#[test]
fn test_delay_tables_are_amp_phase_only() {
    assert!(TableKind::Delay
        .check_mode(DisplayMode::AmplitudePhase)
        .is_ok());
    assert!(matches!(
        TableKind::Delay.check_mode(DisplayMode::RealImaginary),
        Err(SolutionsError::DelayNotComplex(DisplayMode::RealImaginary))
    ));
    assert!(TableKind::Gain.check_mode(DisplayMode::RealImaginary).is_ok());
    assert!(TableKind::Bandpass
        .check_mode(DisplayMode::RealImaginary)
        .is_ok());
}

#[test]
fn test_gain_amp_phase() {
    // Antenna 0: two unflagged samples, one flagged one in between.
    let sols = gain_solutions(
        0,
        &[100.0, 110.0, 120.0],
        &[c32::new(1.0, 1.0), c32::new(9.0, 9.0), c32::new(2.0, 0.0)],
        &[false, true, false],
    );
    let series = transform(TableKind::Gain, DisplayMode::AmplitudePhase, &sols, 0).unwrap();
    assert_eq!(series.len(), 2);
    assert_abs_diff_eq!(arr(&series.x), array![0.0, 20.0]);
    assert_abs_diff_eq!(
        arr(&series.y1),
        array![std::f64::consts::SQRT_2, 2.0],
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(arr(&series.y2), array![45.0, 0.0], epsilon = 1e-5);
    assert_abs_diff_eq!(
        arr(&series.y1_err),
        array![0.1 * std::f64::consts::SQRT_2, 0.2],
        epsilon = 1e-6
    );
    assert!(series.y2_err.is_none());
}

#[test]
fn test_gain_real_imag() {
    let sols = gain_solutions(
        3,
        &[0.0, 1.0],
        &[c32::new(1.0, -2.0), c32::new(-3.0, 4.0)],
        &[false, false],
    );
    let series = transform(TableKind::Gain, DisplayMode::RealImaginary, &sols, 1).unwrap();
    assert_abs_diff_eq!(arr(&series.y1), array![1.0, -3.0]);
    assert_abs_diff_eq!(arr(&series.y2), array![-2.0, 4.0]);
    assert_abs_diff_eq!(
        arr(&series.y1_err),
        array![0.1 * 5.0_f64.sqrt(), 0.5],
        epsilon = 1e-6
    );
    assert!(series.y2_err.is_none());
}

#[test]
fn test_gain_phase_is_unwrapped() {
    // Phases step by +60 degrees, crossing +-180 twice.
    let phases_deg = [120.0_f64, 180.0, 240.0, 300.0, 360.0, 420.0];
    let values = phases_deg
        .iter()
        .map(|p| {
            let (s, c) = (p.to_radians() as f32).sin_cos();
            c32::new(c, s)
        })
        .collect::<Vec<_>>();
    let times = (0..values.len()).map(|i| i as f64).collect::<Vec<_>>();
    let sols = gain_solutions(0, &times, &values, &[false; 6]);
    let series = transform(TableKind::Gain, DisplayMode::AmplitudePhase, &sols, 0).unwrap();

    for pair in series.y2.windows(2) {
        assert!((pair[1] - pair[0]).abs() < 180.0, "{:?}", series.y2);
        assert_abs_diff_eq!(pair[1] - pair[0], 60.0, epsilon = 1e-3);
    }
}

#[test]
fn test_flagged_samples_never_appear() {
    let values = (0..10).map(|i| c32::new(i as f32, 0.5)).collect::<Vec<_>>();
    let times = (0..10).map(|i| i as f64 * 8.0).collect::<Vec<_>>();
    let flags = [true, false, false, true, true, false, true, false, false, true];
    let sols = gain_solutions(0, &times, &values, &flags);
    let num_unflagged = flags.iter().filter(|f| !**f).count();

    for mode in [DisplayMode::AmplitudePhase, DisplayMode::RealImaginary] {
        let series = transform(TableKind::Gain, mode, &sols, 0).unwrap();
        assert_eq!(series.x.len(), num_unflagged);
        assert_eq!(series.y1.len(), num_unflagged);
        assert_eq!(series.y1_err.len(), num_unflagged);
        assert_eq!(series.y2.len(), num_unflagged);
    }

    let series = transform(TableKind::Gain, DisplayMode::RealImaginary, &sols, 0).unwrap();
    assert_abs_diff_eq!(arr(&series.y1), array![1.0, 2.0, 5.0, 7.0, 8.0]);
    assert_abs_diff_eq!(arr(&series.x), array![8.0, 16.0, 40.0, 56.0, 64.0]);
}

#[test]
fn test_all_flagged_gives_empty_series() {
    let sols = gain_solutions(
        0,
        &[0.0, 1.0],
        &[c32::new(1.0, 0.0), c32::new(1.0, 0.0)],
        &[true, true],
    );
    let series = transform(TableKind::Gain, DisplayMode::AmplitudePhase, &sols, 0).unwrap();
    assert!(series.is_empty());
    assert!(series.y1.is_empty());
    assert!(series.y2.is_empty());
}

fn from_degrees(amp: f32, deg: f32) -> c32 {
    let (s, c) = deg.to_radians().sin_cos();
    c32::new(amp * c, amp * s)
}

#[test]
fn test_bandpass_amp_phase() {
    let values = [
        from_degrees(1.0, 90.0),
        from_degrees(2.0, 170.0),
        from_degrees(3.0, 0.0),
        from_degrees(4.0, -100.0),
    ];
    let errors = [0.1, -0.2, 0.3, 0.4];
    let sols = bandpass_solutions(5, &values, &errors, &[false, false, true, false]);
    let series = transform(TableKind::Bandpass, DisplayMode::AmplitudePhase, &sols, 0).unwrap();

    // Channels are the x axis.
    assert_abs_diff_eq!(arr(&series.x), array![0.0, 1.0, 3.0]);
    assert_abs_diff_eq!(arr(&series.y1), array![1.0, 2.0, 4.0], epsilon = 1e-5);
    // The flagged channel is skipped before unwrapping, so 170 -> -100
    // becomes 170 -> 260.
    assert_abs_diff_eq!(arr(&series.y2), array![90.0, 170.0, 260.0], epsilon = 1e-3);
    assert_abs_diff_eq!(arr(&series.y1_err), array![0.1, 0.2, 0.4], epsilon = 1e-6);
    // The errors are real, so their "phases" are 0 or 180.
    let y2_err = series
        .y2_err
        .expect("bandpass amp-phase plots have phase errors");
    assert_abs_diff_eq!(arr(&y2_err), array![0.0, 180.0, 0.0], epsilon = 1e-6);
}

#[test]
fn test_bandpass_real_imag_has_no_lower_errors() {
    let values = [c32::new(1.0, 2.0), c32::new(3.0, 4.0)];
    let sols = bandpass_solutions(0, &values, &[0.1, 0.1], &[false, false]);
    let series = transform(TableKind::Bandpass, DisplayMode::RealImaginary, &sols, 1).unwrap();
    assert_abs_diff_eq!(arr(&series.y1), array![1.0, 3.0]);
    assert_abs_diff_eq!(arr(&series.y2), array![2.0, 4.0]);
    assert!(series.y2_err.is_none());
}

#[test]
fn test_delay_uses_both_correlations() {
    let sols = delay_solutions(
        7,
        &[[1.0, -1.0], [2.0, -2.0], [3.0, -3.0]],
        &[[false, false], [false, true], [false, false]],
    );
    let series = transform(TableKind::Delay, DisplayMode::AmplitudePhase, &sols, 0).unwrap();
    // The row with either correlation flagged is dropped.
    assert_abs_diff_eq!(arr(&series.x), array![7.0, 7.0]);
    assert_abs_diff_eq!(arr(&series.y1), array![1.0, 3.0]);
    assert_abs_diff_eq!(arr(&series.y2), array![-1.0, -3.0]);
    // Errors pass straight through.
    assert_abs_diff_eq!(arr(&series.y1_err), array![0.5, 0.5]);
    assert_eq!(series.y2_err, Some(series.y1_err.clone()));

    let swapped = transform(TableKind::Delay, DisplayMode::AmplitudePhase, &sols, 1).unwrap();
    assert_eq!(swapped.y1, series.y2);
    assert_eq!(swapped.y2, series.y1);
}

#[test]
fn test_delay_antenna_without_rows() {
    // An antenna without rows in the requested field; the correlation can't
    // be checked against anything, so even an out-of-range one is harmless.
    let sols = delay_solutions(3, &[], &[]);
    for corr in [0, 1, 5] {
        let series =
            transform(TableKind::Delay, DisplayMode::AmplitudePhase, &sols, corr).unwrap();
        assert!(series.is_empty());
        assert!(series.y1.is_empty());
        assert!(series.y2.is_empty());
        assert_eq!(series.y2_err, Some(vec![]));
    }
}

#[test]
fn test_delay_real_imag_is_an_error() {
    let sols = delay_solutions(0, &[[1.0, 2.0]], &[[false, false]]);
    let result = transform(TableKind::Delay, DisplayMode::RealImaginary, &sols, 0);
    assert!(matches!(result, Err(SolutionsError::DelayNotComplex(_))));
}

#[test]
fn test_bad_correlation_is_an_error() {
    let sols = gain_solutions(0, &[0.0], &[c32::new(1.0, 0.0)], &[false]);
    let result = transform(TableKind::Gain, DisplayMode::AmplitudePhase, &sols, 2);
    assert!(matches!(
        result,
        Err(SolutionsError::BadCorrelation {
            corr: 2,
            num_corrs: 2
        })
    ));
}

#[test]
fn test_wrong_column_is_an_error() {
    let sols = delay_solutions(0, &[[1.0, 2.0]], &[[false, false]]);
    let result = transform(TableKind::Gain, DisplayMode::AmplitudePhase, &sols, 0);
    assert!(matches!(
        result,
        Err(SolutionsError::WrongParamColumn {
            expected: "CPARAM",
            found: "FPARAM",
            ..
        })
    ));
}

#[test]
fn test_unwrap_phases() {
    use std::f64::consts::PI;

    assert!(unwrap_phases(&[]).is_empty());
    assert_abs_diff_eq!(arr(&unwrap_phases(&[0.3])), array![0.3]);

    // A sequence that wraps from +pi to -pi.
    let wrapped = [2.8, 3.1, -3.0, -2.7];
    let unwrapped = unwrap_phases(&wrapped);
    assert_abs_diff_eq!(
        arr(&unwrapped),
        array![2.8, 3.1, -3.0 + 2.0 * PI, -2.7 + 2.0 * PI],
        epsilon = 1e-12
    );

    // And the other way.
    let wrapped = [-2.8, -3.1, 3.0, 2.7];
    let unwrapped = unwrap_phases(&wrapped);
    assert_abs_diff_eq!(
        arr(&unwrapped),
        array![-2.8, -3.1, 3.0 - 2.0 * PI, 2.7 - 2.0 * PI],
        epsilon = 1e-12
    );

    // Small steps are left alone.
    let smooth = [0.0, 0.5, 1.0, 0.5];
    assert_eq!(unwrap_phases(&smooth), smooth.to_vec());
}

#[test]
fn test_axis_labels() {
    assert_eq!(TableKind::Gain.x_label(), "Time [s]");
    assert_eq!(TableKind::Bandpass.x_label(), "Channel");
    assert_eq!(TableKind::Delay.x_label(), "Antenna");
    assert_eq!(
        TableKind::Bandpass.y_labels(DisplayMode::AmplitudePhase, 0),
        ("Amplitude".to_string(), "Phase [Deg]".to_string())
    );
    assert_eq!(
        TableKind::Gain.y_labels(DisplayMode::RealImaginary, 0),
        ("Real".to_string(), "Imaginary".to_string())
    );
    assert_eq!(
        TableKind::Delay.y_labels(DisplayMode::AmplitudePhase, 1),
        (
            "Delay [ns] (corr. 1)".to_string(),
            "Delay [ns] (corr. 0)".to_string()
        )
    );
}
