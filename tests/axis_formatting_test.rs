// tests/axis_formatting_test.rs

use cfd_postproc::plot_framework::{calculate_range, format_axis_value};

#[test]
fn test_coefficient_ticks_keep_decimals() {
    // Lift coefficients typically span well under one unit.
    let values = [0.0, 0.2, 0.4, 0.6, 0.8];
    let expected = ["0.00", "0.20", "0.40", "0.60", "0.80"];
    for (value, want) in values.iter().zip(expected) {
        assert_eq!(format_axis_value(*value, 0.8), want, "value {value}");
    }
}

#[test]
fn test_precision_follows_span() {
    assert_eq!(format_axis_value(0.0124, 0.05), "0.012");
    assert_eq!(format_axis_value(1.5, 2.0), "1.5");
    assert_eq!(format_axis_value(600.0, 1200.0), "600");
}

#[test]
fn test_large_values_are_abbreviated() {
    assert_eq!(format_axis_value(102_951.0, 110_000.0), "103k");
    assert_eq!(format_axis_value(2_500_000.0, 3_000_000.0), "2.5M");
    assert_eq!(format_axis_value(-20_000.0, 50_000.0), "-20k");
}

#[test]
fn test_range_is_padded_around_data() {
    let (lo, hi) = calculate_range(-0.11, 0.085);
    assert!(lo < -0.11);
    assert!(hi > 0.085);
}
