//! # Utility Module
//!
//! Small numeric helpers shared by the geometry, the grid snapper, and the
//! interaction code.
//!
//! ## `clamp`
//!
//! Restricts a value to lie within a specified range. Unlike `f64::clamp`, a
//! NaN input yields the minimum so that bad pointer data can never leak into
//! the layout.
//!
//! ## `snap`
//!
//! Quantizes a coordinate or size to the nearest multiple of the grid step.

/// Clamps a value between a minimum and maximum.
///
/// # Arguments
///
/// * `value` - The input value to be clamped.
/// * `min` - The minimum allowable value.
/// * `max` - The maximum allowable value.
///
/// # Examples
///
/// ```
/// use tableplan::utils::util::clamp;
///
/// assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
/// assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
/// assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
/// assert_eq!(clamp(f64::NAN, 0.0, 10.0), 0.0);
/// ```
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() || value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Rounds `value` to the nearest multiple of `grid_step` when `enabled`.
///
/// A non-positive or non-finite step disables snapping. Rotation is never
/// passed through here.
///
/// ```
/// use tableplan::utils::util::snap;
///
/// assert_eq!(snap(225.0, 20.0, true), 220.0);
/// assert_eq!(snap(87.0, 20.0, true), 80.0);
/// assert_eq!(snap(87.0, 20.0, false), 87.0);
/// ```
pub fn snap(value: f64, grid_step: f64, enabled: bool) -> f64 {
    if !enabled || !(grid_step > 0.0) || !grid_step.is_finite() {
        return value;
    }
    (value / grid_step).round() * grid_step
}
