//! # Cross-Section Property Formulas
//!
//! Formulas for the geometric properties of the bounding-box section the
//! member builder uses when no named shape is given.
//!
//! ## Notation
//!
//! - `A` = Cross-sectional area
//! - `I` = Moment of inertia (second moment of area)
//! - `S` = Section modulus (I/c, where c = distance to extreme fiber)
//! - `r` = Radius of gyration (√(I/A))
//! - `J` = Torsional constant
//! - `b` = Width of section
//! - `d` = Depth (height) of section
//!
//! ## References
//!
//! - AISC Steel Construction Manual, Part 1: Dimensions and Properties
//! - Roark's Formulas for Stress and Strain, 8th Edition, Chapter 3 and Table 10.7

/// Cross-sectional area for a solid rectangle
///
/// ```text
///     ┌─────────┐
///     │         │
///   d │         │
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// A = b × d
#[inline]
pub fn rectangular_area(b: f64, d: f64) -> f64 {
    b * d
}

/// Moment of inertia of a rectangle about the centroidal axis parallel to `b`
///
/// # Formula
/// I = bd³/12
///
/// Swap the arguments for the weak axis: I_y = db³/12.
///
/// # Example
/// ```rust
/// use analysis_core::equations::section::rectangular_moment_of_inertia;
///
/// let i = rectangular_moment_of_inertia(2.0, 6.0);
/// assert!((i - 36.0).abs() < 1e-9);
/// ```
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, d: f64) -> f64 {
    b * d.powi(3) / 12.0
}

/// Elastic section modulus from inertia and the overall dimension in the
/// bending direction.
///
/// # Formula
/// S = I / c, with c = d/2 for doubly symmetric sections
#[inline]
pub fn section_modulus(i: f64, d: f64) -> f64 {
    i / (d / 2.0)
}

/// Radius of gyration
///
/// # Formula
/// r = √(I/A)
#[inline]
pub fn radius_of_gyration(i: f64, a: f64) -> f64 {
    (i / a).sqrt()
}

/// Torsional constant of a solid rectangle (Roark Table 10.7, Case 4)
///
/// # Formula
/// With a ≥ c the long and short sides:
/// J = a·c³·[1/3 − 0.21·(c/a)·(1 − c⁴/(12a⁴))]
#[inline]
pub fn rectangular_torsional_constant(b: f64, d: f64) -> f64 {
    let (a, c) = if b >= d { (b, d) } else { (d, b) };
    if a <= 0.0 {
        return 0.0;
    }
    a * c.powi(3) * (1.0 / 3.0 - 0.21 * (c / a) * (1.0 - c.powi(4) / (12.0 * a.powi(4))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_properties() {
        assert_eq!(rectangular_area(2.0, 6.0), 12.0);
        assert_eq!(rectangular_moment_of_inertia(2.0, 6.0), 36.0);
        assert_eq!(section_modulus(36.0, 6.0), 12.0);
        assert!((radius_of_gyration(36.0, 12.0) - 3.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_torsional_constant_square() {
        // Square: J ≈ 0.1406·a⁴
        let j = rectangular_torsional_constant(4.0, 4.0);
        assert!((j - 0.1406 * 256.0).abs() < 0.1, "J = {}", j);
    }

    #[test]
    fn test_torsional_constant_symmetric_in_arguments() {
        let j1 = rectangular_torsional_constant(2.0, 8.0);
        let j2 = rectangular_torsional_constant(8.0, 2.0);
        assert_eq!(j1, j2);
    }
}
