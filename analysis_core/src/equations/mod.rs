//! # Structural Engineering Equations
//!
//! Fundamental structural mechanics equations used by the member analysis.
//! Keeping them in one place makes them easy to verify against references
//! and keeps unit handling out of the formulas themselves: every function
//! takes consistent units and returns the matching unit.
//!
//! ## Modules
//!
//! - [`beam`] - Uniform-load beam formulas (moment, shear, deflection),
//!   Euler buckling and first-mode natural frequency
//! - [`section`] - Cross-section properties (A, I, S, r, J)
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Moment**: Magnitudes only; the governing absolute value is returned
//! - **Deflection**: Positive downward
//!
//! ## References
//!
//! - AISC 360-22: Specification for Structural Steel Buildings
//! - AISC Steel Construction Manual, Table 3-23 (beam diagrams and formulas)
//! - Roark's Formulas for Stress and Strain, 8th Edition
//! - Blevins, Formulas for Natural Frequency and Mode Shape

pub mod beam;
pub mod section;

pub use beam::{
    euler_buckling_load,
    natural_frequency_hz,
    uniform_load_max_deflection,
    uniform_load_max_moment,
    uniform_load_reactions,
};

pub use section::{
    radius_of_gyration,
    rectangular_area,
    rectangular_moment_of_inertia,
    rectangular_torsional_constant,
    section_modulus,
};
