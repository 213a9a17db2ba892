//! # Section Properties
//!
//! Cross-section properties for structural members and an explicit section
//! table for named shapes. When a component names no shape (or an unknown
//! one) the builder falls back to its rectangular bounding box.
//!
//! Shape values follow the AISC Shapes Database naming conventions and US
//! customary units (in, in², in³, in⁴).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::equations::section as eq;

/// Cross-section properties used by the member analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area (in²)
    pub area_in2: f64,

    /// Moment of inertia about the strong (X) axis (in⁴)
    pub ix_in4: f64,

    /// Moment of inertia about the weak (Y) axis (in⁴)
    pub iy_in4: f64,

    /// Elastic section modulus about X (in³)
    pub sx_in3: f64,

    /// Elastic section modulus about Y (in³)
    pub sy_in3: f64,

    /// Radius of gyration about X (in)
    pub rx_in: f64,

    /// Radius of gyration about Y (in)
    pub ry_in: f64,

    /// Torsional constant J (in⁴)
    pub j_in4: f64,
}

impl Section {
    /// Solid rectangle from a bounding box (b = width, d = height).
    ///
    /// ```rust
    /// use analysis_core::sections::Section;
    ///
    /// let s = Section::from_bounding_box(2.0, 6.0);
    /// assert_eq!(s.area_in2, 12.0);
    /// assert_eq!(s.ix_in4, 36.0);   // 2·6³/12
    /// assert_eq!(s.iy_in4, 4.0);    // 6·2³/12
    /// ```
    pub fn from_bounding_box(width_in: f64, height_in: f64) -> Self {
        let area = eq::rectangular_area(width_in, height_in);
        let ix = eq::rectangular_moment_of_inertia(width_in, height_in);
        let iy = eq::rectangular_moment_of_inertia(height_in, width_in);
        Section {
            area_in2: area,
            ix_in4: ix,
            iy_in4: iy,
            sx_in3: eq::section_modulus(ix, height_in),
            sy_in3: eq::section_modulus(iy, width_in),
            rx_in: eq::radius_of_gyration(ix, area),
            ry_in: eq::radius_of_gyration(iy, area),
            j_in4: eq::rectangular_torsional_constant(width_in, height_in),
        }
    }

    /// Weak-axis (minimum) moment of inertia, governs Euler buckling
    pub fn i_min(&self) -> f64 {
        self.ix_in4.min(self.iy_in4)
    }

    /// Whether every property the analysis divides by is positive and finite
    pub fn is_usable(&self) -> bool {
        [self.area_in2, self.ix_in4, self.iy_in4, self.sx_in3]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A={:.2} in², Ix={:.1} in⁴, Sx={:.1} in³",
            self.area_in2, self.ix_in4, self.sx_in3
        )
    }
}

/// Named section lookup (e.g., "W12X26" → properties).
///
/// Labels are matched case-insensitively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionTable {
    shapes: HashMap<String, Section>,
}

impl SectionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// A handful of shapes common in greenhouse and light industrial framing
    /// (AISC Shapes Database v16.0).
    pub fn standard() -> Self {
        SectionTable::new()
            .with_section(
                "W12X26",
                Section {
                    area_in2: 7.65,
                    ix_in4: 204.0,
                    iy_in4: 17.3,
                    sx_in3: 33.4,
                    sy_in3: 5.34,
                    rx_in: 5.17,
                    ry_in: 1.51,
                    j_in4: 0.457,
                },
            )
            .with_section(
                "W10X33",
                Section {
                    area_in2: 9.71,
                    ix_in4: 171.0,
                    iy_in4: 36.6,
                    sx_in3: 35.0,
                    sy_in3: 9.20,
                    rx_in: 4.19,
                    ry_in: 1.94,
                    j_in4: 0.583,
                },
            )
            .with_section(
                "W8X31",
                Section {
                    area_in2: 9.13,
                    ix_in4: 110.0,
                    iy_in4: 37.1,
                    sx_in3: 27.5,
                    sy_in3: 9.27,
                    rx_in: 3.47,
                    ry_in: 2.02,
                    j_in4: 0.536,
                },
            )
            .with_section(
                "HSS4X4X1/4",
                Section {
                    area_in2: 3.37,
                    ix_in4: 7.80,
                    iy_in4: 7.80,
                    sx_in3: 3.90,
                    sy_in3: 3.90,
                    rx_in: 1.52,
                    ry_in: 1.52,
                    j_in4: 12.8,
                },
            )
    }

    /// Add a shape (builder pattern)
    pub fn with_section(mut self, label: &str, section: Section) -> Self {
        self.insert(label, section);
        self
    }

    pub fn insert(&mut self, label: &str, section: Section) {
        self.shapes.insert(label.to_uppercase(), section);
    }

    /// Look up a shape by label
    pub fn lookup(&self, label: &str) -> Option<&Section> {
        self.shapes.get(&label.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
