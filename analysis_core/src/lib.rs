//! # analysis_core - Greenhouse Structural Analysis Engine
//!
//! `analysis_core` turns a parametric greenhouse / light industrial building
//! description into load conditions, per-member force, stress and
//! deflection results, code-compliance verdicts, a foundation sizing and
//! optimization guidance. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Each stage is a pure function; configuration is passed in
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types with member, combination and stage
//! - **Fail Loudly**: Non-finite intermediate values are errors, never results
//!
//! ## Quick Start
//!
//! ```rust
//! use analysis_core::config::EngineConfig;
//! use analysis_core::engine::AnalysisEngine;
//! use analysis_core::model::{Dimensions, FrameComponent, GreenhouseModel, InstalledSystems, Point3};
//! use analysis_core::site::SiteParameters;
//!
//! let model = GreenhouseModel {
//!     name: "Propagation House".to_string(),
//!     structure_type: "gable".to_string(),
//!     glazing_type: "polycarbonate".to_string(),
//!     dimensions: Dimensions { length_ft: 96.0, width_ft: 30.0, eave_height_ft: 10.0, ridge_height_ft: 16.0 },
//!     bay_spacing_ft: 6.0,
//!     frame_components: vec![FrameComponent::new(
//!         "R-1",
//!         "Rafter truss",
//!         Point3::new(0.0, 0.0, 10.0),
//!         Point3::new(15.0, 0.0, 16.0),
//!         4.0,
//!         8.0,
//!         "A500-GrB",
//!     )],
//!     systems: InstalledSystems::default(),
//!     equipment_weight_lb: 0.0,
//! };
//!
//! let config = EngineConfig::default();
//! let engine = AnalysisEngine::new(&config);
//! let analysis = engine.run(&model, &SiteParameters::default()).unwrap();
//! let foundation = engine.analyze_foundation(&analysis).unwrap();
//!
//! assert_eq!(analysis.compliance.overall, analysis.compliance.deflection && analysis.compliance.strength);
//! assert!(foundation.footing.area_ft2 > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - Pipeline orchestration and lifecycle events
//! - [`model`] / [`site`] - Building and site inputs
//! - [`loads`] - Load condition generation and LRFD combinations
//! - [`members`] - Structural member builder
//! - [`calculations`] - Member analysis, compliance, foundation, optimization
//! - [`analysis`] - The `StructuralAnalysis` aggregate
//! - [`config`] - Engine configuration
//! - [`fea`] - External FEA backend abstraction
//! - [`materials`] / [`sections`] - Material and section databases
//! - [`equations`] - Closed-form structural formulas
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod calculations;
pub mod config;
pub mod engine;
pub mod equations;
pub mod errors;
pub mod fea;
pub mod loads;
pub mod materials;
pub mod members;
pub mod model;
pub mod sections;
pub mod site;

// Re-export commonly used types at crate root for convenience
pub use analysis::{GlobalResults, StructuralAnalysis};
pub use config::EngineConfig;
pub use engine::{AnalysisEngine, AnalysisEvent};
pub use errors::{AnalysisError, AnalysisResult, Stage};
pub use model::GreenhouseModel;
pub use site::SiteParameters;
