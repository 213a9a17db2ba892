//! # External FEA Backend
//!
//! Abstraction over an external finite element service. The engine hands
//! it the model and generated loads once per request and awaits the
//! returned [`StructuralAnalysis`] under a timeout
//! ([`EngineConfig::fea_timeout_secs`](crate::config::EngineConfig)).
//!
//! When no backend is used, the closed-form member analysis is authoritative.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::StructuralAnalysis;
use crate::loads::LoadCondition;
use crate::model::GreenhouseModel;

/// Kind of analysis requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnalysisType {
    #[default]
    LinearStatic,
    Modal,
    Buckling,
}

impl AnalysisType {
    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisType::LinearStatic => "linear static",
            AnalysisType::Modal => "modal",
            AnalysisType::Buckling => "buckling",
        }
    }
}

/// Error reported by a backend.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{0}")]
pub struct BackendError(pub String);

impl From<String> for BackendError {
    fn from(s: String) -> Self {
        BackendError(s)
    }
}

impl From<&str> for BackendError {
    fn from(s: &str) -> Self {
        BackendError(s.to_string())
    }
}

/// An external structural solver.
///
/// The returned aggregate must carry analyzed members (results set) so the
/// engine can run the compliance and optimization stages on it.
pub trait FeaBackend: Send + Sync {
    /// Backend name used in error reports and logs
    fn name(&self) -> &str;

    fn perform_structural_analysis(
        &self,
        model: &GreenhouseModel,
        load_conditions: &[LoadCondition],
        analysis_type: AnalysisType,
    ) -> impl Future<Output = Result<StructuralAnalysis, BackendError>> + Send;
}
