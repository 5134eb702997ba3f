//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// Message returned when a required field is absent or blank.
pub const MISSING_PARAMETERS: &str = "Missing required parameters: methodName and projectPath";

/// Body of `POST /api/deprecate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeprecateRequest {
    pub method_name: Option<String>,
    pub method_signature: Option<String>,
    pub project_path: Option<String>,
}

impl DeprecateRequest {
    /// `(methodName, projectPath)` when both are present and non-blank.
    pub fn required(&self) -> Option<(String, String)> {
        let method = self.method_name.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let path = self.project_path.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((method.to_string(), path.to_string()))
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
