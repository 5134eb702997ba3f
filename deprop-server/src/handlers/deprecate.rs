//! Deprecation endpoint.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use deprop_core::{Deprop, PropagationResult};

use crate::error::ApiError;
use crate::schema::{DeprecateRequest, MISSING_PARAMETERS};
use crate::state::AppState;

/// `POST /api/deprecate`
///
/// A run that fails inside the engine (missing root, unwritable file) still
/// answers 200 with `success: false` in the body; only unusable requests get
/// an error status.
pub async fn deprecate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PropagationResult>, ApiError> {
    let req: DeprecateRequest = if body.is_empty() {
        DeprecateRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?
    };
    let (method, project_path) = req
        .required()
        .ok_or_else(|| ApiError::BadRequest(MISSING_PARAMETERS.to_string()))?;
    let root = PathBuf::from(project_path);

    tracing::info!(
        root = %root.display(),
        method = %method,
        signature = ?req.method_signature,
        "deprecation requested"
    );

    let _guard = state.gate.acquire(&root).await;

    let signature = req.method_signature;
    let result = tokio::task::spawn_blocking(move || {
        Deprop::new(root)
            .with_target(method)
            .with_signature(signature)
            .run()
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Error during deprecation: {}", e)))?;

    Ok(Json(result))
}

/// Any method other than POST on the deprecation route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("GET method not allowed. Use POST.".to_string())
}
