//! Dataset transform endpoint.

use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{apply, Product, Transform};

#[derive(Debug, Deserialize)]
pub(crate) struct DatasetQuery {
    #[serde(default)]
    action: Option<String>,
}

/// Wire shape of a dataset response. `code` and `printr` are descriptive
/// text for the UI, never used for control.
#[derive(Debug, Serialize)]
pub(crate) struct DatasetResponse {
    array: Vec<Product>,
    total: f64,
    code: String,
    printr: String,
}

/// `GET /dataset?action=…` — apply one named transform to the baseline.
///
/// Unrecognized actions fall back to `reset`; the engine is pure, so this
/// endpoint needs no state.
pub(crate) async fn dataset(Query(query): Query<DatasetQuery>) -> Json<DatasetResponse> {
    let action = query.action.as_deref().unwrap_or("reset");
    let transform = Transform::from_action(action);
    debug!(action, ?transform, "dataset request");

    let outcome = apply(transform);
    Json(DatasetResponse {
        printr: format!("{:#?}", outcome.records),
        total: outcome.total,
        code: outcome.description,
        array: outcome.records,
    })
}
