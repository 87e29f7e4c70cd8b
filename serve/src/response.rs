//! JSON bodies returned by the build endpoint.

use std::collections::BTreeMap;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use rigsmith::{BuildOutcome, Category, Listing};
use serde::Serialize;

/// Success body of `POST /api/build`. `products` holds resolved categories only, keyed by
/// category label.
#[derive(Debug, Serialize)]
pub(crate) struct BuildResponse {
    response: String,
    products: BTreeMap<Category, Listing>,
    missing: Vec<Category>,
    total: u64,
    deviation: f64,
    acceptable: bool,
    adjusted: bool,
}

impl From<BuildOutcome> for BuildResponse {
    fn from(outcome: BuildOutcome) -> Self {
        Self {
            products: outcome.bundle.products(),
            missing: outcome.bundle.missing(),
            total: outcome.bundle.total(),
            deviation: outcome.deviation,
            acceptable: outcome.acceptable,
            adjusted: outcome.adjusted,
            response: outcome.narration,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}
