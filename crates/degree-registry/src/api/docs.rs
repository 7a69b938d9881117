//! OpenAPI document and interactive API docs.

use super::handlers;
use super::types::{
    DegreesResponse, HealthResponse, HomeResponse, IssueRequest, IssueResponse, VerifyRequest,
    VerifyResponse,
};
use crate::error::ErrorResponse;
use crate::registry::{DegreeRecord, IssueStatus};
use axum::Router;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Path of the interactive docs page.
pub const DOCS_PATH: &str = "/docs";

/// Path of the OpenAPI document.
pub const OPENAPI_PATH: &str = "/docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Degree Verification API",
        version = "1.0",
        description = "Issue and verify degree records by content fingerprint"
    ),
    paths(
        handlers::home,
        handlers::health,
        handlers::issue_degree,
        handlers::verify_degree,
        handlers::list_degrees
    ),
    components(schemas(
        IssueRequest,
        IssueResponse,
        IssueStatus,
        VerifyRequest,
        VerifyResponse,
        DegreeRecord,
        DegreesResponse,
        HomeResponse,
        HealthResponse,
        ErrorResponse
    )),
    tags(
        (name = "degrees", description = "Degree issuance, verification and listing"),
        (name = "service", description = "Service status")
    )
)]
pub struct ApiDoc;

/// Routes serving the docs page and the document it renders.
pub fn docs_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    RapiDoc::with_openapi(OPENAPI_PATH, ApiDoc::openapi())
        .path(DOCS_PATH)
        .into()
}
