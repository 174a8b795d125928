//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; these wrappers mirror their wire
//! shape so utoipa can document them from the adapter layer.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No valid session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The actor is muted in the room.
    #[schema(rename = "muted")]
    Muted,
    /// The room or membership does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The change would remove the room's last administrator.
    #[schema(rename = "conflict")]
    Conflict,
    /// Storage is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "forbidden")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Insufficient permissions")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Reason code and field context, e.g. `{"code": "muted"}`.
    details: Option<serde_json::Value>,
}
