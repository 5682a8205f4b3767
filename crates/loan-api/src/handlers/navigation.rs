//! Page guard - GET /api/navigation/authorize?path=

use axum::extract::{rejection::QueryRejection, Query};
use loan_core::domain::access::authorize_path;
use loan_core::AccessDecision;

use super::{ok, ApiResult};
use crate::dto::NavigationParams;
use crate::middleware::AuthSession;

/// Always 200: a missing or dead session is a redirect decision, not an error.
pub async fn authorize(
    session: Option<AuthSession>,
    params: Result<Query<NavigationParams>, QueryRejection>,
) -> ApiResult<AccessDecision> {
    let Query(params) = params?;
    let session = session.map(|AuthSession(s)| s);
    ok(authorize_path(session.as_ref(), &params.path))
}
