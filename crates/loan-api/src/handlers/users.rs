//! Admin user management - /api/users

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    Json,
};
use loan_core::services::UserInfo;
use loan_shared::Paginated;
use uuid::Uuid;

use super::{created, ok, ApiResult, CreatedResult};
use crate::dto::{ChangeRoleRequest, CreateUserRequest, ListParams};
use crate::middleware::AuthSession;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Paginated<UserInfo>> {
    let Query(params) = params?;
    ok(state.users.list(&session, params.search(), params.pagination()).await?)
}

pub async fn create(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> CreatedResult<UserInfo> {
    let Json(payload) = payload?;
    created(
        state
            .users
            .create(&session, &payload.name, &payload.email, &payload.password, payload.role)
            .await?,
    )
}

pub async fn delete(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
) -> ApiResult<Uuid> {
    state.users.delete(&session, &id).await?;
    ok(id)
}

pub async fn change_role(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(id): Path<Uuid>,
    payload: Result<Json<ChangeRoleRequest>, JsonRejection>,
) -> ApiResult<UserInfo> {
    let Json(payload) = payload?;
    ok(state.users.change_role(&session, &id, payload.role).await?)
}
