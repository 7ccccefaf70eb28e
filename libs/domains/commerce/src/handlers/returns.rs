use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, JwtClaims, MessageResponse, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::caller;
use crate::models::{
    CreateReturn, ReturnEvent, ReturnFilter, ReturnItem, ReturnRequest, ReturnStatus,
    UpdateReturn,
};
use crate::repository::ReturnRepository;
use crate::service::ReturnService;

#[derive(OpenApi)]
#[openapi(
    paths(list_returns, get_return, create_return, update_return, delete_return),
    components(
        schemas(
            ReturnRequest,
            ReturnStatus,
            ReturnItem,
            ReturnEvent,
            CreateReturn,
            UpdateReturn,
            MessageResponse
        ),
        responses(
            BadRequestUuidResponse,
            BadRequestValidationResponse,
            NotFoundResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Returns", description = "Return requests and their history")
    ),
    security(("bearer_auth" = []))
)]
pub struct ApiDoc;

pub fn router<R: ReturnRepository + 'static>(service: ReturnService<R>) -> Router {
    Router::new()
        .route("/", get(list_returns::<R>).post(create_return::<R>))
        .route(
            "/{id}",
            get(get_return::<R>)
                .patch(update_return::<R>)
                .delete(delete_return::<R>),
        )
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = "Returns",
    params(ReturnFilter),
    responses(
        (status = 200, description = "Matching return requests", body = Vec<ReturnRequest>),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_returns<R: ReturnRepository>(
    State(service): State<Arc<ReturnService<R>>>,
    Query(filter): Query<ReturnFilter>,
) -> Result<Json<Vec<ReturnRequest>>, AppError> {
    Ok(Json(service.list_returns(filter).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Returns",
    params(("id" = Uuid, Path, description = "Return ID")),
    responses(
        (status = 200, description = "Return request found", body = ReturnRequest),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_return<R: ReturnRepository>(
    State(service): State<Arc<ReturnService<R>>>,
    UuidPath(id): UuidPath,
) -> Result<Json<ReturnRequest>, AppError> {
    Ok(Json(service.get_return(id).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Returns",
    request_body = CreateReturn,
    responses(
        (status = 201, description = "Return requested", body = ReturnRequest),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn create_return<R: ReturnRepository>(
    State(service): State<Arc<ReturnService<R>>>,
    claims: JwtClaims,
    ValidatedJson(input): ValidatedJson<CreateReturn>,
) -> Result<impl IntoResponse, AppError> {
    let request = service.create_return(input, caller(&claims)?).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Update a return; a status change is appended to its history
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Returns",
    params(("id" = Uuid, Path, description = "Return ID")),
    request_body = UpdateReturn,
    responses(
        (status = 200, description = "Return updated", body = ReturnRequest),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn update_return<R: ReturnRepository>(
    State(service): State<Arc<ReturnService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateReturn>,
) -> Result<Json<ReturnRequest>, AppError> {
    Ok(Json(service.update_return(id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Returns",
    params(("id" = Uuid, Path, description = "Return ID")),
    responses(
        (status = 200, description = "Return deleted", body = MessageResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_return<R: ReturnRepository>(
    State(service): State<Arc<ReturnService<R>>>,
    UuidPath(id): UuidPath,
) -> Result<Json<MessageResponse>, AppError> {
    service.delete_return(id).await?;
    Ok(Json(MessageResponse::new("Return deleted successfully")))
}
