use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::{AdminUser, CurrentUser};
use crate::blogs::dto::{BlogInput, BlogResponse, DeletedBlogResponse};
use crate::blogs::service;
use crate::error::ApiError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/getBlogs", get(list_blogs))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/addBlog", post(add_blog))
        .route("/admin/blogs", get(admin_blogs))
        .route(
            "/blogs/:id",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
}

#[instrument(skip_all)]
async fn list_blogs(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<BlogResponse>>, ApiError> {
    let blogs = service::list_all(&state.db).await?;
    Ok(Json(blogs))
}

#[instrument(skip(state, _user))]
async fn get_blog(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, ApiError> {
    let blog = service::get_by_id(&state.db, &id)
        .await?
        .ok_or(ApiError::NotFound("Blog post"))?;
    Ok(Json(blog))
}

#[instrument(skip(state, user, payload))]
async fn add_blog(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Json(payload): Json<BlogInput>,
) -> Result<(StatusCode, Json<BlogResponse>), ApiError> {
    let author_id = user.id.to_string();
    let blog = service::create(&state.db, &payload.title, &payload.content, &author_id).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

#[instrument(skip_all)]
async fn admin_blogs(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> Result<Json<Vec<BlogResponse>>, ApiError> {
    let author_id = user.id.to_string();
    let blogs = service::list_by_author(&state.db, &author_id).await?;
    Ok(Json(blogs))
}

#[instrument(skip(state, user, payload))]
async fn update_blog(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<BlogInput>,
) -> Result<Json<BlogResponse>, ApiError> {
    let target = service::get_by_id(&state.db, &id)
        .await?
        .ok_or(ApiError::NotFound("Blog post"))?;
    service::ensure_author(&target, user.id, "update")?;

    // Not atomic with the check above; a concurrent delete surfaces as 404.
    let updated = service::update(&state.db, &id, &payload.title, &payload.content)
        .await?
        .ok_or(ApiError::NotFound("Blog post"))?;
    Ok(Json(updated))
}

#[instrument(skip(state, user))]
async fn delete_blog(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<DeletedBlogResponse>, ApiError> {
    let target = service::get_by_id(&state.db, &id)
        .await?
        .ok_or(ApiError::NotFound("Blog post"))?;
    service::ensure_author(&target, user.id, "delete")?;

    let deleted = service::delete(&state.db, &id)
        .await?
        .ok_or(ApiError::NotFound("Blog post"))?;
    Ok(Json(DeletedBlogResponse {
        message: "Blog post removed",
        deleted_blog_id: deleted.id,
    }))
}
