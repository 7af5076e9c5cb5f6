use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::{
        models::{AvatarUpload, ProfileChanges, ProfileView},
        AvatarError,
    },
    routes::ApiError,
};

const AVATAR_FIELD: &str = "avatar";
// Allow multipart overhead while keeping the actual avatar payload policy at 5 MiB.
const AVATAR_UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me/avatar",
            post(upload_my_avatar).delete(delete_my_avatar),
        )
        .route_layer(DefaultBodyLimit::max(AVATAR_UPLOAD_BODY_LIMIT))
        .route("/me", get(my_profile).patch(update_my_profile))
}

#[instrument(name = "GET /users/me", skip(app_state))]
async fn my_profile(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = app_state.avatar_service.get_profile(&user.id).await?;

    Ok(Json(profile))
}

#[instrument(name = "PATCH /users/me", skip(app_state, changes))]
async fn update_my_profile(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(changes): Json<ProfileChanges>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = app_state
        .avatar_service
        .update_profile(&user.id, changes)
        .await?;

    Ok(Json(profile))
}

#[instrument(name = "POST /users/me/avatar", skip(app_state, multipart))]
async fn upload_my_avatar(
    user: AuthUser,
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProfileView>, ApiError> {
    let upload = extract_avatar_from_multipart(&mut multipart).await?;

    let profile = app_state
        .avatar_service
        .upload_avatar(&user.id, upload)
        .await?;

    Ok(Json(profile))
}

#[instrument(name = "DELETE /users/me/avatar", skip(app_state))]
async fn delete_my_avatar(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = app_state.avatar_service.remove_avatar(&user.id).await?;

    Ok(Json(profile))
}

/// Bodies cut off by the body limit count as oversized avatars.
fn multipart_error(err: MultipartError, message: &str) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AvatarError::FileTooLarge.into();
    }

    tracing::debug!("rejected multipart body: {}", err.body_text());
    ApiError::bad_request(message)
}

/// Returns `None` when the form has no `avatar` field; the service decides
/// how to report that.
async fn extract_avatar_from_multipart(
    multipart: &mut Multipart,
) -> Result<Option<AvatarUpload>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_error(err, "failed to parse multipart field"))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| multipart_error(err, "failed to read avatar payload"))?;

        let upload = AvatarUpload::new(bytes.to_vec(), content_type);
        return Ok(Some(match file_name {
            Some(file_name) => upload.with_file_name(file_name),
            None => upload,
        }));
    }

    Ok(None)
}
