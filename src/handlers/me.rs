//! 본인 프로필 핸들러 (`/api/v1/me`)

use actix_web::{get, patch, web, HttpResponse};
use validator::Validate;
use crate::core::errors::AppError;
use crate::core::registry::ServiceLocator;
use crate::domain::dto::users::request::UpdateUserRequest;
use crate::domain::dto::users::response::UserResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::users::UserService;

#[get("")]
pub async fn get_me(
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<UserService>()?;
    let user = service.get_self(&caller).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[patch("")]
pub async fn update_me(
    caller: AuthenticatedUser,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = ServiceLocator::get::<UserService>()?;
    let user = service
        .update_user(&caller.user_id, payload.into_inner().into(), &caller)
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
