//! 사용자 관리 핸들러 (`/api/v1/users`, admin/superadmin)

use actix_web::{delete, get, patch, post, web, HttpResponse};
use validator::Validate;
use crate::core::errors::AppError;
use crate::core::registry::ServiceLocator;
use crate::domain::dto::users::request::{CreateUserRequest, UpdateUserRequest, UserListQuery};
use crate::domain::dto::users::response::UserResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::users::UserService;

#[get("")]
pub async fn list_users(
    caller: AuthenticatedUser,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<UserService>()?;
    let page = service.list_users_page(&caller, &query).await?;

    Ok(HttpResponse::Ok().json(page))
}

#[get("/stats")]
pub async fn user_stats(
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<UserService>()?;
    let stats = service.user_stats(&caller).await?;

    Ok(HttpResponse::Ok().json(stats))
}

#[post("")]
pub async fn create_user(
    caller: AuthenticatedUser,
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = ServiceLocator::get::<UserService>()?;
    let user = service
        .create_user_as(&caller, payload.into_inner().into_new_user())
        .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[get("/{user_id}")]
pub async fn get_user(
    caller: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<UserService>()?;
    let user = service.get_user_as(&caller, &user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[patch("/{user_id}")]
pub async fn update_user(
    caller: AuthenticatedUser,
    user_id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = ServiceLocator::get::<UserService>()?;
    let user = service
        .update_user(&user_id, payload.into_inner().into(), &caller)
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[post("/{user_id}/activate")]
pub async fn activate_user(
    caller: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<UserService>()?;
    let user = service.set_user_active_as(&caller, &user_id, true).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[post("/{user_id}/deactivate")]
pub async fn deactivate_user(
    caller: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<UserService>()?;
    let user = service.set_user_active_as(&caller, &user_id, false).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// 소프트 삭제: 레코드는 남기고 비활성화만 합니다.
#[delete("/{user_id}")]
pub async fn delete_user(
    caller: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<UserService>()?;
    service.set_user_active_as(&caller, &user_id, false).await?;

    Ok(HttpResponse::NoContent().finish())
}
