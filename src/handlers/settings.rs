//! 전역 설정 핸들러 (`/api/v1/settings`)
//!
//! 조회는 로그인한 사용자 모두, 나머지는 admin/superadmin 만 가능합니다.

use actix_web::{get, post, put, web, HttpResponse};
use serde_json::Value;
use crate::core::errors::AppError;
use crate::core::registry::ServiceLocator;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::settings::SettingsService;

/// 로그인한 모든 사용자가 읽을 수 있음
#[get("")]
pub async fn get_settings(
    _caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<SettingsService>()?;
    let settings = service.load().await?;

    Ok(HttpResponse::Ok().json(settings))
}

#[put("")]
pub async fn update_settings(
    caller: AuthenticatedUser,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<SettingsService>()?;
    let settings = service.update(&caller, &payload).await?;

    Ok(HttpResponse::Ok().json(settings))
}

#[post("/reset")]
pub async fn reset_settings(
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<SettingsService>()?;
    let settings = service.reset_to_defaults(&caller).await?;

    Ok(HttpResponse::Ok().json(settings))
}

#[get("/export")]
pub async fn export_settings(
    caller: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    if !caller.is_admin() {
        return Err(AppError::Forbidden("설정 내보내기 권한이 없습니다".to_string()));
    }

    let service = ServiceLocator::get::<SettingsService>()?;
    let exported = service.export().await?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(("Content-Disposition", "attachment; filename=\"settings.json\""))
        .body(exported))
}

/// 본문은 내보내기로 받은 JSON 그대로
#[post("/import")]
pub async fn import_settings(
    caller: AuthenticatedUser,
    body: String,
) -> Result<HttpResponse, AppError> {
    let service = ServiceLocator::get::<SettingsService>()?;
    let settings = service.import(&caller, &body).await?;

    Ok(HttpResponse::Ok().json(settings))
}
