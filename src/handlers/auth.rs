//! 인증 핸들러 (`/api/v1/auth`)

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::config::AuthProvider;
use crate::core::errors::AppError;
use crate::core::registry::ServiceLocator;
use crate::domain::dto::users::request::{
    CreateUserRequest, LocalLoginRequest, OAuthCallbackQuery, RefreshTokenRequest,
};
use crate::domain::dto::users::response::{LoginResponse, UserSession};
use crate::repositories::users::UserRepository;
use crate::services::auth::{SignInService, TokenService};

fn login_response(session: UserSession) -> Result<LoginResponse, AppError> {
    let token_service = ServiceLocator::get::<TokenService>()?;
    let tokens = token_service.generate_token_pair(&session)?;
    Ok(LoginResponse::new(session, tokens))
}

#[post("/signup")]
pub async fn signup(
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let sign_in = ServiceLocator::get::<SignInService>()?;
    let session = sign_in.sign_up(payload.into_inner().into_self_signup()).await?;

    Ok(HttpResponse::Created().json(login_response(session)?))
}

#[post("/login")]
pub async fn local_login(
    payload: web::Json<LocalLoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let sign_in = ServiceLocator::get::<SignInService>()?;
    let session = sign_in
        .sign_in_with_credentials(&payload.email, &payload.password)
        .await?;

    Ok(HttpResponse::Ok().json(login_response(session)?))
}

#[get("/google/login")]
pub async fn google_login_url() -> Result<HttpResponse, AppError> {
    let sign_in = ServiceLocator::get::<SignInService>()?;
    let url_response = sign_in.oauth_login_url(AuthProvider::Google).await?;

    Ok(HttpResponse::Ok().json(url_response))
}

#[get("/google/callback")]
pub async fn google_oauth_callback(
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    // 사용자가 동의를 거부했거나 제공자 쪽 에러
    if let Some(error) = &query.error {
        let error_msg = query.error_description
            .as_deref()
            .unwrap_or("OAuth 인증이 취소되었거나 실패했습니다");
        log::warn!("Google OAuth 에러: {} - {}", error, error_msg);
        return Err(AppError::AuthenticationError(error_msg.to_string()));
    }

    let (Some(code), Some(state)) = (query.code.as_deref(), query.state.as_deref()) else {
        return Err(AppError::ValidationError("code 와 state 가 필요합니다".to_string()));
    };

    let sign_in = ServiceLocator::get::<SignInService>()?;
    let session = sign_in
        .complete_oauth(AuthProvider::Google, code, state)
        .await?;

    Ok(HttpResponse::Ok().json(login_response(session)?))
}

#[post("/verify")]
pub async fn verify_token(
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let token_service = ServiceLocator::get::<TokenService>()?;

    let auth_header = req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    let token = token_service.extract_bearer_token(auth_header)?;
    let claims = token_service.verify_access_token(token)?;

    Ok(HttpResponse::Ok().json(json!({
        "valid": true,
        "user_id": claims.sub,
        "email": claims.email,
        "role": claims.role,
        "expires_at": claims.exp
    })))
}

/// 리프레시 토큰으로 새 토큰 쌍 발급. 사용자를 다시 읽어 비활성 계정은 거절합니다.
#[post("/refresh")]
pub async fn refresh_tokens(
    payload: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let token_service = ServiceLocator::get::<TokenService>()?;
    let user_repo = ServiceLocator::get::<UserRepository>()?;

    let claims = token_service.verify_refresh_token(&payload.refresh_token)?;
    let user = user_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::AuthenticationError("사용자를 찾을 수 없습니다".to_string()))?;

    if !user.is_active {
        return Err(AppError::AccountDisabled);
    }

    Ok(HttpResponse::Ok().json(login_response(UserSession::from(user))?))
}
