//! # Application Error Handling
//!
//! 서비스 전체에서 쓰는 단일 에러 타입입니다. 리포지토리와 서비스는 예상 가능한 실패
//! (잘못된 자격 증명, 중복 이메일, 권한 부족 등)를 `AppResult` 로 돌려주고,
//! 핸들러는 `?` 로 전파하기만 하면 `ResponseError` 구현이 HTTP 응답으로 바꿉니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status | 코드 |
//! |----------|-------------|------|
//! | `InvalidCredentials` | 401 | `invalid_credentials` |
//! | `AuthenticationError` | 401 | `authentication_required` |
//! | `AccountDisabled` | 403 | `account_disabled` |
//! | `NotAllowed` | 403 | `not_allowed` |
//! | `Forbidden` | 403 | `forbidden` |
//! | `NotFound` | 404 | `not_found` |
//! | `DuplicateEmail` | 409 | `duplicate_email` |
//! | `ValidationError` | 400 | `validation_error` |
//! | `ProviderError` | 502 | `provider_error` |
//! | `DatabaseError` | 500 | `database_error` |
//! | `InternalError` | 500 | `internal_error` |
//!
//! 응답 본문은 항상 `{"error": <코드>, "message": <설명>}` 입니다.
//! `InvalidCredentials` 의 메시지는 "없는 사용자"와 "틀린 비밀번호"를 구분하지 않습니다.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Sign-in not allowed: {0}")]
    NotAllowed(String),

    /// 식별 공급자 또는 저장소 호출이 예기치 않게 실패함
    #[error("Upstream provider error: {0}")]
    ProviderError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 세션 토큰이 없거나 유효하지 않음
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 응답 본문과 로그에 쓰이는 안정적인 에러 종류 식별자
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::AccountDisabled => "account_disabled",
            AppError::DuplicateEmail(_) => "duplicate_email",
            AppError::NotAllowed(_) => "not_allowed",
            AppError::ProviderError(_) => "provider_error",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::ValidationError(_) => "validation_error",
            AppError::AuthenticationError(_) => "authentication_required",
            AppError::DatabaseError(_) => "database_error",
            AppError::InternalError(_) => "internal_error",
        }
    }

    /// 서버 내부 사정을 노출하지 않아야 하는 에러인지
    fn is_internal(&self) -> bool {
        matches!(self, AppError::DatabaseError(_) | AppError::InternalError(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::AuthenticationError(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AccountDisabled | AppError::NotAllowed(_) | AppError::Forbidden(_) => {
                StatusCode::FORBIDDEN
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ProviderError(_) => StatusCode::BAD_GATEWAY,
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            log::error!("{}", self);
            "서버 내부 오류가 발생했습니다".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.code(),
            "message": message
        }))
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
