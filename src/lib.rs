//! 관리자 콘솔 백엔드
//!
//! 사내 관리자 콘솔의 인증과 사용자 관리를 담당하는 서비스입니다.
//!
//! # Features
//!
//! - **로그인**: 이메일/비밀번호, Google OAuth 2.0
//! - **계정 조정**: OAuth 로그인 시 기존 계정 연결, 신규 계정 생성, 가입 제한
//! - **접근 제어**: 역할별로 보이는 사용자 범위와 부여 가능한 역할 제한
//! - **전역 설정**: 가입 허용 여부 등 관리자 설정의 저장, 내보내기, 가져오기
//! - **세션**: JWT 액세스/리프레시 토큰
//!
//! # Architecture
//!
//! ```text
//! routes ─ AuthMiddleware (세션 토큰 → AuthenticatedUser)
//!   └─ handlers
//!        ├─ SignInService   ── plan_oauth (계정 조정 결정)
//!        ├─ UserService     ── access_policy (가시 범위, 역할 부여)
//!        └─ SettingsService
//!             └─ UserRepository / SettingsRepository
//!                  └─ DocumentStore (MongoDB | memory)
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use admin_console_backend::core::registry::ServiceLocator;
//! use admin_console_backend::services::auth::SignInService;
//!
//! let sign_in = ServiceLocator::get::<SignInService>()?;
//! let session = sign_in.sign_in_with_credentials("admin@example.com", "Password123").await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
