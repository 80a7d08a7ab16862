//! # Configuration Module
//!
//! 인프라 설정(저장소 연결, 서버 바인딩, 토큰 비밀키, OAuth 클라이언트 정보)을
//! 환경 변수에서 읽는 정적 접근자 모음입니다. `.env.{profile}` 파일은 `main` 에서 로드됩니다.
//!
//! 관리자가 화면에서 바꾸는 전역 애플리케이션 설정(`AppSettings`)은 여기가 아니라
//! 문서 저장소에 있으며 [`crate::services::settings::SettingsService`] 가 동기화합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 저장소, 서버, 요청 제한, 비밀번호 해싱
//! - [`auth_config`] - JWT, OAuth state, Google OAuth, 인증 프로바이더
//!
//! ```rust,ignore
//! use admin_console_backend::config::{Environment, ServerConfig, StorageConfig};
//!
//! let env = Environment::current();
//! let address = ServerConfig::bind_address();
//! let backend = StorageConfig::backend();
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
