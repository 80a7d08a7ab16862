//! # Core Module
//!
//! 애플리케이션 전역에서 쓰이는 두 가지 기반 기능을 제공합니다.
//!
//! ### [`errors`] - 통합 에러 처리
//! - `AppError`: 도메인 실패(자격 증명, 중복 이메일, 권한)와 인프라 실패를 한 타입으로 표현
//! - actix-web `ResponseError` 구현으로 핸들러에서 `?` 만으로 HTTP 응답 변환
//!
//! ### [`registry`] - 서비스 레지스트리
//! - `ServiceLocator`: `main` 에서 조립한 서비스를 타입 키로 보관
//!
//! ```rust,ignore
//! use admin_console_backend::core::{AppError, AppResult, ServiceLocator};
//!
//! async fn handler() -> Result<HttpResponse, AppError> {
//!     let users = ServiceLocator::get::<UserService>()?;
//!     // ...
//! }
//! ```

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
