//! # Domain Models Module
//!
//! 영속되지 않는 도메인 값 객체를 모아 둔 모듈입니다.
//!
//! ```text
//! models/
//! ├── auth/    ← 인증된 호출자, 라우트 인증 요구사항
//! ├── oauth/   ← 외부 신원 제공자 응답과 공통 신원 정보
//! └── token/   ← JWT 클레임과 토큰 쌍
//! ```

pub mod auth;
pub mod oauth;
pub mod token;

pub use auth::*;
pub use oauth::*;
pub use token::*;
