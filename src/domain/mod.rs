//! # Domain Layer Module
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - 영속 객체 (User, AppSettings)
//! ├── dto       - HTTP 요청/응답 계약
//! └── models    - 토큰 클레임, 인증된 호출자, 외부 신원 정보
//! ```
//!
//! 영속성과 HTTP 의 세부 사항은 각각 `repositories`, `handlers` 가 맡고
//! 이 계층은 데이터 형태와 그 자체로 판단 가능한 규칙만 가집니다.

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::{AppSettings, NewUser, User, UserRole, UserUpdate};
pub use models::{AuthenticatedUser, IdentityAssertion, TokenClaims, TokenPair};
