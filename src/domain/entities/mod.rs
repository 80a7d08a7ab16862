//! # Domain Entities Module
//!
//! 문서 저장소에 영속되는 핵심 엔티티입니다.
//!
//! ```text
//! entities/
//! ├── users/      ← User, NewUser, UserUpdate, UserRole
//! └── settings/   ← AppSettings (전역 설정)
//! ```
//!
//! 엔티티는 serde 로 BSON 문서와 상호 변환되며 필드 이름은 snake_case 그대로 저장됩니다.
//! 사용자 문서의 `_id` 는 UUID v7 문자열이고, `email` 에는 유니크 인덱스가 걸립니다.

pub mod users;
pub mod settings;

pub use users::*;
pub use settings::*;
