//! Users Entity Module
//!
//! 비밀번호 인증과 OAuth 인증을 하나의 레코드로 묶는 `User` 엔티티와
//! 생성(`NewUser`) / 부분 수정(`UserUpdate`) 값, 역할(`UserRole`)을 정의합니다.
//!
//! ```rust,ignore
//! use admin_console_backend::domain::entities::users::{NewUser, UserRole};
//!
//! let new_user = NewUser::credentials("a@x.com", "Jane", "Doe", "Secret123!")
//!     .with_role(UserRole::Admin);
//! ```

pub mod user;

pub use user::{default_display_name, normalize_email, NewUser, User, UserRole, UserUpdate};
