//! 사용자 관리 서비스
//!
//! - [`access_policy`]: 누가 누구를 보고 관리할 수 있는지 (순수 함수)
//! - [`user_service`]: 목록, 통계, 생성, 수정, 활성화

pub mod access_policy;
pub mod user_service;

pub use user_service::UserService;
