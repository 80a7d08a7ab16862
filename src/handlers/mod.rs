//! actix-web HTTP 핸들러
//!
//! 핸들러는 `ServiceLocator` 에서 서비스를 꺼내 호출하고, 에러는 `AppError` 로
//! 전파해 `ResponseError` 가 응답으로 바꾸게 둡니다.

pub mod auth;
pub mod me;
pub mod settings;
pub mod users;
