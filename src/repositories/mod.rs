//! 문서 저장소 위의 리포지토리 계층

pub mod settings;
pub mod users;
