//! 사용자 데이터 액세스 계층
//!
//! [`UserRepository`](user_repo::UserRepository) 는 `DocumentStore` 위에서 동작하며
//! `main` 에서 생성되어 `ServiceLocator` 에 등록됩니다.

pub mod user_repo;

pub use user_repo::UserRepository;
