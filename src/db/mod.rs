//! Document Store Module
//!
//! 사용자 레코드와 전역 설정이 저장되는 문서 저장소 계층입니다.
//!
//! - [`DocumentStore`] - get / query / list / insert / set / update / delete 계약
//! - [`MongoDocumentStore`] - MongoDB 구현 (운영)
//! - [`InMemoryDocumentStore`] - 메모리 구현 (개발, 테스트)
//!
//! # 환경 변수
//!
//! ```bash
//! export DOCUMENT_STORE="mongodb"        # 또는 memory
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="admin_console_dev"
//! ```
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use admin_console_backend::db::{DocumentStore, MongoDocumentStore};
//!
//! let store: Arc<dyn DocumentStore> = Arc::new(MongoDocumentStore::connect().await?);
//! store.ensure_unique_index("users", "email").await?;
//! ```

pub mod document_store;
pub mod memory_store;
pub mod mongo_store;

pub use document_store::{DocumentStore, StoreError};
pub use memory_store::InMemoryDocumentStore;
pub use mongo_store::MongoDocumentStore;
