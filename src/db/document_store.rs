//! 문서 저장소 추상화
//!
//! 리포지토리는 이 트레이트만 알고, 실제 저장 위치(MongoDB / 메모리)는 `main` 에서 정합니다.
//! 키는 불투명한 문자열이며 저장된 문서의 `_id` 필드에 그대로 들어갑니다.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use thiserror::Error;

/// 저장소 계층 에러
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// 같은 키 또는 유니크 인덱스 값이 이미 존재함
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("document store failure: {0}")]
    Backend(String),
}

/// 컬렉션 단위 문서 저장소
///
/// 모든 연산은 단일 문서 단위로 원자적입니다. 여러 문서에 걸친 트랜잭션은 없습니다.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 키로 문서를 조회합니다. 반환 문서에는 `_id` 가 포함됩니다.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError>;

    /// `field == value` 인 문서들을 조회합니다.
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> Result<Vec<Document>, StoreError>;

    /// 컬렉션의 모든 문서
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// 새 문서를 만듭니다. 키나 유니크 인덱스 값이 겹치면 `DuplicateKey`.
    async fn insert(&self, collection: &str, key: &str, doc: Document) -> Result<(), StoreError>;

    /// 문서 전체를 쓰거나 교체합니다 (upsert).
    async fn set(&self, collection: &str, key: &str, doc: Document) -> Result<(), StoreError>;

    /// 주어진 필드만 병합합니다. 키가 없으면 `Ok(false)`.
    async fn update(
        &self,
        collection: &str,
        key: &str,
        partial: Document,
    ) -> Result<bool, StoreError>;

    /// 키가 없으면 `Ok(false)`.
    async fn delete(&self, collection: &str, key: &str) -> Result<bool, StoreError>;

    /// `field` 에 유니크 제약을 겁니다. 이미 있으면 아무것도 하지 않습니다.
    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError>;
}

impl From<StoreError> for crate::core::errors::AppError {
    fn from(err: StoreError) -> Self {
        crate::core::errors::AppError::DatabaseError(err.to_string())
    }
}
