//! 메모리 문서 저장소
//!
//! 모든 데이터는 프로세스 메모리에 있고 종료 시 사라집니다. `DOCUMENT_STORE=memory`
//! 개발 모드와 단위 테스트에서 사용합니다. 유니크 인덱스는 쓰기 잠금 안에서 검사하므로
//! 동시 생성 경쟁에서도 한 건만 성공합니다.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use crate::db::document_store::{DocumentStore, StoreError};

#[derive(Default)]
struct Inner {
    /// 컬렉션 -> (키 -> 문서). 키 순서로 순회합니다.
    collections: HashMap<String, BTreeMap<String, Document>>,
    /// 컬렉션 -> 유니크 필드
    unique_fields: HashMap<String, HashSet<String>>,
}

impl Inner {
    fn check_unique(&self, collection: &str, key: &str, doc: &Document) -> Result<(), StoreError> {
        let (Some(fields), Some(docs)) = (
            self.unique_fields.get(collection),
            self.collections.get(collection),
        ) else {
            return Ok(());
        };

        for field in fields {
            let Some(value) = doc.get(field).filter(|v| !matches!(v, Bson::Null)) else {
                continue;
            };

            let taken = docs
                .iter()
                .any(|(other_key, other)| other_key != key && other.get(field) == Some(value));

            if taken {
                return Err(StoreError::DuplicateKey(format!("{}.{} = {}", collection, field, value)));
            }
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.read()
            .collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self.read()
            .collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.get(field) == Some(&value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self.read()
            .collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, key: &str, mut doc: Document) -> Result<(), StoreError> {
        doc.insert("_id", key);

        let mut inner = self.write();
        let exists = inner.collections
            .get(collection)
            .is_some_and(|docs| docs.contains_key(key));
        if exists {
            return Err(StoreError::DuplicateKey(format!("{}._id = {}", collection, key)));
        }
        inner.check_unique(collection, key, &doc)?;

        inner.collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), doc);
        Ok(())
    }

    async fn set(&self, collection: &str, key: &str, mut doc: Document) -> Result<(), StoreError> {
        doc.insert("_id", key);

        let mut inner = self.write();
        inner.check_unique(collection, key, &doc)?;
        inner.collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), doc);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        mut partial: Document,
    ) -> Result<bool, StoreError> {
        partial.remove("_id");

        let mut inner = self.write();
        let Some(mut merged) = inner.collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned()
        else {
            return Ok(false);
        };

        for (field, value) in partial {
            merged.insert(field, value);
        }
        inner.check_unique(collection, key, &merged)?;

        inner.collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), merged);
        Ok(true)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        Ok(self.write()
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(key))
            .is_some())
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut inner = self.write();

        if let Some(docs) = inner.collections.get(collection) {
            let mut seen = HashSet::new();
            for doc in docs.values() {
                if let Some(value) = doc.get(field).filter(|v| !matches!(v, Bson::Null)) {
                    if !seen.insert(value.to_string()) {
                        return Err(StoreError::Backend(format!(
                            "기존 문서가 {}.{} 유니크 제약을 위반합니다",
                            collection, field
                        )));
                    }
                }
            }
        }

        inner.unique_fields
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string());
        Ok(())
    }
}
