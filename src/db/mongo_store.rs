//! MongoDB 문서 저장소
//!
//! 각 컬렉션을 `Collection<Document>` 로 다루며 키는 `_id` 문자열입니다.
//! 유니크 제약은 MongoDB 유니크 인덱스로 걸리고, 중복 키 쓰기 오류(11000)는
//! `StoreError::DuplicateKey` 로 바뀝니다.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::info;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use crate::config::StorageConfig;
use crate::db::document_store::{DocumentStore, StoreError};

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    /// `StorageConfig` 의 URI / 데이터베이스 이름으로 연결하고 ping 으로 확인합니다.
    pub async fn connect() -> Result<Self, StoreError> {
        let uri = StorageConfig::mongodb_uri();
        let database_name = StorageConfig::database_name();

        let mut options = ClientOptions::parse(&uri).await.map_err(backend)?;
        options.app_name = Some(StorageConfig::app_name());

        let client = Client::with_options(options).map_err(backend)?;
        let database = client.database(&database_name);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend)?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self { database })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one(doc! { "_id": key })
            .await
            .map_err(backend)
    }

    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> Result<Vec<Document>, StoreError> {
        let mut filter = Document::new();
        filter.insert(field, value);

        let cursor = self.collection(collection)
            .find(filter)
            .await
            .map_err(backend)?;

        cursor.try_collect().await.map_err(backend)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection(collection)
            .find(doc! {})
            .await
            .map_err(backend)?;

        cursor.try_collect().await.map_err(backend)
    }

    async fn insert(&self, collection: &str, key: &str, mut doc: Document) -> Result<(), StoreError> {
        doc.insert("_id", key);

        self.collection(collection)
            .insert_one(doc)
            .await
            .map(|_| ())
            .map_err(write_error)
    }

    async fn set(&self, collection: &str, key: &str, mut doc: Document) -> Result<(), StoreError> {
        doc.insert("_id", key);

        self.collection(collection)
            .replace_one(doc! { "_id": key }, doc)
            .upsert(true)
            .await
            .map(|_| ())
            .map_err(write_error)
    }

    async fn update(
        &self,
        collection: &str,
        key: &str,
        mut partial: Document,
    ) -> Result<bool, StoreError> {
        partial.remove("_id");
        if partial.is_empty() {
            return Ok(self.get(collection, key).await?.is_some());
        }

        let result = self.collection(collection)
            .update_one(doc! { "_id": key }, doc! { "$set": partial })
            .await
            .map_err(write_error)?;

        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<bool, StoreError> {
        let result = self.collection(collection)
            .delete_one(doc! { "_id": key })
            .await
            .map_err(backend)?;

        Ok(result.deleted_count > 0)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut keys = Document::new();
        keys.insert(field, 1);

        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder()
                .unique(true)
                .name(format!("{}_unique", field))
                .build())
            .build();

        self.collection(collection)
            .create_index(index)
            .await
            .map_err(backend)?;

        info!("🔑 유니크 인덱스 확인: {}.{}", collection, field);
        Ok(())
    }
}

fn backend(err: MongoError) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn write_error(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            StoreError::DuplicateKey(write_error.message.clone())
        }
        _ => backend(err),
    }
}
