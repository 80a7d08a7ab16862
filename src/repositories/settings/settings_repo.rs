//! 전역 설정 저장
//!
//! 설정은 `global_settings` 컬렉션의 단일 문서 `app` 에 저장됩니다.
//! 메타데이터(`version`, `last_updated`, `updated_by`)는 저장할 때만 붙고
//! 읽을 때 제거됩니다.

use std::sync::Arc;
use chrono::Utc;
use mongodb::bson::{self, Document};
use serde_json::{Map, Value};
use crate::core::errors::{AppError, AppResult};
use crate::db::DocumentStore;
use crate::domain::entities::settings::AppSettings;

pub const SETTINGS_COLLECTION: &str = "global_settings";
pub const SETTINGS_KEY: &str = "app";
pub const SETTINGS_VERSION: &str = "1.0";

const METADATA_FIELDS: [&str; 4] = ["_id", "version", "last_updated", "updated_by"];

pub struct SettingsRepository {
    store: Arc<dyn DocumentStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 저장된 설정 값 (메타데이터 제외). 문서가 없으면 `None`.
    ///
    /// 저장 시점의 필드만 담긴 부분 객체일 수 있으므로 기본값과의 병합은 호출자 몫입니다.
    pub async fn load(&self) -> AppResult<Option<Map<String, Value>>> {
        let Some(mut doc) = self.store.get(SETTINGS_COLLECTION, SETTINGS_KEY).await? else {
            return Ok(None);
        };

        for field in METADATA_FIELDS {
            doc.remove(field);
        }

        let value = serde_json::to_value(&doc)
            .map_err(|e| AppError::DatabaseError(format!("설정 문서 형식 오류: {}", e)))?;

        match value {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(AppError::DatabaseError("설정 문서가 객체가 아닙니다".to_string())),
        }
    }

    /// 설정 전체를 덮어씁니다.
    pub async fn save(&self, settings: &AppSettings, updated_by: &str) -> AppResult<()> {
        let mut doc: Document = bson::to_document(settings)
            .map_err(|e| AppError::InternalError(format!("설정 직렬화 실패: {}", e)))?;
        doc.insert("version", SETTINGS_VERSION);
        doc.insert("last_updated", Utc::now().to_rfc3339());
        doc.insert("updated_by", updated_by);

        self.store.set(SETTINGS_COLLECTION, SETTINGS_KEY, doc).await?;
        log::info!("전역 설정 저장 (updated_by={})", updated_by);
        Ok(())
    }
}
