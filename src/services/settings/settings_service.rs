//! 전역 설정 동기화 서비스
//!
//! `AppSettings` 는 순수 데이터이고, 저장소와의 읽기/쓰기는 전부 이 서비스의
//! 명시적인 호출로만 일어납니다.

use std::sync::Arc;
use serde_json::{Map, Value};
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::settings::AppSettings;
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::settings::SettingsRepository;

pub struct SettingsService {
    repo: Arc<SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<SettingsRepository>) -> Self {
        Self { repo }
    }

    /// 기본값 위에 저장된 값을 덮어쓴 현재 설정
    ///
    /// 더 이상 쓰지 않는 저장 필드는 무시합니다.
    pub async fn load(&self) -> AppResult<AppSettings> {
        let defaults = AppSettings::default();
        let Some(stored) = self.repo.load().await? else {
            return Ok(defaults);
        };

        let known = known_keys(&defaults)?;
        let (kept, dropped): (Map<String, Value>, Map<String, Value>) =
            stored.into_iter().partition(|(key, _)| known.contains_key(key));
        if !dropped.is_empty() {
            log::warn!(
                "알 수 없는 저장 설정 항목 무시: {}",
                dropped.keys().cloned().collect::<Vec<_>>().join(", ")
            );
        }

        defaults.merged(&Value::Object(kept)).map_err(|e| {
            log::error!("저장된 설정이 올바르지 않습니다: {}", e);
            AppError::DatabaseError(format!("저장된 설정이 올바르지 않습니다: {}", e))
        })
    }

    /// 부분 수정. 알 수 없는 키나 잘못된 타입은 `ValidationError`.
    pub async fn update(&self, caller: &AuthenticatedUser, patch: &Value) -> AppResult<AppSettings> {
        ensure_can_manage(caller)?;

        let updated = self.load().await?.merged(patch)?;
        self.repo.save(&updated, &caller.email).await?;
        Ok(updated)
    }

    pub async fn reset_to_defaults(&self, caller: &AuthenticatedUser) -> AppResult<AppSettings> {
        ensure_can_manage(caller)?;

        let defaults = AppSettings::default();
        self.repo.save(&defaults, &caller.email).await?;
        log::info!("전역 설정 초기화 (by {})", caller.email);
        Ok(defaults)
    }

    /// 현재 설정을 사람이 읽기 좋은 JSON 으로
    pub async fn export(&self) -> AppResult<String> {
        let settings = self.load().await?;
        serde_json::to_string_pretty(&settings)
            .map_err(|e| AppError::InternalError(format!("설정 내보내기 실패: {}", e)))
    }

    /// 내보낸 JSON 을 현재 설정 위에 적용합니다.
    pub async fn import(&self, caller: &AuthenticatedUser, json: &str) -> AppResult<AppSettings> {
        let mut value: Value = serde_json::from_str(json)
            .map_err(|e| AppError::ValidationError(format!("설정 JSON 형식 오류: {}", e)))?;

        if let Value::Object(map) = &mut value {
            for field in ["version", "last_updated", "updated_by"] {
                map.remove(field);
            }
        }

        self.update(caller, &value).await
    }
}

fn ensure_can_manage(caller: &AuthenticatedUser) -> AppResult<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("설정 변경 권한이 없습니다".to_string()))
    }
}

fn known_keys(defaults: &AppSettings) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(defaults) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::InternalError("설정 직렬화 결과가 객체가 아닙니다".to_string())),
        Err(e) => Err(AppError::InternalError(format!("설정 직렬화 실패: {}", e))),
    }
}
