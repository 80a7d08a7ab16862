//! 전역 애플리케이션 설정
//!
//! 순수 데이터 구조체입니다. 읽기 접근은 어떤 I/O 도 일으키지 않고, 저장소와의 동기화는
//! `SettingsService` 가 명시적으로 수행합니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::core::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // 애플리케이션 정보
    pub app_name: String,
    pub app_title: String,
    pub app_description: String,
    pub app_keywords: Vec<String>,
    pub app_author: String,
    pub app_version: String,
    pub app_url: String,

    // 인증
    pub allow_google_auth: bool,
    pub allow_new_user_registration: bool,
    pub require_email_verification: bool,
    pub allow_guest_mode: bool,
    /// 켜져 있으면 Google 로그인은 이미 가입된 이메일만 허용
    pub restrict_google_to_existing_users: bool,

    // 기능 플래그
    pub enable_dark_mode: bool,
    pub enable_multi_language: bool,
    pub enable_notifications: bool,
    pub enable_analytics: bool,

    // 소개 정보
    pub about_title: String,
    pub about_description: String,
    pub contact_email: String,
    pub support_url: String,
    pub privacy_policy_url: String,
    pub terms_of_service_url: String,

    // 고급
    /// 분 단위
    pub session_timeout: u32,
    pub max_login_attempts: u32,
    pub enable_maintenance_mode: bool,
    pub maintenance_message: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: "Admin Console".to_string(),
            app_title: "Admin Console - Internal Tools".to_string(),
            app_description: "Internal tools dashboard with user management and global settings".to_string(),
            app_keywords: vec![
                "admin".to_string(),
                "dashboard".to_string(),
                "tools".to_string(),
            ],
            app_author: "Your Company".to_string(),
            app_version: "1.0.0".to_string(),
            app_url: "https://your-app.com".to_string(),

            allow_google_auth: true,
            allow_new_user_registration: true,
            require_email_verification: false,
            allow_guest_mode: false,
            restrict_google_to_existing_users: false,

            enable_dark_mode: true,
            enable_multi_language: true,
            enable_notifications: true,
            enable_analytics: false,

            about_title: "About Admin Console".to_string(),
            about_description: "Authentication, user management and configurable dashboards for internal teams.".to_string(),
            contact_email: "support@your-app.com".to_string(),
            support_url: "https://your-app.com/support".to_string(),
            privacy_policy_url: "https://your-app.com/privacy".to_string(),
            terms_of_service_url: "https://your-app.com/terms".to_string(),

            session_timeout: 60,
            max_login_attempts: 5,
            enable_maintenance_mode: false,
            maintenance_message: "We are currently performing maintenance. Please check back later.".to_string(),
        }
    }
}

impl AppSettings {
    /// 부분 JSON 객체를 덮어쓴 새 설정을 돌려줍니다.
    ///
    /// 알 수 없는 키나 타입이 맞지 않는 값이 있으면 `ValidationError` 이고 원본은 그대로입니다.
    pub fn merged(&self, patch: &Value) -> AppResult<AppSettings> {
        let Value::Object(patch) = patch else {
            return Err(AppError::ValidationError(
                "설정은 JSON 객체여야 합니다".to_string(),
            ));
        };

        let mut base = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(AppError::InternalError("설정 직렬화 결과가 객체가 아닙니다".to_string())),
            Err(e) => return Err(AppError::InternalError(format!("설정 직렬화 실패: {}", e))),
        };

        let unknown: Vec<&str> = patch
            .keys()
            .filter(|key| !base.contains_key(key.as_str()))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::ValidationError(format!(
                "알 수 없는 설정 항목: {}",
                unknown.join(", ")
            )));
        }

        for (key, value) in patch {
            base.insert(key.clone(), value.clone());
        }

        let merged: AppSettings = serde_json::from_value(Value::Object(base))
            .map_err(|e| AppError::ValidationError(format!("설정 값 형식 오류: {}", e)))?;
        merged.validate()?;
        Ok(merged)
    }

    fn validate(&self) -> AppResult<()> {
        if self.app_name.trim().is_empty() {
            return Err(AppError::ValidationError("app_name 은 비어 있을 수 없습니다".to_string()));
        }
        if self.session_timeout == 0 {
            return Err(AppError::ValidationError("session_timeout 은 1분 이상이어야 합니다".to_string()));
        }
        if self.max_login_attempts == 0 {
            return Err(AppError::ValidationError("max_login_attempts 는 1 이상이어야 합니다".to_string()));
        }
        Ok(())
    }
}
