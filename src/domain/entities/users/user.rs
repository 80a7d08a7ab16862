//! User Entity Implementation
//!
//! 비밀번호 로그인과 OAuth 로그인이 같은 레코드를 공유하는 사용자 모델입니다.
//! 저장 키는 시간 순서를 갖는 UUID v7 `id` 하나뿐이며, 이메일은 유니크 인덱스가 걸린
//! 일반 속성입니다.

use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::config::AuthProvider;

/// 사용자 역할
///
/// 선언 순서가 권한 순서입니다: `Guest < User < Admin < Superadmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Guest,
    User,
    Admin,
    Superadmin,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Guest,
        UserRole::User,
        UserRole::Admin,
        UserRole::Superadmin,
    ];

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "guest" => Ok(UserRole::Guest),
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            "superadmin" => Ok(UserRole::Superadmin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Guest => "guest",
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::Superadmin => "superadmin",
        }
    }

    /// 가입 시 부여되는, guest 를 제외한 가장 낮은 역할
    pub fn lowest_registered() -> Self {
        UserRole::User
    }

    /// 관리 화면 접근이 가능한 역할인지
    pub fn is_administrative(&self) -> bool {
        *self >= UserRole::Admin
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 사용자 엔티티
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    /// 소문자로 정규화된 이메일 (unique)
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    /// `providers` 에 credentials 가 있을 때만 존재
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// 인증 수단 목록. 늘어나기만 하고 줄어들지 않습니다.
    pub providers: Vec<AuthProvider>,
    pub role: UserRole,
    pub is_active: bool,
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 사용자 생성 데이터
///
/// 비밀번호는 평문으로 들어오며 리포지토리에서 해시로만 저장됩니다.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// 없으면 `"{first} {last}"`
    pub display_name: Option<String>,
    pub password: Option<String>,
    pub photo_url: Option<String>,
    /// 비어 있으면 `[credentials]`
    pub providers: Vec<AuthProvider>,
    pub role: UserRole,
    pub email_verified: bool,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("providers", &self.providers)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl NewUser {
    /// 이메일/비밀번호 가입
    pub fn credentials(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            display_name: None,
            password: Some(password.into()),
            photo_url: None,
            providers: vec![AuthProvider::Credentials],
            role: UserRole::lowest_registered(),
            email_verified: false,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// 부분 수정 필드. `None` 인 필드는 건드리지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub providers: Option<Vec<AuthProvider>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == UserUpdate::default()
    }

    /// 역할이나 활성 상태처럼 관리자만 바꿀 수 있는 필드가 포함됐는지
    pub fn touches_privileged_fields(&self) -> bool {
        self.role.is_some()
            || self.is_active.is_some()
            || self.email_verified.is_some()
            || self.providers.is_some()
    }
}

impl User {
    /// 생성 데이터로 새 엔티티를 만듭니다. 해시는 호출자가 계산해 넘깁니다.
    pub fn create(new_user: NewUser, password_hash: Option<String>) -> Self {
        let now = Utc::now();
        let providers = if new_user.providers.is_empty() {
            vec![AuthProvider::Credentials]
        } else {
            dedup_providers(new_user.providers)
        };
        // 비밀번호 해시는 credentials 수단이 있을 때만 보관
        let password_hash = password_hash.filter(|_| providers.contains(&AuthProvider::Credentials));
        let display_name = new_user
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| default_display_name(&new_user.first_name, &new_user.last_name));

        Self {
            id: Uuid::now_v7().to_string(),
            email: normalize_email(&new_user.email),
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            display_name,
            password_hash,
            providers,
            role: new_user.role,
            is_active: true,
            email_verified: new_user.email_verified,
            photo_url: new_user.photo_url.filter(|url| !url.trim().is_empty()),
            last_sign_in_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_provider(&self, provider: AuthProvider) -> bool {
        self.providers.contains(&provider)
    }

    /// 비밀번호 로그인이 가능한 사용자인지
    pub fn can_authenticate_with_password(&self) -> bool {
        self.has_provider(AuthProvider::Credentials) && self.password_hash.is_some()
    }

    /// 사용자 목록 검색: 이메일, 이름, 표시 이름, 역할 중 하나라도 부분 일치 (대소문자 무시)
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            self.email.as_str(),
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.display_name.as_str(),
            self.role.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// 변경 내용을 메모리 상의 엔티티에 반영합니다. `updated_at` 은 호출자가 정합니다.
    pub fn apply(&mut self, update: &UserUpdate) {
        if let Some(first_name) = &update.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(display_name) = &update.display_name {
            self.display_name = display_name.clone();
        }
        if let Some(photo_url) = &update.photo_url {
            self.photo_url = Some(photo_url.clone());
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(email_verified) = update.email_verified {
            self.email_verified = email_verified;
        }
        if let Some(providers) = &update.providers {
            self.providers = providers.clone();
        }
        if let Some(at) = update.last_sign_in_at {
            self.last_sign_in_at = Some(at);
        }
    }
}

pub fn default_display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim()).trim().to_string()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn dedup_providers(providers: Vec<AuthProvider>) -> Vec<AuthProvider> {
    let mut unique = Vec::with_capacity(providers.len());
    for provider in providers {
        if !unique.contains(&provider) {
            unique.push(provider);
        }
    }
    unique
}
