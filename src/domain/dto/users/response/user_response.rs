use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::config::AuthProvider;
use crate::domain::entities::users::{User, UserRole};
use crate::domain::models::token::TokenPair;

/// 세션에 실리는 사용자 투영 (비밀번호 해시 제외)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub email_verified: bool,
    pub photo_url: Option<String>,
}

impl From<&User> for UserSession {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
            is_active: user.is_active,
            email_verified: user.email_verified,
            photo_url: user.photo_url.clone(),
        }
    }
}

impl From<User> for UserSession {
    fn from(user: User) -> Self {
        UserSession::from(&user)
    }
}

/// 관리 화면용 사용자 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub providers: Vec<AuthProvider>,
    pub role: UserRole,
    pub is_active: bool,
    pub email_verified: bool,
    pub photo_url: Option<String>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            email,
            first_name,
            last_name,
            display_name,
            providers,
            role,
            is_active,
            email_verified,
            photo_url,
            last_sign_in_at,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id,
            email,
            first_name,
            last_name,
            display_name,
            providers,
            role,
            is_active,
            email_verified,
            photo_url,
            last_sign_in_at,
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserSession,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl LoginResponse {
    pub fn new(user: UserSession, tokens: TokenPair) -> Self {
        Self {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.expires_in,
        }
    }
}

/// 사용자 목록 페이지
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<UserResponse>,
    /// 필터 적용 후 전체 건수
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_more: bool,
}

/// 호출자에게 보이는 사용자 집합에 대한 통계
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub signed_in_today: usize,
}
