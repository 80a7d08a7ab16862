//! 세션 토큰 클레임과 토큰 쌍
use serde::{Deserialize, Serialize};
use crate::domain::entities::users::UserRole;

/// 토큰 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT 클레임
///
/// - `sub`: 사용자 ID
/// - `email`, `role`: 접근 제어 정책에 필요한 호출자 정보
/// - `token_type`: 리프레시 토큰으로 API 를 호출하지 못하도록 구분
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

/// 클라이언트에 전달되는 토큰 집합
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 만료까지 남은 초
    pub expires_in: i64,
}
