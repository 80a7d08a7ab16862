use serde::Deserialize;
use crate::config::AuthProvider;
use crate::domain::models::oauth::IdentityAssertion;

/// Google userinfo 엔드포인트 응답
///
/// 계정 설정에 따라 이름 필드가 빠지는 경우가 있어 모두 기본값을 허용합니다.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,

    pub email: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub given_name: Option<String>,

    #[serde(default)]
    pub family_name: Option<String>,

    #[serde(default)]
    pub picture: Option<String>,

    #[serde(default)]
    pub verified_email: bool,
}

/// 인증 코드 교환 응답
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

impl From<GoogleUserInfo> for IdentityAssertion {
    fn from(info: GoogleUserInfo) -> Self {
        IdentityAssertion {
            email: info.email,
            display_name: info.name,
            given_name: info.given_name,
            family_name: info.family_name,
            avatar_url: info.picture,
            provider: AuthProvider::Google,
            subject: info.id,
            email_verified: info.verified_email,
        }
    }
}
