//! # Authentication Configuration
//!
//! 세션 토큰(JWT), OAuth state 서명, Google OAuth 클라이언트 정보와
//! 인증 프로바이더 식별자를 관리합니다.
//!
//! ## 환경 변수
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_EXPIRATION_HOURS="24"
//! export JWT_REFRESH_EXPIRATION_DAYS="30"
//!
//! export OAUTH_STATE_SECRET="your-oauth-state-secret"
//! export OAUTH_SESSION_TIMEOUT_MINUTES="10"
//!
//! export GOOGLE_CLIENT_ID="your-google-client-id"
//! export GOOGLE_CLIENT_SECRET="your-google-client-secret"
//! export GOOGLE_REDIRECT_URI="http://localhost:8080/api/v1/auth/google/callback"
//! ```
//!
//! Google 값이 하나라도 없으면 Google 로그인은 비활성화된 채로 서버가 기동합니다.

use std::env;
use std::fmt;

/// Google OAuth 2.0 클라이언트 설정
pub struct GoogleOAuthConfig;

impl GoogleOAuthConfig {
    pub fn client_id() -> Option<String> {
        non_empty_var("GOOGLE_CLIENT_ID")
    }

    pub fn client_secret() -> Option<String> {
        non_empty_var("GOOGLE_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> Option<String> {
        non_empty_var("GOOGLE_REDIRECT_URI")
    }

    pub fn auth_uri() -> String {
        env::var("GOOGLE_AUTH_URI")
            .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".to_string())
    }

    pub fn token_uri() -> String {
        env::var("GOOGLE_TOKEN_URI")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string())
    }

    pub fn userinfo_uri() -> String {
        env::var("GOOGLE_USERINFO_URI")
            .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v2/userinfo".to_string())
    }

    /// 외부 호출 타임아웃(초). `GOOGLE_HTTP_TIMEOUT_SECONDS`, 기본 10
    pub fn http_timeout_seconds() -> u64 {
        env::var("GOOGLE_HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(10)
    }
}

/// 세션 토큰 설정
pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, using default (not secure for production!)");
            "admin-console-dev-secret".to_string()
        })
    }

    /// 액세스 토큰 유효 시간
    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(24)
    }

    /// 리프레시 토큰 유효 기간. 기본 30일은 세션 최대 수명과 같습니다.
    pub fn refresh_expiration_days() -> i64 {
        env::var("JWT_REFRESH_EXPIRATION_DAYS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(30)
    }
}

/// OAuth 플로우 보안 설정
pub struct OAuthConfig;

impl OAuthConfig {
    /// state 파라미터 서명 키
    pub fn state_secret() -> String {
        env::var("OAUTH_STATE_SECRET").unwrap_or_else(|_| {
            log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
            "oauth-state-secret".to_string()
        })
    }

    /// 로그인 URL 발급부터 콜백까지 허용하는 시간(분)
    pub fn session_timeout_minutes() -> i64 {
        env::var("OAUTH_SESSION_TIMEOUT_MINUTES")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(10)
    }
}

/// 사용자가 인증할 수 있는 방식
///
/// 저장 시 소문자 문자열(`"credentials"`, `"google"`)로 직렬화됩니다.
/// 이전 데이터의 `"local"` 값은 `Credentials` 로 읽힙니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// 이메일 / 비밀번호
    #[serde(alias = "local")]
    Credentials,
    Google,
}

impl AuthProvider {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "credentials" | "local" => Ok(AuthProvider::Credentials),
            "google" => Ok(AuthProvider::Google),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Credentials => "credentials",
            AuthProvider::Google => "google",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_from_string() {
        assert_eq!(AuthProvider::from_str("credentials").unwrap(), AuthProvider::Credentials);
        assert_eq!(AuthProvider::from_str("local").unwrap(), AuthProvider::Credentials);
        assert_eq!(AuthProvider::from_str("GOOGLE").unwrap(), AuthProvider::Google);

        assert!(AuthProvider::from_str("github").is_err());
        assert!(AuthProvider::from_str("twitter").is_err());
        assert!(AuthProvider::from_str("").is_err());
    }

    #[test]
    fn test_auth_provider_serialization() {
        assert_eq!(serde_json::to_string(&AuthProvider::Google).unwrap(), "\"google\"");
        assert_eq!(
            serde_json::from_str::<AuthProvider>("\"local\"").unwrap(),
            AuthProvider::Credentials
        );
        assert_eq!(
            serde_json::from_str::<Vec<AuthProvider>>(r#"["credentials","google"]"#).unwrap(),
            vec![AuthProvider::Credentials, AuthProvider::Google]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(AuthProvider::Google.to_string(), "google");
        assert_eq!(AuthProvider::Credentials.to_string(), "credentials");
    }
}
