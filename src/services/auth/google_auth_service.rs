//! Google OAuth 2.0 신원 제공자
//!
//! 인증 URL 생성, state 서명/검증, 인증 코드 교환, userinfo 조회를 담당합니다.
//! 계정 조정(생성/연동)은 여기서 하지 않고 `SignInService` 에 맡깁니다.
//!
//! state 형식: `{timestamp}.{nonce}.{sha256(timestamp:nonce:secret)}`

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;
use crate::config::{AuthProvider, GoogleOAuthConfig, OAuthConfig};
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::response::OAuthLoginUrlResponse;
use crate::domain::models::oauth::{GoogleTokenResponse, GoogleUserInfo, IdentityAssertion};
use crate::services::auth::identity_provider::IdentityProvider;

pub struct GoogleIdentityProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    state_secret: String,
    state_max_age_seconds: i64,
    http: reqwest::Client,
}

impl GoogleIdentityProvider {
    /// 환경 변수로 구성합니다. 클라이언트 정보가 없으면 `Ok(None)` (Google 로그인 비활성).
    pub fn from_env() -> AppResult<Option<Self>> {
        let (Some(client_id), Some(client_secret), Some(redirect_uri)) = (
            GoogleOAuthConfig::client_id(),
            GoogleOAuthConfig::client_secret(),
            GoogleOAuthConfig::redirect_uri(),
        ) else {
            log::warn!("⚠️ Google OAuth 설정이 없어 Google 로그인을 비활성화합니다");
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(GoogleOAuthConfig::http_timeout_seconds()))
            .build()
            .map_err(|e| AppError::InternalError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Some(Self {
            client_id,
            client_secret,
            redirect_uri,
            state_secret: OAuthConfig::state_secret(),
            state_max_age_seconds: OAuthConfig::session_timeout_minutes() * 60,
            http,
        }))
    }

    async fn exchange_code_for_token(&self, auth_code: &str) -> AppResult<GoogleTokenResponse> {
        let params = [
            ("code", auth_code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(GoogleOAuthConfig::token_uri())
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ProviderError(format!("Google 토큰 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError(format!(
                "Google 토큰 교환 실패 ({}): {}",
                status, error_text
            )));
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| AppError::ProviderError(format!("Google 토큰 응답 파싱 실패: {}", e)))
    }

    async fn get_user_info(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let response = self
            .http
            .get(GoogleOAuthConfig::userinfo_uri())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ProviderError(format!("Google 사용자 정보 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError(format!(
                "Google 사용자 정보 조회 실패 ({}): {}",
                status, error_text
            )));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AppError::ProviderError(format!("Google 사용자 정보 파싱 실패: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn provider(&self) -> AuthProvider {
        AuthProvider::Google
    }

    fn login_url(&self) -> AppResult<OAuthLoginUrlResponse> {
        let state = generate_oauth_state(&self.state_secret, Utc::now().timestamp());

        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("scope", "openid email profile"),
            ("response_type", "code"),
            ("state", state.as_str()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let login_url = format!("{}?{}", GoogleOAuthConfig::auth_uri(), query_string);

        Ok(OAuthLoginUrlResponse { login_url, state })
    }

    async fn exchange_code(&self, code: &str, state: &str) -> AppResult<IdentityAssertion> {
        verify_oauth_state(
            state,
            &self.state_secret,
            self.state_max_age_seconds,
            Utc::now().timestamp(),
        )?;

        let token_response = self.exchange_code_for_token(code).await?;
        let google_user = self.get_user_info(&token_response.access_token).await?;

        log::debug!("Google 사용자 정보 수신: subject={}", google_user.id);
        Ok(IdentityAssertion::from(google_user))
    }
}

fn state_signature(timestamp: &str, nonce: &str, secret: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}:{}", timestamp, nonce, secret).as_bytes());
    format!("{:x}", digest)
}

pub(crate) fn generate_oauth_state(secret: &str, now: i64) -> String {
    let timestamp = now.to_string();
    let nonce = Uuid::new_v4().simple().to_string();
    let signature = state_signature(&timestamp, &nonce, secret);
    format!("{}.{}.{}", timestamp, nonce, signature)
}

/// 서명과 발급 시각을 확인합니다. 실패는 모두 `AuthenticationError`.
pub(crate) fn verify_oauth_state(state: &str, secret: &str, max_age_seconds: i64, now: i64) -> AppResult<()> {
    let invalid = || AppError::AuthenticationError("유효하지 않은 OAuth state".to_string());

    let mut parts = state.split('.');
    let (Some(timestamp), Some(nonce), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    if state_signature(timestamp, nonce, secret) != signature {
        return Err(invalid());
    }

    let issued_at: i64 = timestamp.parse().map_err(|_| invalid())?;
    let age = now - issued_at;
    if age < 0 || age > max_age_seconds {
        return Err(AppError::AuthenticationError("만료된 OAuth state".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip() {
        let state = generate_oauth_state("secret", 1_000);
        assert_eq!(state.split('.').count(), 3);
        assert!(verify_oauth_state(&state, "secret", 600, 1_100).is_ok());
    }

    #[test]
    fn test_state_wrong_secret() {
        let state = generate_oauth_state("secret", 1_000);
        assert!(verify_oauth_state(&state, "other", 600, 1_000).is_err());
    }

    #[test]
    fn test_state_tampered_timestamp() {
        let state = generate_oauth_state("secret", 1_000);
        let tampered = state.replacen("1000", "1500", 1);
        assert!(verify_oauth_state(&tampered, "secret", 600, 1_500).is_err());
    }

    #[test]
    fn test_state_expired() {
        let state = generate_oauth_state("secret", 1_000);
        let err = verify_oauth_state(&state, "secret", 600, 1_601).unwrap_err();
        assert_eq!(err.code(), "authentication_required");
    }

    #[test]
    fn test_state_malformed() {
        assert!(verify_oauth_state("", "secret", 600, 0).is_err());
        assert!(verify_oauth_state("a.b", "secret", 600, 0).is_err());
        assert!(verify_oauth_state("a.b.c.d", "secret", 600, 0).is_err());
    }
}
