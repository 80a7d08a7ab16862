use async_trait::async_trait;
use crate::config::AuthProvider;
use crate::core::errors::AppResult;
use crate::domain::dto::users::response::OAuthLoginUrlResponse;
use crate::domain::models::oauth::IdentityAssertion;

/// 외부 OAuth 신원 제공자
///
/// 성공한 OAuth 흐름의 결과로 [`IdentityAssertion`] 을 돌려줍니다. 비밀번호는 다루지 않습니다.
/// 전송/파싱 실패는 `ProviderError` 입니다.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider(&self) -> AuthProvider;

    /// 사용자를 보낼 인증 URL 과 서명된 state
    fn login_url(&self) -> AppResult<OAuthLoginUrlResponse>;

    /// 콜백으로 받은 인증 코드를 신원 정보로 교환합니다. state 검증을 포함합니다.
    async fn exchange_code(&self, code: &str, state: &str) -> AppResult<IdentityAssertion>;
}
