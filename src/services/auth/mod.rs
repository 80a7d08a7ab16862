//! 인증 관련 서비스
//!
//! - [`password_hasher`]: bcrypt 해시/검증
//! - [`token_service`]: 세션 토큰 (JWT) 발급/검증
//! - [`identity_provider`]: 외부 OAuth 제공자 추상화와 Google 구현
//! - [`sign_in_service`]: 로그인과 계정 조정

pub mod google_auth_service;
pub mod identity_provider;
pub mod password_hasher;
pub mod sign_in_service;
pub mod token_service;

pub use google_auth_service::GoogleIdentityProvider;
pub use identity_provider::IdentityProvider;
pub use password_hasher::{BcryptPasswordHasher, PasswordHasher};
pub use sign_in_service::{plan_oauth, OAuthPlan, SignInService};
pub use token_service::TokenService;
