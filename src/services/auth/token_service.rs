//! 세션 토큰 서비스 (HS256 JWT)
//!
//! 검증된 신원으로 `{sub, email, role}` 클레임을 담은 액세스/리프레시 토큰을 발급하고,
//! 요청마다 토큰을 검증해 접근 정책에 넘길 클레임을 돌려줍니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use crate::config::JwtConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::response::UserSession;
use crate::domain::models::token::{TokenClaims, TokenPair, TokenType};

pub struct TokenService {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            JwtConfig::secret(),
            Duration::hours(JwtConfig::expiration_hours()),
            Duration::days(JwtConfig::refresh_expiration_days()),
        )
    }

    fn issue(&self, user: &UserSession, token_type: TokenType, ttl: Duration) -> AppResult<String> {
        let now = Utc::now();

        let claims = TokenClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());

        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
    }

    pub fn generate_access_token(&self, user: &UserSession) -> AppResult<String> {
        self.issue(user, TokenType::Access, self.access_ttl)
    }

    pub fn generate_refresh_token(&self, user: &UserSession) -> AppResult<String> {
        self.issue(user, TokenType::Refresh, self.refresh_ttl)
    }

    pub fn generate_token_pair(&self, user: &UserSession) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user)?,
            refresh_token: self.generate_refresh_token(user)?,
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// 서명과 만료를 검증하고 클레임을 돌려줍니다.
    pub fn verify_token(&self, token: &str) -> AppResult<TokenClaims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());

        decode::<TokenClaims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
                }
                _ => {
                    log::debug!("토큰 검증 실패: {}", e);
                    AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string())
                }
            })
    }

    /// 액세스 토큰만 허용
    pub fn verify_access_token(&self, token: &str) -> AppResult<TokenClaims> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(AppError::AuthenticationError("액세스 토큰이 아닙니다".to_string()));
        }
        Ok(claims)
    }

    /// 리프레시 토큰만 허용
    pub fn verify_refresh_token(&self, token: &str) -> AppResult<TokenClaims> {
        let claims = self.verify_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AppError::AuthenticationError("리프레시 토큰이 아닙니다".to_string()));
        }
        Ok(claims)
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> AppResult<&'a str> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim()),
            _ => Err(AppError::AuthenticationError(
                "유효하지 않은 인증 헤더 형식입니다".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::{NewUser, User, UserRole};

    fn service() -> TokenService {
        TokenService::new("test-secret", Duration::hours(1), Duration::days(7))
    }

    fn user() -> UserSession {
        UserSession::from(User::create(
            NewUser::credentials("a@x.com", "A", "B", "pw").with_role(UserRole::Admin),
            None,
        ))
    }

    #[test]
    fn test_token_pair_carries_identity_and_role() {
        let service = service();
        let user = user();
        let pair = service.generate_token_pair(&user).unwrap();
        assert_eq!(pair.expires_in, 3600);

        let claims = service.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, UserRole::Admin);

        let refresh = service.verify_refresh_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let service = service();
        let pair = service.generate_token_pair(&user()).unwrap();

        assert!(service.verify_access_token(&pair.refresh_token).is_err());
        assert!(service.verify_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let other = TokenService::new("other-secret", Duration::hours(1), Duration::days(7));
        let token = other.generate_access_token(&user()).unwrap();

        let err = service().verify_token(&token).unwrap_err();
        assert_eq!(err.code(), "authentication_required");
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = TokenService::new("test-secret", Duration::hours(-2), Duration::days(7));
        let token = expired.generate_access_token(&user()).unwrap();
        assert!(service().verify_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        let service = service();
        assert_eq!(service.extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(service.extract_bearer_token("Basic abc").is_err());
        assert!(service.extract_bearer_token("Bearer ").is_err());
    }
}
