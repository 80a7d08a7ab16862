use std::future::{ready, Ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use crate::core::errors::AppError;
use crate::domain::entities::users::{User, UserRole};

/// 세션 토큰에서 추출된 호출자 정보
///
/// 접근 제어 정책의 입력이 됩니다. 미들웨어가 요청 extension 에 넣어 두며
/// 핸들러에서는 추출자로 받습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_administrative()
    }

    /// 대상 레코드가 호출자 자신인지 (id 또는 이메일 일치)
    pub fn is_self(&self, user: &User) -> bool {
        self.user_id == user.id || self.email.eq_ignore_ascii_case(&user.email)
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self::new(user.id.clone(), user.email.clone(), user.role)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "인증되지 않은 요청입니다".to_string(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::NewUser;

    #[test]
    fn test_is_self_matches_id_or_email() {
        let user = User::create(NewUser::credentials("me@x.com", "Me", "Self", "pw"), None);

        let by_id = AuthenticatedUser::new(user.id.clone(), "other@x.com", UserRole::Admin);
        let by_email = AuthenticatedUser::new("other-id", "ME@x.com", UserRole::Admin);
        let stranger = AuthenticatedUser::new("other-id", "other@x.com", UserRole::Admin);

        assert!(by_id.is_self(&user));
        assert!(by_email.is_self(&user));
        assert!(!stranger.is_self(&user));
    }

    #[actix_web::test]
    async fn test_extractor_requires_extension() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        let result = AuthenticatedUser::extract(&req).await;
        assert_eq!(result.unwrap_err().code(), "authentication_required");

        let req = actix_web::test::TestRequest::default().to_http_request();
        req.extensions_mut()
            .insert(AuthenticatedUser::new("u1", "a@x.com", UserRole::User));
        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user.user_id, "u1");
    }
}
