//! # 사용자 생성 요청 DTO
//!
//! 자가 가입(`POST /api/v1/auth/signup`)과 관리자 생성(`POST /api/v1/users`)이
//! 같은 요청 본문을 사용합니다. 자가 가입 경로에서는 `role` 이 무시됩니다.
//!
//! ## 검증 규칙
//!
//! - `email`: 이메일 형식 (중복 여부는 저장소 계층에서 확인)
//! - `first_name`, `last_name`: 1-50자
//! - `password`: 최소 8자, 대문자/소문자/숫자 포함
//! - `display_name`: 선택, 최대 100자 (없으면 "이름 성")

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::domain::entities::users::{NewUser, UserRole};

/// 새로운 사용자 계정 생성을 위한 요청 DTO
///
/// # JSON 예제
///
/// ```json
/// {
///   "email": "user@example.com",
///   "first_name": "Min",
///   "last_name": "Kim",
///   "password": "SecurePass123"
/// }
/// ```
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, max = 50, message = "이름은 1-50자 사이여야 합니다"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "성은 1-50자 사이여야 합니다"))]
    pub last_name: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    #[validate(length(max = 100, message = "표시 이름은 100자 이하여야 합니다"))]
    pub display_name: Option<String>,

    #[validate(url(message = "유효한 URL 이 아닙니다"))]
    pub photo_url: Option<String>,

    /// 관리자 생성 경로에서만 사용
    pub role: Option<UserRole>,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

impl CreateUserRequest {
    /// 자가 가입용 생성 데이터 (역할은 항상 기본 역할)
    pub fn into_self_signup(self) -> NewUser {
        let mut new_user = self.into_new_user();
        new_user.role = UserRole::lowest_registered();
        new_user
    }

    /// 요청된 역할을 유지한 생성 데이터
    pub fn into_new_user(self) -> NewUser {
        let role = self.role.unwrap_or_else(UserRole::lowest_registered);
        let mut new_user = NewUser::credentials(
            self.email,
            self.first_name,
            self.last_name,
            self.password,
        )
        .with_role(role);
        new_user.display_name = self.display_name.filter(|name| !name.trim().is_empty());
        new_user.photo_url = self.photo_url;
        new_user
    }
}

pub(crate) fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_uppercase && has_lowercase && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("비밀번호는 대문자, 소문자, 숫자를 포함해야 합니다".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            email: "user@example.com".to_string(),
            first_name: "Min".to_string(),
            last_name: "Kim".to_string(),
            password: "SecurePass123".to_string(),
            display_name: None,
            photo_url: None,
            role: Some(UserRole::Admin),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_weak_password_rejected() {
        let mut req = request();
        req.password = "alllowercase1".to_string();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_empty_names_rejected() {
        let mut req = request();
        req.first_name = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_self_signup_ignores_requested_role() {
        let new_user = request().into_self_signup();
        assert_eq!(new_user.role, UserRole::User);

        let admin_created = request().into_new_user();
        assert_eq!(admin_created.role, UserRole::Admin);
    }

    #[test]
    fn test_debug_masks_password() {
        let output = format!("{:?}", request());
        assert!(!output.contains("SecurePass123"));
    }
}
