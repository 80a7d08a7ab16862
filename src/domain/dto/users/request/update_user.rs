use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::domain::entities::users::{UserRole, UserUpdate};
use crate::utils::string_utils::deserialize_optional_string;

/// 사용자 부분 수정 요청
///
/// 본인 프로필 수정(`PATCH /api/v1/me`)과 관리자 수정(`PATCH /api/v1/users/{id}`)
/// 에서 공통으로 사용합니다. 어떤 필드를 허용할지는 서비스 계층이 결정합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50, message = "이름은 1-50자 사이여야 합니다"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "성은 1-50자 사이여야 합니다"))]
    pub last_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "표시 이름은 1-100자 사이여야 합니다"))]
    pub display_name: Option<String>,

    /// 빈 문자열은 "변경 없음"
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url(message = "유효한 URL 이 아닙니다"))]
    pub photo_url: Option<String>,

    pub role: Option<UserRole>,

    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        UserUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
            display_name: req.display_name,
            photo_url: req.photo_url,
            role: req.role,
            is_active: req.is_active,
            ..Default::default()
        }
    }
}
