use serde::{Deserialize, Serialize};
use crate::config::AuthProvider;

/// 외부 인증 제공자가 확인해 준 신원 정보
///
/// 로그인 조정 로직의 입력입니다. 제공자별 응답 형식은 여기서 사라지고
/// 공통 필드만 남습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityAssertion {
    pub email: String,
    pub display_name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: AuthProvider,
    /// 제공자 내부의 사용자 식별자
    pub subject: String,
    pub email_verified: bool,
}

impl IdentityAssertion {
    /// (이름, 성) 을 결정합니다.
    ///
    /// given/family 가 없으면 표시 이름을 첫 공백 기준으로 나눕니다.
    pub fn name_parts(&self) -> (String, String) {
        let given = non_blank(self.given_name.as_deref());
        let family = non_blank(self.family_name.as_deref());

        if given.is_some() || family.is_some() {
            return (
                given.unwrap_or_default().to_string(),
                family.unwrap_or_default().to_string(),
            );
        }

        match non_blank(self.display_name.as_deref()) {
            Some(name) => match name.split_once(' ') {
                Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
                None => (name.to_string(), String::new()),
            },
            None => (String::new(), String::new()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
