//! # 문자열 유틸리티
//!
//! 쿼리 문자열과 요청 본문의 자유 입력 필드를 다듬는 함수들입니다.

use serde::Deserialize;

/// 선택적 문자열 정리
///
/// 앞뒤 공백을 제거하고, 비어 있으면 `None` 을 돌려줍니다.
///
/// ```rust,ignore
/// assert_eq!(clean_optional_string(Some("  doe ".to_string())), Some("doe".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 쉼표로 구분된 목록을 나눕니다. 빈 항목은 버립니다.
///
/// `"admin, ,user"` → `["admin", "user"]`
pub fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// 선택적 문자열 필드를 위한 serde deserializer
///
/// 빈 문자열이나 공백만 있는 값은 "필드 없음" 으로 취급합니다.
/// 필드가 아예 빠진 경우를 위해 `#[serde(default)]` 와 함께 사용합니다.
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct Patch {
///     #[serde(default, deserialize_with = "deserialize_optional_string")]
///     photo_url: Option<String>,
/// }
///
/// // {"photo_url": ""}     → None
/// // {"photo_url": " a "}  → Some("a")
/// ```
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}
