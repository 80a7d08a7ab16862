use serde::Deserialize;
use crate::config::AuthProvider;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::UserRole;
use crate::utils::string_utils::{clean_optional_string, split_list};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// 사용자 목록 쿼리 문자열
///
/// `roles`, `statuses`, `providers` 는 쉼표로 구분된 목록입니다.
/// (`?roles=admin,user&statuses=inactive`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub roles: Option<String>,
    pub statuses: Option<String>,
    pub providers: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

/// 활성 상태 필터 값
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }

    pub fn matches(&self, is_active: bool) -> bool {
        match self {
            UserStatus::Active => is_active,
            UserStatus::Inactive => !is_active,
        }
    }
}

/// 파싱이 끝난 검색/필터 조건
///
/// 필터끼리는 AND, 한 필터 안의 값들은 OR 로 결합됩니다.
/// 빈 목록은 "제한 없음" 입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub search: Option<String>,
    pub roles: Vec<UserRole>,
    pub statuses: Vec<UserStatus>,
    pub providers: Vec<AuthProvider>,
}

impl UserListQuery {
    pub fn filters(&self) -> AppResult<UserFilters> {
        Ok(UserFilters {
            search: clean_optional_string(self.search.clone()),
            roles: parse_list(self.roles.as_deref(), UserRole::from_str)?,
            statuses: parse_list(self.statuses.as_deref(), UserStatus::from_str)?,
            providers: parse_list(self.providers.as_deref(), AuthProvider::from_str)?,
        })
    }

    /// 1부터 시작하는 페이지 번호
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

fn parse_list<T>(raw: Option<&str>, parse: impl Fn(&str) -> Result<T, String>) -> AppResult<Vec<T>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    split_list(raw)
        .map(|s| parse(s).map_err(AppError::ValidationError))
        .collect()
}
