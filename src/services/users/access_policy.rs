//! # 사용자 접근 정책
//!
//! 호출자가 어떤 사용자를 보고 관리할 수 있는지 결정하는 순수 함수 모음입니다.
//! I/O 가 없으므로 저장소 없이 테스트합니다.
//!
//! | 호출자 역할 | 볼 수 있는 대상 역할 |
//! |-------------|----------------------|
//! | `superadmin` | `guest`, `user`, `admin` |
//! | `admin` | `user` |
//! | 그 외 | `user` |
//!
//! 호출자 자신은 항상 "다른 사용자 관리" 목록에서 빠집니다.

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::request::UserFilters;
use crate::domain::entities::users::{User, UserRole};
use crate::domain::models::auth::AuthenticatedUser;

const SUPERADMIN_VISIBLE: [UserRole; 3] = [UserRole::Guest, UserRole::User, UserRole::Admin];
const DEFAULT_VISIBLE: [UserRole; 1] = [UserRole::User];

/// 호출자 역할이 볼 수 있는 대상 역할
pub fn visible_roles(caller_role: UserRole) -> &'static [UserRole] {
    match caller_role {
        UserRole::Superadmin => &SUPERADMIN_VISIBLE,
        // admin 과 나머지 역할이 같은 규칙을 쓴다
        UserRole::Admin | UserRole::User | UserRole::Guest => &DEFAULT_VISIBLE,
    }
}

pub fn can_view(caller: &AuthenticatedUser, target: &User) -> bool {
    !caller.is_self(target) && visible_roles(caller.role).contains(&target.role)
}

pub fn filter_visible(caller: &AuthenticatedUser, users: Vec<User>) -> Vec<User> {
    users.into_iter().filter(|user| can_view(caller, user)).collect()
}

/// 대상을 볼 수 없으면 `Forbidden`
pub fn ensure_visible(caller: &AuthenticatedUser, target: &User) -> AppResult<()> {
    if can_view(caller, target) {
        Ok(())
    } else {
        Err(AppError::Forbidden("이 사용자를 관리할 권한이 없습니다".to_string()))
    }
}

/// 새 역할을 부여할 수 있는지
///
/// 호출자가 볼 수 있는 역할이어야 하고, 호출자 자신의 역할보다 낮아야 합니다.
pub fn authorize_role_assignment(caller: &AuthenticatedUser, new_role: UserRole) -> AppResult<()> {
    if new_role >= caller.role {
        return Err(AppError::Forbidden(format!(
            "{} 역할은 {} 이(가) 부여할 수 없습니다",
            new_role, caller.role
        )));
    }

    if !visible_roles(caller.role).contains(&new_role) {
        return Err(AppError::Forbidden(format!(
            "{} 역할을 부여할 권한이 없습니다",
            new_role
        )));
    }

    Ok(())
}

/// 기존 사용자의 역할 변경 (대상 가시성 + 새 역할 부여 가능 여부)
pub fn authorize_role_change(caller: &AuthenticatedUser, target: &User, new_role: UserRole) -> AppResult<()> {
    ensure_visible(caller, target)?;
    authorize_role_assignment(caller, new_role)
}

/// 검색어, 역할, 상태, 인증 수단 필터를 모두 만족하는지
pub fn matches_filters(user: &User, filters: &UserFilters) -> bool {
    let search_ok = filters
        .search
        .as_deref()
        .is_none_or(|needle| user.matches_search(needle));

    let role_ok = filters.roles.is_empty() || filters.roles.contains(&user.role);

    let status_ok = filters.statuses.is_empty()
        || filters.statuses.iter().any(|status| status.matches(user.is_active));

    let provider_ok = filters.providers.is_empty()
        || user.providers.iter().any(|p| filters.providers.contains(p));

    search_ok && role_ok && status_ok && provider_ok
}

pub fn apply_filters(users: Vec<User>, filters: &UserFilters) -> Vec<User> {
    users.into_iter().filter(|user| matches_filters(user, filters)).collect()
}
