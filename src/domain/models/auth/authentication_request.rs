use crate::domain::entities::users::UserRole;

/// 인증 모드를 정의하는 열거형
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 인증이 반드시 필요함
    Required,
    /// 인증이 선택사항임 (있으면 검증, 없어도 허용)
    Optional,
}

/// 요구되는 역할 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredRole {
    /// 이 역할 이상이면 허용
    AtLeast(UserRole),
    /// 나열된 역할 중 하나면 허용
    Any(Vec<UserRole>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, role: UserRole) -> bool {
        match self {
            RequiredRole::AtLeast(minimum) => role >= *minimum,
            RequiredRole::Any(roles) => roles.contains(&role),
        }
    }
}
