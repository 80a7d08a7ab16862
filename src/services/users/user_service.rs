//! 사용자 관리 서비스
//!
//! 관리 화면의 목록/통계/생성/수정/활성화와 본인 프로필 수정을 담당합니다.
//! 모든 "다른 사용자" 작업은 [`access_policy`](super::access_policy) 를 거칩니다.

use std::sync::Arc;
use chrono::Utc;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::request::{UserFilters, UserListQuery};
use crate::domain::dto::users::response::{UserPage, UserResponse, UserSession, UserStats};
use crate::domain::entities::users::{NewUser, User, UserUpdate};
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::users::UserRepository;
use crate::services::users::access_policy;

pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// 호출자에게 보이는 사용자 중 필터를 만족하는 사용자 (최근 수정 순)
    pub async fn list_visible_users(
        &self,
        caller: &AuthenticatedUser,
        filters: &UserFilters,
    ) -> AppResult<Vec<User>> {
        let all = self.user_repo.list_all().await?;
        let visible = access_policy::filter_visible(caller, all);
        let mut users = access_policy::apply_filters(visible, filters);
        users.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| b.id.cmp(&a.id)));
        Ok(users)
    }

    pub async fn list_users_page(
        &self,
        caller: &AuthenticatedUser,
        query: &UserListQuery,
    ) -> AppResult<UserPage> {
        let filters = query.filters()?;
        let users = self.list_visible_users(caller, &filters).await?;

        let page = query.page();
        let page_size = query.page_size();
        let total = users.len();
        let skip = (page - 1).saturating_mul(page_size);

        let users: Vec<UserResponse> = users
            .into_iter()
            .skip(skip)
            .take(page_size)
            .map(UserResponse::from)
            .collect();

        Ok(UserPage {
            has_more: skip + users.len() < total,
            users,
            total,
            page,
            page_size,
        })
    }

    pub async fn user_stats(&self, caller: &AuthenticatedUser) -> AppResult<UserStats> {
        let visible = self
            .list_visible_users(caller, &UserFilters::default())
            .await?;
        let today = Utc::now().date_naive();

        let active = visible.iter().filter(|u| u.is_active).count();
        let signed_in_today = visible
            .iter()
            .filter(|u| u.last_sign_in_at.is_some_and(|at| at.date_naive() == today))
            .count();

        Ok(UserStats {
            total: visible.len(),
            active,
            inactive: visible.len() - active,
            signed_in_today,
        })
    }

    /// 사용자 생성 (권한 확인 없음, 호출 경로가 이미 인가됨)
    pub async fn create_user(&self, data: NewUser) -> AppResult<UserSession> {
        let user = self.user_repo.create_user(data).await?;
        Ok(UserSession::from(user))
    }

    /// 관리자에 의한 생성. 요청된 역할은 역할 부여 규칙을 통과해야 합니다.
    pub async fn create_user_as(&self, caller: &AuthenticatedUser, data: NewUser) -> AppResult<User> {
        access_policy::authorize_role_assignment(caller, data.role)?;

        let user = self.user_repo.create_user(data).await?;
        log::info!("관리자 사용자 생성: by={}, user_id={}, role={}", caller.user_id, user.id, user.role);
        Ok(user)
    }

    /// 본인 레코드
    pub async fn get_self(&self, caller: &AuthenticatedUser) -> AppResult<User> {
        self.find_existing(&caller.user_id).await
    }

    /// 다른 사용자 조회. 없으면 `NotFound`, 보이지 않으면 `Forbidden`.
    pub async fn get_user_as(&self, caller: &AuthenticatedUser, id: &str) -> AppResult<User> {
        let target = self.find_existing(id).await?;
        access_policy::ensure_visible(caller, &target)?;
        Ok(target)
    }

    /// 사용자 수정
    ///
    /// - 본인: 이름, 표시 이름, 사진만. 역할/활성 상태를 건드리면 `Forbidden`.
    /// - 타인: 볼 수 있는 대상이어야 하고 역할 변경은 역할 부여 규칙을 통과해야 함.
    pub async fn update_user(
        &self,
        id: &str,
        changes: UserUpdate,
        caller: &AuthenticatedUser,
    ) -> AppResult<User> {
        let target = self.find_existing(id).await?;

        if caller.is_self(&target) {
            if changes.touches_privileged_fields() {
                return Err(AppError::Forbidden(
                    "본인의 역할이나 상태는 변경할 수 없습니다".to_string(),
                ));
            }
        } else {
            access_policy::ensure_visible(caller, &target)?;
            if let Some(new_role) = changes.role.filter(|role| *role != target.role) {
                access_policy::authorize_role_change(caller, &target, new_role)?;
            }
            if changes.providers.is_some() {
                return Err(AppError::Forbidden("인증 수단은 직접 변경할 수 없습니다".to_string()));
            }
        }

        let updated = self.user_repo.update(&target.id, &changes).await?;
        log::info!("사용자 수정: by={}, user_id={}", caller.user_id, updated.id);
        Ok(updated)
    }

    /// 활성 상태 변경
    ///
    /// 호출자 가시성 검사를 하지 않습니다. 요청 핸들러는 [`Self::set_user_active_as`] 를 씁니다.
    pub async fn set_user_active(&self, id: &str, active: bool) -> AppResult<()> {
        let changes = UserUpdate {
            is_active: Some(active),
            ..Default::default()
        };
        self.user_repo.update(id, &changes).await?;
        Ok(())
    }

    /// 관리자에 의한 활성/비활성. 삭제 요청도 이 경로로 비활성화됩니다.
    pub async fn set_user_active_as(
        &self,
        caller: &AuthenticatedUser,
        id: &str,
        active: bool,
    ) -> AppResult<User> {
        let target = self.find_existing(id).await?;
        access_policy::ensure_visible(caller, &target)?;

        let changes = UserUpdate {
            is_active: Some(active),
            ..Default::default()
        };
        let updated = self.user_repo.update(&target.id, &changes).await?;
        log::info!(
            "사용자 {}: by={}, user_id={}",
            if active { "활성화" } else { "비활성화" },
            caller.user_id,
            updated.id
        );
        Ok(updated)
    }

    async fn find_existing(&self, id: &str) -> AppResult<User> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("사용자를 찾을 수 없습니다: {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::db::InMemoryDocumentStore;
    use crate::domain::entities::users::UserRole;
    use crate::services::auth::password_hasher::BcryptPasswordHasher;

    struct Fixture {
        service: UserService,
        repo: Arc<UserRepository>,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(UserRepository::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(BcryptPasswordHasher::new(4)),
        ));
        repo.init().await.unwrap();
        Fixture {
            service: UserService::new(repo.clone()),
            repo,
        }
    }

    async fn seed(f: &Fixture, email: &str, role: UserRole) -> User {
        f.repo
            .create_user(NewUser::credentials(email, "First", "Last", "Secret123!").with_role(role))
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn test_page_is_sorted_and_bounded() {
        let f = fixture().await;
        let admin = AuthenticatedUser::from(&seed(&f, "admin@x.com", UserRole::Admin).await);
        for i in 0..3 {
            seed(&f, &format!("u{}@x.com", i), UserRole::User).await;
            std::thread::sleep(Duration::from_millis(2));
        }

        let query = UserListQuery {
            page_size: Some(2),
            ..Default::default()
        };
        let page = f.service.list_users_page(&admin, &query).await.unwrap();
        assert_eq!(page.total, 3);
        assert!(page.has_more);
        assert_eq!(page.users[0].email, "u2@x.com");
        assert_eq!(page.users[1].email, "u1@x.com");

        let query = UserListQuery {
            page: Some(2),
            page_size: Some(2),
            ..Default::default()
        };
        let page = f.service.list_users_page(&admin, &query).await.unwrap();
        assert_eq!(page.users.len(), 1);
        assert!(!page.has_more);
    }

    #[actix_web::test]
    async fn test_stats_over_visible_set() {
        let f = fixture().await;
        let admin = AuthenticatedUser::from(&seed(&f, "admin@x.com", UserRole::Admin).await);
        seed(&f, "other-admin@x.com", UserRole::Admin).await;
        let active = seed(&f, "a@x.com", UserRole::User).await;
        let inactive = seed(&f, "b@x.com", UserRole::User).await;
        f.service.set_user_active(&inactive.id, false).await.unwrap();
        f.repo.authenticate(&active.email, "Secret123!").await.unwrap();

        let stats = f.service.user_stats(&admin).await.unwrap();
        assert_eq!(
            stats,
            UserStats {
                total: 2,
                active: 1,
                inactive: 1,
                signed_in_today: 1,
            }
        );
    }

    #[actix_web::test]
    async fn test_self_update_limited_to_profile_fields() {
        let f = fixture().await;
        let me = seed(&f, "me@x.com", UserRole::User).await;
        let caller = AuthenticatedUser::from(&me);

        let updated = f
            .service
            .update_user(
                &me.id,
                UserUpdate {
                    display_name: Some("Me Myself".to_string()),
                    ..Default::default()
                },
                &caller,
            )
            .await
            .unwrap();
        assert_eq!(updated.display_name, "Me Myself");

        let err = f
            .service
            .update_user(
                &me.id,
                UserUpdate {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
                &caller,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "forbidden");

        let err = f
            .service
            .update_user(
                &me.id,
                UserUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
                &caller,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "forbidden");
    }

    #[actix_web::test]
    async fn test_admin_cannot_touch_peers_or_escalate() {
        let f = fixture().await;
        let admin = AuthenticatedUser::from(&seed(&f, "admin@x.com", UserRole::Admin).await);
        let peer = seed(&f, "peer@x.com", UserRole::Admin).await;
        let user = seed(&f, "user@x.com", UserRole::User).await;

        let err = f
            .service
            .update_user(
                &peer.id,
                UserUpdate {
                    first_name: Some("X".to_string()),
                    ..Default::default()
                },
                &admin,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "forbidden");

        let err = f
            .service
            .update_user(
                &user.id,
                UserUpdate {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
                &admin,
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "forbidden");
        let unchanged = f.repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(unchanged.role, UserRole::User);

        let renamed = f
            .service
            .update_user(
                &user.id,
                UserUpdate {
                    first_name: Some("Renamed".to_string()),
                    ..Default::default()
                },
                &admin,
            )
            .await
            .unwrap();
        assert_eq!(renamed.first_name, "Renamed");
    }

    #[actix_web::test]
    async fn test_superadmin_promotes_user_to_admin() {
        let f = fixture().await;
        let root = AuthenticatedUser::from(&seed(&f, "root@x.com", UserRole::Superadmin).await);
        let user = seed(&f, "user@x.com", UserRole::User).await;

        let promoted = f
            .service
            .update_user(
                &user.id,
                UserUpdate {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
                &root,
            )
            .await
            .unwrap();
        assert_eq!(promoted.role, UserRole::Admin);
    }

    #[actix_web::test]
    async fn test_unknown_id_is_not_found_before_authorization() {
        let f = fixture().await;
        let guest = AuthenticatedUser::new("g", "g@x.com", UserRole::Guest);

        let err = f
            .service
            .update_user("missing", UserUpdate::default(), &guest)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_found");

        let err = f.service.set_user_active_as(&guest, "missing", false).await.unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[actix_web::test]
    async fn test_create_user_as_respects_role_gate() {
        let f = fixture().await;
        let admin = AuthenticatedUser::from(&seed(&f, "admin@x.com", UserRole::Admin).await);

        let err = f
            .service
            .create_user_as(&admin, NewUser::credentials("n@x.com", "N", "U", "pw").with_role(UserRole::Admin))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "forbidden");
        assert!(f.repo.find_by_email("n@x.com").await.unwrap().is_none());

        let created = f
            .service
            .create_user_as(&admin, NewUser::credentials("n@x.com", "N", "U", "pw"))
            .await
            .unwrap();
        assert_eq!(created.role, UserRole::User);
    }

    #[actix_web::test]
    async fn test_soft_delete_keeps_record() {
        let f = fixture().await;
        let admin = AuthenticatedUser::from(&seed(&f, "admin@x.com", UserRole::Admin).await);
        let user = seed(&f, "user@x.com", UserRole::User).await;

        let deactivated = f.service.set_user_active_as(&admin, &user.id, false).await.unwrap();
        assert!(!deactivated.is_active);
        assert!(f.repo.find_by_id(&user.id).await.unwrap().is_some());

        let err = f.repo.authenticate("user@x.com", "Secret123!").await.unwrap_err();
        assert_eq!(err.code(), "account_disabled");

        // 비활성 사용자도 관리자에게는 보인다
        let visible = f.service.get_user_as(&admin, &user.id).await.unwrap();
        assert_eq!(visible.id, user.id);
    }

    #[actix_web::test]
    async fn test_set_user_active_without_caller() {
        let f = fixture().await;
        let user = seed(&f, "plain@x.com", UserRole::User).await;

        f.service.set_user_active(&user.id, false).await.unwrap();
        let err = f.repo.authenticate("plain@x.com", "Secret123!").await.unwrap_err();
        assert_eq!(err.code(), "account_disabled");

        f.service.set_user_active(&user.id, true).await.unwrap();
        assert!(f.repo.authenticate("plain@x.com", "Secret123!").await.is_ok());

        let err = f.service.set_user_active("missing-id", false).await.unwrap_err();
        assert_eq!(err.code(), "not_found");
    }
}
