//! # 로그인 / 계정 조정 서비스
//!
//! 비밀번호 로그인과 OAuth 로그인을 하나의 사용자 공간으로 합칩니다.
//! 계정의 열쇠는 이메일이며, 제공자가 주는 subject ID 로는 연결하지 않습니다.
//!
//! ```text
//! START → LOOKUP → { CREATE | LINK | REJECT | AUTHENTICATED } → END
//! ```
//!
//! | 상황 | 결과 |
//! |------|------|
//! | OAuth, 사용자 없음, "기존 사용자만" 설정 | `NotAllowed` |
//! | OAuth, 사용자 없음 | CREATE (providers=[제공자], 비밀번호 없음, email_verified) |
//! | OAuth, 사용자 있음, 비활성 | `AccountDisabled` |
//! | OAuth, 사용자 있음, 제공자 미연결 | LINK (제공자 추가, 빈 프로필만 채움) |
//! | OAuth, 사용자 있음, 제공자 연결됨 | AUTHENTICATED (빈 프로필만 채움) |
//! | 제공자/저장소 호출 실패 | `ProviderError` (로그 남김) |
//!
//! AUTHENTICATED 로 끝나는 모든 경로는 `last_sign_in_at` 을 갱신합니다.
//! 어떤 경로도 기존 프로필 값을 지우거나 덮어쓰지 않습니다.

use std::sync::Arc;
use crate::config::AuthProvider;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::response::{OAuthLoginUrlResponse, UserSession};
use crate::domain::entities::settings::AppSettings;
use crate::domain::entities::users::{NewUser, User, UserRole, UserUpdate};
use crate::domain::models::oauth::IdentityAssertion;
use crate::repositories::users::UserRepository;
use crate::services::auth::identity_provider::IdentityProvider;
use crate::services::settings::SettingsService;

/// OAuth 로그인 한 번에 대해 결정된 전이
#[derive(Debug, Clone)]
pub enum OAuthPlan {
    /// 새 사용자 생성
    Create(NewUser),
    /// 기존 사용자에 제공자 연결
    Link { user_id: String, changes: UserUpdate },
    /// 이미 연결된 제공자로 로그인
    SignIn { user_id: String, changes: UserUpdate },
}

/// 기존 레코드와 신원 정보, 설정만으로 전이를 결정합니다 (I/O 없음).
///
/// 반환된 `changes` 에는 `last_sign_in_at` 이 들어 있지 않습니다. 기록은 실행 단계의 몫입니다.
pub fn plan_oauth(
    existing: Option<&User>,
    assertion: &IdentityAssertion,
    settings: &AppSettings,
) -> AppResult<OAuthPlan> {
    if assertion.provider == AuthProvider::Google && !settings.allow_google_auth {
        return Err(AppError::NotAllowed("Google 로그인이 비활성화되어 있습니다".to_string()));
    }

    if assertion.email.trim().is_empty() {
        return Err(AppError::ProviderError("신원 제공자가 이메일을 주지 않았습니다".to_string()));
    }

    if !assertion.email_verified {
        return Err(AppError::NotAllowed("이메일이 확인되지 않은 계정입니다".to_string()));
    }

    let Some(user) = existing else {
        if settings.restrict_google_to_existing_users {
            return Err(AppError::NotAllowed(
                "등록된 사용자만 로그인할 수 있습니다".to_string(),
            ));
        }
        return Ok(OAuthPlan::Create(new_user_from(assertion)));
    };

    if !user.is_active {
        return Err(AppError::AccountDisabled);
    }

    let mut changes = backfill(user, assertion);

    if user.has_provider(assertion.provider) {
        return Ok(OAuthPlan::SignIn {
            user_id: user.id.clone(),
            changes,
        });
    }

    let mut providers = user.providers.clone();
    providers.push(assertion.provider);
    changes.providers = Some(providers);
    if !user.email_verified {
        changes.email_verified = Some(true);
    }

    Ok(OAuthPlan::Link {
        user_id: user.id.clone(),
        changes,
    })
}

fn new_user_from(assertion: &IdentityAssertion) -> NewUser {
    let (first_name, last_name) = assertion.name_parts();

    NewUser {
        email: assertion.email.clone(),
        first_name,
        last_name,
        display_name: non_blank(assertion.display_name.as_deref()),
        password: None,
        photo_url: non_blank(assertion.avatar_url.as_deref()),
        providers: vec![assertion.provider],
        role: UserRole::lowest_registered(),
        email_verified: true,
    }
}

/// 비어 있는 표시 이름/사진만 제공자 값으로 채웁니다.
fn backfill(user: &User, assertion: &IdentityAssertion) -> UserUpdate {
    let mut changes = UserUpdate::default();

    if user.display_name.trim().is_empty() {
        changes.display_name = non_blank(assertion.display_name.as_deref());
    }

    let has_photo = user.photo_url.as_deref().is_some_and(|url| !url.trim().is_empty());
    if !has_photo {
        changes.photo_url = non_blank(assertion.avatar_url.as_deref());
    }

    changes
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

pub struct SignInService {
    user_repo: Arc<UserRepository>,
    settings: Arc<SettingsService>,
    identity_providers: Vec<Arc<dyn IdentityProvider>>,
}

impl SignInService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        settings: Arc<SettingsService>,
        identity_providers: Vec<Arc<dyn IdentityProvider>>,
    ) -> Self {
        Self {
            user_repo,
            settings,
            identity_providers,
        }
    }

    /// 이메일/비밀번호 로그인
    pub async fn sign_in_with_credentials(&self, email: &str, password: &str) -> AppResult<UserSession> {
        match self.user_repo.authenticate(email, password).await {
            Ok(user) => {
                log::info!("로그인 성공: user_id={}", user.id);
                Ok(UserSession::from(user))
            }
            Err(AppError::InvalidCredentials) => {
                log::warn!("자격 증명 로그인 거절");
                Err(AppError::InvalidCredentials)
            }
            Err(AppError::AccountDisabled) => {
                log::warn!("비활성 계정 로그인 시도");
                Err(AppError::AccountDisabled)
            }
            Err(e) => Err(upstream_failure("자격 증명 로그인", e)),
        }
    }

    /// 자가 가입. `allow_new_user_registration` 이 꺼져 있으면 `NotAllowed`.
    pub async fn sign_up(&self, new_user: NewUser) -> AppResult<UserSession> {
        let settings = self.settings.load().await?;
        if !settings.allow_new_user_registration {
            return Err(AppError::NotAllowed("신규 가입이 중단되었습니다".to_string()));
        }

        let mut new_user = new_user;
        new_user.role = UserRole::lowest_registered();
        new_user.providers = vec![AuthProvider::Credentials];

        let user = self.user_repo.create_user(new_user).await?;
        log::info!("신규 가입: user_id={}", user.id);
        Ok(UserSession::from(user))
    }

    /// 신원 제공자가 확인해 준 정보로 로그인 (계정 생성/연동 포함)
    pub async fn sign_in_with_oauth(&self, assertion: IdentityAssertion) -> AppResult<UserSession> {
        let settings = self.load_settings().await?;
        self.reconcile(assertion, &settings).await
    }

    async fn reconcile(&self, assertion: IdentityAssertion, settings: &AppSettings) -> AppResult<UserSession> {
        let existing = self
            .user_repo
            .find_by_email(&assertion.email)
            .await
            .map_err(|e| upstream_failure("사용자 조회", e))?;

        let plan = plan_oauth(existing.as_ref(), &assertion, settings)?;

        let user = match plan {
            OAuthPlan::Create(new_user) => match self.user_repo.create_user(new_user).await {
                Ok(created) => {
                    log::info!("OAuth 신규 사용자 생성: user_id={}, provider={}", created.id, assertion.provider);
                    self.user_repo
                        .record_sign_in(&created.id)
                        .await
                        .map_err(|e| upstream_failure("로그인 기록", e))?
                }
                Err(AppError::DuplicateEmail(_)) => self.retry_after_race(&assertion, settings).await?,
                Err(e) => return Err(upstream_failure("OAuth 사용자 생성", e)),
            },
            plan => self.apply_existing(plan).await?,
        };

        Ok(UserSession::from(user))
    }

    /// 동시에 같은 이메일로 생성된 경우: 한 번 다시 읽고 연동 경로로 진행
    async fn retry_after_race(
        &self,
        assertion: &IdentityAssertion,
        settings: &AppSettings,
    ) -> AppResult<User> {
        log::warn!("OAuth 사용자 생성 중 이메일 중복, 기존 계정으로 재시도");

        let existing = self
            .user_repo
            .find_by_email(&assertion.email)
            .await
            .map_err(|e| upstream_failure("사용자 재조회", e))?;

        match plan_oauth(existing.as_ref(), assertion, settings)? {
            OAuthPlan::Create(_) => Err(upstream_failure(
                "OAuth 사용자 생성",
                AppError::DatabaseError("중복 이메일이지만 사용자를 찾을 수 없습니다".to_string()),
            )),
            plan => self.apply_existing(plan).await,
        }
    }

    async fn apply_existing(&self, plan: OAuthPlan) -> AppResult<User> {
        let (user_id, mut changes, linked) = match plan {
            OAuthPlan::Link { user_id, changes } => (user_id, changes, true),
            OAuthPlan::SignIn { user_id, changes } => (user_id, changes, false),
            OAuthPlan::Create(_) => {
                return Err(AppError::InternalError("생성 경로는 여기서 처리하지 않습니다".to_string()));
            }
        };

        changes.last_sign_in_at = Some(chrono::Utc::now());
        let user = self
            .user_repo
            .update(&user_id, &changes)
            .await
            .map_err(|e| upstream_failure("사용자 갱신", e))?;

        if linked {
            log::info!("OAuth 제공자 연동: user_id={}", user.id);
        } else {
            log::info!("OAuth 로그인: user_id={}", user.id);
        }
        Ok(user)
    }

    fn identity_provider(&self, provider: AuthProvider) -> AppResult<&Arc<dyn IdentityProvider>> {
        self.identity_providers
            .iter()
            .find(|p| p.provider() == provider)
            .ok_or_else(|| AppError::NotAllowed(format!("{} 로그인이 구성되지 않았습니다", provider)))
    }

    /// 로그인 시도마다 설정을 새로 읽습니다. 저장소 실패는 `ProviderError`.
    async fn load_settings(&self) -> AppResult<AppSettings> {
        self.settings
            .load()
            .await
            .map_err(|e| upstream_failure("설정 조회", e))
    }

    /// OAuth 로그인 시작 URL
    pub async fn oauth_login_url(&self, provider: AuthProvider) -> AppResult<OAuthLoginUrlResponse> {
        let settings = self.load_settings().await?;
        ensure_provider_enabled(provider, &settings)?;
        self.identity_provider(provider)?.login_url()
    }

    /// OAuth 콜백: 코드 교환 후 계정 조정
    pub async fn complete_oauth(&self, provider: AuthProvider, code: &str, state: &str) -> AppResult<UserSession> {
        let settings = self.load_settings().await?;
        ensure_provider_enabled(provider, &settings)?;

        let assertion = self
            .identity_provider(provider)?
            .exchange_code(code, state)
            .await
            .map_err(|e| upstream_failure("신원 제공자 코드 교환", e))?;

        self.reconcile(assertion, &settings).await
    }
}

fn ensure_provider_enabled(provider: AuthProvider, settings: &AppSettings) -> AppResult<()> {
    if provider == AuthProvider::Google && !settings.allow_google_auth {
        return Err(AppError::NotAllowed("Google 로그인이 비활성화되어 있습니다".to_string()));
    }
    Ok(())
}

/// 예기치 않은 하위 호출 실패를 `ProviderError` 로 바꿉니다. 예상된 거절은 그대로 둡니다.
fn upstream_failure(step: &str, err: AppError) -> AppError {
    match err {
        AppError::DatabaseError(msg) | AppError::InternalError(msg) | AppError::ProviderError(msg) => {
            log::error!("{} 실패: {}", step, msg);
            AppError::ProviderError(format!("{} 실패", step))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use async_trait::async_trait;
    use mongodb::bson::{Bson, Document};
    use crate::db::{DocumentStore, InMemoryDocumentStore, StoreError};
    use crate::domain::models::auth::AuthenticatedUser;
    use crate::repositories::settings::settings_repo::SETTINGS_COLLECTION;
    use crate::repositories::settings::SettingsRepository;
    use crate::services::auth::password_hasher::BcryptPasswordHasher;
    use serde_json::json;

    struct Fixture {
        service: SignInService,
        repo: Arc<UserRepository>,
        settings: Arc<SettingsService>,
    }

    /// 미리 정해진 결과를 돌려주는 신원 제공자
    struct ScriptedProvider {
        result: Result<IdentityAssertion, String>,
    }

    #[async_trait]
    impl IdentityProvider for ScriptedProvider {
        fn provider(&self) -> AuthProvider {
            AuthProvider::Google
        }

        fn login_url(&self) -> AppResult<OAuthLoginUrlResponse> {
            Ok(OAuthLoginUrlResponse {
                login_url: "https://idp.test/auth?state=s".to_string(),
                state: "s".to_string(),
            })
        }

        async fn exchange_code(&self, _code: &str, _state: &str) -> AppResult<IdentityAssertion> {
            self.result.clone().map_err(AppError::ProviderError)
        }
    }

    /// 설정 읽기 실패와 오래된 이메일 조회를 흉내 낼 수 있는 저장소
    #[derive(Default)]
    struct FaultyStore {
        inner: InMemoryDocumentStore,
        fail_settings_reads: AtomicBool,
        /// 남은 횟수만큼 `email` 조회가 빈 결과를 돌려준다
        stale_email_queries: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for FaultyStore {
        async fn get(&self, c: &str, k: &str) -> Result<Option<Document>, StoreError> {
            if c == SETTINGS_COLLECTION && self.fail_settings_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("connection refused".to_string()));
            }
            self.inner.get(c, k).await
        }
        async fn query(&self, c: &str, f: &str, v: Bson) -> Result<Vec<Document>, StoreError> {
            let stale = f == "email"
                && self
                    .stale_email_queries
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok();
            if stale {
                return Ok(Vec::new());
            }
            self.inner.query(c, f, v).await
        }
        async fn list(&self, c: &str) -> Result<Vec<Document>, StoreError> {
            self.inner.list(c).await
        }
        async fn insert(&self, c: &str, k: &str, d: Document) -> Result<(), StoreError> {
            self.inner.insert(c, k, d).await
        }
        async fn set(&self, c: &str, k: &str, d: Document) -> Result<(), StoreError> {
            self.inner.set(c, k, d).await
        }
        async fn update(&self, c: &str, k: &str, d: Document) -> Result<bool, StoreError> {
            self.inner.update(c, k, d).await
        }
        async fn delete(&self, c: &str, k: &str) -> Result<bool, StoreError> {
            self.inner.delete(c, k).await
        }
        async fn ensure_unique_index(&self, c: &str, f: &str) -> Result<(), StoreError> {
            self.inner.ensure_unique_index(c, f).await
        }
    }

    async fn fixture_on(store: Arc<dyn DocumentStore>, provider: Option<ScriptedProvider>) -> Fixture {
        let repo = Arc::new(UserRepository::new(store.clone(), Arc::new(BcryptPasswordHasher::new(4))));
        repo.init().await.unwrap();
        let settings = Arc::new(SettingsService::new(Arc::new(SettingsRepository::new(store))));

        let providers: Vec<Arc<dyn IdentityProvider>> = match provider {
            Some(p) => vec![Arc::new(p)],
            None => Vec::new(),
        };

        Fixture {
            service: SignInService::new(repo.clone(), settings.clone(), providers),
            repo,
            settings,
        }
    }

    async fn fixture_with(provider: Option<ScriptedProvider>) -> Fixture {
        fixture_on(Arc::new(InMemoryDocumentStore::new()), provider).await
    }

    async fn fixture() -> Fixture {
        fixture_with(None).await
    }

    fn google(email: &str) -> IdentityAssertion {
        IdentityAssertion {
            email: email.to_string(),
            display_name: Some("Gina Google".to_string()),
            given_name: Some("Gina".to_string()),
            family_name: Some("Google".to_string()),
            avatar_url: Some("https://img.test/g.png".to_string()),
            provider: AuthProvider::Google,
            subject: "sub-1".to_string(),
            email_verified: true,
        }
    }

    async fn set_flag(f: &Fixture, patch: serde_json::Value) {
        let admin = AuthenticatedUser::new("admin", "admin@x.com", UserRole::Superadmin);
        f.settings.update(&admin, &patch).await.unwrap();
    }

    #[actix_web::test]
    async fn test_oauth_creates_new_user() {
        let f = fixture().await;

        let session = f.service.sign_in_with_oauth(google("new@x.com")).await.unwrap();
        assert_eq!(session.role, UserRole::User);
        assert!(session.email_verified);

        let users = f.repo.list_all().await.unwrap();
        assert_eq!(users.len(), 1);
        let user = &users[0];
        assert_eq!(user.providers, vec![AuthProvider::Google]);
        assert!(user.password_hash.is_none());
        assert_eq!(user.first_name, "Gina");
        assert_eq!(user.last_name, "Google");
        assert!(user.last_sign_in_at.is_some());
    }

    #[actix_web::test]
    async fn test_oauth_restricted_to_existing_users() {
        let f = fixture().await;
        set_flag(&f, json!({"restrict_google_to_existing_users": true})).await;

        let err = f.service.sign_in_with_oauth(google("new@x.com")).await.unwrap_err();
        assert_eq!(err.code(), "not_allowed");
        assert!(f.repo.list_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_oauth_links_credentials_account() {
        let f = fixture().await;
        let created = f
            .repo
            .create_user(NewUser::credentials("a@x.com", "Ann", "Lee", "Secret123!"))
            .await
            .unwrap();

        f.service.sign_in_with_oauth(google("A@x.com")).await.unwrap();

        let user = f.repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(user.providers, vec![AuthProvider::Credentials, AuthProvider::Google]);
        assert_eq!(user.password_hash, created.password_hash);
        assert_eq!(user.display_name, "Ann Lee");
        assert_eq!(user.photo_url.as_deref(), Some("https://img.test/g.png"));
        assert!(user.email_verified);
        assert!(user.last_sign_in_at.is_some());

        // 비밀번호 로그인은 계속 가능
        assert!(f.service.sign_in_with_credentials("a@x.com", "Secret123!").await.is_ok());
    }

    #[actix_web::test]
    async fn test_oauth_never_overwrites_profile() {
        let f = fixture().await;
        let mut new_user = NewUser::credentials("a@x.com", "Ann", "Lee", "pw").with_display_name("Annie");
        new_user.photo_url = Some("https://img.test/mine.png".to_string());
        let created = f.repo.create_user(new_user).await.unwrap();

        f.service.sign_in_with_oauth(google("a@x.com")).await.unwrap();
        f.service.sign_in_with_oauth(google("a@x.com")).await.unwrap();

        let user = f.repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(user.display_name, "Annie");
        assert_eq!(user.photo_url.as_deref(), Some("https://img.test/mine.png"));
        assert_eq!(user.providers.len(), 2);
    }

    #[actix_web::test]
    async fn test_oauth_disabled_account() {
        let f = fixture().await;
        let created = f
            .repo
            .create_user(NewUser::credentials("a@x.com", "A", "B", "pw"))
            .await
            .unwrap();
        f.repo
            .update(&created.id, &UserUpdate { is_active: Some(false), ..Default::default() })
            .await
            .unwrap();

        let err = f.service.sign_in_with_oauth(google("a@x.com")).await.unwrap_err();
        assert_eq!(err.code(), "account_disabled");

        let user = f.repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(user.providers, vec![AuthProvider::Credentials]);
    }

    #[actix_web::test]
    async fn test_oauth_rejected_when_google_disabled_or_unverified() {
        let f = fixture().await;

        let mut unverified = google("u@x.com");
        unverified.email_verified = false;
        let err = f.service.sign_in_with_oauth(unverified).await.unwrap_err();
        assert_eq!(err.code(), "not_allowed");

        set_flag(&f, json!({"allow_google_auth": false})).await;
        let err = f.service.sign_in_with_oauth(google("u@x.com")).await.unwrap_err();
        assert_eq!(err.code(), "not_allowed");

        assert!(f.repo.list_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_provider_failure_is_provider_error() {
        let f = fixture_with(Some(ScriptedProvider {
            result: Err("connection reset".to_string()),
        }))
        .await;

        let err = f
            .service
            .complete_oauth(AuthProvider::Google, "code", "state")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "provider_error");
        assert!(f.repo.list_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_complete_oauth_with_scripted_provider() {
        let f = fixture_with(Some(ScriptedProvider {
            result: Ok(google("flow@x.com")),
        }))
        .await;

        let url = f.service.oauth_login_url(AuthProvider::Google).await.unwrap();
        assert!(url.login_url.starts_with("https://idp.test/"));

        let session = f
            .service
            .complete_oauth(AuthProvider::Google, "code", "s")
            .await
            .unwrap();
        assert_eq!(session.email, "flow@x.com");

        // 구성되지 않은 제공자
        let unconfigured = fixture().await;
        let err = unconfigured.service.oauth_login_url(AuthProvider::Google).await.unwrap_err();
        assert_eq!(err.code(), "not_allowed");
    }

    #[actix_web::test]
    async fn test_settings_outage_is_provider_error_on_every_oauth_entry() {
        let store = Arc::new(FaultyStore::default());
        let f = fixture_on(store.clone(), Some(ScriptedProvider {
            result: Ok(google("outage@x.com")),
        }))
        .await;
        store.fail_settings_reads.store(true, Ordering::SeqCst);

        let err = f.service.sign_in_with_oauth(google("outage@x.com")).await.unwrap_err();
        assert_eq!(err.code(), "provider_error");

        let err = f
            .service
            .complete_oauth(AuthProvider::Google, "code", "s")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "provider_error");

        let err = f.service.oauth_login_url(AuthProvider::Google).await.unwrap_err();
        assert_eq!(err.code(), "provider_error");

        assert!(f.repo.list_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_oauth_create_race_links_existing_account() {
        let store = Arc::new(FaultyStore::default());
        let f = fixture_on(store.clone(), None).await;
        let created = f
            .repo
            .create_user(NewUser::credentials("race@x.com", "Ann", "Lee", "Secret123!"))
            .await
            .unwrap();

        // 조회와 존재 확인이 모두 기존 사용자를 보지 못해 생성까지 진행된다
        store.stale_email_queries.store(2, Ordering::SeqCst);
        let session = f.service.sign_in_with_oauth(google("race@x.com")).await.unwrap();
        assert_eq!(session.id, created.id);

        let users = f.repo.list_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, created.id);
        assert_eq!(users[0].providers, vec![AuthProvider::Credentials, AuthProvider::Google]);
        assert_eq!(users[0].password_hash, created.password_hash);
        assert!(users[0].last_sign_in_at.is_some());
    }

    #[actix_web::test]
    async fn test_credentials_errors_are_indistinguishable() {
        let f = fixture().await;
        f.repo
            .create_user(NewUser::credentials("a@x.com", "A", "B", "Secret123!"))
            .await
            .unwrap();

        let wrong = f.service.sign_in_with_credentials("a@x.com", "nope").await.unwrap_err();
        let missing = f.service.sign_in_with_credentials("b@x.com", "nope").await.unwrap_err();
        assert_eq!(wrong.code(), "invalid_credentials");
        assert_eq!(wrong.to_string(), missing.to_string());
    }

    #[actix_web::test]
    async fn test_sign_up_gated_by_registration_flag() {
        let f = fixture().await;

        let session = f
            .service
            .sign_up(NewUser::credentials("s@x.com", "S", "U", "Secret123!").with_role(UserRole::Superadmin))
            .await
            .unwrap();
        assert_eq!(session.role, UserRole::User);

        set_flag(&f, json!({"allow_new_user_registration": false})).await;
        let err = f
            .service
            .sign_up(NewUser::credentials("t@x.com", "T", "U", "Secret123!"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_allowed");
    }

    #[test]
    fn test_plan_for_existing_provider_is_sign_in() {
        let mut user = User::create(NewUser::credentials("a@x.com", "A", "B", "pw"), None);
        user.providers.push(AuthProvider::Google);

        let plan = plan_oauth(Some(&user), &google("a@x.com"), &AppSettings::default()).unwrap();
        match plan {
            OAuthPlan::SignIn { user_id, changes } => {
                assert_eq!(user_id, user.id);
                assert!(changes.providers.is_none());
                assert_eq!(changes.photo_url.as_deref(), Some("https://img.test/g.png"));
                assert!(changes.display_name.is_none());
            }
            other => panic!("unexpected plan: {:?}", other),
        }
    }

    #[test]
    fn test_plan_create_splits_display_name_without_given_name() {
        let mut assertion = google("n@x.com");
        assertion.given_name = None;
        assertion.family_name = None;
        assertion.display_name = Some("Kim Min".to_string());

        match plan_oauth(None, &assertion, &AppSettings::default()).unwrap() {
            OAuthPlan::Create(new_user) => {
                assert_eq!(new_user.first_name, "Kim");
                assert_eq!(new_user.last_name, "Min");
                assert!(new_user.password.is_none());
                assert!(new_user.email_verified);
            }
            other => panic!("unexpected plan: {:?}", other),
        }
    }
}
