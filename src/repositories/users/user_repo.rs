//! 사용자 리포지토리
//!
//! 사용자 문서의 CRUD 와 이메일 유일성을 담당합니다. 저장 키는 UUID v7 `id` 이고
//! `email` 은 유니크 인덱스가 걸린 속성입니다.

use std::sync::Arc;
use chrono::Utc;
use mongodb::bson::{self, Bson, Document};
use once_cell::sync::OnceCell;
use crate::core::errors::{AppError, AppResult};
use crate::db::{DocumentStore, StoreError};
use crate::domain::entities::users::{normalize_email, NewUser, User, UserRole, UserUpdate};
use crate::services::auth::password_hasher::PasswordHasher;

pub const USERS_COLLECTION: &str = "users";

pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
    hasher: Arc<dyn PasswordHasher>,
    /// 존재하지 않는 이메일에도 같은 검증 비용을 쓰기 위한 해시
    dummy_hash: OnceCell<String>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            dummy_hash: OnceCell::new(),
        }
    }

    /// 이메일 유니크 인덱스 생성
    pub async fn init(&self) -> AppResult<()> {
        self.store
            .ensure_unique_index(USERS_COLLECTION, "email")
            .await?;
        log::info!("✅ users.email 유니크 인덱스 확인 완료");
        Ok(())
    }

    /// 사용자 생성
    ///
    /// 같은 이메일이 있으면 `DuplicateEmail`. 평문 비밀번호는 해시로만 저장되며,
    /// 인증 수단에 credentials 가 없으면 해시도 남기지 않습니다.
    pub async fn create_user(&self, mut data: NewUser) -> AppResult<User> {
        let email = normalize_email(&data.email);
        if email.is_empty() {
            return Err(AppError::ValidationError("이메일이 비어 있습니다".to_string()));
        }

        if self.exists_by_email(&email).await? {
            return Err(AppError::DuplicateEmail(email));
        }

        let wants_hash = data.providers.is_empty()
            || data.providers.contains(&crate::config::AuthProvider::Credentials);
        let password_hash = match data.password.take() {
            Some(password) if wants_hash && !password.is_empty() => {
                Some(self.hasher.hash(&password)?)
            }
            _ => None,
        };

        let user = User::create(data, password_hash);
        let doc = to_document(&user)?;

        match self.store.insert(USERS_COLLECTION, &user.id, doc).await {
            Ok(()) => {}
            // 읽은 뒤 쓰는 사이에 다른 요청이 같은 이메일을 먼저 썼을 때
            Err(StoreError::DuplicateKey(detail)) => {
                log::warn!("사용자 생성 중 중복 키: {}", detail);
                return Err(AppError::DuplicateEmail(user.email));
            }
            Err(e) => return Err(e.into()),
        }

        log::info!("사용자 생성: id={}, role={}", user.id, user.role);
        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.store
            .get(USERS_COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = normalize_email(email);
        let docs = self
            .store
            .query(USERS_COLLECTION, "email", Bson::String(email))
            .await?;

        docs.into_iter().next().map(from_document).transpose()
    }

    pub async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    pub async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        let docs = self
            .store
            .query(USERS_COLLECTION, "role", Bson::String(role.as_str().to_string()))
            .await?;

        docs.into_iter().map(from_document).collect()
    }

    /// 전체 사용자. 화면에 내보내기 전에 접근 정책을 반드시 적용해야 합니다.
    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        let docs = self.store.list(USERS_COLLECTION).await?;
        docs.into_iter().map(from_document).collect()
    }

    /// 부분 수정. `updated_at` 은 항상 갱신됩니다.
    pub async fn update(&self, id: &str, changes: &UserUpdate) -> AppResult<User> {
        let mut partial = bson::to_document(changes)
            .map_err(|e| AppError::InternalError(format!("사용자 변경 직렬화 실패: {}", e)))?;
        partial.insert("updated_at", now_bson()?);

        let found = match self.store.update(USERS_COLLECTION, id, partial).await {
            Ok(found) => found,
            Err(StoreError::DuplicateKey(detail)) => {
                return Err(AppError::DuplicateEmail(detail));
            }
            Err(e) => return Err(e.into()),
        };

        if !found {
            return Err(AppError::NotFound(format!("사용자를 찾을 수 없습니다: {}", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("사용자를 찾을 수 없습니다: {}", id)))
    }

    /// 마지막 로그인 시각 기록
    pub async fn record_sign_in(&self, id: &str) -> AppResult<User> {
        let changes = UserUpdate {
            last_sign_in_at: Some(Utc::now()),
            ..Default::default()
        };
        self.update(id, &changes).await
    }

    /// 이메일/비밀번호 인증
    ///
    /// 없는 이메일과 틀린 비밀번호는 모두 `InvalidCredentials` 입니다.
    /// 비활성 계정은 비밀번호 확인 전에 `AccountDisabled` 로 거절됩니다.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let start_time = std::time::Instant::now();

        let Some(user) = self.find_by_email(email).await? else {
            self.burn_dummy_verify(password);
            return Err(AppError::InvalidCredentials);
        };

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        let Some(password_hash) = user.password_hash.as_deref().filter(|_| user.can_authenticate_with_password()) else {
            self.burn_dummy_verify(password);
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        let signed_in = self.record_sign_in(&user.id).await?;
        log::debug!("Total password verification took: {:?}", start_time.elapsed());

        Ok(signed_in)
    }

    fn burn_dummy_verify(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hasher.hash("dummy-password-for-timing"));
        if let Ok(hash) = dummy {
            let _ = self.hasher.verify(password, hash);
        }
    }
}

fn to_document(user: &User) -> AppResult<Document> {
    bson::to_document(user)
        .map_err(|e| AppError::InternalError(format!("사용자 직렬화 실패: {}", e)))
}

fn from_document(doc: Document) -> AppResult<User> {
    bson::from_document(doc)
        .map_err(|e| AppError::DatabaseError(format!("사용자 문서 형식 오류: {}", e)))
}

fn now_bson() -> AppResult<Bson> {
    bson::to_bson(&Utc::now())
        .map_err(|e| AppError::InternalError(format!("시각 직렬화 실패: {}", e)))
}
