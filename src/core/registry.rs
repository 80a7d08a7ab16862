//! # Service Registry
//!
//! 타입을 키로 하는 전역 서비스 컨테이너입니다. `main` 에서 구성한 서비스 인스턴스를
//! `ServiceLocator::set` 으로 한 번 등록하고, 핸들러와 미들웨어는 `ServiceLocator::get`
//! 으로 꺼내 씁니다.
//!
//! 서비스 자체는 생성자에서 `Arc` 의존성을 명시적으로 받으므로, 단위 테스트에서는
//! 레지스트리를 거치지 않고 직접 조립합니다.
//!
//! ```rust,ignore
//! let repo = Arc::new(UserRepository::new(store, hasher));
//! ServiceLocator::set(repo.clone());
//!
//! // 핸들러에서
//! let repo = ServiceLocator::get::<UserRepository>()?;
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use once_cell::sync::Lazy;
use crate::core::errors::{AppError, AppResult};

type Registry = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

static LOCATOR: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// 전역 서비스 컨테이너
pub struct ServiceLocator;

impl ServiceLocator {
    /// 인스턴스를 등록합니다. 같은 타입이 이미 있으면 교체합니다.
    pub fn set<T: Send + Sync + 'static>(instance: Arc<T>) {
        let mut registry = LOCATOR.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if registry.insert(TypeId::of::<T>(), instance).is_some() {
            log::debug!("서비스 교체: {}", short_type_name::<T>());
        } else {
            log::debug!("서비스 등록: {}", short_type_name::<T>());
        }
    }

    /// 등록된 인스턴스를 꺼냅니다. 없으면 `None`.
    pub fn try_get<T: Send + Sync + 'static>() -> Option<Arc<T>> {
        let registry = LOCATOR.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        registry
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// 등록된 인스턴스를 꺼냅니다. 없으면 `InternalError`.
    pub fn get<T: Send + Sync + 'static>() -> AppResult<Arc<T>> {
        Self::try_get::<T>().ok_or_else(|| {
            AppError::InternalError(format!(
                "등록되지 않은 서비스입니다: {}",
                short_type_name::<T>()
            ))
        })
    }

    pub fn is_registered<T: Send + Sync + 'static>() -> bool {
        let registry = LOCATOR.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        registry.contains_key(&TypeId::of::<T>())
    }

    pub fn registered_count() -> usize {
        LOCATOR.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

/// `a::b::UserRepository` -> `UserRepository`
fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
