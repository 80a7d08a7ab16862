//! 비밀번호 해시 (bcrypt)

use crate::config::PasswordConfig;
use crate::core::errors::{AppError, AppResult};

/// 단방향 솔트 해시와 검증
///
/// 저장소 계층은 이 트레이트만 사용합니다. 평문은 어디에도 저장되지 않습니다.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> AppResult<String>;

    /// 형식이 잘못된 해시는 `false` 가 아니라 에러입니다.
    fn verify(&self, plaintext: &str, hash: &str) -> AppResult<bool>;
}

/// bcrypt 구현. cost 는 환경별로 다릅니다 (`PasswordConfig::bcrypt_cost`).
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn from_env() -> Self {
        Self::new(PasswordConfig::bcrypt_cost())
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> AppResult<String> {
        let hash_start = std::time::Instant::now();
        let hashed = bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
        log::debug!("Password hashing took: {:?}", hash_start.elapsed());
        Ok(hashed)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> AppResult<bool> {
        bcrypt::verify(plaintext, hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))
    }
}
