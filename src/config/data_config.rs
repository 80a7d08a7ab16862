//! 데이터 저장소, 서버 및 실행 환경 설정
//!
//! 문서 저장소 선택(MongoDB / 메모리), 서버 바인딩, 요청 제한, 비밀번호 해싱 비용을
//! 환경 변수에서 읽어옵니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// 로컬 개발
    Development,
    /// 자동화 테스트
    Test,
    /// 운영 유사 환경
    Staging,
    /// 운영
    Production,
}

impl Environment {
    /// `ENVIRONMENT` (없으면 `APP_ENV`) 값으로 현재 환경을 판별합니다.
    ///
    /// 둘 다 없으면 `Production` 입니다.
    pub fn current() -> Self {
        let raw = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "production".to_string());
        Self::parse(&raw)
    }

    /// 대소문자를 구분하지 않고 환경 이름을 해석합니다. 알 수 없는 값은 `Production`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 비밀번호 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// bcrypt cost. `BCRYPT_COST` 가 4..=15 범위면 그 값을, 아니면 환경별 기본값을 사용합니다.
    pub fn bcrypt_cost() -> u32 {
        env::var("BCRYPT_COST")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|cost| (4..=15).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(Environment::current()))
    }

    /// 환경별 기본 cost. 운영 기본값 12는 신규 계정 생성 시의 해싱 비용과 같습니다.
    pub fn bcrypt_cost_for_env(env: Environment) -> u32 {
        match env {
            Environment::Development | Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// HTTP 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    /// `HOST`, 기본값 127.0.0.1
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    /// `PORT`, 기본값 8080
    pub fn port() -> u16 {
        env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080)
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }

    /// `HTTP_WORKERS`, 기본값 4
    pub fn workers() -> usize {
        env::var("HTTP_WORKERS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(4)
    }

    /// `CORS_ALLOWED_ORIGINS` (쉼표 구분). 비어 있으면 로컬 프론트엔드 주소들.
    pub fn allowed_origins() -> Vec<String> {
        let origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();

        if origins.is_empty() {
            vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ]
        } else {
            origins
        }
    }
}

/// 요청 제한(actix-governor) 설정
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// `RATE_LIMIT_PER_SECOND` (기본 100), `RATE_LIMIT_BURST_SIZE` (기본 200)
    pub fn from_env() -> Self {
        let per_second = env::var("RATE_LIMIT_PER_SECOND")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(100);
        let burst_size = env::var("RATE_LIMIT_BURST_SIZE")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(200);

        Self { per_second, burst_size }
    }
}

/// 사용할 문서 저장소 구현
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    /// 프로세스 메모리. 재시작 시 데이터가 사라집니다.
    Memory,
}

/// 문서 저장소 연결 설정
pub struct StorageConfig;

impl StorageConfig {
    /// `DOCUMENT_STORE` = `mongodb` (기본) | `memory`
    pub fn backend() -> StoreBackend {
        match env::var("DOCUMENT_STORE")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "memory" | "in-memory" | "inmemory" => StoreBackend::Memory,
            _ => StoreBackend::MongoDb,
        }
    }

    pub fn mongodb_uri() -> String {
        env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
    }

    pub fn database_name() -> String {
        env::var("DATABASE_NAME").unwrap_or_else(|_| "admin_console_dev".to_string())
    }

    /// MongoDB 모니터링에 표시되는 클라이언트 이름
    pub fn app_name() -> String {
        env::var("MONGODB_APP_NAME").unwrap_or_else(|_| "admin_console".to_string())
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
