//! 관리자 콘솔 백엔드 메인 애플리케이션
//!
//! 문서 저장소에 연결하고 서비스를 조립해 `ServiceLocator` 에 등록한 뒤
//! Actix-web HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use admin_console_backend::config::{
    Environment, RateLimitConfig, ServerConfig, StorageConfig, StoreBackend,
};
use admin_console_backend::core::registry::ServiceLocator;
use admin_console_backend::db::{DocumentStore, InMemoryDocumentStore, MongoDocumentStore};
use admin_console_backend::repositories::settings::SettingsRepository;
use admin_console_backend::repositories::users::UserRepository;
use admin_console_backend::routes::configure_all_routes;
use admin_console_backend::services::auth::{
    BcryptPasswordHasher, GoogleIdentityProvider, IdentityProvider, SignInService, TokenService,
};
use admin_console_backend::services::settings::SettingsService;
use admin_console_backend::services::users::UserService;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 관리자 콘솔 백엔드 시작중... (environment={})", Environment::current().as_str());

    let store = initialize_document_store().await?;

    register_services(store).await?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다! ({}개)", ServiceLocator::registered_count());

    // HTTP 서버 시작
    start_http_server().await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 요청 제한, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
///
/// ```rust,ignore
/// // Health check: http://127.0.0.1:8080/health
/// // API 엔드포인트: http://127.0.0.1:8080/api/v1/*
/// ```
async fn start_http_server() -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    // Rate Limiting 설정
    let rate_limit_config = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "잘못된 요청 제한 설정입니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
        .bind(&bind_address)?
        .workers(ServerConfig::workers())
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// `RUST_LOG` 기반 로깅 초기화 (기본값: "info,actix_web=debug")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// `DOCUMENT_STORE` 에 따라 문서 저장소를 연결합니다
async fn initialize_document_store() -> io::Result<Arc<dyn DocumentStore>> {
    match StorageConfig::backend() {
        StoreBackend::MongoDb => {
            info!("📡 MongoDB 연결 중...");
            let store = MongoDocumentStore::connect().await.map_err(|e| {
                error!("MongoDB 연결 실패: {}", e);
                io::Error::other(e.to_string())
            })?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("⚠️ 메모리 저장소를 사용합니다. 재시작하면 데이터가 사라집니다");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}

/// 서비스를 조립해 `ServiceLocator` 에 등록합니다
async fn register_services(store: Arc<dyn DocumentStore>) -> io::Result<()> {
    let hasher = Arc::new(BcryptPasswordHasher::from_env());

    let user_repo = Arc::new(UserRepository::new(store.clone(), hasher));
    user_repo.init().await.map_err(|e| {
        error!("사용자 저장소 초기화 실패: {}", e);
        io::Error::other(e.to_string())
    })?;

    let settings_repo = Arc::new(SettingsRepository::new(store));
    let settings = Arc::new(SettingsService::new(settings_repo.clone()));

    let mut identity_providers: Vec<Arc<dyn IdentityProvider>> = Vec::new();
    match GoogleIdentityProvider::from_env() {
        Ok(Some(google)) => identity_providers.push(Arc::new(google)),
        Ok(None) => {}
        Err(e) => {
            error!("Google OAuth 클라이언트 생성 실패: {}", e);
            return Err(io::Error::other(e.to_string()));
        }
    }

    ServiceLocator::set(Arc::new(TokenService::from_env()));
    ServiceLocator::set(Arc::new(UserService::new(user_repo.clone())));
    ServiceLocator::set(Arc::new(SignInService::new(
        user_repo.clone(),
        settings.clone(),
        identity_providers,
    )));
    ServiceLocator::set(user_repo);
    ServiceLocator::set(settings_repo);
    ServiceLocator::set(settings);

    Ok(())
}

/// `CORS_ALLOWED_ORIGINS` 의 Origin 만 허용합니다
fn configure_cors() -> Cors {
    ServerConfig::allowed_origins()
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
