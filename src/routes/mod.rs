//! API 라우트 설정 모듈
//!
//! 기능별 스코프와 각 스코프에 적용되는 인증 수준입니다.
//!
//! | 스코프 | 인증 |
//! |--------|------|
//! | `/health` | 없음 |
//! | `/api/v1/auth` | 없음 (인증을 위한 엔드포인트) |
//! | `/api/v1/me` | 로그인 |
//! | `/api/v1/users` | admin, superadmin |
//! | `/api/v1/settings` | 로그인 (변경은 서비스에서 admin 확인) |
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use serde_json::json;

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    configure_auth_routes(cfg);
    configure_me_routes(cfg);
    configure_user_routes(cfg);
    configure_settings_routes(cfg);
}

/// 인증 관련 라우트
///
/// - `POST /api/v1/auth/signup` - 자가 가입
/// - `POST /api/v1/auth/login` - 이메일/비밀번호 로그인
/// - `GET /api/v1/auth/google/login` - Google 로그인 URL
/// - `GET /api/v1/auth/google/callback` - Google 콜백
/// - `POST /api/v1/auth/verify` - 액세스 토큰 검증
/// - `POST /api/v1/auth/refresh` - 토큰 갱신
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"user@example.com","password":"Password123"}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            // 로컬 인증
            .service(handlers::auth::signup)
            .service(handlers::auth::local_login)
            .service(handlers::auth::verify_token)
            .service(handlers::auth::refresh_tokens)
            // Google OAuth
            .service(handlers::auth::google_login_url)
            .service(handlers::auth::google_oauth_callback)
    );
}

fn configure_me_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/me")
            .wrap(AuthMiddleware::required())
            .service(handlers::me::get_me)
            .service(handlers::me::update_me)
    );
}

/// 사용자 관리 라우트 (admin, superadmin)
///
/// `/stats` 는 `/{user_id}` 보다 먼저 등록해야 합니다.
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(AuthMiddleware::admin())
            .service(handlers::users::list_users)
            .service(handlers::users::user_stats)
            .service(handlers::users::create_user)
            .service(handlers::users::get_user)
            .service(handlers::users::update_user)
            .service(handlers::users::activate_user)
            .service(handlers::users::deactivate_user)
            .service(handlers::users::delete_user)
    );
}

fn configure_settings_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/settings")
            .wrap(AuthMiddleware::required())
            .service(handlers::settings::get_settings)
            .service(handlers::settings::update_settings)
            .service(handlers::settings::reset_settings)
            .service(handlers::settings::export_settings)
            .service(handlers::settings::import_settings)
    );
}

/// 헬스체크
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "admin_console_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use actix_web::{http::StatusCode, test, App};
    use chrono::Duration;
    use once_cell::sync::Lazy;
    use serde_json::Value;
    use crate::core::registry::ServiceLocator;
    use crate::db::{DocumentStore, InMemoryDocumentStore};
    use crate::domain::entities::users::{NewUser, UserRole};
    use crate::repositories::settings::SettingsRepository;
    use crate::repositories::users::UserRepository;
    use crate::services::auth::{BcryptPasswordHasher, SignInService, TokenService};
    use crate::services::settings::SettingsService;
    use crate::services::users::UserService;

    /// 테스트 프로세스 전체가 공유하는 서비스 구성
    static SERVICES: Lazy<Arc<UserRepository>> = Lazy::new(|| {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let user_repo = Arc::new(UserRepository::new(
            store.clone(),
            Arc::new(BcryptPasswordHasher::new(4)),
        ));
        let settings = Arc::new(SettingsService::new(Arc::new(SettingsRepository::new(store))));

        if !ServiceLocator::is_registered::<TokenService>() {
            ServiceLocator::set(Arc::new(TokenService::new(
                "middleware-test-secret",
                Duration::hours(1),
                Duration::days(1),
            )));
        }
        ServiceLocator::set(user_repo.clone());
        ServiceLocator::set(Arc::new(UserService::new(user_repo.clone())));
        ServiceLocator::set(Arc::new(SignInService::new(
            user_repo.clone(),
            settings.clone(),
            Vec::new(),
        )));
        ServiceLocator::set(settings);

        user_repo
    });

    fn login_request(email: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": password}))
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_signup_login_and_profile() {
        Lazy::force(&SERVICES);
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "email": "route-signup@x.com",
                "first_name": "Route",
                "last_name": "Tester",
                "password": "Secret123",
                "role": "superadmin"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["user"]["role"], "user");

        let res = test::call_service(&app, login_request("route-signup@x.com", "wrong-password").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "invalid_credentials");

        let res = test::call_service(&app, login_request("route-signup@x.com", "Secret123").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let token = body["access_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/v1/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::patch()
            .uri("/api/v1/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({"role": "admin"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        // 일반 사용자는 관리 API 에 접근할 수 없다
        let req = test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        // 설정 조회는 가능, 변경은 불가
        let req = test::TestRequest::get()
            .uri("/api/v1/settings")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri("/api/v1/settings")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .set_json(json!({"allow_google_auth": false}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_admin_lists_visible_users() {
        let user_repo = Lazy::force(&SERVICES).clone();
        user_repo
            .create_user(
                NewUser::credentials("route-admin@x.com", "Route", "Admin", "Secret123")
                    .with_role(UserRole::Admin),
            )
            .await
            .unwrap();
        user_repo
            .create_user(NewUser::credentials("route-member@x.com", "Route", "Member", "Secret123"))
            .await
            .unwrap();
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let res = test::call_service(&app, login_request("route-admin@x.com", "Secret123").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        let token = body["access_token"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/v1/users?search=route-&page_size=100")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let page: Value = test::read_body_json(res).await;
        let users = page["users"].as_array().unwrap();
        assert!(users.iter().all(|u| u["role"] == "user"));
        assert!(users.iter().any(|u| u["email"] == "route-member@x.com"));
        assert!(!users.iter().any(|u| u["email"] == "route-admin@x.com"));

        let req = test::TestRequest::get()
            .uri("/api/v1/users/does-not-exist")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
