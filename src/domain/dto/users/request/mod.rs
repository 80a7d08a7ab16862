pub mod auth_request;
pub mod create_user;
pub mod update_user;
pub mod user_query;

pub use auth_request::{LocalLoginRequest, OAuthCallbackQuery, RefreshTokenRequest};
pub use create_user::CreateUserRequest;
pub use update_user::UpdateUserRequest;
pub use user_query::{UserFilters, UserListQuery, UserStatus};
