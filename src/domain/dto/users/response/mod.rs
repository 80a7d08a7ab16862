pub mod oauth_response;
pub mod user_response;

pub use oauth_response::OAuthLoginUrlResponse;
pub use user_response::{LoginResponse, UserPage, UserResponse, UserSession, UserStats};
