//! 외부 신원 제공자 모델

pub mod google_oauth_model;
pub mod identity_assertion;

pub use google_oauth_model::{GoogleTokenResponse, GoogleUserInfo};
pub use identity_assertion::IdentityAssertion;
