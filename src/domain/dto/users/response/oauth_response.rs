use serde::{Deserialize, Serialize};

/// OAuth 로그인 시작 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthLoginUrlResponse {
    pub login_url: String,

    /// 콜백에서 되돌려 받아 검증할 서명된 state
    pub state: String,
}
