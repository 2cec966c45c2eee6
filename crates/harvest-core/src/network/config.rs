use serde::{Deserialize, Serialize};

/// HTTP fetch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds
    pub timeout_seconds: u32,
    /// Connection timeout in seconds
    pub connect_timeout_seconds: u32,
    /// Maximum number of redirects to follow
    pub max_redirects: usize,
    /// User agent to use (randomized desktop browser by default)
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            connect_timeout_seconds: 5,
            max_redirects: 10,
            user_agent: None,
        }
    }
}
