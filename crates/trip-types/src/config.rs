use serde::{Deserialize, Serialize};

/// Browser local-storage keys. The token and cached user are written on
/// login and cleared on logout; the rest persist across sessions.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const THEME: &str = "theme";
    pub const PAYMENT_METHODS: &str = "paymentMethods";
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST base URL, configured once.
    pub api_base: String,
    /// STOMP broker endpoint.
    pub ws_url: String,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "https://travel2-x2et.onrender.com".to_string(),
            ws_url: "wss://travel2-x2et.onrender.com/ws".to_string(),
            theme: Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(()),
        }
    }
}
