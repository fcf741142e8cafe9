use serde::Deserialize;

const CALLBACK_PATH: &str = "/callback";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Spotify OAuth client ID
    pub spotify_client_id: String,

    /// Spotify OAuth client secret
    pub spotify_client_secret: String,

    /// Base redirect URI registered with Spotify (`/callback` is appended when missing)
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Frontend the OAuth callback redirects back to
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Hugging Face inference API key, rule-based recommendations only when absent
    #[serde(default)]
    pub huggingface_api_key: Option<String>,

    /// Text generation endpoint
    #[serde(default = "default_generation_api_url")]
    pub generation_api_url: String,

    /// Upper bound for a single text generation call
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redirect_uri() -> String {
    "http://localhost:5000".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5000".to_string(),
        "http://127.0.0.1:5000".to_string(),
    ]
}

fn default_generation_api_url() -> String {
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    8
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Redirect URI sent to Spotify, always ending in `/callback`
    pub fn callback_uri(&self) -> String {
        let base = self.redirect_uri.trim_end_matches('/');
        if base.ends_with(CALLBACK_PATH) {
            base.to_string()
        } else {
            format!("{}{}", base, CALLBACK_PATH)
        }
    }

    /// Generation credential, `None` when unset or blank
    pub fn generation_api_key(&self) -> Option<&str> {
        self.huggingface_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        envy::from_iter(
            vars.iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
        .unwrap()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SPOTIFY_CLIENT_ID", "client"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
        ]
    }

    #[test]
    fn test_defaults_applied() {
        let config = config_from(&minimal());

        assert_eq!(config.port, 5000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.generation_timeout_secs, 8);
        assert_eq!(config.allowed_origins.len(), 2);
        assert!(config.generation_api_key().is_none());
    }

    #[test]
    fn test_missing_client_id_fails() {
        let result = envy::from_iter::<_, Config>(vec![(
            "SPOTIFY_CLIENT_SECRET".to_string(),
            "secret".to_string(),
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn test_callback_uri_appends_path() {
        let mut vars = minimal();
        vars.push(("REDIRECT_URI", "https://example.com/"));
        assert_eq!(config_from(&vars).callback_uri(), "https://example.com/callback");
    }

    #[test]
    fn test_callback_uri_keeps_existing_path() {
        let mut vars = minimal();
        vars.push(("REDIRECT_URI", "https://example.com/callback"));
        assert_eq!(config_from(&vars).callback_uri(), "https://example.com/callback");
    }

    #[test]
    fn test_blank_generation_key_is_absent() {
        let mut vars = minimal();
        vars.push(("HUGGINGFACE_API_KEY", "   "));
        assert!(config_from(&vars).generation_api_key().is_none());

        let mut vars = minimal();
        vars.push(("HUGGINGFACE_API_KEY", "hf_123"));
        assert_eq!(config_from(&vars).generation_api_key(), Some("hf_123"));
    }

    #[test]
    fn test_allowed_origins_comma_separated() {
        let mut vars = minimal();
        vars.push(("ALLOWED_ORIGINS", "https://a.example,https://b.example"));
        assert_eq!(
            config_from(&vars).allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }
}
