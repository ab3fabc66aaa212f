//! Server configuration.
//!
//! Every setting can be given as a flag or through the environment
//! (a `.env` file is loaded first by the binary).

use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

/// Default completion model.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Groq's OpenAI-compatible completion endpoint.
pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Origin of the Vite dev server.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// ConsultIA relay server configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "consultia-server", about = "ConsultIA chat relay server")]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Groq API key; the chat relay is disabled without it
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// Completion model
    #[arg(long, env = "GROQ_MODEL", default_value = DEFAULT_MODEL)]
    pub groq_model: String,

    /// Completion endpoint URL
    #[arg(long, env = "GROQ_API_URL", default_value = DEFAULT_GROQ_API_URL)]
    pub groq_api_url: String,

    /// Upstream timeout in seconds
    #[arg(
        long,
        env = "GROQ_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub groq_timeout_secs: u64,

    /// Maximum completion tokens
    #[arg(long, env = "GROQ_MAX_TOKENS", default_value_t = 1000)]
    pub max_tokens: u32,

    /// Sampling temperature
    #[arg(long, env = "GROQ_TEMPERATURE", default_value_t = 0.7)]
    pub temperature: f32,

    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase service role key
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub supabase_service_role_key: Option<String>,

    /// Timeout for each persistence request in seconds
    #[arg(
        long,
        env = "SUPABASE_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub supabase_timeout_secs: u64,

    /// Comma-separated CORS allow-list; `*.example.com` matches subdomains
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = DEFAULT_ALLOWED_ORIGIN
    )]
    pub allowed_origins: Vec<String>,

    /// Frontend origin, added to the allow-list
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            groq_api_key: None,
            groq_model: DEFAULT_MODEL.to_string(),
            groq_api_url: DEFAULT_GROQ_API_URL.to_string(),
            groq_timeout_secs: 30,
            max_tokens: 1000,
            temperature: 0.7,
            supabase_url: None,
            supabase_service_role_key: None,
            supabase_timeout_secs: 10,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            frontend_url: None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Trimmed API key, `None` if unset or blank.
    pub fn groq_api_key(&self) -> Option<&str> {
        non_empty(&self.groq_api_key)
    }

    /// Supabase URL and key, only when both are present.
    pub fn supabase_credentials(&self) -> Option<(&str, &str)> {
        match (
            non_empty(&self.supabase_url),
            non_empty(&self.supabase_service_role_key),
        ) {
            (Some(url), Some(key)) => Some((url, key)),
            _ => None,
        }
    }

    pub fn groq_timeout(&self) -> Duration {
        Duration::from_secs(self.groq_timeout_secs)
    }

    pub fn supabase_timeout(&self) -> Duration {
        Duration::from_secs(self.supabase_timeout_secs)
    }

    /// Allowed CORS origins, including the frontend URL.
    pub fn origins(&self) -> Vec<String> {
        let frontend = non_empty(&self.frontend_url);
        let mut origins: Vec<String> = Vec::new();
        for origin in self.allowed_origins.iter().map(String::as_str).chain(frontend) {
            let origin = origin.trim().trim_end_matches('/');
            if !origin.is_empty() && !origins.iter().any(|o| o == origin) {
                origins.push(origin.to_string());
            }
        }
        origins
    }

    /// Log which integrations are configured, never their values.
    pub fn log_summary(&self) {
        let present = |set: bool| if set { "present" } else { "missing" };

        info!(
            groq_api_key = present(self.groq_api_key().is_some()),
            supabase_url = present(non_empty(&self.supabase_url).is_some()),
            supabase_service_role_key =
                present(non_empty(&self.supabase_service_role_key).is_some()),
            model = %self.groq_model,
            "Configuration loaded"
        );

        if self.groq_api_key().is_none() {
            warn!("GROQ_API_KEY is not set - /chat will answer 500");
        }
        if self.supabase_credentials().is_none() {
            warn!("Supabase credentials missing - chat persistence disabled");
        }
    }
}
