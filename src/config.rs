use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1";
pub const DEFAULT_MAX_PAGES: usize = 2;
pub const DEFAULT_PROMPT_CHARS: usize = 2000;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for one renaming run. Everything has a fixed default; only the inference endpoint
/// can be overridden, through the `OLLAMA_HOST` variable the Ollama client already honours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamerConfig {
    /// Base URL of the Ollama server.
    pub host: String,
    pub model: String,
    /// Number of leading pages whose text is sent to the model.
    pub max_pages: usize,
    /// Character budget for the document text embedded in the prompt.
    pub prompt_chars: usize,
    pub request_timeout: Duration,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            prompt_chars: DEFAULT_PROMPT_CHARS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl RenamerConfig {
    /// Defaults, with the host taken from `OLLAMA_HOST` when set (a `.env` file is loaded first).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();

        if let Some(host) = non_empty_var("OLLAMA_HOST") {
            config.host = normalize_host(&host);
            info!(host = %config.host, "OLLAMA_HOST found in env");
        }
        config
    }

    pub fn trace_loaded(&self) {
        info!(
            host = %self.host,
            model = %self.model,
            max_pages = self.max_pages,
            "Loaded renamer config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Ok(_) => {
            warn!(var = key, "Ignoring empty environment variable");
            None
        }
        Err(_) => None,
    }
}

/// `OLLAMA_HOST` is commonly given as `host:port`; the HTTP client needs a scheme.
fn normalize_host(raw: &str) -> String {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}
