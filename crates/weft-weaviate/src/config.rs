use std::fmt;

use weft_core::WeftError;

pub const OPENAI_KEY_HEADER: &str = "X-OpenAI-Api-Key";
pub const COHERE_KEY_HEADER: &str = "X-Cohere-Api-Key";

/// Configuration for connecting to a Weaviate instance.
#[derive(Clone)]
pub struct WeaviateConfig {
    /// HTTP scheme: `http` or `https`.
    pub scheme: String,
    /// Host and optional port, e.g. `localhost:8080` or `my-cluster.weaviate.cloud`.
    pub host: String,
    /// API key sent as a bearer token (Weaviate Cloud).
    pub api_key: Option<String>,
    /// Extra headers sent with every request, e.g. inference provider keys.
    pub headers: Vec<(String, String)>,
}

impl WeaviateConfig {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            api_key: None,
            headers: Vec::new(),
        }
    }

    /// Parse a cluster URL such as `https://abc.c0.europe-west2.gcp.weaviate.cloud/`.
    ///
    /// A URL without a scheme is treated as `https`. Any path is ignored.
    pub fn from_url(url: &str) -> Result<Self, WeftError> {
        let url = url.trim();
        let full = if url.contains("://") {
            url.to_string()
        } else {
            format!("https://{url}")
        };
        let parsed = reqwest::Url::parse(&full)
            .map_err(|e| WeftError::Config(format!("invalid Weaviate URL {url:?}: {e}")))?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(WeftError::Config(format!(
                "unsupported scheme {scheme:?} in {url:?}"
            )));
        }
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| WeftError::Config(format!("missing host in {url:?}")))?;
        let host = match parsed.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self::new(scheme, host))
    }

    /// Load from the process environment.
    ///
    /// | Variable | |
    /// |----------|-|
    /// | `WEAVIATE_URL` | required |
    /// | `WEAVIATE_API_KEY` | optional |
    /// | `OPENAI_API_KEY` | sent as `X-OpenAI-Api-Key`, empty if unset |
    /// | `COHERE_API_KEY` | sent as `X-Cohere-Api-Key`, empty if unset |
    pub fn from_env() -> Result<Self, WeftError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, WeftError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("WEAVIATE_URL")
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| WeftError::Config("WEAVIATE_URL is not set".to_string()))?;

        let mut config = Self::from_url(&url)?;
        if let Some(key) = lookup("WEAVIATE_API_KEY").filter(|k| !k.is_empty()) {
            config = config.with_api_key(key);
        }
        Ok(config
            .with_openai_api_key(lookup("OPENAI_API_KEY").unwrap_or_default())
            .with_cohere_api_key(lookup("COHERE_API_KEY").unwrap_or_default()))
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set a header, replacing an earlier value for the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn with_openai_api_key(self, key: impl Into<String>) -> Self {
        self.with_header(OPENAI_KEY_HEADER, key)
    }

    pub fn with_cohere_api_key(self, key: impl Into<String>) -> Self {
        self.with_header(COHERE_KEY_HEADER, key)
    }

    /// Build the base URL from scheme and host.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

impl fmt::Debug for WeaviateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<&str> = self.headers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("WeaviateConfig")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("headers", &headers)
            .finish()
    }
}
