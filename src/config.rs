use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; the in-memory store is used when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory uploaded photos are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,

    /// Origins allowed by CORS (comma separated in the environment)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Outfits returned by the daily suggestion endpoint unless the request asks otherwise
    #[serde(default = "default_outfit_limit")]
    pub outfit_limit: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_upload_size() -> usize {
    10 * 1024 * 1024
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

fn default_outfit_limit() -> usize {
    crate::services::DEFAULT_OUTFIT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_size: default_max_upload_size(),
            cors_origins: default_cors_origins(),
            outfit_limit: default_outfit_limit(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
