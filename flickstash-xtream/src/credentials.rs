use std::path::PathBuf;

use crate::error::FetchError;

/// Account details for one Xtream provider.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

/// TOML config file format.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ConfigFile {
    provider: Option<ProviderConfig>,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct ProviderConfig {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

impl Credentials {
    /// Load credentials from environment variables or the config file.
    ///
    /// Priority: env vars > config file. All three fields are required.
    pub fn load() -> Result<Self, FetchError> {
        let config = load_config_file();

        let base_url = std::env::var("FLICKSTASH_BASE_URL")
            .ok()
            .or_else(|| config.as_ref().and_then(|c| c.base_url.clone()))
            .ok_or_else(|| {
                FetchError::Config(
                    "Missing base_url. Set FLICKSTASH_BASE_URL env var or add to config file"
                        .to_string(),
                )
            })?;

        let username = std::env::var("FLICKSTASH_USERNAME")
            .ok()
            .or_else(|| config.as_ref().and_then(|c| c.username.clone()))
            .ok_or_else(|| {
                FetchError::Config(
                    "Missing username. Set FLICKSTASH_USERNAME env var or add to config file"
                        .to_string(),
                )
            })?;

        let password = std::env::var("FLICKSTASH_PASSWORD")
            .ok()
            .or_else(|| config.as_ref().and_then(|c| c.password.clone()))
            .ok_or_else(|| {
                FetchError::Config(
                    "Missing password. Set FLICKSTASH_PASSWORD env var or add to config file"
                        .to_string(),
                )
            })?;

        Ok(Self {
            base_url,
            username,
            password,
        })
    }

    /// Create credentials with explicit values (e.g., from CLI args).
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(user) = username {
            self.username = user;
        }
        if let Some(pw) = password {
            self.password = pw;
        }
        self
    }
}

/// Return the path to the credentials config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("flickstash").join("credentials.toml"))
}

/// Save credentials to the config file, creating parent directories as needed.
/// Returns the path the file was written to.
pub fn save_to_file(creds: &Credentials) -> Result<PathBuf, FetchError> {
    let path = config_path()
        .ok_or_else(|| FetchError::Config("Could not determine config directory".to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = ConfigFile {
        provider: Some(ProviderConfig {
            base_url: Some(creds.base_url.clone()),
            username: Some(creds.username.clone()),
            password: Some(creds.password.clone()),
        }),
    };

    let toml_str = toml::to_string_pretty(&config)
        .map_err(|e| FetchError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(&path, toml_str)?;
    Ok(path)
}

fn load_config_file() -> Option<ProviderConfig> {
    let path = config_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    let config: ConfigFile = toml::from_str(&content).ok()?;
    config.provider
}
