use serde::Deserialize;
use std::env;
use std::path::PathBuf;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Reads a string variable, treating blank values as unset.
fn env_non_empty(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface the listener binds to.
    pub bind_addr: String,
    pub port: u16,
    /// Public host name, only used when announcing the server URL.
    pub host: Option<String>,
    pub max_request_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_bytes: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language codes, `+`-joined (e.g. `eng+deu`).
    pub languages: String,
    pub data_path: Option<String>,
    pub timeout_secs: u64,
    pub preprocess: bool,
    pub max_image_dimension: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_bytes: 20 * 1024 * 1024,
            user_agent: format!("ocrlink/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: "eng".to_string(),
            data_path: None,
            timeout_secs: 60,
            preprocess: false,
            max_image_dimension: 4096,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let fetch_defaults = FetchConfig::default();
        let ocr_defaults = OcrConfig::default();

        Self {
            server: ServerConfig {
                bind_addr: env_non_empty("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_env_or("PORT", 3000),
                host: env_non_empty("HOST"),
                max_request_bytes: parse_env_or("MAX_REQUEST_BYTES", 64 * 1024),
            },
            fetch: FetchConfig {
                timeout_secs: parse_env_or("FETCH_TIMEOUT", fetch_defaults.timeout_secs),
                max_bytes: parse_env_or("FETCH_MAX_BYTES", fetch_defaults.max_bytes),
                user_agent: fetch_defaults.user_agent,
            },
            storage: StorageConfig {
                upload_dir: env_non_empty("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("uploads")),
            },
            ocr: OcrConfig {
                languages: env_non_empty("TESSERACT_LANG").unwrap_or(ocr_defaults.languages),
                data_path: env_non_empty("TESSDATA_PATH"),
                timeout_secs: parse_env_or("OCR_TIMEOUT", ocr_defaults.timeout_secs),
                preprocess: parse_env_or("OCR_PREPROCESS", ocr_defaults.preprocess),
                max_image_dimension: parse_env_or(
                    "OCR_MAX_DIMENSION",
                    ocr_defaults.max_image_dimension,
                ),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Host shown in the startup log line; falls back to the bind address.
    pub fn display_host(&self) -> &str {
        self.server
            .host
            .as_deref()
            .unwrap_or(self.server.bind_addr.as_str())
    }
}
