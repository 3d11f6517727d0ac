use std::str::FromStr;

/// Byte ceiling per transcription request: 24 MiB keeps a margin under the
/// service's 25 MiB hard limit.
const DEFAULT_CHUNK_BYTE_CEILING: u64 = 24 * 1024 * 1024;
const DEFAULT_MAX_WINDOW_TOKENS: usize = 6_000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub transcription: TranscriptionSettings,
    pub llm: LlmSettings,
    pub pipeline: PipelineSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProviderSetting {
    Local,
    Supabase,
}

impl FromStr for StorageProviderSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "supabase" => Ok(Self::Supabase),
            other => Err(format!("unknown storage provider: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub bucket: String,
    pub local_path: String,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub chat_model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub chunk_byte_ceiling: u64,
    pub max_window_tokens: usize,
    pub prompt_dir: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl Settings {
    /// Reads the full configuration from the environment. Missing credentials
    /// fail here, at startup, never mid-run.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = parse_var("STORAGE_PROVIDER", StorageProviderSetting::Local)?;

        let supabase_url = std::env::var("SUPABASE_URL").ok();
        let supabase_key = std::env::var("SUPABASE_KEY").ok();

        if provider == StorageProviderSetting::Supabase {
            if supabase_url.is_none() {
                return Err(ConfigError::Missing("SUPABASE_URL"));
            }
            if supabase_key.is_none() {
                return Err(ConfigError::Missing("SUPABASE_KEY"));
            }
        }

        let api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| ConfigError::Missing("OPENAI_API_KEY"))?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::Missing("OPENAI_API_KEY"));
        }

        Ok(Self {
            server: ServerSettings {
                host: var_or("SERVER_HOST", "0.0.0.0"),
                port: parse_var("SERVER_PORT", 3000)?,
            },
            storage: StorageSettings {
                provider,
                bucket: var_or("STORAGE_BUCKET", "videos"),
                local_path: var_or("STORAGE_LOCAL_PATH", "./media"),
                supabase_url,
                supabase_key,
            },
            transcription: TranscriptionSettings {
                model: var_or("TRANSCRIPTION_MODEL", "whisper-1"),
            },
            llm: LlmSettings {
                api_key,
                base_url: std::env::var("OPENAI_BASE_URL").ok(),
                chat_model: var_or("CHAT_MODEL", "gpt-4o-mini"),
                max_tokens: parse_var("LLM_MAX_TOKENS", 2048)?,
                temperature: parse_var("LLM_TEMPERATURE", 0.2)?,
            },
            pipeline: PipelineSettings {
                chunk_byte_ceiling: parse_var("CHUNK_BYTE_CEILING", DEFAULT_CHUNK_BYTE_CEILING)?,
                max_window_tokens: parse_var("MAX_WINDOW_TOKENS", DEFAULT_MAX_WINDOW_TOKENS)?,
                prompt_dir: var_or("PROMPT_DIR", "prompts"),
            },
            database: DatabaseSettings {
                url: std::env::var("DATABASE_URL").ok(),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            value: value.clone(),
        }),
        Err(_) => Ok(default),
    }
}
