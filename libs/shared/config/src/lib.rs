use std::env;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Supabase,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub storage_backend: StorageBackend,
    pub seed_on_start: bool,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub chat_session_ttl_secs: u64,
    pub chat_max_sessions: usize,
    pub chat_max_turns: usize,
    pub external_call_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let supabase_url = env::var("SUPABASE_URL")
            .unwrap_or_else(|_| {
                warn!("SUPABASE_URL not set, using empty value");
                String::new()
            });
        let supabase_anon_key = env::var("SUPABASE_ANON_PUBLIC_KEY")
            .unwrap_or_else(|_| {
                warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                String::new()
            });

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) if value.eq_ignore_ascii_case("memory") => StorageBackend::Memory,
            Ok(value) if value.eq_ignore_ascii_case("supabase") => StorageBackend::Supabase,
            Ok(value) => {
                warn!("Unknown STORAGE_BACKEND '{}', falling back to in-memory storage", value);
                StorageBackend::Memory
            }
            Err(_) if !supabase_url.is_empty() && !supabase_anon_key.is_empty() => StorageBackend::Supabase,
            Err(_) => {
                warn!("STORAGE_BACKEND not set and Supabase not configured, using in-memory storage");
                StorageBackend::Memory
            }
        };

        let config = Self {
            supabase_url,
            supabase_anon_key,
            storage_backend,
            seed_on_start: parse_or("SEED_ON_START", true),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("GEMINI_API_KEY not set, chat will be unavailable");
                    String::new()
                }),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            chat_session_ttl_secs: parse_or("CHAT_SESSION_TTL_SECS", 1800),
            chat_max_sessions: parse_or("CHAT_MAX_SESSIONS", 1000),
            chat_max_turns: parse_or("CHAT_MAX_TURNS", 50),
            external_call_timeout_secs: parse_or("EXTERNAL_CALL_TIMEOUT_SECS", 10),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            port: parse_or("PORT", 3000),
        };

        if config.storage_backend == StorageBackend::Supabase && !config.is_supabase_configured() {
            warn!("Supabase storage selected but SUPABASE_URL / SUPABASE_ANON_PUBLIC_KEY are missing");
        }

        config
    }

    pub fn is_supabase_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }

    pub fn is_assistant_configured(&self) -> bool {
        !self.gemini_api_key.is_empty()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            storage_backend: StorageBackend::Memory,
            seed_on_start: false,
            gemini_api_key: String::new(),
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            chat_session_ttl_secs: 1800,
            chat_max_sessions: 1000,
            chat_max_turns: 50,
            external_call_timeout_secs: 10,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .split(',')
                .map(str::to_string)
                .collect(),
            port: 3000,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using default", key, raw);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default", key);
            default
        }
    }
}
