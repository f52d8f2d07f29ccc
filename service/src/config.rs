use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use secrecy::SecretString;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default Telegram Bot API base URL used when `TELEGRAM_API_BASE_URL` is not set.
pub const DEFAULT_TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

/// Default timeout applied to every outbound call (Telegram and Supabase).
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The Telegram bot token. Used to authenticate Bot API calls and to derive
    /// the key that Mini App init data is signed with.
    #[arg(long, env, hide_env_values = true)]
    bot_token: Option<String>,

    /// The channel (or group) a user must belong to in order to pass the gate.
    /// Either a numeric chat id or an `@username`.
    #[arg(long, env)]
    channel_id: Option<String>,

    /// The base URL of the Telegram Bot API.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_TELEGRAM_API_BASE_URL)]
    telegram_api_base_url: String,

    /// The base URL of the Supabase project that stores open/subscribe clicks.
    #[arg(long, env)]
    supabase_url: Option<String>,

    /// The service role key used when calling the Supabase REST API.
    #[arg(long, env, hide_env_values = true)]
    supabase_service_role_key: Option<String>,

    /// Timeout in seconds for each outbound HTTP call
    #[arg(long, env, default_value_t = DEFAULT_UPSTREAM_TIMEOUT_SECS)]
    pub upstream_timeout_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

const REDACTED: &str = "[REDACTED]";

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| REDACTED);
        f.debug_struct("Config")
            .field("allowed_origins", &self.allowed_origins)
            .field("bot_token", &redact(&self.bot_token))
            .field("channel_id", &self.channel_id)
            .field("telegram_api_base_url", &self.telegram_api_base_url)
            .field("supabase_url", &self.supabase_url)
            .field(
                "supabase_service_role_key",
                &redact(&self.supabase_service_role_key),
            )
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("interface", &self.interface)
            .field("port", &self.port)
            .field("log_level_filter", &self.log_level_filter)
            .field("runtime_env", &self.runtime_env)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn set_bot_token(mut self, bot_token: Option<String>) -> Self {
        self.bot_token = bot_token;
        self
    }

    pub fn set_channel_id(mut self, channel_id: Option<String>) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn set_telegram_api_base_url(mut self, base_url: String) -> Self {
        self.telegram_api_base_url = base_url;
        self
    }

    pub fn set_supabase(mut self, url: Option<String>, service_role_key: Option<String>) -> Self {
        self.supabase_url = url;
        self.supabase_service_role_key = service_role_key;
        self
    }

    /// Returns the bot token, if configured. An empty value counts as absent.
    pub fn bot_token(&self) -> Option<SecretString> {
        self.bot_token
            .as_ref()
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::new(token.clone()))
    }

    /// Returns the gated channel identifier, if configured.
    pub fn channel_id(&self) -> Option<&str> {
        self.channel_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns the Telegram Bot API base URL.
    pub fn telegram_api_base_url(&self) -> &str {
        &self.telegram_api_base_url
    }

    pub fn supabase_url(&self) -> Option<&str> {
        self.supabase_url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn supabase_service_role_key(&self) -> Option<SecretString> {
        self.supabase_service_role_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::new(key.clone()))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}
