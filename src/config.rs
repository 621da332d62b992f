use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub admin: AdminConfig,
    pub stripe: StripeConfig,
    #[serde(default)]
    pub email: EmailConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma separated list, `*` allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    /// bcrypt hash of the shared admin password
    pub password_hash: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Empty key switches to the log-only mailer
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_email_api_url")]
    pub api_url: String,
    #[serde(default = "default_email_from")]
    pub from: String,
    #[serde(default)]
    pub admin_recipient: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_email_api_url(),
            from: default_email_from(),
            admin_recipient: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Frontend origin used for checkout success/cancel redirects
    pub public_url: String,
    #[serde(default = "default_site_name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    pub enabled: bool,
    pub reconcile_interval_secs: u64,
    /// Pending bookings younger than this are left to the webhook
    pub pending_grace_minutes: i64,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reconcile_interval_secs: 600,
            pending_grace_minutes: 30,
        }
    }
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    8
}

fn default_session_ttl() -> i64 {
    24
}

fn default_currency() -> String {
    "eur".to_string()
}

fn default_email_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_email_from() -> String {
    "Desideri di Puglia <prenotazioni@desideridipuglia.it>".to_string()
}

fn default_site_name() -> String {
    "Desideri di Puglia".to_string()
}

impl ServerConfig {
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            None
        } else {
            Some(origins)
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Without a config file everything comes from the environment
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => toml::from_str(&config_str)
                .map_err(|e| format!("Failed to parse config file: {e}"))?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env_defaults()?,
            Err(e) => {
                return Err(format!("Cannot read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_env_defaults() -> Result<Self, Box<dyn std::error::Error>> {
        fn get_env(name: &str) -> Option<String> {
            env::var(name).ok()
        }
        fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
            env::var(name)
                .ok()
                .and_then(|v| v.parse::<T>().ok())
                .unwrap_or(default)
        }

        let database_url = get_env("DATABASE_URL")
            .ok_or("DATABASE_URL is not set and no config.toml was found")?;

        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8001u16),
                cors_origins: get_env("CORS_ORIGINS").unwrap_or_else(default_cors_origins),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                min_connections: get_env_parse("DB_MIN_CONNECTIONS", default_min_connections()),
                connect_timeout_secs: get_env_parse(
                    "DB_CONNECT_TIMEOUT_SECS",
                    default_connect_timeout(),
                ),
            },
            admin: AdminConfig {
                username: get_env("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
                password_hash: get_env("ADMIN_PASSWORD_HASH").unwrap_or_default(),
                session_ttl_hours: get_env_parse("ADMIN_SESSION_TTL_HOURS", default_session_ttl()),
            },
            stripe: StripeConfig {
                secret_key: get_env("STRIPE_API_KEY").unwrap_or_default(),
                webhook_secret: get_env("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
                currency: get_env("STRIPE_CURRENCY").unwrap_or_else(default_currency),
            },
            email: EmailConfig {
                api_key: get_env("EMAIL_API_KEY").unwrap_or_default(),
                api_url: get_env("EMAIL_API_URL").unwrap_or_else(default_email_api_url),
                from: get_env("EMAIL_FROM").unwrap_or_else(default_email_from),
                admin_recipient: get_env("EMAIL_ADMIN_RECIPIENT"),
            },
            site: SiteConfig {
                public_url: get_env("SITE_PUBLIC_URL")
                    .unwrap_or_else(|| "http://localhost:3000".to_string()),
                name: get_env("SITE_NAME").unwrap_or_else(default_site_name),
            },
            tasks: TasksConfig {
                enabled: get_env_parse("TASKS_ENABLED", true),
                reconcile_interval_secs: get_env_parse("TASKS_RECONCILE_INTERVAL_SECS", 600u64),
                pending_grace_minutes: get_env_parse("TASKS_PENDING_GRACE_MINUTES", 30i64),
            },
        })
    }

    // Environment always wins over the file
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.server.cors_origins = v;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("ADMIN_USERNAME") {
            self.admin.username = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD_HASH") {
            self.admin.password_hash = v;
        }
        if let Ok(v) = env::var("ADMIN_SESSION_TTL_HOURS")
            && let Ok(n) = v.parse()
        {
            self.admin.session_ttl_hours = n;
        }
        if let Ok(v) = env::var("STRIPE_API_KEY") {
            self.stripe.secret_key = v;
        }
        if let Ok(v) = env::var("STRIPE_WEBHOOK_SECRET") {
            self.stripe.webhook_secret = v;
        }
        if let Ok(v) = env::var("STRIPE_CURRENCY") {
            self.stripe.currency = v;
        }
        if let Ok(v) = env::var("EMAIL_API_KEY") {
            self.email.api_key = v;
        }
        if let Ok(v) = env::var("EMAIL_API_URL") {
            self.email.api_url = v;
        }
        if let Ok(v) = env::var("EMAIL_FROM") {
            self.email.from = v;
        }
        if let Ok(v) = env::var("EMAIL_ADMIN_RECIPIENT") {
            self.email.admin_recipient = Some(v);
        }
        if let Ok(v) = env::var("SITE_PUBLIC_URL") {
            self.site.public_url = v;
        }
        if let Ok(v) = env::var("TASKS_ENABLED")
            && let Ok(b) = v.parse()
        {
            self.tasks.enabled = b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8001
        cors_origins = "https://desideridipuglia.it, https://www.desideridipuglia.it"

        [database]
        url = "postgres://localhost/desideri"
        max_connections = 5

        [admin]
        username = "admin"
        password_hash = "$2b$12$abcdefghijklmnopqrstuv"

        [stripe]
        secret_key = "sk_test_123"
        webhook_secret = "whsec_123"

        [site]
        public_url = "https://desideridipuglia.it"
    "#;

    #[test]
    fn test_parse_toml_with_defaults() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.admin.session_ttl_hours, 24);
        assert_eq!(config.stripe.currency, "eur");
        assert!(config.email.api_key.is_empty());
        assert!(config.tasks.enabled);
        assert_eq!(config.site.name, "Desideri di Puglia");
    }

    #[test]
    fn test_allowed_origins() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let origins = config.server.allowed_origins().unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1], "https://www.desideridipuglia.it");

        let any = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8001,
            cors_origins: "*".to_string(),
        };
        assert!(any.allowed_origins().is_none());
    }
}
