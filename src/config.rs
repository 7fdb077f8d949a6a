use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiry_secs: i64,
    pub server_host: String,
    pub server_port: u16,
    pub cors_allowed_origins: String,
    /// Public storefront URL, used to build links in outgoing mail.
    pub hostname: String,
    pub auth_rate_limit_per_minute: u32,
    pub log_format: LogFormat,
    pub oauth2: OAuth2Config,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Userinfo endpoints queried with the bearer token a client obtained from
/// the identity provider.
#[derive(Clone, Debug)]
pub struct OAuth2Config {
    pub google_userinfo_url: String,
    pub facebook_userinfo_url: String,
    pub github_userinfo_url: String,
}

impl Default for OAuth2Config {
    fn default() -> Self {
        Self {
            google_userinfo_url: "https://www.googleapis.com/oauth2/v3/userinfo".to_string(),
            facebook_userinfo_url:
                "https://graph.facebook.com/me?fields=id,first_name,last_name,email".to_string(),
            github_userinfo_url: "https://api.github.com/user".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let oauth2_defaults = OAuth2Config::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 10),
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "perfume-store".to_string()),
            jwt_expiry_secs: parse_or("JWT_EXPIRY_SECS", 604_800),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_or("SERVER_PORT", 8080),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            hostname: env::var("HOSTNAME").unwrap_or_else(|_| "localhost:3000".to_string()),
            auth_rate_limit_per_minute: parse_or("AUTH_RATE_LIMIT_PER_MINUTE", 20),
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            oauth2: OAuth2Config {
                google_userinfo_url: env::var("OAUTH2_GOOGLE_USERINFO_URL")
                    .unwrap_or(oauth2_defaults.google_userinfo_url),
                facebook_userinfo_url: env::var("OAUTH2_FACEBOOK_USERINFO_URL")
                    .unwrap_or(oauth2_defaults.facebook_userinfo_url),
                github_userinfo_url: env::var("OAUTH2_GITHUB_USERINFO_URL")
                    .unwrap_or(oauth2_defaults.github_userinfo_url),
            },
        })
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
