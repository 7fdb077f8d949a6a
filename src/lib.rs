pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod seed;
pub mod services;

use sea_orm::DatabaseConnection;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: auth::jwt::JwtManager,
    pub oauth2: auth::oauth2::OAuth2Client,
    pub config: Config,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let jwt = auth::jwt::JwtManager::new(&config);
        let oauth2 = auth::oauth2::OAuth2Client::new(config.oauth2.clone());
        Self {
            db,
            jwt,
            oauth2,
            config,
        }
    }
}

impl AsRef<AppState> for AppState {
    fn as_ref(&self) -> &AppState {
        self
    }
}
