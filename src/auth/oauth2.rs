use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::OAuth2Config;
use crate::error::AppError;

/// Where a user account came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    Local,
    Google,
    Facebook,
    Github,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "LOCAL",
            AuthProvider::Google => "GOOGLE",
            AuthProvider::Facebook => "FACEBOOK",
            AuthProvider::Github => "GITHUB",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOCAL" => Ok(AuthProvider::Local),
            "GOOGLE" => Ok(AuthProvider::Google),
            "FACEBOOK" => Ok(AuthProvider::Facebook),
            "GITHUB" => Ok(AuthProvider::Github),
            _ => Err(AppError::ProviderNotSupported(s.to_string())),
        }
    }
}

/// Profile data taken from a third-party identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2UserInfo {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl OAuth2UserInfo {
    /// Normalizes a provider's userinfo payload. Each provider names the
    /// same fields differently.
    pub fn from_attributes(provider: AuthProvider, attrs: &Value) -> Result<Self, AppError> {
        let text = |key: &str| attrs.get(key).and_then(Value::as_str).map(str::to_string);
        let id = match attrs.get("id").or_else(|| attrs.get("sub")) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let (first_name, last_name) = match provider {
            AuthProvider::Google => (text("given_name"), text("family_name")),
            AuthProvider::Facebook => (text("first_name"), text("last_name")),
            AuthProvider::Github => match text("name") {
                Some(name) => {
                    let mut parts = name.splitn(2, ' ');
                    (
                        parts.next().map(str::to_string),
                        parts.next().map(str::to_string),
                    )
                }
                None => (text("login"), None),
            },
            AuthProvider::Local => {
                return Err(AppError::ProviderNotSupported(provider.to_string()));
            }
        };

        let email = text("email").filter(|e| !e.is_empty()).ok_or_else(|| {
            AppError::BadRequest(format!("Email not found from {provider} provider"))
        })?;

        Ok(Self {
            id,
            email,
            first_name,
            last_name,
        })
    }
}

/// Fetches user profiles from provider userinfo endpoints.
#[derive(Clone)]
pub struct OAuth2Client {
    http_client: reqwest::Client,
    config: OAuth2Config,
}

impl OAuth2Client {
    pub fn new(config: OAuth2Config) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    fn userinfo_url(&self, provider: AuthProvider) -> Result<&str, AppError> {
        match provider {
            AuthProvider::Google => Ok(&self.config.google_userinfo_url),
            AuthProvider::Facebook => Ok(&self.config.facebook_userinfo_url),
            AuthProvider::Github => Ok(&self.config.github_userinfo_url),
            AuthProvider::Local => Err(AppError::ProviderNotSupported(provider.to_string())),
        }
    }

    pub async fn fetch_user_info(
        &self,
        provider: AuthProvider,
        access_token: &str,
    ) -> Result<OAuth2UserInfo, AppError> {
        let url = self.userinfo_url(provider)?;

        let resp = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::USER_AGENT, "perfume-store")
            .send()
            .await?;

        if !resp.status().is_success() {
            tracing::warn!(%provider, status = %resp.status(), "userinfo request rejected");
            return Err(AppError::BadCredentials);
        }

        let attrs: Value = resp.json().await?;
        OAuth2UserInfo::from_attributes(provider, &attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn provider_parse_ignores_case() {
        assert_eq!("google".parse::<AuthProvider>().unwrap(), AuthProvider::Google);
        assert_eq!("GitHub".parse::<AuthProvider>().unwrap(), AuthProvider::Github);
        assert!(matches!(
            "myspace".parse::<AuthProvider>(),
            Err(AppError::ProviderNotSupported(_))
        ));
    }

    #[test]
    fn google_attributes() {
        let info = OAuth2UserInfo::from_attributes(
            AuthProvider::Google,
            &json!({"sub": "123", "email": "g@test.com", "given_name": "Ann", "family_name": "Lee"}),
        )
        .unwrap();
        assert_eq!(info.id, "123");
        assert_eq!(info.first_name.as_deref(), Some("Ann"));
        assert_eq!(info.last_name.as_deref(), Some("Lee"));
    }

    #[test]
    fn github_splits_display_name() {
        let info = OAuth2UserInfo::from_attributes(
            AuthProvider::Github,
            &json!({"id": 42, "email": "gh@test.com", "name": "Linus B Torvalds"}),
        )
        .unwrap();
        assert_eq!(info.id, "42");
        assert_eq!(info.first_name.as_deref(), Some("Linus"));
        assert_eq!(info.last_name.as_deref(), Some("B Torvalds"));
    }

    #[test]
    fn missing_email_is_rejected() {
        let result = OAuth2UserInfo::from_attributes(
            AuthProvider::Facebook,
            &json!({"id": "7", "first_name": "No", "last_name": "Mail"}),
        );
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
