use std::time::Duration;

use secrecy::Secret;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::EmailAddress;

/// Environment variable the provider API key has historically been read from.
/// It takes precedence over anything found in the configuration files.
const API_KEY_ENV_VAR: &str = "RESEND_API_KEY";

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    // Environment variables are always strings, `serde-aux` lets us accept both
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    /// Largest spreadsheet accepted by `/upload-excel`
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_upload_bytes: usize,
}

/// Settings of the transactional email provider.
///
/// The API key is optional on purpose: the service must still boot without
/// it, only `/send-emails` refuses to work until it is configured.
/// Access to the key goes through [`secrecy::ExposeSecret`] so it does not
/// end up in logs by accident.
#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub sender_name: String,
    pub authorization_token: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub send_interval_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<EmailAddress, String> {
        EmailAddress::parse(self.sender_email.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }

    /// Gap enforced between two consecutive calls to the provider
    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_milliseconds)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let mut settings = config::Config::default();

    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");

    // Shared defaults first
    settings.merge(config::File::from(configuration_directory.join("base")).required(true))?;

    // Then the environment specific values, `local` unless told otherwise
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    settings.merge(
        config::File::from(configuration_directory.join(environment.as_str())).required(true),
    )?;

    // e.g. `APP_EMAIL_CLIENT__TIMEOUT_MILLISECONDS=5000` sets `email_client.timeout_milliseconds`
    settings.merge(config::Environment::with_prefix("app").separator("__"))?;

    if let Ok(api_key) = std::env::var(API_KEY_ENV_VAR) {
        settings.set("email_client.authorization_token", api_key)?;
    }

    settings.try_into()
}

/// The possible runtime environments of the application
#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
