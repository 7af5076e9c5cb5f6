use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_with::serde_as;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use strum::{Display, EnumString};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("database_name", &self.database_name)
            .field("require_ssl", &self.require_ssl)
            .finish()
    }
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db().database(&self.database_name)
    }
}

/// Object storage settings, handed to the storage adapter at construction.
///
/// Any of bucket or credentials may be absent; uploads are then refused
/// with a storage-unavailable error instead of failing at startup.
#[derive(Deserialize, Clone)]
pub struct StorageSettings {
    pub bucket: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    /// Public host serving the bucket, e.g. a CDN domain.
    pub custom_domain: Option<String>,
    /// S3-compatible endpoint override (MinIO, LocalStack).
    pub endpoint_url: Option<String>,
    /// Upload objects with the `public-read` canned ACL. Disable for buckets
    /// with ACLs turned off that are made public by bucket policy instead.
    #[serde(default = "default_public_read")]
    pub public_read: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            bucket: None,
            access_key_id: None,
            secret_access_key: None,
            region: default_region(),
            custom_domain: None,
            endpoint_url: None,
            public_read: default_public_read(),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn default_public_read() -> bool {
    true
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("bucket", &self.bucket)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .field("custom_domain", &self.custom_domain)
            .field("endpoint_url", &self.endpoint_url)
            .field("public_read", &self.public_read)
            .finish()
    }
}

/// Bucket and credentials of a fully configured [`StorageSettings`].
pub struct StorageCredentials<'a> {
    pub bucket: &'a str,
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
}

impl StorageSettings {
    pub fn credentials(&self) -> Option<StorageCredentials<'_>> {
        Some(StorageCredentials {
            bucket: present(&self.bucket)?,
            access_key_id: present(&self.access_key_id)?,
            secret_access_key: present(&self.secret_access_key)?,
        })
    }

    /// Base URL under which objects are publicly served. Always ends in `/`.
    pub fn public_base_url(&self) -> Option<String> {
        let bucket = self.credentials()?.bucket;

        let base = if let Some(domain) = self.custom_domain.as_deref() {
            format!("https://{}", domain.trim_end_matches('/'))
        } else if let Some(endpoint) = self.endpoint_url.as_deref() {
            format!("{}/{bucket}", endpoint.trim_end_matches('/'))
        } else {
            format!("https://{bucket}.s3.{}.amazonaws.com", self.region)
        };

        Some(format!("{base}/"))
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|err| {
        config::ConfigError::Message(format!("failed to determine the current directory: {err}"))
    })?;
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|err| config::ConfigError::Message(format!("failed to parse APP_ENVIRONMENT: {err}")))?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("WARDROBE")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> StorageSettings {
        StorageSettings {
            bucket: Some("wardrobe-media".into()),
            access_key_id: Some("AKIA".into()),
            secret_access_key: Some("secret".into()),
            region: "eu-north-1".into(),
            ..StorageSettings::default()
        }
    }

    #[test]
    fn storage_requires_bucket_and_both_credentials() {
        assert!(configured().credentials().is_some());

        let mut settings = configured();
        settings.bucket = None;
        assert!(settings.credentials().is_none());

        let mut settings = configured();
        settings.secret_access_key = Some("  ".into());
        assert!(settings.credentials().is_none());

        assert!(StorageSettings::default().credentials().is_none());
    }

    #[test]
    fn public_url_defaults_to_virtual_hosted_bucket() {
        assert_eq!(
            configured().public_base_url().as_deref(),
            Some("https://wardrobe-media.s3.eu-north-1.amazonaws.com/")
        );
    }

    #[test]
    fn public_url_prefers_custom_domain() {
        let settings = StorageSettings {
            custom_domain: Some("cdn.example.com/".into()),
            endpoint_url: Some("http://localhost:9000".into()),
            ..configured()
        };

        assert_eq!(
            settings.public_base_url().as_deref(),
            Some("https://cdn.example.com/")
        );
    }

    #[test]
    fn public_url_uses_path_style_for_custom_endpoints() {
        let settings = StorageSettings {
            endpoint_url: Some("http://localhost:9000/".into()),
            ..configured()
        };

        assert_eq!(
            settings.public_base_url().as_deref(),
            Some("http://localhost:9000/wardrobe-media/")
        );
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let rendered = format!("{:?}", configured());

        assert!(!rendered.contains("secret\""));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert!(matches!(
            Environment::from_str("Production"),
            Ok(Environment::Production)
        ));
        assert!(Environment::from_str("staging").is_err());
    }
}
