//! Provider connection settings
//!
//! Resolution order per key: explicit value, then `LDAP_*` environment
//! variable, then default (`tls` and `tls_insecure` only). `host`, `port`,
//! `bind_user` and `bind_password` are required.

use config::{Config, Environment};
use ldapsync_core::errors::{ExError, LdapSyncError};
use ldapsync_core::{log_op_end, log_op_error, log_op_start};
use ldapsync_core_types::Sensitive;
use serde::Deserialize;

/// Prefix of the environment variables consulted for missing keys
pub const ENV_PREFIX: &str = "LDAP";

/// Explicitly configured values; `None` falls back to the environment
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub bind_user: Option<String>,
    pub bind_password: Option<Sensitive<String>>,
    pub tls: Option<bool>,
    pub tls_insecure: Option<bool>,
}

/// Fully resolved connection settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderConfig {
    pub host: String,
    pub port: u16,
    pub bind_user: String,
    pub bind_password: Sensitive<String>,
    pub tls: bool,
    /// Skip server certificate verification
    pub tls_insecure: bool,
}

impl ProviderConfig {
    /// Resolve settings against the process environment
    ///
    /// # Errors
    ///
    /// Returns `ERR_INVALID_CONFIG` when a required key is missing everywhere
    /// or a value has the wrong type.
    pub fn load(settings: &ProviderSettings) -> Result<Self, ExError> {
        Self::load_from(settings, Environment::with_prefix(ENV_PREFIX))
    }

    /// Resolve settings against the given environment source
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_from(settings: &ProviderSettings, environment: Environment) -> Result<Self, ExError> {
        log_op_start!("provider_configure");
        let start = std::time::Instant::now();

        let config = resolve(settings, environment).map_err(|e| {
            log_op_error!(
                "provider_configure",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            ExError::from(e).with_op("provider_configure")
        })?;

        log_op_end!(
            "provider_configure",
            duration_ms = start.elapsed().as_millis() as u64,
            host = config.host.as_str(),
            port = config.port,
            tls = config.tls
        );

        Ok(config)
    }

    /// Server URL, `ldaps://` when TLS is enabled
    pub fn url(&self) -> String {
        let scheme = if self.tls { "ldaps" } else { "ldap" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

fn resolve(
    settings: &ProviderSettings,
    environment: Environment,
) -> Result<ProviderConfig, LdapSyncError> {
    let invalid = |e: config::ConfigError| LdapSyncError::InvalidConfig {
        reason: e.to_string(),
    };

    let config: ProviderConfig = Config::builder()
        .set_default("tls", false)
        .map_err(invalid)?
        .set_default("tls_insecure", false)
        .map_err(invalid)?
        .add_source(environment)
        .set_override_option("host", settings.host.clone())
        .map_err(invalid)?
        .set_override_option("port", settings.port.map(i64::from))
        .map_err(invalid)?
        .set_override_option("bind_user", settings.bind_user.clone())
        .map_err(invalid)?
        .set_override_option(
            "bind_password",
            settings
                .bind_password
                .as_ref()
                .map(|password| password.expose().clone()),
        )
        .map_err(invalid)?
        .set_override_option("tls", settings.tls)
        .map_err(invalid)?
        .set_override_option("tls_insecure", settings.tls_insecure)
        .map_err(invalid)?
        .build()
        .map_err(invalid)?
        .try_deserialize()
        .map_err(invalid)?;

    if config.host.trim().is_empty() {
        return Err(LdapSyncError::InvalidConfig {
            reason: "host must not be empty".to_string(),
        });
    }

    Ok(config)
}
