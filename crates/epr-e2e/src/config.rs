//! Environment-profile configuration.
//!
//! A profile (`dev15`, `tst1`, …) selects `config/environments/.env.<profile>`
//! for portal settings and merges `config/secrets/.secrets` with an optional
//! `config/secrets/.secrets.<profile>` override for credentials. Every
//! required key is enumerated in a closed struct and checked at load time —
//! a missing key fails immediately, naming the key and the file it was
//! expected in. Nothing is written into the process environment; files are
//! parsed into plain maps.

use crate::result::{EprError, EprResult};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Default environment profile
pub const DEFAULT_PROFILE: &str = "dev15";

/// Portal settings for one environment
#[derive(Debug, Clone)]
pub struct Environment {
    /// Producer portal entry URL
    pub producer_base_url: String,
    /// Regulator portal entry URL
    pub regulator_base_url: String,
    /// Regulator account email
    pub regulator_email: String,
    /// Regulator account password
    pub regulator_password: String,
    /// Run the browser headless
    pub headless: bool,
}

/// Credentials for the external endpoints
#[derive(Debug, Clone)]
pub struct Secrets {
    /// Notification-service token issuer
    pub notify_issuer: String,
    /// Notification-service signing secret
    pub notify_secret: String,
    /// Company-registry API token
    pub companies_house_token: String,
}

/// Fully resolved configuration for one profile
#[derive(Debug, Clone)]
pub struct Config {
    /// The resolved profile name
    pub profile: String,
    /// Portal settings
    pub environment: Environment,
    /// Endpoint credentials
    pub secrets: Secrets,
}

fn parse_env_file(path: &Path) -> EprResult<HashMap<String, String>> {
    let iter = dotenvy::from_filename_iter(path)
        .map_err(|e| EprError::config(format!("cannot read {}: {e}", path.display())))?;

    let mut values = HashMap::new();
    for entry in iter {
        let (key, value) =
            entry.map_err(|e| EprError::config(format!("cannot parse {}: {e}", path.display())))?;
        let _ = values.insert(key, value);
    }
    Ok(values)
}

fn require(values: &HashMap<String, String>, key: &str, source: &Path) -> EprResult<String> {
    values.get(key).cloned().ok_or_else(|| {
        EprError::config(format!("missing key {key} in {}", source.display()))
    })
}

fn parse_bool(raw: Option<&String>, default: bool) -> bool {
    raw.map_or(default, |value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Load the configuration for a profile from `config_dir`.
///
/// Expects `<config_dir>/environments/.env.<profile>` and
/// `<config_dir>/secrets/.secrets` (with an optional
/// `<config_dir>/secrets/.secrets.<profile>` override).
///
/// # Errors
///
/// Returns [`EprError::Config`] when a file is missing or a required key is
/// absent.
pub fn load_config(config_dir: &Path, profile: &str) -> EprResult<Config> {
    let env_file = config_dir
        .join("environments")
        .join(format!(".env.{profile}"));
    if !env_file.exists() {
        return Err(EprError::config(format!(
            "environment file not found: {} (expected files like .env.dev15, .env.tst1)",
            env_file.display()
        )));
    }
    let env_values = parse_env_file(&env_file)?;

    let secrets_dir = config_dir.join("secrets");
    let common_secrets = secrets_dir.join(".secrets");
    let profile_secrets = secrets_dir.join(format!(".secrets.{profile}"));

    let mut secret_values = HashMap::new();
    if common_secrets.exists() {
        secret_values.extend(parse_env_file(&common_secrets)?);
    }
    if profile_secrets.exists() {
        // Profile-specific secrets override common ones
        secret_values.extend(parse_env_file(&profile_secrets)?);
    }
    if secret_values.is_empty() {
        return Err(EprError::config(format!(
            "no secrets found under {}",
            secrets_dir.display()
        )));
    }

    let environment = Environment {
        producer_base_url: require(&env_values, "PRODUCER_BASE_URL", &env_file)?,
        regulator_base_url: require(&env_values, "REGULATOR_BASE_URL", &env_file)?,
        regulator_email: require(&env_values, "REGULATOR_EMAIL", &env_file)?,
        regulator_password: require(&env_values, "REGULATOR_PASSWORD", &env_file)?,
        headless: parse_bool(env_values.get("HEADLESS"), false),
    };

    let secrets = Secrets {
        notify_issuer: require(&secret_values, "ISSUER", &common_secrets)?,
        notify_secret: require(&secret_values, "SECRET", &common_secrets)?,
        companies_house_token: require(&secret_values, "COMPANY_HOUSE_TOKEN", &common_secrets)?,
    };

    debug!(profile, env_file = %env_file.display(), "configuration loaded");
    Ok(Config {
        profile: profile.to_string(),
        environment,
        secrets,
    })
}
