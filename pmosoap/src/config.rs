//! Configuration du client SOAP
//!
//! La configuration est construite en trois couches, comme celle de
//! PMOMusic :
//! 1. la configuration par défaut intégrée (`pmosoap.yaml`)
//! 2. un fichier YAML optionnel, fusionné par-dessus
//! 3. les variables d'environnement `PMOSOAP_CONFIG__<CLE>`
//!
//! ```no_run
//! use pmosoap::SoapConfig;
//! use std::path::Path;
//!
//! let config = SoapConfig::load(Some(Path::new("soap.yaml")))?;
//! println!("timeout: {}s", config.timeout_secs);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::auth::Credentials;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::{env, fs, path::Path, time::Duration};
use tracing::{info, warn};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("pmosoap.yaml");

const ENV_PREFIX: &str = "PMOSOAP_CONFIG__";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "pmosoap/0.1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoapConfig {
    /// Identifiant HTTP Basic, envoyé avec `password`
    pub username: Option<String>,
    pub password: Option<String>,
    /// Délai maximal d'une requête HTTP
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SoapConfig {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SoapConfig {
    /// Charge la configuration (défaut intégré, fichier, environnement)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        if let Some(path) = path {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Cannot read config file {}", path.display()))?;
            info!(config_file=%path.display(), "Loaded SOAP config file");
            let external: Value = serde_yaml::from_str(&data)?;
            merge_yaml(&mut value, &external);
        }

        let mut config: SoapConfig = serde_yaml::from_value(value)?;
        config.apply_env();
        Ok(config)
    }

    /// Parse une configuration YAML fusionnée avec les valeurs par défaut
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        let external: Value = serde_yaml::from_str(yaml)?;
        merge_yaml(&mut value, &external);
        Ok(serde_yaml::from_value(value)?)
    }

    /// Applique les variables d'environnement `PMOSOAP_CONFIG__*`
    pub fn apply_env(&mut self) {
        self.apply_overrides(env::vars());
    }

    /// Applique des surcharges `(PMOSOAP_CONFIG__CLE, valeur)`
    ///
    /// Les clés sans le préfixe ou inconnues sont ignorées.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let Some(key) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.into();
            match key.to_lowercase().as_str() {
                "username" => self.username = Some(value),
                "password" => self.password = Some(value),
                "user_agent" => self.user_agent = value,
                "timeout_secs" => match value.parse() {
                    Ok(secs) => self.timeout_secs = secs,
                    Err(_) => warn!(value=%value, "Invalid {}TIMEOUT_SECS, ignored", ENV_PREFIX),
                },
                other => warn!(key=%other, "Unknown SOAP config override"),
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Identifiants, si nom d'utilisateur et mot de passe sont renseignés
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Credentials::new(username.clone(), password.clone()))
            }
            _ => None,
        }
    }
}

fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
