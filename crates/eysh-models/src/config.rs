//! eysh configuration and artifact-store factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use eysh_core::model::{Locale, DEFAULT_TARGET_SCORE};
use eysh_core::roadmap::DEFAULT_WEEKS_AVAILABLE;

use crate::store::{ArtifactStore, HttpStore, LocalStore};

/// Where pretrained model artifacts come from.
///
/// Note: Custom Debug impl masks the API token to prevent accidental exposure in logs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    Local {
        #[serde(default = "default_models_dir")]
        dir: PathBuf,
    },
    Http {
        base_url: String,
        #[serde(default)]
        api_token: Option<String>,
    },
}

impl std::fmt::Debug for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::Local { dir } => f.debug_struct("Local").field("dir", dir).finish(),
            ModelSource::Http {
                base_url,
                api_token,
            } => f
                .debug_struct("Http")
                .field("base_url", base_url)
                .field("api_token", &api_token.as_ref().map(|_| "***"))
                .finish(),
        }
    }
}

impl Default for ModelSource {
    fn default() -> Self {
        ModelSource::Local {
            dir: default_models_dir(),
        }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::Local { dir } => write!(f, "local directory {}", dir.display()),
            ModelSource::Http { base_url, .. } => write!(f, "HTTP {base_url}"),
        }
    }
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("./models")
}

/// Top-level eysh configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyshConfig {
    /// Pretrained model source.
    #[serde(default)]
    pub models: ModelSource,
    /// Language for generated roadmaps.
    #[serde(default)]
    pub locale: Locale,
    /// Study horizon when none is given.
    #[serde(default = "default_weeks_available")]
    pub default_weeks_available: u32,
    /// Exam target when the student hasn't set one.
    #[serde(default = "default_target_score")]
    pub default_target_score: u32,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_weeks_available() -> u32 {
    DEFAULT_WEEKS_AVAILABLE
}
fn default_target_score() -> u32 {
    DEFAULT_TARGET_SCORE
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./eysh-reports")
}

impl Default for EyshConfig {
    fn default() -> Self {
        Self {
            models: ModelSource::default(),
            locale: Locale::default(),
            default_weeks_available: default_weeks_available(),
            default_target_score: default_target_score(),
            output_dir: default_output_dir(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&lookup(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_model_source(
    source: &ModelSource,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> ModelSource {
    match source {
        ModelSource::Local { dir } => ModelSource::Local {
            dir: PathBuf::from(resolve_env_vars(&dir.to_string_lossy(), lookup)),
        },
        ModelSource::Http {
            base_url,
            api_token,
        } => ModelSource::Http {
            base_url: resolve_env_vars(base_url, lookup),
            api_token: api_token.as_ref().map(|t| resolve_env_vars(t, lookup)),
        },
    }
}

/// Apply `EYSH_MODELS_DIR` / `EYSH_MODELS_URL` overrides and resolve
/// `${VAR}` references. The URL wins when both are set.
fn apply_env(mut config: EyshConfig, lookup: &dyn Fn(&str) -> Option<String>) -> EyshConfig {
    if let Some(dir) = lookup("EYSH_MODELS_DIR") {
        config.models = ModelSource::Local {
            dir: PathBuf::from(dir),
        };
    }
    if let Some(base_url) = lookup("EYSH_MODELS_URL") {
        let api_token = match &config.models {
            ModelSource::Http { api_token, .. } => api_token.clone(),
            ModelSource::Local { .. } => None,
        };
        config.models = ModelSource::Http {
            base_url,
            api_token,
        };
    }

    config.models = resolve_model_source(&config.models, lookup);
    config
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `eysh.toml` in the current directory
/// 2. `~/.config/eysh/config.toml`
///
/// Environment variable overrides: `EYSH_MODELS_DIR`, `EYSH_MODELS_URL`.
pub fn load_config_from(path: Option<&Path>) -> Result<EyshConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("eysh.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<EyshConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => EyshConfig::default(),
    };

    Ok(apply_env(config, &|name| std::env::var(name).ok()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("eysh"))
}

/// Create an artifact store from its configuration.
pub fn create_store(source: &ModelSource) -> Result<Box<dyn ArtifactStore>> {
    match source {
        ModelSource::Local { dir } => Ok(Box::new(LocalStore::new(dir.clone()))),
        ModelSource::Http {
            base_url,
            api_token,
        } => {
            if base_url.is_empty() {
                anyhow::bail!("HTTP model source needs a base_url");
            }
            Ok(Box::new(HttpStore::new(base_url, api_token.clone())?))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn resolve_env_vars_basic() {
        let lookup = env(&[("EYSH_TEST_VAR", "hello")]);
        assert_eq!(resolve_env_vars("${EYSH_TEST_VAR}", &lookup), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${EYSH_TEST_VAR}_suffix", &lookup),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${MISSING}", &lookup), "");
        assert_eq!(resolve_env_vars("${unterminated", &lookup), "${unterminated");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        let lookup = env(&[("EYSH_TOKEN", "${EYSH_TOKEN}"), ("A", "${B}"), ("B", "b")]);
        assert_eq!(resolve_env_vars("${EYSH_TOKEN}", &lookup), "${EYSH_TOKEN}");
        assert_eq!(resolve_env_vars("${A}-${B}", &lookup), "${B}-b");
    }

    #[test]
    fn default_config() {
        let config = EyshConfig::default();
        assert_eq!(config.locale, Locale::Mongolian);
        assert_eq!(config.default_weeks_available, 12);
        assert_eq!(config.default_target_score, 700);
        assert_eq!(
            config.models,
            ModelSource::Local {
                dir: "./models".into()
            }
        );
    }

    #[test]
    fn parse_http_source() {
        let toml_str = r#"
locale = "en"
default_weeks_available = 8

[models]
type = "http"
base_url = "https://models.example.com"
api_token = "${EYSH_TOKEN}"
"#;
        let config: EyshConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.locale, Locale::English);
        assert_eq!(config.default_weeks_available, 8);

        let config = apply_env(config, &env(&[("EYSH_TOKEN", "secret")]));
        assert_eq!(
            config.models,
            ModelSource::Http {
                base_url: "https://models.example.com".into(),
                api_token: Some("secret".into()),
            }
        );
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn env_overrides_source() {
        let lookup = env(&[("EYSH_MODELS_DIR", "/srv/models")]);
        let config = apply_env(EyshConfig::default(), &lookup);
        assert_eq!(
            config.models,
            ModelSource::Local {
                dir: "/srv/models".into()
            }
        );

        let config = apply_env(
            EyshConfig::default(),
            &env(&[
                ("EYSH_MODELS_DIR", "/srv/models"),
                ("EYSH_MODELS_URL", "http://models.local"),
            ]),
        );
        assert!(matches!(config.models, ModelSource::Http { .. }));
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eysh.toml");
        std::fs::write(&path, "default_target_score = 650\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_target_score, 650);
    }

    #[test]
    fn http_store_requires_url() {
        let source = ModelSource::Http {
            base_url: String::new(),
            api_token: None,
        };
        assert!(create_store(&source).is_err());
        assert!(create_store(&ModelSource::default()).is_ok());
    }
}
