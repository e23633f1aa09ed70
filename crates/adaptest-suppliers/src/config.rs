//! Supplier configuration and factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use adaptest_core::traits::QuestionSupplier;

use crate::openrouter::OpenRouterSupplier;

/// Top-level adaptest configuration (`adaptest.toml`).
///
/// Note: Custom Debug impl masks the API key to prevent accidental
/// exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct SupplierSettings {
    /// OpenRouter API key. Supports `${VAR}` environment references.
    #[serde(default)]
    pub api_key: String,
    /// Override for the API base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Generation model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Questions to generate for the main subset.
    #[serde(default = "default_main_count")]
    pub main_count: usize,
    /// Questions to generate for the buffer subset.
    #[serde(default = "default_buffer_count")]
    pub buffer_count: usize,
}

impl std::fmt::Debug for SupplierSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupplierSettings")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("main_count", &self.main_count)
            .field("buffer_count", &self.buffer_count)
            .finish()
    }
}

fn default_model() -> String {
    "openai/gpt-4.1-mini".to_string()
}

fn default_main_count() -> usize {
    10
}

fn default_buffer_count() -> usize {
    10
}

impl Default for SupplierSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            model: default_model(),
            main_count: default_main_count(),
            buffer_count: default_buffer_count(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load settings from well-known paths.
///
/// Search order:
/// 1. `adaptest.toml` in the current directory
/// 2. `~/.config/adaptest/config.toml`
///
/// Environment variable override: `ADAPTEST_OPENROUTER_KEY`.
pub fn load_settings() -> Result<SupplierSettings> {
    load_settings_from(None)
}

/// Load settings from an explicit path, or search the default locations.
pub fn load_settings_from(path: Option<&Path>) -> Result<SupplierSettings> {
    let settings_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("adaptest.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut settings = match settings_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SupplierSettings>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SupplierSettings::default(),
    };

    // Apply env var override, then resolve ${VAR} references
    if let Ok(key) = std::env::var("ADAPTEST_OPENROUTER_KEY") {
        settings.api_key = key;
    }
    settings.api_key = resolve_env_vars(&settings.api_key);
    settings.base_url = settings.base_url.as_ref().map(|u| resolve_env_vars(u));

    Ok(settings)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptest"))
}

/// Create a supplier instance from the settings.
pub fn create_supplier(settings: &SupplierSettings) -> Result<Box<dyn QuestionSupplier>> {
    anyhow::ensure!(
        !settings.api_key.is_empty(),
        "no API key configured; set api_key in adaptest.toml or ADAPTEST_OPENROUTER_KEY"
    );
    Ok(Box::new(OpenRouterSupplier::new(
        &settings.api_key,
        settings.base_url.clone(),
        &settings.model,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_ADAPTEST_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_ADAPTEST_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_ADAPTEST_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_ADAPTEST_TEST_VAR");
    }

    #[test]
    fn default_settings() {
        let settings = SupplierSettings::default();
        assert_eq!(settings.model, "openai/gpt-4.1-mini");
        assert_eq!(settings.main_count, 10);
        assert_eq!(settings.buffer_count, 10);
    }

    #[test]
    fn parse_settings_toml() {
        let toml_str = r#"
api_key = "sk-test"
model = "openai/gpt-4.1"
main_count = 12
"#;
        let settings: SupplierSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.model, "openai/gpt-4.1");
        assert_eq!(settings.main_count, 12);
        assert_eq!(settings.buffer_count, 10);
    }

    #[test]
    fn debug_masks_api_key() {
        let settings = SupplierSettings {
            api_key: "sk-secret".to_string(),
            ..SupplierSettings::default()
        };
        let debug = format!("{settings:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn create_supplier_requires_api_key() {
        let settings = SupplierSettings::default();
        assert!(create_supplier(&settings).is_err());

        let settings = SupplierSettings {
            api_key: "sk-test".to_string(),
            ..SupplierSettings::default()
        };
        let supplier = create_supplier(&settings).unwrap();
        assert_eq!(supplier.name(), "openrouter");
    }
}
