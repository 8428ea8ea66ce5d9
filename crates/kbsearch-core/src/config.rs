//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_SEARCH__DEFAULT_TOP_K=3`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::chunker::ChunkingConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub chunking: ChunkingConfig,
    pub search: SearchSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_top_k: usize,
    /// Characters of retrieved context quoted in a query answer.
    pub answer_preview_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_top_k: 5, answer_preview_chars: 800 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model_dir: Option<String>,
    pub max_len: usize,
    pub batch_size: usize,
    pub use_fake: bool,
    pub fake_dim: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model_dir: None, max_len: 256, batch_size: 32, use_fake: false, fake_dim: 1024 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// Accelerated index when it can be built, linear scan otherwise.
    #[default]
    Auto,
    Accelerated,
    Linear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub backend: IndexBackend,
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    /// Wrap an already assembled figment, e.g. built in a test.
    pub fn from_figment(figment: Figment) -> Self {
        Self { figment: Figment::new().merge(Serialized::defaults(AppConfig::default())).merge(figment) }
    }

    pub fn settings(&self) -> anyhow::Result<AppConfig> {
        let settings: AppConfig = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        if settings.chunking.size == 0 {
            anyhow::bail!("chunking.size must be greater than zero");
        }
        if settings.search.default_top_k == 0 {
            anyhow::bail!("search.default_top_k must be greater than zero");
        }
        if settings.embedding.max_len == 0 || settings.embedding.batch_size == 0 {
            anyhow::bail!("embedding.max_len and embedding.batch_size must be greater than zero");
        }
        Ok(settings)
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        match env {
            "prod" | "production" => {
                if settings.embedding.use_fake {
                    anyhow::bail!("embedding.use_fake is not allowed in production");
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_files() {
        Jail::expect_with(|jail| {
            jail.set_env("RUST_ENV", "dev");
            let settings = Config::load().expect("load").settings().expect("settings");
            assert_eq!(settings, AppConfig::default());
            assert_eq!(settings.chunking.size, 800);
            assert_eq!(settings.chunking.overlap, 100);
            assert_eq!(settings.index.backend, IndexBackend::Auto);
            Ok(())
        });
    }

    #[test]
    fn env_file_and_vars_layer_over_base() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [chunking]
                size = 400

                [index]
                backend = "linear"
                "#,
            )?;
            jail.create_file("config.test.toml", "[search]\ndefault_top_k = 7\n")?;
            jail.set_env("RUST_ENV", "test");
            jail.set_env("APP_CHUNKING__OVERLAP", "40");

            let settings = Config::load().expect("load").settings().expect("settings");
            assert_eq!(settings.chunking.size, 400);
            assert_eq!(settings.chunking.overlap, 40);
            assert_eq!(settings.search.default_top_k, 7);
            assert_eq!(settings.index.backend, IndexBackend::Linear);
            Ok(())
        });
    }

    #[test]
    fn prod_rejects_fake_embeddings() {
        Jail::expect_with(|jail| {
            jail.set_env("RUST_ENV", "prod");
            jail.set_env("APP_EMBEDDING__USE_FAKE", "true");
            assert!(Config::load().is_err());
            Ok(())
        });
    }

    #[test]
    fn zero_chunk_size_is_invalid() {
        let config = Config::from_figment(Figment::new().merge(Toml::string("[chunking]\nsize = 0\n")));
        assert!(config.settings().is_err());
    }

    #[test]
    fn zero_embedding_lengths_are_invalid() {
        Jail::expect_with(|jail| {
            jail.set_env("RUST_ENV", "dev");
            jail.set_env("APP_EMBEDDING__MAX_LEN", "0");
            assert!(Config::load().is_err());
            Ok(())
        });
        let config = Config::from_figment(Figment::new().merge(Toml::string("[embedding]\nbatch_size = 0\n")));
        assert!(config.settings().is_err());
    }

    #[test]
    fn expand_path_substitutes_env_vars() {
        Jail::expect_with(|jail| {
            jail.set_env("KB_DOCS_ROOT", "/srv/kb");
            assert_eq!(expand_path("$KB_DOCS_ROOT/docs/a.txt"), PathBuf::from("/srv/kb/docs/a.txt"));
            assert_eq!(expand_path("/data/a.txt"), PathBuf::from("/data/a.txt"));
            Ok(())
        });
    }
}
