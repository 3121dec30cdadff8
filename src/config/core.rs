use super::GateConfig;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
};
use std::path::Path;

/// Prefix of environment overrides, e.g. `COMMITGATE_SHELL__LINTER`
pub const ENV_PREFIX: &str = "COMMITGATE_";

/// Repository config files, lowest priority first
const REPO_CONFIG_FILES: &[&str] = &["commitgate.toml", "commitgate.yaml", "commitgate.yml"];

impl GateConfig {
    /// Load configuration for the repository rooted at `repo_root`
    ///
    /// Priority, lowest first: built-in defaults, repository config files,
    /// the explicit `custom_config`, `COMMITGATE_*` variables.
    pub fn load(repo_root: &Path, custom_config: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(GateConfig::default()));

        for name in REPO_CONFIG_FILES {
            figment = merge_file(figment, &repo_root.join(name));
        }

        if let Some(custom_path) = custom_config {
            if !custom_path.is_file() {
                anyhow::bail!("Config file not found: {}", custom_path.display());
            }
            figment = merge_file(figment, custom_path);
        }

        // Environment variables always have highest priority; SKIP and ARGS
        // are run controls, not settings
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["skip", "args"])
                .split("__"),
        );

        let config: GateConfig = figment
            .extract()
            .context("Failed to parse commitgate configuration")?;
        config.validate()?;

        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        figment.merge(Yaml::file(path))
    } else {
        figment.merge(Toml::file(path))
    }
}
