//! Feed config discovery and parsing.

use anyhow::{Context, anyhow};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::models::FeedConfig;

/// Environment variable pointing at a TOML or JSON config file.
pub const CONFIG_PATH_VAR: &str = "VITRINE_FEED_CONFIG_PATH";
/// Environment variable carrying an inline JSON config.
pub const CONFIG_JSON_VAR: &str = "VITRINE_FEED_CONFIG_JSON";
/// File names looked up in the working directory, then under `config/`.
pub const DEFAULT_FILE_NAMES: [&str; 2] =
    ["vitrine-feed.toml", "vitrine-feed.json"];

/// Source that produced the feed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl FeedConfig {
    /// Load feed configuration overrides using environment variables.
    /// A `.env` file in the working directory is read first.
    /// Evaluation order:
    /// 1) `$VITRINE_FEED_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$VITRINE_FEED_CONFIG_JSON` (inline JSON),
    /// 3) `vitrine-feed.toml`/`.json` in the working directory or `config/`,
    /// 4) defaults if none of the above is present.
    ///
    /// The winning config is validated before it is returned.
    pub fn load_from_env() -> anyhow::Result<(Self, FeedConfigSource)> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env file");
        }
        Self::load_with(|key| env::var(key).ok())
    }

    /// Same as [`FeedConfig::load_from_env`] with an injectable variable
    /// lookup, minus the `.env` side effect.
    pub fn load_with<F>(lookup: F) -> anyhow::Result<(Self, FeedConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, source) = Self::resolve(lookup)?;
        config
            .validate()
            .with_context(|| format!("feed config from {source:?} rejected"))?;
        info!(?source, "feed config loaded");
        Ok((config, source))
    }

    fn resolve<F>(lookup: F) -> anyhow::Result<(Self, FeedConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path_str) = lookup(CONFIG_PATH_VAR)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str.trim());
            let config = Self::load_from_file(&path)?;
            return Ok((config, FeedConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_VAR)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("{CONFIG_JSON_VAR} rejected"))?;
            return Ok((parsed, FeedConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, FeedConfigSource::File(path)));
        }

        Ok((Self::default(), FeedConfigSource::Default))
    }

    /// Read a config file. `.json` and `.toml` pick the format; any other
    /// extension is accepted in either.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let origin = path.display().to_string();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("cannot read feed config at {origin}"))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("feed config {origin}")),
            Some("toml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("feed config {origin} is not valid TOML: {err}")
            }),
            _ => Self::parse_from_str(&contents, &origin),
        }
    }

    /// Parse text of unknown format. `origin` only labels the error.
    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        let toml_err = match toml::from_str(contents) {
            Ok(config) => return Ok(config),
            Err(err) => err,
        };
        serde_json::from_str(contents).map_err(|json_err| {
            anyhow!(
                "feed config {origin} is neither TOML ({toml_err}) \
                 nor JSON ({json_err})"
            )
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("feed config is not valid JSON: {err}"))
    }

    fn find_default_file() -> Option<PathBuf> {
        ["", "config"]
            .into_iter()
            .flat_map(|dir| {
                DEFAULT_FILE_NAMES.map(|name| Path::new(dir).join(name))
            })
            .find(|path| path.is_file())
    }
}
