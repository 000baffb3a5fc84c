//! User configuration: a JSON file, an API-key environment override and CLI flags on top.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    assets::font::FontSource,
    compile::plan::DEFAULT_TARGET_WIDTH,
    foundation::error::{MemeError, MemeResult},
};

pub const DEFAULT_IMAGE_API_URL: &str = "https://api.thecatapi.com/v1/images/search";
pub const DEFAULT_CAPTION_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_CAPTION_MODEL: &str = "gpt-4o-mini";

/// Environment variables consulted for the caption API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["CATMEME_API_KEY", "OPENAI_API_KEY"];

const APP_DIR: &str = "catmeme";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Random-image search endpoint.
    pub image_api_url: String,
    /// Chat-completions endpoint used for captions.
    pub caption_api_url: String,
    pub caption_model: String,
    pub api_key: Option<String>,
    /// Output width of composites, in pixels.
    pub target_width: u32,
    /// Caption font file; system lookup when unset.
    pub font_path: Option<PathBuf>,
    /// Directory holding `store.json`; the platform data dir when unset.
    pub data_dir: Option<PathBuf>,
    /// Where saved memes are written.
    pub export_dir: PathBuf,
    /// Per-request HTTP timeout. No timeout when unset.
    pub http_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_api_url: DEFAULT_IMAGE_API_URL.to_owned(),
            caption_api_url: DEFAULT_CAPTION_API_URL.to_owned(),
            caption_model: DEFAULT_CAPTION_MODEL.to_owned(),
            api_key: None,
            target_width: DEFAULT_TARGET_WIDTH,
            font_path: None,
            data_dir: None,
            export_dir: PathBuf::from("."),
            http_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load `path`, or the default config file when `None`.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> MemeResult<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_owned(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(MemeError::config(format!(
                    "read '{}': {e}",
                    path.display()
                )));
            }
        };
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| MemeError::config(format!("parse '{}': {e}", path.display())))?;
        cfg.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    /// `<config dir>/catmeme/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.json"))
    }

    pub fn from_json_str(text: &str) -> MemeResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| MemeError::config(format!("parse config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Take the API key from the first set, non-empty variable in [`API_KEY_ENV_VARS`].
    pub fn apply_api_key_override(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.trim().is_empty())
        {
            self.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> MemeResult<()> {
        if self.target_width == 0 || self.target_width > u32::from(u16::MAX) {
            return Err(MemeError::config(format!(
                "target_width must be in 1..={}",
                u16::MAX
            )));
        }
        for (name, url) in [
            ("image_api_url", &self.image_api_url),
            ("caption_api_url", &self.caption_api_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(MemeError::config(format!("{name} must be an http(s) url")));
            }
        }
        if self.caption_model.trim().is_empty() {
            return Err(MemeError::config("caption_model must not be empty"));
        }
        if self.http_timeout_secs == Some(0) {
            return Err(MemeError::config("http_timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Path of the JSON key-value store.
    pub fn store_path(&self) -> MemeResult<PathBuf> {
        let base = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or_else(|| MemeError::config("no data directory; set data_dir"))?,
        };
        Ok(base.join("store.json"))
    }

    pub fn font_source(&self) -> FontSource {
        match &self.font_path {
            Some(p) => FontSource::File(p.clone()),
            None => FontSource::System,
        }
    }

    pub fn http_client(&self) -> MemeResult<reqwest::Client> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("catmeme/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = self.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| MemeError::config(format!("build http client: {e}")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
