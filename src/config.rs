//! Application configuration embedded in the host page.
//!
//! The page may carry a `<script id="mindmap-config" type="application/json">`
//! element. Every field is optional; a missing element means defaults, a
//! broken one is logged and also means defaults.

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::components::force_graph::{GraphConfig, Theme};

/// Id of the script element holding [`AppConfig`] JSON.
pub const CONFIG_ELEMENT_ID: &str = "mindmap-config";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("element #{0} is not a script element")]
	NotAScript(String),

	#[error("element #{0} has no readable text")]
	Unreadable(String),

	#[error("invalid config JSON: {0}")]
	Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Backend root, without a trailing slash.
	pub api_base_url: String,
	/// Whose mind map to fetch. Without one, the graph embedded in the page is used.
	pub user_id: Option<String>,
	/// Show the sample graph when the backend cannot be reached.
	pub demo_fallback: bool,
	/// `"light"` or `"midnight"`.
	pub theme: Option<String>,
	pub graph: GraphConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: "http://localhost:3001".to_string(),
			user_id: None,
			demo_fallback: false,
			theme: None,
			graph: GraphConfig::default(),
		}
	}
}

impl AppConfig {
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(json)?)
	}

	/// Resolve the configured theme, falling back to the default one.
	pub fn theme(&self) -> Theme {
		match self.theme.as_deref() {
			None => Theme::default(),
			Some(name) => Theme::by_name(name).unwrap_or_else(|| {
				warn!("mindmap-graph: unknown theme {:?}, using default", name);
				Theme::default()
			}),
		}
	}
}

/// Read the configuration from the page. Never fails.
pub fn load_config() -> AppConfig {
	let parsed = read_script(CONFIG_ELEMENT_ID)
		.and_then(|text| text.map(|t| AppConfig::from_json(&t)).transpose());
	match parsed {
		Ok(Some(config)) => {
			info!("mindmap-graph: loaded config from #{}", CONFIG_ELEMENT_ID);
			config
		}
		Ok(None) => AppConfig::default(),
		Err(e) => {
			warn!("mindmap-graph: ignoring page config: {}", e);
			AppConfig::default()
		}
	}
}

/// Text of the script element with the given id, or `None` if the page has
/// no such element.
pub(crate) fn read_script(id: &str) -> Result<Option<String>, ConfigError> {
	let Some(element) = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(id))
	else {
		return Ok(None);
	};
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| ConfigError::NotAScript(id.to_string()))?;
	script
		.text()
		.map(Some)
		.map_err(|_| ConfigError::Unreadable(id.to_string()))
}
