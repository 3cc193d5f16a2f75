//! Graph data loading.
//!
//! The mind map comes from `GET {api_base_url}/users/{user_id}/mindmap`, or
//! from a `<script id="graph-data">` element when no user is configured.
//! Failures never reach the UI as errors: they are logged and turn into an
//! empty graph, or the sample graph when the demo fallback is enabled.

use log::{info, warn};
use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::components::force_graph::{GraphData, adapt, adapt_str, demo_graph};
use crate::config::{AppConfig, read_script};

/// Id of the script element holding an embedded graph payload.
pub const GRAPH_ELEMENT_ID: &str = "graph-data";

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("no browser window")]
	NoWindow,

	#[error("network error: {0}")]
	Network(String),

	#[error("server responded with HTTP {0}")]
	Status(u16),

	#[error("could not decode response: {0}")]
	Decode(String),
}

/// Mind map endpoint for a user.
pub fn mindmap_url(api_base_url: &str, user_id: &str) -> String {
	format!(
		"{}/users/{}/mindmap",
		api_base_url.trim_end_matches('/'),
		user_id.trim_matches('/')
	)
}

/// Fetch the raw mind map payload.
pub async fn fetch_mindmap(url: &str) -> Result<Value, FetchError> {
	let window = web_sys::window().ok_or(FetchError::NoWindow)?;

	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::Cors);
	let request = Request::new_with_str_and_init(url, &opts)
		.map_err(|e| FetchError::Network(describe(&e)))?;
	request
		.headers()
		.set("Accept", "application/json")
		.map_err(|e| FetchError::Network(describe(&e)))?;

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| FetchError::Network(describe(&e)))?
		.dyn_into()
		.map_err(|_| FetchError::Decode("fetch did not return a Response".to_string()))?;
	if !response.ok() {
		return Err(FetchError::Status(response.status()));
	}

	let body = response.text().map_err(|e| FetchError::Decode(describe(&e)))?;
	let text = JsFuture::from(body)
		.await
		.map_err(|e| FetchError::Decode(describe(&e)))?
		.as_string()
		.ok_or_else(|| FetchError::Decode("response body is not text".to_string()))?;
	serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Load the graph for the configured source. Never fails.
pub async fn load_graph(config: &AppConfig) -> GraphData {
	let Some(user_id) = config.user_id.as_deref() else {
		return embedded_graph();
	};

	let url = mindmap_url(&config.api_base_url, user_id);
	info!("mindmap-graph: fetching {}", url);
	match fetch_mindmap(&url).await {
		Ok(payload) => adapt(&payload),
		Err(e) => fallback(&e, config.demo_fallback),
	}
}

/// Graph to show after a failed fetch.
fn fallback(error: &FetchError, demo: bool) -> GraphData {
	if demo {
		warn!("mindmap-graph: {}, showing sample graph", error);
		demo_graph()
	} else {
		warn!("mindmap-graph: {}", error);
		GraphData::default()
	}
}

/// Graph embedded in the page, or an empty graph.
fn embedded_graph() -> GraphData {
	match read_script(GRAPH_ELEMENT_ID) {
		Ok(Some(text)) => adapt_str(&text),
		Ok(None) => {
			info!("mindmap-graph: no user configured and no embedded graph");
			GraphData::default()
		}
		Err(e) => {
			warn!("mindmap-graph: {}", e);
			GraphData::default()
		}
	}
}

fn describe(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
