//! mindmap-graph: Interactive force-directed keyword mind map.
//!
//! This crate provides a WASM-based canvas component that lays out a keyword
//! co-occurrence graph with a force simulation and lets the user pan, zoom and
//! drag nodes while the layout keeps reacting.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod api;
pub mod components;
pub mod config;

pub use components::force_graph::{Edge, ForceGraphCanvas, GraphConfig, GraphData, Node};
pub use config::AppConfig;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("mindmap-graph: logging initialized");
}

/// Main application component.
/// Loads the mind map in the background and renders it full screen.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = config::load_config();
	let graph = RwSignal::new(GraphData::default());

	let source = config.clone();
	leptos::task::spawn_local(async move {
		let data = api::load_graph(&source).await;
		info!(
			"mindmap-graph: loaded {} nodes, {} edges",
			data.nodes.len(),
			data.edges.len()
		);
		graph.set(data);
	});

	let theme = config.theme();
	let graph_config = config.graph;

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Keyword Mind Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphCanvas data=graph config=graph_config theme=theme fullscreen=true />
			<div class="graph-overlay">
				<h1>"Mind Map"</h1>
				<p class="subtitle">
					"Drag nodes to reposition. Scroll to zoom. Drag background to pan. Double-click to fit."
				</p>
			</div>
		</div>
	}
}
