//! Force-directed mind map component.
//!
//! Renders an interactive keyword graph on an HTML canvas with:
//! - Physics-based layout that settles and stops on its own
//! - Pan, zoom-at-cursor and node dragging with pinning
//! - Auto-fit framing of the whole graph
//! - Lenient normalization of backend payloads
//!
//! The engine modules ([`simulation`], [`viewport`], [`fit`], [`interaction`],
//! [`frame`]) are plain Rust and do not touch the DOM; only the component and
//! renderer do.
//!
//! # Example
//!
//! ```ignore
//! use mindmap_graph::components::force_graph::{ForceGraphCanvas, GraphData, Node, Edge};
//!
//! let data = GraphData {
//!     nodes: vec![Node::new("1", "rust"), Node::new("2", "wasm")],
//!     edges: vec![Edge::new("1", "2")],
//! };
//!
//! view! { <ForceGraphCanvas data=Signal::derive(move || data.clone()) fullscreen=true /> }
//! ```

pub mod adapter;
mod component;
pub mod fit;
pub mod frame;
pub mod interaction;
mod render;
pub mod simulation;
pub mod state;
pub mod theme;
pub mod types;
pub mod viewport;

pub use adapter::{adapt, adapt_str, demo_graph};
pub use component::ForceGraphCanvas;
pub use state::{ForceGraphState, GraphConfig};
pub use theme::Theme;
pub use types::{Edge, GraphData, Node, Point};
