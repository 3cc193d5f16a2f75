//! Canvas rendering for the mind map.
//!
//! Draws the background in screen space, then edges and nodes in graph space
//! under the viewport transform. Nodes are drawn after edges so links never
//! cover them. An empty graph gets an explicit message instead of a blank
//! surface.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::Node;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	theme: &Theme,
) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, width, height);

	if state.simulation.nodes().is_empty() {
		draw_empty(ctx, width, height, theme);
		return;
	}

	let view = state.viewport.state();
	ctx.save();
	let _ = ctx.translate(view.pan_x, view.pan_y);
	let _ = ctx.scale(view.zoom, view.zoom);

	draw_edges(state, ctx, view.zoom, theme);
	draw_nodes(state, ctx, view.zoom, theme);

	ctx.restore();
}

fn draw_empty(ctx: &CanvasRenderingContext2d, width: f64, height: f64, theme: &Theme) {
	ctx.set_fill_style_str(&theme.empty_text.to_css());
	ctx.set_font("14px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text("No data", width / 2.0, height / 2.0);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, k: f64, theme: &Theme) {
	ctx.set_stroke_style_str(&theme.edge.color.to_css());
	// Constant on-screen thickness regardless of zoom.
	ctx.set_line_width(theme.edge.width / k);
	ctx.begin_path();
	for (a, b) in state.simulation.edge_endpoints() {
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
	}
	ctx.stroke();
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, k: f64, theme: &Theme) {
	let radius = state.config.node_radius;
	let dragged = state.interaction.dragged_node();
	let show_labels = k >= theme.label.min_zoom;

	for node in state.simulation.nodes() {
		draw_node(ctx, node, radius, k, theme);
		if dragged == Some(node.id.as_str()) {
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, radius + 4.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.node.pinned_ring.to_css());
			ctx.set_line_width(2.0 / k);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from(4.0 / k),
				&JsValue::from(3.0 / k),
			));
			ctx.stroke();
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}

	if show_labels {
		ctx.set_fill_style_str(&theme.label.color.to_css());
		ctx.set_font(&format!("{}px sans-serif", theme.label.size / k));
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		for node in state.simulation.nodes() {
			let _ = ctx.fill_text(&node.keyword, node.x, node.y + radius + 4.0 / k);
		}
	}
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &Node, radius: f64, k: f64, theme: &Theme) {
	let (x, y) = (node.x, node.y);
	let base = theme.palette.get(node.group);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);

	match theme
		.node
		.use_gradient
		.then(|| ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius).ok())
		.flatten()
	{
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base.to_css());
			let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&base.to_css()),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / k);
		ctx.stroke();
	}
}
