//! Leptos component wrapping the mind map canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, and zooming. Two `requestAnimationFrame`
//! callbacks drive it: the tick loop advances the simulation and only keeps
//! itself scheduled while the layout is moving, and the redraw callback paints
//! one frame. Both go through a [`PendingFrame`] so a burst of ticks or pointer
//! events never queues more than one frame of each kind.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, ResizeObserver,
	WheelEvent,
};

use super::frame::{FrameHost, PendingFrame};
use super::render;
use super::state::{ForceGraphState, GraphConfig, PointerInput};
use super::theme::Theme;
use super::types::{GraphData, Point};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// Bundles graph state with the drawing surface it renders to.
struct GraphContext {
	state: ForceGraphState,
	theme: Theme,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	/// Frame the graph once the current layout settles.
	fit_pending: bool,
}

impl GraphContext {
	fn size(&self) -> (f64, f64) {
		(self.canvas.width() as f64, self.canvas.height() as f64)
	}
}

/// [`FrameHost`] backed by `window.requestAnimationFrame`.
#[derive(Clone, Default)]
struct AnimationFrameHost {
	callback: FrameCallback,
}

impl FrameHost for AnimationFrameHost {
	fn request_frame(&self) -> Option<i32> {
		let window = web_sys::window()?;
		let callback = self.callback.borrow();
		window
			.request_animation_frame(callback.as_ref()?.as_ref().unchecked_ref())
			.ok()
	}

	fn cancel_frame(&self, handle: i32) {
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(handle);
		}
	}
}

/// The tick and redraw frame slots.
#[derive(Clone, Default)]
struct Scheduler {
	tick: Rc<RefCell<PendingFrame>>,
	redraw: Rc<RefCell<PendingFrame>>,
	tick_host: AnimationFrameHost,
	redraw_host: AnimationFrameHost,
}

impl Scheduler {
	fn request_tick(&self) {
		self.tick.borrow_mut().request(&self.tick_host);
	}

	fn request_redraw(&self) {
		self.redraw.borrow_mut().request(&self.redraw_host);
	}

	fn cancel(&self) {
		self.tick.borrow_mut().cancel(&self.tick_host);
		self.redraw.borrow_mut().cancel(&self.redraw_host);
	}

	/// Drop both callbacks. They capture the scheduler, so this breaks the cycle.
	fn release(&self) {
		self.tick_host.callback.borrow_mut().take();
		self.redraw_host.callback.borrow_mut().take();
	}
}

/// Renders an interactive keyword mind map on a canvas element.
///
/// Pass graph data via the reactive `data` signal; every change replaces the
/// layout. The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the window. Explicit `width`/`height` override
/// automatic sizing. Without `fullscreen`, size changes of the parent element
/// are observed as well as window resizes. Double-click frames the whole graph.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: GraphConfig,
	#[prop(optional)] theme: Theme,
	/// Auto-fit once each freshly loaded layout settles.
	#[prop(default = true)]
	fit_on_settle: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let scheduler = Scheduler::default();
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let observer: Rc<RefCell<Option<ResizeObserver>>> = Rc::new(RefCell::new(None));
	let (context_init, scheduler_init, resize_cb_init, observer_init) = (
		context.clone(),
		scheduler.clone(),
		resize_cb.clone(),
		observer.clone(),
	);

	Effect::new(move |_| {
		let graph = data.get();

		if let Some(ref mut c) = *context_init.borrow_mut() {
			info!(
				"mindmap-graph: reloading layout with {} nodes, {} edges",
				graph.nodes.len(),
				graph.edges.len()
			);
			c.state.load(graph);
			c.fit_pending = fit_on_settle;
			scheduler_init.request_tick();
			scheduler_init.request_redraw();
			return;
		}

		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = context_2d(&canvas) else {
			warn!("mindmap-graph: canvas has no 2d context, graph disabled");
			return;
		};

		let (w, h) = surface_size(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let mut state = ForceGraphState::new(graph, config.clone());
		// The initial spiral is tiny; fitting it now would zoom all the way in.
		state.center(w, h);
		let redraw = scheduler_init.clone();
		state.simulation.on_tick(move |_| redraw.request_redraw());

		*context_init.borrow_mut() = Some(GraphContext {
			state,
			theme: theme.clone(),
			canvas: canvas.clone(),
			ctx,
			fit_pending: fit_on_settle,
		});

		let (context_tick, scheduler_tick) = (context_init.clone(), scheduler_init.clone());
		*scheduler_init.tick_host.callback.borrow_mut() = Some(Closure::new(move |now: f64| {
			scheduler_tick.tick.borrow_mut().fired();
			let running = match *context_tick.borrow_mut() {
				Some(ref mut c) => {
					let running = c.state.simulation.step(now);
					if !running && c.fit_pending {
						c.fit_pending = false;
						let (w, h) = c.size();
						c.state.auto_fit(w, h);
						scheduler_tick.request_redraw();
					}
					running
				}
				None => false,
			};
			if running {
				scheduler_tick.request_tick();
			}
		}));

		let (context_draw, scheduler_draw) = (context_init.clone(), scheduler_init.clone());
		*scheduler_init.redraw_host.callback.borrow_mut() = Some(Closure::new(move |_: f64| {
			scheduler_draw.redraw.borrow_mut().fired();
			if let Some(ref c) = *context_draw.borrow() {
				let (w, h) = c.size();
				render::render(&c.state, &c.ctx, w, h, &c.theme);
			}
		}));

		let (context_resize, scheduler_resize) = (context_init.clone(), scheduler_init.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				let (nw, nh) = surface_size(&c.canvas, fullscreen, width, height);
				if c.state.resize(nw, nh) {
					c.canvas.set_width(nw as u32);
					c.canvas.set_height(nh as u32);
					debug!("mindmap-graph: resized to {}x{}", nw, nh);
				}
			}
			scheduler_resize.request_tick();
			scheduler_resize.request_redraw();
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), resize_cb_init.borrow().as_ref()) {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		if !fullscreen {
			let parent = canvas.parent_element();
			if let (Some(parent), Some(cb)) = (parent, resize_cb_init.borrow().as_ref()) {
				match ResizeObserver::new(cb.as_ref().unchecked_ref()) {
					Ok(obs) => {
						obs.observe(&parent);
						*observer_init.borrow_mut() = Some(obs);
					}
					Err(e) => warn!("mindmap-graph: cannot observe container size: {:?}", e),
				}
			}
		}

		info!("mindmap-graph: mounted at {}x{}", w, h);
		scheduler_init.request_tick();
		scheduler_init.request_redraw();
	});

	let teardown = SendWrapper::new((context.clone(), scheduler.clone(), resize_cb, observer));
	on_cleanup(move || {
		let (context, scheduler, resize_cb, observer) = teardown.take();
		if let Some(ref mut c) = *context.borrow_mut() {
			c.state.simulation.stop();
		}
		scheduler.cancel();
		if let Some(obs) = observer.borrow_mut().take() {
			obs.disconnect();
		}
		if let (Some(window), Some(cb)) = (web_sys::window(), resize_cb.borrow_mut().take()) {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		scheduler.release();
		context.borrow_mut().take();
		debug!("mindmap-graph: unmounted");
	});

	let (context_md, scheduler_md) = (context.clone(), scheduler.clone());
	let on_mousedown = move |ev: MouseEvent| {
		let Some(at) = local_position(canvas_ref, &ev) else {
			return;
		};
		if dispatch(&context_md, &scheduler_md, PointerInput::Down(at)) {
			ev.stop_propagation();
		}
	};

	let (context_mm, scheduler_mm) = (context.clone(), scheduler.clone());
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(at) = local_position(canvas_ref, &ev) {
			dispatch(&context_mm, &scheduler_mm, PointerInput::Move(at));
		}
	};

	let (context_mu, scheduler_mu) = (context.clone(), scheduler.clone());
	let on_mouseup = move |_: MouseEvent| {
		dispatch(&context_mu, &scheduler_mu, PointerInput::Up);
	};

	let (context_ml, scheduler_ml) = (context.clone(), scheduler.clone());
	let on_mouseleave = move |_: MouseEvent| {
		dispatch(&context_ml, &scheduler_ml, PointerInput::Leave);
	};

	let (context_wh, scheduler_wh) = (context.clone(), scheduler.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(position) = local_position(canvas_ref, &ev) {
			let input = PointerInput::Wheel {
				position,
				delta_y: ev.delta_y(),
			};
			dispatch(&context_wh, &scheduler_wh, input);
		}
	};

	let (context_dc, scheduler_dc) = (context, scheduler);
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_dc.borrow_mut() {
			let (w, h) = c.size();
			c.state.auto_fit(w, h);
		}
		scheduler_dc.request_redraw();
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			style="display: block; cursor: grab;"
		/>
	}
}

/// Route one pointer input into the graph state and schedule whatever it
/// needs. Returns true when the event was claimed by a node drag.
fn dispatch(context: &SharedContext, scheduler: &Scheduler, input: PointerInput) -> bool {
	let (claimed, running, changed) = {
		let mut guard = context.borrow_mut();
		let Some(c) = guard.as_mut() else {
			return false;
		};
		let was_idle = c.state.interaction.is_idle();
		let claimed = c.state.handle_pointer(input);

		let hover = match input {
			PointerInput::Down(at) | PointerInput::Move(at) => Some(at),
			_ => None,
		};
		let cursor = if !c.state.interaction.is_idle() {
			"grabbing"
		} else if hover.and_then(|at| c.state.node_at_position(at)).is_some() {
			"pointer"
		} else {
			"grab"
		};
		let _ = HtmlElement::style(&c.canvas).set_property("cursor", cursor);

		let changed = !(was_idle && matches!(input, PointerInput::Move(_)));
		(claimed, c.state.simulation.is_running(), changed)
	};

	if running {
		scheduler.request_tick();
	}
	if changed {
		scheduler.request_redraw();
	}
	claimed
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Live pixel size of the host surface.
fn surface_size(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
		let size = web_sys::window()
			.and_then(|win| Some((inner(win.inner_width())?, inner(win.inner_height())?)));
		if let Some(size) = size {
			return size;
		}
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0)
		}),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0)
		}),
	)
}

fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
