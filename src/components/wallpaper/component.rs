//! Leptos component hosting the wallpaper scene on a canvas.
//!
//! The component plays the host's role: it owns the canvas, and translates
//! DOM lifecycle and input events (mount, resize, page visibility, wheel
//! paging, pointer input) into the scene's lifecycle calls.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, PointerEvent, WheelEvent, Window};

use super::scene::Scene;
use super::theme::Theme;
use super::types::{TouchPhase, VirtualPager};
use super::web::{WebAssets, WebScene, WebSurface, WindowTimer};

fn window_size(window: &Window) -> (u32, u32) {
	let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
	(
		dim(window.inner_width()) as u32,
		dim(window.inner_height()) as u32,
	)
}

/// Builds the scene with a timer that ticks it through a weak handle, so the
/// pending timeout never keeps the scene alive on its own.
fn create_scene(window: Window, theme: Theme) -> Rc<RefCell<WebScene>> {
	Rc::new_cyclic(|weak: &Weak<RefCell<WebScene>>| {
		let weak = weak.clone();
		let timer = WindowTimer::new(window, move || {
			let Some(scene) = weak.upgrade() else {
				return;
			};
			match scene.try_borrow_mut() {
				Ok(mut scene) => scene.tick(),
				Err(_) => warn!("ethereal: tick re-entered, dropping frame"),
			};
		});
		RefCell::new(Scene::new(theme, WebAssets, timer))
	})
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &PointerEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the live wallpaper full-window.
///
/// `theme` is read once at mount. `pages` sets how many virtual home-screen
/// pages the wheel scrolls through, which drives parallax.
#[component]
pub fn WallpaperCanvas(
	#[prop(into)] theme: Signal<Theme>,
	#[prop(default = 5)] pages: u32,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let scene: Rc<RefCell<Option<Rc<RefCell<WebScene>>>>> = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<Vec<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(Vec::new()));
	let pager = Rc::new(RefCell::new(VirtualPager::new(pages)));
	let (scene_init, listeners_init) = (scene.clone(), listeners.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if scene_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("ethereal: no window, not mounting");
			return;
		};
		let Some(document) = window.document() else {
			error!("ethereal: no document, not mounting");
			return;
		};
		let surface = match WebSurface::new(&document, canvas) {
			Ok(surface) => surface,
			Err(e) => {
				error!("ethereal: cannot draw on canvas: {}", e);
				return;
			}
		};

		let handle = create_scene(window.clone(), theme.get_untracked());
		let (w, h) = window_size(&window);
		surface.resize(w, h);
		{
			let mut s = handle.borrow_mut();
			s.surface_created(surface.clone());
			s.surface_changed(surface.clone(), w, h);
			s.visibility_changed(!document.hidden());
		}

		let add_listener = |target: &web_sys::EventTarget, event: &str, cb: Closure<dyn FnMut()>| {
			if let Err(e) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
				warn!("ethereal: cannot listen for {}: {:?}", event, e);
			}
			listeners_init.borrow_mut().push(cb);
		};

		let (scene_resize, surface_resize, window_resize) =
			(handle.clone(), surface.clone(), window.clone());
		add_listener(
			&window,
			"resize",
			Closure::new(move || {
				let (nw, nh) = window_size(&window_resize);
				surface_resize.resize(nw, nh);
				scene_resize
					.borrow_mut()
					.surface_changed(surface_resize.clone(), nw, nh);
			}),
		);

		let (scene_vis, document_vis) = (handle.clone(), document.clone());
		add_listener(
			&document,
			"visibilitychange",
			Closure::new(move || {
				scene_vis.borrow_mut().visibility_changed(!document_vis.hidden());
			}),
		);

		let scene_hide = handle.clone();
		add_listener(
			&window,
			"pagehide",
			Closure::new(move || {
				let mut s = scene_hide.borrow_mut();
				s.visibility_changed(false);
				s.surface_destroyed();
			}),
		);

		let (scene_show, surface_show, window_show, document_show) =
			(handle.clone(), surface.clone(), window.clone(), document.clone());
		add_listener(
			&window,
			"pageshow",
			Closure::new(move || {
				let mut s = scene_show.borrow_mut();
				if s.has_surface() {
					return;
				}
				let (nw, nh) = window_size(&window_show);
				surface_show.resize(nw, nh);
				s.surface_created(surface_show.clone());
				s.surface_changed(surface_show.clone(), nw, nh);
				s.visibility_changed(!document_show.hidden());
			}),
		);

		*scene_init.borrow_mut() = Some(handle);
	});

	let with_scene = {
		let scene = scene.clone();
		move |f: &dyn Fn(&mut WebScene)| {
			if let Some(handle) = scene.borrow().as_ref() {
				f(&mut handle.borrow_mut());
			}
		}
	};

	let touch = move |ev: PointerEvent, phase: TouchPhase| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		with_scene(&|s| s.touch_event(x, y, phase));
	};

	let touch_down = touch.clone();
	let on_pointerdown = move |ev: PointerEvent| touch_down(ev, TouchPhase::Down);

	let touch_move = touch.clone();
	let on_pointermove = move |ev: PointerEvent| {
		// Hover without a pressed button is not a touch.
		if ev.buttons() != 0 {
			touch_move(ev, TouchPhase::Move);
		}
	};

	let touch_up = touch.clone();
	let on_pointerup = move |ev: PointerEvent| touch_up(ev, TouchPhase::Up);

	let touch_cancel = touch.clone();
	let on_pointercancel = move |ev: PointerEvent| touch_cancel(ev, TouchPhase::Cancel);

	let on_pointerleave = move |ev: PointerEvent| touch(ev, TouchPhase::Cancel);

	let scene_wheel = scene.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let delta = if ev.delta_x().abs() > ev.delta_y().abs() {
			ev.delta_x()
		} else {
			ev.delta_y()
		};
		if let Some(handle) = scene_wheel.borrow().as_ref() {
			let mut s = handle.borrow_mut();
			let page_width = f64::from(s.viewport().0);
			let offsets = pager.borrow_mut().scroll(delta, page_width);
			s.offsets_changed(offsets);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="wallpaper-canvas"
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointercancel=on_pointercancel
			on:pointerleave=on_pointerleave
			on:wheel=on_wheel
			style="display: block; position: fixed; inset: 0; touch-action: none;"
		/>
	}
}
