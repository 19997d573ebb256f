//! Canvas lifecycle: keep a canvas's drawing surface sized to its container
//! and tick a redraw notification for live content.
//!
//! Each registered canvas owns one [`CanvasSubscription`] holding both the
//! window `resize` listener and the redraw interval. Dropping the
//! subscription removes the listener and cancels the interval together.
//!
//! Redraw notifications are plain DOM events named `draw_<canvas id>`
//! dispatched on the canvas element, so listeners of other canvases never see them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, HtmlElement};

use crate::dom::document;

/// ~30 redraw notifications per second.
pub const DEFAULT_REDRAW_INTERVAL_MS: u32 = 33;

pub fn redraw_event_name(canvas_id: &str) -> String {
    format!("draw_{canvas_id}")
}

fn find_canvas(canvas_id: &str) -> Option<HtmlCanvasElement> {
    document()?
        .get_element_by_id(canvas_id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

fn find_container(container_id: &str) -> Option<HtmlElement> {
    document()?
        .get_element_by_id(container_id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

fn emit_redraw(canvas: &HtmlCanvasElement, canvas_id: &str) {
    let name = redraw_event_name(canvas_id);
    match Event::new(&name) {
        Ok(event) => {
            if let Err(e) = canvas.dispatch_event(&event) {
                log::warn!("failed to dispatch {name}: {e:?}");
            }
        }
        Err(e) => log::warn!("failed to create {name} event: {e:?}"),
    }
}

/// Emit the redraw notification for `canvas_id`. No-op if the canvas is not mounted.
pub fn request_redraw(canvas_id: &str) {
    if let Some(canvas) = find_canvas(canvas_id) {
        emit_redraw(&canvas, canvas_id);
    }
}

/// Set the drawing-surface size of `canvas_id` and emit one redraw notification.
pub fn apply_size(canvas_id: &str, width: u32, height: u32) {
    let Some(canvas) = find_canvas(canvas_id) else {
        log::warn!("attempted to set the size of canvas {canvas_id:?}, which does not exist");
        return;
    };

    canvas.set_width(width);
    canvas.set_height(height);
    emit_redraw(&canvas, canvas_id);
}

/// Size `canvas_id` to the current rendered size of `container_id`.
/// Does nothing if the container is not mounted.
pub fn derive_and_apply_size(canvas_id: &str, container_id: &str) {
    let Some(container) = find_container(container_id) else {
        log::debug!("container {container_id:?} for canvas {canvas_id:?} not mounted");
        return;
    };

    apply_size(
        canvas_id,
        to_pixels(container.offset_width()),
        to_pixels(container.offset_height()),
    );
}

/// Current drawing-surface size of `canvas_id`.
pub fn canvas_size(canvas_id: &str) -> Option<(u32, u32)> {
    find_canvas(canvas_id).map(|canvas| (canvas.width(), canvas.height()))
}

fn to_pixels(offset: i32) -> u32 {
    offset.max(0) as u32
}

struct WindowListener {
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    fn new(event: &'static str, callback: Closure<dyn FnMut(Event)>) -> Option<Self> {
        let window = web_sys::window()?;
        if let Err(e) =
            window.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to add {event} listener: {e:?}");
            return None;
        }
        Some(Self { event, callback })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window
                .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
            {
                log::warn!("failed to remove window {} listener: {e:?}", self.event);
            }
        }
    }
}

/// Resize listener and redraw interval for one canvas.
pub struct CanvasSubscription {
    canvas_id: String,
    container_id: String,
    _resize: Option<WindowListener>,
    _redraw: Interval,
}

impl CanvasSubscription {
    fn new(canvas_id: &str, container_id: &str, redraw_interval_ms: u32) -> Self {
        let resize = {
            let canvas_id = canvas_id.to_string();
            let container_id = container_id.to_string();
            let callback = Closure::wrap(Box::new(move |_event: Event| {
                log::trace!("resize event for canvas {canvas_id}");
                derive_and_apply_size(&canvas_id, &container_id);
            }) as Box<dyn FnMut(Event)>);
            WindowListener::new("resize", callback)
        };

        let redraw = {
            let canvas_id = canvas_id.to_string();
            Interval::new(redraw_interval_ms, move || request_redraw(&canvas_id))
        };

        Self {
            canvas_id: canvas_id.to_string(),
            container_id: container_id.to_string(),
            _resize: resize,
            _redraw: redraw,
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }
}

impl Drop for CanvasSubscription {
    fn drop(&mut self) {
        log::debug!("tearing down canvas events for {}", self.canvas_id);
    }
}

/// Owned map from canvas id to its live subscription.
///
/// At most one subscription exists per canvas id: registering an id again
/// tears the old one down first.
pub struct CanvasRegistry {
    redraw_interval_ms: u32,
    subscriptions: HashMap<String, CanvasSubscription>,
}

impl Default for CanvasRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REDRAW_INTERVAL_MS)
    }
}

impl CanvasRegistry {
    pub fn new(redraw_interval_ms: u32) -> Self {
        Self {
            redraw_interval_ms,
            subscriptions: HashMap::new(),
        }
    }

    pub fn redraw_interval_ms(&self) -> u32 {
        self.redraw_interval_ms
    }

    pub fn register(&mut self, canvas_id: &str, container_id: &str) {
        if let Some(previous) = self.subscriptions.remove(canvas_id) {
            log::debug!(
                "canvas {canvas_id} re-registered (was bound to {}), replacing",
                previous.container_id()
            );
            drop(previous);
        }

        let subscription = CanvasSubscription::new(canvas_id, container_id, self.redraw_interval_ms);
        log::debug!("canvas events set up for {canvas_id} in {container_id}");
        self.subscriptions.insert(canvas_id.to_string(), subscription);
    }

    /// Returns whether a registration existed. Safe to call for unknown ids.
    pub fn unregister(&mut self, canvas_id: &str) -> bool {
        self.subscriptions.remove(canvas_id).is_some()
    }

    pub fn is_registered(&self, canvas_id: &str) -> bool {
        self.subscriptions.contains_key(canvas_id)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

/// Cloneable handle to a [`CanvasRegistry`] for UI context.
#[derive(Clone, Default)]
pub struct SharedCanvasRegistry(Rc<RefCell<CanvasRegistry>>);

impl SharedCanvasRegistry {
    pub fn new(registry: CanvasRegistry) -> Self {
        Self(Rc::new(RefCell::new(registry)))
    }

    pub fn register(&self, canvas_id: &str, container_id: &str) {
        self.0.borrow_mut().register(canvas_id, container_id);
    }

    pub fn unregister(&self, canvas_id: &str) -> bool {
        self.0.borrow_mut().unregister(canvas_id)
    }

    pub fn is_registered(&self, canvas_id: &str) -> bool {
        self.0.borrow().is_registered(canvas_id)
    }
}

/// The canvas a mounted view currently holds in a [`SharedCanvasRegistry`].
///
/// Binding another canvas id releases the previous one, and dropping the
/// binding releases whatever is still held.
pub struct CanvasBinding {
    registry: SharedCanvasRegistry,
    bound: Option<(String, String)>,
}

impl CanvasBinding {
    pub fn new(registry: SharedCanvasRegistry) -> Self {
        Self {
            registry,
            bound: None,
        }
    }

    /// Register `canvas_id` inside `container_id` and size it now. A no-op
    /// when that exact pair is already bound.
    pub fn bind(&mut self, canvas_id: &str, container_id: &str) {
        if self
            .bound
            .as_ref()
            .is_some_and(|(canvas, container)| canvas == canvas_id && container == container_id)
        {
            return;
        }

        self.release();
        self.registry.register(canvas_id, container_id);
        derive_and_apply_size(canvas_id, container_id);
        self.bound = Some((canvas_id.to_string(), container_id.to_string()));
    }

    pub fn release(&mut self) {
        if let Some((canvas_id, _)) = self.bound.take() {
            self.registry.unregister(&canvas_id);
        }
    }
}

impl Drop for CanvasBinding {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redraw_event_is_scoped_to_canvas_id() {
        assert_eq!(redraw_event_name("graph"), "draw_graph");
        assert_ne!(redraw_event_name("c1"), redraw_event_name("c2"));
    }

    #[test]
    fn negative_offsets_clamp_to_zero() {
        assert_eq!(to_pixels(-4), 0);
        assert_eq!(to_pixels(0), 0);
        assert_eq!(to_pixels(400), 400);
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = CanvasRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.redraw_interval_ms(), DEFAULT_REDRAW_INTERVAL_MS);
    }
}
