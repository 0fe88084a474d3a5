//! `web-sys` host and the JavaScript entry points.

use crate::{WebError, scoped_query};
use dragscroll_core::{
    Axis, BindingId, DragScroll, DragScrollConfig, HandleSelector, Host, ListenTarget, ListenerId, MouseButton,
    PointerInfo,
};
use kurbo::Point;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Element, Event, EventTarget, MouseEvent, NodeList, TouchEvent};

struct Registration {
    target: ListenTarget<Element>,
    listener: ListenerId,
    callback: Closure<dyn FnMut(Event)>,
}

/// Host backed by the page's DOM.
pub struct WebHost {
    document: Document,
    registrations: Vec<Registration>,
    /// Callbacks detached during a dispatch; dropped before the next one starts.
    retired: Vec<Closure<dyn FnMut(Event)>>,
}

impl WebHost {
    pub fn new() -> Result<Self, WebError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or(WebError::NoDocument)?;
        Ok(Self {
            document,
            registrations: Vec::new(),
            retired: Vec::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// All elements of the document matching `selector`.
    pub fn query_all(&self, selector: &str) -> Result<Vec<Element>, WebError> {
        self.document
            .query_selector_all(selector)
            .map(elements)
            .map_err(|_| WebError::InvalidSelector(selector.to_string()))
    }

    fn event_target<'a>(&'a self, target: &'a ListenTarget<Element>) -> &'a EventTarget {
        match target {
            ListenTarget::Element(element) => element.as_ref(),
            ListenTarget::Global => self.document.as_ref(),
        }
    }
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn scroll_property(axis: Axis) -> JsValue {
    JsValue::from_str(match axis {
        Axis::Horizontal => "scrollLeft",
        Axis::Vertical => "scrollTop",
    })
}

impl Host for WebHost {
    type Element = Element;
    type Event = Event;

    fn find_descendants(&self, root: &Element, selector: &HandleSelector) -> Vec<Element> {
        let query = scoped_query(selector);
        match root.query_selector_all(&query) {
            Ok(list) => elements(list),
            Err(err) => {
                log::warn!("Invalid handle selector {:?}: {:?}", query, err);
                Vec::new()
            }
        }
    }

    fn add_listener(&mut self, target: &ListenTarget<Element>, listener: ListenerId) {
        let attached = target.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            dispatch(listener, &attached, &event);
        });

        // Touch listeners must be non-passive for preventDefault to take effect.
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let added = self
            .event_target(target)
            .add_event_listener_with_callback_and_add_event_listener_options(
                listener.kind.name(),
                callback.as_ref().unchecked_ref(),
                &options,
            );
        if let Err(err) = added {
            log::warn!("Failed to add {} listener: {:?}", listener.kind.name(), err);
            return;
        }

        self.registrations.push(Registration {
            target: target.clone(),
            listener,
            callback,
        });
    }

    fn remove_listener(&mut self, target: &ListenTarget<Element>, listener: ListenerId) {
        let Some(index) = self
            .registrations
            .iter()
            .position(|r| r.target == *target && r.listener == listener)
        else {
            return;
        };
        let registration = self.registrations.remove(index);
        let removed = self.event_target(target).remove_event_listener_with_callback(
            listener.kind.name(),
            registration.callback.as_ref().unchecked_ref(),
        );
        if let Err(err) = removed {
            log::warn!("Failed to remove {} listener: {:?}", listener.kind.name(), err);
        }
        // The release hook detaches itself, so its callback may still be on the stack.
        self.retired.push(registration.callback);
    }

    fn scroll_offset(&self, element: &Element, axis: Axis) -> f64 {
        js_sys::Reflect::get(element, &scroll_property(axis))
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0)
    }

    fn set_scroll_offset(&mut self, element: &Element, axis: Axis, value: f64) {
        if let Err(err) = js_sys::Reflect::set(element, &scroll_property(axis), &JsValue::from_f64(value)) {
            log::warn!("Failed to set {:?} scroll offset: {:?}", axis, err);
        }
    }

    fn pointer_info(&self, event: &Event) -> Option<PointerInfo<Element>> {
        let mouse = event.dyn_ref::<MouseEvent>()?;
        let original_target = event.target()?.dyn_into::<Element>().ok()?;
        Some(PointerInfo {
            position: Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())),
            button: MouseButton::from_dom(mouse.button()),
            original_target,
        })
    }

    fn pointer_position(&self, event: &Event) -> Option<Point> {
        let mouse = event.dyn_ref::<MouseEvent>()?;
        Some(Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())))
    }

    fn touch_info(&self, event: &Event) -> Option<Point> {
        let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
        Some(Point::new(f64::from(touch.page_x()), f64::from(touch.page_y())))
    }

    fn suppress(&mut self, event: &Event) {
        event.prevent_default();
        event.stop_propagation();
    }
}

struct Runtime {
    host: WebHost,
    scroller: DragScroll<Element>,
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

/// Run `f` against the page-wide runtime, creating it on first use.
fn with_runtime<T>(f: impl FnOnce(&mut Runtime) -> T) -> Result<T, WebError> {
    RUNTIME.with(|cell| {
        let mut slot = cell.try_borrow_mut().map_err(|_| WebError::Busy)?;
        if slot.is_none() {
            *slot = Some(Runtime {
                host: WebHost::new()?,
                scroller: DragScroll::new(),
            });
        }
        let runtime = slot.as_mut().ok_or(WebError::NoDocument)?;
        Ok(f(runtime))
    })
}

fn dispatch(listener: ListenerId, attached: &ListenTarget<Element>, event: &Event) {
    let dispatched = with_runtime(|runtime| {
        runtime.host.retired.clear();
        runtime
            .scroller
            .dispatch(&mut runtime.host, listener, attached, event)
    });
    if let Err(err) = dispatched {
        log::warn!("Dropped {} event: {}", listener.kind.name(), err);
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }
}

/// Enable drag-to-scroll on every element matching `selector`.
///
/// `config` is a JSON object in the `DragScrollConfig` shape; omitted fields use their
/// defaults. Returns the new binding ids.
#[wasm_bindgen(js_name = bindSelector)]
pub fn bind_selector(selector: &str, config: Option<String>) -> Result<Vec<f64>, JsValue> {
    let config = match config {
        Some(json) => DragScrollConfig::from_json(&json).map_err(WebError::from)?,
        None => DragScrollConfig::default(),
    };
    let ids = with_runtime(|runtime| -> Result<Vec<BindingId>, WebError> {
        let elements = runtime.host.query_all(selector)?;
        Ok(runtime.scroller.bind(&mut runtime.host, elements, &config))
    })??;
    log::info!("Bound {} element(s) matching {:?}", ids.len(), selector);
    Ok(ids.into_iter().map(|id| id.raw() as f64).collect())
}

/// Remove one binding created by `bindSelector`.
#[wasm_bindgen]
pub fn unbind(id: f64) -> Result<(), JsValue> {
    let id = BindingId::from_raw(id as u64);
    with_runtime(|runtime| {
        let unbound = runtime.scroller.unbind(&mut runtime.host, id);
        runtime.host.retired.clear();
        unbound
    })?
    .map_err(WebError::from)?;
    Ok(())
}

/// Remove every binding.
#[wasm_bindgen(js_name = unbindAll)]
pub fn unbind_all() -> Result<(), JsValue> {
    with_runtime(|runtime| {
        runtime.scroller.unbind_all(&mut runtime.host);
        runtime.host.retired.clear();
    })?;
    Ok(())
}
