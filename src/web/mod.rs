// web/ - wasm-bindgen exports
//
// CalligraphyCanvas  - self-driving component: mount binds listeners and
//                      starts the requestAnimationFrame loop, unmount undoes
//                      both
// GlyphFieldHandle   - host-driven: JS calls tick() and reads instances()
//
// Shared state sits in Rc<RefCell<_>>. Callbacks hold a Weak and skip the
// event if the state is gone or already borrowed.

mod canvas;

pub use canvas::{CanvasRasterizer, CanvasSurface, RafScheduler};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Float32Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent,
    TouchEvent,
};

use crate::config::FieldConfig;
use crate::driver::FrameLoop;
use crate::error::FieldError;
use crate::render::Encoder;
use crate::sim::GlyphField;
use canvas::{FrameCallback, context_2d};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

fn parse_config(json: Option<String>) -> Result<FieldConfig, FieldError> {
    match json {
        Some(json) if !json.trim().is_empty() => FieldConfig::from_json(&json),
        _ => Ok(FieldConfig::default()),
    }
}

// ============================================================================
// Self-driving component
// ============================================================================

struct Inner {
    field: GlyphField<CanvasRasterizer>,
    surface: CanvasSurface,
    frame_loop: FrameLoop,
    scheduler: RafScheduler,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
}

impl Inner {
    fn frame(&mut self, now_ms: f64) {
        let Inner { field, surface, frame_loop, scheduler, .. } = self;
        if let Err(err) = frame_loop.on_frame(scheduler, || field.tick(now_ms, surface)) {
            log::warn!("glyph field loop stopped: {}", err);
        }
    }

    // Match the canvas to its container, regenerate particles, reschedule
    fn resize(&mut self) {
        let (w, h) = container_size(&self.container);
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        self.field.resize(w, h);
        if let Err(err) = self.frame_loop.restart(&mut self.scheduler) {
            log::warn!("glyph field restart failed: {}", err);
        }
    }

    fn pointer_at(&mut self, client_x: i32, client_y: i32) {
        let rect = self.container.get_bounding_client_rect();
        self.field.pointer_move(
            (client_x as f64 - rect.left()) as f32,
            (client_y as f64 - rect.top()) as f32,
        );
    }
}

fn container_size(container: &HtmlElement) -> (u32, u32) {
    (container.offset_width().max(0) as u32, container.offset_height().max(0) as u32)
}

/// Bound DOM listener, removed on detach.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        passive: Option<bool>,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, FieldError> {
        let func = callback.as_ref().unchecked_ref();
        let bound = match passive {
            Some(passive) => {
                let options = AddEventListenerOptions::new();
                options.set_passive(passive);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    event, func, &options,
                )
            }
            None => target.add_event_listener_with_callback(event, func),
        };
        bound.map_err(|err| FieldError::Dom(format!("{} listener: {:?}", event, err)))?;
        Ok(Self { target: target.clone(), event, callback })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Run `f` on the live state, if it is still alive and not mid-frame.
fn with_inner(weak: &Weak<RefCell<Inner>>, f: impl FnOnce(&mut Inner)) {
    if let Some(inner) = weak.upgrade() {
        if let Ok(mut inner) = inner.try_borrow_mut() {
            f(&mut inner);
        }
    }
}

#[wasm_bindgen]
pub struct CalligraphyCanvas {
    inner: Option<Rc<RefCell<Inner>>>,
    callback: FrameCallback,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl CalligraphyCanvas {
    /// Attach to `container` / `canvas` and start animating. A browser
    /// without a 2d context gets an inert component rather than an error.
    pub fn mount(
        container: HtmlElement,
        canvas: HtmlCanvasElement,
        config_json: Option<String>,
    ) -> Result<CalligraphyCanvas, JsValue> {
        let config = parse_config(config_json)?;
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let Some(window) = web_sys::window() else {
            log::warn!("glyph field: no window, staying inert");
            return Ok(Self::inert());
        };
        let Some(ctx) = context_2d(&canvas) else {
            log::warn!("glyph field: {}, staying inert", FieldError::NoContext);
            return Ok(Self::inert());
        };

        let (w, h) = container_size(&container);
        canvas.set_width(w);
        canvas.set_height(h);

        let inner = Rc::new(RefCell::new(Inner {
            field: GlyphField::new(w, h, config, CanvasRasterizer::new())?,
            surface: CanvasSurface::new(ctx),
            frame_loop: FrameLoop::new(),
            scheduler: RafScheduler::new(window.clone(), callback.clone()),
            container: container.clone(),
            canvas,
        }));

        let weak = Rc::downgrade(&inner);
        *callback.borrow_mut() = Some(Closure::new(move |now: f64| {
            with_inner(&weak, |inner| inner.frame(now));
        }));

        let mut this = CalligraphyCanvas {
            inner: Some(inner.clone()),
            callback,
            listeners: Vec::new(),
        };
        if let Err(err) = this.bind(&window, &container, &inner) {
            this.unmount();
            return Err(err.into());
        }

        let started = {
            let mut state = inner.borrow_mut();
            let Inner { frame_loop, scheduler, .. } = &mut *state;
            frame_loop.start(scheduler)
        };
        if let Err(err) = started {
            this.unmount();
            return Err(err.into());
        }

        log::info!("glyph field mounted at {}x{}", w, h);
        Ok(this)
    }

    /// Cancel the pending frame and detach every listener. Safe to repeat.
    pub fn unmount(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        if let Some(inner) = self.inner.take() {
            let mut state = inner.borrow_mut();
            let Inner { frame_loop, scheduler, .. } = &mut *state;
            frame_loop.teardown(scheduler);
            log::info!("glyph field unmounted");
        }
        self.callback.borrow_mut().take();
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.borrow().frame_loop.is_running())
    }
}

impl CalligraphyCanvas {
    fn inert() -> Self {
        Self {
            inner: None,
            callback: Rc::new(RefCell::new(None)),
            listeners: Vec::new(),
        }
    }

    fn bind(
        &mut self,
        window: &web_sys::Window,
        container: &HtmlElement,
        inner: &Rc<RefCell<Inner>>,
    ) -> Result<(), FieldError> {
        let target: &EventTarget = container.as_ref();

        let weak = Rc::downgrade(inner);
        self.listeners.push(Listener::attach(
            window.as_ref(),
            "resize",
            None,
            Closure::new(move |_: Event| with_inner(&weak, Inner::resize)),
        )?);

        let weak = Rc::downgrade(inner);
        self.listeners.push(Listener::attach(
            target,
            "mousemove",
            None,
            Closure::new(move |e: Event| {
                if let Some(e) = e.dyn_ref::<MouseEvent>() {
                    with_inner(&weak, |inner| inner.pointer_at(e.client_x(), e.client_y()));
                }
            }),
        )?);

        for event in ["touchstart", "touchmove"] {
            let weak = Rc::downgrade(inner);
            self.listeners.push(Listener::attach(
                target,
                event,
                Some(false),
                Closure::new(move |e: Event| {
                    e.prevent_default();
                    let touch = e.dyn_ref::<TouchEvent>().and_then(|t| t.touches().get(0));
                    if let Some(touch) = touch {
                        with_inner(&weak, |inner| inner.pointer_at(touch.client_x(), touch.client_y()));
                    }
                }),
            )?);
        }

        for event in ["mouseleave", "touchend"] {
            let weak = Rc::downgrade(inner);
            self.listeners.push(Listener::attach(
                target,
                event,
                None,
                Closure::new(move |_: Event| with_inner(&weak, |inner| inner.field.pointer_leave())),
            )?);
        }

        Ok(())
    }
}

impl Drop for CalligraphyCanvas {
    fn drop(&mut self) {
        self.unmount();
    }
}

// ============================================================================
// Host-driven handle
// ============================================================================

#[wasm_bindgen]
pub struct GlyphFieldHandle {
    field: GlyphField<CanvasRasterizer>,
    encoder: Encoder,
}

#[wasm_bindgen]
impl GlyphFieldHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(w: u32, h: u32, config_json: Option<String>) -> Result<GlyphFieldHandle, JsValue> {
        let config = parse_config(config_json)?;
        Ok(Self {
            field: GlyphField::new(w, h, config, CanvasRasterizer::new())?,
            encoder: Encoder::new(),
        })
    }

    pub fn tick(&mut self, now_ms: f64) {
        self.field.tick(now_ms, &mut self.encoder);
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.field.resize(w, h);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.field.pointer_move(x, y);
    }

    pub fn pointer_leave(&mut self) {
        self.field.pointer_leave();
    }

    /// Packed glyph instances, see `render::STRIDE`.
    pub fn instances(&self) -> Float32Array {
        Float32Array::from(self.encoder.as_slice())
    }

    /// Glyph strings, indexed by the instance glyph slot.
    pub fn glyphs(&self) -> Vec<String> {
        self.field.config().glyphs.clone()
    }

    // Accessors for zero-copy reads
    pub fn output_ptr(&self) -> *const f32 { self.encoder.ptr() }
    pub fn output_len(&self) -> usize { self.encoder.len() }
    pub fn count(&self) -> usize { self.encoder.count() }
    pub fn width(&self) -> u32 { self.field.width() }
    pub fn height(&self) -> u32 { self.field.height() }
}
