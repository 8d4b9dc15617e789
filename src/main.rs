//! Retro FX entry point
//!
//! Mounts the effects over the page in the browser and runs the frame loop.
//! The native build runs a short headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, MouseEvent};

    use retro_fx::consts::*;
    use retro_fx::renderer::RenderState;
    use retro_fx::{FxSettings, FxStage};

    /// Mounted effects plus the GPU surface, once available
    struct App {
        stage: FxStage,
        render_state: Option<RenderState>,
        dpr: f64,
        mounted: bool,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            if let Some(route) = self.stage.frame(time) {
                apply_route(&route);
            }
            self.render();
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.stage.canvas()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Canvas in CSS pixels, surface in device pixels
        fn resize(&mut self, css_w: u32, css_h: u32) {
            self.stage.resize(css_w, css_h);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(
                    (css_w as f64 * self.dpr) as u32,
                    (css_h as f64 * self.dpr) as u32,
                );
            }
        }

        fn navigate(&mut self, route: &str) {
            if let Some(route) = self.stage.navigate(route) {
                apply_route(&route);
            }
        }

        fn unmount(&mut self) {
            if !self.mounted {
                return;
            }
            self.mounted = false;
            if let Some(route) = self.stage.teardown() {
                apply_route(&route);
            }
        }
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    /// Push the released route into history and expose it to page styles
    fn apply_route(route: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(route));
        }
        if let Some(root) = window.document().and_then(|d| d.document_element()) {
            let _ = root.set_attribute("data-route", route);
        }
        log::info!("Route: {}", route);
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Retro FX starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window, effects disabled");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document, effects disabled");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::warn!("No #{} canvas, effects disabled", CANVAS_ID);
            return;
        };

        // Canvas size
        let dpr = window.device_pixel_ratio();
        let css_w = canvas.client_width().max(0) as u32;
        let css_h = canvas.client_height().max(0) as u32;
        let width = (css_w as f64 * dpr) as u32;
        let height = (css_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = FxSettings::load();
        let route = window.location().pathname().unwrap_or_else(|_| "/".into());
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            stage: FxStage::new(&settings, &route, css_w, css_h, seed),
            render_state: None,
            dpr,
            mounted: true,
        }));
        log::info!("Effects mounted on {} with seed: {}", route, seed);

        // Input works before the GPU is up; frames just don't show
        setup_click_handler(app.clone());
        setup_resize_handler(&canvas, app.clone());
        setup_timer_tick(app.clone());
        setup_unmount(app.clone());

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        match create_render_state(&instance, &canvas, width, height).await {
            Some(render_state) => app.borrow_mut().render_state = Some(render_state),
            None => log::warn!("No GPU surface, effects run without drawing"),
        }

        request_animation_frame(app);
        log::info!("Retro FX running!");
    }

    async fn create_render_state(
        instance: &wgpu::Instance,
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Option<RenderState> {
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| log::warn!("Failed to create surface: {}", e))
            .ok()?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| log::warn!("Failed to get adapter: {}", e))
            .ok()?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| log::warn!("Failed to create device: {}", e))
            .ok()
    }

    /// Clicks on `[data-nav]` links navigate; every other click bursts
    fn setup_click_handler(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let selector = format!("[{}]", NAV_ATTRIBUTE);
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let link = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&selector).ok().flatten());

            let mut a = app.borrow_mut();
            if let Some(link) = link {
                if let Some(route) = link.get_attribute(NAV_ATTRIBUTE) {
                    event.prevent_default();
                    a.navigate(&route);
                    return;
                }
            }
            if let Err(e) = a.stage.click(event.client_x() as f32, event.client_y() as f32) {
                log::warn!("Burst skipped: {}", e);
            }
        });
        let _ = window.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            let css_w = canvas.client_width().max(0) as u32;
            let css_h = canvas.client_height().max(0) as u32;
            canvas.set_width((css_w as f64 * a.dpr) as u32);
            canvas.set_height((css_h as f64 * a.dpr) as u32);
            a.resize(css_w, css_h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Keeps the failsafe and navigation fallback running when frames stall
    fn setup_timer_tick(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut a = app.borrow_mut();
            if !a.mounted {
                return;
            }
            if let Some(route) = a.stage.tick_timers(now()) {
                apply_route(&route);
            }
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TIMER_TICK_MS,
        );
        closure.forget();
    }

    fn setup_unmount(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().unmount();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            if !a.mounted {
                return;
            }
            a.frame(time);
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Retro FX (native) starting...");
    log::info!("Native mode runs headless - build for wasm32 to see the effects");

    println!("\nRunning headless demo...");
    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use retro_fx::burst::REFERENCE_FRAME_MS;
    use retro_fx::{FxSettings, FxStage};

    let settings = FxSettings::load();
    let mut stage = FxStage::new(&settings, "/", 1280, 720, 7);

    match stage.click(640.0, 360.0) {
        Ok(n) => println!("Burst spawned {} particles", n),
        Err(e) => println!("Burst failed: {}", e),
    }
    stage.navigate("/projects");

    let mut now = 0.0;
    let mut peak_vertices = 0;
    for frame in 0..120 {
        if let Some(route) = stage.frame(now) {
            println!("Frame {}: navigated to {}", frame, route);
        }
        peak_vertices = peak_vertices.max(stage.canvas().vertices().len());
        now += REFERENCE_FRAME_MS as f64;
    }

    let stats = stage.transition().stats();
    println!(
        "Transitions: {} started, {} completed, {} by failsafe",
        stats.started, stats.completed, stats.failsafe
    );
    println!("Peak vertices per frame: {}", peak_vertices);
    println!("Particles left: {}", stage.field().len());
}
