//! Neon Swarm entry point
//!
//! In the browser this wires the DOM, input listeners, Web Audio and the
//! WebGPU renderer around a [`Session`]. Natively it runs a short scripted
//! session headlessly and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use neon_swarm::audio::{AudioManager, Mixer};
    use neon_swarm::clock::FrameClock;
    use neon_swarm::renderer::{DisplayList, RenderState, tessellate};
    use neon_swarm::sim::{HudSnapshot, InputSnapshot, Session, Viewport};
    use neon_swarm::ui::{Frontend, Panel, dispatch};
    use neon_swarm::Settings;

    /// HUD and overlay panels in the host page
    struct DomFrontend {
        document: Document,
    }

    impl DomFrontend {
        fn panel_id(panel: Panel) -> &'static str {
            match panel {
                Panel::Start => "start-screen",
                Panel::GameOver => "game-over-screen",
                Panel::LevelBanner => "level-screen",
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            let Some(el) = self.document.get_element_by_id(id) else {
                return;
            };
            let classes = el.class_list();
            if visible {
                let _ = classes.remove_1("hidden");
                let _ = classes.add_1("active");
            } else {
                let _ = classes.add_1("hidden");
                let _ = classes.remove_1("active");
            }
        }
    }

    impl Frontend for DomFrontend {
        fn set_hud(&mut self, hud: &HudSnapshot) {
            self.set_text("score", &hud.score.to_string());
            self.set_text("level", &hud.level.to_string());
            self.set_text("enemies-left", &hud.enemies_left.to_string());
            if let Some(el) = self.document.get_element_by_id("health-fill") {
                let _ = el.set_attribute("style", &format!("width: {}%", hud.health_percent));
            }
        }

        fn show_panel(&mut self, panel: Panel) {
            self.set_visible(Self::panel_id(panel), true);
        }

        fn hide_panel(&mut self, panel: Panel) {
            self.set_visible(Self::panel_id(panel), false);
        }

        fn set_level_title(&mut self, title: &str) {
            self.set_text("level-title", title);
        }

        fn set_final_score(&mut self, score: u64) {
            self.set_text("final-score", &score.to_string());
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputSnapshot,
        clock: FrameClock,
        display: DisplayList,
        render_state: Option<RenderState>,
        frontend: DomFrontend,
        audio: AudioManager,
        /// rAF timestamp of the latest frame
        now_ms: f64,
    }

    impl Game {
        fn start(&mut self) {
            self.audio.resume();
            self.session.start(self.now_ms);
            self.clock.start();
        }

        fn restart(&mut self) {
            self.audio.resume();
            self.session.restart(self.now_ms);
            self.clock.start();
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement, width: u32, height: u32) {
            canvas.set_width(width);
            canvas.set_height(height);
            self.session
                .resize(Viewport::new(width as f32, height as f32));
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }

        fn frame(&mut self, time: f64) {
            self.now_ms = time;
            self.session.tick_timers(time);

            if let Some(dt) = self.clock.tick(time) {
                self.session.update(dt, &self.input);
                self.render();
            }

            let events = self.session.drain_events();
            dispatch(events, &mut self.frontend, &mut self.audio);

            // The last frame stays on screen once the run is over
            if !self.session.running && self.clock.is_running() {
                self.clock.stop();
            }

            if self.session.settings.show_fps {
                self.frontend.set_text("fps", &self.clock.fps().to_string());
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            self.display.clear();
            self.session.draw(&mut self.display);
            let vertices = tessellate(&self.display);

            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = render_state.size;
                    render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn window_size(window: &web_sys::Window) -> (u32, u32) {
        let read = |v: Result<JsValue, JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(1.0) as u32
        };
        (read(window.inner_width()), read(window.inner_height()))
    }

    async fn init_renderer(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<RenderState, JsValue> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(js_err)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Neon Swarm starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .or_else(|| document.get_element_by_id("canvas"))
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::from_json_or_default(
            canvas.get_attribute("data-settings").as_deref(),
        );

        let (width, height) = window_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);

        let render_state = match init_renderer(&canvas, width, height).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("WebGPU unavailable, running without rendering: {:?}", e);
                None
            }
        };

        let audio = AudioManager::new(Mixer::from_settings(&settings));
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(Viewport::new(width as f32, height as f32), seed, settings),
            input: InputSnapshot::new(),
            clock: FrameClock::new(),
            display: DisplayList::new(),
            render_state,
            frontend: DomFrontend {
                document: document.clone(),
            },
            audio,
            now_ms: 0.0,
        }));

        setup_input_handlers(&window, game.clone());
        setup_window_handlers(&window, &canvas, game.clone());
        setup_buttons(&document, game.clone());

        request_animation_frame(game);

        log::info!("Neon Swarm running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.press(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.release(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse: the canvas fills the window, so client coords are viewport coords
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .input
                    .move_pointer(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.set_pointer_down(true);
            });
            let _ = window
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.set_pointer_down(false);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Resize
        {
            let game = game.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let (w, h) = window_size(&window);
                game.borrow_mut().resize(&canvas, w, h);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur drops key-up events; forget held input and optionally mute
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.input.release_all();
                if g.session.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let muted = g.session.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if !g.session.running {
                    g.start();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await.inspect_err(|e| {
        log::error!("Startup failed: {:?}", e);
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Swarm (native) starting...");
    log::info!("The playable build targets the browser; running a headless demo session");

    demo::run(0x5eed, 60.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot: stand still and shoot the nearest enemy
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use neon_swarm::audio::NullAudio;
    use neon_swarm::consts::REFERENCE_FRAME_MS;
    use neon_swarm::renderer::{DisplayList, tessellate};
    use neon_swarm::sim::{InputSnapshot, Session, Viewport};
    use neon_swarm::ui::{Panel, TextFrontend, dispatch};
    use neon_swarm::Settings;

    pub fn run(seed: u64, seconds: f64) {
        let mut session = Session::new(Viewport::new(800.0, 600.0), seed, Settings::default());
        let mut input = InputSnapshot::new();
        let mut frontend = TextFrontend::default();
        let mut audio = NullAudio;
        let mut display = DisplayList::new();
        let mut peak_vertices = 0;

        let frame_ms = f64::from(REFERENCE_FRAME_MS);
        let frames = (seconds * 1000.0 / frame_ms) as u64;
        session.start(0.0);

        for frame in 1..=frames {
            let now = frame as f64 * frame_ms;
            session.tick_timers(now);

            let player = session.player.center();
            let target = session
                .enemies
                .iter()
                .map(|e| e.pos + e.size / 2.0)
                .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)));
            match target {
                Some(t) => {
                    input.move_pointer(t.x, t.y);
                    input.set_pointer_down(true);
                }
                None => input.set_pointer_down(false),
            }

            session.update(REFERENCE_FRAME_MS, &input);

            display.clear();
            session.draw(&mut display);
            peak_vertices = peak_vertices.max(tessellate(&display).len());

            dispatch(session.drain_events(), &mut frontend, &mut audio);
            if frontend.is_visible(Panel::GameOver) {
                log::info!("Run ended after {:.1}s", now / 1000.0);
                break;
            }
        }

        if let Some(hud) = frontend.hud {
            log::info!(
                "Score {} | level {} | {} enemies left | health {:.0}%",
                hud.score,
                hud.level,
                hud.enemies_left,
                hud.health_percent
            );
        }
        log::info!("Peak vertices per frame: {peak_vertices}");
    }
}
