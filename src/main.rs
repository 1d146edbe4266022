//! Calm Arcade entry point
//!
//! In the browser this wires DOM input to the active game and runs the
//! animation-frame loop. Natively it runs a short headless session that
//! exercises every game and prints text frames.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use calm_arcade::arcade::{ActiveGame, Arcade, RunEnded};
    use calm_arcade::assist::DailyQuestion;
    use calm_arcade::consts::*;
    use calm_arcade::persistence::{BrowserStore, CheckIn, Streak};
    use calm_arcade::platform::{self, GameChoice, InputEvent};
    use calm_arcade::renderer::{Canvas2dSink, Hud, Palette, RenderSink, scene_shapes};
    use calm_arcade::sim::FrameClock;
    use calm_arcade::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        arcade: Arcade,
        choice: GameChoice,
        settings: Settings,
        store: Option<BrowserStore>,
        high_scores: HighScores,
        sink: Canvas2dSink,
        palette: Palette,
        clock: FrameClock,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: f32,
        /// CSS pixels per playfield unit
        css_scale: f32,
    }

    impl Game {
        fn load_high_scores(store: Option<&BrowserStore>, choice: GameChoice) -> HighScores {
            match (store, choice.game_kind()) {
                (Some(store), Some(kind)) => HighScores::load(store, kind),
                _ => HighScores::new(),
            }
        }

        /// Swap to another mini-game, keeping the canvas and storage
        fn switch(&mut self, choice: GameChoice) {
            let seed = platform::now_ms() as u64;
            match Arcade::new(choice, seed, &self.settings) {
                Ok(arcade) => {
                    self.arcade = arcade;
                    self.choice = choice;
                    self.high_scores = Self::load_high_scores(self.store.as_ref(), choice);
                    self.clock.reset();
                }
                Err(e) => log::error!("Could not start {:?}: {}", choice, e),
            }
        }

        fn handle(&mut self, event: InputEvent) {
            if let Some(run) = self.arcade.handle(event) {
                self.record(run);
            }
        }

        /// Pointer press at CSS pixel offset within the canvas
        fn press(&mut self, x: f32, y: f32) {
            let event = match &self.arcade.game {
                ActiveGame::Memory(memory) => {
                    let scale = self.css_scale.max(f32::EPSILON);
                    match platform::tile_at(x / scale, y / scale, memory.tuning.grid_size) {
                        Some(tile) => InputEvent::Tap(tile),
                        None => InputEvent::Impulse,
                    }
                }
                _ => InputEvent::Impulse,
            };
            self.handle(event);
        }

        fn record(&mut self, run: RunEnded) {
            let rank = self.high_scores.add_score(run.score, platform::now_ms());
            log::info!("{:?} run ended with {} (rank {:?})", run.game, run.score, rank);
            if let Some(store) = self.store.as_mut() {
                if let Err(e) = self.high_scores.save(store, run.game) {
                    log::warn!("Could not save high scores: {e}");
                }
            }
        }

        fn frame(&mut self, time: f64) {
            let steps = self.clock.frame(time);
            if let Some(run) = self.arcade.update(steps) {
                self.record(run);
            }

            // Track frame times for FPS
            let oldest = self.frame_times[self.frame_index];
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();
            if oldest > 0.0 && time > oldest {
                self.fps = (self.frame_times.len() as f64 * 1000.0 / (time - oldest)) as f32;
            }

            let hud = Hud {
                score: self.arcade.score(),
                high_score: self
                    .settings
                    .show_high_score
                    .then(|| self.high_scores.top_score())
                    .flatten(),
                fps: self.settings.show_fps.then_some(self.fps),
                phase: self.arcade.phase(),
                reduced_motion: self.settings.reduced_motion,
            };
            let shapes = scene_shapes(&self.arcade.scene(), &hud, &self.palette);
            if let Err(e) = self.sink.render(&shapes) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Daily check-in card: streak counter plus the reflection question
    fn show_check_in(document: &Document, store: Option<&mut BrowserStore>) {
        if let Some(store) = store {
            let mut streak = Streak::load(&*store);
            let outcome = streak.check_in(platform::today());
            if outcome != CheckIn::AlreadyToday {
                if let Err(e) = streak.save(&mut *store) {
                    log::warn!("Could not save streak: {e}");
                }
            }
            log::info!("Check-in {:?}, streak {} (best {})", outcome, streak.current, streak.best);
            set_text(document, "streak-count", &streak.current.to_string());
            set_text(document, "streak-best", &streak.best.to_string());
        }
        // The browser build has no completion service binding; hosts that
        // provide one go through `DailyQuestion::fetch`
        set_text(document, "daily-question", &DailyQuestion::fallback().question);
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger unavailable: {e}").into());
        }

        log::info!("Calm Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width() as f32;
        let client_h = canvas.client_height() as f32;
        canvas.set_width((client_w as f64 * dpr) as u32);
        canvas.set_height((client_h as f64 * dpr) as u32);
        let css_scale = (client_w / PLAYFIELD_WIDTH).min(client_h / PLAYFIELD_HEIGHT);

        let mut store = match BrowserStore::open() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("Storage unavailable, progress will not persist: {e}");
                None
            }
        };
        let settings = match store.as_ref() {
            Some(store) => Settings::load(store),
            None => Settings::default(),
        };
        show_check_in(&document, store.as_mut());

        let choice = GameChoice::from_hash(&window.location().hash().unwrap_or_default());
        let seed = platform::now_ms() as u64;
        let arcade = Arcade::new(choice, seed, &settings).map_err(|e| e.to_string())?;

        let game = Rc::new(RefCell::new(Game {
            arcade,
            choice,
            high_scores: Game::load_high_scores(store.as_ref(), choice),
            palette: Palette::for_contrast(settings.high_contrast),
            settings,
            store,
            sink: Canvas2dSink::new(canvas.clone())?,
            clock: FrameClock::new(),
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0.0,
            css_scale,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&document, &canvas, game.clone());
        setup_restart_button(&document, game.clone());
        setup_hash_navigation(game.clone());

        request_animation_frame(game);

        log::info!("Calm Arcade running!");
        Ok(())
    }

    fn setup_input_handlers(document: &Document, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(input) = platform::map_key(&event.key()) {
                    // Keep space and arrows from scrolling the page
                    event.prevent_default();
                    game.borrow_mut().handle(input);
                }
            });
            let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .press(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().press(x, y);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
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

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().handle(InputEvent::Restart);
                log::info!("Game restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// `#maze`, `#snake`, ... pick the game without a reload
    fn setup_hash_navigation(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let choice = GameChoice::from_hash(&location.hash().unwrap_or_default());
            let mut g = game.borrow_mut();
            if choice != g.choice {
                g.switch(choice);
            }
        });
        let _ = window.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use calm_arcade::arcade::{ActiveGame, Arcade};
    use calm_arcade::assist::{AssistError, CompletionService, DailyQuestion};
    use calm_arcade::persistence::{MemoryStore, Streak};
    use calm_arcade::platform::{self, GameChoice, InputEvent};
    use calm_arcade::renderer::{Hud, Palette, RenderSink, TextSink, scene_shapes};
    use calm_arcade::sim::{Direction, FlightSession, GamePhase};
    use calm_arcade::{HighScores, Settings};

    /// No network in the headless runner
    struct Offline;

    impl CompletionService for Offline {
        fn complete(&self, _prompt: &str) -> Result<String, AssistError> {
            Err(AssistError::Service("offline".to_string()))
        }
    }

    /// Flap whenever the body sinks below the next gap's center
    fn autopilot(session: &FlightSession) -> bool {
        let t = &session.tuning;
        let left = session.body.left();
        let target = session
            .obstacles
            .iter()
            .filter(|o| o.trailing_edge(t.obstacle_width) >= left)
            .min_by(|a, b| a.x.total_cmp(&b.x))
            .map_or(t.floor_y() * 0.5, |o| o.gap_top + t.gap * 0.5);
        session.body.pos.y > target + 10.0 && session.body.vy > 0.0
    }

    fn print_frame(arcade: &Arcade, settings: &Settings, cols: usize, rows: usize) {
        let palette = Palette::for_contrast(settings.high_contrast);
        let hud = Hud {
            score: arcade.score(),
            high_score: None,
            fps: None,
            phase: arcade.phase(),
            reduced_motion: settings.reduced_motion,
        };
        let mut sink = TextSink::new(cols, rows, &palette);
        let Ok(()) = sink.render(&scene_shapes(&arcade.scene(), &hud, &palette));
        println!("{}", sink.output());
    }

    pub fn run() {
        let mut store = MemoryStore::new();
        let settings = Settings::load(&store);
        let seed = platform::now_ms() as u64;

        let mut streak = Streak::load(&store);
        let outcome = streak.check_in(platform::today());
        if let Err(e) = streak.save(&mut store) {
            log::warn!("Could not save streak: {e}");
        }
        println!("Check-in: {:?}, streak {} (best {})", outcome, streak.current, streak.best);
        println!("Today's question: {}\n", DailyQuestion::fetch(&Offline).question);

        // Flappy on autopilot for up to a minute of simulated time
        match Arcade::new(GameChoice::Flappy, seed, &settings) {
            Ok(mut arcade) => {
                let mut high_scores = HighScores::load(&store, calm_arcade::GameKind::Flappy);
                arcade.handle(InputEvent::Impulse);
                for _ in 0..3600 {
                    let flap = matches!(&arcade.game, ActiveGame::Flight { session, .. } if autopilot(session));
                    if flap {
                        arcade.handle(InputEvent::Impulse);
                    }
                    if let Some(run) = arcade.update(1) {
                        high_scores.add_score(run.score, platform::now_ms());
                        if let Err(e) = high_scores.save(&mut store, run.game) {
                            log::warn!("Could not save high scores: {e}");
                        }
                        break;
                    }
                }
                print_frame(&arcade, &settings, 48, 32);
                println!("Flappy autopilot: score {} ({:?})\n", arcade.score(), arcade.phase());
            }
            Err(e) => log::error!("Could not start flappy: {e}"),
        }

        // Maze walked along its solution
        match Arcade::new(GameChoice::Maze, seed, &settings) {
            Ok(mut arcade) => {
                let path = match &arcade.game {
                    ActiveGame::Maze(m) => m.maze.solve().unwrap_or_default(),
                    _ => Vec::new(),
                };
                print_frame(&arcade, &settings, settings.maze.width, settings.maze.width * 4 / 3);
                for pair in path.windows(2) {
                    let dir = Direction::ALL.into_iter().find(|d| {
                        let (dx, dy) = d.delta();
                        pair[0].0 as i64 + dx as i64 == pair[1].0 as i64
                            && pair[0].1 as i64 + dy as i64 == pair[1].1 as i64
                    });
                    if let Some(dir) = dir {
                        arcade.handle(InputEvent::Move(dir));
                    }
                }
                let solved = arcade.phase() == GamePhase::Over;
                println!("Maze solved: {} in {} moves\n", solved, arcade.score());
            }
            Err(e) => log::error!("Could not start maze: {e}"),
        }

        // Snake heading straight up into the wall
        match Arcade::new(GameChoice::Snake, seed, &settings) {
            Ok(mut arcade) => {
                arcade.handle(InputEvent::Impulse);
                let mut steps = 0;
                while arcade.phase() == GamePhase::Running && steps < 3600 {
                    arcade.update(1);
                    steps += 1;
                }
                print_frame(&arcade, &settings, 20, 27);
                println!("Snake: score {} after {} steps", arcade.score(), steps);
            }
            Err(e) => log::error!("Could not start snake: {e}"),
        }

        log::info!("Headless session done, {} keys stored", store.len());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Calm Arcade (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to play in the browser");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
