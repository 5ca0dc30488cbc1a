//! Session: screen flow, frame scheduling and HUD publication
//!
//! A session owns at most one [`GameState`] at a time. Control signals move
//! it between screens; each frame runs one simulation tick (while playing)
//! and renders the world plus the overlay for the current screen.

use serde::{Deserialize, Serialize};

use crate::renderer::{self, Surface};
use crate::settings::Settings;
use crate::sim::ships::ShipKind;
use crate::sim::state::{GamePhase, GameState};
use crate::sim::tick::{TickInput, tick, toggle_pause};

/// Frames in the FPS window
const FPS_WINDOW: usize = 60;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Menu,
    ShipSelect,
    Playing,
    Paused,
    GameOver,
}

/// Control signals from the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Leave the title menu
    Start,
    SelectShip(ShipKind),
    /// Step through the catalog on the ship select screen
    CycleShip(i32),
    /// Launch a run with the selected ship
    Confirm,
    TogglePause,
    /// New run, same ship, fresh seed
    Restart,
    /// Drop the run and return to the menu
    Reset,
}

/// Read-only telemetry for the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub ship: String,
    pub score: u64,
    pub hp: f32,
    pub max_hp: f32,
    pub charge_percent: f32,
    pub ability_active: bool,
    pub difficulty: u32,
    pub fps: u32,
    pub entity_count: usize,
    pub screen: Screen,
}

impl HudSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One scheduled frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Display timestamp in milliseconds
    pub timestamp_ms: f64,
    pub input: TickInput,
    /// Control signals to apply before the tick
    pub commands: Vec<SessionCommand>,
}

/// Supplies frames to [`Session::run`]. Returning `None` ends the loop.
pub trait FrameSource {
    fn next_frame(&mut self, session: &Session) -> Option<Frame>;
}

pub struct Session {
    settings: Settings,
    screen: Screen,
    selected: ShipKind,
    game: Option<GameState>,
    running: bool,
    runs: u64,
    // HUD publication
    hud: HudSnapshot,
    hud_revision: u64,
    ticks_since_hud: u32,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let mut session = Self {
            settings: settings.validated(),
            screen: Screen::Menu,
            selected: ShipKind::default(),
            game: None,
            running: true,
            runs: 0,
            hud: HudSnapshot {
                ship: String::new(),
                score: 0,
                hp: 0.0,
                max_hp: 0.0,
                charge_percent: 0.0,
                ability_active: false,
                difficulty: 1,
                fps: 0,
                entity_count: 0,
                screen: Screen::Menu,
            },
            hud_revision: 0,
            ticks_since_hud: 0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        };
        session.publish_hud();
        session
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_ship(&self) -> ShipKind {
        self.selected
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut GameState> {
        self.game.as_mut()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Last published HUD snapshot
    pub fn hud(&self) -> &HudSnapshot {
        &self.hud
    }

    /// Bumped on every publication
    pub fn hud_revision(&self) -> u64 {
        self.hud_revision
    }

    /// Apply a control signal
    pub fn handle(&mut self, command: SessionCommand) {
        if !self.running {
            return;
        }
        match (command, self.screen) {
            (SessionCommand::Start, Screen::Menu) => self.set_screen(Screen::ShipSelect),
            (SessionCommand::SelectShip(kind), Screen::Menu | Screen::ShipSelect) => {
                self.selected = kind;
            }
            (SessionCommand::CycleShip(step), Screen::ShipSelect) => {
                self.selected = self.selected.cycle(step);
            }
            (SessionCommand::Confirm, Screen::ShipSelect) => self.start_run(),
            (SessionCommand::TogglePause, Screen::Playing | Screen::Paused) => {
                if let Some(game) = self.game.as_mut() {
                    toggle_pause(game);
                }
                self.sync_screen();
            }
            (SessionCommand::Restart, Screen::Playing | Screen::Paused | Screen::GameOver) => {
                self.start_run();
            }
            (SessionCommand::Reset, _) => {
                self.game = None;
                self.set_screen(Screen::Menu);
            }
            (command, screen) => {
                log::debug!("Ignored {:?} on {:?}", command, screen);
            }
        }
    }

    fn next_seed(&mut self) -> u64 {
        let seed = match self.settings.seed {
            Some(seed) => seed.wrapping_add(self.runs),
            None => rand::random(),
        };
        self.runs += 1;
        seed
    }

    /// Build a fresh arena for the selected ship
    fn start_run(&mut self) {
        let seed = self.next_seed();
        self.game = Some(GameState::new(&self.settings, self.selected, seed));
        self.ticks_since_hud = 0;
        self.set_screen(Screen::Playing);
    }

    fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            log::info!("Screen {:?} -> {:?}", self.screen, screen);
            self.screen = screen;
            self.publish_hud();
        }
    }

    /// Follow the game phase after a tick or a pause toggle
    fn sync_screen(&mut self) {
        let Some(game) = &self.game else {
            return;
        };
        let screen = match game.phase {
            GamePhase::Playing => Screen::Playing,
            GamePhase::Paused => Screen::Paused,
            GamePhase::GameOver => Screen::GameOver,
        };
        self.set_screen(screen);
    }

    fn track_fps(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample in the window is the one we will overwrite next
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    fn publish_hud(&mut self) {
        let (ship, score, hp, max_hp, charge_percent, ability_active, difficulty, entity_count) =
            match &self.game {
                Some(game) => {
                    let player = game.player();
                    let state = game.player_state();
                    (
                        game.ship.name().to_string(),
                        game.final_score.unwrap_or(game.score),
                        player.map_or(0.0, |p| p.hp),
                        game.ship.config().max_hp,
                        state.map_or(0.0, |s| s.charge_percent()),
                        state.is_some_and(|s| s.is_active()),
                        game.difficulty(),
                        game.live_count(),
                    )
                }
                None => (self.selected.name().to_string(), 0, 0.0, 0.0, 0.0, false, 1, 0),
            };
        self.hud = HudSnapshot {
            ship,
            score,
            hp,
            max_hp,
            charge_percent,
            ability_active,
            difficulty,
            fps: self.fps,
            entity_count,
            screen: self.screen,
        };
        self.hud_revision += 1;
        self.ticks_since_hud = 0;
    }

    /// One display refresh: tick (when playing), render, publish.
    /// Returns false once the session has been stopped.
    pub fn frame(&mut self, now_ms: f64, input: &TickInput, surface: &mut impl Surface) -> bool {
        if !self.running {
            return false;
        }
        self.track_fps(now_ms);

        if matches!(self.screen, Screen::Playing | Screen::Paused) {
            if let Some(game) = self.game.as_mut() {
                tick(game, input);
            }
            self.sync_screen();
            self.ticks_since_hud += 1;
            if self.ticks_since_hud >= self.settings.hud_interval_ticks.max(1) {
                self.publish_hud();
            }
        }

        surface.begin_frame();
        if let Some(game) = &self.game {
            if self.screen != Screen::Menu && self.screen != Screen::ShipSelect {
                renderer::draw_world(game, surface);
            }
        }
        renderer::draw_screen(
            self.screen,
            self.selected,
            self.game.as_ref(),
            self.settings.play_area,
            surface,
        );
        if self.settings.show_fps && matches!(self.screen, Screen::Playing | Screen::Paused) {
            let entities = self.game.as_ref().map_or(0, |g| g.live_count());
            renderer::draw_telemetry(self.fps, entities, self.settings.play_area, surface);
        }
        true
    }

    /// Scheduler loop: pull frames until the source runs dry or the session
    /// is stopped
    pub fn run(&mut self, source: &mut impl FrameSource, surface: &mut impl Surface) -> u64 {
        let mut frames = 0;
        while self.running {
            let Some(frame) = source.next_frame(self) else {
                break;
            };
            for command in frame.commands {
                self.handle(command);
            }
            if self.frame(frame.timestamp_ms, &frame.input, surface) {
                frames += 1;
            }
        }
        log::info!("Scheduler finished after {} frames", frames);
        frames
    }

    /// Cancel scheduling and release the arena
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.game = None;
            log::info!("Session stopped");
        }
    }
}
