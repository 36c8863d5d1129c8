//! Fall Blocks entry point
//!
//! Sets up the terminal, shows the game-select menu and drives the chosen
//! game at a fixed tick rate. Logging goes to stderr; redirect it
//! (`RUST_LOG=debug fall-blocks 2>log.txt`) to keep the screen clean.

use std::io::{BufWriter, Write, stdout};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal,
};
use glam::Vec2;

use fall_blocks::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use fall_blocks::platform::{Command, FrameClock, KeyTracker};
use fall_blocks::pong::{self, PongState};
use fall_blocks::renderer::{self, Canvas};
use fall_blocks::sim::{self, GameState};
use fall_blocks::{MatchHistory, Pace, Settings};

/// Rows above the field reserved for the HUD
const HUD_ROWS: u16 = 1;
/// How often the menu redraws while waiting for a key
const MENU_POLL: Duration = Duration::from_millis(100);

enum MenuChoice {
    FallBlocks,
    Pong,
    Quit,
}

/// A game the frame loop can drive
trait Scene {
    fn step(&mut self, keys: &KeyTracker);
    fn draw(&self, canvas: &mut Canvas);
}

impl Scene for GameState {
    fn step(&mut self, keys: &KeyTracker) {
        sim::tick(self, &keys.fall_blocks_input());
    }

    fn draw(&self, canvas: &mut Canvas) {
        renderer::fall_blocks::draw(canvas, self);
    }
}

impl Scene for PongState {
    fn step(&mut self, keys: &KeyTracker) {
        pong::tick(self, &keys.pong_input());
    }

    fn draw(&self, canvas: &mut Canvas) {
        renderer::pong::draw(canvas, self);
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Fall Blocks starting");

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)
        .context("entering alternate screen")?;
    out.execute(cursor::Hide)?;

    // Key release events where the terminal supports them; others fall back
    // to the hold window
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the loop never waits on I/O
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal, even when the session failed
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Session ended with error: {e:#}");
    }
    log::info!("Fall Blocks exiting");
    result
}

fn run<W: Write>(out: &mut W, rx: &Receiver<Event>) -> Result<()> {
    let (cols, rows) = terminal::size().context("querying terminal size")?;
    let mut canvas = Canvas::new(cols, rows, HUD_ROWS, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT));
    let mut keys = KeyTracker::new();
    let mut clock = FrameClock::default();
    let mut pace = Pace::default();
    // Outlives individual games; dropped on exit
    let mut history = MatchHistory::new();

    loop {
        match menu(out, rx, &mut canvas, &mut keys, &mut pace, &history)? {
            MenuChoice::Quit => return Ok(()),
            MenuChoice::FallBlocks => {
                let settings = Settings::from_pace(pace);
                log::debug!("Settings: {}", serde_json::to_string(&settings)?);

                let mut state = GameState::with_settings(seed(), settings)?;
                state.history = std::mem::take(&mut history);
                let outcome = play(out, rx, &mut canvas, &mut keys, &mut clock, &mut state);
                history = std::mem::take(&mut state.history);
                outcome?;
            }
            MenuChoice::Pong => {
                let mut state = PongState::new(seed());
                play(out, rx, &mut canvas, &mut keys, &mut clock, &mut state)?;
                log::info!(
                    "Pong finished {}-{}",
                    state.score.player,
                    state.score.opponent
                );
            }
        }
    }
}

fn seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Apply window-level events and fold key events into the tracker
fn apply_event<W: Write>(
    out: &mut W,
    canvas: &mut Canvas,
    keys: &mut KeyTracker,
    event: &Event,
) -> Result<Option<Command>> {
    if let Event::Resize(cols, rows) = *event {
        canvas.resize(cols, rows);
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        log::debug!("Resized to {cols}x{rows}");
    }
    Ok(keys.handle(event))
}

fn menu<W: Write>(
    out: &mut W,
    rx: &Receiver<Event>,
    canvas: &mut Canvas,
    keys: &mut KeyTracker,
    pace: &mut Pace,
    history: &MatchHistory,
) -> Result<MenuChoice> {
    keys.clear();
    loop {
        renderer::menu::draw(canvas, *pace, history);
        renderer::present(out, canvas)?;

        let event = match rx.recv_timeout(MENU_POLL) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("Input reader stopped");
                return Ok(MenuChoice::Quit);
            }
        };

        match apply_event(out, canvas, keys, &event)? {
            Some(Command::Select(1)) => return Ok(MenuChoice::FallBlocks),
            Some(Command::Select(2)) => return Ok(MenuChoice::Pong),
            Some(Command::CyclePace) => {
                *pace = pace.next();
                log::info!("Pace set to {}", pace.as_str());
            }
            Some(Command::Quit) => return Ok(MenuChoice::Quit),
            _ => {}
        }
    }
}

/// Run a scene until the player asks to leave it
fn play<W: Write, S: Scene>(
    out: &mut W,
    rx: &Receiver<Event>,
    canvas: &mut Canvas,
    keys: &mut KeyTracker,
    clock: &mut FrameClock,
    scene: &mut S,
) -> Result<()> {
    // Time spent in the menu is not owed to the game
    clock.reset();
    keys.clear();
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    loop {
        let frame_start = Instant::now();

        loop {
            let event = match rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            };
            if apply_event(out, canvas, keys, &event)? == Some(Command::Quit) {
                return Ok(());
            }
        }

        for _ in 0..clock.advance(frame_start) {
            scene.step(keys);
            keys.clear_presses();
        }
        keys.end_frame();

        scene.draw(canvas);
        renderer::present(out, canvas)?;

        thread::sleep(clock.until_next(Instant::now()));
    }
}
