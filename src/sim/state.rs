//! Game state and core simulation types
//!
//! Everything a Fall Blocks match needs lives in `GameState`, which the loop
//! driver owns outright.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::history::{MatchHistory, MatchOutcome};
use crate::settings::{Settings, SettingsError};

/// The two sides that take turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Opponent => "Opponent",
        }
    }
}

/// A value tracked separately for each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub player: T,
    pub opponent: T,
}

impl<T> PerSide<T> {
    pub fn new(player: T, opponent: T) -> Self {
        Self { player, opponent }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }
}

/// Horizontal movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// The shared aiming/firing point at the bottom of the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launcher {
    pub x: f32,
    pub y: f32,
}

impl Launcher {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Move one step, clamped to `[min_x, max_x]`
    pub fn step(&mut self, direction: Direction, speed: f32, (min_x, max_x): (f32, f32)) {
        self.x = match direction {
            Direction::Left => (self.x - speed).max(min_x),
            Direction::Right => (self.x + speed).min(max_x),
        };
    }

    /// Spawn point for projectiles
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.x, self.y - MUZZLE_OFFSET)
    }
}

/// A projectile travelling straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(0.0, -speed),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(PROJECTILE_SIZE))
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Fully above the top edge
    pub fn is_off_field(&self) -> bool {
        self.rect().bottom() < 0.0
    }
}

/// A destructible block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Hits left; always >= 1 while the block is in the field
    pub resistance: u8,
    /// Cosmetic shake countdown (ticks)
    #[serde(default)]
    pub shake_ticks: u32,
}

impl Block {
    pub fn new(id: u32, pos: Vec2, resistance: u8) -> Self {
        Self {
            id,
            pos,
            resistance: resistance.max(MIN_RESISTANCE),
            shake_ticks: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(BLOCK_SIZE))
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Take one hit. Returns true when the block is destroyed.
    pub fn hit(&mut self) -> bool {
        self.resistance = self.resistance.saturating_sub(1);
        self.shake_ticks = BLOCK_SHAKE_TICKS;
        self.resistance == 0
    }

    pub fn is_destroyed(&self) -> bool {
        self.resistance == 0
    }

    pub fn decay_shake(&mut self) {
        self.shake_ticks = self.shake_ticks.saturating_sub(1);
    }
}

/// A collectible granting one extra projectile per volley
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
}

impl PowerUp {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self { id, pos }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(POWERUP_SIZE))
    }
}

/// Screen-level phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start command, history on display
    Title,
    /// Match in progress
    Playing,
    /// Result screen; returns to `Title` when the countdown ends
    MatchOver { outcome: MatchOutcome, ticks_left: u32 },
}

/// Phase within the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Turn owner may move and fire
    WaitingToFire,
    /// Volley in progress
    Firing { remaining: u32, cadence_ticks: u32 },
    /// Waiting for projectiles to clear and the turn delay to expire
    Resolving,
    /// Short pause before the wave shift and handover
    SwitchingTurn { ticks_left: u32 },
}

/// Notable things that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    MatchStarted,
    VolleyStarted { side: Side, count: u32 },
    ProjectileFired { side: Side },
    BlockHit { block_id: u32 },
    BlockDestroyed { block_id: u32, side: Side },
    PowerUpCollected { side: Side },
    PowerUpSpawned,
    WaveAdvanced { wave: u32 },
    TurnSwitched { to: Side },
    MatchEnded { outcome: MatchOutcome },
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub settings: Settings,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Current turn owner
    pub turn: Side,
    pub turn_phase: TurnPhase,
    pub launcher: Launcher,
    /// Volley size per side
    pub ammo: PerSide<u32>,
    /// Blocks destroyed per side
    pub score: PerSide<u32>,
    /// Ticks before the current turn may hand over
    pub turn_delay_ticks: u32,
    /// Ticks since the last timed power-up spawn
    pub powerup_timer: u32,
    /// Completed turns since a row was last added
    pub turns_since_row: u32,
    /// Waves applied this match
    pub wave_index: u32,
    /// Playing ticks this match
    pub time_ticks: u64,
    pub projectiles: Vec<Projectile>,
    pub blocks: Vec<Block>,
    pub powerups: Vec<PowerUp>,
    /// Outcomes of earlier matches, kept across resets
    pub history: MatchHistory,
    /// Events produced by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game (on the title screen) with default settings
    pub fn new(seed: u64) -> Self {
        let mut state = Self::blank(seed, Settings::default());
        state.reset_match();
        state
    }

    /// Create a new game with custom settings
    pub fn with_settings(seed: u64, settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut state = Self::blank(seed, settings);
        state.reset_match();
        Ok(state)
    }

    /// A state with no entities and an empty field; tests build scenarios on it
    pub fn empty(seed: u64) -> Self {
        let mut state = Self::blank(seed, Settings::default());
        state.phase = GamePhase::Playing;
        state
    }

    fn blank(seed: u64, settings: Settings) -> Self {
        let (min_x, max_x) = settings.launcher_bounds();
        let launcher = Launcher::new((min_x + max_x) / 2.0, settings.launcher_y());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Title,
            turn: Side::Opponent,
            turn_phase: TurnPhase::WaitingToFire,
            launcher,
            ammo: PerSide::new(settings.start_ammo, settings.start_ammo),
            score: PerSide::default(),
            turn_delay_ticks: settings.turn_delay_ticks,
            powerup_timer: 0,
            turns_since_row: 0,
            wave_index: 0,
            time_ticks: 0,
            projectiles: Vec::new(),
            blocks: Vec::new(),
            powerups: Vec::new(),
            history: MatchHistory::new(),
            events: Vec::new(),
            next_id: 1,
            settings,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear the field and deal a fresh opening layout; history survives
    pub fn reset_match(&mut self) {
        let (min_x, max_x) = self.settings.launcher_bounds();
        self.launcher = Launcher::new((min_x + max_x) / 2.0, self.settings.launcher_y());
        self.projectiles.clear();
        self.blocks.clear();
        self.powerups.clear();
        self.ammo = PerSide::new(self.settings.start_ammo, self.settings.start_ammo);
        self.score = PerSide::default();
        self.turn = Side::Opponent;
        self.turn_phase = TurnPhase::WaitingToFire;
        self.turn_delay_ticks = self.settings.turn_delay_ticks;
        self.powerup_timer = 0;
        self.turns_since_row = 0;
        self.wave_index = 0;
        self.time_ticks = 0;
        super::wave::generate_opening_field(self);
    }

    /// Leave the title screen and begin a match on the current field
    pub fn start_match(&mut self) {
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::MatchStarted);
        log::info!(
            "Match started: {} blocks, {} power-ups, {} to move",
            self.blocks.len(),
            self.powerups.len(),
            self.turn.label()
        );
    }

    /// Add a block with a fresh ID
    pub fn spawn_block(&mut self, pos: Vec2, resistance: u8) -> u32 {
        let id = self.next_entity_id();
        self.blocks.push(Block::new(id, pos, resistance));
        id
    }

    /// Add a power-up with a fresh ID
    pub fn spawn_powerup(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.powerups.push(PowerUp::new(id, pos));
        id
    }

    /// Release one projectile from the launcher
    pub fn spawn_projectile(&mut self) {
        let id = self.next_entity_id();
        let pos = self.launcher.muzzle();
        self.projectiles
            .push(Projectile::new(id, pos, self.settings.projectile_speed));
    }

    /// True while the turn owner may move and fire
    pub fn awaiting_fire(&self) -> bool {
        self.phase == GamePhase::Playing && self.turn_phase == TurnPhase::WaitingToFire
    }

    /// Volley size for the side currently holding the turn
    pub fn active_ammo(&self) -> u32 {
        *self.ammo.get(self.turn)
    }

    /// Lowest block bottom edge, if any blocks exist
    pub fn lowest_block_bottom(&self) -> Option<f32> {
        self.blocks
            .iter()
            .map(|b| b.rect().bottom())
            .fold(None, |acc: Option<f32>, y| Some(acc.map_or(y, |a| a.max(y))))
    }

    /// Ensure collections are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.projectiles.sort_by_key(|p| p.id);
        self.blocks.sort_by_key(|b| b.id);
        self.powerups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launcher_clamps_to_bounds() {
        let mut launcher = Launcher::new(51.0, 550.0);
        launcher.step(Direction::Left, 2.0, (50.0, 750.0));
        assert_eq!(launcher.x, 50.0);
        launcher.step(Direction::Left, 2.0, (50.0, 750.0));
        assert_eq!(launcher.x, 50.0);

        let mut launcher = Launcher::new(749.0, 550.0);
        launcher.step(Direction::Right, 2.0, (50.0, 750.0));
        assert_eq!(launcher.x, 750.0);
    }

    #[test]
    fn test_block_hit_counts_down() {
        let mut block = Block::new(1, Vec2::ZERO, 3);
        assert!(!block.hit());
        assert_eq!(block.resistance, 2);
        assert_eq!(block.shake_ticks, BLOCK_SHAKE_TICKS);
        assert!(!block.hit());
        assert!(block.hit());
        assert!(block.is_destroyed());
    }

    #[test]
    fn test_block_resistance_never_zero_on_creation() {
        let block = Block::new(1, Vec2::ZERO, 0);
        assert_eq!(block.resistance, 1);
    }

    #[test]
    fn test_projectile_leaves_field() {
        let mut p = Projectile::new(1, Vec2::new(400.0, 8.0), 10.0);
        assert!(!p.is_off_field());
        p.advance();
        assert_eq!(p.pos.y, -2.0);
        assert!(!p.is_off_field());
        p.advance();
        assert!(p.is_off_field());
    }

    #[test]
    fn test_new_state_on_title_with_opening_field() {
        let state = GameState::new(7);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.turn, Side::Opponent);
        assert_eq!(state.blocks.len(), (START_ROWS * START_COLUMNS) as usize);
        assert_eq!(state.powerups.len(), START_POWERUPS);
        assert_eq!(state.ammo, PerSide::new(START_AMMO, START_AMMO));
        assert_eq!(state.launcher.x, 400.0);
        assert_eq!(state.launcher.y, 550.0);
    }

    #[test]
    fn test_reset_keeps_history() {
        let mut state = GameState::new(7);
        state.history.record(MatchOutcome::Draw);
        state.score.player = 4;
        state.reset_match();
        assert_eq!(state.score.player, 0);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_with_settings_rejects_invalid() {
        let settings = Settings {
            launcher_speed: 0.0,
            ..Default::default()
        };
        assert!(GameState::with_settings(1, settings).is_err());
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Player.other(), Side::Opponent);
        assert_eq!(Side::Opponent.other(), Side::Player);
    }

    #[test]
    fn test_lowest_block_bottom() {
        let mut state = GameState::empty(1);
        assert_eq!(state.lowest_block_bottom(), None);
        state.spawn_block(Vec2::new(50.0, 100.0), 1);
        state.spawn_block(Vec2::new(85.0, 200.0), 1);
        assert_eq!(state.lowest_block_bottom(), Some(230.0));
    }
}
