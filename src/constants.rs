// --- Global Simulation Constants ---
use crate::canvas::Color;

pub const WINDOW_WIDTH: u32 = 2100;
pub const WINDOW_HEIGHT: u32 = 1100;
// Top strip reserved for the per-worm score readouts; worms are clamped below it.
pub const SCORE_AREA_HEIGHT: f32 = 30.0;
pub const WALL_MARGIN: f32 = 5.0;
pub const FOOD_MARGIN: f32 = 10.0;

// --- Palette ---
pub const BACKGROUND_COLOR: Color = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
pub const RED: Color = [1.0, 0.0, 0.0, 1.0];
pub const GREEN: Color = [0.0, 1.0, 0.0, 1.0];
pub const ORANGE: Color = [1.0, 0.55, 0.0, 1.0];

// --- Food ---
pub const FOOD_STOCK_AMOUNT: usize = 10;
pub const BASE_FOOD_SIZE: f32 = 4.0;
// Poison pills are stocked this much larger than the base food size; the
// extent is the classifier, not a stored flag.
pub const POISON_SIZE_BONUS: f32 = 4.0;
// Ticks between full redraws of the pool (trails paint over uneaten food).
pub const FOOD_REFRESH_INTERVAL: u64 = 100;

// --- Worm behavior ---
pub const MIN_IQ: i32 = 1;
pub const TRANSCENDENCE_IQ: i32 = 200;
// A roll of 1..=IQ_ROLL_SIDES at or below the worm's IQ makes the step goal-directed.
pub const IQ_ROLL_SIDES: i32 = 200;
pub const STEP_RANGE: i32 = 3;
pub const POISON_PENALTY_MIN: i32 = -10;
pub const POISON_PENALTY_MAX: i32 = -5;

// --- Score text ---
pub const SCORE_TEXT_WIDTH: f32 = 150.0;
pub const SCORE_TEXT_HEIGHT: f32 = 20.0;
pub const SCORE_FONT_PX: f32 = 20.0;

// --- Explosion effect ---
pub const EXPLOSION_PASSES: usize = 20;
pub const EXPLOSION_PARTICLE_SIZE: f32 = 2.0;
// Particles revealed per tick; paces the burst without blocking the loop.
pub const EXPLOSION_REVEAL_PER_TICK: usize = 60;

// --- Driver pacing ---
pub const BASE_TICKS_PER_SEC: f64 = 500.0;
pub const INITIAL_SPEED_MULTIPLIER: f32 = 1.0;
pub const MIN_SPEED_MULTIPLIER: f32 = 0.0;
pub const MAX_SPEED_MULTIPLIER: f32 = 8.0;
pub const SPEED_ADJUST_FACTOR: f32 = 0.5;
pub const FPS_UPDATE_INTERVAL_SECS: f64 = 0.5;
