// --- File: config.rs ---
use crate::canvas::Color;
use crate::constants::*;
use glam::Vec2;
use std::collections::HashSet;
use std::fmt;

/// Startup parameters for one worm. Everything here is read once at
/// agent-creation time; the simulation owns the live state afterwards.
#[derive(Debug, Clone)]
pub struct WormConfig {
    pub name: String,
    pub color: Color,
    pub size: f32,
    pub track_length: usize,
    pub iq: i32,
    pub score_anchor: Vec2,
}

impl Default for WormConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: WHITE,
            size: 2.0,
            track_length: 50,
            iq: 20,
            score_anchor: Vec2::new(200.0, 5.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub score_height: f32,
    pub food_stock_amount: usize,
    pub food_base_size: f32,
    pub food_color: Color,
    pub roster: Vec<WormConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena_width: WINDOW_WIDTH as f32,
            arena_height: WINDOW_HEIGHT as f32,
            score_height: SCORE_AREA_HEIGHT,
            food_stock_amount: FOOD_STOCK_AMOUNT,
            food_base_size: BASE_FOOD_SIZE,
            food_color: WHITE,
            roster: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Default three-worm roster.
    pub fn new() -> Self {
        let mut config = Self::default();

        config.roster = vec![
            WormConfig {
                name: "Old Yeller".into(),
                color: YELLOW,
                size: 4.0,
                iq: 50,
                score_anchor: Vec2::new(200.0, 5.0),
                ..Default::default()
            },
            WormConfig {
                name: "Riding Hood".into(),
                color: RED,
                size: 4.0,
                iq: 50,
                score_anchor: Vec2::new(400.0, 5.0),
                ..Default::default()
            },
            WormConfig {
                name: "Green Arrow".into(),
                color: GREEN,
                size: 4.0,
                iq: 50,
                score_anchor: Vec2::new(600.0, 5.0),
                ..Default::default()
            },
        ];

        config
    }

    /// Rejects setups that would misbehave once the loop is running. Called
    /// before the first tick; per-tick code assumes a valid config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        let mut seen = HashSet::new();
        for worm in &self.roster {
            if !seen.insert(worm.name.as_str()) {
                return Err(ConfigError::DuplicateWormName(worm.name.clone()));
            }
        }
        if self.arena_width <= 2.0 * FOOD_MARGIN
            || self.arena_height <= self.score_height + 2.0 * FOOD_MARGIN
        {
            return Err(ConfigError::ArenaTooSmall {
                width: self.arena_width,
                height: self.arena_height,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    DuplicateWormName(String),
    EmptyRoster,
    ArenaTooSmall { width: f32, height: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateWormName(name) => {
                write!(f, "duplicate worm name: {}", name)
            }
            ConfigError::EmptyRoster => write!(f, "no worms configured"),
            ConfigError::ArenaTooSmall { width, height } => {
                write!(f, "arena {}x{} is too small to play in", width, height)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
