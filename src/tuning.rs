//! Data-driven game balance
//!
//! [`Tuning`] mirrors every constant in [`crate::consts`] and carries the stage
//! pattern table. It is read once when an [`crate::Arena`] is built. Any subset
//! of keys can be supplied as JSON; missing keys keep their defaults.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One cell of a stage pattern grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Normal,
    Reinforced,
}

impl Cell {
    /// Parse a pattern cell code (`'0'`, `'1'`, `'2'`)
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '0' => Some(Cell::Empty),
            '1' => Some(Cell::Normal),
            '2' => Some(Cell::Reinforced),
            _ => None,
        }
    }

    /// Hit points of a brick placed in this cell (0 = no brick)
    pub fn hit_points(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Normal => 1,
            Cell::Reinforced => 2,
        }
    }
}

/// A declarative brick layout: rows of cell codes, top row first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePattern {
    pub name: String,
    pub rows: Vec<String>,
}

impl StagePattern {
    pub fn new(name: &str, rows: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Number of columns (width of the first row)
    pub fn columns(&self) -> usize {
        self.rows.first().map(|r| r.chars().count()).unwrap_or(0)
    }

    /// Iterate `(row, col, cell)` for every cell, skipping unknown codes
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.chars()
                .enumerate()
                .filter_map(move |(c, code)| Cell::from_code(code).map(|cell| (r, c, cell)))
        })
    }

    /// Number of bricks this pattern produces
    pub fn brick_count(&self) -> usize {
        self.cells().filter(|(_, _, cell)| *cell != Cell::Empty).count()
    }

    fn validate(&self) -> Result<(), TuningError> {
        let columns = self.columns();
        if self.rows.is_empty() || columns == 0 {
            return Err(TuningError::EmptyPattern {
                name: self.name.clone(),
            });
        }
        for (row, text) in self.rows.iter().enumerate() {
            if text.chars().count() != columns {
                return Err(TuningError::RaggedPattern {
                    name: self.name.clone(),
                    row,
                });
            }
            if let Some(code) = text.chars().find(|c| Cell::from_code(*c).is_none()) {
                return Err(TuningError::InvalidCell {
                    name: self.name.clone(),
                    row,
                    code,
                });
            }
        }
        if self.brick_count() == 0 {
            return Err(TuningError::NoBricks {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Built-in stage rotation
pub fn default_patterns() -> Vec<StagePattern> {
    vec![
        StagePattern::new(
            "rows",
            &["11111111", "11111111", "11111111", "11111111", "11111111"],
        ),
        StagePattern::new(
            "banded",
            &["22222222", "11111111", "11111111", "22222222", "11111111", "11111111"],
        ),
        StagePattern::new(
            "checker",
            &["10101010", "01010101", "20202020", "02020202", "10101010", "01010101"],
        ),
        StagePattern::new(
            "pyramid",
            &["00022000", "00211200", "02111120", "21111112", "11111111", "11111111"],
        ),
        StagePattern::new(
            "fortress",
            &[
                "22222222", "21111112", "21000012", "21000012", "21111112", "22222222", "11111111",
            ],
        ),
    ]
}

/// Configuration errors
///
/// Bad tuning is a programmer error at runtime ([`crate::Arena::new`] asserts
/// on it); these variants exist so loaders can report what was wrong.
#[derive(Debug)]
pub enum TuningError {
    /// Tuning file could not be read
    Io(std::io::Error),
    /// Tuning JSON was malformed
    Parse(serde_json::Error),
    /// No stage patterns configured
    EmptyPatterns,
    /// A pattern has no rows or zero columns
    EmptyPattern { name: String },
    /// A pattern row differs in width from the first row
    RaggedPattern { name: String, row: usize },
    /// A pattern contains an unknown cell code
    InvalidCell { name: String, row: usize, code: char },
    /// A pattern has only empty cells
    NoBricks { name: String },
    /// A dimension, speed or count must be strictly positive
    NonPositive { field: &'static str, value: f32 },
    /// A value is outside its allowed range
    OutOfRange {
        field: &'static str,
        value: f32,
        range: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "cannot read tuning file: {e}"),
            TuningError::Parse(e) => write!(f, "invalid tuning JSON: {e}"),
            TuningError::EmptyPatterns => write!(f, "no stage patterns configured"),
            TuningError::EmptyPattern { name } => {
                write!(f, "stage pattern '{name}' has no columns")
            }
            TuningError::RaggedPattern { name, row } => {
                write!(f, "stage pattern '{name}' row {row} has a different width")
            }
            TuningError::InvalidCell { name, row, code } => {
                write!(f, "stage pattern '{name}' row {row} has unknown cell code '{code}'")
            }
            TuningError::NoBricks { name } => write!(f, "stage pattern '{name}' has no bricks"),
            TuningError::NonPositive { field, value } => {
                write!(f, "{field} must be positive (got {value})")
            }
            TuningError::OutOfRange { field, value, range } => {
                write!(f, "{field} = {value} is outside {range}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Every initialization-time constant of the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_min_width: f32,
    pub paddle_shrink_per_stage: f32,
    pub paddle_height: f32,
    pub paddle_bottom_offset: f32,
    /// Discrete key speed (pixels/s)
    pub paddle_speed: f32,
    /// Exponential approach rate toward the pointer (1/s, <= 0 snaps)
    pub paddle_smoothing: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub ball_speed_per_stage: f32,
    pub ball_max_speed: f32,
    pub ball_stuck_lift: f32,
    /// Seconds of flight between speed increases
    pub speed_ramp_interval: f32,
    pub speed_ramp_step: f32,
    pub paddle_hit_speedup: f32,

    // === Angles (degrees) ===
    pub paddle_max_bounce_deg: f32,
    pub launch_max_deg: f32,
    pub min_angle_from_horizontal_deg: f32,
    /// 0 disables the near-vertical correction
    pub min_angle_from_vertical_deg: f32,
    /// Serve offset range as a fraction of the paddle half-width
    pub serve_jitter: f32,

    // === Run ===
    pub starting_lives: u8,
    pub score_brick_destroyed: u64,
    pub score_brick_damaged: u64,
    pub score_stage_clear: u64,
    pub max_frame_dt: f32,

    // === Brick grid ===
    pub brick_top: f32,
    pub brick_margin: f32,
    pub brick_height: f32,
    pub patterns: Vec<StagePattern>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_min_width: PADDLE_MIN_WIDTH,
            paddle_shrink_per_stage: PADDLE_SHRINK_PER_STAGE,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,
            paddle_speed: PADDLE_SPEED,
            paddle_smoothing: PADDLE_SMOOTHING,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_START_SPEED,
            ball_speed_per_stage: BALL_SPEED_PER_STAGE,
            ball_max_speed: BALL_MAX_SPEED,
            ball_stuck_lift: BALL_STUCK_LIFT,
            speed_ramp_interval: SPEED_RAMP_INTERVAL,
            speed_ramp_step: SPEED_RAMP_STEP,
            paddle_hit_speedup: PADDLE_HIT_SPEEDUP,

            paddle_max_bounce_deg: PADDLE_MAX_BOUNCE_DEG,
            launch_max_deg: LAUNCH_MAX_DEG,
            min_angle_from_horizontal_deg: MIN_ANGLE_FROM_HORIZONTAL_DEG,
            min_angle_from_vertical_deg: 0.0,
            serve_jitter: SERVE_JITTER,

            starting_lives: STARTING_LIVES,
            score_brick_destroyed: SCORE_BRICK_DESTROYED,
            score_brick_damaged: SCORE_BRICK_DAMAGED,
            score_stage_clear: SCORE_STAGE_CLEAR,
            max_frame_dt: MAX_FRAME_DT,

            brick_top: BRICK_TOP,
            brick_margin: BRICK_MARGIN,
            brick_height: BRICK_HEIGHT,
            patterns: default_patterns(),
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON (missing keys keep defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!(
            "Loaded tuning from {} ({} patterns)",
            path.display(),
            tuning.patterns.len()
        );
        Ok(tuning)
    }

    /// Paddle top edge (fixed for the whole run)
    pub fn paddle_y(&self) -> f32 {
        self.arena_height - self.paddle_bottom_offset
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("paddle_width", self.paddle_width),
            ("paddle_min_width", self.paddle_min_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("ball_max_speed", self.ball_max_speed),
            ("speed_ramp_interval", self.speed_ramp_interval),
            ("paddle_hit_speedup", self.paddle_hit_speedup),
            ("max_frame_dt", self.max_frame_dt),
            ("brick_height", self.brick_height),
            ("starting_lives", f32::from(self.starting_lives)),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        let non_negative = [
            ("paddle_shrink_per_stage", self.paddle_shrink_per_stage),
            ("ball_speed_per_stage", self.ball_speed_per_stage),
            ("speed_ramp_step", self.speed_ramp_step),
            ("ball_stuck_lift", self.ball_stuck_lift),
            ("brick_margin", self.brick_margin),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::OutOfRange {
                    field,
                    value,
                    range: "[0, inf)",
                });
            }
        }

        if self.paddle_min_width > self.paddle_width {
            return Err(TuningError::OutOfRange {
                field: "paddle_min_width",
                value: self.paddle_min_width,
                range: "(0, paddle_width]",
            });
        }
        if self.paddle_width > self.arena_width {
            return Err(TuningError::OutOfRange {
                field: "paddle_width",
                value: self.paddle_width,
                range: "(0, arena_width]",
            });
        }
        if self.ball_max_speed < self.ball_speed {
            return Err(TuningError::OutOfRange {
                field: "ball_max_speed",
                value: self.ball_max_speed,
                range: "[ball_speed, inf)",
            });
        }
        if self.paddle_y() + self.paddle_height > self.arena_height || self.paddle_y() <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "paddle_bottom_offset",
                value: self.paddle_bottom_offset,
                range: "[paddle_height, arena_height)",
            });
        }

        let angles = [
            ("paddle_max_bounce_deg", self.paddle_max_bounce_deg, 0.0, 89.0),
            ("launch_max_deg", self.launch_max_deg, 0.0, 89.0),
            ("min_angle_from_horizontal_deg", self.min_angle_from_horizontal_deg, 0.0, 45.0),
            ("min_angle_from_vertical_deg", self.min_angle_from_vertical_deg, 0.0, 45.0),
        ];
        for (field, value, lo, hi) in angles {
            if !(lo..=hi).contains(&value) {
                return Err(TuningError::OutOfRange {
                    field,
                    value,
                    range: "[0, 89] for bounce angles, [0, 45] for floors",
                });
            }
        }
        if !(0.0..=1.0).contains(&self.serve_jitter) {
            return Err(TuningError::OutOfRange {
                field: "serve_jitter",
                value: self.serve_jitter,
                range: "[0, 1]",
            });
        }

        if self.patterns.is_empty() {
            return Err(TuningError::EmptyPatterns);
        }
        for pattern in &self.patterns {
            pattern.validate()?;
            let columns = pattern.columns() as f32;
            let brick_w = (self.arena_width - self.brick_margin * (columns + 1.0)) / columns;
            if brick_w <= 0.0 {
                return Err(TuningError::OutOfRange {
                    field: "brick_margin",
                    value: self.brick_margin,
                    range: "small enough for every pattern to fit the arena width",
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.patterns.len(), 5);
    }

    #[test]
    fn test_pattern_cells() {
        let pattern = StagePattern::new("tiny", &["102", "010"]);
        assert_eq!(pattern.columns(), 3);
        assert_eq!(pattern.brick_count(), 3);
        let hp: Vec<u8> = pattern.cells().map(|(_, _, c)| c.hit_points()).collect();
        assert_eq!(hp, vec![1, 0, 2, 0, 1, 0]);
    }

    #[test]
    fn test_json_overrides_keep_defaults() {
        let tuning = Tuning::from_json(r#"{ "starting_lives": 5, "ball_speed": 300.0 }"#).unwrap();
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.ball_speed, 300.0);
        assert_eq!(tuning.arena_width, ARENA_WIDTH);
        assert_eq!(tuning.patterns.len(), default_patterns().len());
    }

    #[test]
    fn test_json_custom_patterns() {
        let json = r#"{ "patterns": [ { "name": "one", "rows": ["0110"] } ] }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.patterns.len(), 1);
        assert_eq!(tuning.patterns[0].brick_count(), 2);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_zero_column_pattern() {
        let mut tuning = Tuning::default();
        tuning.patterns = vec![StagePattern::new("blank", &[""])];
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::EmptyPattern { .. })
        ));
    }

    #[test]
    fn test_rejects_ragged_and_unknown_cells() {
        let mut tuning = Tuning::default();
        tuning.patterns = vec![StagePattern::new("ragged", &["111", "11"])];
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::RaggedPattern { row: 1, .. })
        ));

        tuning.patterns = vec![StagePattern::new("odd", &["1x1"])];
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::InvalidCell { code: 'x', .. })
        ));

        tuning.patterns = vec![StagePattern::new("void", &["000"])];
        assert!(matches!(tuning.validate(), Err(TuningError::NoBricks { .. })));

        tuning.patterns.clear();
        assert!(matches!(tuning.validate(), Err(TuningError::EmptyPatterns)));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let tuning = Tuning {
            starting_lives: 0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive { field: "starting_lives", .. })
        ));

        let tuning = Tuning {
            ball_max_speed: 10.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::OutOfRange { field: "ball_max_speed", .. })
        ));

        let tuning = Tuning {
            min_angle_from_horizontal_deg: 80.0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }
}
