//! Game rules and tunables
//!
//! Every historical rule set of the game is one `GameConfig` value. Configs can
//! also be loaded from JSON and are validated before a run starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::ImpactBand;

/// Errors raised while loading or validating a config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config must contain at least one stage")]
    NoStages,
    #[error("stage at position {position} declares sequence index {found}")]
    StageOrder { position: usize, found: usize },
    #[error("stage {stage} has a target pass count of zero")]
    ZeroTarget { stage: usize },
    #[error("stage {stage} allows {max} concurrent couples (must be 1 to 3)")]
    Concurrency { stage: usize, max: usize },
    #[error("stage {stage}: {field} must be positive, got {value}")]
    NonPositiveStageValue {
        stage: usize,
        field: &'static str,
        value: f64,
    },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("impact band [{start}, {end}] is inverted")]
    InvertedBand { start: f32, end: f32 },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One difficulty stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Position in the stage list (0-based)
    pub sequence_index: usize,
    /// Couples to let pass before the stage is complete
    pub target_pass_count: u32,
    /// Time between spawn attempts (ms)
    pub spawn_interval_ms: f64,
    /// Maximum couples on the road at once (1-3)
    pub max_concurrent: usize,
    /// Forward units per tick
    pub obstacle_speed: f32,
    pub title: String,
    pub message: String,
}

impl Stage {
    pub fn new(
        sequence_index: usize,
        target_pass_count: u32,
        spawn_interval_ms: f64,
        max_concurrent: usize,
        obstacle_speed: f32,
        title: &str,
        message: &str,
    ) -> Self {
        Self {
            sequence_index,
            target_pass_count,
            spawn_interval_ms,
            max_concurrent,
            obstacle_speed,
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

/// Built-in rule sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    /// Single endless-feeling street, one couple at a time
    Classic,
    /// Three stages with a gentle anger curve
    #[default]
    Staged,
    /// Three fast stages where two bumps end the run
    Frantic,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Staged => "Staged",
            Variant::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "staged" | "default" => Some(Variant::Staged),
            "frantic" | "hard" => Some(Variant::Frantic),
            _ => None,
        }
    }

    /// Rules for this variant
    pub fn config(&self) -> GameConfig {
        match self {
            Variant::Classic => GameConfig {
                stages: vec![Stage::new(
                    0,
                    30,
                    2000.0,
                    1,
                    0.35,
                    "Christmas Eve",
                    "Dodge the couples!",
                )],
                anger_per_hit: 15.0,
                impact_band: ImpactBand::new(75.0, 85.0),
                show_intro: false,
                ..GameConfig::default()
            },
            Variant::Staged => GameConfig::default(),
            Variant::Frantic => GameConfig {
                stages: vec![
                    Stage::new(
                        0,
                        12,
                        1400.0,
                        1,
                        1.2,
                        "Stage 1: Rush Hour",
                        "They walk faster tonight.",
                    ),
                    Stage::new(
                        1,
                        18,
                        1100.0,
                        2,
                        1.6,
                        "Stage 2: Plaza",
                        "Pairs of pairs. Keep moving.",
                    ),
                    Stage::new(
                        2,
                        24,
                        900.0,
                        3,
                        2.0,
                        "Stage 3: Midnight Mass",
                        "Every lane is taken. Find the gap.",
                    ),
                ],
                anger_per_hit: 60.0,
                impact_band: ImpactBand::new(70.0, 82.0),
                ..GameConfig::default()
            },
        }
    }
}

/// Complete rule set for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Ordered stage list; finishing the last one clears the run
    pub stages: Vec<Stage>,
    /// Anger added per collision
    pub anger_per_hit: f32,
    /// Forward range that overlaps the player
    pub impact_band: ImpactBand,
    /// Couples beyond this forward position have passed
    pub exit_threshold: f32,
    /// Forward gap between couples of the same batch
    pub spawn_stagger: f32,
    /// How long the stage title stays up between stages (ms)
    pub stage_message_ms: f64,
    /// Start runs behind the intro overlay
    pub show_intro: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stages: vec![
                Stage::new(
                    0,
                    10,
                    2000.0,
                    1,
                    0.8,
                    "Stage 1: Christmas Eve",
                    "The first couples are out. Stay calm.",
                ),
                Stage::new(
                    1,
                    15,
                    1600.0,
                    2,
                    1.1,
                    "Stage 2: Shopping Street",
                    "They come two at a time now.",
                ),
                Stage::new(
                    2,
                    20,
                    1300.0,
                    3,
                    1.4,
                    "Stage 3: Light Festival",
                    "Three lanes, three couples. Almost there!",
                ),
            ],
            anger_per_hit: 5.0,
            impact_band: ImpactBand::new(70.0, 85.0),
            exit_threshold: 100.0,
            spawn_stagger: 20.0,
            stage_message_ms: 1500.0,
            show_intro: true,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn is_last_stage(&self, index: usize) -> bool {
        index + 1 >= self.stages.len()
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::NoStages);
        }

        for (position, stage) in self.stages.iter().enumerate() {
            if stage.sequence_index != position {
                return Err(ConfigError::StageOrder {
                    position,
                    found: stage.sequence_index,
                });
            }
            if stage.target_pass_count == 0 {
                return Err(ConfigError::ZeroTarget { stage: position });
            }
            if !(1..=3).contains(&stage.max_concurrent) {
                return Err(ConfigError::Concurrency {
                    stage: position,
                    max: stage.max_concurrent,
                });
            }
            if stage.obstacle_speed.partial_cmp(&0.0) != Some(std::cmp::Ordering::Greater) {
                return Err(ConfigError::NonPositiveStageValue {
                    stage: position,
                    field: "obstacle_speed",
                    value: stage.obstacle_speed as f64,
                });
            }
            if stage.spawn_interval_ms.partial_cmp(&0.0) != Some(std::cmp::Ordering::Greater) {
                return Err(ConfigError::NonPositiveStageValue {
                    stage: position,
                    field: "spawn_interval_ms",
                    value: stage.spawn_interval_ms,
                });
            }
        }

        if self.impact_band.start > self.impact_band.end {
            return Err(ConfigError::InvertedBand {
                start: self.impact_band.start,
                end: self.impact_band.end,
            });
        }

        let positives = [
            ("anger_per_hit", self.anger_per_hit as f64),
            ("exit_threshold", self.exit_threshold as f64),
        ];
        for (field, value) in positives {
            if value.partial_cmp(&0.0) != Some(std::cmp::Ordering::Greater) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_variants_are_valid() {
        for variant in [Variant::Classic, Variant::Staged, Variant::Frantic] {
            let config = variant.config();
            assert!(config.validate().is_ok(), "{} should validate", variant.as_str());
        }
    }

    #[test]
    fn test_variant_names_round_trip() {
        for variant in [Variant::Classic, Variant::Staged, Variant::Frantic] {
            assert_eq!(Variant::from_str(variant.as_str()), Some(variant));
        }
        assert_eq!(Variant::from_str("HARD"), Some(Variant::Frantic));
        assert_eq!(Variant::from_str("nope"), None);
    }

    #[test]
    fn test_historical_tunables() {
        let classic = Variant::Classic.config();
        assert_eq!(classic.anger_per_hit, 15.0);
        assert_eq!(classic.impact_band, ImpactBand::new(75.0, 85.0));

        let frantic = Variant::Frantic.config();
        assert_eq!(frantic.anger_per_hit, 60.0);
        assert_eq!(frantic.impact_band, ImpactBand::new(70.0, 82.0));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "anger_per_hit": 50.0 }"#).unwrap();
        assert_eq!(config.anger_per_hit, 50.0);
        assert_eq!(config.stages.len(), 3);
        assert_eq!(config.stage_message_ms, 1500.0);
    }

    #[test]
    fn test_json_round_trip_keeps_rules() {
        let config = Variant::Frantic.config();
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_configs() {
        let empty = GameConfig {
            stages: Vec::new(),
            ..GameConfig::default()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::NoStages)));

        let mut inverted = GameConfig::default();
        inverted.impact_band = ImpactBand::new(85.0, 70.0);
        assert!(matches!(inverted.validate(), Err(ConfigError::InvertedBand { .. })));

        let mut crowded = GameConfig::default();
        crowded.stages[1].max_concurrent = 4;
        assert!(matches!(
            crowded.validate(),
            Err(ConfigError::Concurrency { stage: 1, max: 4 })
        ));

        let mut shuffled = GameConfig::default();
        shuffled.stages.swap(0, 1);
        assert!(matches!(
            shuffled.validate(),
            Err(ConfigError::StageOrder { position: 0, found: 1 })
        ));

        let mut frozen = GameConfig::default();
        frozen.stages[0].obstacle_speed = 0.0;
        assert!(matches!(
            frozen.validate(),
            Err(ConfigError::NonPositiveStageValue { field: "obstacle_speed", .. })
        ));

        let mut harmless = GameConfig::default();
        harmless.anger_per_hit = 0.0;
        assert!(matches!(
            harmless.validate(),
            Err(ConfigError::NonPositive { field: "anger_per_hit", .. })
        ));

        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_last_stage() {
        let config = GameConfig::default();
        assert!(!config.is_last_stage(0));
        assert!(config.is_last_stage(2));
        assert!(config.stage(3).is_none());
    }
}
