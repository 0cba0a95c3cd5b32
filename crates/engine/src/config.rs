use serde::Deserialize;
use thiserror::Error;

use crate::app::{
    AnimationFrame, GridConfig, SpatialIndexError, SpawnConfig, SpriteType, SpriteTypeId, Viewport,
};
use crate::sprite_keys::{validate_sprite_key, SpriteKeyError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f32 },
    #[error("spawn.spawn_points must not be empty")]
    NoSpawnPoints,
    #[error("spawn.bot.min_cycles ({min}) must not exceed max_cycles ({max})")]
    InvalidCycleRange { min: u32, max: u32 },
    #[error("sprite_types[{index}] has invalid key {key:?}: {source}")]
    InvalidSpriteKey {
        index: usize,
        key: String,
        #[source]
        source: SpriteKeyError,
    },
    #[error("sprite_types[{index}] ({key}) has a zero texture dimension")]
    EmptyTexture { index: usize, key: String },
    #[error("{field} refers to sprite type {id}, but only {count} are declared")]
    UnknownSpriteType {
        field: &'static str,
        id: u32,
        count: usize,
    },
    #[error("invalid spatial grid: {0}")]
    Grid(#[from] SpatialIndexError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationDesc {
    pub state: String,
    pub frames: Vec<AnimationFrame>,
}

/// Sprite type as declared in configuration; registered in list order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpriteTypeDesc {
    pub key: String,
    pub texture_width: u32,
    pub texture_height: u32,
    #[serde(default)]
    pub animations: Vec<AnimationDesc>,
}

impl SpriteTypeDesc {
    pub fn to_sprite_type(&self) -> SpriteType {
        let mut sprite_type = SpriteType::new(&self.key, self.texture_width, self.texture_height);
        for animation in &self.animations {
            sprite_type.add_animation(&animation.state, animation.frames.iter().copied());
        }
        sprite_type
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub sprite_type: SpriteTypeId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub hit_points: i32,
    pub respawn_flicker_frames: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            sprite_type: SpriteTypeId(2),
            x: 320.0,
            y: 1350.0,
            z: 1.0,
            hit_points: 3,
            respawn_flicker_frames: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for the process-wide random source; drawn from entropy when unset.
    pub seed: Option<u64>,
    pub grid: GridConfig,
    pub spawn: SpawnConfig,
    pub player: PlayerConfig,
    pub sprite_types: Vec<SpriteTypeDesc>,
    pub viewport: Viewport,
    pub frames: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: None,
            grid: GridConfig::default(),
            spawn: SpawnConfig::default(),
            player: PlayerConfig::default(),
            sprite_types: default_sprite_types(),
            viewport: Viewport::default(),
            frames: 600,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.dimensions()?;
        check_probability("spawn.spawn_chance", self.spawn.spawn_chance)?;
        check_probability(
            "spawn.first_category_chance",
            self.spawn.first_category_chance,
        )?;
        if self.spawn.spawn_points.is_empty() {
            return Err(ConfigError::NoSpawnPoints);
        }
        let bot = &self.spawn.bot;
        if bot.min_cycles > bot.max_cycles {
            return Err(ConfigError::InvalidCycleRange {
                min: bot.min_cycles,
                max: bot.max_cycles,
            });
        }
        for (index, desc) in self.sprite_types.iter().enumerate() {
            validate_sprite_key(&desc.key).map_err(|source| ConfigError::InvalidSpriteKey {
                index,
                key: desc.key.clone(),
                source,
            })?;
            if desc.texture_width == 0 || desc.texture_height == 0 {
                return Err(ConfigError::EmptyTexture {
                    index,
                    key: desc.key.clone(),
                });
            }
        }
        let count = self.sprite_types.len();
        let references = [
            ("spawn.categories[0]", self.spawn.categories[0]),
            ("spawn.categories[1]", self.spawn.categories[1]),
            ("player.sprite_type", self.player.sprite_type),
        ];
        for (field, id) in references {
            if id.0 as usize >= count {
                return Err(ConfigError::UnknownSpriteType {
                    field,
                    id: id.0,
                    count,
                });
            }
        }
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

fn looping(first_image: u32, count: u32, duration_frames: u32) -> Vec<AnimationFrame> {
    (first_image..first_image + count)
        .map(|image_id| AnimationFrame {
            image_id,
            duration_frames,
        })
        .collect()
}

fn default_sprite_types() -> Vec<SpriteTypeDesc> {
    let bot = |key: &str, size: u32, first_image: u32| SpriteTypeDesc {
        key: key.to_string(),
        texture_width: size,
        texture_height: size,
        animations: vec![
            AnimationDesc {
                state: "JUMPING".to_string(),
                frames: looping(first_image, 4, 6),
            },
            AnimationDesc {
                state: "DYING".to_string(),
                frames: looping(first_image + 4, 3, 6),
            },
        ],
    };
    vec![
        bot("bots/health_small", 64, 0),
        bot("bots/health_large", 96, 8),
        SpriteTypeDesc {
            key: "player".to_string(),
            texture_width: 64,
            texture_height: 96,
            animations: vec![
                AnimationDesc {
                    state: "IDLE".to_string(),
                    frames: looping(16, 2, 10),
                },
                AnimationDesc {
                    state: "DEAD".to_string(),
                    frames: looping(18, 1, 1),
                },
            ],
        },
    ]
}
