pub mod app;
mod config;
mod sprite_keys;

pub use app::{
    cull_and_emit, round_px, AnimatedSprite, AnimationFrame, Bot, BotArena, BotBehavior, BotContext,
    BotHandle, BotSpawner, BoundingVolume, FrameReport, GameWorld, GridConfig, JumpingBotParams,
    LifeState, PhysicalProperties, Physics, Player, RandomJumpingBot, RandomSource, RegionId,
    RenderItem, RenderList, SeededRandom, SpatialGrid, SpatialIndexError, SpawnConfig,
    SpawnDecision, SpawnPoint, SpriteManager, SpriteType, SpriteTypeId, SpriteTypeRegistry,
    Viewport, DEATH_ANIMATION_FRAMES, DYING_STATE, JUMPING_STATE, OPAQUE_ALPHA, PLAYER_DEAD_STATE,
    PLAYER_IDLE_STATE, RESPAWN_FLICKER_PERIOD,
};
pub use config::{AnimationDesc, ConfigError, PlayerConfig, SpriteTypeDesc, WorldConfig};
pub use sprite_keys::SpriteKeyError;
