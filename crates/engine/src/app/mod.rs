mod arena;
mod bot;
mod physics;
mod player;
mod random;
mod rendering;
mod spatial;
mod spawner;
mod sprite;
mod sprite_manager;
mod sprite_type;
mod world;

pub use arena::{BotArena, BotHandle};
pub use bot::{
    Bot, BotBehavior, BotContext, JumpingBotParams, LifeState, RandomJumpingBot,
    DEATH_ANIMATION_FRAMES, DYING_STATE, JUMPING_STATE,
};
pub use physics::Physics;
pub use player::{Player, PLAYER_DEAD_STATE, PLAYER_IDLE_STATE, RESPAWN_FLICKER_PERIOD};
pub use random::{RandomSource, SeededRandom};
pub use rendering::{cull_and_emit, round_px, RenderItem, RenderList, Viewport};
pub use spatial::{GridConfig, RegionId, SpatialGrid, SpatialIndexError};
pub use spawner::{BotSpawner, SpawnConfig, SpawnDecision, SpawnPoint};
pub use sprite::{AnimatedSprite, BoundingVolume, PhysicalProperties, OPAQUE_ALPHA};
pub use sprite_manager::SpriteManager;
pub use sprite_type::{AnimationFrame, SpriteType, SpriteTypeId, SpriteTypeRegistry};
pub use world::{FrameReport, GameWorld};
