use serde::Deserialize;
use tracing::{debug, warn};

use super::arena::BotHandle;
use super::bot::{Bot, JumpingBotParams, RandomJumpingBot, JUMPING_STATE};
use super::physics::Physics;
use super::random::RandomSource;
use super::sprite::{AnimatedSprite, OPAQUE_ALPHA};
use super::sprite_manager::SpriteManager;
use super::sprite_type::SpriteTypeId;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Chance per frame that a spawn is attempted.
    pub spawn_chance: f32,
    /// Given an attempt, chance that the first category is picked.
    pub first_category_chance: f32,
    pub categories: [SpriteTypeId; 2],
    pub spawn_points: Vec<SpawnPoint>,
    pub bot: JumpingBotParams,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.02,
            first_category_chance: 0.2,
            categories: [SpriteTypeId(0), SpriteTypeId(1)],
            spawn_points: vec![
                SpawnPoint { x: 80.0, y: 1350.0 },
                SpawnPoint {
                    x: 2800.0,
                    y: 100.0,
                },
                SpawnPoint {
                    x: 3072.0,
                    y: 1850.0,
                },
            ],
            bot: JumpingBotParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnDecision {
    pub category: SpriteTypeId,
    pub point_index: usize,
    pub point: SpawnPoint,
}

#[derive(Debug, Clone)]
pub struct BotSpawner {
    config: SpawnConfig,
}

impl BotSpawner {
    pub fn new(config: SpawnConfig) -> Self {
        Self { config }
    }

    /// Draws this frame's spawn outcome. The first draw gates the attempt;
    /// only then is the category drawn, followed by the spawn point.
    pub fn roll(&self, rng: &mut dyn RandomSource) -> Option<SpawnDecision> {
        if rng.next_unit() >= self.config.spawn_chance {
            return None;
        }
        let category = if rng.next_unit() < self.config.first_category_chance {
            self.config.categories[0]
        } else {
            self.config.categories[1]
        };
        let point_index = rng.next_index(self.config.spawn_points.len());
        let point = *self.config.spawn_points.get(point_index)?;
        Some(SpawnDecision {
            category,
            point_index,
            point,
        })
    }

    pub fn generate_bots(
        &self,
        manager: &mut SpriteManager,
        physics: &mut dyn Physics,
        rng: &mut dyn RandomSource,
    ) -> Option<BotHandle> {
        let decision = self.roll(rng)?;
        self.make_random_jumping_bot(manager, physics, decision.category, decision.point)
    }

    /// Nothing is spawned when `sprite_type` is unknown.
    pub fn make_random_jumping_bot(
        &self,
        manager: &mut SpriteManager,
        physics: &mut dyn Physics,
        sprite_type: SpriteTypeId,
        point: SpawnPoint,
    ) -> Option<BotHandle> {
        let Some(descriptor) = manager.sprite_type(sprite_type) else {
            warn!(
                sprite_type = sprite_type.0,
                "spawn_skipped_unknown_sprite_type"
            );
            return None;
        };
        let mut sprite = AnimatedSprite::new(sprite_type);
        sprite.physical_mut().set_position(point.x, point.y);
        sprite.set_current_state(JUMPING_STATE);
        sprite.set_alpha(OPAQUE_ALPHA);
        sprite.affix_tight_aabb(descriptor);

        let bot = Bot::new(sprite, Box::new(RandomJumpingBot::new(self.config.bot)));
        let handle = manager.add_bot(bot);
        physics.add_collidable(handle);
        debug!(
            bot = ?handle,
            sprite_type = sprite_type.0,
            x = point.x,
            y = point.y,
            "bot_spawned"
        );
        Some(handle)
    }
}
