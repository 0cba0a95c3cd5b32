use tracing::{debug, info};

use crate::config::{ConfigError, WorldConfig};

use super::arena::BotHandle;
use super::physics::Physics;
use super::player::Player;
use super::random::{RandomSource, SeededRandom};
use super::rendering::{RenderList, Viewport};
use super::spatial::SpatialGrid;
use super::spawner::BotSpawner;
use super::sprite::AnimatedSprite;
use super::sprite_manager::SpriteManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub spawned: Option<BotHandle>,
    pub removed: Vec<BotHandle>,
    pub collision_candidates: usize,
    pub render_items: usize,
}

/// Drives one frame at a time: spawn, update, broad-phase collision, cull.
pub struct GameWorld {
    sprites: SpriteManager,
    spawner: BotSpawner,
    rng: Box<dyn RandomSource>,
    frame: u64,
}

impl GameWorld {
    pub fn new(sprites: SpriteManager, spawner: BotSpawner, rng: Box<dyn RandomSource>) -> Self {
        Self {
            sprites,
            spawner,
            rng,
            frame: 0,
        }
    }

    /// Validates `config`, registers its sprite types in order and seeds the
    /// random source once.
    pub fn from_config(config: &WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let spatial = SpatialGrid::new(config.grid)?;

        let player_config = &config.player;
        let mut player_sprite = AnimatedSprite::new(player_config.sprite_type);
        player_sprite
            .physical_mut()
            .set_position(player_config.x, player_config.y);
        player_sprite.physical_mut().z = player_config.z;
        let mut sprites = SpriteManager::new(
            Player::new(player_sprite, player_config.hit_points),
            spatial,
        );
        for desc in &config.sprite_types {
            sprites.add_sprite_type(desc.to_sprite_type());
        }
        if let Some(sprite_type) = sprites.sprite_type(player_config.sprite_type).cloned() {
            sprites
                .player_mut()
                .sprite_mut()
                .affix_tight_aabb(&sprite_type);
        }

        let rng = match config.seed {
            Some(seed) => SeededRandom::from_seed(seed),
            None => SeededRandom::from_entropy(),
        };
        info!(
            seed = rng.seed(),
            sprite_types = sprites.sprite_types().len(),
            regions = sprites.spatial_index().region_count(),
            "world_created"
        );
        Ok(Self::new(
            sprites,
            BotSpawner::new(config.spawn.clone()),
            Box::new(rng),
        ))
    }

    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn sprites(&self) -> &SpriteManager {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut SpriteManager {
        &mut self.sprites
    }

    /// Runs one frame to completion. `render_list` is cleared and refilled.
    pub fn tick(
        &mut self,
        physics: &mut dyn Physics,
        viewport: &Viewport,
        render_list: &mut RenderList,
    ) -> FrameReport {
        self.frame += 1;
        let spawned = self
            .spawner
            .generate_bots(&mut self.sprites, physics, self.rng.as_mut());
        let removed = self.sprites.update(self.frame, self.rng.as_mut());
        self.sprites.refresh_spatial_index();
        let collision_candidates = self.sprites.check_collision(physics);

        render_list.clear();
        let render_items = self
            .sprites
            .add_sprite_items_to_render_list(viewport, render_list);

        debug!(
            frame = self.frame,
            active = self.sprites.active_count(),
            dying = self.sprites.dying_count(),
            removed = removed.len(),
            collision_candidates,
            render_items,
            "frame_complete"
        );
        FrameReport {
            frame: self.frame,
            spawned,
            removed,
            collision_candidates,
            render_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::random::ScriptedRandom;
    use crate::app::sprite_type::SpriteTypeId;

    #[derive(Default)]
    struct RecordingPhysics {
        collidables: Vec<BotHandle>,
        collisions: Vec<BotHandle>,
    }

    impl Physics for RecordingPhysics {
        fn add_collidable(&mut self, bot: BotHandle) {
            self.collidables.push(bot);
        }

        fn add_bot_collision(&mut self, bot: BotHandle) {
            self.collisions.push(bot);
        }
    }

    fn config() -> WorldConfig {
        let mut config = WorldConfig {
            seed: Some(1),
            ..WorldConfig::default()
        };
        config.player.x = 60.0;
        config.player.y = 1340.0;
        config.viewport.set_position(0.0, 1000.0);
        config
    }

    #[test]
    fn from_config_registers_sprite_types_in_order() {
        let world = GameWorld::from_config(&config()).expect("world");
        let sprites = world.sprites();
        assert_eq!(sprites.sprite_types().len(), 3);
        assert_eq!(
            sprites.sprite_types().id_by_key("player"),
            Some(SpriteTypeId(2))
        );
        assert_eq!(sprites.player().sprite().physical().x, 60.0);
        assert!(sprites.player().sprite().has_bounding_volume());
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let mut config = config();
        config.grid.cell_size = -1.0;
        assert!(matches!(
            GameWorld::from_config(&config),
            Err(ConfigError::Grid(_))
        ));
    }

    #[test]
    fn tick_spawns_collides_and_renders_in_one_frame() {
        let rng = ScriptedRandom::new([0.0, 0.0], [0]);
        let mut world = GameWorld::from_config(&config())
            .expect("world")
            .with_random_source(Box::new(rng));
        let mut physics = RecordingPhysics::default();
        let mut list = RenderList::default();
        let viewport = config().viewport;

        let report = world.tick(&mut physics, &viewport, &mut list);

        let spawned = report.spawned.expect("spawned");
        assert_eq!(report.frame, 1);
        assert_eq!(physics.collidables, vec![spawned]);
        assert_eq!(physics.collisions, vec![spawned]);
        assert_eq!(report.collision_candidates, 1);
        assert_eq!(report.render_items, 2);
        assert_eq!(list.len(), 2);
        assert!(report.removed.is_empty());
    }

    #[test]
    fn killed_bot_is_gone_after_death_animation_frames() {
        let rng = ScriptedRandom::new([0.0, 0.0], [0]);
        let mut world = GameWorld::from_config(&config())
            .expect("world")
            .with_random_source(Box::new(rng));
        let mut physics = RecordingPhysics::default();
        let mut list = RenderList::default();
        let viewport = config().viewport;

        let spawned = world
            .tick(&mut physics, &viewport, &mut list)
            .spawned
            .expect("spawned");
        assert!(world.sprites_mut().kill_bot(spawned));

        let mut removed_at = None;
        for _ in 0..30 {
            let report = world.tick(&mut physics, &viewport, &mut list);
            if report.removed.contains(&spawned) {
                removed_at = Some(report.frame);
            }
        }
        assert_eq!(removed_at, Some(1 + crate::DEATH_ANIMATION_FRAMES as u64));
        assert!(world.sprites().bot(spawned).is_none());
    }

    #[test]
    fn render_list_is_rebuilt_each_frame() {
        let mut world = GameWorld::from_config(&config())
            .expect("world")
            .with_random_source(Box::new(ScriptedRandom::default()));
        let mut physics = RecordingPhysics::default();
        let mut list = RenderList::default();
        let viewport = config().viewport;

        world.tick(&mut physics, &viewport, &mut list);
        world.tick(&mut physics, &viewport, &mut list);
        assert_eq!(list.len(), 1);
        assert_eq!(world.frame(), 2);
    }
}
