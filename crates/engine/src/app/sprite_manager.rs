use std::collections::VecDeque;

use tracing::debug;

use super::arena::{BotArena, BotHandle};
use super::bot::{Bot, BotContext};
use super::physics::Physics;
use super::player::Player;
use super::random::RandomSource;
use super::rendering::{cull_and_emit, RenderList, Viewport};
use super::spatial::{RegionId, SpatialGrid};
use super::sprite_type::{SpriteType, SpriteTypeId, SpriteTypeRegistry};

/// A live bot is either active or queued in `dying`, never both.
#[derive(Debug)]
pub struct SpriteManager {
    sprite_types: SpriteTypeRegistry,
    player: Player,
    bots: BotArena,
    active: Vec<BotHandle>,
    dying: VecDeque<BotHandle>,
    spatial: SpatialGrid,
}

impl SpriteManager {
    pub fn new(player: Player, spatial: SpatialGrid) -> Self {
        Self {
            sprite_types: SpriteTypeRegistry::default(),
            player,
            bots: BotArena::default(),
            active: Vec::new(),
            dying: VecDeque::new(),
            spatial,
        }
    }

    pub fn add_sprite_type(&mut self, sprite_type: SpriteType) -> SpriteTypeId {
        self.sprite_types.add(sprite_type)
    }

    pub fn sprite_type(&self, id: SpriteTypeId) -> Option<&SpriteType> {
        self.sprite_types.get(id)
    }

    pub fn sprite_types(&self) -> &SpriteTypeRegistry {
        &self.sprite_types
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn add_bot(&mut self, bot: Bot) -> BotHandle {
        let (x, y) = bot.sprite().anchor();
        let handle = self.bots.insert(bot);
        self.active.push(handle);
        let region = self.spatial.insert(handle, x, y);
        debug!(bot = ?handle, region = region.0, "bot_added");
        handle
    }

    /// Moves an active bot into the dying queue. Bots that are not active,
    /// including ones already dying, are left alone.
    pub fn kill_bot(&mut self, handle: BotHandle) -> bool {
        let Some(position) = self.active.iter().position(|entry| *entry == handle) else {
            return false;
        };
        self.active.remove(position);
        self.spatial.remove(handle);
        if let Some(bot) = self.bots.get_mut(handle) {
            bot.begin_dying();
        }
        self.dying.push_back(handle);
        debug!(bot = ?handle, dying = self.dying.len(), "bot_killed");
        true
    }

    /// Runs one frame of behaviour and animation. Returns the bots whose
    /// death animation finished this frame; their handles are already stale.
    pub fn update(&mut self, frame: u64, rng: &mut dyn RandomSource) -> Vec<BotHandle> {
        self.player.check_dead();
        let player_type = self.sprite_types.get(self.player.sprite().sprite_type());
        self.player.update_sprite(player_type);

        let mut context = BotContext { rng };
        for &handle in &self.active {
            if let Some(bot) = self.bots.get_mut(handle) {
                bot.think(&mut context);
                let sprite_type = self.sprite_types.get(bot.sprite().sprite_type());
                bot.sprite_mut().update_sprite(sprite_type);
            }
        }

        let mut finished = 0;
        for &handle in &self.dying {
            if let Some(bot) = self.bots.get_mut(handle) {
                let sprite_type = self.sprite_types.get(bot.sprite().sprite_type());
                bot.sprite_mut().update_sprite(sprite_type);
                if bot.kill() {
                    finished += 1;
                }
            }
        }

        let mut removed = Vec::with_capacity(finished);
        for _ in 0..finished {
            let Some(handle) = self.dying.pop_front() else {
                break;
            };
            if let Some(mut bot) = self.bots.remove(handle) {
                debug_assert!(bot.life_state().death_animation_finished());
                bot.mark_removed();
            }
            debug!(frame, bot = ?handle, "bot_removed_after_death");
            removed.push(handle);
        }
        removed
    }

    pub fn remove_bot(&mut self, handle: BotHandle) -> Option<Bot> {
        let position = self.active.iter().position(|entry| *entry == handle)?;
        self.active.remove(position);
        self.release(handle)
    }

    pub fn remove_last_bot(&mut self) -> Option<Bot> {
        let handle = self.active.pop()?;
        self.release(handle)
    }

    fn release(&mut self, handle: BotHandle) -> Option<Bot> {
        self.spatial.remove(handle);
        let mut bot = self.bots.remove(handle)?;
        bot.mark_removed();
        debug!(bot = ?handle, "bot_removed");
        Some(bot)
    }

    pub fn bot(&self, handle: BotHandle) -> Option<&Bot> {
        self.bots.get(handle)
    }

    pub fn bot_mut(&mut self, handle: BotHandle) -> Option<&mut Bot> {
        self.bots.get_mut(handle)
    }

    pub fn active_bots(&self) -> &[BotHandle] {
        &self.active
    }

    pub fn dying_bots(&self) -> impl Iterator<Item = BotHandle> + '_ {
        self.dying.iter().copied()
    }

    pub fn is_active(&self, handle: BotHandle) -> bool {
        self.active.contains(&handle)
    }

    pub fn is_dying(&self, handle: BotHandle) -> bool {
        self.dying.contains(&handle)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn dying_count(&self) -> usize {
        self.dying.len()
    }

    pub fn spatial_index(&self) -> &SpatialGrid {
        &self.spatial
    }

    pub fn bots_in_region(&self, region: RegionId) -> &[BotHandle] {
        self.spatial.bots_in_region(region)
    }

    pub fn player_region(&self) -> RegionId {
        let (x, y) = self.player.sprite().anchor();
        self.spatial.region_at(x, y)
    }

    /// Re-buckets active bots after something outside the manager moved them.
    pub fn refresh_spatial_index(&mut self) {
        self.player.sprite_mut().sync_bounding_volume();
        let bots = &mut self.bots;
        let entries = self.active.iter().filter_map(|&handle| {
            let bot = bots.get_mut(handle)?;
            bot.sprite_mut().sync_bounding_volume();
            let (x, y) = bot.sprite().anchor();
            Some((handle, x, y))
        });
        self.spatial.rebuild(entries);
    }

    pub fn check_collision(&self, physics: &mut dyn Physics) -> usize {
        if self.player.is_dead() {
            return 0;
        }
        let candidates = self.bots_in_region(self.player_region());
        for &handle in candidates {
            physics.add_bot_collision(handle);
        }
        candidates.len()
    }

    pub fn add_sprite_items_to_render_list(
        &mut self,
        viewport: &Viewport,
        render_list: &mut RenderList,
    ) -> usize {
        self.player.check_visible();
        cull_and_emit(self, viewport, render_list)
    }

    pub fn clear_sprites(&mut self) {
        self.sprite_types.clear();
        self.unload_sprites();
    }

    pub fn unload_sprites(&mut self) {
        self.bots.clear();
        self.active.clear();
        self.dying.clear();
        self.spatial.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::bot::{
        JumpingBotParams, LifeState, RandomJumpingBot, DEATH_ANIMATION_FRAMES, DYING_STATE,
    };
    use crate::app::random::ScriptedRandom;
    use crate::app::spatial::GridConfig;
    use crate::app::sprite::AnimatedSprite;

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

    fn manager() -> SpriteManager {
        let spatial = SpatialGrid::new(GridConfig {
            world_width: 1000.0,
            world_height: 1000.0,
            cell_size: 100.0,
        })
        .expect("grid");
        let mut player_sprite = AnimatedSprite::new(SpriteTypeId(1));
        player_sprite.physical_mut().set_position(10.0, 10.0);
        let mut manager = SpriteManager::new(Player::new(player_sprite, 3), spatial);
        manager.add_sprite_type(SpriteType::new("bots/a", 20, 20));
        manager.add_sprite_type(SpriteType::new("player", 20, 20));
        manager
    }

    fn bot_at(manager: &SpriteManager, x: f32, y: f32) -> Bot {
        let mut sprite = AnimatedSprite::new(SpriteTypeId(0));
        sprite.physical_mut().set_position(x, y);
        sprite.affix_tight_aabb(manager.sprite_type(SpriteTypeId(0)).expect("type"));
        Bot::new(
            sprite,
            Box::new(RandomJumpingBot::new(JumpingBotParams {
                min_cycles: 1_000,
                max_cycles: 1_000,
                max_velocity: 0.0,
            })),
        )
    }

    fn step(manager: &mut SpriteManager, frame: u64) -> Vec<BotHandle> {
        let mut rng = ScriptedRandom::default();
        manager.update(frame, &mut rng)
    }

    fn assert_partitioned(manager: &SpriteManager, handles: &[BotHandle]) {
        for &handle in handles {
            let active = manager.is_active(handle);
            let dying = manager.is_dying(handle);
            let live = manager.bot(handle).is_some();
            assert!(!(active && dying), "bot {handle:?} in both populations");
            assert_eq!(live, active || dying, "bot {handle:?} live={live}");
        }
    }

    #[test]
    fn add_bot_inserts_into_active_and_index() {
        let mut manager = manager();
        let bot = bot_at(&manager, 10.0, 10.0);
        let handle = manager.add_bot(bot);

        assert_eq!(manager.active_bots(), &[handle]);
        assert_eq!(manager.bots_in_region(RegionId(0)), &[handle]);
        assert_eq!(
            manager.bot(handle).expect("bot").life_state(),
            LifeState::Alive
        );
    }

    #[test]
    fn kill_moves_bot_from_active_and_region_to_dying_tail() {
        let mut manager = manager();
        let first = manager.add_bot(bot_at(&manager, 10.0, 10.0));
        let target = manager.add_bot(bot_at(&manager, 20.0, 20.0));
        assert!(manager.kill_bot(first));
        let region = manager.spatial_index().region_of(target).expect("indexed");

        assert!(manager.kill_bot(target));

        assert!(manager.active_bots().is_empty());
        assert!(!manager.bots_in_region(region).contains(&target));
        assert_eq!(
            manager.dying_bots().collect::<Vec<_>>(),
            vec![first, target]
        );
        let bot = manager.bot(target).expect("still animating");
        assert_eq!(bot.death_counter(), Some(0));
        assert_eq!(bot.sprite().current_state(), DYING_STATE);
        assert_eq!(bot.sprite().bounding_volume().width, 20.0);
    }

    #[test]
    fn double_kill_is_idempotent() {
        let mut manager = manager();
        let handle = manager.add_bot(bot_at(&manager, 10.0, 10.0));
        assert!(manager.kill_bot(handle));
        assert!(!manager.kill_bot(handle));

        assert_eq!(manager.dying_count(), 1);
        assert_eq!(manager.bot(handle).expect("bot").death_counter(), Some(0));
    }

    #[test]
    fn dying_bot_is_removed_exactly_at_threshold() {
        let mut manager = manager();
        let handle = manager.add_bot(bot_at(&manager, 10.0, 10.0));
        manager.kill_bot(handle);

        let mut last_counter = 0;
        for frame in 1..DEATH_ANIMATION_FRAMES as u64 {
            let removed = step(&mut manager, frame);
            assert!(removed.is_empty(), "frame={frame}");
            let counter = manager
                .bot(handle)
                .and_then(Bot::death_counter)
                .expect("still dying");
            assert!(counter >= last_counter);
            last_counter = counter;
        }
        assert_eq!(last_counter, DEATH_ANIMATION_FRAMES - 1);

        let removed = step(&mut manager, DEATH_ANIMATION_FRAMES as u64);
        assert_eq!(removed, vec![handle]);
        assert_eq!(manager.dying_count(), 0);
        assert!(manager.bot(handle).is_none());
    }

    #[test]
    fn earlier_kills_leave_the_dying_queue_first() {
        let mut manager = manager();
        let a = manager.add_bot(bot_at(&manager, 10.0, 10.0));
        let b = manager.add_bot(bot_at(&manager, 30.0, 10.0));
        let c = manager.add_bot(bot_at(&manager, 50.0, 10.0));
        let handles = [a, b, c];

        manager.kill_bot(a);
        let mut removal_frame = std::collections::HashMap::new();
        for frame in 1..=40u64 {
            if frame == 3 {
                manager.kill_bot(b);
                manager.kill_bot(c);
            }
            for handle in step(&mut manager, frame) {
                removal_frame.insert(handle, frame);
            }
            assert_partitioned(&manager, &handles);
        }

        assert_eq!(removal_frame[&a], DEATH_ANIMATION_FRAMES as u64);
        assert_eq!(removal_frame[&b], 2 + DEATH_ANIMATION_FRAMES as u64);
        assert_eq!(removal_frame[&c], removal_frame[&b]);
        assert!(removal_frame[&a] <= removal_frame[&b]);
    }

    #[test]
    fn populations_stay_disjoint_through_lifecycle() {
        let mut manager = manager();
        let handles: Vec<_> = (0..5)
            .map(|i| manager.add_bot(bot_at(&manager, i as f32 * 40.0, 10.0)))
            .collect();
        assert_partitioned(&manager, &handles);

        manager.kill_bot(handles[1]);
        manager.kill_bot(handles[3]);
        assert_partitioned(&manager, &handles);

        for frame in 1..=DEATH_ANIMATION_FRAMES as u64 {
            step(&mut manager, frame);
            assert_partitioned(&manager, &handles);
        }
        assert_eq!(manager.active_count(), 3);
        assert_eq!(manager.dying_count(), 0);
    }

    #[test]
    fn remove_bot_by_handle_and_by_last_added() {
        let mut manager = manager();
        let first = manager.add_bot(bot_at(&manager, 10.0, 10.0));
        let second = manager.add_bot(bot_at(&manager, 30.0, 10.0));
        let third = manager.add_bot(bot_at(&manager, 50.0, 10.0));

        let removed = manager.remove_bot(first).expect("removed");
        assert_eq!(removed.life_state(), LifeState::Removed);
        assert!(manager.remove_bot(first).is_none());

        let last = manager.remove_last_bot().expect("last");
        assert_eq!(last.sprite().physical().x, 50.0);
        assert!(manager.bot(third).is_none());
        assert_eq!(manager.active_bots(), &[second]);
        assert_eq!(manager.spatial_index().len(), 1);
    }

    #[test]
    fn remove_from_empty_population_is_noop() {
        let mut manager = manager();
        assert!(manager.remove_last_bot().is_none());
    }

    #[test]
    fn remove_bot_ignores_dying_bots() {
        let mut manager = manager();
        let handle = manager.add_bot(bot_at(&manager, 10.0, 10.0));
        manager.kill_bot(handle);
        assert!(manager.remove_bot(handle).is_none());
        assert!(manager.is_dying(handle));
    }

    #[test]
    fn refresh_rebuckets_moved_bots() {
        let mut manager = manager();
        let handle = manager.add_bot(bot_at(&manager, 10.0, 10.0));
        manager
            .bot_mut(handle)
            .expect("bot")
            .sprite_mut()
            .physical_mut()
            .set_position(510.0, 10.0);
        assert_eq!(manager.spatial_index().region_of(handle), Some(RegionId(0)));

        manager.refresh_spatial_index();

        assert_eq!(manager.spatial_index().region_of(handle), Some(RegionId(5)));
        assert!(manager.bots_in_region(RegionId(0)).is_empty());
    }

    #[test]
    fn collision_candidates_come_from_player_region_only() {
        let mut manager = manager();
        let near = manager.add_bot(bot_at(&manager, 40.0, 40.0));
        let far = manager.add_bot(bot_at(&manager, 700.0, 700.0));
        let corpse = manager.add_bot(bot_at(&manager, 20.0, 20.0));
        manager.kill_bot(corpse);

        let mut physics = RecordingPhysics::default();
        let count = manager.check_collision(&mut physics);

        assert_eq!(count, 1);
        assert_eq!(physics.collisions, vec![near]);
        assert!(!physics.collisions.contains(&far));
        assert!(physics.collidables.is_empty());
    }

    #[test]
    fn dead_player_produces_no_candidates() {
        let mut manager = manager();
        manager.add_bot(bot_at(&manager, 40.0, 40.0));
        manager.player_mut().apply_damage(10);
        step(&mut manager, 1);

        let mut physics = RecordingPhysics::default();
        assert_eq!(manager.check_collision(&mut physics), 0);
    }

    #[test]
    fn unload_keeps_types_and_clear_drops_them() {
        let mut manager = manager();
        let handle = manager.add_bot(bot_at(&manager, 10.0, 10.0));
        manager.unload_sprites();
        assert!(manager.bot(handle).is_none());
        assert!(manager.spatial_index().is_empty());
        assert_eq!(manager.sprite_types().len(), 2);

        manager.clear_sprites();
        assert!(manager.sprite_types().is_empty());
        assert!(manager.sprite_type(SpriteTypeId(0)).is_none());
    }
}
