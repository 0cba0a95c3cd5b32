use std::collections::HashSet;

use scroller_engine::{BotHandle, Physics, SpriteManager};
use tracing::debug;

use super::bootstrap::DemoConfig;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolveReport {
    pub(crate) stomped: usize,
    pub(crate) player_hits: usize,
}

/// Minimal resolver for the headless demo: gravity, a ground line, and
/// exact AABB tests on the broad-phase pairs handed over each frame.
#[derive(Debug)]
pub(crate) struct DemoPhysics {
    gravity: f32,
    ground_y: f32,
    stomp_damage: i32,
    collidables: HashSet<BotHandle>,
    pending: Vec<BotHandle>,
}

impl DemoPhysics {
    pub(crate) fn new(config: &DemoConfig, ground_y: f32) -> Self {
        Self {
            gravity: config.gravity,
            ground_y,
            stomp_damage: config.stomp_damage,
            collidables: HashSet::new(),
            pending: Vec::new(),
        }
    }

    pub(crate) fn collidable_count(&self) -> usize {
        self.collidables.len()
    }

    /// A player landing on a bot from above kills it; other contact hurts the player.
    pub(crate) fn resolve(&mut self, sprites: &mut SpriteManager) -> ResolveReport {
        self.collidables.retain(|handle| sprites.is_active(*handle));

        let ground_y = self.ground_y;
        let gravity = self.gravity;
        let player_type = sprites.player().sprite().sprite_type();
        let player_height = sprites
            .sprite_type(player_type)
            .map_or(0.0, |sprite_type| sprite_type.texture_height() as f32);
        integrate(
            sprites.player_mut().sprite_mut().physical_mut(),
            gravity,
            ground_y - player_height,
        );
        let active = sprites.active_bots().to_vec();
        for handle in active {
            let height = sprites
                .bot(handle)
                .and_then(|bot| sprites.sprite_type(bot.sprite().sprite_type()))
                .map_or(0.0, |sprite_type| sprite_type.texture_height() as f32);
            if let Some(bot) = sprites.bot_mut(handle) {
                integrate(bot.sprite_mut().physical_mut(), gravity, ground_y - height);
                bot.sprite_mut().sync_bounding_volume();
            }
        }
        sprites.player_mut().sprite_mut().sync_bounding_volume();

        let mut report = ResolveReport::default();
        let player_box = *sprites.player().sprite().bounding_volume();
        for handle in std::mem::take(&mut self.pending) {
            let Some(bot) = sprites.bot(handle) else {
                continue;
            };
            let bot_box = *bot.sprite().bounding_volume();
            if !player_box.overlaps(&bot_box) {
                continue;
            }
            if player_box.center().1 < bot_box.top {
                if sprites.kill_bot(handle) {
                    report.stomped += 1;
                    debug!(bot = ?handle, "bot_stomped");
                }
            } else {
                sprites.player_mut().apply_damage(self.stomp_damage);
                report.player_hits += 1;
            }
        }
        report
    }
}

impl Physics for DemoPhysics {
    fn add_collidable(&mut self, bot: BotHandle) {
        self.collidables.insert(bot);
    }

    fn add_bot_collision(&mut self, bot: BotHandle) {
        if self.collidables.contains(&bot) {
            self.pending.push(bot);
        }
    }
}

fn integrate(physical: &mut scroller_engine::PhysicalProperties, gravity: f32, floor_y: f32) {
    physical.velocity_y += gravity;
    physical.x += physical.velocity_x;
    physical.y += physical.velocity_y;
    if physical.y >= floor_y {
        physical.y = floor_y;
        physical.velocity_y = 0.0;
        physical.velocity_x = 0.0;
    }
}
