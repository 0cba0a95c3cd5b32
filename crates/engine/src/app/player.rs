use tracing::info;

use super::sprite::AnimatedSprite;
use super::sprite_type::SpriteType;

pub const PLAYER_IDLE_STATE: &str = "IDLE";
pub const PLAYER_DEAD_STATE: &str = "DEAD";
/// Frames per on/off phase of the respawn flicker.
pub const RESPAWN_FLICKER_PERIOD: u32 = 4;

#[derive(Debug, Clone)]
pub struct Player {
    sprite: AnimatedSprite,
    hit_points: i32,
    dead: bool,
    respawn_frames: u32,
    visible: bool,
}

impl Player {
    pub fn new(mut sprite: AnimatedSprite, hit_points: i32) -> Self {
        if sprite.current_state().is_empty() {
            sprite.set_current_state(PLAYER_IDLE_STATE);
        }
        Self {
            sprite,
            hit_points,
            dead: false,
            respawn_frames: 0,
            visible: true,
        }
    }

    pub fn sprite(&self) -> &AnimatedSprite {
        &self.sprite
    }

    pub fn sprite_mut(&mut self) -> &mut AnimatedSprite {
        &mut self.sprite
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn apply_damage(&mut self, amount: i32) {
        if self.respawn_frames > 0 {
            return;
        }
        self.hit_points = self.hit_points.saturating_sub(amount);
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Moves the player into the dead state the first frame its hit points
    /// run out.
    pub fn check_dead(&mut self) -> bool {
        if !self.dead && self.hit_points <= 0 {
            self.dead = true;
            self.sprite.physical_mut().set_velocity(0.0, 0.0);
            self.sprite.set_current_state(PLAYER_DEAD_STATE);
            info!(
                x = self.sprite.physical().x,
                y = self.sprite.physical().y,
                "player_died"
            );
        }
        self.dead
    }

    pub fn begin_respawn(&mut self, x: f32, y: f32, hit_points: i32, flicker_frames: u32) {
        self.dead = false;
        self.hit_points = hit_points;
        self.respawn_frames = flicker_frames;
        self.sprite.physical_mut().set_position(x, y);
        self.sprite.physical_mut().set_velocity(0.0, 0.0);
        self.sprite.set_current_state(PLAYER_IDLE_STATE);
        info!(x, y, flicker_frames, "player_respawned");
    }

    pub fn respawn_frames(&self) -> u32 {
        self.respawn_frames
    }

    pub fn update_sprite(&mut self, sprite_type: Option<&SpriteType>) {
        self.sprite.update_sprite(sprite_type);
        self.respawn_frames = self.respawn_frames.saturating_sub(1);
    }

    /// Evaluates and caches this frame's visibility.
    pub fn check_visible(&mut self) -> bool {
        let phase = self.respawn_frames / RESPAWN_FLICKER_PERIOD;
        self.visible = self.respawn_frames == 0 || phase.is_multiple_of(2);
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
