use std::fmt;

use serde::Deserialize;

use super::random::RandomSource;
use super::sprite::{AnimatedSprite, OPAQUE_ALPHA};

/// Frames a killed bot keeps animating before it is removed.
pub const DEATH_ANIMATION_FRAMES: u32 = 18;
pub const JUMPING_STATE: &str = "JUMPING";
pub const DYING_STATE: &str = "DYING";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LifeState {
    #[default]
    Alive,
    Dying {
        counter: u32,
    },
    Removed,
}

impl LifeState {
    pub fn death_counter(&self) -> Option<u32> {
        match self {
            Self::Dying { counter } => Some(*counter),
            Self::Alive | Self::Removed => None,
        }
    }

    pub fn death_animation_finished(&self) -> bool {
        matches!(self, Self::Dying { counter } if *counter >= DEATH_ANIMATION_FRAMES)
    }
}

pub struct BotContext<'a> {
    pub rng: &'a mut dyn RandomSource,
}

pub trait BotBehavior: fmt::Debug {
    /// Runs once per frame while the bot is active.
    fn think(&mut self, sprite: &mut AnimatedSprite, context: &mut BotContext<'_>);
}

#[derive(Debug)]
pub struct Bot {
    sprite: AnimatedSprite,
    behavior: Box<dyn BotBehavior>,
    life: LifeState,
}

impl Bot {
    pub fn new(sprite: AnimatedSprite, behavior: Box<dyn BotBehavior>) -> Self {
        Self {
            sprite,
            behavior,
            life: LifeState::Alive,
        }
    }

    pub fn sprite(&self) -> &AnimatedSprite {
        &self.sprite
    }

    pub fn sprite_mut(&mut self) -> &mut AnimatedSprite {
        &mut self.sprite
    }

    pub fn life_state(&self) -> LifeState {
        self.life
    }

    pub fn death_counter(&self) -> Option<u32> {
        self.life.death_counter()
    }

    pub(crate) fn think(&mut self, context: &mut BotContext<'_>) {
        self.behavior.think(&mut self.sprite, context);
    }

    pub(crate) fn begin_dying(&mut self) {
        self.life = LifeState::Dying { counter: 0 };
        self.sprite.physical_mut().set_velocity(0.0, 0.0);
        self.sprite.set_current_state(DYING_STATE);
    }

    /// Advances the death animation by one frame. Returns true once the
    /// animation has run its full length.
    pub(crate) fn kill(&mut self) -> bool {
        let LifeState::Dying { counter } = &mut self.life else {
            return false;
        };
        *counter = counter.saturating_add(1);
        let remaining = DEATH_ANIMATION_FRAMES.saturating_sub(*counter);
        self.sprite
            .set_alpha((OPAQUE_ALPHA as u32 * remaining / DEATH_ANIMATION_FRAMES) as u8);
        self.life.death_animation_finished()
    }

    pub(crate) fn mark_removed(&mut self) {
        self.life = LifeState::Removed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct JumpingBotParams {
    pub min_cycles: u32,
    pub max_cycles: u32,
    pub max_velocity: f32,
}

impl Default for JumpingBotParams {
    fn default() -> Self {
        Self {
            min_cycles: 30,
            max_cycles: 120,
            max_velocity: 40.0,
        }
    }
}

/// Waits a random number of frames, then jumps with a random velocity.
#[derive(Debug, Clone)]
pub struct RandomJumpingBot {
    params: JumpingBotParams,
    cycles_remaining: u32,
}

impl RandomJumpingBot {
    pub fn new(params: JumpingBotParams) -> Self {
        Self {
            params,
            cycles_remaining: params.min_cycles,
        }
    }

    pub fn cycles_remaining(&self) -> u32 {
        self.cycles_remaining
    }

    fn pick_cycles(&self, rng: &mut dyn RandomSource) -> u32 {
        let params = self.params;
        let span = params.max_cycles.saturating_sub(params.min_cycles) as usize;
        params.min_cycles + rng.next_index(span + 1) as u32
    }
}

impl BotBehavior for RandomJumpingBot {
    fn think(&mut self, sprite: &mut AnimatedSprite, context: &mut BotContext<'_>) {
        if self.cycles_remaining > 0 {
            self.cycles_remaining -= 1;
            return;
        }
        let max_velocity = self.params.max_velocity;
        let velocity_x = (context.rng.next_unit() * 2.0 - 1.0) * max_velocity;
        let velocity_y = -context.rng.next_unit() * max_velocity;
        sprite.physical_mut().set_velocity(velocity_x, velocity_y);
        sprite.set_current_state(JUMPING_STATE);
        self.cycles_remaining = self.pick_cycles(context.rng);
    }
}
