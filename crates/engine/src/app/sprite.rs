use super::sprite_type::{SpriteType, SpriteTypeId};

pub const OPAQUE_ALPHA: u8 = 255;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicalProperties {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
}

impl PhysicalProperties {
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_velocity(&mut self, velocity_x: f32, velocity_y: f32) {
        self.velocity_x = velocity_x;
        self.velocity_y = velocity_y;
    }
}

/// Axis-aligned box in world space; `left`/`top` is the minimum corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingVolume {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingVolume {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    pub fn overlaps(&self, other: &BoundingVolume) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.top <= other.bottom()
            && other.top <= self.bottom()
    }
}

#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    sprite_type: SpriteTypeId,
    current_state: String,
    frame_index: usize,
    frame_countdown: u32,
    alpha: u8,
    physical: PhysicalProperties,
    aabb_extent: Option<(f32, f32)>,
    bounding_volume: BoundingVolume,
}

impl AnimatedSprite {
    pub fn new(sprite_type: SpriteTypeId) -> Self {
        Self {
            sprite_type,
            current_state: String::new(),
            frame_index: 0,
            frame_countdown: 0,
            alpha: OPAQUE_ALPHA,
            physical: PhysicalProperties::default(),
            aabb_extent: None,
            bounding_volume: BoundingVolume::default(),
        }
    }

    pub fn sprite_type(&self) -> SpriteTypeId {
        self.sprite_type
    }

    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    /// Switching to a different state restarts its animation sequence.
    pub fn set_current_state(&mut self, state: &str) {
        if self.current_state == state {
            return;
        }
        self.current_state.clear();
        self.current_state.push_str(state);
        self.restart_sequence();
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn physical(&self) -> &PhysicalProperties {
        &self.physical
    }

    pub fn physical_mut(&mut self) -> &mut PhysicalProperties {
        &mut self.physical
    }

    /// Sizes the bounding volume to the sprite type's texture and keeps it
    /// attached to the sprite's position from then on.
    pub fn affix_tight_aabb(&mut self, sprite_type: &SpriteType) {
        self.aabb_extent = Some((
            sprite_type.texture_width() as f32,
            sprite_type.texture_height() as f32,
        ));
        self.sync_bounding_volume();
    }

    pub fn has_bounding_volume(&self) -> bool {
        self.aabb_extent.is_some()
    }

    pub fn bounding_volume(&self) -> &BoundingVolume {
        &self.bounding_volume
    }

    pub fn sync_bounding_volume(&mut self) {
        if let Some((width, height)) = self.aabb_extent {
            self.bounding_volume = BoundingVolume {
                left: self.physical.x,
                top: self.physical.y,
                width,
                height,
            };
        }
    }

    pub fn anchor(&self) -> (f32, f32) {
        if self.aabb_extent.is_some() {
            self.bounding_volume.center()
        } else {
            (self.physical.x, self.physical.y)
        }
    }

    pub fn current_image_id(&self, sprite_type: Option<&SpriteType>) -> Option<u32> {
        sprite_type
            .and_then(|sprite_type| sprite_type.sequence(&self.current_state))
            .and_then(|sequence| sequence.get(self.frame_index))
            .map(|frame| frame.image_id)
    }

    pub fn update_sprite(&mut self, sprite_type: Option<&SpriteType>) {
        self.sync_bounding_volume();
        let Some(sequence) =
            sprite_type.and_then(|sprite_type| sprite_type.sequence(&self.current_state))
        else {
            return;
        };
        if sequence.is_empty() {
            return;
        }
        if self.frame_index >= sequence.len() {
            self.restart_sequence();
        }
        if self.frame_countdown == 0 {
            self.frame_countdown = sequence[self.frame_index].duration_frames.max(1);
        }
        self.frame_countdown -= 1;
        if self.frame_countdown == 0 {
            self.frame_index = (self.frame_index + 1) % sequence.len();
        }
    }

    fn restart_sequence(&mut self) {
        self.frame_index = 0;
        self.frame_countdown = 0;
    }
}
