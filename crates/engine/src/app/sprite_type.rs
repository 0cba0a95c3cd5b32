use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Index of a sprite type in the registry, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteTypeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub image_id: u32,
    pub duration_frames: u32,
}

/// Shared visual description referenced by many sprites.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteType {
    key: String,
    texture_width: u32,
    texture_height: u32,
    animations: HashMap<String, Vec<AnimationFrame>>,
}

impl SpriteType {
    pub fn new(key: impl Into<String>, texture_width: u32, texture_height: u32) -> Self {
        Self {
            key: key.into(),
            texture_width,
            texture_height,
            animations: HashMap::new(),
        }
    }

    pub fn with_animation(
        mut self,
        state: impl Into<String>,
        frames: impl IntoIterator<Item = AnimationFrame>,
    ) -> Self {
        self.add_animation(state, frames);
        self
    }

    pub fn add_animation(
        &mut self,
        state: impl Into<String>,
        frames: impl IntoIterator<Item = AnimationFrame>,
    ) {
        self.animations
            .insert(state.into(), frames.into_iter().collect());
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn texture_width(&self) -> u32 {
        self.texture_width
    }

    pub fn texture_height(&self) -> u32 {
        self.texture_height
    }

    pub fn sequence(&self, state: &str) -> Option<&[AnimationFrame]> {
        self.animations.get(state).map(Vec::as_slice)
    }
}

#[derive(Debug, Default, Clone)]
pub struct SpriteTypeRegistry {
    types: Vec<SpriteType>,
}

impl SpriteTypeRegistry {
    pub fn add(&mut self, sprite_type: SpriteType) -> SpriteTypeId {
        let id = SpriteTypeId(self.types.len() as u32);
        debug!(
            id = id.0,
            key = sprite_type.key(),
            width = sprite_type.texture_width(),
            height = sprite_type.texture_height(),
            "sprite_type_registered"
        );
        self.types.push(sprite_type);
        id
    }

    pub fn get(&self, id: SpriteTypeId) -> Option<&SpriteType> {
        self.types.get(id.0 as usize)
    }

    pub fn id_by_key(&self, key: &str) -> Option<SpriteTypeId> {
        self.types
            .iter()
            .position(|sprite_type| sprite_type.key == key)
            .map(|idx| SpriteTypeId(idx as u32))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn clear(&mut self) {
        self.types.clear();
    }
}
