/// One frame's draw instruction for one visible sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderItem {
    pub frame_id: u32,
    pub image_id: Option<u32>,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub alpha: u8,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Default, Clone)]
pub struct RenderList {
    items: Vec<RenderItem>,
}

impl RenderList {
    pub fn add_render_item(&mut self, item: RenderItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
