use crate::app::sprite::AnimatedSprite;
use crate::app::sprite_manager::SpriteManager;
use crate::app::sprite_type::SpriteType;

use super::{round_px, RenderItem, RenderList, Viewport};

/// Emits the player, then active bots, then dying bots. Returns the number of
/// items appended.
pub fn cull_and_emit(
    manager: &SpriteManager,
    viewport: &Viewport,
    render_list: &mut RenderList,
) -> usize {
    let before = render_list.len();

    let player = manager.player();
    if player.is_visible() {
        emit_if_visible(manager, player.sprite(), viewport, render_list);
    }
    for &handle in manager.active_bots() {
        if let Some(bot) = manager.bot(handle) {
            emit_if_visible(manager, bot.sprite(), viewport, render_list);
        }
    }
    for handle in manager.dying_bots() {
        if let Some(bot) = manager.bot(handle) {
            emit_if_visible(manager, bot.sprite(), viewport, render_list);
        }
    }

    render_list.len() - before
}

fn emit_if_visible(
    manager: &SpriteManager,
    sprite: &AnimatedSprite,
    viewport: &Viewport,
    render_list: &mut RenderList,
) {
    let Some(sprite_type) = manager.sprite_type(sprite.sprite_type()) else {
        return;
    };
    if let Some(item) = render_item(sprite, sprite_type, viewport) {
        render_list.add_render_item(item);
    }
}

fn render_item(
    sprite: &AnimatedSprite,
    sprite_type: &SpriteType,
    viewport: &Viewport,
) -> Option<RenderItem> {
    let physical = sprite.physical();
    let width = sprite_type.texture_width();
    let height = sprite_type.texture_height();
    if !viewport.are_world_coordinates_in_viewport(
        physical.x,
        physical.y,
        width as f32,
        height as f32,
    ) {
        return None;
    }
    let (x, y) = viewport.world_to_screen_px(physical.x, physical.y);
    Some(RenderItem {
        frame_id: sprite.frame_index() as u32,
        image_id: sprite.current_image_id(Some(sprite_type)),
        x,
        y,
        z: round_px(physical.z),
        alpha: sprite.alpha(),
        width,
        height,
    })
}
