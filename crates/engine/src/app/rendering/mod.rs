mod culler;
mod render_list;
mod transform;

pub use culler::cull_and_emit;
pub use render_list::{RenderItem, RenderList};
pub use transform::{round_px, Viewport};
