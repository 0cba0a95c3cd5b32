use super::arena::BotHandle;

/// Only active bots are handed over.
pub trait Physics {
    fn add_collidable(&mut self, bot: BotHandle);
    /// The player and `bot` share a broad-phase region this frame.
    fn add_bot_collision(&mut self, bot: BotHandle);
}
