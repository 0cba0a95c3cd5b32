use super::bot::Bot;

/// Stable reference to a bot. A handle goes stale once its bot is removed;
/// the slot's generation moves on so the handle never aliases a newer bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BotHandle {
    index: u32,
    generation: u32,
}

impl BotHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    bot: Option<Bot>,
}

#[derive(Debug, Default)]
pub struct BotArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl BotArena {
    pub fn insert(&mut self, bot: Bot) -> BotHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.bot = Some(bot);
            return BotHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            bot: Some(bot),
        });
        BotHandle {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, handle: BotHandle) -> Option<&Bot> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.bot.as_ref())
    }

    pub fn get_mut(&mut self, handle: BotHandle) -> Option<&mut Bot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.bot.as_mut())
    }

    pub fn contains(&self, handle: BotHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn remove(&mut self, handle: BotHandle) -> Option<Bot> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let bot = slot.bot.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(bot)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.bot.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }
}
