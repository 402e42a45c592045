use crate::{Item, Stamina};

/// Number of inventory slots.
pub const SLOT_COUNT: usize = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("slot {index} out of range (capacity {capacity})")]
    SlotOutOfRange { index: usize, capacity: usize },
}

/// Where an inserted item landed.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub slot: usize,
    /// Item that was overwritten because every slot was full.
    pub displaced: Option<Item>,
}

/// Result of using the selected item.
#[derive(Debug, Clone, PartialEq)]
pub struct UseOutcome {
    pub slot: usize,
    pub name: String,
    pub consumed: bool,
}

/// Fixed-size slot bar with one selected slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    slots: [Option<Item>; SLOT_COUNT],
    selected: usize,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn capacity(&self) -> usize {
        SLOT_COUNT
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) -> Result<(), InventoryError> {
        if index >= SLOT_COUNT {
            return Err(InventoryError::SlotOutOfRange {
                index,
                capacity: SLOT_COUNT,
            });
        }
        self.selected = index;
        Ok(())
    }

    /// Move the selection one slot right, wrapping to 0.
    pub fn select_next(&mut self) -> usize {
        self.selected = (self.selected + 1) % SLOT_COUNT;
        self.selected
    }

    /// Move the selection one slot left, wrapping to the last slot.
    pub fn select_previous(&mut self) -> usize {
        self.selected = (self.selected + SLOT_COUNT - 1) % SLOT_COUNT;
        self.selected
    }

    pub fn slots(&self) -> &[Option<Item>] {
        &self.slots
    }

    /// Item in `index`, or `None` if the slot is empty or out of range.
    pub fn slot(&self, index: usize) -> Option<&Item> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.slot(self.selected)
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied() == SLOT_COUNT
    }

    /// Place an item: the selected slot if empty, else the first empty slot,
    /// else overwrite the selected slot.
    pub fn insert(&mut self, item: Item) -> Placement {
        let slot = if self.slots[self.selected].is_none() {
            self.selected
        } else {
            self.slots
                .iter()
                .position(Option::is_none)
                .unwrap_or(self.selected)
        };
        let displaced = self.slots[slot].replace(item);
        if let Some(old) = &displaced {
            tracing::warn!(slot, item = %old.name, "inventory full, overwrote selected slot");
        }
        Placement { slot, displaced }
    }

    /// Remove and return the item in `index`.
    pub fn take(&mut self, index: usize) -> Option<Item> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Use the selected item, clearing its slot if it was consumed.
    /// Returns `None` when the selected slot is empty.
    pub fn use_selected(&mut self, stamina: &mut Stamina) -> Option<UseOutcome> {
        let slot = self.selected;
        let item = self.slots[slot].as_ref()?;
        let consumed = item.behavior.use_on(stamina);
        let name = item.name.clone();
        if consumed {
            self.slots[slot] = None;
        }
        Some(UseOutcome {
            slot,
            name,
            consumed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemBehavior;
    use gridwalk_common::TextureId;

    fn item(name: &str) -> Item {
        Item::new(name, TextureId(1), ItemBehavior::Placeholder)
    }

    fn bar() -> Item {
        Item::new("Zesty Bar", TextureId(2), ItemBehavior::RestoreStamina)
    }

    #[test]
    fn starts_empty_with_first_slot_selected() {
        let inv = Inventory::new();
        assert_eq!(inv.selected(), 0);
        assert_eq!(inv.occupied(), 0);
        assert_eq!(inv.capacity(), 5);
        assert!(inv.selected_item().is_none());
    }

    #[test]
    fn insert_into_empty_selected_slot() {
        let mut inv = Inventory::new();
        let placed = inv.insert(item("a"));
        assert_eq!(placed.slot, 0);
        assert!(placed.displaced.is_none());
        assert_eq!(inv.slot(0).unwrap().name, "a");
    }

    #[test]
    fn insert_skips_occupied_selected_slot() {
        let mut inv = Inventory::new();
        inv.insert(item("a"));
        let placed = inv.insert(item("b"));
        assert_eq!(placed.slot, 1);
        assert_eq!(inv.slot(0).unwrap().name, "a");
        assert_eq!(inv.slot(1).unwrap().name, "b");
    }

    #[test]
    fn insert_prefers_selected_empty_slot_over_earlier_gap() {
        let mut inv = Inventory::new();
        inv.select(3).unwrap();
        assert_eq!(inv.insert(item("a")).slot, 3);
        assert_eq!(inv.insert(item("b")).slot, 0);
    }

    #[test]
    fn insert_when_full_overwrites_selected() {
        let mut inv = Inventory::new();
        for name in ["a", "b", "c", "d", "e"] {
            inv.insert(item(name));
        }
        assert!(inv.is_full());
        inv.select(2).unwrap();
        let placed = inv.insert(item("f"));
        assert_eq!(placed.slot, 2);
        assert_eq!(placed.displaced.unwrap().name, "c");
        assert_eq!(inv.slot(2).unwrap().name, "f");
        assert_eq!(inv.occupied(), 5);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut inv = Inventory::new();
        assert_eq!(inv.select_previous(), 4);
        assert_eq!(inv.select_next(), 0);
        for _ in 0..7 {
            inv.select_next();
        }
        assert_eq!(inv.selected(), 2);
    }

    #[test]
    fn selection_never_escapes_bounds() {
        let mut inv = Inventory::new();
        // Deterministic pseudo-random walk of scroll steps
        let mut state = 0x2545_f491_u32;
        for _ in 0..1000 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state & 1 == 0 {
                inv.select_next();
            } else {
                inv.select_previous();
            }
            assert!(inv.selected() < inv.capacity());
        }
    }

    #[test]
    fn select_rejects_out_of_range() {
        let mut inv = Inventory::new();
        assert_eq!(
            inv.select(5),
            Err(InventoryError::SlotOutOfRange {
                index: 5,
                capacity: 5
            })
        );
        assert_eq!(inv.selected(), 0);
    }

    #[test]
    fn slot_access_is_guarded() {
        let inv = Inventory::new();
        assert!(inv.slot(99).is_none());
        let mut inv = inv;
        assert!(inv.take(99).is_none());
    }

    #[test]
    fn using_stamina_item_refills_and_clears_slot() {
        let mut inv = Inventory::new();
        inv.insert(bar());
        let mut stamina = Stamina::new(0.1);
        let outcome = inv.use_selected(&mut stamina).unwrap();
        assert!(outcome.consumed);
        assert_eq!(outcome.slot, 0);
        assert_eq!(stamina.value(), 1.0);
        assert!(inv.slot(0).is_none());
    }

    #[test]
    fn using_placeholder_changes_nothing() {
        let mut inv = Inventory::new();
        inv.insert(item("rock"));
        let mut stamina = Stamina::new(0.5);
        let outcome = inv.use_selected(&mut stamina).unwrap();
        assert!(!outcome.consumed);
        assert_eq!(stamina.value(), 0.5);
        assert_eq!(inv.slot(0).unwrap().name, "rock");
    }

    #[test]
    fn using_empty_slot_is_not_an_error() {
        let mut inv = Inventory::new();
        let mut stamina = Stamina::FULL;
        assert!(inv.use_selected(&mut stamina).is_none());
    }

    #[test]
    fn take_removes_item() {
        let mut inv = Inventory::new();
        inv.insert(item("a"));
        assert_eq!(inv.take(0).unwrap().name, "a");
        assert_eq!(inv.occupied(), 0);
    }
}
