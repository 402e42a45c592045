use crate::Stamina;
use gridwalk_common::TextureId;
use serde::{Deserialize, Serialize};

/// What happens when an item is used. New item kinds add a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemBehavior {
    /// No effect; never consumed.
    #[default]
    Placeholder,
    /// Refills stamina; single use.
    RestoreStamina,
}

impl ItemBehavior {
    /// Apply the item's effect. Returns true if the item was consumed.
    pub fn use_on(&self, stamina: &mut Stamina) -> bool {
        match self {
            ItemBehavior::Placeholder => false,
            ItemBehavior::RestoreStamina => {
                stamina.refill();
                true
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    /// Icon shown in the slot bar and on the world billboard.
    pub texture: TextureId,
    pub behavior: ItemBehavior,
}

impl Item {
    pub fn new(name: impl Into<String>, texture: TextureId, behavior: ItemBehavior) -> Self {
        Self {
            name: name.into(),
            texture,
            behavior,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_does_nothing() {
        let mut stamina = Stamina::new(0.4);
        assert!(!ItemBehavior::Placeholder.use_on(&mut stamina));
        assert_eq!(stamina.value(), 0.4);
    }

    #[test]
    fn restore_stamina_refills_and_is_consumed() {
        let mut stamina = Stamina::EMPTY;
        assert!(ItemBehavior::RestoreStamina.use_on(&mut stamina));
        assert_eq!(stamina.value(), 1.0);
    }

    #[test]
    fn item_constructor() {
        let item = Item::new("Rock", TextureId(7), ItemBehavior::default());
        assert_eq!(item.name, "Rock");
        assert_eq!(item.texture, TextureId(7));
        assert_eq!(item.behavior, ItemBehavior::Placeholder);
    }
}
