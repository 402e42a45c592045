use crate::{GameConfig, interaction, movement};
use glam::Vec3;
use gridwalk_common::{Camera, TextureId};
use gridwalk_input::{Action, FrameInput};
use gridwalk_inventory::{Inventory, Item, Placement, Stamina, UseOutcome};
use gridwalk_map::{CellCoord, CollisionGrid};

/// An item lying in the world, waiting to be collected.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPickup {
    pub position: Vec3,
    pub item: Item,
}

/// Static decorative billboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub texture: TextureId,
    pub position: Vec3,
    /// Billboard edge length in world units.
    pub size: f32,
}

/// A record of every gameplay change made during a step.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A move was reverted because the player circle overlapped this wall.
    MoveBlocked { cell: CellCoord },
    /// A pickup left the world and its item went into `slot`.
    PickupCollected { name: String, slot: usize },
    /// The inventory was full and this item was overwritten.
    ItemDiscarded { name: String, slot: usize },
    /// The selected item was used.
    ItemUsed {
        name: String,
        slot: usize,
        consumed: bool,
    },
    /// The selected slot changed.
    SlotSelected { slot: usize },
    /// One frame finished.
    Stepped { frame: u64 },
}

/// All state owned by the game loop.
///
/// Every mutation goes through [`GameState::step`] or one of the explicit
/// operations it calls, and is recorded in the event log. Presentation reads
/// from here and never writes.
#[derive(Debug, Clone)]
pub struct GameState {
    camera: Camera,
    grid: CollisionGrid,
    config: GameConfig,
    pickups: Vec<ItemPickup>,
    sprites: Vec<Sprite>,
    inventory: Inventory,
    stamina: Stamina,
    /// Pickups hit by the view ray this frame, in list order.
    targets: Vec<usize>,
    frame: u64,
    event_log: Vec<GameEvent>,
}

impl GameState {
    /// Full stamina, empty inventory, no pickups or sprites.
    pub fn new(grid: CollisionGrid, camera: Camera, config: GameConfig) -> Self {
        let mut state = Self {
            camera,
            grid,
            config,
            pickups: Vec::new(),
            sprites: Vec::new(),
            inventory: Inventory::new(),
            stamina: Stamina::FULL,
            targets: Vec::new(),
            frame: 0,
            event_log: Vec::new(),
        };
        state.refresh_targets();
        state
    }

    pub fn add_sprite(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    pub fn add_pickup(&mut self, pickup: ItemPickup) {
        self.pickups.push(pickup);
        self.refresh_targets();
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn grid(&self) -> &CollisionGrid {
        &self.grid
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn pickups(&self) -> &[ItemPickup] {
        &self.pickups
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn stamina(&self) -> Stamina {
        self.stamina
    }

    pub fn set_stamina(&mut self, stamina: Stamina) {
        self.stamina = stamina;
    }

    /// Indices of pickups under the crosshair.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    /// Whether the crosshair should be shown.
    pub fn is_targeting(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Advance one frame: look and move with collision, retarget, then apply
    /// the frame's actions in order. Negative `dt` is treated as zero.
    pub fn step(&mut self, input: &FrameInput, dt: f32) {
        let _span = tracing::info_span!("game_step", frame = self.frame).entered();
        let dt = dt.max(0.0);

        let moved = movement::apply(
            &mut self.camera,
            &mut self.stamina,
            &self.grid,
            input,
            dt,
            &self.config,
        );
        if let Some(cell) = moved.blocked_by {
            self.event_log.push(GameEvent::MoveBlocked { cell });
        }

        self.refresh_targets();

        for action in &input.actions {
            match action {
                Action::Collect => {
                    self.collect();
                }
                Action::UseSelected => {
                    self.use_selected();
                }
                Action::SelectNext => {
                    let slot = self.inventory.select_next();
                    self.event_log.push(GameEvent::SlotSelected { slot });
                }
                Action::SelectPrevious => {
                    let slot = self.inventory.select_previous();
                    self.event_log.push(GameEvent::SlotSelected { slot });
                }
            }
        }

        self.frame += 1;
        self.event_log.push(GameEvent::Stepped { frame: self.frame });
        tracing::trace!(
            stamina = self.stamina.value(),
            targets = self.targets.len(),
            "frame complete"
        );
    }

    /// Move the first targeted pickup (list order) into the inventory.
    /// Returns `None` when nothing is targeted.
    pub fn collect(&mut self) -> Option<Placement> {
        let index = *self.targets.first()?;
        let pickup = self.pickups.remove(index);
        let name = pickup.item.name.clone();
        let placement = self.inventory.insert(pickup.item);

        if let Some(old) = &placement.displaced {
            self.event_log.push(GameEvent::ItemDiscarded {
                name: old.name.clone(),
                slot: placement.slot,
            });
        }
        tracing::debug!(item = %name, slot = placement.slot, "collected pickup");
        self.event_log.push(GameEvent::PickupCollected {
            name,
            slot: placement.slot,
        });

        self.refresh_targets();
        Some(placement)
    }

    /// Use the selected item. Returns `None` when the slot is empty.
    pub fn use_selected(&mut self) -> Option<UseOutcome> {
        let outcome = self.inventory.use_selected(&mut self.stamina)?;
        tracing::debug!(
            item = %outcome.name,
            slot = outcome.slot,
            consumed = outcome.consumed,
            "used item"
        );
        self.event_log.push(GameEvent::ItemUsed {
            name: outcome.name.clone(),
            slot: outcome.slot,
            consumed: outcome.consumed,
        });
        Some(outcome)
    }

    fn refresh_targets(&mut self) {
        self.targets = interaction::targeted(
            &self.camera,
            &self.pickups,
            self.config.pickup_radius,
            self.config.reach,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_from_rows;
    use gridwalk_input::Key;
    use gridwalk_inventory::ItemBehavior;

    fn open_floor() -> CollisionGrid {
        grid_from_rows(&[
            "#########", //
            "#.......#", //
            "#.......#", //
            "#.......#", //
            "#.......#", //
            "#.......#", //
            "#.......#", //
            "#.......#", //
            "#########", //
        ])
    }

    /// Camera at (2, 0.5, 2) looking down +X.
    fn state() -> GameState {
        let camera = Camera {
            position: Vec3::new(2.0, 0.5, 2.0),
            target: Vec3::new(3.0, 0.5, 2.0),
            ..Camera::default()
        };
        GameState::new(open_floor(), camera, GameConfig::default())
    }

    fn bar() -> Item {
        Item::new("Zesty Bar", TextureId(1), ItemBehavior::RestoreStamina)
    }

    fn rock(n: usize) -> Item {
        Item::new(format!("rock {n}"), TextureId(2), ItemBehavior::Placeholder)
    }

    fn in_reach(item: Item) -> ItemPickup {
        ItemPickup {
            position: Vec3::new(2.6, 0.5, 2.0),
            item,
        }
    }

    fn click() -> FrameInput {
        FrameInput::idle().with_action(Action::Collect)
    }

    #[test]
    fn new_state_defaults() {
        let s = state();
        assert_eq!(s.frame(), 0);
        assert_eq!(s.stamina(), Stamina::FULL);
        assert_eq!(s.inventory().occupied(), 0);
        assert!(!s.is_targeting());
    }

    #[test]
    fn targets_follow_added_pickups() {
        let mut s = state();
        s.add_pickup(in_reach(bar()));
        assert!(s.is_targeting());
        assert_eq!(s.targets(), &[0]);
    }

    #[test]
    fn collect_into_empty_inventory() {
        let mut s = state();
        s.add_pickup(in_reach(bar()));
        s.add_pickup(ItemPickup {
            position: Vec3::new(6.0, 0.5, 6.0),
            item: rock(0),
        });

        s.step(&click(), 0.016);

        assert_eq!(s.pickups().len(), 1);
        assert_eq!(s.inventory().slot(0).unwrap().name, "Zesty Bar");
        assert!(!s.is_targeting());
        assert!(s.events().contains(&GameEvent::PickupCollected {
            name: "Zesty Bar".into(),
            slot: 0
        }));
    }

    #[test]
    fn second_collect_goes_to_first_empty_slot() {
        let mut s = state();
        s.add_pickup(in_reach(rock(0)));
        s.step(&click(), 0.0);
        s.add_pickup(in_reach(rock(1)));
        s.step(&click(), 0.0);

        assert_eq!(s.inventory().selected(), 0);
        assert_eq!(s.inventory().slot(0).unwrap().name, "rock 0");
        assert_eq!(s.inventory().slot(1).unwrap().name, "rock 1");
        assert!(s.pickups().is_empty());
    }

    #[test]
    fn collect_with_full_inventory_overwrites_selected() {
        let mut s = state();
        for n in 0..5 {
            s.add_pickup(in_reach(rock(n)));
            s.step(&click(), 0.0);
        }
        assert!(s.inventory().is_full());

        let select_two = FrameInput::idle()
            .with_action(Action::SelectNext)
            .with_action(Action::SelectNext);
        s.step(&select_two, 0.0);
        assert_eq!(s.inventory().selected(), 2);

        s.add_pickup(in_reach(bar()));
        s.drain_events();
        s.step(&click(), 0.0);

        assert_eq!(s.inventory().slot(2).unwrap().name, "Zesty Bar");
        assert!(s.pickups().is_empty());
        assert!(s.events().contains(&GameEvent::ItemDiscarded {
            name: "rock 2".into(),
            slot: 2
        }));
    }

    #[test]
    fn only_first_target_is_collected() {
        let mut s = state();
        s.add_pickup(in_reach(rock(0)));
        s.add_pickup(ItemPickup {
            position: Vec3::new(2.3, 0.5, 2.0),
            item: rock(1),
        });
        assert_eq!(s.targets(), &[0, 1]);

        let placed = s.collect().unwrap();
        assert_eq!(placed.slot, 0);
        assert_eq!(s.inventory().slot(0).unwrap().name, "rock 0");
        assert_eq!(s.pickups().len(), 1);
        assert_eq!(s.targets(), &[0]);
    }

    #[test]
    fn click_with_nothing_targeted_is_harmless() {
        let mut s = state();
        s.add_pickup(ItemPickup {
            position: Vec3::new(2.0, 0.5, 5.0),
            item: rock(0),
        });
        s.step(&click(), 0.016);
        assert_eq!(s.pickups().len(), 1);
        assert_eq!(s.inventory().occupied(), 0);
        assert!(s.collect().is_none());
    }

    #[test]
    fn use_stamina_item_refills_and_clears_slot() {
        let mut s = state();
        s.add_pickup(in_reach(bar()));
        s.step(&click(), 0.0);
        s.set_stamina(Stamina::new(0.2));

        s.step(&FrameInput::idle().with_action(Action::UseSelected), 0.0);

        assert_eq!(s.stamina().value(), 1.0);
        assert!(s.inventory().slot(0).is_none());
        assert!(s.events().contains(&GameEvent::ItemUsed {
            name: "Zesty Bar".into(),
            slot: 0,
            consumed: true
        }));
    }

    #[test]
    fn use_placeholder_changes_nothing() {
        let mut s = state();
        s.add_pickup(in_reach(rock(0)));
        s.step(&click(), 0.0);
        s.set_stamina(Stamina::new(0.3));

        s.step(&FrameInput::idle().with_action(Action::UseSelected), 0.0);

        assert_eq!(s.stamina().value(), 0.3);
        assert_eq!(s.inventory().slot(0).unwrap().name, "rock 0");
    }

    #[test]
    fn use_on_empty_slot_records_nothing() {
        let mut s = state();
        s.step(&FrameInput::idle().with_action(Action::UseSelected), 0.0);
        assert_eq!(s.events(), &[GameEvent::Stepped { frame: 1 }]);
    }

    #[test]
    fn walking_into_pickup_range_then_collecting() {
        let mut s = state();
        s.add_pickup(ItemPickup {
            position: Vec3::new(3.5, 0.5, 2.0),
            item: bar(),
        });
        assert!(!s.is_targeting());

        // One second forward covers one unit; the ray then reaches the pickup
        s.step(&FrameInput::idle().with_keys(&[Key::Forward]).with_action(Action::Collect), 1.0);

        assert!(s.pickups().is_empty());
        assert_eq!(s.inventory().occupied(), 1);
    }

    #[test]
    fn collision_is_recorded() {
        let camera = Camera {
            position: Vec3::new(1.0, 0.5, 2.0),
            target: Vec3::new(0.0, 0.5, 2.0),
            ..Camera::default()
        };
        let mut s = GameState::new(open_floor(), camera, GameConfig::default());
        s.step(&FrameInput::idle().with_keys(&[Key::Forward]), 0.45);
        assert_eq!(s.camera().position, Vec3::new(1.0, 0.5, 2.0));
        assert_eq!(
            s.events()[0],
            GameEvent::MoveBlocked {
                cell: CellCoord::new(0, 2)
            }
        );
    }

    #[test]
    fn frame_counter_and_event_drain() {
        let mut s = state();
        s.step(&FrameInput::idle(), 0.016);
        s.step(&FrameInput::idle(), 0.016);
        assert_eq!(s.frame(), 2);
        let events = s.drain_events();
        assert_eq!(events.len(), 2);
        assert!(s.events().is_empty());
    }

    #[test]
    fn negative_dt_does_not_move() {
        let mut s = state();
        s.step(&FrameInput::idle().with_keys(&[Key::Forward]), -1.0);
        assert_eq!(s.camera().position, Vec3::new(2.0, 0.5, 2.0));
    }
}
