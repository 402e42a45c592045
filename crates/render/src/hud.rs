use glam::Vec2;
use gridwalk_common::Rect;

/// Pixels between inventory slots and from the slots to the screen edge.
pub const SLOT_GAP: f32 = 5.0;
/// Pixels between the stamina bar and the bottom-left corner.
pub const STAMINA_MARGIN: f32 = 25.0;

/// Screen-space HUD placement for one surface size. Origin is top-left, units
/// are pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct HudLayout {
    pub width: f32,
    pub height: f32,
    /// Full stamina bar; the fill is drawn over it from the left.
    pub stamina_bar: Rect,
    /// Inventory slot squares, slot 0 leftmost, the last slot against the
    /// right edge.
    pub slots: Vec<Rect>,
    /// Top-right corner of the selected item's name.
    pub name_anchor: Vec2,
    pub name_font_size: f32,
    /// Screen center.
    pub crosshair: Vec2,
    pub fps_position: Vec2,
    pub fps_font_size: f32,
}

impl HudLayout {
    pub fn new(width: f32, height: f32, slot_count: usize) -> Self {
        let bar_height = height * 0.025;
        let stamina_bar = Rect::new(
            STAMINA_MARGIN,
            height - bar_height - STAMINA_MARGIN,
            width * 0.2,
            bar_height,
        );

        let side = height * 0.05;
        let slots = (0..slot_count)
            .map(|i| {
                let from_right = (slot_count - i - 1) as f32;
                let x = width - side - (side + SLOT_GAP) * from_right - SLOT_GAP;
                Rect::new(x, SLOT_GAP, side, side)
            })
            .collect();

        Self {
            width,
            height,
            stamina_bar,
            slots,
            name_anchor: Vec2::new(width - SLOT_GAP, side + 15.0),
            name_font_size: 14.0 * (height / 480.0).max(1.0),
            crosshair: Vec2::new(width / 2.0, height / 2.0),
            fps_position: Vec2::new(5.0, 5.0),
            fps_font_size: 30.0,
        }
    }

    /// The green part of the stamina bar for a value in `[0, 1]`.
    pub fn stamina_fill(&self, stamina: f32) -> Rect {
        Rect {
            width: self.stamina_bar.width * stamina.clamp(0.0, 1.0),
            ..self.stamina_bar
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamina_bar_bottom_left() {
        let hud = HudLayout::new(800.0, 600.0, 5);
        assert_eq!(hud.stamina_bar, Rect::new(25.0, 560.0, 160.0, 15.0));
        assert_eq!(hud.stamina_fill(0.5).width, 80.0);
        assert_eq!(hud.stamina_fill(2.0).width, 160.0);
        assert_eq!(hud.stamina_fill(-1.0).width, 0.0);
    }

    #[test]
    fn slots_right_to_left_from_corner() {
        let hud = HudLayout::new(800.0, 600.0, 5);
        assert_eq!(hud.slots.len(), 5);
        let last = hud.slots[4];
        assert_eq!(last, Rect::new(765.0, 5.0, 30.0, 30.0));
        for pair in hud.slots.windows(2) {
            assert_eq!(pair[1].x - pair[0].x, 30.0 + SLOT_GAP);
            assert_eq!(pair[0].y, pair[1].y);
        }
    }

    #[test]
    fn layout_tracks_resize() {
        let small = HudLayout::new(640.0, 480.0, 5);
        let large = HudLayout::new(1920.0, 1080.0, 5);
        assert_eq!(small.crosshair, Vec2::new(320.0, 240.0));
        assert_eq!(large.crosshair, Vec2::new(960.0, 540.0));
        assert!(large.slots[0].width > small.slots[0].width);
        assert!(large.name_font_size > small.name_font_size);
        assert_eq!(small.name_anchor.y, 24.0 + 15.0);
    }
}
