/// Sprint reserve, always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Stamina(f32);

impl Default for Stamina {
    fn default() -> Self {
        Self::FULL
    }
}

impl Stamina {
    pub const FULL: Stamina = Stamina(1.0);
    pub const EMPTY: Stamina = Stamina(0.0);

    /// Clamps `value` into range; NaN becomes empty.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::EMPTY;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Any reserve left to sprint with.
    pub fn has_reserve(self) -> bool {
        self.0 > 0.0
    }

    pub fn is_full(self) -> bool {
        self.0 >= 1.0
    }

    pub fn drain(&mut self, amount: f32) {
        *self = Self::new(self.0 - amount);
    }

    pub fn regenerate(&mut self, amount: f32) {
        *self = Self::new(self.0 + amount);
    }

    pub fn refill(&mut self) {
        *self = Self::FULL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_clamps() {
        assert_eq!(Stamina::new(1.5).value(), 1.0);
        assert_eq!(Stamina::new(-0.2).value(), 0.0);
        assert_eq!(Stamina::new(f32::NAN).value(), 0.0);
        assert_eq!(Stamina::new(0.25).value(), 0.25);
    }

    #[test]
    fn drain_and_regenerate_stay_in_range() {
        let mut s = Stamina::FULL;
        for _ in 0..100 {
            s.drain(0.037);
            assert!((0.0..=1.0).contains(&s.value()));
        }
        assert!(!s.has_reserve());
        for _ in 0..100 {
            s.regenerate(0.041);
            assert!((0.0..=1.0).contains(&s.value()));
        }
        assert!(s.is_full());
    }

    #[test]
    fn refill_is_exactly_one() {
        let mut s = Stamina::new(0.3);
        s.refill();
        assert_eq!(s.value(), 1.0);
    }
}
