/// A discrete gameplay action produced by input for one frame.
///
/// Continuous input (held movement keys, mouse look) stays in
/// [`FrameInput`](crate::FrameInput); actions are the edge-triggered part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Collect the first targeted pickup (primary click).
    Collect,
    /// Use the item in the selected slot (secondary click).
    UseSelected,
    /// Select the next slot, wrapping (scroll down).
    SelectNext,
    /// Select the previous slot, wrapping (scroll up).
    SelectPrevious,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_are_comparable() {
        assert_eq!(Action::Collect, Action::Collect);
        assert_ne!(Action::SelectNext, Action::SelectPrevious);
    }

    #[test]
    fn actions_are_copy() {
        let a = Action::UseSelected;
        let b = a;
        assert!(matches!(a, Action::UseSelected));
        assert!(matches!(b, Action::UseSelected));
    }
}
