// Game action definitions

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Up,
    Down,
    Jump,

    // Abilities
    Fire,
    Dash,
}

impl Action {
    /// Every action, in declaration order
    pub const ALL: [Action; 7] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Fire,
        Action::Dash,
    ];

    /// Check if this action only feeds the movement axes
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            Action::MoveLeft | Action::MoveRight | Action::Up | Action::Down
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::Jump, Action::Jump);
        assert_ne!(Action::Jump, Action::Down);
    }

    #[test]
    fn test_all_actions_are_unique() {
        let unique: HashSet<Action> = Action::ALL.into_iter().collect();
        assert_eq!(unique.len(), Action::ALL.len());
    }

    #[test]
    fn test_directional_actions() {
        assert!(Action::MoveLeft.is_directional());
        assert!(Action::Down.is_directional());
        assert!(!Action::Jump.is_directional());
        assert!(!Action::Dash.is_directional());
    }
}
