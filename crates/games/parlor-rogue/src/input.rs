use crate::engine::{Action, Direction};

/// Map a DOM-style key name to a game action.
///
/// WASD and the arrow keys move, Enter takes the stairs, Space picks up,
/// Z waits. Unknown keys map to nothing, which the caller treats as a
/// no-op. Matching is case-insensitive, as browsers report `W` when shift
/// is held.
pub fn action_for_key(key: &str) -> Option<Action> {
    match key.to_ascii_lowercase().as_str() {
        "w" | "arrowup" => Some(Action::Move(Direction::North)),
        "s" | "arrowdown" => Some(Action::Move(Direction::South)),
        "a" | "arrowleft" => Some(Action::Move(Direction::West)),
        "d" | "arrowright" => Some(Action::Move(Direction::East)),
        "enter" => Some(Action::Descend),
        " " | "space" => Some(Action::PickUp),
        "z" => Some(Action::Wait),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_map_to_directions() {
        assert_eq!(action_for_key("w"), Some(Action::Move(Direction::North)));
        assert_eq!(action_for_key("ArrowUp"), Some(Action::Move(Direction::North)));
        assert_eq!(action_for_key("s"), Some(Action::Move(Direction::South)));
        assert_eq!(action_for_key("ArrowLeft"), Some(Action::Move(Direction::West)));
        assert_eq!(action_for_key("D"), Some(Action::Move(Direction::East)));
    }

    #[test]
    fn action_keys_map_to_actions() {
        assert_eq!(action_for_key("Enter"), Some(Action::Descend));
        assert_eq!(action_for_key(" "), Some(Action::PickUp));
        assert_eq!(action_for_key("Space"), Some(Action::PickUp));
        assert_eq!(action_for_key("z"), Some(Action::Wait));
    }

    #[test]
    fn unknown_keys_map_to_nothing() {
        assert_eq!(action_for_key("q"), None);
        assert_eq!(action_for_key("Escape"), None);
        assert_eq!(action_for_key(""), None);
    }
}
