use serde::{Deserialize, Serialize};

/// A logical control the player can hold.
///
/// The kernel reads controls, never raw key events, so the desktop shell and
/// the headless CLI drive the same rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Control {
    Forward,
    Back,
    Left,
    Right,
    Jump,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Forward,
        Control::Back,
        Control::Left,
        Control::Right,
        Control::Jump,
    ];

    /// Map a raw key identifier to a control. Matching ignores ASCII case.
    /// A literal space is accepted for jump since that is what character-based
    /// keyboard APIs report for the space bar.
    pub fn from_key_name(name: &str) -> Option<Control> {
        if name == " " {
            return Some(Control::Jump);
        }
        match name.to_ascii_lowercase().as_str() {
            "w" => Some(Control::Forward),
            "s" => Some(Control::Back),
            "a" => Some(Control::Left),
            "d" => Some(Control::Right),
            "space" => Some(Control::Jump),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Control::Forward => "forward",
            Control::Back => "back",
            Control::Left => "left",
            Control::Right => "right",
            Control::Jump => "jump",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_space_are_recognised() {
        assert_eq!(Control::from_key_name("w"), Some(Control::Forward));
        assert_eq!(Control::from_key_name("s"), Some(Control::Back));
        assert_eq!(Control::from_key_name("a"), Some(Control::Left));
        assert_eq!(Control::from_key_name("d"), Some(Control::Right));
        assert_eq!(Control::from_key_name("space"), Some(Control::Jump));
        assert_eq!(Control::from_key_name(" "), Some(Control::Jump));
    }

    #[test]
    fn key_names_ignore_case() {
        assert_eq!(Control::from_key_name("W"), Some(Control::Forward));
        assert_eq!(Control::from_key_name("Space"), Some(Control::Jump));
        assert_eq!(Control::from_key_name("D"), Some(Control::Right));
    }

    #[test]
    fn unknown_keys_map_to_nothing() {
        assert_eq!(Control::from_key_name("q"), None);
        assert_eq!(Control::from_key_name("ArrowUp"), None);
        assert_eq!(Control::from_key_name(""), None);
    }

    #[test]
    fn indices_are_dense() {
        for (i, c) in Control::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }
}
