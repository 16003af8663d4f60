use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two capture cameras a clip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSide {
    /// Camera 1, the built-in camera
    Front,
    /// Camera 2, the USB webcam
    Back,
}

impl CameraSide {
    pub fn dir_name(self) -> &'static str {
        match self {
            CameraSide::Front => "front",
            CameraSide::Back => "back",
        }
    }

    /// Parses an operator choice: `1`/`front` or `2`/`back`.
    pub fn from_choice(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "front" => Some(CameraSide::Front),
            "2" | "back" => Some(CameraSide::Back),
            _ => None,
        }
    }
}

impl fmt::Display for CameraSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_choice_accepts_number_and_name() {
        assert_eq!(CameraSide::from_choice("1"), Some(CameraSide::Front));
        assert_eq!(CameraSide::from_choice(" front\n"), Some(CameraSide::Front));
        assert_eq!(CameraSide::from_choice("2"), Some(CameraSide::Back));
        assert_eq!(CameraSide::from_choice("BACK"), Some(CameraSide::Back));
    }

    #[test]
    fn test_from_choice_rejects_other_input() {
        assert_eq!(CameraSide::from_choice("3"), None);
        assert_eq!(CameraSide::from_choice(""), None);
        assert_eq!(CameraSide::from_choice("side"), None);
    }
}
