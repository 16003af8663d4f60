//! 手语标签 - 单个字母或数字

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Full label alphabet: `a..z`, `A..Z`, `0..9`, in button order.
static LABEL_ALPHABET: Lazy<Vec<Label>> = Lazy::new(|| {
    ('a'..='z')
        .chain('A'..='Z')
        .chain('0'..='9')
        .map(Label)
        .collect()
});

/// 标签：决定片段目录名与文件名前缀
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label(char);

impl Label {
    pub fn new(c: char) -> Option<Self> {
        c.is_ascii_alphanumeric().then_some(Label(c))
    }

    pub fn all() -> &'static [Label] {
        &LABEL_ALPHABET
    }

    pub fn as_char(self) -> char {
        self.0
    }

    /// Position in the alphabet, which is also the button index.
    pub fn index(self) -> usize {
        Self::all()
            .iter()
            .position(|&l| l == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
