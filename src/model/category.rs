use std::fmt;

use serde::{Deserialize, Serialize};

/// Timer category. Each one has its own bar color and default duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Red,
    Blue,
    Purple,
    Turquoise,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Red,
        Category::Blue,
        Category::Purple,
        Category::Turquoise,
    ];

    /// Config key / log name
    pub fn name(self) -> &'static str {
        match self {
            Category::Red => "red",
            Category::Blue => "blue",
            Category::Purple => "purple",
            Category::Turquoise => "turquoise",
        }
    }

    pub fn parse_name(s: &str) -> Option<Category> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Some(Category::Red),
            "blue" => Some(Category::Blue),
            "purple" => Some(Category::Purple),
            "turquoise" => Some(Category::Turquoise),
            _ => None,
        }
    }

    /// Built-in default duration in seconds
    pub fn default_secs(self) -> u64 {
        match self {
            Category::Red => 200,
            Category::Blue => 900,
            Category::Purple => 600,
            Category::Turquoise => 300,
        }
    }

    /// Built-in bar color as a hex string
    pub fn default_hex(self) -> &'static str {
        match self {
            Category::Red => "#d32f2f",
            Category::Blue => "#1976d2",
            Category::Purple => "#6a1b9a",
            Category::Turquoise => "#0097a7",
        }
    }

    /// Key that starts a timer of this category from the todo list
    pub fn hotkey(self) -> char {
        match self {
            Category::Red => '1',
            Category::Blue => '2',
            Category::Purple => '3',
            Category::Turquoise => '4',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Category> {
        Category::ALL.into_iter().find(|cat| cat.hotkey() == c)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
