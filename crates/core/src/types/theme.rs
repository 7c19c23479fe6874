//! Light/dark theme shared with other page components through client storage.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Document theme, stored under the `theme` key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme (the fallback for any unrecognized value).
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Value written to storage and to the document's `data-theme` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Resolve the theme to apply.
    ///
    /// The stored value wins, then the document's current attribute. Only an
    /// exact `"dark"` selects the dark theme; everything else is light.
    #[must_use]
    pub fn resolve(stored: Option<&str>, current: Option<&str>) -> Self {
        match stored.or(current) {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_value_wins() {
        assert_eq!(Theme::resolve(Some("dark"), Some("light")), Theme::Dark);
        assert_eq!(Theme::resolve(Some("light"), Some("dark")), Theme::Light);
    }

    #[test]
    fn test_falls_back_to_current_attribute() {
        assert_eq!(Theme::resolve(None, Some("dark")), Theme::Dark);
        assert_eq!(Theme::resolve(None, None), Theme::Light);
    }

    #[test]
    fn test_unrecognized_is_light() {
        assert_eq!(Theme::resolve(Some("sepia"), Some("dark")), Theme::Light);
        assert_eq!(Theme::resolve(Some("DARK"), None), Theme::Light);
    }
}
