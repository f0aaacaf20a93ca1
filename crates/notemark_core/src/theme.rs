//! Light/dark theme preference.
//!
//! # Responsibility
//! - Persist the binary theme preference under its own slot.
//! - Provide toggle semantics for the presentation layer.
//!
//! # Invariants
//! - The persisted value is the string `"light"` or `"dark"`.
//! - Unknown persisted values fall back to the default (logged), never
//!   fail.

use crate::store::kv::KvStore;
use log::warn;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Slot holding the persisted theme string.
pub const THEME_SLOT: &str = "theme";

/// The binary theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The persisted string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses the persisted string form.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// The opposite theme.
    pub fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme preference over the shared slot store.
///
/// Explicitly owned and injected wherever theme state is needed; there is
/// no ambient global to misuse.
pub struct ThemeSwitch {
    kv: Rc<KvStore>,
}

impl ThemeSwitch {
    pub fn new(kv: Rc<KvStore>) -> Self {
        Self { kv }
    }

    /// Returns the active theme, defaulting to light.
    pub fn current(&self) -> Theme {
        let Some(stored) = self.kv.get::<String>(THEME_SLOT) else {
            return Theme::default();
        };
        Theme::parse(&stored).unwrap_or_else(|| {
            warn!("event=theme_read module=theme status=unknown_value value={stored}");
            Theme::default()
        })
    }

    /// Persists an explicit theme choice.
    pub fn set(&self, theme: Theme) {
        self.kv.set(THEME_SLOT, &theme.as_str());
    }

    /// Flips the active theme, persists, and returns the new value.
    pub fn toggle(&self) -> Theme {
        let next = self.current().flipped();
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn string_form_round_trips() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::parse("solarized"), None);
    }

    #[test]
    fn flipping_twice_is_identity() {
        assert_eq!(Theme::Light.flipped().flipped(), Theme::Light);
        assert_eq!(Theme::Dark.flipped(), Theme::Light);
    }
}
