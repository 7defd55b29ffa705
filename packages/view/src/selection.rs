//! Pinned/hovered selection of one map view.
//!
//! Clicking pins an entity so the detail panel stays on it while the
//! pointer keeps moving; hovering only matters while nothing is pinned.

use price_map_stats_models::EntityKey;

/// Which of the four selection states the view is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase<'a> {
    /// Nothing pinned or hovered.
    Empty,
    /// Pointer over an entity, nothing pinned.
    Hovering(&'a str),
    /// An entity is pinned, pointer elsewhere.
    Pinned(&'a str),
    /// An entity is pinned and the pointer is over an entity (possibly the
    /// same one).
    PinnedAndHovering {
        /// The pinned entity.
        pinned: &'a str,
        /// The hovered entity.
        hovered: &'a str,
    },
}

/// Outline decoration of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Decoration {
    /// Not selected.
    Base,
    /// Under the pointer.
    Hovered,
    /// Pinned by a click.
    Pinned,
}

impl Decoration {
    /// Outline weight of the decoration.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Base => 1,
            Self::Hovered => 2,
            Self::Pinned => 3,
        }
    }
}

/// Two-slot selection state: a pinned entity and a hovered entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pinned: Option<EntityKey>,
    hovered: Option<EntityKey>,
}

impl SelectionState {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pinned: None,
            hovered: None,
        }
    }

    /// Creates a selection from explicit slots, ignoring blank keys.
    #[must_use]
    pub fn from_parts(pinned: Option<&str>, hovered: Option<&str>) -> Self {
        let slot = |key: Option<&str>| {
            key.map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string)
        };
        Self {
            pinned: slot(pinned),
            hovered: slot(hovered),
        }
    }

    /// Pointer entered `key`. The pinned slot is left alone.
    pub fn on_hover(&mut self, key: impl Into<EntityKey>) {
        self.hovered = Some(key.into());
    }

    /// Pointer left the hovered entity.
    pub fn on_leave(&mut self) {
        self.hovered = None;
    }

    /// `key` was clicked and becomes the pinned entity.
    ///
    /// Returns the previously pinned key when it differs from `key`; the
    /// caller must reset that entity's decoration.
    pub fn on_click(&mut self, key: impl Into<EntityKey>) -> Option<EntityKey> {
        let key = key.into();
        match self.pinned.replace(key) {
            Some(previous) if Some(&previous) != self.pinned.as_ref() => Some(previous),
            _ => None,
        }
    }

    /// Clears both slots (navigation, period or metric change).
    pub fn on_reset(&mut self) {
        self.pinned = None;
        self.hovered = None;
    }

    /// The pinned entity.
    #[must_use]
    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    /// The hovered entity.
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// The entity the detail panel shows: pinned wins over hovered.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.pinned().or_else(|| self.hovered())
    }

    /// The current state as one of the four phases.
    #[must_use]
    pub fn phase(&self) -> SelectionPhase<'_> {
        match (self.pinned(), self.hovered()) {
            (None, None) => SelectionPhase::Empty,
            (None, Some(hovered)) => SelectionPhase::Hovering(hovered),
            (Some(pinned), None) => SelectionPhase::Pinned(pinned),
            (Some(pinned), Some(hovered)) => SelectionPhase::PinnedAndHovering { pinned, hovered },
        }
    }

    /// Decoration of `key`. Pinned wins when the entity is also hovered.
    #[must_use]
    pub fn decoration(&self, key: &str) -> Decoration {
        if self.pinned() == Some(key) {
            Decoration::Pinned
        } else if self.hovered() == Some(key) {
            Decoration::Hovered
        } else {
            Decoration::Base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_wins_over_hover_until_reset() {
        let mut selection = SelectionState::new();
        selection.on_click("A");
        assert_eq!(selection.phase(), SelectionPhase::Pinned("A"));

        selection.on_hover("B");
        assert_eq!(selection.active(), Some("A"));
        assert_eq!(
            selection.phase(),
            SelectionPhase::PinnedAndHovering {
                pinned: "A",
                hovered: "B"
            }
        );

        selection.on_leave();
        assert_eq!(selection.active(), Some("A"));

        selection.on_reset();
        assert_eq!(selection.active(), None);
        assert_eq!(selection.phase(), SelectionPhase::Empty);
    }

    #[test]
    fn hover_alone_is_active() {
        let mut selection = SelectionState::new();
        selection.on_hover("B");
        assert_eq!(selection.phase(), SelectionPhase::Hovering("B"));
        assert_eq!(selection.active(), Some("B"));
        selection.on_leave();
        assert_eq!(selection.active(), None);
    }

    #[test]
    fn click_reports_previously_pinned_entity() {
        let mut selection = SelectionState::new();
        assert_eq!(selection.on_click("A"), None);
        assert_eq!(selection.on_click("A"), None);
        assert_eq!(selection.on_click("B"), Some("A".to_string()));
        assert_eq!(selection.pinned(), Some("B"));
    }

    #[test]
    fn click_keeps_hover_slot() {
        let mut selection = SelectionState::new();
        selection.on_hover("A");
        selection.on_click("A");
        assert_eq!(selection.hovered(), Some("A"));
        assert_eq!(selection.decoration("A"), Decoration::Pinned);
    }

    #[test]
    fn decorations() {
        let mut selection = SelectionState::new();
        selection.on_click("A");
        selection.on_hover("B");
        assert_eq!(selection.decoration("A").weight(), 3);
        assert_eq!(selection.decoration("B").weight(), 2);
        assert_eq!(selection.decoration("C").weight(), 1);
    }

    #[test]
    fn from_parts_ignores_blank_keys() {
        let selection = SelectionState::from_parts(Some("  "), Some("臺北市大安區"));
        assert_eq!(selection.pinned(), None);
        assert_eq!(selection.active(), Some("臺北市大安區"));
    }
}
