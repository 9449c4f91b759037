//! Transient view state. Never persisted.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum UiAction {
    ToggleSidebar,
    SetSidebar(bool),
    SetTheme(Theme),
    ToggleTheme,
    OpenModal(String),
    CloseModal(String),
    CloseAllModals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiState {
    sidebar_open: bool,
    theme: Theme,
    open_modals: BTreeSet<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            theme: Theme::default(),
            open_modals: BTreeSet::new(),
        }
    }
}

impl UiState {
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Unknown modal names are closed.
    pub fn is_modal_open(&self, name: &str) -> bool {
        self.open_modals.contains(name)
    }

    pub fn reduce(&mut self, action: UiAction) {
        match action {
            UiAction::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
            UiAction::SetSidebar(open) => self.sidebar_open = open,
            UiAction::SetTheme(theme) => self.theme = theme,
            UiAction::ToggleTheme => self.theme = self.theme.toggled(),
            UiAction::OpenModal(name) => {
                self.open_modals.insert(name);
            }
            UiAction::CloseModal(name) => {
                self.open_modals.remove(&name);
            }
            UiAction::CloseAllModals => self.open_modals.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modals_are_keyed_by_name() {
        let mut ui = UiState::default();
        assert!(!ui.is_modal_open("apply"));

        ui.reduce(UiAction::OpenModal("apply".into()));
        ui.reduce(UiAction::OpenModal("upload".into()));
        assert!(ui.is_modal_open("apply"));

        ui.reduce(UiAction::CloseModal("apply".into()));
        assert!(!ui.is_modal_open("apply"));
        assert!(ui.is_modal_open("upload"));

        ui.reduce(UiAction::CloseAllModals);
        assert!(!ui.is_modal_open("upload"));
        assert_eq!(ui, UiState::default());
    }

    #[test]
    fn closing_an_unknown_modal_changes_nothing() {
        let mut ui = UiState::default();
        ui.reduce(UiAction::CloseModal("never-opened".into()));
        assert_eq!(ui, UiState::default());
    }

    #[test]
    fn sidebar_and_theme_toggle() {
        let mut ui = UiState::default();
        assert!(ui.sidebar_open());
        ui.reduce(UiAction::ToggleSidebar);
        assert!(!ui.sidebar_open());

        ui.reduce(UiAction::ToggleTheme);
        assert_eq!(ui.theme(), Theme::Dark);
        assert_eq!(ui.theme().to_string(), "dark");
    }
}
