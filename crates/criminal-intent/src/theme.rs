//! Visual themes and the persisted theme selection.
//!
//! The set of themes is fixed at compile time. The selected theme id is kept
//! under its own key in the same [`KeyValueStore`] as the records; when that
//! key is absent or names an unknown theme, the first theme is used.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::kv::KeyValueStore;

/// Key under which the selected theme id is stored.
pub const THEME_STORAGE_KEY: &str = "selectedTheme";

/// Colors used by a theme, as `#RRGGBB` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    /// Screen background.
    pub background: &'static str,
    /// Cards and list rows.
    pub surface: &'static str,
    /// Headers and primary actions.
    pub primary: &'static str,
    /// Body text.
    pub text: &'static str,
    /// Dates and secondary text.
    pub text_secondary: &'static str,
    /// Separators and outlines.
    pub border: &'static str,
    /// Solved marker and save action.
    pub accent: &'static str,
}

/// A named, selectable theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Stable identifier persisted as the selection.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Whether this is a dark theme.
    pub is_dark: bool,
    /// The theme's colors.
    pub colors: ThemeColors,
}

/// All available themes. The first one is the default.
pub const THEMES: &[Theme] = &[
    Theme {
        id: "light",
        name: "Light",
        is_dark: false,
        colors: ThemeColors {
            background: "#FFFFFF",
            surface: "#F8F9FA",
            primary: "#007AFF",
            text: "#000000",
            text_secondary: "#666666",
            border: "#E1E1E1",
            accent: "#FF3B30",
        },
    },
    Theme {
        id: "blue",
        name: "Ocean Blue",
        is_dark: false,
        colors: ThemeColors {
            background: "#F0F8FF",
            surface: "#E6F3FF",
            primary: "#0066CC",
            text: "#1A1A1A",
            text_secondary: "#4A4A4A",
            border: "#B3D9FF",
            accent: "#FF6B35",
        },
    },
    Theme {
        id: "dark",
        name: "Dark",
        is_dark: true,
        colors: ThemeColors {
            background: "#121212",
            surface: "#1E1E1E",
            primary: "#BB86FC",
            text: "#FFFFFF",
            text_secondary: "#AAAAAA",
            border: "#333333",
            accent: "#CF6679",
        },
    },
    Theme {
        id: "midnight",
        name: "Midnight Blue",
        is_dark: true,
        colors: ThemeColors {
            background: "#0D1B2A",
            surface: "#1B263B",
            primary: "#6C9BD1",
            text: "#FFFFFF",
            text_secondary: "#B8C5D1",
            border: "#415A77",
            accent: "#F77F00",
        },
    },
];

/// The theme used when nothing valid is stored.
#[must_use]
pub fn default_theme() -> &'static Theme {
    &THEMES[0]
}

/// Look up a theme by id.
#[must_use]
pub fn find_theme(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|theme| theme.id == id)
}

/// Owns the current theme selection and persists changes to it.
#[derive(Debug, Clone)]
pub struct ThemeProvider {
    store: Arc<dyn KeyValueStore>,
    current: &'static Theme,
}

impl ThemeProvider {
    /// Create a provider showing the default theme, without reading the store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: default_theme(),
        }
    }

    /// Create a provider and restore the saved selection.
    ///
    /// A failed read or an unknown saved id leaves the default theme in
    /// place; the failure is logged, not returned.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut provider = Self::new(store);
        match provider.store.get(THEME_STORAGE_KEY).await {
            Ok(Some(saved)) => match find_theme(&saved) {
                Some(theme) => {
                    debug!(theme = theme.id, "Restored saved theme");
                    provider.current = theme;
                }
                None => warn!(saved = %saved, "Ignoring unknown saved theme"),
            },
            Ok(None) => debug!("No saved theme, using default"),
            Err(e) => warn!("Error loading theme: {e}"),
        }
        provider
    }

    /// The active theme.
    #[must_use]
    pub fn current(&self) -> &'static Theme {
        self.current
    }

    /// Every selectable theme.
    #[must_use]
    pub fn available(&self) -> &'static [Theme] {
        THEMES
    }

    /// Select and persist the theme with `id`.
    ///
    /// The selection only changes once the store has accepted the new id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTheme`] for an id not in [`THEMES`], or the
    /// store's error if the write fails.
    pub async fn set_theme(&mut self, id: &str) -> Result<&'static Theme> {
        let theme = find_theme(id).ok_or_else(|| Error::UnknownTheme(id.to_string()))?;
        self.store.set(THEME_STORAGE_KEY, theme.id).await?;
        self.current = theme;
        info!(theme = theme.id, "Theme changed");
        Ok(theme)
    }
}
