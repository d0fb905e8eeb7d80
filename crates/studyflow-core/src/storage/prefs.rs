//! Small local flags on top of the kv table.

use serde::{Deserialize, Serialize};

use super::sqlite::SqliteStore;
use crate::error::DatastoreError;

const THEME_KEY: &str = "pref_theme";
const TUTORIAL_KEY: &str = "pref_tutorial_shown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

/// Typed accessors for the preference flags the app keeps locally.
pub struct Preferences<'a> {
    store: &'a SqliteStore,
}

impl<'a> Preferences<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    pub fn theme(&self) -> Result<Theme, DatastoreError> {
        Ok(match self.store.kv_get(THEME_KEY)?.as_deref() {
            Some("light") => Theme::Light,
            Some("dark") => Theme::Dark,
            _ => Theme::System,
        })
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), DatastoreError> {
        let value = match theme {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        };
        self.store.kv_set(THEME_KEY, value)
    }

    pub fn tutorial_shown(&self) -> Result<bool, DatastoreError> {
        Ok(self.store.kv_get(TUTORIAL_KEY)?.as_deref() == Some("true"))
    }

    pub fn set_tutorial_shown(&self, shown: bool) -> Result<(), DatastoreError> {
        self.store
            .kv_set(TUTORIAL_KEY, if shown { "true" } else { "false" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_defaults_to_system() {
        let store = SqliteStore::open_memory().unwrap();
        let prefs = Preferences::new(&store);
        assert_eq!(prefs.theme().unwrap(), Theme::System);
        prefs.set_theme(Theme::Dark).unwrap();
        assert_eq!(prefs.theme().unwrap(), Theme::Dark);
    }

    #[test]
    fn tutorial_flag_round_trips() {
        let store = SqliteStore::open_memory().unwrap();
        let prefs = Preferences::new(&store);
        assert!(!prefs.tutorial_shown().unwrap());
        prefs.set_tutorial_shown(true).unwrap();
        assert!(prefs.tutorial_shown().unwrap());
    }
}
