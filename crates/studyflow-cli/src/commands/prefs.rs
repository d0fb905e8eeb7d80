use clap::Subcommand;
use studyflow_core::storage::{Preferences, Theme};

use crate::common::open_store;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Get or set the theme
    Theme {
        /// light | dark | system; omit to print the current value
        value: Option<String>,
    },
    /// Mark the tutorial as seen (or reset it with --reset)
    Tutorial {
        #[arg(long)]
        reset: bool,
    },
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let prefs = Preferences::new(&store);
    match action {
        PrefsAction::Theme { value } => match value.as_deref() {
            Some("light") => prefs.set_theme(Theme::Light)?,
            Some("dark") => prefs.set_theme(Theme::Dark)?,
            Some("system") => prefs.set_theme(Theme::System)?,
            Some(other) => {
                return Err(format!("unknown theme '{other}' (light|dark|system)").into())
            }
            None => println!("{}", serde_json::to_string(&prefs.theme()?)?),
        },
        PrefsAction::Tutorial { reset } => {
            prefs.set_tutorial_shown(!reset)?;
        }
    }
    Ok(())
}
