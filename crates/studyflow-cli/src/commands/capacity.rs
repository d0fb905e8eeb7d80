use clap::Subcommand;
use studyflow_core::model::UserCapacity;
use studyflow_core::planner;
use studyflow_core::storage::Datastore;

use crate::common::{open_store, print_json};

#[derive(Subcommand)]
pub enum CapacityAction {
    /// Configure daily capacity limits
    Set {
        #[arg(long)]
        max_tasks: u32,
        #[arg(long)]
        max_focus_minutes: u32,
        #[arg(long, default_value = "25")]
        default_focus_minutes: u32,
        #[arg(long, default_value = "5")]
        default_break_minutes: u32,
        #[arg(long, default_value = "4")]
        recommended_sessions: u32,
    },
    /// Print the configured limits as JSON
    Show,
}

pub fn run(action: CapacityAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    match action {
        CapacityAction::Set {
            max_tasks,
            max_focus_minutes,
            default_focus_minutes,
            default_break_minutes,
            recommended_sessions,
        } => {
            planner::set_capacity(
                &store,
                &UserCapacity {
                    max_tasks_per_day: max_tasks,
                    max_daily_focus_minutes: max_focus_minutes,
                    default_focus_minutes,
                    default_break_minutes,
                    recommended_sessions_per_day: recommended_sessions,
                },
            )?;
        }
        CapacityAction::Show => match store.user_capacity()? {
            Some(capacity) => print_json(&capacity)?,
            None => eprintln!("no capacity configured; set one with: studyflow capacity set"),
        },
    }
    Ok(())
}
