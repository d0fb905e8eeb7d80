use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use studyflow_core::planner;
use studyflow_core::storage::Datastore;

use crate::common::{open_store, print_json};

#[derive(Subcommand)]
pub enum ExamAction {
    /// Activate exam mode (replaces any active exam)
    Set {
        #[arg(long)]
        name: String,
        /// Exam date, YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
    },
    /// Deactivate exam mode
    Clear,
    /// Print the active exam as JSON
    Show,
}

pub fn run(action: ExamAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    match action {
        ExamAction::Set { name, date } => {
            planner::set_exam(&store, &name, date, Utc::now().date_naive())?;
        }
        ExamAction::Clear => {
            planner::clear_exam(&store)?;
        }
        ExamAction::Show => match store.active_exam()? {
            Some(exam) => print_json(&exam)?,
            None => eprintln!("no active exam"),
        },
    }
    Ok(())
}
