use chrono::Utc;
use clap::Subcommand;
use studyflow_core::model::ConfidenceLevel;
use studyflow_core::planner;
use studyflow_core::storage::Datastore;

use crate::common::{open_store, parse_confidence, print_json};

#[derive(Subcommand)]
pub enum ConfidenceAction {
    /// Rate confidence for a sub-topic (also logs a review)
    Rate {
        #[arg(long)]
        sub_topic: String,
        #[arg(long, value_parser = parse_confidence)]
        level: ConfidenceLevel,
    },
    /// Print all current ratings as JSON
    List,
}

pub fn run(action: ConfidenceAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    match action {
        ConfidenceAction::Rate { sub_topic, level } => {
            planner::set_confidence(&store, &sub_topic, level, Utc::now())?;
        }
        ConfidenceAction::List => {
            print_json(&store.confidence_ratings()?)?;
        }
    }
    Ok(())
}
