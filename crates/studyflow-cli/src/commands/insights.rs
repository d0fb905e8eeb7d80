use chrono::Utc;
use clap::Subcommand;
use serde_json::json;
use studyflow_core::insights::{
    best_study_time, capacity_insights, revision_suggestions, subject_health, weekly_review,
};
use studyflow_core::storage::Datastore;

use crate::common::{open_store, print_json};

#[derive(Subcommand)]
pub enum InsightsAction {
    /// Subject health scores (one subject, or all)
    Health {
        /// Subject id; omit to score every subject
        #[arg(long)]
        subject: Option<String>,
    },
    /// Ranked revision suggestions
    Revise {
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Capacity adherence for the trailing week
    Capacity,
    /// Weekly review summary
    Weekly,
    /// Best study time over the trailing month
    BestTime,
}

pub fn run(action: InsightsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let now = Utc::now();
    let today = now.date_naive();

    match action {
        InsightsAction::Health { subject } => match subject {
            Some(id) => print_json(&subject_health(&store, &id, today))?,
            None => {
                // Each subject is computed independently; a failure shows
                // up as null for that subject without hiding the rest.
                let results: Vec<_> = store
                    .subjects()?
                    .into_iter()
                    .map(|s| {
                        let health = subject_health(&store, &s.id, today);
                        json!({ "subject": s, "health": health })
                    })
                    .collect();
                print_json(&results)?;
            }
        },
        InsightsAction::Revise { limit } => {
            print_json(&revision_suggestions(&store, now, limit))?;
        }
        InsightsAction::Capacity => match capacity_insights(&store, today) {
            Some(insights) => print_json(&insights)?,
            None => eprintln!("capacity tracking is off; opt in with: studyflow capacity set"),
        },
        InsightsAction::Weekly => match weekly_review(&store, today) {
            Some(review) => {
                print_json(&review)?;
                eprintln!(
                    "{} of focus across {} sessions this week",
                    studyflow_core::format_minutes(review.total_focus_minutes),
                    review.session_count
                );
            }
            None => eprintln!("weekly review unavailable"),
        },
        InsightsAction::BestTime => match best_study_time(&store, now) {
            Some(insight) => {
                print_json(&insight)?;
                eprintln!("You study best {}", insight.band.label());
            }
            None => eprintln!("not enough sessions yet to spot a pattern"),
        },
    }
    Ok(())
}
