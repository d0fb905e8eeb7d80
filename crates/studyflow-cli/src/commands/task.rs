use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use studyflow_core::model::{NewTask, Priority};
use studyflow_core::planner;
use studyflow_core::storage::Datastore;

use crate::common::{open_store, parse_priority, print_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task under a sub-topic
    Add {
        #[arg(long)]
        sub_topic: String,
        #[arg(long)]
        title: String,
        #[arg(long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: NaiveDate,
    },
    /// Mark a task completed
    Done {
        id: String,
    },
    /// List all tasks as JSON
    List,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    match action {
        TaskAction::Add {
            sub_topic,
            title,
            priority,
            due,
        } => {
            let task = planner::create_task(
                &store,
                NewTask {
                    sub_topic_id: sub_topic,
                    title,
                    priority,
                    due_date: due,
                },
                Utc::now().date_naive(),
            )?;
            print_json(&task)?;
        }
        TaskAction::Done { id } => {
            planner::complete_task(&store, &id, Utc::now())?;
        }
        TaskAction::List => {
            let sub_topic_ids: Vec<String> = store
                .all_sub_topics()?
                .into_iter()
                .map(|s| s.id)
                .collect();
            let tasks = store.tasks_for_sub_topics(&sub_topic_ids)?;
            print_json(&tasks)?;
        }
    }
    Ok(())
}
