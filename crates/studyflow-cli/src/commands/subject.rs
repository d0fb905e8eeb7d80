use clap::Subcommand;
use serde_json::json;
use studyflow_core::model::Difficulty;
use studyflow_core::storage::Datastore;

use crate::common::{open_store, parse_difficulty, print_json};

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject
    Add { name: String },
    /// Add a topic under a subject
    AddTopic {
        #[arg(long)]
        subject: String,
        name: String,
    },
    /// Add a sub-topic under a topic
    AddSubTopic {
        #[arg(long)]
        topic: String,
        name: String,
        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,
    },
    /// Print the full subject tree as JSON
    List,
}

pub fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    match action {
        SubjectAction::Add { name } => {
            print_json(&store.insert_subject(&name)?)?;
        }
        SubjectAction::AddTopic { subject, name } => {
            print_json(&store.insert_topic(&subject, &name)?)?;
        }
        SubjectAction::AddSubTopic {
            topic,
            name,
            difficulty,
        } => {
            print_json(&store.insert_sub_topic(&topic, &name, difficulty)?)?;
        }
        SubjectAction::List => {
            let mut tree = Vec::new();
            for subject in store.subjects()? {
                let topics = store.topics_for_subject(&subject.id)?;
                let topic_ids: Vec<String> = topics.iter().map(|t| t.id.clone()).collect();
                let sub_topics = store.sub_topics_for_topics(&topic_ids)?;
                let topics: Vec<_> = topics
                    .into_iter()
                    .map(|topic| {
                        let children: Vec<_> = sub_topics
                            .iter()
                            .filter(|s| s.topic_id == topic.id)
                            .collect();
                        json!({ "topic": topic, "sub_topics": children })
                    })
                    .collect();
                tree.push(json!({ "subject": subject, "topics": topics }));
            }
            print_json(&tree)?;
        }
    }
    Ok(())
}
