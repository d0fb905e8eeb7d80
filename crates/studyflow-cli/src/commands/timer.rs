use clap::Subcommand;
use studyflow_core::model::{QualityRating, SessionType};
use studyflow_core::planner;
use studyflow_core::storage::{Config, Datastore};
use studyflow_core::timer::SessionContext;
use studyflow_core::Event;

use crate::common::{
    handle_outcome, load_timer, open_store, parse_rating, print_json, save_timer,
};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a focus session (stops any live one first)
    Start {
        /// Target duration in minutes; defaults from capacity or config
        #[arg(long)]
        minutes: Option<u32>,
        /// Subject to attribute the session to
        #[arg(long)]
        subject: Option<String>,
        /// Topic to attribute the session to
        #[arg(long)]
        topic: Option<String>,
        /// Sub-topic to attribute the session to
        #[arg(long)]
        sub_topic: Option<String>,
        /// Task to attribute the session to
        #[arg(long)]
        task: Option<String>,
    },
    /// Pause the running session
    Pause,
    /// Resume a paused session
    Resume,
    /// Re-derive elapsed time; auto-stops when the target is reached
    Tick,
    /// Stop the session (records it when long enough)
    Stop,
    /// Print current timer state as JSON
    Status,
    /// Rate a recorded session's quality
    Rate {
        /// Session id printed when the session was recorded
        #[arg(long)]
        id: String,
        #[arg(long, value_parser = parse_rating)]
        rating: QualityRating,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let mut timer = load_timer(&store);

    match action {
        TimerAction::Start {
            minutes,
            subject,
            topic,
            sub_topic,
            task,
        } => {
            let minutes = match minutes {
                Some(m) => m,
                None => default_focus_minutes(&store)?,
            };
            let context = SessionContext {
                subject_id: subject,
                topic_id: topic,
                sub_topic_id: sub_topic,
                task_id: task,
                session_type: SessionType::Focus,
            };
            let event = timer.start(Some(minutes * 60), context);
            if let Event::TimerStarted {
                interrupted: Some(ref outcome),
                ..
            } = event
            {
                handle_outcome(&store, outcome);
            }
            save_timer(&store, &timer)?;
            print_json(&event)?;
        }
        TimerAction::Pause => {
            if let Some(event) = timer.pause() {
                save_timer(&store, &timer)?;
                print_json(&event)?;
            }
        }
        TimerAction::Resume => {
            if let Some(event) = timer.resume() {
                save_timer(&store, &timer)?;
                print_json(&event)?;
            }
        }
        TimerAction::Tick => {
            if let Some(event) = timer.tick() {
                if let Event::TimerCompleted { ref outcome, .. } = event {
                    handle_outcome(&store, outcome);
                }
                save_timer(&store, &timer)?;
                print_json(&event)?;
            } else {
                save_timer(&store, &timer)?;
                print_json(&timer.snapshot())?;
            }
        }
        TimerAction::Stop => {
            if let Some(event) = timer.stop() {
                if let Event::TimerStopped { ref outcome, .. } = event {
                    handle_outcome(&store, outcome);
                }
                save_timer(&store, &timer)?;
                print_json(&event)?;
            }
        }
        TimerAction::Status => {
            print_json(&timer.snapshot())?;
        }
        TimerAction::Rate { id, rating } => {
            planner::rate_session(&store, &id, rating)?;
        }
    }
    Ok(())
}

/// --minutes falls back to the capacity record, then the config file.
fn default_focus_minutes(
    store: &impl Datastore,
) -> Result<u32, Box<dyn std::error::Error>> {
    if let Some(capacity) = store.user_capacity()? {
        return Ok(capacity.default_focus_minutes);
    }
    Ok(Config::load()?.timer.default_focus_minutes)
}
