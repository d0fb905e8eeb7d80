use clap::Subcommand;
use studyflow_core::model::SessionType;
use studyflow_core::storage::{Config, Datastore};
use studyflow_core::timer::{FlowTimer, SessionContext};
use studyflow_core::Event;

use crate::common::{clear_flow, handle_outcome, load_flow, open_store, print_json, save_flow};

#[derive(Subcommand)]
pub enum FlowAction {
    /// Start a focus + rest flow
    Start {
        /// Focus phase length in minutes; defaults from capacity or config
        #[arg(long)]
        focus_minutes: Option<u32>,
        /// Rest phase length in minutes; defaults from capacity or config
        #[arg(long)]
        rest_minutes: Option<u32>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        sub_topic: Option<String>,
        #[arg(long)]
        task: Option<String>,
    },
    /// Re-derive elapsed time; drives focus -> rest -> complete
    Tick,
    /// Pause the current phase
    Pause,
    /// Resume a paused phase
    Resume,
    /// Jump straight to complete without waiting out the rest
    SkipRest,
    /// Abandon the flow; a long-enough partial session still records
    Abandon,
    /// Print current flow state as JSON
    Status,
}

pub fn run(action: FlowAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;

    let action = match action {
        FlowAction::Start {
            focus_minutes,
            rest_minutes,
            subject,
            topic,
            sub_topic,
            task,
        } => {
            let (default_focus, default_rest) = phase_defaults(&store)?;
            let context = SessionContext {
                subject_id: subject,
                topic_id: topic,
                sub_topic_id: sub_topic,
                task_id: task,
                session_type: SessionType::Focus,
            };
            let (flow, event) = FlowTimer::start(
                focus_minutes.unwrap_or(default_focus) * 60,
                rest_minutes.unwrap_or(default_rest) * 60,
                context,
            );
            save_flow(&store, &flow)?;
            print_json(&event)?;
            return Ok(());
        }
        other => other,
    };

    let Some(mut flow) = load_flow(&store) else {
        eprintln!("no flow in progress; start one with: studyflow flow start");
        return Ok(());
    };

    let events = match action {
        FlowAction::Start { .. } => unreachable!("handled above"),
        FlowAction::Tick => flow.tick(),
        FlowAction::Pause => flow.pause().into_iter().collect(),
        FlowAction::Resume => flow.resume().into_iter().collect(),
        FlowAction::SkipRest => flow.skip_rest(),
        FlowAction::Abandon => flow.abandon(),
        FlowAction::Status => {
            print_json(&flow.snapshot())?;
            return Ok(());
        }
    };

    let mut completed = false;
    for event in &events {
        match event {
            Event::TimerCompleted { outcome, .. } | Event::TimerStopped { outcome, .. } => {
                handle_outcome(&store, outcome);
            }
            Event::FlowCompleted { .. } => completed = true,
            _ => {}
        }
        print_json(event)?;
    }
    if completed {
        clear_flow(&store)?;
    } else {
        save_flow(&store, &flow)?;
    }
    Ok(())
}

fn phase_defaults(store: &impl Datastore) -> Result<(u32, u32), Box<dyn std::error::Error>> {
    if let Some(capacity) = store.user_capacity()? {
        return Ok((capacity.default_focus_minutes, capacity.default_break_minutes));
    }
    let config = Config::load()?;
    Ok((
        config.timer.default_focus_minutes,
        config.timer.default_rest_minutes,
    ))
}
