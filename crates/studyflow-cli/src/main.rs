use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "studyflow", version, about = "Studyflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Focus timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Two-phase focus/rest flow
    Flow {
        #[command(subcommand)]
        action: commands::flow::FlowAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Subject / topic / sub-topic management
    Subject {
        #[command(subcommand)]
        action: commands::subject::SubjectAction,
    },
    /// Confidence ratings
    Confidence {
        #[command(subcommand)]
        action: commands::confidence::ConfidenceAction,
    },
    /// Daily capacity limits
    Capacity {
        #[command(subcommand)]
        action: commands::capacity::CapacityAction,
    },
    /// Exam mode
    Exam {
        #[command(subcommand)]
        action: commands::exam::ExamAction,
    },
    /// Insight reports
    Insights {
        #[command(subcommand)]
        action: commands::insights::InsightsAction,
    },
    /// Local preferences
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Flow { action } => commands::flow::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Subject { action } => commands::subject::run(action),
        Commands::Confidence { action } => commands::confidence::run(action),
        Commands::Capacity { action } => commands::capacity::run(action),
        Commands::Exam { action } => commands::exam::run(action),
        Commands::Insights { action } => commands::insights::run(action),
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
