mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "turboshell",
    version,
    about = "Foreground window tracking and desktop docking for a Windows shell bar"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Dock the bar and track foreground windows until Ctrl+C
    Run,
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// Print every published payload as a JSON line
    Events,
    /// Print the primary monitor's work area
    WorkArea,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Run => commands::run::execute(),
        Commands::Debug { command } => match command {
            DebugCommands::Events => commands::debug::events::execute(),
            DebugCommands::WorkArea => commands::debug::work_area::execute(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
