use clap::{ArgAction, Parser, Subcommand};
use commands::{config, search, tui, watched};

mod commands;
mod logging;
mod output;
mod ui;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "popcorn - search movies, rate them, keep a watched list")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    #[command(long_about = "Open the interactive search and watched-list UI. Type to search, Enter clears the search, Escape closes the open movie.")]
    Tui,
    /// Search the catalog by title
    Search {
        /// Title to search for (at least two characters)
        query: String,
    },
    /// Show full details for one movie
    Show {
        /// IMDb identifier, e.g. tt0372784
        imdb_id: String,
    },
    /// Rate a movie and add it to the watched list
    Rate {
        /// IMDb identifier, e.g. tt0372784
        imdb_id: String,

        /// Your rating, 1 to 10
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: u8,
    },
    /// Show the watched list and its averages
    Watched,
    /// Remove a movie from the watched list
    Remove {
        /// IMDb identifier, e.g. tt0372784
        imdb_id: String,
    },
    /// Manage configuration
    #[command(long_about = "Manage the popcorn configuration file. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear the watched list
    Clear {
        /// Do not ask for confirmation
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Interactive configuration wizard
    Init,
    /// Store an OMDb API key
    SetKey {
        /// The key issued by omdbapi.com
        api_key: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    // The TUI owns the terminal, so its logs go to the rotating file
    let log_file = match command {
        Commands::Tui => Some(popcorn_config::PathManager::default().log_file()),
        _ => None,
    };
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match command {
        Commands::Tui => tui::run_tui().await,
        Commands::Search { query } => search::run_search(&query, &output).await,
        Commands::Show { imdb_id } => search::run_show(&imdb_id, &output).await,
        Commands::Rate { imdb_id, rating } => watched::run_rate(&imdb_id, rating, &output).await,
        Commands::Watched => watched::run_watched(&output),
        Commands::Remove { imdb_id } => watched::run_remove(&imdb_id, &output),
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(cmd, &output)
        }
        Commands::Clear { yes } => watched::run_clear(yes, &output),
    };

    // Machine-readable callers get a single error record instead of the eyre report
    if let Err(e) = &result {
        if !output.is_human() {
            output.error(e.to_string());
            std::process::exit(1);
        }
    }
    result
}
