use clap::Parser;
use credkeep::cli::commands;
use credkeep::cli::{open_manager, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    credkeep::logging::init(cli.verbose);

    // One manager per invocation, passed by reference to the command.
    let manager = match open_manager(&cli) {
        Ok(manager) => manager,
        Err(e) => {
            credkeep::cli::output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Set {
            ref credential_type,
            ref key,
            ref value,
            ref meta,
            ref expires_in,
        } => commands::set::execute(
            &manager,
            credential_type,
            key,
            value.as_deref(),
            meta,
            expires_in.as_deref(),
        ),
        Commands::Get { ref key, show } => commands::get::execute(&manager, key, show),
        Commands::Update {
            ref key,
            ref value,
            ref meta,
        } => commands::update::execute(&manager, key, value.as_deref(), meta),
        Commands::Delete { ref key } => commands::delete::execute(&manager, key),
        Commands::List => commands::list::execute(&manager),
        Commands::Clear { force } => commands::clear::execute(&manager, force),
        Commands::Refresh {
            ref key,
            ref duration,
        } => commands::refresh::execute(&manager, key, duration),
        Commands::Status => commands::status::execute(&manager),
        Commands::Cleanup => commands::cleanup::execute(&manager),
        Commands::Validate => commands::validate::execute(&manager),
    };

    if let Err(e) = result {
        credkeep::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
