use clap::Parser;
use ddevents::cli::{self, Cli, Commands, ConfigCommands, EventCommands};

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let result = match args.command {
        Commands::Serve(args) => cli::serve::run_serve(args).await,
        Commands::Event(command) => match command {
            EventCommands::Alert(args) => cli::event::handle_alert(&args).await,
            EventCommands::Change(args) => cli::event::handle_change(&args).await,
            EventCommands::Template(args) => cli::event::handle_template(&args).await,
            EventCommands::List(args) => cli::event::handle_list(&args).await,
            EventCommands::Get(args) => cli::event::handle_get(&args).await,
        },
        Commands::Config(ConfigCommands::Init(args)) => cli::handle_config_init(&args),
        Commands::Completions(args) => {
            cli::handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
