use clap::Parser;
use ribogate::{cli, commands};

fn main() {
    let args = cli::Args::parse();

    let result = match args.command {
        cli::Commands::Run {
            input_dir,
            output_dir,
            config,
            single,
        } => commands::run::run(input_dir, output_dir, config, single),
        cli::Commands::CheckTools { config } => commands::check_tools::run(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
