use clap::Parser;
use env_logger::Env;
use iphoenix::cli::Args;
use iphoenix::Investigator;
use std::process::ExitCode;

fn display_banner() {
    println!();
    println!("    \x1b[38;5;208m╦╔═╗╦ ╦╔═╗╔═╗╔╗╔╦═╗ ╦\x1b[0m");
    println!("    \x1b[38;5;214m║╠═╝╠═╣║ ║║╣ ║║║║╔╩╦╝\x1b[0m");
    println!("    \x1b[38;5;220m╩╩  ╩ ╩╚═╝╚═╝╝╚╝╩╩ ╚═\x1b[0m  \x1b[38;5;240mv{}\x1b[0m", env!("CARGO_PKG_VERSION"));
    println!("    \x1b[3;38;5;147mpublic footprint investigation\x1b[0m");
    println!();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if !args.quiet {
        display_banner();
    }

    let log_level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    log::debug!("iPhoenix starting with args: {:?}", args);

    let outcome = match Investigator::new(args) {
        Ok(investigator) => investigator.run().await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            if e.is_input_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
