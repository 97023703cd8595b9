use pagelens::commands::command_argument_builder;
use pagelens::handlers::{handle_analyze, handle_serve, init_logging, print_banner};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    init_logging(verbose, quiet);

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let outcome = match chosen_command.subcommand() {
        Some(("analyze", primary_command)) => handle_analyze(primary_command, quiet).await,
        Some(("serve", primary_command)) => handle_serve(primary_command).await,
        // No subcommand provided, just show the banner
        None => Ok(()),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}
