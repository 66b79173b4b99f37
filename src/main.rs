use clap::Parser;
use roce_screener::cli::{run, Cli};
use roce_screener::logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_json);
    run(cli)
}
