use clap::Parser;
use drive_upload::{cli, config::CheckArgs, logging};
use std::io;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CheckArgs::parse();

    if let Err(e) = logging::init("warn") {
        eprintln!("logging disabled: {e}");
    }

    cli::exit_code(cli::run_check(&args, || args.settings.connect(), &mut io::stdout()).await)
}
