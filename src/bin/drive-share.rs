use clap::Parser;
use drive_upload::{cli, config::ShareArgs, logging};
use std::io;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = ShareArgs::parse();

    if let Err(e) = logging::init("warn") {
        eprintln!("logging disabled: {e}");
    }

    cli::exit_code(cli::run_share(&args, || args.settings.connect(), &mut io::stdout()).await)
}
