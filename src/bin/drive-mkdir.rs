use clap::Parser;
use drive_upload::{cli, config::MkdirArgs, logging};
use std::io;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = MkdirArgs::parse();

    if let Err(e) = logging::init("warn") {
        eprintln!("logging disabled: {e}");
    }

    cli::exit_code(cli::run_mkdir(&args, || args.settings.connect(), &mut io::stdout()).await)
}
