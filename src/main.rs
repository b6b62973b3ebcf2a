use clap::Parser;
use drive_upload::{auth, cli, config::UploadArgs, logging};
use std::io;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = UploadArgs::parse();

    if let Err(e) = logging::init("warn") {
        eprintln!("logging disabled: {e}");
    }

    let settings = &args.settings;
    let status = cli::run_upload(
        &args,
        move || async move {
            let client = settings.connect().await?;
            Ok::<_, auth::Error>(client.with_progress_listener(Arc::new(Mutex::new(
                |name: Arc<String>, pos: usize, total: usize| {
                    tracing::debug!(%name, "{pos}/{total}");
                },
            ))))
        },
        &mut io::stdout(),
    )
    .await;

    cli::exit_code(status)
}
