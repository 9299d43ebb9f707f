//! SnappyMail release packager.
//!
//! Builds the release archives and optional platform packages of a SnappyMail
//! source tree. Ctrl-C aborts the run and restores the source tree.

use env_logger::Env;
use snappymail_release::cli;
use std::process;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse_args();

    // RUST_LOG wins over -v/-q
    env_logger::Builder::from_env(
        Env::default().default_filter_or(args.log_level().to_string()),
    )
    .init();

    let exit_code = tokio::select! {
        result = cli::run(args) => match result {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                for suggestion in e.recovery_suggestions() {
                    eprintln!("  hint: {}", suggestion);
                }
                e.exit_code()
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted; source tree restored");
            130
        }
    };

    process::exit(exit_code);
}
