use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    clipship::cli::main().await
}
