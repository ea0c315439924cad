use taktline::commands::Cli;
use taktline::libs::messages::{macros::is_debug_mode, Message};
use taktline::msg_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    if is_debug_mode() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("taktline=debug"));
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    }

    if let Err(e) = Cli::menu().await {
        msg_error!(Message::CommandFailed(format!("{:#}", e)));
        std::process::exit(1);
    }
}
