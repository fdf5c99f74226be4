use abc_directory::{cli::parse_args, configuration::get_configuration, startup::run};
use env_logger::Env;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = try_main().await {
        log::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}

async fn try_main() -> anyhow::Result<()> {
    let command = parse_args(std::env::args().skip(1))?;
    let configuration = get_configuration()?;

    log::info!("ABC Directory Scraper");

    run(command, configuration).await
}
