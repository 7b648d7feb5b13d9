use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = devserve::cli::Cli::parse();
    if let Err(e) = devserve::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
