use draft7_validate::cli;
use draft7_validate::config::CliConfig;
use draft7_validate::report::Report;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let report = match CliConfig::from_env() {
        Ok(config) => {
            let args: Vec<String> = std::env::args().collect();
            cli::run(&args, &config).await
        }
        Err(e) => {
            tracing::error!("configuration error: {e}");
            Report::unexpected(format!("configuration error: {e}"), e)
        }
    };

    match serde_json::to_string(&report) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("{}: cannot serialize report: {e}", cli::PROGRAM);
            std::process::exit(1);
        }
    }
    std::process::exit(report.exit_code());
}
