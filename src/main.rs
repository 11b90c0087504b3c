// src/main.rs

use clap::CommandFactory;
use color_eyre::eyre::Result;
use subcheck_rs::app::{ScanConfig, ScanSession, render_summary};
use subcheck_rs::cli::Cli;
use subcheck_rs::core::scanner::dns_scanner::{HickoryLookup, render_report, run_dns_scan};
use subcheck_rs::core::scanner::sink::Destination;
use subcheck_rs::logging;
use tracing::{error, info};

const BANNER: &str = r#"
  SSSSS  U   U  BBBBB   CCCC  H   H  EEEEE  CCCC  K   K
 S       U   U  B    B C      H   H  E      C      K  K
  SSS    U   U  BBBBB  C      HHHHH  EEEE   C      KKK
     S   U   U  B    B C      H   H  E      C      K  K
 SSSSS    UUUU  BBBBB   CCCC  H   H  EEEEE  CCCC  K   K
"#;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    println!("{}", BANNER);

    // Too few arguments to describe any work: show usage and stop.
    if std::env::args().len() < 2 {
        Cli::command().print_help()?;
        return Ok(());
    }

    let cli = Cli::parse_args();
    if !cli.has_work() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let log_path = logging::initialize_logging(cli.verbose)?;
    info!(log = %log_path.display(), "Logging initialized.");

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            return Ok(());
        }
    };

    if let Some(domain) = &config.domain {
        let report = run_dns_scan(&HickoryLookup::new(), domain).await;
        println!("{}", render_report(&report));
    }

    if let Some(url) = &config.url {
        run_probe_scan(&config, url).await?;
    }

    Ok(())
}

async fn run_probe_scan(config: &ScanConfig, url: &str) -> Result<()> {
    // Configuration problems stop the run before any request goes out.
    let session = match ScanSession::prepare(config, url).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = ?e, "Scan setup failed.");
            println!("{:#}", e);
            return Ok(());
        }
    };
    println!(
        "[*] Probing {} candidates in {} mode with {} concurrent requests",
        session.candidate_count(),
        config.mode,
        config.concurrency
    );

    let outcome = session.execute().await?;
    println!("{}", render_summary(&outcome));
    if let Destination::File(path) = &config.destination {
        println!("Results saved to {}", path.display());
    }
    Ok(())
}
