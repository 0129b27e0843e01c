mod crawler;
mod fetcher;
mod link_filter;
mod page;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use clap::Parser;

use crawler::Crawler;
use fetcher::http_client;
use page::Page;

#[derive(Parser, Debug)]
#[command(version, about = "Visit every same-domain page reachable from a root URL")]
pub struct Cli {
    /// The root URL to crawl
    url: String,
    /// How many pages may be fetched concurrently
    #[arg(short, long, default_value_t = 100)]
    workers: u16,
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", e.to_string());
            return;
        }
    };

    if let Some(log_level) = args.log_level {
        tracing_subscriber::fmt()
            .with_env_filter(format!("scurry={}", log_level))
            .compact()
            .init();
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.store(true, Ordering::Relaxed);
        }
    });

    let crawler = Crawler {
        link_source: Page::new(http_client()),
        worker_pool_size: args.workers,
        max_retries: 3,
        initial_retry_delay_ms: 250,
        cancel,
    };

    match crawler.crawl(&args.url).await {
        Ok(visited) => tracing::info!("Visited {} pages", visited.len()),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
