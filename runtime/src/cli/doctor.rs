//! Environment readiness check.

use crate::config::{FeedArgs, Strategy};
use crate::renderer::chromium::find_chromium;
use anyhow::Result;

/// Check API URL configuration and, for the render strategy, Chromium.
pub async fn run(feed: FeedArgs) -> Result<()> {
    println!("Stockwatch Doctor");
    println!("=================");
    println!();
    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    let mut ready = true;

    match feed.api_base() {
        Ok(Some(base)) => {
            println!("[OK] API URL: {base}");
            if feed.strategy == Strategy::Poll {
                println!("     stock:   {}", feed.stock_url(&base));
            } else {
                println!("     relay:   {}", feed.upload_url(&base));
            }
            match feed.weather_url(&base) {
                Some(url) => println!("     weather: {url}"),
                None => println!("     weather: disabled"),
            }
        }
        Ok(None) => {
            println!("[!!] API URL not set. The server will run without the ingestion loop.");
        }
        Err(e) => {
            println!("[!!] {e:#}");
            ready = false;
        }
    }

    match (feed.strategy, find_chromium()) {
        (_, Some(path)) => println!("[OK] Chromium found: {}", path.display()),
        (Strategy::Render, None) => {
            println!("[!!] Chromium NOT found. Set STOCKWATCH_CHROMIUM_PATH.");
            ready = false;
        }
        (Strategy::Poll, None) => println!("[--] Chromium not found (not needed for poll)"),
    }

    println!();
    if ready {
        println!("Ready.");
    } else {
        println!("Not ready. Fix the [!!] items above.");
    }
    Ok(())
}
