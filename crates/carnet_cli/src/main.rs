//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `carnet_core` wiring without a
//!   rendering surface: open a cache, reconcile, print a summary.
//! - Keep output deterministic for quick local sanity checks.

use carnet_core::db::open_cache_db;
use carnet_core::{planned_dates, NoRemote, PersistenceGateway, SqliteCacheRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("carnet_core version={}", carnet_core::core_version());

    // Optional argument: cache database path. Remote sync stays disabled
    // here; the probe only exercises local reconciliation.
    let Some(cache_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let conn = match open_cache_db(&cache_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cache open failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteCacheRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("cache validation failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    let gateway = PersistenceGateway::new(repo, NoRemote);
    match gateway.startup() {
        Ok(store) => {
            let data = store.data();
            println!(
                "days={} lists={} staging={} items={}",
                data.days().len(),
                data.lists().len(),
                data.staging().len(),
                data.total_items()
            );
            for date in planned_dates(data) {
                println!("planned {date}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("startup failed: {err}");
            ExitCode::FAILURE
        }
    }
}
