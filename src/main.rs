//! `endf-load`: walk an ENDF-6 library directory and ingest every
//! tape.
//!
//! Runs against the in-memory store, which makes it a dry-run
//! validator for a library tree; SQL backends plug in through the
//! [`endfdb::Store`] trait.

use ::std::path::PathBuf;
use ::std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};

use endfdb::{CancelToken, Config, IdPool, Loader, MemoryStore};

#[derive(Debug, Parser)]
#[command(name = "endf-load", version, about = "Load an ENDF-6 library")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "endf.toml")]
    config: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    debug!(
        "store target: {}@{}/{}",
        config.db.user, config.db.db_host, config.db.db_name
    );

    let mut store = MemoryStore::new();
    let ids = IdPool::new();
    let cancel = CancelToken::new();
    let result =
        Loader::new(&mut store, &ids, cancel).load_library(&config.endf.library_dir);

    match result {
        Ok(stats) => {
            info!(
                "tapes loaded: {}, parse failures: {}, materials persisted: {}",
                stats.tapes_loaded, stats.parse_failures, stats.materials
            );
            info!(
                "rows: {} libraries, {} materials, {} cross-section points",
                store.libraries().len(),
                store.materials().len(),
                store.cross_section_data().len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
