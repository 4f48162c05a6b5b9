pub mod archetypes;
pub mod clean;
pub mod frame;
pub mod leagues;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod scale;
pub mod table;

use std::{env, sync::OnceLock};

use log::LevelFilter;

static LOGGER: OnceLock<()> = OnceLock::new();

/// Idempotent logger setup; `RUST_LOG` wins when set.
pub fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("fm24_moneyball", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}
