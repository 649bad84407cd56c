use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

/// Route `log` records to stderr; stdout carries the hook response.
/// Best-effort: a logger that is already set is left alone.
pub fn init(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, config, std::io::stderr());
}
