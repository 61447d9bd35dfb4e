use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::Path;

/// Send library logs to `path`. The demo owns the terminal, so logs never go
/// to stdout.
pub fn init(path: impl AsRef<Path>, level: LevelFilter) -> std::io::Result<()> {
    let file = File::create(path)?;
    let config = ConfigBuilder::new()
        .add_filter_allow_str("masked_edit")
        .build();

    WriteLogger::init(level, config, file).map_err(std::io::Error::other)?;

    Ok(())
}
