use std::str::FromStr;

/// Sends log records at `level` and above to stderr with a timestamp. An unrecognized level
/// falls back to `info`.
pub fn init(level: &str) -> Result<(), log::SetLoggerError> {
    let filter = log::LevelFilter::from_str(level).unwrap_or(log::LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(filter)
        .chain(std::io::stderr())
        .apply()?;

    if filter == log::LevelFilter::Info && !level.eq_ignore_ascii_case("info") {
        log::warn!("Unknown log level '{}', using info", level);
    }
    Ok(())
}
