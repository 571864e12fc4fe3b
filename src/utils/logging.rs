//! File logging for debugging, only built with the `logging` feature.

#[cfg(feature = "logging")]
use std::path::Path;

#[cfg(feature = "logging")]
const TIMESTAMP: &[time::format_description::BorrowedFormatItem<'static>] = time::macros::format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// Sends every `log` record at or above `min_level` to `path`, appending if
/// the file already exists.
#[cfg(feature = "logging")]
pub fn init_logger(min_level: log::LevelFilter, path: &Path) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            // UTC, as reading the local offset is unsound once other threads exist.
            let now = time::OffsetDateTime::now_utc()
                .format(TIMESTAMP)
                .unwrap_or_default();

            out.finish(format_args!(
                "{now} {:<5} {}: {message}",
                record.level(),
                record.target(),
            ))
        })
        .level(min_level)
        .chain(fern::log_file(path)?)
        .apply()?;

    Ok(())
}
