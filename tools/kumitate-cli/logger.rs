use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Installs the global logger, writing to stderr so stdout stays clean for JSON output.
///
/// The level comes from `RUST_LOG` (default `info`); `verbose` forces `debug`.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|l| l.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info)
    };

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    Dispatch::new()
        .level(level)
        .level_for("serde", LevelFilter::Warn)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr())
        .apply()
        .unwrap_or_else(|e| {
            eprintln!("Failed to apply logger configuration: {}", e);
        });
}
