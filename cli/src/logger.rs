use ansi_term::{ANSIString, Color, Style};
use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct Logger {
    colors_enabled: bool,
    max_level: LevelFilter,
}

impl Logger {
    fn prefix(&self, level: Level) -> ANSIString<'static> {
        let name = match level {
            Level::Error => "error",
            Level::Warn => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        let style = if self.colors_enabled {
            let color = match level {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Cyan,
                Level::Debug | Level::Trace => Color::Purple,
            };
            color.bold()
        } else {
            Style::new()
        };
        style.paint(format!("[{}]", name))
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} {}", self.prefix(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}

pub fn init(max_level: LevelFilter, colors_enabled: bool) {
    log::set_boxed_logger(Box::new(Logger { colors_enabled, max_level }))
        .expect("couldn't set up logger");
    log::set_max_level(max_level);
}
