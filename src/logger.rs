use chrono::Local;
use env_logger::fmt::Formatter;
use env_logger::{Builder, Env};
use log::Record;
use std::io::{self, Write};

use crate::config::LoggingConfig;

/// Installs the global logger.
///
/// `logging.level` and `logging.style` are fallbacks; `RUST_LOG` and
/// `RUST_LOG_STYLE` win when set.
pub fn init_logger(logging: &LoggingConfig) {
    let env = Env::default()
        .default_filter_or(logging.level.as_str())
        .default_write_style_or(logging.style.as_str());

    if let Err(e) = builder(env).try_init() {
        eprintln!("Logger already initialized: {}", e);
    }
}

fn builder(env: Env<'_>) -> Builder {
    let mut builder = Builder::from_env(env);
    builder.format(format_record);
    builder
}

// 级别颜色交给 env_logger，关闭颜色或输出不是终端时样式为空
fn format_record(buf: &mut Formatter, record: &Record) -> io::Result<()> {
    let style = buf.default_level_style(record.level()).bold();
    writeln!(
        buf,
        "{} {style}{:<5}{style:#} [{}:{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args(),
    )
}
