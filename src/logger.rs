use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};

/// `RUST_LOG` takes precedence over `default_level`.
pub fn init(default_level: &str) {
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}
