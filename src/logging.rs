use chrono::{SecondsFormat, Utc};
use env_logger::{Builder, Env};
use log::{LevelFilter, Record};
use serde_json::json;
use std::io::Write;

use crate::config::Environment;

/// Installs the global logger.
///
/// `local` prints readable lines at `info`; `prod` prints one JSON object per
/// line at `debug`. `RUST_LOG` overrides either default. Calling it twice is
/// harmless.
pub fn init(env: Environment) {
    let mut builder = Builder::new();
    builder.filter_level(default_level(env));
    if env == Environment::Prod {
        builder.format(|buf, record| writeln!(buf, "{}", json_line(record)));
    }
    builder.parse_env(Env::default());
    let _ = builder.try_init();
}

fn default_level(env: Environment) -> LevelFilter {
    match env {
        Environment::Local => LevelFilter::Info,
        Environment::Prod => LevelFilter::Debug,
    }
}

fn json_line(record: &Record) -> serde_json::Value {
    json!({
        "ts": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_default_levels() {
        assert_eq!(default_level(Environment::Local), LevelFilter::Info);
        assert_eq!(default_level(Environment::Prod), LevelFilter::Debug);
    }

    #[test]
    fn test_json_line_fields() {
        let line = json_line(
            &Record::builder()
                .args(format_args!("user saved id={}", 7))
                .level(Level::Info)
                .target("task_manager::routes::users")
                .build(),
        );
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["target"], "task_manager::routes::users");
        assert_eq!(line["msg"], "user saved id=7");
        assert!(line["ts"].as_str().unwrap().ends_with('Z'));
    }
}
