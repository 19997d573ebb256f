use dioxus::launch;
use dioxus_logger::tracing::Level;

use shell_ui::config::LogLevel;
use shell_ui::{shell_config, App};

fn main() {
    let config = shell_config();

    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::new(config.log_level.to_level()));
    dioxus_logger::init(tracing_level(config.log_level)).ok();

    launch(App);
}

fn tracing_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}
