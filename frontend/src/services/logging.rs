use gloo::net::http::Request;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;

#[derive(Debug, Serialize)]
struct LogRequest {
    level: String,
    message: String,
    component: Option<String>,
}

/// Browser logger: every record goes to the console, and records at `info`
/// and above are also posted to the dev server when an endpoint is configured.
pub struct Logger {
    endpoint: Option<String>,
}

impl Logger {
    /// Install as the `log` backend, which also captures the wizard's records
    pub fn init(endpoint: Option<String>) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(Logger { endpoint }))?;
        log::set_max_level(LevelFilter::Debug);
        Ok(())
    }

    fn post(&self, level: Level, component: &str, message: String) {
        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };

        let request = LogRequest {
            level: level.as_str().to_lowercase(),
            message,
            component: Some(component.to_string()),
        };

        // Send log asynchronously without blocking
        spawn_local(async move {
            if let Ok(request) = Request::post(&endpoint).json(&request) {
                let _ = request.send().await;
            }
        });
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let component = record.target();
        let line = format!("[{}] {}", component, record.args());
        match record.level() {
            Level::Error => gloo::console::error!(line),
            Level::Warn => gloo::console::warn!(line),
            Level::Info => gloo::console::info!(line),
            Level::Debug | Level::Trace => gloo::console::debug!(line),
        }

        if record.level() <= Level::Info {
            self.post(record.level(), component, record.args().to_string());
        }
    }

    fn flush(&self) {}
}
