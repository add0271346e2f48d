//! Global logging system.

use std::{
    fs::File,
    sync::Arc,
    env,
    panic,
    thread,
};
use backtrace::Backtrace;
use tracing_subscriber::{
    fmt::{
        self,
        time::uptime,
    },
    prelude::*,
    Registry,
    EnvFilter,
};


/// Default logging environment filter. Our crates are debug, everything else is warn.
pub const DEFAULT_FILTER: &'static str = "warn,tile_grid=debug,platformer=debug";

/// Name of the file logs are mirrored into, in the working directory.
pub const LOG_FILE_NAME: &'static str = "log";

/// Build the filter string: the default filter, extended by `RUST_LOG` if set.
fn filter_string(rust_log: Option<&str>) -> String {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Some(env_filter) = rust_log.filter(|s| !s.is_empty()) {
        filter.push(',');
        filter.push_str(env_filter);
    }
    filter
}

/// Initializes a `tracing` logging backend which outputs to stdout and, if it can be created, a
/// `log` file. Accepts ecosystem-standard `RUST_LOG` env filters. Panics get logged along with the
/// name of the thread they happened on.
pub fn init_logging() {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer()
        .event_format(format);

    let log_file = File::create(LOG_FILE_NAME);
    let log_file_log = log_file
        .as_ref()
        .ok()
        .and_then(|file| file.try_clone().ok())
        .map(|file| fmt::layer()
            .with_ansi(false)
            .with_writer(Arc::new(file)));

    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = Registry::default()
        .with(EnvFilter::new(filter_string(rust_log.as_deref())))
        .with(stdout_log)
        .with(log_file_log);
    tracing::subscriber::set_global_default(subscriber)
        .expect("unable to install log subscriber");
    info!("starting platformer");
    if let Err(e) = log_file {
        warn!(%e, "unable to create {:?}, logging to stdout only", LOG_FILE_NAME);
    }

    panic::set_hook(Box::new(|info| {
        let thread = thread::current();
        let thread = thread.name().unwrap_or("<unnamed>");
        error!(thread, "{}", info);
        if env::var("RUST_BACKTRACE").map(|val| val != "0").unwrap_or(true) {
            error!(thread, "{:?}", Backtrace::new());
        }
    }));
    trace!("installed panic hook");
}
