//! Tracing setup. Stdout carries the IPC protocol, so logs always go to stderr.
//!
//! - LOG_LEVEL: filter directives (default "info,slcd=debug").
//! - LOG_FORMAT: "pretty" (default) or "json".

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info,slcd=debug"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}
