mod binding;
mod config;
mod db;
mod derive;
mod exchange;
mod images;
mod ipc;
mod model;
mod present;
mod slides;
mod store;
mod subjects;
mod telemetry;

use std::io::{self, BufRead, Write};
use tracing::{info, warn};

fn main() {
    telemetry::init_tracing();

    let config = config::Config::from_env();
    let mut state = ipc::AppState::new(config.clone());

    if let Some(ws) = config.workspace.as_deref() {
        if let Err(e) = ipc::select_workspace(&mut state, ws) {
            warn!(workspace = %ws.to_string_lossy(), error = %e, "could not open configured workspace");
        }
    }
    info!(version = env!("CARGO_PKG_VERSION"), "slcd ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to answer with.
                let reply = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", reply);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    info!("stdin closed, exiting");
}
