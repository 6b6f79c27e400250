// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entry point: wires up logging, the `SIGCHLD` handler, and the
//! read-eval-print loop.

use yas::editor::StdinEditor;
use yas::ShellConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = yas::signal::install(Box::new(StdinEditor)) {
        tracing::error!(%err, "failed to install SIGCHLD handler");
        std::process::exit(1);
    }

    let config = ShellConfig::default();
    yas::run(&config, &StdinEditor);
}
