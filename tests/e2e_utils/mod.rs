#![cfg(test)]
#![allow(dead_code)]

pub mod pac_server;

pub use pac_server::PacServer;

use std::path::PathBuf;

pub fn temp_path(extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!("proxyselect-e2e-{}.{}", uuid::Uuid::new_v4(), extension))
}

pub fn multi_thread_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}
