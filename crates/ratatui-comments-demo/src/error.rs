use std::path::PathBuf;

use ratatui_comments::CommentError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("seed data: {0}")]
    Comment(#[from] CommentError),
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("logger already installed: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}
