pub use anyhow::{anyhow, Result};

use kube::config::KubeconfigError;
use thiserror::Error as TError;

#[derive(Debug, TError)]
pub enum Error {
    #[error(transparent)]
    Kube(#[from] kube::Error),
    #[error(transparent)]
    Kubeconfig(#[from] KubeconfigError),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("unknown provider {name:?}, supported providers: {supported}")]
    UnknownProvider { name: String, supported: String },
    #[error("{0}")]
    Raw(String),
}
