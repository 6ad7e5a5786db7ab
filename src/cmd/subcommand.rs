use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::{kube::NamespaceScope, output::OutputFormat};

#[derive(Subcommand, Debug, Clone)]
pub enum SubCommand {
    /// Print Gateway API resources translated from Ingresses
    Print(PrintArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PrintArgs {
    /// Read ingresses from manifest files instead of the cluster
    #[arg(short, long = "input-file", value_name = "PATH")]
    pub input_files: Vec<PathBuf>,

    /// Providers translating the ingresses (e.g. --providers cilium). Every ingress class is
    /// translated generically when none is given.
    #[arg(long, value_delimiter = ',')]
    pub providers: Vec<String>,

    /// Namespace
    #[arg(short, long, conflicts_with = "all_namespaces")]
    pub namespace: Option<String>,

    /// Select all namespaces
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// kubeconfig path
    #[arg(short = 'C', long)]
    pub kubeconfig: Option<PathBuf>,

    /// Context
    #[arg(short, long)]
    pub context: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,
}

impl PrintArgs {
    pub fn namespace_scope(&self) -> NamespaceScope {
        if self.all_namespaces {
            NamespaceScope::All
        } else if let Some(namespace) = &self.namespace {
            NamespaceScope::Namespace(namespace.clone())
        } else {
            NamespaceScope::Context
        }
    }
}
