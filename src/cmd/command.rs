use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{config_home, ConfigLoadOption};

use super::SubCommand;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, disable_help_subcommand = true)]
pub struct Command {
    /// Logging
    #[arg(short = 'l', long, global = true, display_order = 1000)]
    pub logging: bool,

    /// Config file path
    #[arg(long, global = true, display_order = 1000)]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: SubCommand,
}

impl Command {
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn config_load_option(&self) -> Result<ConfigLoadOption> {
        let option = if let Some(path) = &self.config_file {
            match path.try_exists() {
                Ok(true) => ConfigLoadOption::Path(path.clone()),
                Ok(false) => {
                    eprintln!("Config file not found: {:?}", path);

                    ConfigLoadOption::Default
                }
                Err(err) => {
                    eprintln!("Failed to check config file exists: {}", err);

                    ConfigLoadOption::Default
                }
            }
        } else if let Some(path) = config_home().map(|dir| dir.join("config.yaml")) {
            match path.try_exists() {
                Ok(true) => ConfigLoadOption::Path(path),
                Ok(false) => ConfigLoadOption::Default,
                Err(err) => {
                    eprintln!("Failed to check config file exists: {}", err);

                    ConfigLoadOption::Default
                }
            }
        } else {
            ConfigLoadOption::Default
        };

        Ok(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod global {
        use pretty_assertions::assert_eq;

        use super::*;

        #[test]
        fn logging_after_subcommand() {
            let cmd = Command::try_parse_from(["ingress2gateway", "print", "--logging"]).unwrap();
            assert_eq!(cmd.logging, true)
        }

        #[test]
        fn missing_config_file_falls_back_to_default() {
            let cmd = Command::try_parse_from([
                "ingress2gateway",
                "--config-file",
                "/nonexistent/config.yaml",
                "print",
            ])
            .unwrap();

            assert_eq!(cmd.config_load_option().unwrap(), ConfigLoadOption::Default)
        }

        #[test]
        fn subcommand_is_required() {
            let cmd = Command::try_parse_from(["ingress2gateway"]);
            assert_eq!(cmd.is_err(), true)
        }
    }

    mod print {
        use clap::error::ErrorKind;
        use pretty_assertions::assert_eq;
        use rstest::rstest;

        use crate::{cmd::PrintArgs, kube::NamespaceScope, output::OutputFormat};

        use super::*;

        fn print_args(args: &[&str]) -> PrintArgs {
            let cmd = Command::try_parse_from(
                ["ingress2gateway", "print"]
                    .into_iter()
                    .chain(args.iter().copied()),
            )
            .unwrap();

            match cmd.subcommand {
                SubCommand::Print(args) => args,
            }
        }

        #[rstest]
        #[case::multiple_occurrences(&["--providers", "cilium", "--providers", "nginx"])]
        #[case::delimiter(&["--providers", "cilium,nginx"])]
        fn providers(#[case] args: &[&str]) {
            assert_eq!(
                print_args(args).providers,
                vec!["cilium".to_string(), "nginx".to_string()]
            )
        }

        #[test]
        fn input_files() {
            let args = print_args(&["--input-file", "a.yaml", "-i", "b.yaml"]);
            assert_eq!(
                args.input_files,
                vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]
            )
        }

        #[rstest]
        #[case::default(&[], NamespaceScope::Context)]
        #[case::namespace(&["-n", "apps"], NamespaceScope::Namespace("apps".into()))]
        #[case::all_namespaces(&["-A"], NamespaceScope::All)]
        fn namespace_scope(#[case] args: &[&str], #[case] expected: NamespaceScope) {
            assert_eq!(print_args(args).namespace_scope(), expected)
        }

        #[test]
        fn namespace_conflicts_with_all_namespaces() {
            let cmd = Command::try_parse_from(["ingress2gateway", "print", "-A", "-n", "apps"]);
            assert_eq!(cmd.unwrap_err().kind(), ErrorKind::ArgumentConflict)
        }

        #[rstest]
        #[case::default(&[], OutputFormat::Yaml)]
        #[case::json(&["-o", "json"], OutputFormat::Json)]
        fn output(#[case] args: &[&str], #[case] expected: OutputFormat) {
            assert_eq!(print_args(args).output, expected)
        }

        #[test]
        fn unknown_output_format() {
            let cmd = Command::try_parse_from(["ingress2gateway", "print", "-o", "toml"]);
            assert_eq!(cmd.unwrap_err().kind(), ErrorKind::InvalidValue)
        }
    }
}
