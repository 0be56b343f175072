//! Command-line interface for networqr.
//!
//! This module provides the CLI structure for the `networqr` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, GenerateCommand, GenerateFormat, LinkCommand, PhonePolicyArg, SaveCommand,
    ShowCommand,
};

/// networqr - QR codes for your professional network
///
/// Saves your name, LinkedIn profile and phone number on this machine and
/// turns them into QR codes others can scan. Nothing is sent anywhere.
#[derive(Debug, Parser)]
#[command(name = "networqr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save your contact details
    Save(SaveCommand),

    /// Show the saved contact details
    Show(ShowCommand),

    /// Print a shareable link carrying the saved details
    Link(LinkCommand),

    /// Generate QR codes
    Generate(GenerateCommand),

    /// Delete the saved contact details
    Forget,

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Show(ShowCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "networqr");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_save() {
        let args = vec![
            "networqr",
            "save",
            "--name",
            "Jane Doe",
            "--linkedin",
            "https://linkedin.com/in/janedoe",
            "--phone",
            "+1 555 123 4567",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Save(save) = cli.command else {
            panic!("expected save command");
        };
        assert_eq!(save.name, "Jane Doe");
        assert_eq!(save.phone.as_deref(), Some("+1 555 123 4567"));
        assert!(!save.generate);
    }

    #[test]
    fn test_parse_save_requires_linkedin() {
        let args = vec!["networqr", "save", "--name", "Jane"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::try_parse_from(vec!["networqr", "generate"]).unwrap();
        let Command::Generate(cmd) = cli.command else {
            panic!("expected generate command");
        };
        assert!(!cmd.has_inline_contact());
        assert_eq!(cmd.format, GenerateFormat::Files);
        assert!(cmd.phone_policy.is_none());
    }

    #[test]
    fn test_parse_generate_name_requires_linkedin() {
        let args = vec!["networqr", "generate", "--name", "Jane"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_generate_from_link_conflicts_with_name() {
        let args = vec![
            "networqr",
            "generate",
            "--from-link",
            "/my-qr?name=a&linkedin=b",
            "--name",
            "Jane",
            "--linkedin",
            "x",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_generate_terminal_with_policy() {
        let args = vec![
            "networqr",
            "generate",
            "--format",
            "terminal",
            "--phone-policy",
            "encode",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Generate(cmd) = cli.command else {
            panic!("expected generate command");
        };
        assert_eq!(cmd.format, GenerateFormat::Terminal);
        assert_eq!(cmd.phone_policy, Some(PhonePolicyArg::Encode));
    }

    #[test]
    fn test_parse_forget() {
        let cli = Cli::try_parse_from(vec!["networqr", "forget"]).unwrap();
        assert!(matches!(cli.command, Command::Forget));
    }

    #[test]
    fn test_parse_with_config_and_verbose() {
        let args = vec!["networqr", "-c", "/custom/config.toml", "-v", "show"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 1);
    }
}
