//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::payload::PhonePolicy;

/// Save command arguments.
#[derive(Debug, Args)]
pub struct SaveCommand {
    /// Your full name
    #[arg(short, long)]
    pub name: String,

    /// Your LinkedIn profile URL
    #[arg(short, long)]
    pub linkedin: String,

    /// Your phone number (any format; digits are extracted for the QR code)
    #[arg(short, long)]
    pub phone: Option<String>,

    /// Also generate the QR codes after saving
    #[arg(short, long)]
    pub generate: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Link command arguments.
#[derive(Debug, Args)]
pub struct LinkCommand {
    /// Base of the link (defaults to `output.link_base`)
    #[arg(short, long)]
    pub base: Option<String>,
}

/// Generate command arguments.
///
/// Without any contact arguments the saved contact is used.
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Full name (requires --linkedin)
    #[arg(short, long, requires = "linkedin", conflicts_with = "from_link")]
    pub name: Option<String>,

    /// LinkedIn profile URL (requires --name)
    #[arg(short, long, requires = "name", conflicts_with = "from_link")]
    pub linkedin: Option<String>,

    /// Phone number (requires --name)
    #[arg(short, long, requires = "name", conflicts_with = "from_link")]
    pub phone: Option<String>,

    /// Read the contact from a shared link or query string
    #[arg(long, value_name = "LINK")]
    pub from_link: Option<String>,

    /// Directory to write PNG files to (defaults to `output.directory`)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// How to present the codes
    #[arg(short, long, value_enum, default_value = "files")]
    pub format: GenerateFormat,

    /// Override the configured policy for phone numbers without digits
    #[arg(long, value_enum)]
    pub phone_policy: Option<PhonePolicyArg>,
}

impl GenerateCommand {
    /// Whether contact details were given on the command line.
    #[must_use]
    pub fn has_inline_contact(&self) -> bool {
        self.name.is_some() || self.linkedin.is_some() || self.from_link.is_some()
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Presentation of generated codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GenerateFormat {
    /// Write one PNG per channel
    #[default]
    Files,
    /// Print `data:` URLs
    DataUrl,
    /// Draw the codes in the terminal
    Terminal,
    /// JSON with labels, payloads and data URLs
    Json,
}

/// Phone policy argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhonePolicyArg {
    /// Skip phone numbers without digits
    Skip,
    /// Encode `tel:+` even without digits
    Encode,
}

impl From<PhonePolicyArg> for PhonePolicy {
    fn from(arg: PhonePolicyArg) -> Self {
        match arg {
            PhonePolicyArg::Skip => Self::SkipDegenerate,
            PhonePolicyArg::Encode => Self::EncodeDegenerate,
        }
    }
}
