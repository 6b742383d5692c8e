//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use crate::crime::{parse_date, CrimeFormData};
use crate::error::Result;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Only show unsolved crimes
    #[arg(long)]
    pub open: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the crime to show
    pub id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Title of the crime
    #[arg(short, long)]
    pub title: String,

    /// Free-text details
    #[arg(short, long, default_value = "")]
    pub details: String,

    /// Incident date (YYYY-MM-DD or RFC 3339); defaults to now
    #[arg(long)]
    pub date: Option<String>,

    /// Mark the crime as solved
    #[arg(short, long)]
    pub solved: bool,

    /// Locator of a photo for this crime
    #[arg(short, long, value_name = "URI")]
    pub photo: Option<String>,
}

impl AddCommand {
    /// Build a draft from the arguments, dating it `now` unless a date was given.
    ///
    /// # Errors
    ///
    /// Returns an error if `--date` cannot be parsed.
    pub fn to_form(&self, now: DateTime<Utc>) -> Result<CrimeFormData> {
        let date = self.date.as_deref().map(parse_date).transpose()?;
        Ok(CrimeFormData {
            title: self.title.clone(),
            details: self.details.clone(),
            date: date.unwrap_or(now),
            is_solved: self.solved,
            photo_uri: self.photo.clone(),
        })
    }
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the crime to edit
    pub id: String,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New details
    #[arg(short, long)]
    pub details: Option<String>,

    /// New incident date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub date: Option<String>,

    /// Set the solved flag
    #[arg(short, long, value_name = "BOOL")]
    pub solved: Option<bool>,

    /// New photo locator
    #[arg(short, long, value_name = "URI", conflicts_with = "clear_photo")]
    pub photo: Option<String>,

    /// Detach the current photo
    #[arg(long)]
    pub clear_photo: bool,
}

impl EditCommand {
    /// Apply the requested changes to a draft.
    ///
    /// # Errors
    ///
    /// Returns an error if `--date` cannot be parsed.
    pub fn apply(&self, form: &mut CrimeFormData) -> Result<()> {
        if let Some(title) = &self.title {
            form.title.clone_from(title);
        }
        if let Some(details) = &self.details {
            form.details.clone_from(details);
        }
        if let Some(date) = &self.date {
            form.date = parse_date(date)?;
        }
        if let Some(solved) = self.solved {
            form.is_solved = solved;
        }
        if self.clear_photo {
            form.photo_uri = None;
        } else if let Some(photo) = &self.photo {
            form.photo_uri = Some(photo.clone());
        }
        Ok(())
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the crime to delete
    pub id: String,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Theme commands.
#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Show the selected theme
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List available themes
    List,

    /// Select a theme
    Set {
        /// Id of the theme to select
        id: String,
    },
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
