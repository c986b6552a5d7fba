//! CLI module for custom-fields.
//!
//! Subcommands:
//! - `check`: Validate the fields of a definition file
//! - `apply`: Materialize a definition file on a schema and print it
//! - `types`: List the types field kinds can resolve to
//! - `alias`: Print the alias a label generates

mod apply;
mod check;
mod types;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::context::Context;
use crate::models::parameterize;

/// custom-fields - runtime custom field definitions
#[derive(Parser)]
#[command(name = "custom-fields")]
#[command(about = "Validate and apply runtime custom field definitions")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate every field of a definition file
    Check {
        /// Definition file (.toml or .json)
        path: PathBuf,
    },

    /// Apply a definition file to an empty schema and print the result
    Apply {
        /// Definition file (.toml or .json)
        path: PathBuf,

        /// Print the apply report instead of the schema
        #[arg(long)]
        report: bool,
    },

    /// List registered types
    Types,

    /// Print the alias generated for a label
    Alias {
        /// Field label
        label: String,
    },
}

impl App {
    /// Run the CLI application.
    pub fn run(self) -> color_eyre::Result<()> {
        match &self.command {
            Command::Check { path } => self.run_check(path),
            Command::Apply { path, report } => self.run_apply(path, *report),
            Command::Types => self.run_types(),
            Command::Alias { label } => {
                println!("{}", parameterize(label));
                Ok(())
            }
        }
    }

    /// Load configuration and build the application context.
    fn load_context(&self) -> color_eyre::Result<Context> {
        let config = Config::load()?;
        tracing::debug!(
            "Loaded configuration (default association: {}, {} extra type(s))",
            config.default_association,
            config.types.len()
        );
        Ok(Context::new(config))
    }
}
