mod catalog;
mod chat;
mod prices;
mod snapshot;
mod summary;
mod translate;

use agrilens_core::{Advisor, AdvisorConfig};
use serde::Serialize;
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn into_envelope(self) -> Envelope {
        Envelope {
            data: self.data,
            warnings: self.warnings,
            errors: self.errors,
        }
    }
}

/// Stable output shape shared by every subcommand.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let config = if cli.mock {
        AdvisorConfig::mock()
    } else {
        AdvisorConfig::from_env()?
    };
    let advisor = Advisor::new(config);

    match &cli.command {
        Command::Snapshot(args) => snapshot::run(&advisor, args).await,
        Command::Summary(args) => summary::run(&advisor, args).await,
        Command::Chat(args) => chat::run(&advisor, args).await,
        Command::Prices(args) => prices::run(&advisor, args).await,
        Command::Catalog(args) => catalog::run(&advisor, args),
        Command::Translate(args) => translate::run(&advisor, args).await,
    }
}
