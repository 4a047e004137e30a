use agrilens_core::{Advisor, Coordinates};
use serde_json::json;

use crate::cli::LocationArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(advisor: &Advisor, args: &LocationArgs) -> Result<CommandResult, CliError> {
    let coords = Coordinates::new(args.lat, args.lon)?;
    let outcome = advisor.snapshot(&coords).await;

    let data = json!({
        "snapshot": outcome.snapshot,
        "used_fallback": outcome.used_fallback,
    });

    Ok(CommandResult::ok(data)
        .with_warnings(outcome.warnings)
        .with_errors(outcome.errors))
}
