use agrilens_core::Advisor;
use serde_json::json;

use crate::cli::TranslateArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(advisor: &Advisor, args: &TranslateArgs) -> Result<CommandResult, CliError> {
    let translated = advisor.translate(&args.text, &args.to).await?;

    let data = json!({
        "input": args.text,
        "translated": translated,
        "language": args.to,
    });

    Ok(CommandResult::ok(data))
}
