use agrilens_core::{Advisor, Coordinates};
use serde_json::json;

use crate::cli::ChatArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(advisor: &Advisor, args: &ChatArgs) -> Result<CommandResult, CliError> {
    let coords = Coordinates::new(args.location.lat, args.location.lon)?;
    let answer = advisor
        .chat_answer(&coords, &args.question, &args.lang)
        .await?;

    let data = json!({
        "question": args.question,
        "answer": answer,
        "language": args.lang,
    });

    Ok(CommandResult::ok(data))
}
