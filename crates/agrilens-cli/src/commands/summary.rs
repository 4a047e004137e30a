use agrilens_core::{Advisor, Coordinates};
use serde_json::json;

use crate::cli::SummaryArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(advisor: &Advisor, args: &SummaryArgs) -> Result<CommandResult, CliError> {
    let coords = Coordinates::new(args.location.lat, args.location.lon)?;
    let summary = advisor.farmer_summary(&coords).await;

    // Bullets are produced in English and translated as one surface so a
    // partial upstream failure cannot mix languages.
    let mut bullets = Vec::with_capacity(summary.bullets.len());
    for bullet in &summary.bullets {
        bullets.push(advisor.translate(bullet, &args.lang).await?);
    }

    let data = json!({
        "recommendation": summary.recommendation,
        "bullets": bullets,
        "language": args.lang,
    });

    Ok(CommandResult::ok(data))
}
