use agrilens_core::Advisor;
use serde_json::json;

use crate::cli::PricesArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(advisor: &Advisor, args: &PricesArgs) -> Result<CommandResult, CliError> {
    let (market, prices) = match &args.commodity {
        Some(commodity) => {
            let market = args
                .market
                .clone()
                .unwrap_or_else(|| advisor.default_market(&args.region).to_owned());
            let prices = advisor
                .market_prices(commodity, &args.region, Some(&market))
                .await?;
            (market, prices)
        }
        None => (
            advisor.default_market(&args.region).to_owned(),
            advisor.default_prices(&args.region)?,
        ),
    };

    let data = json!({
        "region": args.region,
        "market": market,
        "prices": prices,
    });

    Ok(CommandResult::ok(data))
}
