use agrilens_core::Advisor;
use serde_json::json;

use crate::cli::{CatalogArgs, CatalogKind};
use crate::error::CliError;

use super::CommandResult;

pub fn run(advisor: &Advisor, args: &CatalogArgs) -> Result<CommandResult, CliError> {
    let data = match args.kind {
        CatalogKind::Crops => json!({ "crops": advisor.crop_profiles() }),
        CatalogKind::Pesticides => json!({ "pesticides": advisor.pesticide_profiles() }),
        CatalogKind::Commodities => json!({ "commodities": advisor.available_commodities() }),
        CatalogKind::Regions => json!({ "regions": advisor.available_regions() }),
    };

    Ok(CommandResult::ok(data))
}
