use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "agrilens",
    about = "Farm data aggregation and advisory toolkit",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Run fully offline with deterministic mock sources.
    #[arg(long, global = true)]
    pub mock: bool,

    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Aggregate a full farm snapshot for a coordinate pair.
    Snapshot(LocationArgs),
    /// Short farmer-friendly plan built around the recommended crop.
    Summary(SummaryArgs),
    /// Ask a free-form question grounded in the farm snapshot.
    Chat(ChatArgs),
    /// Mandi price rows for a commodity, or the default set.
    Prices(PricesArgs),
    /// Static reference catalogs.
    Catalog(CatalogArgs),
    /// Translate a piece of text via the chat upstream.
    Translate(TranslateArgs),
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Latitude in decimal degrees.
    #[arg(long)]
    pub lat: f64,

    /// Longitude in decimal degrees.
    #[arg(long)]
    pub lon: f64,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Target language for the plan bullets.
    #[arg(long, default_value = "en")]
    pub lang: String,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// The farmer's question.
    pub question: String,

    /// Reply language.
    #[arg(long, default_value = "en")]
    pub lang: String,
}

#[derive(Debug, Args)]
pub struct PricesArgs {
    /// State or union territory.
    #[arg(long)]
    pub region: String,

    /// Commodity name; omit for the default commodity set.
    #[arg(long)]
    pub commodity: Option<String>,

    /// Market (mandi) name; defaults per region.
    #[arg(long)]
    pub market: Option<String>,
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Which catalog to print.
    #[arg(value_enum)]
    pub kind: CatalogKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CatalogKind {
    Crops,
    Pesticides,
    Commodities,
    Regions,
}

#[derive(Debug, Args)]
pub struct TranslateArgs {
    /// Text to translate.
    pub text: String,

    /// Target language code.
    #[arg(long)]
    pub to: String,
}
