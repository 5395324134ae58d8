use clap::{Args, Parser, Subcommand};
use ledger::{BackupPreference, Currency};

#[derive(Parser, Debug)]
#[command(name = "sarraf")]
#[command(about = "Books of a USD/LBP exchange desk")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show rates, balances, boxes, profit and subscription state.
    Status,
    /// Preview a trade without recording it.
    Quote(TradeArgs),
    /// Record a trade.
    Exchange(TradeArgs),
    Rates(Rates),
    Vault(Vault),
    Boxes(Boxes),
    Balances(Balances),
    History(History),
    /// Export the trade history as CSV (premium only).
    Export(ExportArgs),
    Premium(Premium),
    Admin(Admin),
    Backup(Backup),
}

#[derive(Args, Debug)]
pub struct TradeArgs {
    /// Currency the customer hands over (`usd` or `lbp`).
    #[arg(value_parser = parse_currency)]
    pub currency: Currency,
    /// Amount handed over, e.g. `500` or `50_000_000`.
    #[arg(value_parser = parse_amount)]
    pub amount: f64,
}

#[derive(Args, Debug)]
pub struct Rates {
    #[command(subcommand)]
    pub command: RatesCommand,
}

#[derive(Subcommand, Debug)]
pub enum RatesCommand {
    Set {
        #[arg(long, value_parser = parse_amount)]
        buy: Option<f64>,
        #[arg(long, value_parser = parse_amount)]
        sell: Option<f64>,
    },
    /// Back to the built-in defaults.
    Reset,
}

#[derive(Args, Debug)]
pub struct Vault {
    #[command(subcommand)]
    pub command: VaultCommand,
}

#[derive(Subcommand, Debug)]
pub enum VaultCommand {
    Set {
        #[arg(long, value_parser = parse_amount)]
        lbp: Option<f64>,
        #[arg(long, value_parser = parse_amount)]
        usd: Option<f64>,
    },
}

#[derive(Args, Debug)]
pub struct Boxes {
    #[command(subcommand)]
    pub command: ResetCommand,
}

#[derive(Args, Debug)]
pub struct Balances {
    #[command(subcommand)]
    pub command: ResetCommand,
}

#[derive(Subcommand, Debug)]
pub enum ResetCommand {
    Reset,
}

#[derive(Args, Debug)]
pub struct History {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    List,
    /// Drop every recorded trade and reset the free-tier counter.
    Clear,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file; standard output when omitted.
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Args, Debug)]
pub struct Premium {
    #[command(subcommand)]
    pub command: PremiumCommand,
}

#[derive(Subcommand, Debug)]
pub enum PremiumCommand {
    Activate {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    Deactivate,
}

#[derive(Args, Debug)]
pub struct Admin {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Publish global settings; omitted fields keep their published value.
    Publish {
        #[arg(long, value_parser = parse_amount)]
        buy_rate: Option<f64>,
        #[arg(long, value_parser = parse_amount)]
        sell_rate: Option<f64>,
        #[arg(long)]
        free_limit: Option<u32>,
    },
}

#[derive(Args, Debug)]
pub struct Backup {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// Where automatic backups go (`none` or `local`).
    Preference {
        #[arg(value_parser = parse_preference)]
        preference: BackupPreference,
    },
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    Currency::try_from(raw).map_err(|err| err.to_string())
}

fn parse_amount(raw: &str) -> Result<f64, String> {
    ledger::parse_amount(raw).map_err(|err| err.to_string())
}

fn parse_preference(raw: &str) -> Result<BackupPreference, String> {
    BackupPreference::try_from(raw).map_err(|err| err.to_string())
}
