//! Dispatch of the CLI commands onto the ledger.
//!
//! Every mutating command goes through [`ExchangeLedger::transact`], so a
//! failed write leaves both the store and the in-memory books untouched.

use std::io::Write;

use chrono::{DateTime, Utc};
use ledger::{
    AdminSettings, Currency, ExchangeLedger, KeyValueStore, PremiumEvent, PremiumStatus,
    format_amount,
};

use crate::{
    cli::{
        AdminCommand, BackupCommand, Command, HistoryCommand, PremiumCommand, RatesCommand,
        ResetCommand, TradeArgs, VaultCommand,
    },
    error::Result,
};

/// Brings the ledger in line with the outside world: expires a lapsed
/// subscription and applies newly published admin settings.
pub async fn sync<S: KeyValueStore>(
    ledger: &mut ExchangeLedger,
    store: &S,
    now: DateTime<Utc>,
) -> Result<()> {
    let event = ledger
        .transact(store, |ledger| Ok(ledger.refresh_premium(now)))
        .await?;
    if let Some(PremiumEvent::Expired { expired_at }) = event {
        println!(
            "Premium expired on {}. Back to the free plan.",
            expired_at.format("%Y-%m-%d")
        );
    }

    if let Some(settings) = AdminSettings::load(store).await? {
        let changes = ledger
            .transact(store, |ledger| Ok(ledger.apply_admin_settings(&settings)))
            .await?;
        for change in changes {
            println!("{change}");
        }
    }

    if let PremiumStatus::ExpiringSoon { days_left, .. } = ledger.premium_status(now) {
        println!("Premium expires in {days_left} day(s).");
    }
    Ok(())
}

pub async fn run<S: KeyValueStore>(
    command: Command,
    ledger: &mut ExchangeLedger,
    store: &S,
    now: DateTime<Utc>,
) -> Result<()> {
    match command {
        Command::Status => print_status(ledger, now),
        Command::Quote(TradeArgs { currency, amount }) => {
            let quote = ledger.quote(currency, amount)?;
            println!("{}", quote.description);
            println!("Profit: {}", format_amount(quote.profit, Currency::Lbp));
        }
        Command::Exchange(TradeArgs { currency, amount }) => {
            let receipt = ledger
                .commit_transaction(store, currency, amount, now)
                .await?;
            println!("{}", receipt.description);
            println!(
                "Profit: {} ({})",
                format_amount(receipt.profit, Currency::Lbp),
                if receipt.to_my_box { "My Box" } else { "His Box" }
            );
            if let Some(left) = ledger.remaining_free_transactions() {
                println!("Free transactions left: {left}");
            }
        }
        Command::Rates(rates) => match rates.command {
            RatesCommand::Set { buy, sell } => {
                ledger
                    .transact(store, |ledger| {
                        if let Some(buy) = buy {
                            ledger.set_buy_rate(buy)?;
                        }
                        if let Some(sell) = sell {
                            ledger.set_sell_rate(sell)?;
                        }
                        Ok(())
                    })
                    .await?;
                print_rates(ledger);
            }
            RatesCommand::Reset => {
                ledger
                    .transact(store, |ledger| {
                        ledger.reset_rates();
                        Ok(())
                    })
                    .await?;
                print_rates(ledger);
            }
        },
        Command::Vault(vault) => match vault.command {
            VaultCommand::Set { lbp, usd } => {
                ledger
                    .transact(store, |ledger| match (lbp, usd) {
                        (Some(lbp), Some(usd)) => ledger.update_vault(lbp, usd),
                        (Some(lbp), None) => ledger.set_lbp_balance(lbp),
                        (None, Some(usd)) => ledger.set_usd_balance(usd),
                        (None, None) => Ok(()),
                    })
                    .await?;
                print_vault(ledger);
            }
        },
        Command::Boxes(boxes) => match boxes.command {
            ResetCommand::Reset => {
                ledger
                    .transact(store, |ledger| {
                        ledger.reset_boxes();
                        Ok(())
                    })
                    .await?;
                println!("Boxes reset.");
            }
        },
        Command::Balances(balances) => match balances.command {
            ResetCommand::Reset => {
                ledger
                    .transact(store, |ledger| {
                        ledger.reset_balances();
                        Ok(())
                    })
                    .await?;
                print_vault(ledger);
            }
        },
        Command::History(history) => match history.command {
            HistoryCommand::List => print_history(ledger),
            HistoryCommand::Clear => {
                ledger
                    .transact(store, |ledger| {
                        ledger.clear_history();
                        Ok(())
                    })
                    .await?;
                println!("History cleared.");
            }
        },
        Command::Export(args) => match args.out {
            Some(path) => {
                let mut buffer = Vec::new();
                ledger.export_csv(&mut buffer, now)?;
                std::fs::write(&path, buffer)?;
                println!("Exported {} transactions to {path}", ledger.transactions().len());
            }
            None => {
                let mut out = std::io::stdout().lock();
                ledger.export_csv(&mut out, now)?;
                out.flush()?;
            }
        },
        Command::Premium(premium) => match premium.command {
            PremiumCommand::Activate { days } => {
                ledger
                    .transact(store, |ledger| ledger.activate_premium(days, now))
                    .await?;
                print_premium(ledger, now);
            }
            PremiumCommand::Deactivate => {
                ledger
                    .transact(store, |ledger| {
                        ledger.deactivate_premium();
                        Ok(())
                    })
                    .await?;
                print_premium(ledger, now);
            }
        },
        Command::Admin(admin) => match admin.command {
            AdminCommand::Publish {
                buy_rate,
                sell_rate,
                free_limit,
            } => {
                let mut settings = AdminSettings::load(store).await?.unwrap_or_default();
                if let Some(buy_rate) = buy_rate {
                    settings.global_buy_rate = buy_rate;
                }
                if let Some(sell_rate) = sell_rate {
                    settings.global_sell_rate = sell_rate;
                }
                if let Some(free_limit) = free_limit {
                    settings.free_transaction_limit = free_limit;
                }
                settings.publish(store).await?;
                tracing::info!("admin settings published: {settings:?}");
                sync(ledger, store, now).await?;
            }
        },
        Command::Backup(backup) => match backup.command {
            BackupCommand::Preference { preference } => {
                ledger
                    .transact(store, |ledger| {
                        ledger.set_backup_preference(preference);
                        Ok(())
                    })
                    .await?;
                println!("Backup preference: {}", preference.as_str());
            }
        },
    }
    Ok(())
}

fn print_rates(ledger: &ExchangeLedger) {
    let rates = ledger.rates();
    println!("Buy rate:  {}", format_amount(rates.buy_rate, Currency::Lbp));
    println!("Sell rate: {}", format_amount(rates.sell_rate, Currency::Lbp));
}

fn print_vault(ledger: &ExchangeLedger) {
    let vault = ledger.vault();
    println!("Vault LBP: {}", format_amount(vault.lbp, Currency::Lbp));
    println!("Vault USD: {}", format_amount(vault.usd, Currency::Usd));
}

fn print_premium(ledger: &ExchangeLedger, now: DateTime<Utc>) {
    match ledger.premium_status(now) {
        PremiumStatus::Free => match ledger.remaining_free_transactions() {
            Some(left) => println!("Plan: free ({left} transactions left)"),
            None => println!("Plan: free"),
        },
        PremiumStatus::Active {
            expires_at: Some(expires_at),
        } => println!("Plan: premium until {}", expires_at.format("%Y-%m-%d")),
        PremiumStatus::Active { expires_at: None } => println!("Plan: premium"),
        PremiumStatus::ExpiringSoon {
            expires_at,
            days_left,
        } => println!(
            "Plan: premium until {} ({days_left} day(s) left)",
            expires_at.format("%Y-%m-%d")
        ),
        PremiumStatus::Expired { expired_at } => {
            println!("Plan: premium expired on {}", expired_at.format("%Y-%m-%d"));
        }
    }
}

fn print_status(ledger: &ExchangeLedger, now: DateTime<Utc>) {
    print_rates(ledger);
    print_vault(ledger);
    let boxes = ledger.boxes();
    println!("My box:    {}", format_amount(boxes.my_box, Currency::Lbp));
    println!("His box:   {}", format_amount(boxes.his_box, Currency::Lbp));
    println!(
        "Profit:    {}",
        format_amount(ledger.total_profit(), Currency::Lbp)
    );
    println!("Trades:    {}", ledger.transactions().len());
    print_premium(ledger, now);
    match ledger.last_backup() {
        Some(at) => println!(
            "Backup:    {} (last {})",
            ledger.backup_preference().as_str(),
            at.format("%Y-%m-%d %H:%M")
        ),
        None => println!("Backup:    {}", ledger.backup_preference().as_str()),
    }
}

fn print_history(ledger: &ExchangeLedger) {
    if ledger.transactions().is_empty() {
        println!("No transactions yet.");
        return;
    }
    for (index, tx) in ledger.transactions().iter().enumerate() {
        println!(
            "{:>3}  {}  {} -> {}  @ {}  profit {}  [{}]",
            index + 1,
            tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
            format_amount(tx.amount, tx.from_currency),
            format_amount(tx.result, tx.to_currency),
            format_amount(tx.rate, Currency::Lbp),
            format_amount(tx.profit, Currency::Lbp),
            tx.box_label()
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use clap::Parser;
    use ledger::{MemoryStore, SettingChange};

    use super::*;
    use crate::cli::Cli;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_760_000_000_000).unwrap()
    }

    async fn exec(args: &[&str], ledger: &mut ExchangeLedger, store: &MemoryStore) -> Result<()> {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        run(cli.command, ledger, store, now()).await
    }

    #[tokio::test]
    async fn exchange_is_persisted() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::load(&store).await.unwrap();
        exec(&["sarraf", "exchange", "usd", "500"], &mut ledger, &store)
            .await
            .unwrap();

        let reloaded = ExchangeLedger::load(&store).await.unwrap();
        assert_eq!(reloaded.transactions().len(), 1);
        assert_eq!(reloaded.boxes().my_box, 49_000_000.0);
    }

    #[tokio::test]
    async fn quote_changes_nothing() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::load(&store).await.unwrap();
        exec(&["sarraf", "quote", "lbp", "50000000"], &mut ledger, &store)
            .await
            .unwrap();
        assert!(ledger.transactions().is_empty());
        assert!(store.entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_rate_update_is_all_or_nothing() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::load(&store).await.unwrap();
        let result = exec(
            &["sarraf", "rates", "set", "--buy", "90000", "--sell", "0"],
            &mut ledger,
            &store,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(ledger.rates().buy_rate, 98_000.0);
        assert!(store.entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn export_requires_premium() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::load(&store).await.unwrap();
        exec(&["sarraf", "exchange", "usd", "5"], &mut ledger, &store)
            .await
            .unwrap();
        let result = exec(&["sarraf", "export"], &mut ledger, &store).await;
        assert!(matches!(
            result,
            Err(crate::error::AppError::Ledger(
                ledger::LedgerError::PremiumRequired(_)
            ))
        ));
    }

    #[tokio::test]
    async fn read_only_commands_leave_the_store_alone() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::load(&store).await.unwrap();
        sync(&mut ledger, &store, now()).await.unwrap();
        exec(&["sarraf", "status"], &mut ledger, &store)
            .await
            .unwrap();
        exec(&["sarraf", "history", "list"], &mut ledger, &store)
            .await
            .unwrap();
        assert!(store.entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sync_applies_published_settings_and_expiry() {
        let store = MemoryStore::new();
        let mut ledger = ExchangeLedger::load(&store).await.unwrap();
        ledger
            .transact(&store, |ledger| ledger.activate_premium(1, now()))
            .await
            .unwrap();
        AdminSettings {
            global_buy_rate: 97_000.0,
            ..AdminSettings::default()
        }
        .publish(&store)
        .await
        .unwrap();

        let later = now() + Duration::days(2);
        sync(&mut ledger, &store, later).await.unwrap();
        assert!(!ledger.quota().is_premium);
        assert_eq!(ledger.rates().buy_rate, 97_000.0);

        // Same settings a second time are not re-applied.
        let changes = ledger.apply_admin_settings(&AdminSettings {
            global_buy_rate: 97_000.0,
            ..AdminSettings::default()
        });
        assert_eq!(changes, Vec::<SettingChange>::new());
    }
}
