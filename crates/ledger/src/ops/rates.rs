use crate::{AdminSettings, ExchangeRates, ResultLedger, SettingChange, util::validate_rate};

use super::ExchangeLedger;

impl ExchangeLedger {
    pub fn set_buy_rate(&mut self, rate: f64) -> ResultLedger<()> {
        self.state.rates.buy_rate = validate_rate(rate, "buy")?;
        self.touch();
        Ok(())
    }

    pub fn set_sell_rate(&mut self, rate: f64) -> ResultLedger<()> {
        self.state.rates.sell_rate = validate_rate(rate, "sell")?;
        self.touch();
        Ok(())
    }

    /// Back to 98 000 / 100 000. Balances and history are untouched.
    pub fn reset_rates(&mut self) {
        self.state.rates = ExchangeRates::default();
        self.touch();
        tracing::info!("rates reset to defaults");
    }

    /// Applies settings pushed by the admin back-office.
    ///
    /// Settings equal to the last applied ones are ignored. Otherwise every
    /// valid field overrides the local value; invalid fields (non-positive or
    /// non-finite) are skipped. Returns the values that actually changed.
    pub fn apply_admin_settings(&mut self, settings: &AdminSettings) -> Vec<SettingChange> {
        if self.applied_settings.as_ref() == Some(settings) {
            return Vec::new();
        }
        self.applied_settings = Some(*settings);

        let mut changes = Vec::new();

        let limit = settings.free_transaction_limit;
        if limit == 0 {
            tracing::warn!("ignoring admin free transaction limit of 0");
        } else if limit != self.state.quota.free_limit {
            changes.push(SettingChange::FreeLimit {
                from: self.state.quota.free_limit,
                to: limit,
            });
            self.state.quota.free_limit = limit;
        }

        match validate_rate(settings.global_buy_rate, "global buy") {
            Ok(rate) if rate != self.state.rates.buy_rate => {
                changes.push(SettingChange::BuyRate {
                    from: self.state.rates.buy_rate,
                    to: rate,
                });
                self.state.rates.buy_rate = rate;
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("ignoring admin setting: {err}"),
        }

        match validate_rate(settings.global_sell_rate, "global sell") {
            Ok(rate) if rate != self.state.rates.sell_rate => {
                changes.push(SettingChange::SellRate {
                    from: self.state.rates.sell_rate,
                    to: rate,
                });
                self.state.rates.sell_rate = rate;
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("ignoring admin setting: {err}"),
        }

        if !changes.is_empty() {
            self.touch();
            for change in &changes {
                tracing::info!("{change}");
            }
        }
        changes
    }
}
