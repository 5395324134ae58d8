use crate::{BoxBalances, ResultLedger, VaultBalances, util::validate_balance};

use super::ExchangeLedger;

impl ExchangeLedger {
    /// Overrides both vault balances. Both values are validated before
    /// either is written.
    pub fn update_vault(&mut self, lbp: f64, usd: f64) -> ResultLedger<()> {
        let lbp = validate_balance(lbp, "LBP")?;
        let usd = validate_balance(usd, "USD")?;
        self.state.vault = VaultBalances { lbp, usd };
        self.touch();
        Ok(())
    }

    pub fn set_lbp_balance(&mut self, lbp: f64) -> ResultLedger<()> {
        self.state.vault.lbp = validate_balance(lbp, "LBP")?;
        self.touch();
        Ok(())
    }

    pub fn set_usd_balance(&mut self, usd: f64) -> ResultLedger<()> {
        self.state.vault.usd = validate_balance(usd, "USD")?;
        self.touch();
        Ok(())
    }

    /// Zeroes My Box and His Box.
    pub fn reset_boxes(&mut self) {
        self.state.boxes = BoxBalances::default();
        self.touch();
        tracing::info!("boxes reset");
    }

    /// Zeroes the boxes and restores the default vault balances.
    pub fn reset_balances(&mut self) {
        self.state.boxes = BoxBalances::default();
        self.state.vault = VaultBalances::default();
        self.touch();
        tracing::info!("boxes and vault reset");
    }
}
