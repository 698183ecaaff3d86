use super::TradeRecord;

/// Aggregate performance stats over a closed set of trades, in pips
/// (`TradeRecord::pnl_pips` is already normalized by pip size).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStatistics {
    pub total_closed: u64,
    pub total_wins: u64,
    pub total_losses: u64,
    pub total_pnl_pips: f64,
    pub total_win_pips: f64,
    pub total_loss_pips: f64,
    pub largest_win_pips: f64,
    pub largest_loss_pips: f64,
}

impl RunStatistics {
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        let mut stats = Self::default();
        for t in trades {
            stats.total_closed += 1;
            stats.total_pnl_pips += t.pnl_pips;
            if t.pnl_pips > 0.0 {
                stats.total_wins += 1;
                stats.total_win_pips += t.pnl_pips;
                stats.largest_win_pips = stats.largest_win_pips.max(t.pnl_pips);
            } else if t.pnl_pips < 0.0 {
                stats.total_losses += 1;
                stats.total_loss_pips += t.pnl_pips.abs();
                stats.largest_loss_pips = stats.largest_loss_pips.min(t.pnl_pips);
            }
        }
        stats
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_closed == 0 {
            0.0
        } else {
            self.total_wins as f64 / self.total_closed as f64
        }
    }

    /// Sum of winning pips over sum of absolute losing pips. `f64::INFINITY`
    /// when every trade won, `0.0` when there were no trades.
    pub fn profit_factor(&self) -> f64 {
        if self.total_loss_pips > 0.0 {
            self.total_win_pips / self.total_loss_pips
        } else if self.total_win_pips > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }

    pub fn expectancy_pips(&self) -> f64 {
        if self.total_closed == 0 {
            0.0
        } else {
            self.total_pnl_pips / self.total_closed as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions::Outcome;

    fn trade(pnl_pips: f64) -> TradeRecord {
        let direction = 1i8;
        let exit_price = 1.1000 + pnl_pips * direction as f64 * 0.0001;
        TradeRecord::new(
            1,
            direction,
            0.0,
            1.1000,
            1.0,
            exit_price,
            Outcome::Tp,
            0.0001,
            "test",
            std::collections::HashMap::new(),
        )
    }

    #[test]
    fn win_rate_over_mixed_trades() {
        let trades = vec![trade(10.0), trade(10.0), trade(-5.0)];
        let stats = RunStatistics::from_trades(&trades);
        assert!((stats.win_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn profit_factor_matches_win_loss_ratio() {
        let trades = vec![trade(100.0), trade(50.0), trade(-30.0), trade(-20.0)];
        let stats = RunStatistics::from_trades(&trades);
        assert!((stats.profit_factor() - 3.0).abs() < 0.01);
    }

    #[test]
    fn profit_factor_is_infinite_with_no_losses() {
        let trades = vec![trade(10.0), trade(5.0)];
        let stats = RunStatistics::from_trades(&trades);
        assert_eq!(stats.profit_factor(), f64::INFINITY);
    }

    #[test]
    fn empty_run_has_zeroed_stats() {
        let stats = RunStatistics::from_trades(&[]);
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.profit_factor(), 0.0);
        assert_eq!(stats.expectancy_pips(), 0.0);
    }
}
