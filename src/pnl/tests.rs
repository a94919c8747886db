//! Unit tests for per-trade calculations

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::error::JournalError;
    use crate::testing::{assert_close, TradeBuilder};

    #[test]
    fn test_long_trade_pnl() {
        let trade = TradeBuilder::long(100.0)
            .margin(1000.0)
            .leverage(5.0)
            .closed(110.0, 10.0)
            .closed_trade();

        let pnl = trade.pnl();
        assert_close(pnl.position_value, 5000.0);
        assert_close(pnl.position_size, 50.0);
        assert_close(pnl.price_delta, 10.0);
        assert_close(pnl.pnl_gross, 500.0);
        assert_close(pnl.pnl_net, 490.0);
        assert_close(pnl.pnl_asset_percent, 10.0);
        assert_close(pnl.pnl_margin_percent, 49.0);
        assert_eq!(pnl.roi_percent, pnl.pnl_margin_percent);
    }

    #[test]
    fn test_short_trade_pnl() {
        let trade = TradeBuilder::short(100.0)
            .margin(500.0)
            .leverage(2.0)
            .closed(90.0, 0.0)
            .closed_trade();

        let pnl = trade.pnl();
        assert_close(pnl.position_value, 1000.0);
        assert_close(pnl.position_size, 10.0);
        assert_close(pnl.price_delta, 10.0);
        assert_close(pnl.pnl_gross, 100.0);
        assert_close(pnl.pnl_net, 100.0);
        assert_close(pnl.pnl_margin_percent, 20.0);
    }

    #[test]
    fn test_losing_short_is_negative() {
        let pnl = TradeBuilder::short(100.0)
            .margin(500.0)
            .leverage(2.0)
            .closed(105.0, 2.0)
            .closed_trade()
            .pnl();

        assert_close(pnl.price_delta, -5.0);
        assert_close(pnl.pnl_net, -52.0);
        assert_close(pnl.pnl_asset_percent, -5.0);
    }

    #[test]
    fn test_stop_loss_replaces_planned_risk() {
        let pnl = TradeBuilder::long(100.0)
            .margin(1000.0)
            .leverage(5.0)
            .risk_percent(1.0)
            .stop_loss(95.0)
            .closed(110.0, 10.0)
            .closed_trade()
            .pnl();

        assert_close(pnl.risk_amount, 50.0);
        assert_close(pnl.risk_amount_from_stop_loss.unwrap(), 250.0);
        assert_close(pnl.risk_amount_actual, 250.0);
        assert_close(pnl.stop_loss_percent.unwrap(), 5.0);
        assert_close(pnl.rr_realized.unwrap(), 490.0 / 250.0);
    }

    #[test]
    fn test_stop_loss_on_wrong_side_is_ignored() {
        // A long stop above entry cannot be a stop
        let pnl = TradeBuilder::long(100.0)
            .margin(1000.0)
            .risk_percent(2.0)
            .stop_loss(105.0)
            .closed(110.0, 0.0)
            .closed_trade()
            .pnl();

        assert!(pnl.risk_amount_from_stop_loss.is_none());
        assert!(pnl.stop_loss_percent.is_none());
        assert_close(pnl.risk_amount_actual, 20.0);
        assert!(pnl.rr_planned.is_none());
    }

    #[test]
    fn test_stop_loss_at_entry_is_ignored() {
        let pnl = TradeBuilder::long(100.0)
            .stop_loss(100.0)
            .closed(101.0, 0.0)
            .closed_trade()
            .pnl();

        assert!(pnl.risk_amount_from_stop_loss.is_none());
    }

    #[test]
    fn test_short_stop_above_entry_is_valid() {
        let pnl = TradeBuilder::short(100.0)
            .margin(1000.0)
            .stop_loss(110.0)
            .take_profit(80.0)
            .closed(90.0, 0.0)
            .closed_trade()
            .pnl();

        // size 10, stop distance 10, target distance 20
        assert_close(pnl.risk_amount_from_stop_loss.unwrap(), 100.0);
        assert_close(pnl.reward_from_take_profit.unwrap(), 200.0);
        assert_close(pnl.take_profit_percent.unwrap(), 20.0);
        assert_close(pnl.rr_planned.unwrap(), 2.0);
        assert_close(pnl.rr_realized.unwrap(), 1.0);
    }

    #[test]
    fn test_planned_rr_needs_both_levels() {
        let pnl = TradeBuilder::long(100.0)
            .take_profit(120.0)
            .closed(110.0, 0.0)
            .closed_trade()
            .pnl();

        assert!(pnl.reward_from_take_profit.is_some());
        assert!(pnl.rr_planned.is_none());
    }

    #[test]
    fn test_planned_rr_long() {
        let pnl = TradeBuilder::long(100.0)
            .margin(1000.0)
            .leverage(5.0)
            .stop_loss(95.0)
            .take_profit(115.0)
            .closed(110.0, 0.0)
            .closed_trade()
            .pnl();

        assert_close(pnl.reward_from_take_profit.unwrap(), 750.0);
        assert_close(pnl.rr_planned.unwrap(), 3.0);
    }

    #[test]
    fn test_take_profit_on_wrong_side_is_ignored() {
        let pnl = TradeBuilder::short(100.0)
            .stop_loss(105.0)
            .take_profit(120.0)
            .closed(95.0, 0.0)
            .closed_trade()
            .pnl();

        assert!(pnl.reward_from_take_profit.is_none());
        assert!(pnl.take_profit_percent.is_none());
        assert!(pnl.rr_planned.is_none());
    }

    #[test]
    fn test_no_risk_basis_gives_no_realized_rr() {
        let pnl = TradeBuilder::long(100.0)
            .risk_percent(0.0)
            .closed(110.0, 0.0)
            .closed_trade()
            .pnl();

        assert_eq!(pnl.risk_amount_actual, 0.0);
        assert!(pnl.rr_realized.is_none());
    }

    #[test]
    fn test_zero_margin_does_not_divide() {
        let pnl = TradeBuilder::long(100.0)
            .margin(0.0)
            .closed(110.0, 5.0)
            .closed_trade()
            .pnl();

        assert_eq!(pnl.pnl_margin_percent, 0.0);
        assert_eq!(pnl.roi_percent, 0.0);
        assert_close(pnl.pnl_net, -5.0);
    }

    #[test]
    fn test_zero_entry_price_does_not_divide() {
        let pnl = TradeBuilder::long(0.0)
            .margin(1000.0)
            .stop_loss(-1.0)
            .closed(10.0, 0.0)
            .closed_trade()
            .pnl();

        assert_eq!(pnl.position_size, 0.0);
        assert_eq!(pnl.pnl_asset_percent, 0.0);
        assert_eq!(pnl.pnl_gross, 0.0);
        assert_eq!(pnl.stop_loss_percent, Some(0.0));
        assert!(pnl.pnl_margin_percent.is_finite());
    }

    #[test]
    fn test_leverage_is_not_bounded() {
        let pnl = TradeBuilder::long(100.0)
            .margin(100.0)
            .leverage(250.0)
            .closed(101.0, 0.0)
            .closed_trade()
            .pnl();

        assert_close(pnl.position_value, 25_000.0);
        assert_close(pnl.pnl_net, 250.0);
    }

    #[test]
    fn test_pnl_is_deterministic() {
        let trade = TradeBuilder::long(64_250.5)
            .margin(321.0)
            .leverage(17.0)
            .stop_loss(63_000.0)
            .closed(65_010.25, 1.75)
            .closed_trade();

        assert_eq!(trade.pnl(), trade.pnl());
    }

    #[test]
    fn test_closed_calculator_rejects_open_trade() {
        let trade = TradeBuilder::long(100.0).build();
        let err = compute_closed_trade_pnl(&trade).unwrap_err();
        assert!(matches!(
            err,
            JournalError::InvalidState { expected: "closed", actual: "open", .. }
        ));
    }

    #[test]
    fn test_closed_calculator_rejects_incomplete_record() {
        let mut trade = TradeBuilder::long(100.0).closed(110.0, 1.0).build();
        trade.fees = None;
        let err = compute_closed_trade_pnl(&trade).unwrap_err();
        assert!(matches!(err, JournalError::IncompleteTrade { field: "fees", .. }));
    }

    #[test]
    fn test_closed_calculator_on_record() {
        let trade = TradeBuilder::long(100.0)
            .margin(1000.0)
            .leverage(5.0)
            .closed(110.0, 10.0)
            .build();
        let pnl = compute_closed_trade_pnl(&trade).unwrap();
        assert_close(pnl.pnl_net, 490.0);
    }

    #[test]
    fn test_open_metrics() {
        let trade = TradeBuilder::long(100.0)
            .margin(500.0)
            .leverage(4.0)
            .risk_percent(2.0)
            .stop_loss(98.0)
            .take_profit(106.0)
            .build();

        let metrics = compute_open_trade_metrics(&trade).unwrap();
        assert_close(metrics.position_value, 2000.0);
        assert_close(metrics.position_size, 20.0);
        assert_close(metrics.risk_amount_planned, 40.0);
        assert_close(metrics.risk_amount_actual, 40.0);
        assert_close(metrics.stop_loss_percent.unwrap(), 2.0);
        assert_close(metrics.reward_from_take_profit.unwrap(), 120.0);
        assert_close(metrics.take_profit_percent.unwrap(), 6.0);
        assert_close(metrics.rr_planned.unwrap(), 3.0);
    }

    #[test]
    fn test_open_metrics_fall_back_to_planned_risk() {
        let metrics = TradeBuilder::short(50.0)
            .margin(200.0)
            .leverage(10.0)
            .risk_percent(1.5)
            .stop_loss(45.0)
            .open_trade()
            .metrics();

        assert!(metrics.stop_loss_percent.is_none());
        assert_close(metrics.risk_amount_actual, 30.0);
    }

    #[test]
    fn test_open_calculator_rejects_closed_trade() {
        let trade = TradeBuilder::long(100.0).closed(110.0, 0.0).build();
        assert!(matches!(
            compute_open_trade_metrics(&trade),
            Err(JournalError::InvalidState { expected: "open", .. })
        ));
    }

    #[test]
    fn test_entry_preview() {
        let preview = EntryPreview::new(250.0, 8.0, 40.0, 1.0);
        assert_close(preview.position_value, 2000.0);
        assert_close(preview.position_size, 50.0);
        assert_close(preview.risk_amount, 20.0);

        let empty = EntryPreview::new(250.0, 8.0, 0.0, 1.0);
        assert_eq!(empty.position_size, 0.0);
    }

    #[test]
    fn test_entry_preview_matches_open_metrics() {
        let trade = TradeBuilder::short(40.0)
            .margin(250.0)
            .leverage(8.0)
            .risk_percent(2.0)
            .build();
        let preview = EntryPreview::for_trade(&trade);
        let metrics = compute_open_trade_metrics(&trade).unwrap();

        assert_close(preview.position_value, metrics.position_value);
        assert_close(preview.position_size, metrics.position_size);
        assert_close(preview.risk_amount, metrics.risk_amount_planned);
        assert_close(preview.risk_amount, 40.0);
    }
}
