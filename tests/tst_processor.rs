use nifty_option_chain::html::render_table;
use nifty_option_chain::processor::build_view_model;
use nifty_option_chain::{OptionChain, OptionData, OptionDetail, Records};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn side(oi: f64, change: f64, ltp: f64) -> Option<OptionDetail> {
        Some(OptionDetail {
            open_interest: oi,
            change_in_oi: change,
            last_price: ltp,
            ..Default::default()
        })
    }

    fn entry(strike: f64, call: Option<OptionDetail>, put: Option<OptionDetail>) -> OptionData {
        OptionData {
            strike_price: Some(strike),
            expiry_date: None,
            call,
            put,
        }
    }

    fn chain(underlying: Option<f64>, data: Vec<OptionData>) -> OptionChain {
        OptionChain {
            records: Some(Records {
                timestamp: None,
                underlying_value: underlying,
                data: Some(data),
                strike_prices: None,
            }),
        }
    }

    /// `count` strikes spaced 50 apart from 20000, OI rising with the strike
    fn ladder(count: usize) -> Vec<OptionData> {
        (0..count)
            .map(|i| {
                let strike = 20000.0 + 50.0 * i as f64;
                entry(
                    strike,
                    side(100.0 + i as f64, i as f64, 10.0),
                    side(500.0 - i as f64, -(i as f64), 20.0),
                )
            })
            .collect()
    }

    fn strikes(view: &nifty_option_chain::ViewModel) -> Vec<f64> {
        view.rows.iter().map(|r| r.strike_price).collect()
    }

    #[test]
    fn test_worked_example() {
        let raw = chain(
            Some(109.0),
            vec![
                entry(100.0, side(300.0, 10.0, 5.0), side(100.0, 1.0, 0.5)),
                entry(110.0, side(400.0, 20.0, 3.0), side(500.0, 30.0, 2.5)),
                entry(120.0, side(800.0, 5.0, 1.2), side(50.0, 2.0, 9.0)),
            ],
        );

        let view = build_view_model(Some(&raw));
        assert_eq!(strikes(&view), vec![100.0, 110.0, 120.0]);

        let current: Vec<f64> = view
            .rows
            .iter()
            .filter(|r| r.is_current_strike)
            .map(|r| r.strike_price)
            .collect();
        assert_eq!(current, vec![110.0]);

        let derived = view.derived.as_ref().unwrap();
        assert_eq!(derived.support, "107.50");
        assert_eq!(derived.resistance, "121.20");
        assert_eq!(derived.pcr, "0.43");

        let totals = view.totals.as_ref().unwrap();
        assert_eq!(totals.call_oi, 1500.0);
        assert_eq!(totals.call_change_oi, 35.0);
        assert_eq!(totals.put_oi, 650.0);
        assert_eq!(totals.put_change_oi, 33.0);

        assert!(view.rows[2].call.is_highest_oi);
        assert!(view.rows[1].call.is_highest_change_oi);
        assert!(view.rows[1].put.is_highest_oi);
        assert!(view.rows[1].put.is_highest_change_oi);
    }

    #[test]
    fn test_absent_payload_is_empty() {
        let view = build_view_model(None);
        assert!(view.rows.is_empty());
        assert!(view.totals.is_none());
        assert!(view.derived.is_none());

        let no_records = OptionChain { records: None };
        assert!(build_view_model(Some(&no_records)).rows.is_empty());

        let no_data = OptionChain {
            records: Some(Records {
                underlying_value: Some(100.0),
                ..Default::default()
            }),
        };
        let view = build_view_model(Some(&no_data));
        assert!(view.rows.is_empty() && view.totals.is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json, serde_json::json!({"filteredData": [], "totals": {}}));
    }

    #[test]
    fn test_no_complete_entries_is_empty() {
        let raw = chain(
            Some(105.0),
            vec![
                entry(100.0, side(10.0, 0.0, 1.0), None),
                entry(110.0, None, side(10.0, 0.0, 1.0)),
                entry(120.0, None, None),
            ],
        );

        let view = build_view_model(Some(&raw));
        assert!(view.rows.is_empty());
        assert!(view.totals.is_none());
    }

    #[test]
    fn test_duplicate_strike_keeps_first_only() {
        let raw = chain(
            Some(110.0),
            vec![
                entry(100.0, side(10.0, 0.0, 1.0), side(10.0, 0.0, 1.0)),
                entry(110.0, side(20.0, 0.0, 1.0), side(30.0, 0.0, 1.0)),
                entry(110.0, side(9999.0, 0.0, 1.0), side(9999.0, 0.0, 1.0)),
                entry(120.0, side(40.0, 0.0, 1.0), side(50.0, 0.0, 1.0)),
            ],
        );

        let view = build_view_model(Some(&raw));
        assert_eq!(strikes(&view), vec![100.0, 110.0, 120.0]);

        let totals = view.totals.unwrap();
        assert_eq!(totals.call_oi, 70.0);
        assert_eq!(totals.put_oi, 90.0);
        assert_eq!(view.rows[1].call.base.open_interest, 20.0);
    }

    #[test]
    fn test_incomplete_first_occurrence_does_not_shadow_complete_duplicate() {
        let raw = chain(
            Some(100.0),
            vec![
                entry(100.0, side(1.0, 0.0, 1.0), None),
                entry(100.0, side(7.0, 0.0, 1.0), side(8.0, 0.0, 1.0)),
            ],
        );

        let view = build_view_model(Some(&raw));
        assert_eq!(strikes(&view), vec![100.0]);
        assert_eq!(view.rows[0].call.base.open_interest, 7.0);
    }

    #[test]
    fn test_window_is_centered_and_bounded() {
        // ATM is index 20 (21000)
        let raw = chain(Some(21010.0), ladder(40));
        let view = build_view_model(Some(&raw));

        assert_eq!(view.rows.len(), 17);
        assert_eq!(view.rows[0].strike_price, 20600.0);
        assert_eq!(view.rows[16].strike_price, 21400.0);
        assert!(view.rows[8].is_current_strike);
        assert_eq!(view.rows.iter().filter(|r| r.is_current_strike).count(), 1);

        let unique: HashSet<u64> = view.rows.iter().map(|r| r.strike_price.to_bits()).collect();
        assert_eq!(unique.len(), view.rows.len());
    }

    #[test]
    fn test_window_clamps_at_edges() {
        let low = build_view_model(Some(&chain(Some(19000.0), ladder(40))));
        assert_eq!(low.rows.len(), 9);
        assert_eq!(low.rows[0].strike_price, 20000.0);
        assert!(low.rows[0].is_current_strike);

        let high = build_view_model(Some(&chain(Some(99999.0), ladder(40))));
        assert_eq!(high.rows.len(), 9);
        assert_eq!(high.rows[8].strike_price, 21950.0);
        assert!(high.rows[8].is_current_strike);
    }

    #[test]
    fn test_metrics_only_cover_the_window() {
        let mut data = ladder(40);
        // Far outside the window around 21000
        data[0].put = side(1_000_000.0, 0.0, 1.0);

        let view = build_view_model(Some(&chain(Some(21000.0), data)));
        let totals = view.totals.as_ref().unwrap();
        assert!(totals.put_oi < 1_000_000.0);

        // Highest put OI inside the window is at 20600 (index 12): 500 - 12
        let derived = view.derived.as_ref().unwrap();
        assert_eq!(derived.support, "20580.00");
        // Highest call OI inside the window is at 21400 (index 28)
        assert_eq!(derived.resistance, "21410.00");
    }

    #[test]
    fn test_highest_flags_present_on_both_sides() {
        let view = build_view_model(Some(&chain(Some(21000.0), ladder(40))));
        assert!(view.rows.iter().any(|r| r.call.is_highest_oi));
        assert!(view.rows.iter().any(|r| r.put.is_highest_oi));
        assert!(view.rows.iter().any(|r| r.call.is_highest_change_oi));
        assert!(view.rows.iter().any(|r| r.put.is_highest_change_oi));
    }

    #[test]
    fn test_pcr_sentinel_iff_zero_call_oi() {
        let zero_calls = chain(
            Some(100.0),
            vec![entry(100.0, side(0.0, 0.0, 1.0), side(250.0, 0.0, 1.0))],
        );
        let view = build_view_model(Some(&zero_calls));
        assert_eq!(view.derived.unwrap().pcr, "N/A");

        let zero_puts = chain(
            Some(100.0),
            vec![entry(100.0, side(250.0, 0.0, 1.0), side(0.0, 0.0, 1.0))],
        );
        let view = build_view_model(Some(&zero_puts));
        assert_eq!(view.derived.unwrap().pcr, "0.00");
    }

    #[test]
    fn test_anchor_tie_goes_to_first_strike() {
        let raw = chain(
            Some(105.0),
            vec![
                entry(110.0, side(1.0, 0.0, 1.0), side(1.0, 0.0, 1.0)),
                entry(100.0, side(1.0, 0.0, 1.0), side(1.0, 0.0, 1.0)),
            ],
        );

        let view = build_view_model(Some(&raw));
        assert!(view.rows[0].is_current_strike);
        assert!(!view.rows[1].is_current_strike);
    }

    #[test]
    fn test_missing_underlying_value() {
        let view = build_view_model(Some(&chain(None, ladder(40))));

        assert_eq!(view.rows.len(), 8);
        assert_eq!(view.rows[0].strike_price, 20000.0);
        assert!(view.rows.iter().all(|r| !r.is_current_strike));

        let market = &view.derived.as_ref().unwrap().market;
        assert_eq!(market.current_price, None);
        assert_eq!(market.open, None);
    }

    #[test]
    fn test_market_snapshot_reads_strike_list() {
        let mut raw = chain(Some(21000.0), ladder(5));
        if let Some(records) = raw.records.as_mut() {
            records.strike_prices = Some(vec![Some(20000.0), Some(20050.0), Some(20100.0), Some(20150.0), Some(20200.0)]);
        }

        let market = build_view_model(Some(&raw)).derived.unwrap().market;
        assert_eq!(market.current_price, Some(21000.0));
        assert_eq!(market.open, Some(20000.0));
        assert_eq!(market.high, Some(20200.0));
        assert_eq!(market.prev_close, Some(20100.0));
    }

    #[test]
    fn test_bad_rows_do_not_empty_the_table() {
        let json = r#"{
            "records": {
                "underlyingValue": 105,
                "strikePrices": [100, "n/a", 110],
                "data": [
                    {"strikePrice": 100,
                     "CE": {"openInterest": 300, "changeinOpenInterest": 5, "lastPrice": 7.5},
                     "PE": {"openInterest": 200, "changeinOpenInterest": 3, "lastPrice": 2.0}},
                    {"strikePrice": 110,
                     "CE": {"openInterest": null, "changeinOpenInterest": null, "lastPrice": 1.5},
                     "PE": {"openInterest": 400, "changeinOpenInterest": 8, "lastPrice": 9.0}},
                    {"expiryDate": "23-Oct-2026",
                     "CE": {"openInterest": 999999},
                     "PE": {"openInterest": 999999}}
                ]
            }
        }"#;

        let raw: OptionChain = serde_json::from_str(json).unwrap();
        let view = build_view_model(Some(&raw));

        // The strike-less entry is dropped, the null-OI one counts as 0
        assert_eq!(strikes(&view), vec![100.0, 110.0]);
        assert_eq!(view.rows[1].call.base.open_interest, 0.0);

        let totals = view.totals.as_ref().unwrap();
        assert_eq!(totals.call_oi, 300.0);
        assert_eq!(totals.put_oi, 600.0);

        let derived = view.derived.as_ref().unwrap();
        assert_eq!(derived.pcr, "2.00");
        assert_eq!(derived.support, "101.00");
        assert_eq!(derived.resistance, "107.50");
        // Unreadable middle element falls back to spot
        assert_eq!(derived.market.prev_close, Some(105.0));
        assert_eq!(derived.market.high, Some(110.0));

        let html = render_table(&view);
        assert_eq!(html.matches("<td class=\"strike\">").count(), 2);
        assert!(!html.contains("No option chain data available."));
    }

    #[test]
    fn test_deterministic() {
        let raw = chain(Some(20777.0), ladder(25));
        assert_eq!(build_view_model(Some(&raw)), build_view_model(Some(&raw)));
    }
}
