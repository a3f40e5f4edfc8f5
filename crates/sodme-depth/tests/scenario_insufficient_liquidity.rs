use sodme_depth::{analyze, AnalyzeRequest};
use sodme_schemas::depth::{DepthLevel, DepthSnapshot};
use sodme_schemas::execution::{RecommendedAction, INSUFFICIENT_LIQUIDITY_IMPACT_BPS};
use sodme_schemas::instrument::Segment;
use sodme_schemas::money::Paise;
use sodme_schemas::order::Side;
use sodme_schemas::strategy::StrategySettings;
use uuid::Uuid;

#[test]
fn scenario_insufficient_liquidity_rejects_and_warns() {
    // BUY 1000 lots; top-5 asks sum to 600 lots.
    let depth = DepthSnapshot {
        instrument_token: 7,
        bids: vec![DepthLevel {
            price: Paise::from_rupees(99),
            quantity: 1_000,
        }],
        asks: vec![
            DepthLevel { price: Paise::from_rupees(100), quantity: 200 },
            DepthLevel { price: Paise::from_rupees(101), quantity: 200 },
            DepthLevel { price: Paise::from_rupees(102), quantity: 100 },
            DepthLevel { price: Paise::from_rupees(103), quantity: 50 },
            DepthLevel { price: Paise::from_rupees(104), quantity: 50 },
        ],
    };
    assert_eq!(depth.top5_opposite_quantity(Side::Buy), 600);

    let settings = StrategySettings::sane_defaults();
    let result = analyze(AnalyzeRequest {
        order_id: Uuid::new_v4(),
        correlates_with: None,
        instrument_token: 7,
        segment: Segment::Futures,
        side: Side::Buy,
        quantity: 1_000,
        depth: Some(&depth),
        settings: &settings,
    })
    .expect("depth is present");

    assert!(!result.can_fill_completely);
    assert_eq!(result.impact_bps, INSUFFICIENT_LIQUIDITY_IMPACT_BPS);
    assert_eq!(result.recommended_action, RecommendedAction::Reject);
    assert!(result.warnings.iter().any(|w| w == "INSUFFICIENT_LIQUIDITY"));
}
