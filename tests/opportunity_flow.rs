//! End-to-end flow: snapshot repository -> detectors -> narrative synthesis.

use std::sync::Arc;

use serde_json::json;

use advisor_radar::adapters::ai::{MockFailure, MockNarrativeProvider};
use advisor_radar::adapters::repository::InMemoryRecordRepository;
use advisor_radar::application::narrative::{
    NarrativeRequest, NarrativeSynthesizer, ScriptCategory, FALLBACK_ACTION, FALLBACK_HEADLINE,
};
use advisor_radar::application::OpportunityService;
use advisor_radar::config::{DetectionConfig, NarrativeConfig};
use advisor_radar::domain::foundation::AdvisorId;
use advisor_radar::domain::opportunity::OpportunityKind;
use advisor_radar::domain::records::{ContributionPlan, FundHolding, ProtectionPolicy};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn seeded_repository() -> InMemoryRecordRepository {
    // Feed-shaped records: string flags, grouped amounts, loose dates.
    let plans: Vec<ContributionPlan> = serde_json::from_value(json!([
        {
            "client_id": "c-alpha", "advisor_id": "a-1", "advisor_code": "ADV001",
            "amount": "10,000", "increment_percentage": 10.0, "increment_period": "6M",
            "is_active": "true", "current_status": "Success", "deleted": "false",
            "start_date": "2023-01-01", "latest_success_date": "2023-05-01",
            "success_amount": "1,50,000", "failed_amount": 0
        },
        {
            "client_id": "c-beta", "advisor_id": "a-1", "advisor_code": "ADV001",
            "amount": 8000, "is_active": "true", "current_status": "Failed",
            "deleted": "false", "success_amount": 4000, "failed_amount": 6000
        },
        {
            "client_id": "c-gamma", "advisor_id": "a-2", "advisor_code": "ADV002",
            "amount": 20000, "is_active": "true", "current_status": "Success",
            "deleted": "false", "latest_success_date": "2024-01-01",
            "success_amount": 6000000, "failed_amount": 0
        }
    ]))
    .unwrap();

    let policies: Vec<ProtectionPolicy> = serde_json::from_value(json!([
        {
            "client_id": "c-alpha", "client_name": "A. Alpha", "advisor_id": "a-1",
            "insurance_type": "Health", "premium": 20000, "premium_gap": "45,000",
            "baseline_expected_premium": 65000, "opportunity_score": 80,
            "mf_current_value": 2500000, "wealth_band": "1Cr-5Cr", "deleted": "false"
        }
    ]))
    .unwrap();

    let holdings: Vec<FundHolding> = serde_json::from_value(json!([
        {
            "client_id": "c-alpha", "wpc": "W1", "scheme_name": "Lagging Fund",
            "current_value": 900000, "portfolio_weight": 12.0,
            "three_year_alpha": -2.1, "rating": "2.0"
        },
        {
            "client_id": "c-alpha", "wpc": "W2", "scheme_name": "Heavy Fund",
            "current_value": 1500000, "portfolio_weight": 38.0,
            "three_year_alpha": 1.4, "rating": "Unrated"
        }
    ]))
    .unwrap();

    InMemoryRecordRepository::new()
        .with_plans(plans)
        .with_policies(policies)
        .with_holdings(holdings)
}

#[tokio::test]
async fn combined_sip_detection_over_a_snapshot() {
    init_tracing();
    let service = OpportunityService::new(
        Arc::new(seeded_repository()),
        DetectionConfig::default(),
    );

    let found = service.sip_opportunities(None, Some(30)).await.unwrap();

    // c-beta trips the failed rule, c-gamma the high-value-inactive rule,
    // c-alpha the no-increase rule (old success, step-up never taken).
    let kinds: Vec<OpportunityKind> = found.iter().map(|o| o.kind).collect();
    assert!(kinds.contains(&OpportunityKind::FailedSipTransactions));
    assert!(kinds.contains(&OpportunityKind::HighValueInactive));
    assert!(kinds.contains(&OpportunityKind::NoSipIncrease));
}

#[tokio::test]
async fn advisor_scoped_detection_only_sees_that_book() {
    let service = OpportunityService::new(
        Arc::new(seeded_repository()),
        DetectionConfig::default(),
    );

    let advisor = AdvisorId::new("a-2").unwrap();
    let found = service.sip_opportunities(Some(&advisor), None).await.unwrap();
    assert!(found.iter().all(|o| o.client_id.as_str() == "c-gamma"));
    assert!(!found.is_empty());
}

#[tokio::test]
async fn insurance_rules_join_plans_against_policies() {
    let service = OpportunityService::new(
        Arc::new(seeded_repository()),
        DetectionConfig::default(),
    );

    let gaps = service.coverage_gap_opportunities(None, None).await.unwrap();
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].client_id.as_str(), "c-alpha");
    assert_eq!(gaps[0].opportunity_score, 80);

    // c-gamma has 6M invested and no policy anywhere: top priority.
    let uninsured = service.no_coverage_opportunities(None, None).await.unwrap();
    assert_eq!(uninsured.len(), 1);
    let opp = &uninsured[0];
    assert_eq!(opp.client_id.as_str(), "c-gamma");
    assert_eq!(opp.opportunity_score, 100);
    assert_eq!(opp.wealth_band, "5Cr+");
    assert_eq!(opp.baseline_expected_premium, 100000.0);
}

#[tokio::test]
async fn portfolio_rules_flag_lag_concentration_and_skip_unrated() {
    let service = OpportunityService::new(
        Arc::new(seeded_repository()),
        DetectionConfig::default(),
    );

    let lagging = service.underperforming_holdings(None, None).await.unwrap();
    assert_eq!(lagging.len(), 1);
    assert_eq!(lagging[0].wpc.as_deref(), Some("W1"));

    let low_rated = service.low_rated_holdings(None, None).await.unwrap();
    // The "Unrated" holding is silently excluded, not an error.
    assert_eq!(low_rated.len(), 1);
    assert_eq!(low_rated[0].wpc.as_deref(), Some("W1"));

    let concentrated = service.concentrated_holdings(None, None).await.unwrap();
    assert_eq!(concentrated.len(), 1);
    assert_eq!(concentrated[0].wpc.as_deref(), Some("W2"));
}

#[tokio::test]
async fn repeated_passes_over_an_unchanged_snapshot_agree() {
    let service = OpportunityService::new(
        Arc::new(seeded_repository()),
        DetectionConfig::default(),
    );

    let first = service.portfolio_opportunities(None, None).await.unwrap();
    let second = service.portfolio_opportunities(None, None).await.unwrap();

    let keys =
        |opps: &[advisor_radar::domain::opportunity::PortfolioOpportunity]| -> Vec<(String, String)> {
            opps.iter()
                .map(|o| (o.client_id.to_string(), o.wpc.clone().unwrap_or_default()))
                .collect()
        };
    assert_eq!(keys(&first), keys(&second));
}

#[tokio::test]
async fn detected_opportunity_flows_into_a_compliant_script() {
    let service = OpportunityService::new(
        Arc::new(seeded_repository()),
        DetectionConfig::default(),
    );
    let found = service.sip_opportunities(None, None).await.unwrap();
    let top = &found[0];

    let provider = MockNarrativeProvider::new().with_reply(
        json!({
            "client_id": top.client_id.as_str(),
            "urgency_score": 78,
            "opportunity_type": "SIP_RECOVERY",
            "headline": "Investment Interruption Alert",
            "talking_point": "Recovering the interrupted installments restores compounding. A short review call would realign the plan.",
            "suggested_action": "Restore Regularity"
        })
        .to_string(),
    );
    let synthesizer = NarrativeSynthesizer::new(NarrativeConfig::default(), Arc::new(provider));

    let request = NarrativeRequest::new(
        "A. Alpha",
        top.kind.label(),
        serde_json::to_value(top).unwrap(),
    );
    let outcome = synthesizer.analyze(&request).await;

    assert!(!outcome.is_fallback());
    assert_eq!(outcome.script.client_id, top.client_id.as_str());
    assert_eq!(outcome.script.opportunity_type, Some(ScriptCategory::SipRecovery));
}

#[tokio::test]
async fn batch_synthesis_degrades_per_item_not_per_batch() {
    init_tracing();
    let good_reply = json!({
        "client_id": "c-beta",
        "urgency_score": 66,
        "opportunity_type": "SIP_RECOVERY",
        "headline": "Compounding Break Alert",
        "talking_point": "The failed installments broke compounding. A quick review restores the contribution rhythm.",
        "suggested_action": "Restore Regularity"
    })
    .to_string();

    // First item succeeds; the second exhausts its retry and falls back.
    let provider = MockNarrativeProvider::new()
        .with_reply(good_reply)
        .with_failure(MockFailure::Unavailable { message: "down".into() })
        .with_failure(MockFailure::Unavailable { message: "down".into() });

    let mut config = NarrativeConfig::default();
    config.batch_concurrency = 1;
    let synthesizer = NarrativeSynthesizer::new(config, Arc::new(provider));

    let requests = vec![
        NarrativeRequest::new("B. Beta", "Failed SIP Transactions", json!({"failed": 6000})),
        NarrativeRequest::new("G. Gamma", "High-Value Inactive Client", json!({"days": 150})),
    ];
    let outcomes = synthesizer.analyze_batch(&requests).await;

    assert_eq!(outcomes.len(), 2);
    assert!(!outcomes[0].is_fallback());
    assert!(outcomes[1].is_fallback());
    assert_eq!(outcomes[1].script.headline, FALLBACK_HEADLINE);
    assert_eq!(outcomes[1].script.suggested_action, FALLBACK_ACTION);
}
