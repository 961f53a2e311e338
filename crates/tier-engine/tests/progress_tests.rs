use proptest::prelude::*;
use tier_engine::{calculate_progress, TierLadder, TierProgress};
use tier_model::{AgentTier, PerformanceMetrics, TierConfiguration, TierRequirements};

fn any_tier() -> impl Strategy<Value = AgentTier> {
    prop_oneof![
        Just(AgentTier::Advisor),
        Just(AgentTier::SalesLeader),
        Just(AgentTier::TeamLeader),
        Just(AgentTier::GroupLeader),
        Just(AgentTier::SupremeLeader),
    ]
}

#[test]
fn test_advisor_with_five_sales_is_ready() {
    let progress = calculate_progress(
        &TierLadder::defaults(),
        AgentTier::Advisor,
        PerformanceMetrics::new(5, 0),
    );
    let next = progress.as_next().expect("advisor has a next tier");

    assert_eq!(next.next, AgentTier::SalesLeader);
    assert_eq!(next.sales.percent, 100.0);
    assert_eq!(next.team.percent, 100.0);
    assert_eq!(next.overall, 100.0);
    assert!(next.eligible);
}

#[test]
fn test_supreme_leader_is_terminal() {
    let progress = calculate_progress(
        &TierLadder::defaults(),
        AgentTier::SupremeLeader,
        PerformanceMetrics::new(1_000, 1_000),
    );
    assert_eq!(
        progress,
        TierProgress::MaxTierReached {
            current: AgentTier::SupremeLeader
        }
    );
}

#[test]
fn test_team_only_requirement_ignores_sales() {
    let ladder = TierLadder::defaults().with_row(TierConfiguration {
        requirements: TierRequirements::new(0, 4),
        ..TierConfiguration::default_for(AgentTier::SalesLeader)
    });
    let progress = calculate_progress(&ladder, AgentTier::Advisor, PerformanceMetrics::new(0, 1));
    let next = progress.as_next().unwrap();

    assert_eq!(next.sales.percent, 100.0);
    assert_eq!(next.team.percent, 25.0);
    assert_eq!(next.overall, 25.0);
    assert!(!next.eligible);
}

#[test]
fn test_max_tier_serializes_with_status_tag() {
    let json = serde_json::to_value(TierProgress::MaxTierReached {
        current: AgentTier::SupremeLeader,
    })
    .unwrap();
    assert_eq!(json["status"], "max_tier_reached");
    assert_eq!(json["current"], "supreme_leader");
}

proptest! {
    #[test]
    fn prop_percentages_stay_in_bounds(
        tier in any_tier(),
        sales in any::<i64>(),
        team in any::<i64>(),
    ) {
        let progress = calculate_progress(&TierLadder::defaults(), tier, PerformanceMetrics::new(sales, team));
        if let Some(next) = progress.as_next() {
            prop_assert!((0.0..=100.0).contains(&next.sales.percent));
            prop_assert!((0.0..=100.0).contains(&next.team.percent));
            prop_assert!((0.0..=100.0).contains(&next.overall));
        }
    }

    #[test]
    fn prop_next_tier_follows_ladder_order(tier in any_tier()) {
        let progress = calculate_progress(&TierLadder::defaults(), tier, PerformanceMetrics::default());
        match tier.next() {
            Some(expected) => {
                prop_assert_eq!(progress.as_next().map(|p| p.next), Some(expected));
                prop_assert_eq!(expected.index(), tier.index() + 1);
            }
            None => prop_assert!(progress.is_max_tier()),
        }
    }

    #[test]
    fn prop_meeting_every_threshold_is_full_progress(
        tier in any_tier(),
        extra_sales in 0i64..100,
        extra_team in 0i64..100,
    ) {
        let ladder = TierLadder::defaults();
        if let Some(next) = ladder.next_config(tier) {
            let metrics = PerformanceMetrics::new(
                i64::from(next.requirements.monthly_sales) + extra_sales,
                i64::from(next.requirements.team_members) + extra_team,
            );
            let progress = calculate_progress(&ladder, tier, metrics);
            let next = progress.as_next().unwrap();
            prop_assert_eq!(next.overall, 100.0);
            prop_assert!(next.eligible);
        }
    }

    #[test]
    fn prop_zero_sales_requirement_is_always_complete(sales in any::<i64>(), team in 0i64..50) {
        let ladder = TierLadder::defaults().with_row(TierConfiguration {
            requirements: TierRequirements::new(0, 0),
            ..TierConfiguration::default_for(AgentTier::SalesLeader)
        });
        let progress = calculate_progress(&ladder, AgentTier::Advisor, PerformanceMetrics::new(sales, team));
        let next = progress.as_next().unwrap();
        prop_assert_eq!(next.sales.percent, 100.0);
        prop_assert_eq!(next.overall, 100.0);
    }
}
