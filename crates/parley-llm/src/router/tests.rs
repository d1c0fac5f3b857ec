//! Tests for router module

use super::*;

fn router() -> ModelRouter {
    ModelRouter::new(RouterConfig::default()).unwrap()
}

fn tenant_ctx() -> RoutingContext {
    RoutingContext::new().with_tenant(true)
}

#[test]
fn test_short_novel_message_routes_to_economy() {
    let decision = router().select("Do you offer gift cards", &tenant_ctx());
    assert_eq!(decision.tier, ModelTier::Economy);
    assert_eq!(decision.reason, RoutingReason::LowComplexity);
    assert_eq!(decision.model, "claude-haiku-4-5-20251001");
    assert_eq!(decision.score, 1);
}

#[test]
fn test_tools_and_tenant_route_to_premium() {
    let ctx = tenant_ctx().with_tools(true);
    let decision = router().select("Book me for tomorrow morning", &ctx);
    assert_eq!(decision.tier, ModelTier::Premium);
    assert_eq!(decision.reason, RoutingReason::Uncertain);
}

#[test]
fn test_complex_message_is_high_complexity() {
    let message = "I'm not sure whether the $120 deposit on invoice 4471 was refunded \
                   or if it was applied to my balance? Can you check? And what is the fee \
                   for changing the date?";
    let ctx = tenant_ctx().with_conversation_length(6);
    let decision = router().select(message, &ctx);
    assert_eq!(decision.tier, ModelTier::Premium);
    assert_eq!(decision.reason, RoutingReason::HighComplexity);
    assert!(decision.score > 6);
}

#[test]
fn test_score_factors() {
    let r = router();
    let empty = RoutingContext::new();

    assert_eq!(r.score("hi", &empty), 0);
    assert_eq!(r.score("room 12", &empty), 1);
    assert_eq!(r.score("what does it cost", &empty), 2);
    assert_eq!(r.score("costume party", &empty), 0);
    assert_eq!(r.score("50% off", &empty), 3);
    assert_eq!(r.score("maybe later", &empty), 2);
    assert_eq!(r.score("open? closed?", &empty), 1);
    assert_eq!(r.score(&"a".repeat(81), &empty), 1);
    assert_eq!(r.score(&"a".repeat(201), &empty), 2);
    assert_eq!(r.score(&"a".repeat(501), &empty), 3);

    assert_eq!(r.score("hi", &RoutingContext::new().with_conversation_length(4)), 1);
    assert_eq!(r.score("hi", &RoutingContext::new().with_conversation_length(10)), 2);
    assert_eq!(r.score("hi", &RoutingContext::new().with_tools(true)), 2);
}

#[test]
fn test_selection_is_deterministic() {
    let r = router();
    let ctx = tenant_ctx().with_conversation_length(3);
    let first = r.select("What is the refund policy?", &ctx);
    for _ in 0..10 {
        assert_eq!(r.select("What is the refund policy?", &ctx), first);
    }
}

#[test]
fn test_tier_is_monotonic_in_score() {
    let thresholds = [
        Thresholds::default(),
        Thresholds { low: 0, high: 0 },
        Thresholds { low: 5, high: 5 },
        Thresholds { low: 2, high: 9 },
    ];

    for t in thresholds {
        for a in -2..15 {
            for b in a + 1..16 {
                let (tier_a, _) = t.classify(a);
                let (tier_b, _) = t.classify(b);
                assert!(
                    tier_a.level() <= tier_b.level(),
                    "score {a} got {tier_a} but {b} got {tier_b} with {t:?}"
                );
            }
        }
    }
}

#[test]
fn test_boundaries_default_to_premium() {
    let t = Thresholds::default();
    assert_eq!(t.classify(2), (ModelTier::Economy, RoutingReason::LowComplexity));
    assert_eq!(t.classify(3), (ModelTier::Premium, RoutingReason::Uncertain));
    assert_eq!(t.classify(6), (ModelTier::Premium, RoutingReason::Uncertain));
    assert_eq!(t.classify(7), (ModelTier::Premium, RoutingReason::HighComplexity));
}

#[test]
fn test_adjust_thresholds() {
    let r = router();
    let ctx = tenant_ctx().with_tools(true);
    assert_eq!(r.select("Book me in", &ctx).tier, ModelTier::Premium);

    let updated = r.adjust_thresholds(2);
    assert_eq!(updated, Thresholds { low: 5, high: 8 });
    assert_eq!(r.select("Book me in", &ctx).tier, ModelTier::Economy);

    let updated = r.adjust_thresholds(-20);
    assert_eq!(updated.low, 0);
    assert!(updated.high >= updated.low);
    assert_eq!(r.thresholds(), updated);
}

#[test]
fn test_force_model() {
    let r = router();
    let ctx = tenant_ctx().with_force_model("premium");
    let decision = r.select("hi", &ctx);
    assert_eq!(decision.tier, ModelTier::Premium);
    assert_eq!(decision.reason, RoutingReason::Forced);
    assert_eq!(decision.model, "claude-sonnet-4-5-20250929");

    let ctx = tenant_ctx().with_force_model("claude-haiku-4-5-20251001");
    let decision = r.select("a very long and complicated question about my invoice?", &ctx);
    assert_eq!(decision.tier, ModelTier::Economy);
    assert_eq!(decision.reason, RoutingReason::Forced);

    let ctx = tenant_ctx().with_force_model("claude-opus-4-5");
    let decision = r.select("hi", &ctx);
    assert_eq!(decision.tier, ModelTier::Premium);
    assert_eq!(decision.model, "claude-opus-4-5");
}

#[test]
fn test_tier_parse() {
    assert_eq!("Economy".parse::<ModelTier>().unwrap(), ModelTier::Economy);
    assert!("gold".parse::<ModelTier>().is_err());
    assert_eq!(ModelTier::Premium.to_string(), "premium");
}

#[test]
fn test_empty_vocabulary_still_scores_currency() {
    let config = RouterConfig {
        financial_terms: vec![],
        ambiguous_phrases: vec![],
        ..RouterConfig::default()
    };
    let r = ModelRouter::new(config).unwrap();
    assert_eq!(r.score("£5", &RoutingContext::new()), 3);
    assert_eq!(r.score("maybe", &RoutingContext::new()), 0);
}
