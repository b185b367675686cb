use pivotgen::engines::agent::{AgentSnapshot, PivotAgent};
use pivotgen::types::{Action, PositionRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_walk(seed: u64, len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 10.0;
    (0..len)
        .map(|_| {
            price *= 1.0 + rng.gen_range(-0.02..0.02);
            price
        })
        .collect()
}

#[test]
fn test_breakout_then_stop_out() {
    let mut agent = PivotAgent::new(1, 0.01, 1000);
    agent.feed(&[10.0, 10.0, 10.0]).unwrap();
    assert_eq!(agent.pivots().centers, vec![10.0]);

    assert_eq!(agent.observe(10.05).unwrap(), None);

    let buy = agent.observe(10.2).unwrap().expect("breakout should buy");
    assert!(matches!(buy, Action::Buy { index: 4, .. }));
    assert!((buy.price() - 10.1).abs() < 1e-9);

    let sell = agent.observe(9.0).unwrap().expect("stop should sell");
    let stop = sell.price();
    assert!(matches!(sell, Action::Sell { index: 5, .. }));
    assert!((stop - 9.9).abs() < 1e-9);
    assert!(agent.position().is_none());

    match agent.position_history() {
        [PositionRecord::Buy { .. }, PositionRecord::Sell { .. }, PositionRecord::Report { profit }] => {
            assert!((profit - (stop - 10.1) / 10.1).abs() < 1e-12);
        }
        other => panic!("unexpected history {:?}", other),
    }

    let report = agent.report();
    assert_eq!(report.failure_count, 1);
    assert_eq!(report.success_count, 0);
}

#[test]
fn test_random_walk_invariants() {
    for seed in 0..5 {
        let prices = random_walk(seed, 400);
        let mut agent = PivotAgent::new(4, 0.003, 10_000);
        agent.feed(&prices[..100]).unwrap();

        let mut open = false;
        for &price in &prices[100..] {
            match agent.observe(price).unwrap() {
                Some(Action::Buy { .. }) => {
                    assert!(!open, "second position opened while one was open");
                    open = true;
                }
                Some(Action::Sell { .. }) => {
                    assert!(open, "sold without a position");
                    open = false;
                }
                None => {}
            }
            assert_eq!(open, agent.position().is_some());
        }

        // Consecutive events on the same pivot alternate direction
        for &pivot in &agent.pivots().centers {
            let kinds: Vec<_> = agent
                .events()
                .iter()
                .filter(|e| e.pivot == pivot)
                .map(|e| e.kind)
                .collect();
            assert!(kinds.windows(2).all(|w| w[0] != w[1]), "seed {}", seed);
        }

        // Report compounds every closed round trip
        let profits: Vec<f64> = agent
            .position_history()
            .iter()
            .filter_map(|r| match r {
                PositionRecord::Report { profit } => Some(*profit),
                _ => None,
            })
            .collect();
        let report = agent.report();
        let expected = profits.iter().fold(1.0, |acc, p| acc * (1.0 + p)) - 1.0;
        assert!((report.profit - expected).abs() < 1e-12);
        assert_eq!(report.trades(), profits.len());
    }
}

#[test]
fn test_snapshot_restore_resumes_identically() {
    let prices = random_walk(42, 300);
    let mut uninterrupted = PivotAgent::new(3, 0.004, 7);
    uninterrupted.feed(&prices[..60]).unwrap();
    for &price in &prices[60..150] {
        uninterrupted.observe(price).unwrap();
    }

    let mut restored = PivotAgent::restore(uninterrupted.snapshot()).unwrap();

    for &price in &prices[150..] {
        assert_eq!(uninterrupted.observe(price).unwrap(), restored.observe(price).unwrap());
    }
    assert_eq!(uninterrupted.snapshot(), restored.snapshot());
}

#[test]
fn test_json_snapshot_resumes_identically() {
    let prices = random_walk(42, 300);
    let mut uninterrupted = PivotAgent::new(3, 0.004, 5);
    uninterrupted.feed(&prices[..60]).unwrap();
    for &price in &prices[60..150] {
        uninterrupted.observe(price).unwrap();
    }

    let json = uninterrupted.snapshot().to_json().unwrap();
    let parsed = AgentSnapshot::from_json(&json).unwrap();
    assert_eq!(parsed, uninterrupted.snapshot());
    let mut restored = PivotAgent::restore(parsed).unwrap();

    for &price in &prices[150..] {
        assert_eq!(uninterrupted.observe(price).unwrap(), restored.observe(price).unwrap());
    }
    assert_eq!(uninterrupted.snapshot(), restored.snapshot());
}

#[test]
fn test_open_position_serializes_as_buy() {
    let mut agent = PivotAgent::new(1, 0.01, 1000);
    agent.feed(&[10.0, 10.0, 10.0]).unwrap();
    agent.observe(9.95).unwrap();
    agent.observe(10.2).unwrap();

    let json = agent.snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["position"]["type"], "BUY");
    assert_eq!(value["position"]["index"], 4);

    let restored = PivotAgent::restore(AgentSnapshot::from_json(&json).unwrap()).unwrap();
    assert_eq!(restored.position(), agent.position());
}

#[test]
fn test_snapshot_field_names() {
    let mut agent = PivotAgent::new(1, 0.01, 1000);
    agent.feed(&[10.0, 10.0, 10.0]).unwrap();
    agent.observe(9.95).unwrap();
    agent.observe(10.2).unwrap();

    let json = agent.snapshot().to_json().unwrap();
    let parsed = AgentSnapshot::from_json(&json).unwrap();
    assert_eq!(parsed.prices.len(), 5);
    assert_eq!(parsed.position_history, agent.position_history());

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for field in [
        "pivotsN",
        "pivotDiff",
        "prices",
        "events",
        "position",
        "positionHistory",
        "lastPrice",
        "logs",
        "margin",
        "pivots",
        "pivotHighs",
        "pivotLows",
    ] {
        assert!(value.get(field).is_some(), "missing {}", field);
    }
    assert_eq!(value["lastPrice"], 10.2);
    assert_eq!(value["events"][0]["kind"], "UP");
}

#[test]
fn test_feed_with_too_few_distinct_prices_fails() {
    let mut agent = PivotAgent::new(3, 0.01, 1);
    assert!(agent.feed(&[10.0, 10.0, 11.0]).is_err());
}
