//! End-to-end scenarios for `allocate` and `aggregate`.

use assert_json_diff::assert_json_eq;
use serde_json::json;

use pr_pipeline::{
    aggregate, allocate, allocate_detailed, run_nation, AggregateError, AllocError, AllocNote,
    AllocOptions, DistrictConfig, Method, OverAllocRule, PartyId, SeatMap, TieBreak,
};

fn district(seats: u32, pairs: &[(&str, u64)]) -> DistrictConfig {
    DistrictConfig::from_pairs(seats, pairs.iter().copied()).unwrap()
}

fn seat_map(pairs: &[(&str, u32)]) -> SeatMap {
    pairs.iter().map(|(id, s)| (id.parse::<PartyId>().unwrap(), *s)).collect()
}

fn defaults() -> AllocOptions {
    AllocOptions::default()
}

#[test]
fn hare_ten_seats_divides_exactly() {
    let d = district(10, &[("A", 500), ("B", 300), ("C", 200)]);
    let seats = allocate(&d, Method::Hare, &defaults()).unwrap();
    assert_eq!(seats, seat_map(&[("A", 5), ("B", 3), ("C", 2)]));
}

#[test]
fn dhondt_five_seats() {
    let d = district(5, &[("A", 100), ("B", 80), ("C", 30)]);
    let seats = allocate(&d, Method::DHondt, &defaults()).unwrap();
    assert_eq!(seats, seat_map(&[("A", 3), ("B", 2), ("C", 0)]));
}

#[test]
fn over_allocation_removes_from_largest_party() {
    // Imperiali: T = 101, q = 25.25, base seats A:3 B:0 for 2 seats.
    let d = district(2, &[("A", 100), ("B", 1)]);
    let seats = allocate(&d, Method::Imperiali, &defaults()).unwrap();
    assert_eq!(seats, seat_map(&[("A", 2), ("B", 0)]));

    // Imperiali: q = 20, base seats 2,2,1 for 3 seats; A and B lose one each.
    let d = district(3, &[("A", 40), ("B", 40), ("C", 20)]);
    let seats = allocate(&d, Method::Imperiali, &defaults()).unwrap();
    assert_eq!(seats, seat_map(&[("A", 1), ("B", 1), ("C", 1)]));
}

#[test]
fn over_allocation_rule_comes_from_options_then_district() {
    let d = district(3, &[("A", 40), ("B", 40), ("C", 20)]).with_over_alloc_rule(OverAllocRule::RemoveSmall);
    let seats = allocate(&d, Method::Imperiali, &defaults()).unwrap();
    assert_eq!(seats, seat_map(&[("A", 1), ("B", 2), ("C", 0)]));

    let opts = AllocOptions {
        over_alloc_rule: Some(OverAllocRule::Increase),
        ..defaults()
    };
    let out = allocate_detailed(&d, Method::Imperiali, &opts).unwrap();
    assert_eq!(out.seats, seat_map(&[("A", 2), ("B", 2), ("C", 1)]));
    assert_eq!(out.total_seats, 5);
    assert_eq!(out.notes, vec![AllocNote::SeatsIncreased { configured: 3, awarded: 5 }]);

    // Hare cannot overshoot, so the rule changes nothing there.
    let out = allocate_detailed(&d, Method::Hare, &opts).unwrap();
    assert_eq!(out.total_seats, 3);
    assert!(out.notes.is_empty());
}

#[test]
fn disputed_seat_goes_to_sink() {
    let d = district(1, &[("A", 100), ("B", 100)]).with_tie_break(TieBreak::Disputed);
    let seats = allocate(&d, Method::DHondt, &defaults()).unwrap();
    assert_eq!(seats, seat_map(&[("A", 0), ("B", 0), ("DISPUTED", 1)]));

    let d = district(3, &[("A", 150), ("B", 150)]).with_tie_break(TieBreak::Disputed);
    let out = allocate_detailed(&d, Method::Hare, &defaults()).unwrap();
    assert_eq!(out.seats, seat_map(&[("A", 1), ("B", 1), ("DISPUTED", 1)]));
    assert!(out.last_seat_tie);
}

#[test]
fn tied_parties_fall_back_to_input_order() {
    let d = district(1, &[("A", 500), ("B", 500)]);
    for rule in [TieBreak::PartyIndex, TieBreak::LargestVotes] {
        let opts = AllocOptions {
            tie_break: Some(rule),
            ..defaults()
        };
        // Imperiali over-allocates here (base 1 + 1); removal decides, not the tie.
        for method in [Method::Hare, Method::Droop, Method::DHondt, Method::SainteLague] {
            let seats = allocate(&d, method, &opts).unwrap();
            assert_eq!(seats, seat_map(&[("A", 1), ("B", 0)]), "{rule} / {method}");
        }
    }
}

#[test]
fn barrier_excludes_small_parties() {
    let d = district(10, &[("A", 600), ("B", 30), ("C", 370)]).with_barrier(0.05);
    for method in Method::ALL {
        let seats = allocate(&d, *method, &defaults()).unwrap();
        assert!(!seats.contains_key(&"B".parse::<PartyId>().unwrap()), "{method}");
        assert_eq!(seats.values().sum::<u32>(), 10, "{method}");
    }

    let opts = AllocOptions {
        barrier: Some(0.0),
        ..defaults()
    };
    let seats = allocate(&d, Method::SainteLague, &opts).unwrap();
    assert_eq!(seats[&"B".parse::<PartyId>().unwrap()], 0);
}

#[test]
fn party_at_exact_barrier_share_is_kept() {
    let d = district(10, &[("A", 60), ("B", 33), ("C", 7)]).with_barrier(0.07);
    let seats = allocate(&d, Method::Hare, &defaults()).unwrap();
    assert_eq!(seats, seat_map(&[("A", 6), ("B", 3), ("C", 1)]));
}

#[test]
fn all_zero_votes_give_zero_seats() {
    let d = district(4, &[("A", 0), ("B", 0)]).with_barrier(0.5);
    for method in Method::ALL {
        let out = allocate_detailed(&d, *method, &defaults()).unwrap();
        assert_eq!(out.seats, seat_map(&[("A", 0), ("B", 0)]), "{method}");
        assert_eq!(out.notes, vec![AllocNote::NoVotes]);
    }
}

#[test]
fn allocation_is_repeatable_and_leaves_input_untouched() {
    let d = district(7, &[("A", 421), ("B", 311), ("C", 177), ("D", 91)]).with_barrier(0.05);
    let before = d.clone();
    for method in Method::ALL {
        let a = allocate(&d, *method, &defaults()).unwrap();
        let b = allocate(&d, *method, &defaults()).unwrap();
        assert_eq!(a, b);
    }
    assert_eq!(d, before);
}

#[test]
fn invalid_configurations_are_rejected() {
    let cases = [
        DistrictConfig::new(3, Vec::new()),
        district(0, &[("A", 1)]),
        district(3, &[("A", 1), ("A", 2)]),
        district(3, &[("DISPUTED", 1)]),
        district(3, &[("A", 1)]).with_barrier(-0.1),
    ];
    for d in &cases {
        assert!(
            matches!(allocate(d, Method::Hare, &defaults()), Err(AllocError::InvalidConfiguration(_))),
            "{d:?}"
        );
    }
    let opts = AllocOptions {
        barrier: Some(2.0),
        ..defaults()
    };
    assert!(allocate(&district(3, &[("A", 1)]), Method::Hare, &opts).is_err());
}

#[test]
fn aggregate_sums_and_merges_disputed() {
    let districts = [
        district(1, &[("A", 100), ("B", 100)]),
        district(3, &[("C", 90), ("A", 10)]),
        district(1, &[("B", 5), ("C", 5)]),
    ];
    let opts = AllocOptions {
        tie_break: Some(TieBreak::Disputed),
        ..defaults()
    };
    let tally = aggregate(&districts, &[Method::DHondt], &opts).unwrap();
    assert_eq!(
        tally[&Method::DHondt],
        seat_map(&[("A", 0), ("B", 0), ("C", 3), ("DISPUTED", 2)])
    );
}

#[test]
fn aggregate_reports_failing_district() {
    let districts = [district(2, &[("A", 1)]), district(2, &[("B", 1), ("B", 2)])];
    let err = aggregate(&districts, &[Method::Hare], &defaults()).unwrap_err();
    match err {
        AggregateError::District { district, method, source } => {
            assert_eq!(district.index, 1);
            assert_eq!(method, Method::Hare);
            assert!(matches!(source, AllocError::InvalidConfiguration(_)));
        }
    }
}

#[test]
fn seeded_nation_runs_replay() {
    let districts: Vec<DistrictConfig> = (0..5)
        .map(|i| {
            district(3, &[("A", 10), ("B", 10), ("C", 10), ("D", 10 + i)])
                .with_tie_break(TieBreak::Random)
        })
        .collect();
    let opts = AllocOptions {
        tie_seed: Some(7),
        ..defaults()
    };
    let a = run_nation(&districts, Method::ALL, &opts).unwrap();
    let b = run_nation(&districts, Method::ALL, &opts).unwrap();
    assert_eq!(a, b);
    for method in Method::ALL {
        assert_eq!(a.total_seats[method], 15);
    }
}

#[test]
fn nation_report_shape() {
    let d = district(2, &[("A", 60), ("B", 40)]).with_name("Only");
    let report = run_nation(&[d], &[Method::DHondt, Method::Hare], &defaults()).unwrap();
    let per_method = json!({
        "seats": { "A": 1, "B": 1 },
        "totalSeats": 2,
        "lastSeatTie": false
    });
    assert_json_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "national": {
                "hare": { "A": 1, "B": 1 },
                "dhondt": { "A": 1, "B": 1 }
            },
            "totalSeats": { "hare": 2, "dhondt": 2 },
            "districts": [{
                "index": 0,
                "name": "Only",
                "configuredSeats": 2,
                "results": { "hare": per_method.clone(), "dhondt": per_method }
            }]
        })
    );
}
