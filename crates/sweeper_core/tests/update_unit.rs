use std::sync::Once;
use std::time::Duration;

use sweeper_core::{
    update, SweepSettings, UnitEffect, UnitMsg, UnitOutcome, UnitState, WorkUnit,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(sweep_logging::initialize_for_tests);
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn settings() -> SweepSettings {
    SweepSettings {
        retry_budget: Some(3),
        ..SweepSettings::default()
    }
}

/// Feeds messages in order, returning the unit and every effect produced.
fn feed(unit: WorkUnit, now: Duration, msgs: Vec<UnitMsg>) -> (WorkUnit, Vec<UnitEffect>) {
    let settings = settings();
    let mut unit = unit;
    let mut effects = Vec::new();
    for msg in msgs {
        let (next, effect) = update(unit, msg, now, &settings);
        unit = next;
        effects.push(effect);
    }
    (unit, effects)
}

fn opened(keyword: &str) -> WorkUnit {
    let (unit, effects) = feed(
        WorkUnit::new(keyword),
        secs(0),
        vec![UnitMsg::Poll, UnitMsg::Opened],
    );
    assert_eq!(effects, vec![UnitEffect::Open, UnitEffect::Wait]);
    assert_eq!(unit.state(), &UnitState::Ready);
    unit
}

#[test]
fn empty_surface_finishes_without_selecting() {
    init_logging();
    let (unit, effects) = feed(
        opened("news@shop.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(true),
            UnitMsg::CountRead(None),
        ],
    );

    assert_eq!(
        effects,
        vec![UnitEffect::ProbeEmpty, UnitEffect::ReadCount, UnitEffect::Close]
    );
    assert_eq!(unit.state(), &UnitState::DoneEmpty);
    assert_eq!(unit.outcome(), Some(UnitOutcome::Deleted { pages: 0 }));
}

#[test]
fn count_below_threshold_is_safe_skipped() {
    init_logging();
    let (unit, effects) = feed(
        opened("receipts@store.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(false),
            UnitMsg::CountRead(Some(7)),
        ],
    );

    assert_eq!(effects.last(), Some(&UnitEffect::Close));
    assert_eq!(unit.state(), &UnitState::DoneSafeSkip { count: 7 });
}

#[test]
fn positive_count_overrides_premature_empty_banner() {
    init_logging();
    let (unit, _) = feed(
        opened("alerts@bank.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(true),
            UnitMsg::CountRead(Some(7)),
        ],
    );
    assert_eq!(unit.state(), &UnitState::DoneSafeSkip { count: 7 });

    let (unit, effects) = feed(
        opened("promo@bulk.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(true),
            UnitMsg::CountRead(Some(500)),
        ],
    );
    assert_eq!(effects.last(), Some(&UnitEffect::Close));
    assert_eq!(unit.state(), &UnitState::DoneEmpty);
}

#[test]
fn empty_banner_wins_over_a_large_stale_count() {
    init_logging();
    let (unit, effects) = feed(
        opened("digest@list.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(true),
            UnitMsg::CountRead(Some(50)),
        ],
    );

    assert_eq!(
        effects,
        vec![UnitEffect::ProbeEmpty, UnitEffect::ReadCount, UnitEffect::Close]
    );
    assert_eq!(unit.outcome(), Some(UnitOutcome::Deleted { pages: 0 }));
    assert_eq!(unit.failures(), 0);
}

#[test]
fn unknown_count_proceeds_to_select_and_delete() {
    init_logging();
    let (unit, effects) = feed(
        opened("digest@list.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(false),
            UnitMsg::CountRead(None),
            UnitMsg::SelectAttempted(true),
            UnitMsg::DeleteAttempted(true),
        ],
    );

    assert_eq!(
        effects,
        vec![
            UnitEffect::ProbeEmpty,
            UnitEffect::ReadCount,
            UnitEffect::SelectAll,
            UnitEffect::DeleteSelected,
            UnitEffect::Wait,
        ]
    );
    assert_eq!(unit.state(), &UnitState::Busy { since: secs(1) });
    assert_eq!(unit.pages_deleted(), 1);
}

#[test]
fn busy_unit_waits_out_the_cooldown() {
    init_logging();
    let (unit, _) = feed(
        opened("digest@list.example"),
        secs(10),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(false),
            UnitMsg::CountRead(Some(120)),
            UnitMsg::SelectAttempted(true),
            UnitMsg::DeleteAttempted(true),
        ],
    );

    assert!(!unit.is_due(secs(14), secs(5)));
    let (unit, effects) = feed(unit, secs(14), vec![UnitMsg::Poll]);
    assert_eq!(effects, vec![UnitEffect::Wait]);

    assert!(unit.is_due(secs(15), secs(5)));
    let (_, effects) = feed(unit, secs(15), vec![UnitMsg::Poll]);
    assert_eq!(effects, vec![UnitEffect::ProbeEmpty]);
}

#[test]
fn empty_after_deleting_pages_is_final() {
    init_logging();
    let (unit, _) = feed(
        opened("digest@list.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(false),
            UnitMsg::CountRead(Some(60)),
            UnitMsg::SelectAttempted(true),
            UnitMsg::DeleteAttempted(true),
        ],
    );
    let (unit, effects) = feed(
        unit,
        secs(7),
        vec![UnitMsg::Poll, UnitMsg::EmptyChecked(true)],
    );

    assert_eq!(effects, vec![UnitEffect::ProbeEmpty, UnitEffect::Close]);
    assert_eq!(unit.outcome(), Some(UnitOutcome::Deleted { pages: 1 }));
}

#[test]
fn failed_selects_exhaust_retry_budget() {
    init_logging();
    let mut unit = opened("stuck@slow.example");
    for attempt in 1..=3u64 {
        let (next, effects) = feed(
            unit,
            secs(attempt * 10),
            vec![
                UnitMsg::Poll,
                UnitMsg::EmptyChecked(false),
                UnitMsg::CountRead(None),
                UnitMsg::SelectAttempted(false),
            ],
        );
        unit = next;
        let expected = if attempt < 3 {
            UnitEffect::Wait
        } else {
            UnitEffect::Close
        };
        assert_eq!(effects.last(), Some(&expected));
    }

    match unit.outcome() {
        Some(UnitOutcome::Failed { reason }) => {
            assert!(reason.contains("3 consecutive failed attempts"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn unbounded_budget_keeps_retrying() {
    init_logging();
    let settings = SweepSettings {
        retry_budget: None,
        ..SweepSettings::default()
    };
    let mut unit = opened("stuck@slow.example");
    for attempt in 1..=500u64 {
        let now = secs(attempt * 10);
        for msg in [
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(false),
            UnitMsg::CountRead(None),
            UnitMsg::SelectAttempted(false),
        ] {
            unit = update(unit, msg, now, &settings).0;
        }
    }
    assert!(!unit.is_terminal());
    assert_eq!(unit.failures(), 500);
}

#[test]
fn successful_delete_resets_consecutive_failures() {
    init_logging();
    let (unit, _) = feed(
        opened("digest@list.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::Transient("stale element".to_string()),
        ],
    );
    assert_eq!(unit.failures(), 1);

    let (unit, _) = feed(
        unit,
        secs(10),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(false),
            UnitMsg::CountRead(None),
            UnitMsg::SelectAttempted(true),
            UnitMsg::DeleteAttempted(false),
        ],
    );
    assert_eq!(unit.failures(), 2);

    let (unit, _) = feed(
        unit,
        secs(20),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(false),
            UnitMsg::CountRead(None),
            UnitMsg::SelectAttempted(true),
            UnitMsg::DeleteAttempted(true),
        ],
    );
    assert_eq!(unit.failures(), 0);
    assert!(!unit.is_terminal());
}

#[test]
fn session_loss_abandons_unit() {
    init_logging();
    let (unit, effects) = feed(
        opened("gone@closed.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::SessionLost("tab closed".to_string()),
        ],
    );
    assert_eq!(effects.last(), Some(&UnitEffect::Close));
    assert_eq!(
        unit.outcome(),
        Some(UnitOutcome::Failed {
            reason: "tab closed".to_string()
        })
    );
}

#[test]
fn open_retries_then_gives_up() {
    init_logging();
    let (unit, effects) = feed(
        WorkUnit::new("slow@load.example"),
        secs(0),
        vec![
            UnitMsg::Poll,
            UnitMsg::Transient("timeout".to_string()),
            UnitMsg::Transient("timeout".to_string()),
            UnitMsg::Transient("timeout".to_string()),
        ],
    );
    assert_eq!(
        effects,
        vec![
            UnitEffect::Open,
            UnitEffect::Open,
            UnitEffect::Open,
            UnitEffect::Close
        ]
    );
    assert!(matches!(unit.state(), UnitState::DoneError { .. }));
}

#[test]
fn terminal_units_ignore_further_messages() {
    init_logging();
    let (unit, _) = feed(
        opened("news@shop.example"),
        secs(1),
        vec![
            UnitMsg::Poll,
            UnitMsg::EmptyChecked(false),
            UnitMsg::CountRead(Some(3)),
        ],
    );
    let before = unit.clone();
    let (unit, effects) = feed(
        unit,
        secs(30),
        vec![UnitMsg::Poll, UnitMsg::EmptyChecked(true), UnitMsg::Opened],
    );
    assert_eq!(unit, before);
    assert!(effects.iter().all(|e| *e == UnitEffect::None));
}
