use hexmatch_core::{
    next_threshold_value, ConfigError, EndCondition, Event, EventBus, GameConfig, GameOutcome,
    Grid, Ledger, Piece, Pos, RejectReason, SessionState, SwapOutcome, Thresholds, ValueRule,
};

fn session(config: GameConfig, seed: u64) -> (SessionState, EventBus) {
    let mut events = EventBus::default();
    let mut session = SessionState::new(config, seed).expect("valid config");
    session.start(&mut events);
    (session, events)
}

/// Full board of value-1 filler (colors/shapes cycle 1..=7, never 0), with a
/// color-0 chain of four 100s on row 0 and a lone color-0 120 at (2, 0).
/// Swapping (2, 0) with (1, 0) connects a 5-cell color-0 component summing
/// 520. Per-index requirements of 500 and refill values capped at 5 make any
/// other match impossible (total filler value stays far below 500).
fn seed_board(session: &mut SessionState) {
    session.required = Thresholds {
        by_color: vec![500; 8],
        by_shape: vec![500; 8],
    };
    session.fill.values = ValueRule { min: 1, max: 5 };
    session.ledger = Ledger::new(8, 8);

    let mut grid = Grid::empty(8, 8);
    for (i, pos) in grid.positions().enumerate().collect::<Vec<_>>() {
        let filler = 1 + (i % 7) as u8;
        grid.set(
            pos,
            Some(Piece {
                color: filler,
                shape: filler,
                value: 1,
            }),
        );
    }
    for col in 0..4 {
        grid.set(
            Pos::new(0, col),
            Some(Piece {
                color: 0,
                shape: 1 + col as u8,
                value: 100,
            }),
        );
    }
    grid.set(
        Pos::new(2, 0),
        Some(Piece {
            color: 0,
            shape: 5,
            value: 120,
        }),
    );
    session.grid = grid;
}

#[test]
fn threshold_growth_is_n_to_the_n() {
    assert_eq!(next_threshold_value(1), 1);
    assert_eq!(next_threshold_value(3), 27);
    assert_eq!(next_threshold_value(5), 3125);
    assert_eq!(next_threshold_value(50), i64::MAX);
}

#[test]
fn config_invariants_are_rejected_at_init() {
    let mut config = GameConfig::standard();
    config.board.color_count = 0;
    assert!(matches!(
        SessionState::new(config, 1),
        Err(ConfigError::NoColors)
    ));

    let mut config = GameConfig::standard();
    config.board.shape_count = 0;
    assert!(matches!(
        SessionState::new(config, 1),
        Err(ConfigError::NoShapes)
    ));

    let mut config = GameConfig::standard();
    config.board.rows = 0;
    assert!(matches!(
        SessionState::new(config, 1),
        Err(ConfigError::EmptyBoard)
    ));

    let mut config = GameConfig::standard();
    config.values = ValueRule { min: 10, max: 2 };
    assert!(matches!(
        SessionState::new(config, 1),
        Err(ConfigError::BadValueRange(10, 2))
    ));
}

#[test]
fn start_builds_a_full_board() {
    let (session, mut events) = session(GameConfig::standard(), 0xC0FFEE);
    assert_eq!(session.grid.occupied_cells(), 64);
    assert!(events
        .drain()
        .any(|event| matches!(event, Event::BoardInitialized { .. })));
    assert_eq!(session.next_threshold(), 3125);
    assert_eq!(session.required.by_color.len(), 8);
    assert!(session
        .required
        .by_color
        .iter()
        .all(|&required| (1..=900).contains(&required)));
    // Fill ceiling derives from the rolled requirements, not the raw config.
    assert_eq!(
        session.fill.values.max,
        (session.required.max_required() / 2).max(1)
    );
}

#[test]
fn single_swap_end_to_end_scenario() {
    let (mut session, _) = session(GameConfig::standard(), 7);
    seed_board(&mut session);
    let mut events = EventBus::default();

    let outcome = session
        .try_swap(Pos::new(2, 0), Pos::new(1, 0), &mut events)
        .expect("in bounds");
    let SwapOutcome::Resolved(summary) = outcome else {
        panic!("expected a resolved swap, got {outcome:?}");
    };
    assert_eq!(summary.chain_length, 1);
    assert_eq!(summary.removed_cells, 5);
    assert_eq!(summary.removed_value, 520);
    assert_eq!(summary.bonus_score, 0);

    assert_eq!(session.ledger.score, 520);
    assert_eq!(session.ledger.removed.color(0), 520);
    assert_eq!(session.ledger.removed.total, 520);
    assert_eq!(session.ledger.combo_bank, 1);
    assert_eq!(session.ledger.combo, 0, "per-chain combo is transient");
    assert_eq!(session.grid.occupied_cells(), 64, "refill closed the holes");

    let log: Vec<Event> = events.drain().collect();
    assert!(log.iter().any(|event| matches!(
        event,
        Event::CascadeStep {
            step: 1,
            removed_cells: 5,
            removed_value: 520,
            bonus: 0,
        }
    )));
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::ChainEnded { length: 1, bank: 1 })));
}

#[test]
fn matchless_swap_reverts_cell_by_cell() {
    let (mut session, _) = session(GameConfig::standard(), 11);
    seed_board(&mut session);
    let before = session.grid.clone();
    let mut events = EventBus::default();

    // Two filler cells far from the seeded chain; nothing can match.
    let outcome = session
        .try_swap(Pos::new(6, 5), Pos::new(6, 6), &mut events)
        .expect("in bounds");
    assert_eq!(outcome, SwapOutcome::Reverted);
    assert_eq!(session.grid, before);
    assert_eq!(session.ledger.score, 0);
    assert_eq!(session.ledger.combo_bank, 0);
}

#[test]
fn out_of_bounds_swap_is_an_error() {
    let (mut session, _) = session(GameConfig::standard(), 3);
    let mut events = EventBus::default();
    assert!(session
        .try_swap(Pos::new(0, 0), Pos::new(0, 99), &mut events)
        .is_err());
}

#[test]
fn move_budget_rejects_without_refunding_reverts() {
    let mut config = GameConfig::standard();
    config.mode.move_limit = Some(1);
    let (mut session, _) = session(config, 5);
    seed_board(&mut session);
    let mut events = EventBus::default();

    // A revert still spends the single move.
    let outcome = session
        .try_swap(Pos::new(6, 5), Pos::new(6, 6), &mut events)
        .expect("in bounds");
    assert_eq!(outcome, SwapOutcome::Reverted);
    assert_eq!(session.moves_left, Some(0));
    assert_eq!(session.outcome, Some(GameOutcome::MovesExhausted));

    let outcome = session
        .try_swap(Pos::new(2, 0), Pos::new(1, 0), &mut events)
        .expect("in bounds");
    assert_eq!(outcome, SwapOutcome::Rejected(RejectReason::GameOver));

    let log: Vec<Event> = events.drain().collect();
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::GameEnded { .. })));
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::SwapRejected { .. })));
}

#[test]
fn combo_target_mode_ends_when_the_bank_reaches_the_target() {
    let mut config = GameConfig::standard();
    config.mode.end = EndCondition::ComboTarget(1);
    let (mut session, _) = session(config, 13);
    seed_board(&mut session);
    let mut events = EventBus::default();

    let outcome = session
        .try_swap(Pos::new(2, 0), Pos::new(1, 0), &mut events)
        .expect("in bounds");
    assert!(matches!(outcome, SwapOutcome::Resolved(_)));
    assert_eq!(session.outcome, Some(GameOutcome::ComboTargetReached));
    assert_eq!(session.moves_display(), Some(1), "combo mode counts moves taken");

    let log: Vec<Event> = events.drain().collect();
    assert!(log.iter().any(|event| matches!(
        event,
        Event::GameEnded {
            outcome: GameOutcome::ComboTargetReached,
            bank: 1,
            moves_taken: 1,
            ..
        }
    )));
}

#[test]
fn crossing_the_reward_threshold_freezes_swaps_behind_an_offer() {
    let (mut session, _) = session(GameConfig::standard(), 17);
    seed_board(&mut session);
    session.ledger.set_score(4000); // past 5^5
    let mut events = EventBus::default();

    let outcome = session
        .try_swap(Pos::new(6, 5), Pos::new(6, 6), &mut events)
        .expect("in bounds");
    assert_eq!(outcome, SwapOutcome::Reverted);
    let options = session.pending_options().expect("offer surfaced").to_vec();
    assert!(!options.is_empty() && options.len() <= 3);

    let outcome = session
        .try_swap(Pos::new(6, 5), Pos::new(6, 6), &mut events)
        .expect("in bounds");
    assert_eq!(outcome, SwapOutcome::Rejected(RejectReason::ChoicePending));

    assert!(session.choose_effect(9, &mut events).is_err());
    session.choose_effect(0, &mut events).expect("valid index");
    assert_eq!(session.selection_count, 6);
    assert_eq!(session.effects.effects.len(), 1);
    assert!(session.pending_options().is_none());
    assert_eq!(session.next_threshold(), 46656);

    let log: Vec<Event> = events.drain().collect();
    assert!(log.iter().any(|event| matches!(
        event,
        Event::EffectOffered {
            threshold: 3125,
            ..
        }
    )));
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::EffectChosen { .. })));
}

#[test]
fn choose_effect_without_an_offer_is_an_error() {
    let (mut session, _) = session(GameConfig::standard(), 19);
    let mut events = EventBus::default();
    assert!(session.choose_effect(0, &mut events).is_err());
}

#[test]
fn restart_reinitializes_everything_in_memory() {
    let (mut session, _) = session(GameConfig::standard(), 23);
    seed_board(&mut session);
    let mut events = EventBus::default();
    session
        .try_swap(Pos::new(2, 0), Pos::new(1, 0), &mut events)
        .expect("in bounds");
    assert!(session.ledger.score > 0);

    session.restart(&mut events);
    assert_eq!(session.ledger.score, 0);
    assert_eq!(session.ledger.combo_bank, 0);
    assert_eq!(session.ledger.removed.total, 0);
    assert!(session.effects.is_empty());
    assert_eq!(session.selection_count, 5);
    assert!(session.pending_options().is_none());
    assert_eq!(session.outcome, None);
    assert_eq!(session.moves_taken, 0);
    assert_eq!(session.grid.occupied_cells(), 64);
}
