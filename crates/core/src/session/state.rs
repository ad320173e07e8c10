use super::*;
use crate::*;

impl SessionState {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = config.board;
        Ok(Self {
            grid: Grid::empty(board.rows, board.cols),
            required: Thresholds::default(),
            fill: FillRule {
                color_count: board.color_count,
                shape_count: board.shape_count,
                values: config.values,
            },
            ledger: Ledger::new(board.color_count, board.shape_count),
            effects: EffectBook::default(),
            rng: RngState::from_seed(seed),
            selection_count: config.selection_seed,
            pending_options: None,
            moves_left: config.mode.move_limit,
            moves_taken: 0,
            outcome: None,
            config,
        })
    }

    /// Roll thresholds, reset ledgers and effects, and build a fresh board.
    /// Also what "restart" means: the session is entirely in-memory.
    pub fn start(&mut self, events: &mut EventBus) {
        let board = self.config.board;
        self.required = Thresholds::roll(
            &mut self.rng,
            self.config.thresholds,
            board.color_count,
            board.shape_count,
        );
        if self.config.compact {
            self.required.scale_compact();
        }
        let ceiling = (self.required.max_required() / 2).max(1);
        self.fill.values = ValueRule {
            min: self.config.values.min,
            max: ceiling.max(self.config.values.min),
        };

        self.ledger = Ledger::new(board.color_count, board.shape_count);
        self.effects.clear();
        self.selection_count = self.config.selection_seed;
        self.pending_options = None;
        self.moves_left = self.config.mode.move_limit;
        self.moves_taken = 0;
        self.outcome = None;

        // Retry until the random fill produces no immediate matches; past
        // the cap, the last board is accepted as-is (degraded but safe).
        let mut attempts = 0;
        let clean = loop {
            self.grid = Grid::empty(board.rows, board.cols);
            self.grid.fill(&mut self.rng, self.fill);
            if find_matches(&self.grid, &self.required).is_empty() {
                break true;
            }
            attempts += 1;
            if attempts >= self.config.fill_attempts {
                break false;
            }
        };
        events.push(Event::BoardInitialized { attempts, clean });
    }

    pub fn restart(&mut self, events: &mut EventBus) {
        self.start(events);
    }

    pub fn finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// What the mode's move panel shows: moves remaining under a limit,
    /// moves taken under a combo target.
    pub fn moves_display(&self) -> Option<u32> {
        match self.config.mode.end {
            crate::EndCondition::ComboTarget(_) => Some(self.moves_taken),
            crate::EndCondition::MovesExhausted => self.moves_left,
        }
    }

    pub(super) fn finish(&mut self, outcome: GameOutcome, events: &mut EventBus) {
        self.outcome = Some(outcome);
        events.push(Event::GameEnded {
            outcome,
            score: self.ledger.score,
            removed_total: self.ledger.removed.total,
            bank: self.ledger.combo_bank,
            moves_taken: self.moves_taken,
        });
    }
}
