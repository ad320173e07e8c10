use super::*;
use crate::*;

impl SessionState {
    /// Drive one user swap through the full resolution cycle:
    /// budget check, tentative exchange, revert when nothing matches, or
    /// the cascading remove/score/effect/gravity/refill loop.
    pub fn try_swap(
        &mut self,
        a: Pos,
        b: Pos,
        events: &mut EventBus,
    ) -> Result<SwapOutcome, SessionError> {
        if !self.grid.contains(a) {
            return Err(SessionError::OutOfBounds(a));
        }
        if !self.grid.contains(b) {
            return Err(SessionError::OutOfBounds(b));
        }
        if let Some(reason) = self.reject_reason() {
            events.push(Event::SwapRejected { reason });
            return Ok(SwapOutcome::Rejected(reason));
        }

        if let Some(left) = self.moves_left.as_mut() {
            *left -= 1;
        }
        self.moves_taken = self.moves_taken.saturating_add(1);

        self.grid.swap(a, b);
        if find_matches(&self.grid, &self.required).is_empty() {
            // Full revert: no score, no combo, no move refund.
            self.grid.swap(a, b);
            events.push(Event::SwapReverted { a, b });
            self.after_resolution(events);
            return Ok(SwapOutcome::Reverted);
        }

        let summary = self.resolve_chain(events);
        self.after_resolution(events);
        Ok(SwapOutcome::Resolved(summary))
    }

    fn reject_reason(&self) -> Option<RejectReason> {
        if self.outcome.is_some() {
            return Some(RejectReason::GameOver);
        }
        if self.pending_options.is_some() {
            return Some(RejectReason::ChoicePending);
        }
        if self.moves_left == Some(0) {
            return Some(RejectReason::MovesExhausted);
        }
        None
    }

    /// The chain loop. Each iteration removes one round of matches, scores
    /// it (plus any armed combo bonus), and evaluates effects. When an
    /// effect's action mutated the grid the action already ran gravity and
    /// refill, so this loop skips its own and re-checks immediately.
    pub(super) fn resolve_chain(&mut self, events: &mut EventBus) -> ResolutionSummary {
        let mut summary = ResolutionSummary::default();
        self.ledger.combo = 0;
        loop {
            let matches = find_matches(&self.grid, &self.required);
            if matches.is_empty() {
                break;
            }
            self.ledger.combo += 1;
            summary.chain_length = self.ledger.combo;

            let removed = remove_matches(&mut self.grid, &matches.cells, &mut self.ledger.removed);
            let removed_value: i64 = removed.iter().map(|entry| entry.piece.value).sum();
            let bonus = self.effects.bonus_for(removed_value);
            self.ledger.add_score(removed_value.saturating_add(bonus));
            summary.removed_cells += removed.len();
            summary.removed_value = summary.removed_value.saturating_add(removed_value);
            summary.bonus_score = summary.bonus_score.saturating_add(bonus);
            events.push(Event::CascadeStep {
                step: self.ledger.combo,
                removed_cells: removed.len(),
                removed_value,
                bonus,
            });

            let eval = self.effects.evaluate(
                &mut self.grid,
                &mut self.ledger,
                &mut self.rng,
                self.fill,
                events,
            );
            if eval.any_action_executed {
                summary.actions_fired += 1;
                continue;
            }

            self.grid.apply_gravity();
            let filled = self.grid.fill(&mut self.rng, self.fill);
            events.push(Event::BoardRefilled { filled });
        }

        if self.ledger.combo > 0 {
            self.ledger.add_bank(self.ledger.combo);
            events.push(Event::ChainEnded {
                length: self.ledger.combo,
                bank: self.ledger.combo_bank,
            });
        }
        self.ledger.combo = 0;
        self.effects.evaluate(
            &mut self.grid,
            &mut self.ledger,
            &mut self.rng,
            self.fill,
            events,
        );
        summary
    }

    /// Runs after every resolution, reverts included: end-condition check
    /// first, then the reward-threshold gate.
    pub(super) fn after_resolution(&mut self, events: &mut EventBus) {
        if self.outcome.is_none() {
            match self.config.mode.end {
                EndCondition::ComboTarget(target) => {
                    if self.ledger.combo_bank >= target {
                        self.finish(GameOutcome::ComboTargetReached, events);
                    }
                }
                EndCondition::MovesExhausted => {
                    if self.moves_left == Some(0) {
                        self.finish(GameOutcome::MovesExhausted, events);
                    }
                }
            }
        }
        self.check_threshold(events);
    }
}
