use super::*;
use crate::*;

impl SessionState {
    pub fn next_threshold(&self) -> i64 {
        next_threshold_value(self.selection_count)
    }

    pub fn pending_options(&self) -> Option<&[EffectOption]> {
        self.pending_options.as_deref()
    }

    /// Freeze further swaps behind an effect offer once the score crosses
    /// the n^n gate. No-op while an offer is already pending or the game
    /// has ended.
    pub(super) fn check_threshold(&mut self, events: &mut EventBus) {
        if self.pending_options.is_some() || self.outcome.is_some() {
            return;
        }
        let threshold = self.next_threshold();
        if self.ledger.score >= threshold {
            let board = self.config.board;
            let options = generate_options(
                &mut self.rng,
                self.selection_count,
                board.color_count,
                board.shape_count,
            );
            events.push(Event::EffectOffered {
                threshold,
                options: options.len(),
            });
            self.pending_options = Some(options);
        }
    }

    /// Accept one of the offered options: registers it with a baseline
    /// snapshot and bumps the selection count, unfreezing swaps.
    pub fn choose_effect(
        &mut self,
        index: usize,
        events: &mut EventBus,
    ) -> Result<(), SessionError> {
        let options = self
            .pending_options
            .as_ref()
            .ok_or(SessionError::NoChoicePending)?;
        let option = options
            .get(index)
            .cloned()
            .ok_or(SessionError::InvalidOptionIndex(index))?;
        events.push(Event::EffectChosen {
            title: option.title.clone(),
        });
        self.effects.register(option, &self.ledger);
        self.selection_count = self.selection_count.saturating_add(1);
        self.pending_options = None;
        Ok(())
    }
}
