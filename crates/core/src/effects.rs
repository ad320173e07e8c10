use crate::{
    content, Event, EventBus, FillRule, Grid, Ledger, Pos, RngState,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TargetKind {
    Color,
    Shape,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LineAxis {
    Row,
    Col,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TriggerSpec {
    /// Accumulated removed value for one color/shape index since baseline.
    RemoveTarget {
        target: TargetKind,
        index: u8,
        amount: i64,
    },
    /// Accumulated removed value across the whole board since baseline.
    RemoveTotal { amount: i64 },
    /// Banked chains since baseline; firing consumes the bank.
    ComboAccum { amount: u32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ActionSpec {
    /// Row-major flat scan, not component-based.
    RemoveTarget {
        target: TargetKind,
        index: u8,
        count: usize,
    },
    RemoveLine { lines: usize },
    RemoveRect { height: usize, width: usize },
    /// Permanent passive score multiplier; no immediate removal.
    ComboBonus { multiplier: f64 },
}

/// A generated offer before the player accepts it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectOption {
    pub title: String,
    pub trigger: TriggerSpec,
    pub action: ActionSpec,
}

/// A registered effect. `baseline` is whatever the trigger measures
/// (removal counter or combo bank) snapshotted at registration; progress is
/// always a delta against it, never cumulative history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Effect {
    pub title: String,
    pub trigger: TriggerSpec,
    pub action: ActionSpec,
    pub baseline: i64,
    pub triggered: bool,
    pub active: bool,
}

impl Effect {
    /// (current progress, required amount) for display purposes.
    pub fn progress(&self, ledger: &Ledger) -> (i64, i64) {
        let (live, required) = match self.trigger {
            TriggerSpec::RemoveTarget {
                target,
                index,
                amount,
            } => (live_target(ledger, target, index), amount),
            TriggerSpec::RemoveTotal { amount } => (ledger.removed.total, amount),
            TriggerSpec::ComboAccum { amount } => (ledger.combo_bank as i64, amount as i64),
        };
        ((live - self.baseline).max(0), required)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EvalOutcome {
    /// True when any effect's action mutated the grid this pass; the
    /// orchestrator skips its own gravity/refill and re-loops instead.
    pub any_action_executed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OptionKind {
    TargetRemoval,
    ComboRemoval,
    ComboBonus,
    LineWipe,
}

/// The session's ordered effect collection; append-only until a full reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectBook {
    pub effects: Vec<Effect>,
}

impl EffectBook {
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Snapshot the relevant counter as the baseline so progress is
    /// measured as a delta since registration, not cumulative history.
    pub fn register(&mut self, option: EffectOption, ledger: &Ledger) {
        let baseline = match option.trigger {
            TriggerSpec::RemoveTarget { target, index, .. } => live_target(ledger, target, index),
            TriggerSpec::RemoveTotal { .. } => ledger.removed.total,
            TriggerSpec::ComboAccum { .. } => ledger.combo_bank as i64,
        };
        self.effects.push(Effect {
            title: option.title,
            trigger: option.trigger,
            action: option.action,
            baseline,
            triggered: false,
            active: false,
        });
    }

    /// Passive bonus from every armed combo-bonus effect for one removal
    /// round's value sum.
    pub fn bonus_for(&self, removed_value: i64) -> i64 {
        self.effects
            .iter()
            .filter(|effect| effect.active)
            .map(|effect| match effect.action {
                ActionSpec::ComboBonus { multiplier } => {
                    (removed_value as f64 * multiplier).floor() as i64
                }
                _ => 0,
            })
            .sum()
    }

    /// One evaluation pass: each non-permanently-triggered effect fires at
    /// most once. Firing consumes the required amount from the live counter
    /// and the effect immediately re-arms; overflow carries to the next
    /// cycle. Combo-bonus is the one-shot exception.
    pub fn evaluate(
        &mut self,
        grid: &mut Grid,
        ledger: &mut Ledger,
        rng: &mut RngState,
        fill: FillRule,
        events: &mut EventBus,
    ) -> EvalOutcome {
        let mut outcome = EvalOutcome::default();
        for i in 0..self.effects.len() {
            let effect = self.effects[i].clone();
            if effect.triggered {
                continue;
            }
            match effect.trigger {
                TriggerSpec::RemoveTarget {
                    target,
                    index,
                    amount,
                } => {
                    if amount <= 0 {
                        continue;
                    }
                    let live = live_target(ledger, target, index);
                    if live - effect.baseline < amount {
                        continue;
                    }
                    // Consuming from the live counter while the baseline
                    // stays put carries overflow into the next cycle: total
                    // firings converge to floor(total removed / amount).
                    match target {
                        TargetKind::Color => ledger.removed.consume_color(index, amount),
                        TargetKind::Shape => ledger.removed.consume_shape(index, amount),
                    }
                    if execute_action(&effect.title, effect.action, grid, rng, fill, events) {
                        outcome.any_action_executed = true;
                    }
                }
                TriggerSpec::RemoveTotal { amount } => {
                    if amount <= 0 {
                        continue;
                    }
                    if ledger.removed.total - effect.baseline < amount {
                        continue;
                    }
                    ledger.removed.consume_total(amount);
                    if execute_action(&effect.title, effect.action, grid, rng, fill, events) {
                        outcome.any_action_executed = true;
                    }
                }
                TriggerSpec::ComboAccum { amount } => {
                    if amount == 0 {
                        continue;
                    }
                    if (ledger.combo_bank as i64) - effect.baseline < amount as i64 {
                        continue;
                    }
                    // Consumption is atomic with the check: a later effect in
                    // this same pass sees the already-reduced bank. The bank
                    // is a shared resource, so the baseline advances to the
                    // post-consumption level instead of carrying overflow.
                    ledger.consume_bank(amount);
                    if let ActionSpec::ComboBonus { multiplier } = effect.action {
                        self.effects[i].active = true;
                        self.effects[i].triggered = true;
                        events.push(Event::ComboBonusArmed {
                            title: effect.title.clone(),
                            multiplier,
                        });
                    } else {
                        if execute_action(&effect.title, effect.action, grid, rng, fill, events) {
                            outcome.any_action_executed = true;
                        }
                        self.effects[i].baseline = ledger.combo_bank as i64;
                    }
                }
            }
        }
        outcome
    }
}

fn live_target(ledger: &Ledger, target: TargetKind, index: u8) -> i64 {
    match target {
        TargetKind::Color => ledger.removed.color(index),
        TargetKind::Shape => ledger.removed.shape(index),
    }
}

/// Execute one action against the grid. Effect-driven removals deliberately
/// bypass the removal counters and score; they feed no further triggers.
/// Returns true when at least one cell was cleared (gravity and refill run
/// only then).
fn execute_action(
    title: &str,
    action: ActionSpec,
    grid: &mut Grid,
    rng: &mut RngState,
    fill: FillRule,
    events: &mut EventBus,
) -> bool {
    let mut targets: Vec<Pos> = Vec::new();
    match action {
        ActionSpec::RemoveTarget {
            target,
            index,
            count,
        } => {
            for pos in grid.positions() {
                if targets.len() >= count {
                    break;
                }
                let Some(piece) = grid.get(pos) else {
                    continue;
                };
                let matches = match target {
                    TargetKind::Color => piece.color == index,
                    TargetKind::Shape => piece.shape == index,
                };
                if matches {
                    targets.push(pos);
                }
            }
        }
        ActionSpec::RemoveLine { lines } => {
            for _ in 0..lines {
                if rng.chance() {
                    let row = rng.range_usize(grid.rows());
                    events.push(Event::LineWiped {
                        axis: LineAxis::Row,
                        index: row,
                    });
                    targets.extend((0..grid.cols()).map(|col| Pos::new(row, col)));
                } else {
                    let col = rng.range_usize(grid.cols());
                    events.push(Event::LineWiped {
                        axis: LineAxis::Col,
                        index: col,
                    });
                    targets.extend((0..grid.rows()).map(|row| Pos::new(row, col)));
                }
            }
        }
        ActionSpec::RemoveRect { height, width } => {
            let height = height.min(grid.rows());
            let width = width.min(grid.cols());
            let origin = Pos::new(
                rng.range_usize(grid.rows() - height + 1),
                rng.range_usize(grid.cols() - width + 1),
            );
            events.push(Event::RectWiped {
                origin,
                height,
                width,
            });
            for row in origin.row..origin.row + height {
                targets.extend((origin.col..origin.col + width).map(|col| Pos::new(row, col)));
            }
        }
        ActionSpec::ComboBonus { .. } => {
            // Arming is handled at the trigger site; nothing to remove.
            return false;
        }
    }

    let mut removed = 0;
    for pos in targets {
        if grid.take(pos).is_some() {
            removed += 1;
        }
    }
    if removed == 0 {
        events.push(Event::EffectNoTargets {
            title: title.to_string(),
        });
        return false;
    }
    events.push(Event::EffectFired {
        title: title.to_string(),
        removed_cells: removed,
    });
    grid.apply_gravity();
    grid.fill(rng, fill);
    true
}

/// Up to 3 distinct-kind options drawn from the 4 effect kinds, numeric
/// parameters randomized within fixed ranges scaled mildly by how many
/// effects the player already holds.
pub fn generate_options(
    rng: &mut RngState,
    selection_count: u32,
    color_count: u8,
    shape_count: u8,
) -> Vec<EffectOption> {
    let mut kinds = [
        OptionKind::TargetRemoval,
        OptionKind::ComboRemoval,
        OptionKind::ComboBonus,
        OptionKind::LineWipe,
    ];
    rng.shuffle(&mut kinds);
    kinds
        .iter()
        .take(3)
        .map(|kind| build_option(*kind, rng, selection_count, color_count, shape_count))
        .collect()
}

fn build_option(
    kind: OptionKind,
    rng: &mut RngState,
    selection_count: u32,
    color_count: u8,
    shape_count: u8,
) -> EffectOption {
    match kind {
        OptionKind::TargetRemoval => {
            let (trigger_target, trigger_index) = random_target(rng, color_count, shape_count);
            let base = rng.range_i64(100, 999);
            let amount = (base + (selection_count.saturating_sub(1) as i64) * 20).min(999);
            let (action_target, action_index) = random_target(rng, color_count, shape_count);
            let count = 4 + rng.range_usize(8);
            EffectOption {
                title: format!(
                    "Clear {} {} value: remove {} {} pieces",
                    amount,
                    target_name(trigger_target, trigger_index),
                    count,
                    target_name(action_target, action_index),
                ),
                trigger: TriggerSpec::RemoveTarget {
                    target: trigger_target,
                    index: trigger_index,
                    amount,
                },
                action: ActionSpec::RemoveTarget {
                    target: action_target,
                    index: action_index,
                    count,
                },
            }
        }
        OptionKind::ComboRemoval => {
            let amount = 2 + rng.range_usize(4) as u32;
            if rng.chance() {
                let height = 2 + rng.range_usize(2);
                let width = 2 + rng.range_usize(3);
                EffectOption {
                    title: format!("Combo {amount}: clear a {height}x{width} block"),
                    trigger: TriggerSpec::ComboAccum { amount },
                    action: ActionSpec::RemoveRect { height, width },
                }
            } else {
                let (target, index) = random_target(rng, color_count, shape_count);
                let count = 4 + rng.range_usize(6);
                EffectOption {
                    title: format!(
                        "Combo {}: remove {} {} pieces",
                        amount,
                        count,
                        target_name(target, index),
                    ),
                    trigger: TriggerSpec::ComboAccum { amount },
                    action: ActionSpec::RemoveTarget {
                        target,
                        index,
                        count,
                    },
                }
            }
        }
        OptionKind::ComboBonus => {
            let amount = 2 + rng.range_usize(5) as u32;
            let multiplier = (((0.5 + rng.unit()) * 100.0).round() / 100.0).max(0.1);
            EffectOption {
                title: format!("Combo {amount}: permanent score bonus x{multiplier}"),
                trigger: TriggerSpec::ComboAccum { amount },
                action: ActionSpec::ComboBonus { multiplier },
            }
        }
        OptionKind::LineWipe => {
            let amount = 12 + rng.range_i64(0, 9);
            let lines = 1 + rng.range_usize(3);
            EffectOption {
                title: format!("Total removals {amount}: wipe {lines} lines"),
                trigger: TriggerSpec::RemoveTotal { amount },
                action: ActionSpec::RemoveLine { lines },
            }
        }
    }
}

fn random_target(rng: &mut RngState, color_count: u8, shape_count: u8) -> (TargetKind, u8) {
    if rng.chance() {
        (
            TargetKind::Color,
            rng.range_usize(color_count as usize) as u8,
        )
    } else {
        (
            TargetKind::Shape,
            rng.range_usize(shape_count as usize) as u8,
        )
    }
}

fn target_name(target: TargetKind, index: u8) -> String {
    match target {
        TargetKind::Color => content::color_name(index),
        TargetKind::Shape => content::shape_name(index),
    }
}
