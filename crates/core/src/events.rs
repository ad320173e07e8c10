use crate::{GameOutcome, LineAxis, Pos, RejectReason};
use serde::{Deserialize, Serialize};

/// Named cue events for whatever front end is listening (log panel, audio,
/// animation). The core never depends on anyone draining these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    BoardInitialized { attempts: u32, clean: bool },
    SwapRejected { reason: RejectReason },
    SwapReverted { a: Pos, b: Pos },
    CascadeStep {
        step: u32,
        removed_cells: usize,
        removed_value: i64,
        bonus: i64,
    },
    BoardRefilled { filled: usize },
    ChainEnded { length: u32, bank: u32 },
    EffectOffered { threshold: i64, options: usize },
    EffectChosen { title: String },
    EffectFired { title: String, removed_cells: usize },
    EffectNoTargets { title: String },
    LineWiped { axis: LineAxis, index: usize },
    RectWiped {
        origin: Pos,
        height: usize,
        width: usize,
    },
    ComboBonusArmed { title: String, multiplier: f64 },
    GameEnded {
        outcome: GameOutcome,
        score: i64,
        removed_total: i64,
        bank: u32,
        moves_taken: u32,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
