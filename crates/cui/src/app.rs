use anyhow::Result;
use hexmatch_core::{
    EndCondition, Event, EventBus, GameConfig, GameOutcome, LineAxis, Pos, RejectReason,
    SessionState, SwapOutcome,
};
use std::collections::VecDeque;

pub const DEFAULT_RUN_SEED: u64 = 0x5EED;
const MAX_EVENT_LOG: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiLocale {
    EnUs,
    JaJp,
}

impl UiLocale {
    pub fn from_opt(value: Option<&str>) -> Self {
        match value {
            Some(code) if code.to_ascii_lowercase().starts_with("ja") => Self::JaJp,
            _ => Self::EnUs,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::JaJp => "ja_JP",
        }
    }

    pub fn text<'a>(self, en: &'a str, ja: &'a str) -> &'a str {
        if matches!(self, Self::JaJp) {
            ja
        } else {
            en
        }
    }
}

pub struct App {
    pub locale: UiLocale,
    pub seed: u64,
    pub session: SessionState,
    pub events: EventBus,
    pub cursor: Pos,
    pub selected: Option<Pos>,
    pub event_log: VecDeque<String>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn bootstrap(locale: UiLocale, seed: u64, config: GameConfig) -> Result<Self> {
        let mut events = EventBus::default();
        let mut session =
            SessionState::new(config, seed).map_err(|err| anyhow::anyhow!(err.to_string()))?;
        session.start(&mut events);
        let mut app = Self {
            locale,
            seed,
            session,
            events,
            cursor: Pos::new(0, 0),
            selected: None,
            event_log: VecDeque::new(),
            status_line: locale.text("ready", "準備完了").to_string(),
            show_help: false,
            should_quit: false,
        };
        app.drain_events();
        Ok(app)
    }

    pub fn on_tick(&mut self) {
        self.drain_events();
    }

    pub fn awaiting_choice(&self) -> bool {
        self.session.pending_options().is_some()
    }

    pub fn move_cursor(&mut self, dr: isize, dc: isize) {
        let rows = self.session.grid.rows() as isize;
        let cols = self.session.grid.cols() as isize;
        let row = (self.cursor.row as isize + dr).clamp(0, rows - 1);
        let col = (self.cursor.col as isize + dc).clamp(0, cols - 1);
        self.cursor = Pos::new(row as usize, col as usize);
    }

    /// Space: pick the cell under the cursor, or swap it with the one
    /// already picked.
    pub fn toggle_select(&mut self) {
        if self.awaiting_choice() {
            self.status_line = self
                .locale
                .text("choose an effect first (1-3)", "先に効果を選択してください (1-3)")
                .to_string();
            return;
        }
        match self.selected {
            None => {
                self.selected = Some(self.cursor);
                self.status_line = self
                    .locale
                    .text("cell picked; pick a neighbor to swap", "マスを選択しました")
                    .to_string();
            }
            Some(origin) if origin == self.cursor => {
                self.selected = None;
            }
            Some(origin) => self.perform_swap(origin, self.cursor),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn perform_swap(&mut self, a: Pos, b: Pos) {
        match self.session.try_swap(a, b, &mut self.events) {
            Ok(SwapOutcome::Resolved(summary)) => {
                let mut line = format!(
                    "{} x{}: +{}",
                    self.locale.text("chain", "連鎖"),
                    summary.chain_length,
                    summary.removed_value
                );
                if summary.bonus_score > 0 {
                    line.push_str(&format!(" (+{})", summary.bonus_score));
                }
                self.status_line = line;
            }
            Ok(SwapOutcome::Reverted) => {
                self.status_line = self
                    .locale
                    .text("no match; swap reverted", "マッチなし、入れ替えを戻しました")
                    .to_string();
            }
            Ok(SwapOutcome::Rejected(reason)) => {
                self.status_line = reject_text(self.locale, reason).to_string();
            }
            Err(err) => {
                self.status_line = err.to_string();
            }
        }
        self.selected = None;
        self.drain_events();
    }

    pub fn choose(&mut self, index: usize) {
        if !self.awaiting_choice() {
            self.status_line = self
                .locale
                .text("no effect offer is open", "選択できる効果はありません")
                .to_string();
            return;
        }
        match self.session.choose_effect(index, &mut self.events) {
            Ok(()) => {
                self.status_line = self.locale.text("effect acquired", "効果を取得しました").to_string();
            }
            Err(err) => {
                self.status_line = err.to_string();
            }
        }
        self.drain_events();
    }

    pub fn restart(&mut self) {
        self.session.restart(&mut self.events);
        self.selected = None;
        self.cursor = Pos::new(0, 0);
        self.status_line = self.locale.text("restarted", "リスタートしました").to_string();
        self.drain_events();
    }

    pub fn mode_label(&self) -> String {
        match self.session.config.mode.end {
            EndCondition::ComboTarget(target) => format!(
                "{} {target}",
                self.locale.text("combo target", "コンボ目標")
            ),
            EndCondition::MovesExhausted => match self.session.config.mode.move_limit {
                Some(limit) => format!("{} {limit}", self.locale.text("move limit", "手数制限")),
                None => self.locale.text("endless", "エンドレス").to_string(),
            },
        }
    }

    pub fn moves_label(&self) -> String {
        match self.session.config.mode.end {
            EndCondition::ComboTarget(_) => format!(
                "{}: {}",
                self.locale.text("moves taken", "手数"),
                self.session.moves_taken
            ),
            EndCondition::MovesExhausted => format!(
                "{}: {}",
                self.locale.text("moves left", "残り手数"),
                self.session
                    .moves_left
                    .map(|left| left.to_string())
                    .unwrap_or_else(|| "∞".to_string())
            ),
        }
    }

    pub fn outcome_label(&self) -> &'static str {
        match self.session.outcome {
            None => self.locale.text("playing", "プレイ中"),
            Some(GameOutcome::MovesExhausted) => self.locale.text("out of moves", "手数切れ"),
            Some(GameOutcome::ComboTargetReached) => {
                self.locale.text("combo target reached", "コンボ目標達成")
            }
        }
    }

    fn drain_events(&mut self) {
        let locale = self.locale;
        let drained: Vec<Event> = self.events.drain().collect();
        for event in drained {
            self.event_log.push_front(format_event(locale, &event));
            self.event_log.truncate(MAX_EVENT_LOG);
        }
    }
}

fn reject_text(locale: UiLocale, reason: RejectReason) -> &'static str {
    match reason {
        RejectReason::MovesExhausted => locale.text("no moves left", "手数が尽きました"),
        RejectReason::ChoicePending => {
            locale.text("choose an effect first", "効果を選択してください")
        }
        RejectReason::GameOver => locale.text("the game has ended", "ゲームは終了しました"),
    }
}

fn format_event(locale: UiLocale, event: &Event) -> String {
    match event {
        Event::BoardInitialized { attempts, clean } => {
            if *clean {
                format!(
                    "{} ({}: {attempts})",
                    locale.text("board ready", "盤面生成完了"),
                    locale.text("retries", "再試行")
                )
            } else {
                locale
                    .text(
                        "board accepted with initial matches",
                        "初期マッチ付きの盤面を採用しました",
                    )
                    .to_string()
            }
        }
        Event::SwapRejected { reason } => reject_text(locale, *reason).to_string(),
        Event::SwapReverted { a, b } => format!(
            "{} {a} <-> {b}",
            locale.text("reverted", "入れ替えを戻しました")
        ),
        Event::CascadeStep {
            step,
            removed_cells,
            removed_value,
            bonus,
        } => {
            let mut line = format!(
                "{} {step}: {removed_cells} {} (+{removed_value})",
                locale.text("cascade", "連鎖"),
                locale.text("cells", "マス")
            );
            if *bonus > 0 {
                line.push_str(&format!(
                    " {} +{bonus}",
                    locale.text("bonus", "ボーナス")
                ));
            }
            line
        }
        Event::BoardRefilled { filled } => format!(
            "{}: {filled}",
            locale.text("refilled", "補充")
        ),
        Event::ChainEnded { length, bank } => format!(
            "{}: +{length} ({} {bank})",
            locale.text("chain over", "連鎖終了"),
            locale.text("bank", "コンボ累積")
        ),
        Event::EffectOffered { threshold, options } => format!(
            "{} {threshold}: {} ({options})",
            locale.text("score passed", "スコアが閾値を超えました:"),
            locale.text("choose an effect", "効果候補を表示します")
        ),
        Event::EffectChosen { title } => {
            format!("{}: {title}", locale.text("effect acquired", "効果を取得"))
        }
        Event::EffectFired {
            title,
            removed_cells,
        } => format!(
            "{}: {title} ({removed_cells} {})",
            locale.text("effect fired", "効果発動"),
            locale.text("removed", "削除")
        ),
        Event::EffectNoTargets { title } => format!(
            "{}: {title}",
            locale.text("effect found no targets", "対象セルが見つかりませんでした")
        ),
        Event::LineWiped { axis, index } => match axis {
            LineAxis::Row => format!("{} {index}", locale.text("wiped row", "行を消去:")),
            LineAxis::Col => format!("{} {index}", locale.text("wiped column", "列を消去:")),
        },
        Event::RectWiped {
            origin,
            height,
            width,
        } => format!(
            "{} {height}x{width} @ {origin}",
            locale.text("wiped block", "ブロックを消去")
        ),
        Event::ComboBonusArmed { title, multiplier } => format!(
            "{}: {title} (x{multiplier})",
            locale.text("permanent bonus armed", "恒久ボーナス効果が有効になりました")
        ),
        Event::GameEnded {
            outcome,
            score,
            removed_total,
            bank,
            moves_taken,
        } => {
            let label = match outcome {
                GameOutcome::MovesExhausted => locale.text("out of moves", "手数切れ"),
                GameOutcome::ComboTargetReached => {
                    locale.text("combo target reached", "コンボ目標達成")
                }
            };
            format!(
                "{}: {label} | {} {score} | {} {removed_total} | {} {bank} | {} {moves_taken}",
                locale.text("game over", "ゲーム終了"),
                locale.text("score", "スコア"),
                locale.text("removed", "総削除値"),
                locale.text("bank", "コンボ累積"),
                locale.text("moves", "手数")
            )
        }
    }
}
