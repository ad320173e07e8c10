use crate::app::App;
use hexmatch_core::{content, next_threshold_value, Piece, Pos};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Line, Modifier, Span, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

const SHAPE_GLYPHS: [char; 8] = ['*', '#', '^', 'o', 'v', '%', '<', '~'];

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(12),
            Constraint::Length(10),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(46), Constraint::Length(42)])
        .split(root[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(middle[1]);

    draw_board(frame, middle[0], app);
    draw_thresholds(frame, right[0], app);
    draw_effects(frame, right[1], app);
    draw_events(frame, root[2], app);

    if app.awaiting_choice() {
        draw_choice_popup(frame, app);
    }
    if app.session.finished() {
        draw_end_overlay(frame, app);
    }
    if app.show_help {
        draw_help_popup(frame, app);
    }
}

fn color_for(index: u8) -> Color {
    match index {
        0 => Color::Red,
        1 => Color::LightRed,
        2 => Color::Yellow,
        3 => Color::Green,
        4 => Color::Cyan,
        5 => Color::Blue,
        6 => Color::Magenta,
        7 => Color::LightMagenta,
        _ => Color::White,
    }
}

fn shape_glyph(index: u8) -> char {
    SHAPE_GLYPHS.get(index as usize).copied().unwrap_or('?')
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let title = format!(
        "Hexmatch CUI | {} | {} {} | {} {}",
        app.mode_label(),
        app.locale.text("Seed", "種"),
        app.seed,
        app.locale.text("Lang", "言語"),
        app.locale.code()
    );
    let summary = format!(
        "{} {}  {} {}  {} {}  {} {}  {}",
        app.locale.text("Score", "スコア"),
        session.ledger.score,
        app.locale.text("Combo", "コンボ"),
        session.ledger.combo,
        app.locale.text("Bank", "コンボ累積"),
        session.ledger.combo_bank,
        app.locale.text("Next reward", "次の報酬閾値"),
        next_threshold_value(session.selection_count),
        app.moves_label()
    );
    let extra = format!(
        "{}: {} | {}: {}",
        app.locale.text("Outcome", "状況"),
        app.outcome_label(),
        app.locale.text("Removed total", "総削除値"),
        session.ledger.removed.total
    );
    let lines = vec![
        Line::from(title.bold()),
        Line::from(summary),
        Line::from(extra),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Status", "状態"),
            app.status_line
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Overview", "概要"));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn cell_span(app: &App, pos: Pos, piece: Option<Piece>) -> Span<'static> {
    let text = match piece {
        Some(piece) => format!("{}{:>3} ", shape_glyph(piece.shape), piece.value),
        None => "  .  ".to_string(),
    };
    let mut style = match piece {
        Some(piece) => Style::default().fg(color_for(piece.color)),
        None => Style::default().fg(Color::DarkGray),
    };
    if app.cursor == pos {
        style = style.add_modifier(Modifier::REVERSED);
    }
    if app.selected == Some(pos) {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    Span::styled(text, style)
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let grid = &app.session.grid;
    let mut lines = Vec::with_capacity(grid.rows());
    for row in 0..grid.rows() {
        let mut spans = Vec::with_capacity(grid.cols() + 1);
        // Odd rows shift right to suggest the hex offset.
        if row % 2 == 1 {
            spans.push(Span::raw("   "));
        }
        for col in 0..grid.cols() {
            let pos = Pos::new(row, col);
            spans.push(cell_span(app, pos, grid.get(pos)));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Board", "盤面"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_thresholds(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let mut lines = Vec::new();
    for (index, required) in session.required.by_color.iter().enumerate() {
        let index = index as u8;
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(color_for(index))),
            Span::raw(format!("{}: {required}", content::color_name(index))),
        ]));
    }
    for (index, required) in session.required.by_shape.iter().enumerate() {
        let index = index as u8;
        lines.push(Line::from(format!(
            "{} {}: {required}",
            shape_glyph(index),
            content::shape_name(index)
        )));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Required per index", "必要値"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_effects(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let items: Vec<ListItem> = if session.effects.is_empty() {
        vec![ListItem::new(
            app.locale.text("(none yet)", "（まだありません）"),
        )]
    } else {
        session
            .effects
            .effects
            .iter()
            .map(|effect| {
                let (current, required) = effect.progress(&session.ledger);
                let label = if effect.active {
                    format!(
                        "{} [{}]",
                        effect.title,
                        app.locale.text("armed", "有効")
                    )
                } else {
                    format!("{} — {current}/{required}", effect.title)
                };
                let style = if effect.active {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                ListItem::new(label).style(style)
            })
            .collect()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Effects", "効果"));
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .event_log
        .iter()
        .take(area.height.saturating_sub(2) as usize)
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Log", "ログ"));
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_choice_popup(frame: &mut Frame, app: &App) {
    let Some(options) = app.session.pending_options() else {
        return;
    };
    let area = popup_area(frame.area(), 70, 40);
    frame.render_widget(Clear, area);
    let mut lines = vec![
        Line::from(
            app.locale
                .text(
                    "Reward unlocked — pick one effect:",
                    "報酬選択 — 効果をひとつ選んでください:",
                )
                .bold(),
        ),
        Line::from(""),
    ];
    for (index, option) in options.iter().enumerate() {
        lines.push(Line::from(format!("  [{}] {}", index + 1, option.title)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Effect choice", "効果の選択"));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn draw_end_overlay(frame: &mut Frame, app: &App) {
    let session = &app.session;
    let area = popup_area(frame.area(), 50, 40);
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.outcome_label().bold()),
        Line::from(""),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Score", "スコア"),
            session.ledger.score
        )),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Removed total", "総削除値"),
            session.ledger.removed.total
        )),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Combo bank", "コンボ累積"),
            session.ledger.combo_bank
        )),
        Line::from(format!(
            "{}: {}",
            app.locale.text("Moves taken", "手数"),
            session.moves_taken
        )),
        Line::from(""),
        Line::from(
            app.locale
                .text("r: restart   q: quit", "r: リスタート   q: 終了"),
        ),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Game over", "ゲーム終了"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame, app: &App) {
    let area = popup_area(frame.area(), 60, 50);
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(app.locale.text("Keys", "キー操作").bold()),
        Line::from(""),
        Line::from(app.locale.text(
            "arrows / hjkl   move the cursor",
            "矢印 / hjkl   カーソル移動",
        )),
        Line::from(app.locale.text(
            "space / enter   pick a cell, then swap with a neighbor",
            "スペース / Enter   マスを選択して入れ替え",
        )),
        Line::from(app.locale.text("esc   clear selection", "Esc   選択解除")),
        Line::from(app.locale.text("1-3   choose an offered effect", "1-3   効果を選択")),
        Line::from(app.locale.text("r   restart", "r   リスタート")),
        Line::from(app.locale.text("q   quit", "q   終了")),
        Line::from(app.locale.text("?   toggle this help", "?   ヘルプ表示切替")),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(app.locale.text("Help", "ヘルプ"));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
