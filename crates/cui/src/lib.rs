mod actions;
mod app;
mod input;
mod view;

use anyhow::{Context, Result};
use app::{App, UiLocale, DEFAULT_RUN_SEED};
use crossterm::event::{self, Event as CEvent, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use hexmatch_core::{EndCondition, GameConfig, COMBO_TARGET_DEFAULT};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fs;
use std::io::{self, stdout, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub locale: Option<String>,
    pub seed: Option<u64>,
    pub config_json: Option<PathBuf>,
    pub move_limit: Option<u32>,
    pub combo256: bool,
    pub compact: bool,
}

pub fn run(options: LaunchOptions) -> Result<()> {
    let mut config = match options.config_json.as_ref() {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read config from {}", path.display()))?;
            serde_json::from_str::<GameConfig>(&raw)
                .with_context(|| format!("parse config from {}", path.display()))?
        }
        None => GameConfig::standard(),
    };
    if options.combo256 {
        config.mode.end = EndCondition::ComboTarget(COMBO_TARGET_DEFAULT);
    }
    if options.move_limit.is_some() {
        config.mode.move_limit = options.move_limit;
    }
    if options.compact {
        config.compact = true;
    }

    let locale = UiLocale::from_opt(options.locale.as_deref());
    let seed = options.seed.unwrap_or(DEFAULT_RUN_SEED);
    let mut app = App::bootstrap(locale, seed, config)?;

    ensure_interactive_terminal()?;

    enable_raw_mode().map_err(|err| {
        anyhow::anyhow!(
            "failed to enable raw mode; ensure the process owns an interactive terminal: {err}"
        )
    })?;
    let mut stdout = stdout();
    stdout
        .execute(EnterAlternateScreen)
        .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let run_result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    run_result
}

pub fn run_with_args(args: &[String]) -> Result<()> {
    let options = parse_options(args);
    run(options)
}

fn parse_options(args: &[String]) -> LaunchOptions {
    let mut options = LaunchOptions {
        locale: std::env::var("HEXMATCH_LANG").ok(),
        ..LaunchOptions::default()
    };
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--lang" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    options.locale = Some(value.clone());
                    idx += 1;
                }
            }
            "--seed" => {
                if let Some(value) = args.get(idx + 1) {
                    options.seed = value.parse::<u64>().ok();
                    idx += 1;
                }
            }
            "--config" => {
                if let Some(value) = args.get(idx + 1) {
                    options.config_json = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--moves" => {
                if let Some(value) = args.get(idx + 1) {
                    options.move_limit = value.parse::<u32>().ok();
                    idx += 1;
                }
            }
            "--combo256" => options.combo256 = true,
            "--compact" => options.compact = true,
            _ => {}
        }
        idx += 1;
    }
    options
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(120);
    while !app.should_quit {
        terminal.draw(|frame| view::draw(frame, app))?;
        if event::poll(tick_rate)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = input::map_key(key);
                actions::dispatch(app, action);
            }
        } else {
            app.on_tick();
        }
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;
    Ok(())
}

fn ensure_interactive_terminal() -> Result<()> {
    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return Ok(());
    }
    anyhow::bail!(
        "hexmatch-cui requires an interactive TTY (run directly in a terminal, not a piped/headless shell)"
    );
}
