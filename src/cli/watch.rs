//! Interactive converter that keeps its rates fresh on a fixed interval.

use super::ui;
use super::view::View;
use crate::core::config::BaseCurrencyConfig;
use crate::core::currency::CurrencySource;
use crate::core::refresh::{self, AppState, RefreshOutcome};
use crate::core::selection::Side;
use anyhow::{Context, Result, anyhow, bail, ensure};
use std::future::Future;
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

const HELP: &str = "\
Commands:
  left N     pick item N from the left list
  right N    pick item N from the right list
  swap       exchange left and right
  refresh    fetch rates now
  list       show the currency list
  help       show this help
  quit       leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(Side, usize),
    Swap,
    Refresh,
    List,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let Some(word) = parts.next() else {
            bail!("Empty command");
        };

        let command = match word.to_lowercase().as_str() {
            "swap" => Command::Swap,
            "refresh" => Command::Refresh,
            "list" | "ls" => Command::List,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => {
                let side: Side = other
                    .parse()
                    .map_err(|_| anyhow!("Unknown command: {}", other))?;
                let index = parts
                    .next()
                    .ok_or_else(|| anyhow!("Missing item number for {}", side))?
                    .parse::<usize>()
                    .with_context(|| format!("Invalid item number for {side}"))?;
                Command::Select(side, index)
            }
        };

        if let Some(extra) = parts.next() {
            bail!("Unexpected argument: {}", extra);
        }
        Ok(command)
    }
}

/// What the loop should do after a command ran.
#[derive(Debug, PartialEq)]
pub enum Step {
    Render,
    Print(String),
    Quit,
}

/// Owns the state and the view of one interactive session.
///
/// `shown` is the view whose pick list was last printed. Item numbers typed
/// by the user are resolved against it, never against a list they have not
/// seen yet.
pub struct Session<'a> {
    source: &'a dyn CurrencySource,
    state: AppState,
    view: View,
    shown: View,
    list_changed: bool,
}

impl<'a> Session<'a> {
    pub fn new(source: &'a dyn CurrencySource, base: BaseCurrencyConfig) -> Self {
        Self {
            source,
            state: AppState::new(base),
            view: View::default(),
            shown: View::default(),
            list_changed: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// The view whose pick list the user last saw.
    pub fn shown(&self) -> &View {
        &self.shown
    }

    pub async fn refresh(&mut self) -> RefreshOutcome {
        let outcome = refresh::refresh(&mut self.state, self.source).await;
        info!(?outcome, "Refresh finished");
        self.view = View::render(&self.state);
        if self.view.left_list != self.shown.left_list {
            debug!("Currency list changed since it was last shown");
            self.list_changed = true;
        }
        outcome
    }

    /// Text to print after a render: the pick list when it changed since it
    /// was last shown, then the converter.
    pub fn output(&mut self) -> String {
        let mut text = String::new();
        if self.list_changed {
            text.push_str(&self.show_list());
            text.push('\n');
        }
        text.push_str(&self.view.to_string());
        text
    }

    fn show_list(&mut self) -> String {
        self.shown = self.view.clone();
        self.list_changed = false;
        self.shown.list_table(Side::Left).to_string()
    }

    pub async fn execute(&mut self, command: Command) -> Result<Step> {
        debug!(?command, "Executing command");
        let step = match command {
            Command::Select(side, index) => {
                self.shown.activate(&mut self.state, side, index)?;
                self.view = View::render(&self.state);
                Step::Render
            }
            Command::Swap => {
                self.state.swap();
                self.view = View::render(&self.state);
                Step::Render
            }
            Command::Refresh => {
                self.refresh().await;
                Step::Render
            }
            Command::List => Step::Print(self.show_list()),
            Command::Help => Step::Print(HELP.to_string()),
            Command::Quit => Step::Quit,
        };
        Ok(step)
    }
}

pub async fn run(
    source: &dyn CurrencySource,
    base: BaseCurrencyConfig,
    interval: Duration,
) -> Result<()> {
    let mut session = Session::new(source, base);

    println!("{}", ui::style_text("ratecast", ui::StyleType::Title));
    println!("{}", ui::style_text(HELP, ui::StyleType::Subtle));

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        debug!("Interrupted");
    };

    run_loop(
        &mut session,
        BufReader::new(tokio::io::stdin()),
        &mut std::io::stdout(),
        interval,
        interrupted,
    )
    .await
}

/// Drives `session` until `quit`, end of `input` or `shutdown`.
///
/// Rates are fetched once right away and then on every `interval` tick.
/// Ticks missed during a slow fetch are queued, and a fetch never starts
/// while another one is running. Typed commands go before queued ticks.
pub async fn run_loop<R, W, S>(
    session: &mut Session<'_>,
    input: R,
    out: &mut W,
    interval: Duration,
    shutdown: S,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future<Output = ()>,
{
    ensure!(!interval.is_zero(), "Refresh interval must be greater than zero");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    // The first tick completes immediately.
    ticker.tick().await;
    session.refresh().await;
    write!(out, "{}", session.output())?;
    out.flush()?;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read commands")? else {
                    debug!("Input closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let step = match line.parse::<Command>() {
                    Ok(command) => session.execute(command).await,
                    Err(e) => Err(e),
                };
                match step {
                    Ok(Step::Render) => write!(out, "{}", session.output())?,
                    Ok(Step::Print(text)) => writeln!(out, "{text}")?,
                    Ok(Step::Quit) => break,
                    Err(e) => writeln!(
                        out,
                        "{}",
                        ui::style_text(&e.to_string(), ui::StyleType::Error)
                    )?,
                }
            }
            _ = ticker.tick() => {
                session.refresh().await;
                write!(out, "{}", session.output())?;
            }
        }
        out.flush()?;
    }

    Ok(())
}
