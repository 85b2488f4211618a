//! The live timer host.
//!
//! Merges the config file with command-line overrides, mounts a fresh
//! engine on a terminal surface, drives the tick loop, binds stdin control
//! lines to the engine commands, and performs the expiry redirect.

use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use clap::Args;
use tickdown_core::storage::Config;
use tickdown_core::{
    Event, EventKind, Outcome, RenderTarget, SqliteStore, Tick, TimerEngine, TimerOptions,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Args)]
pub struct RunArgs {
    /// Initial time in seconds
    #[arg(long)]
    seconds: Option<f64>,
    /// Low-time boundary in seconds
    #[arg(long)]
    low: Option<f64>,
    /// Color name painted while low (red, green, yellow, blue, magenta, cyan)
    #[arg(long)]
    low_color: Option<String>,
    /// Paint the low color, not just the marker
    #[arg(long)]
    paint_low: bool,
    /// Bounce between zero and the full time instead of stopping
    #[arg(long)]
    bounce: bool,
    /// URL to open one second after expiry
    #[arg(long)]
    redirect_url: Option<String>,
    /// Persist remaining time across runs
    #[arg(long)]
    persist: bool,
    /// Storage identifier (generated when omitted)
    #[arg(long)]
    storage_id: Option<String>,
    /// Show fractional seconds
    #[arg(long)]
    fraction: bool,
    /// Fractional digits, 1-3
    #[arg(long)]
    fraction_digits: Option<u8>,
    /// Start paused instead of ticking immediately
    #[arg(long)]
    paused: bool,
    /// Print transition events as JSON lines
    #[arg(long)]
    json: bool,
}

/// Terminal surface: rewrites one line in place, with ANSI color while the
/// low-time marker is painted.
struct TerminalSurface {
    text: String,
    color: Option<String>,
    low_marked: bool,
}

impl TerminalSurface {
    fn new() -> Self {
        Self {
            text: String::new(),
            color: None,
            low_marked: false,
        }
    }

    fn draw(&self) {
        let mut out = io::stdout();
        match (self.color.as_deref().and_then(ansi_code), self.low_marked) {
            (Some(code), _) => {
                let _ = write!(out, "\r\x1b[{code}m{}\x1b[0m ", self.text);
            }
            // Marked but not painted: bold stands in for the attribute.
            (None, true) => {
                let _ = write!(out, "\r\x1b[1m{}\x1b[0m ", self.text);
            }
            (None, false) => {
                let _ = write!(out, "\r{} ", self.text);
            }
        }
        let _ = out.flush();
    }
}

impl RenderTarget for TerminalSurface {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.draw();
    }

    fn set_low_marker(&mut self, marked: bool) {
        self.low_marked = marked;
        self.draw();
    }

    fn set_color(&mut self, color: Option<&str>) {
        self.color = color.map(str::to_owned);
        self.draw();
    }
}

fn ansi_code(color: &str) -> Option<&'static str> {
    match color {
        "red" => Some("31"),
        "green" => Some("32"),
        "yellow" => Some("33"),
        "blue" => Some("34"),
        "magenta" => Some("35"),
        "cyan" => Some("36"),
        _ => None,
    }
}

/// Overlay command-line flags on the config-file defaults, the same merge
/// a settings form performs before mounting a fresh engine.
fn merge_options(mut options: TimerOptions, args: &RunArgs) -> TimerOptions {
    if let Some(seconds) = args.seconds {
        options.total_secs = seconds;
    }
    if let Some(low) = args.low {
        options.low_secs = Some(low);
    }
    if let Some(color) = &args.low_color {
        options.low_color = Some(color.clone());
    }
    if args.paint_low {
        options.paint_low_color = true;
    }
    if args.bounce {
        options.bounce = true;
    }
    if let Some(url) = &args.redirect_url {
        options.redirect = true;
        options.redirect_url = Some(url.clone());
    }
    if args.persist {
        options.persist = true;
    }
    if let Some(id) = &args.storage_id {
        options.storage_id = Some(id.clone());
    }
    if args.fraction {
        options.show_fraction = true;
    }
    if let Some(digits) = args.fraction_digits {
        options.show_fraction = true;
        options.fraction_digits = digits;
    }
    if args.paused {
        options.auto_play = false;
    }
    options
}

fn report(outcome: Outcome, json: bool) {
    match outcome {
        Outcome::Changed(event) => {
            if json {
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("\r{line}");
                }
            }
        }
        Outcome::Notice(advisory) => println!("\rnotice: {advisory}"),
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_timer(args))
}

async fn run_timer(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let options = merge_options(config.timer, &args);
    let json = args.json;

    let mut engine = TimerEngine::new(options, TerminalSurface::new())?;
    match SqliteStore::open() {
        Ok(store) => engine = engine.with_store(Rc::new(store)),
        Err(e) => tracing::warn!("state store unavailable, running in memory: {e}"),
    }

    engine.on(EventKind::Stop, |event| {
        if let Event::Stopped { expired: true, .. } = event {
            println!("\ntime's up");
        }
    });

    engine.initialize()?;
    eprintln!("commands: play, pause, stop, reset, quit");

    let mut ticker = tokio::time::interval(engine.options().tick_interval());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Tick::Expired { redirect } = engine.tick() {
                    if let Some(url) = redirect {
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        tracing::info!("opening {url}");
                        if let Err(e) = open::that(&url) {
                            tracing::warn!("failed to open {url}: {e}");
                        }
                    }
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "" => {}
                    "play" => report(engine.play(), json),
                    "pause" => report(engine.pause(), json),
                    "stop" => report(engine.stop(), json),
                    "reset" => report(engine.reset(), json),
                    "quit" | "q" => break,
                    other => println!("\runknown command: {other}"),
                }
            }
        }
    }

    println!();
    Ok(())
}
