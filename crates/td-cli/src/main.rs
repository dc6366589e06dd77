//! Ticket Draw command line
//!
//! Usage:
//!   ticket-draw pool --range red:A=1-50          - Show drawable tickets
//!   ticket-draw draw --config draw.yaml -n 3     - Run three animated draws

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::time;

use td_core::TdError;
use td_pool::{analyze_ranges, compact_ranges};
use td_reveal::{RevealState, TimingProfile};
use td_session::{DrawSession, SessionConfig, SessionEvent, WinRecord};

/// Redraw period for the live reveal line
const FRAME: Duration = Duration::from_millis(80);

#[derive(Parser)]
#[command(name = "ticket-draw", about = "Draw winning tickets from sold ranges")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Session config file (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sold range, applied after the config file (repeatable)
    #[arg(short, long = "range", value_name = "COLOR:VARIANT=RANGES")]
    ranges: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show sold and available tickets per color and variant
    Pool {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Run consecutive draws with the animated reveal
    Draw {
        #[command(flatten)]
        source: SourceArgs,

        /// Number of draws
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Seed for reproducible draws
        #[arg(long)]
        seed: Option<u64>,

        /// Reveal speed
        #[arg(short, long, value_enum)]
        profile: Option<ProfileArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    Normal,
    Turbo,
}

impl From<ProfileArg> for TimingProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Normal => TimingProfile::Normal,
            ProfileArg::Turbo => TimingProfile::Turbo,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pool { source } => show_pool(&load_config(&source)?),
        Commands::Draw {
            source,
            count,
            seed,
            profile,
        } => {
            let mut config = load_config(&source)?;
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(profile) = profile {
                config.timing = None;
                config = config.with_profile(profile.into());
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .context("Failed to start the timer runtime")?;
            runtime.block_on(run_draws(config, count))
        }
    }
}

fn load_config(source: &SourceArgs) -> Result<SessionConfig> {
    let mut config = match &source.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    for assignment in &source.ranges {
        config
            .ranges
            .apply_assignment(assignment)
            .with_context(|| format!("Invalid --range {:?}", assignment))?;
    }
    Ok(config)
}

fn show_pool(config: &SessionConfig) -> Result<()> {
    let session = DrawSession::new(config.clone());

    println!("{:<8} {:<3} {:>5} {:>10}  ranges", "color", "var", "sold", "available");
    for group in session.pool_counts() {
        if group.sold == 0 {
            continue;
        }
        let report = analyze_ranges(config.ranges.get(group.color, group.variant));
        println!(
            "{:<8} {:<3} {:>5} {:>10}  {}",
            group.color,
            group.variant,
            group.sold,
            group.available,
            compact_ranges(&report.numbers)
        );
    }

    for (color, variant, expr) in config.ranges.entries() {
        let report = analyze_ranges(expr);
        if !report.is_clean() {
            println!("⚠️  {} {}: ignored {}", color, variant, report.dropped.join(" | "));
        }
    }

    println!("\nAvailable tickets: {}", session.available_count());
    Ok(())
}

async fn run_draws(config: SessionConfig, count: usize) -> Result<()> {
    let mut session = DrawSession::new(config);

    for round in 1..=count {
        let ticket_count = session.available_count();
        match session.draw() {
            Ok(_) => {}
            Err(TdError::NoTicketsAvailable) => {
                println!("No available tickets left, stopping after {} draw(s).", round - 1);
                break;
            }
            Err(e) => return Err(e.into()),
        }
        println!("🎡 Draw {}/{} from {} ticket(s)", round, count, ticket_count);

        loop {
            // next_event only awaits the channel, so timing out loses nothing
            match time::timeout(FRAME, session.next_event()).await {
                Err(_) => render(&session.reveal_snapshot()),
                Ok(Some(SessionEvent::Revealed { ticket, total_won })) => {
                    render(&session.reveal_snapshot());
                    println!();
                    println!("🎉 Winner: {} ({} drawn)", ticket, total_won);
                    if session.take_confetti() {
                        println!("🎊 🎊 🎊");
                    }
                    break;
                }
                Ok(Some(event)) => log::debug!("{:?}", event),
                Ok(None) => bail!("Reveal timeline stopped unexpectedly"),
            }
        }
    }

    let won = session.won_tickets();
    println!("\nDrawn tickets ({}):", won.len());
    for record in won.recent_first() {
        println!("  {}", win_line(record));
    }
    Ok(())
}

/// One win list row, timestamp in local time
fn win_line(record: &WinRecord) -> String {
    format!(
        "{}  {:<6} {:02}{}",
        record.drawn_at.with_timezone(&Local).format("%H:%M:%S"),
        record.ticket.color(),
        record.ticket.number(),
        record.ticket.variant()
    )
}

/// Redraw the live reveal line in place
fn render(state: &RevealState) {
    let variant = state
        .shown_variant()
        .map(|v| v.name())
        .unwrap_or(" ");
    let color = state
        .visible_color()
        .map(|c| format!("{} {}", c.color_hex(), c))
        .unwrap_or_default();

    print!(
        "\r  [{:<8}] {}{}  {:<16}",
        format!("{:?}", state.phase),
        state.number_label(),
        variant,
        color
    );
    let _ = std::io::stdout().flush();
}
