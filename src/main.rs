//! Tatami - Match Control Desk
//!
//! Interactive console for running a single match: start the clock, record
//! actions as the referee calls them, watch the scoreboard, and finalize.
//! The engine does the judging; this binary is just the table official's
//! keyboard.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Runtime;

use tatami::bout::action::PenaltyKind;
use tatami::bout::{Bout, BoutState};
use tatami::catalog::{self, Category};
use tatami::core::config::EngineConfig;
use tatami::core::error::Result;
use tatami::core::types::{format_clock, Competitor, CompetitorId, MatchId};
use tatami::engine::repository::InMemoryRepository;
use tatami::engine::{Engine, RecordReceipt};
use tatami::score::combination::SubAction;
use tatami::score::outcome::Finalization;
use tatami::score::tally::ScoreTally;
use tatami::score::value::ScoreValue;

#[derive(Parser)]
#[command(name = "tatami", about = "Judo match control desk")]
struct Args {
    /// Optional TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// White competitor's name
    #[arg(long, default_value = "White")]
    white: String,

    /// Blue competitor's name
    #[arg(long, default_value = "Blue")]
    blue: String,

    /// Override the match duration in seconds
    #[arg(long)]
    duration: Option<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("tatami=info")
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(duration) = args.duration {
        config.match_duration_secs = duration;
    }

    let rt = Runtime::new()?;
    let engine = Arc::new(Engine::new(config, Arc::new(InMemoryRepository::new())));

    let bout = engine.create_match(Competitor::new(&args.white), Competitor::new(&args.blue))?;
    let match_id = bout.id();
    let white = bout.white().clone();
    let blue = bout.blue().clone();

    println!("\n=== TATAMI CONTROL DESK ===");
    println!("{} (white) vs {} (blue)", white.name, blue.name);
    println!();
    println!("Commands:");
    println!("  start                                  - start the match clock");
    println!("  throw <w|b> <technique> <score> [miss] - record a standing technique");
    println!("  ground <w|b> <technique> [hold] [miss] - record a ground technique");
    println!("  penalty <w|b> <shido|hansoku-make>     - record a penalty");
    println!("  combo <w|b> <tech[:mod],tech[:mod]...> - record a combination");
    println!("         mods: score name, hold seconds, or 'miss'");
    println!("  tally / t                              - show the scoreboard");
    println!("  status / s                             - show full match status");
    println!("  pause / resume                         - control the clock");
    println!("  finalize [w|b]                         - finish the match");
    println!("  export                                 - dump the match record as JSON");
    println!("  techniques <category>                  - list catalog entries");
    println!("  quit / q                               - exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        if let Err(error) = dispatch(&rt, &engine, match_id, &white, &blue, input) {
            println!("Error: {error}");
        }
    }

    let snapshot = rt.block_on(engine.snapshot(match_id))?;
    println!(
        "\nGoodbye. Match {} after {} recorded action(s).",
        snapshot.state(),
        snapshot.ledger().len()
    );
    Ok(())
}

fn dispatch(
    rt: &Runtime,
    engine: &Engine,
    match_id: MatchId,
    white: &Competitor,
    blue: &Competitor,
    input: &str,
) -> Result<()> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let side = |token: &str| parse_side(token, white, blue);

    match words.as_slice() {
        ["start"] => {
            let bout = rt.block_on(engine.start_match(match_id))?;
            println!(
                "Hajime! {} on the clock.",
                format_clock(bout.clock().remaining())
            );
        }
        ["throw", who, technique, score] | ["throw", who, technique, score, "miss"] => {
            let effective = *words.last().unwrap() != "miss";
            let (Some(who), Some(score)) = (side(*who), parse_score(*score)) else {
                println!("Usage: throw <w|b> <technique> <ippon|waza-ari|yuko|none> [miss]");
                return Ok(());
            };
            let receipt =
                rt.block_on(engine.record_throw(match_id, who, technique, score, effective))?;
            report(receipt, white, blue);
        }
        ["ground", who, technique] => {
            let Some(who) = side(*who) else {
                println!("Usage: ground <w|b> <technique> [hold-seconds] [miss]");
                return Ok(());
            };
            let receipt = rt.block_on(engine.record_ground(match_id, who, technique, true, None))?;
            report(receipt, white, blue);
        }
        ["ground", who, technique, "miss"] => {
            let Some(who) = side(*who) else {
                println!("Usage: ground <w|b> <technique> [hold-seconds] [miss]");
                return Ok(());
            };
            let receipt =
                rt.block_on(engine.record_ground(match_id, who, technique, false, None))?;
            report(receipt, white, blue);
        }
        ["ground", who, technique, hold] => {
            let (Some(who), Ok(hold)) = (side(*who), hold.parse::<u32>()) else {
                println!("Usage: ground <w|b> <technique> [hold-seconds] [miss]");
                return Ok(());
            };
            let receipt =
                rt.block_on(engine.record_ground(match_id, who, technique, true, Some(hold)))?;
            report(receipt, white, blue);
        }
        ["penalty", who, kind] => {
            let (Some(who), Some(kind)) = (side(*who), parse_penalty(*kind)) else {
                println!("Usage: penalty <w|b> <shido|hansoku-make>");
                return Ok(());
            };
            let receipt = rt.block_on(engine.record_penalty(match_id, who, kind))?;
            report(receipt, white, blue);
        }
        ["combo", who, spec] => {
            let (Some(who), Some(sub_actions)) = (side(*who), parse_combo(*spec)) else {
                println!("Usage: combo <w|b> <technique[:score|:hold|:miss],...>");
                return Ok(());
            };
            let (receipt, outcome) =
                rt.block_on(engine.record_combined(match_id, who, sub_actions, None))?;
            println!(
                "{} -> {} ({}/{} effective)",
                outcome.label, outcome.final_score, outcome.effective_count, outcome.total
            );
            report(receipt, white, blue);
        }
        ["tally"] | ["t"] => {
            let tally = rt.block_on(engine.tally(match_id))?;
            print_side(&white.name, &tally.white);
            print_side(&blue.name, &tally.blue);
        }
        ["status"] | ["s"] => {
            let snapshot = rt.block_on(engine.snapshot(match_id))?;
            print_status(&snapshot);
        }
        ["pause"] => {
            let remaining = rt.block_on(engine.pause_clock(match_id))?;
            println!("Clock paused at {}.", format_clock(remaining));
        }
        ["resume"] => {
            let remaining = rt.block_on(engine.resume_clock(match_id))?;
            println!("Clock running, {} remaining.", format_clock(remaining));
        }
        ["finalize"] => {
            let finalization = rt.block_on(engine.finalize_match(match_id, None))?;
            print_finalization(finalization, white, blue);
        }
        ["finalize", who] => {
            let Some(who) = side(*who) else {
                println!("Usage: finalize [w|b]");
                return Ok(());
            };
            let finalization = rt.block_on(engine.finalize_match(match_id, Some(who)))?;
            print_finalization(finalization, white, blue);
        }
        ["export"] => {
            let snapshot = rt.block_on(engine.snapshot(match_id))?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        ["techniques", token] => match parse_category(*token) {
            Some(category) => {
                for technique in catalog::techniques_for(category) {
                    println!("  {:<28} {}", technique.id, technique.display_name);
                }
            }
            None => {
                println!("Unknown category. Codes: KTW K A MS YS O S KN");
            }
        },
        _ => println!("Unknown command. Type 'status' for the scoreboard or 'q' to quit."),
    }
    Ok(())
}

fn parse_side(token: &str, white: &Competitor, blue: &Competitor) -> Option<CompetitorId> {
    match token {
        "w" | "white" => Some(white.id),
        "b" | "blue" => Some(blue.id),
        _ => None,
    }
}

fn parse_score(token: &str) -> Option<ScoreValue> {
    match token {
        "ippon" => Some(ScoreValue::Ippon),
        "waza-ari" | "waza_ari" => Some(ScoreValue::WazaAri),
        "yuko" => Some(ScoreValue::Yuko),
        "none" => Some(ScoreValue::None),
        _ => None,
    }
}

fn parse_penalty(token: &str) -> Option<PenaltyKind> {
    match token {
        "shido" => Some(PenaltyKind::Shido),
        "hansoku-make" | "hansoku_make" | "hansokumake" => Some(PenaltyKind::HansokuMake),
        _ => None,
    }
}

fn parse_category(token: &str) -> Option<Category> {
    Category::all().into_iter().find(|c| {
        c.code().eq_ignore_ascii_case(token)
            || c.label().eq_ignore_ascii_case(&token.replace('_', " "))
    })
}

/// Parse "tech[:mod],tech[:mod]..." where a mod is a score name, a hold
/// duration in seconds, or "miss"
fn parse_combo(spec: &str) -> Option<Vec<SubAction>> {
    let mut sub_actions = Vec::new();
    for item in spec.split(',').filter(|s| !s.is_empty()) {
        let mut parts = item.split(':');
        let technique = parts.next()?.to_string();
        let mut sub = SubAction {
            technique,
            effective: true,
            score: None,
            hold_seconds: None,
        };
        for modifier in parts {
            if modifier == "miss" {
                sub.effective = false;
            } else if let Ok(hold) = modifier.parse::<u32>() {
                sub.hold_seconds = Some(hold);
            } else {
                sub.score = Some(parse_score(modifier)?);
            }
        }
        sub_actions.push(sub);
    }
    Some(sub_actions)
}

fn report(receipt: RecordReceipt, white: &Competitor, blue: &Competitor) {
    println!("Recorded (action {}).", receipt.action_id);
    if let Some(finalization) = receipt.finished {
        print_finalization(finalization, white, blue);
    }
}

fn print_finalization(finalization: Finalization, white: &Competitor, blue: &Competitor) {
    let name = if finalization.winner == white.id {
        &white.name
    } else {
        &blue.name
    };
    println!("Sore-made! {} wins by {}.", name, finalization.reason);
}

fn print_side(name: &str, tally: &ScoreTally) {
    println!(
        "  {:<16} ippon {}  waza-ari {}  yuko {}  shido {}  ({} pts)",
        name,
        tally.ippon,
        tally.waza_ari,
        tally.yuko,
        tally.penalties,
        tally.total_points()
    );
}

fn print_status(bout: &Bout) {
    println!(
        "Match {} | state: {} | clock: {}{}",
        bout.id(),
        bout.state(),
        format_clock(bout.clock().remaining()),
        if bout.clock().is_running() {
            " (running)"
        } else {
            " (stopped)"
        }
    );
    if let Ok(tally) = bout.tally() {
        print_side(&bout.white().name, &tally.white);
        print_side(&bout.blue().name, &tally.blue);
    }
    if bout.state() == BoutState::Finished {
        if let (Some(winner), Some(reason)) = (bout.winner(), bout.finalization_reason()) {
            let name = bout.competitor_name(winner).unwrap_or("unknown");
            println!("  Winner: {name} by {reason}");
        }
    } else if bout.state() == BoutState::Active && bout.clock().is_expired() {
        println!("  Time expired on level scores; finalize with an explicit winner.");
    }
    println!("  {} action(s) in the ledger.", bout.ledger().len());
}
