//! Ambition Realm - Entry Point
//!
//! Starts a session from an ambition, then either auto-plays a number of
//! turns or runs an interactive loop on stdin.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use ambition_realm::core::error::Result;
use ambition_realm::core::types::{Domain, LegitimacyAxis, ResourceKind};
use ambition_realm::goals::NodeStatus;
use ambition_realm::rules::KnowledgeBase;
use ambition_realm::session::{GameSession, SessionSnapshot, TurnReport};
use ambition_realm::SimulationConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Ambition Realm - a political simulation shaped by what you want
#[derive(Parser, Debug)]
#[command(name = "ambition-realm")]
#[command(about = "Describe your ambition and rule a realm that bends toward it")]
struct Args {
    /// Free-text ambition; prompted for when omitted
    #[arg(long, short = 'a')]
    ambition: Option<String>,

    /// Seed for a replayable run; derived from the ambition text when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Rule base TOML
    #[arg(long, default_value = "data/rules.toml")]
    rules: PathBuf,

    /// Optional TOML overriding simulation constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Auto-play this many turns choosing the top proposal, then exit
    #[arg(long)]
    turns: Option<u32>,

    /// Write a JSON snapshot here on exit
    #[arg(long)]
    save: Option<PathBuf>,

    /// Resume from a JSON snapshot instead of starting fresh
    #[arg(long, conflicts_with = "ambition")]
    load: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ambition_realm=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let kb = if args.rules.exists() {
        KnowledgeBase::load(&args.rules)?
    } else {
        tracing::warn!(path = %args.rules.display(), "rule base not found, using fallback actions only");
        KnowledgeBase::default()
    };
    let kb = Arc::new(kb);

    let mut session = match &args.load {
        Some(path) => GameSession::restore(SessionSnapshot::load(path)?, kb)?,
        None => {
            let text = match &args.ambition {
                Some(text) => text.clone(),
                None => prompt("What is your ambition?\n> ")?,
            };
            GameSession::start(&text, args.seed, kb, config)
        }
    };

    println!("\n=== AMBITION REALM ===");
    print_profile(&session);
    print_status(&session);
    print_proposals(&session);

    match args.turns {
        Some(turns) => auto_play(&mut session, turns)?,
        None => interactive(&mut session)?,
    }

    if let Some(path) = &args.save {
        session.snapshot().save(path)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn auto_play(session: &mut GameSession, turns: u32) -> Result<()> {
    for _ in 0..turns {
        let choice = session.proposals().first().map(|p| p.id.clone());
        let report = session.advance(choice.as_deref())?;
        print_report(&report);
    }
    print_status(session);
    print_goals(session);
    Ok(())
}

fn interactive(session: &mut GameSession) -> Result<()> {
    print_help();
    loop {
        let input = prompt(&format!("[tick {}] > ", session.tick()))?;
        let mut words = input.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };

        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "status" | "s" => print_status(session),
            "goals" | "g" => print_goals(session),
            "profile" | "p" => print_profile(session),
            "events" | "e" => print_events(session),
            "wait" | "w" => match session.advance(None) {
                Ok(report) => print_report(&report),
                Err(e) => println!("{}", e),
            },
            "event" => {
                let (Some(card), Some(choice)) = (words.next(), words.next()) else {
                    println!("Usage: event <card> <choice>");
                    continue;
                };
                match session.resolve_event(card, choice) {
                    Ok(resolution) => {
                        println!("Resolved {} with {}.", resolution.card_id, resolution.choice_id);
                        for dream in &resolution.dreams {
                            println!("  You dream of {} ({:.2})", dream.domain, dream.threshold);
                        }
                        print_proposals(session);
                    }
                    Err(e) => println!("{}", e),
                }
            }
            "save" => {
                let Some(path) = words.next() else {
                    println!("Usage: save <path>");
                    continue;
                };
                match session.snapshot().save(path.as_ref()) {
                    Ok(()) => println!("Saved to {}", path),
                    Err(e) => println!("{}", e),
                }
            }
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 && n <= session.proposals().len() => {
                    let id = session.proposals()[n - 1].id.clone();
                    match session.advance(Some(&id)) {
                        Ok(report) => print_report(&report),
                        Err(e) => println!("{}", e),
                    }
                }
                _ => println!("Unknown command. Type 'help' for a list."),
            },
        }
    }

    println!("\nFarewell. Your reign lasted {} turns.", session.tick());
    Ok(())
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  <n>                    - Take proposal n");
    println!("  wait / w               - Let a turn pass");
    println!("  status / s             - Show the realm");
    println!("  goals / g              - Show your goals");
    println!("  profile / p            - Show your ambition");
    println!("  events / e             - Show pending events");
    println!("  event <card> <choice>  - Answer a pending event");
    println!("  save <path>            - Write a snapshot");
    println!("  quit / q               - Exit");
    println!();
}

fn print_profile(session: &GameSession) {
    let profile = session.profile();
    println!("\nAmbition (generation {}):", profile.generation);
    for domain in Domain::ALL {
        let weight = profile.weight(domain);
        println!("  {:<9} {:>5.1}% {}", domain, weight * 100.0, "#".repeat((weight * 40.0) as usize));
    }
}

fn print_status(session: &GameSession) {
    let world = session.world();
    println!("\n--- Tick {} ---", world.tick);
    let stocks: Vec<String> = ResourceKind::ALL
        .iter()
        .map(|&k| format!("{} {:.0}", k, world.resources.get(k)))
        .collect();
    println!("Resources: {}", stocks.join(", "));
    let axes: Vec<String> = LegitimacyAxis::ALL
        .iter()
        .map(|&a| format!("{} {:.0}", a, world.legitimacy.get(a)))
        .collect();
    println!("Legitimacy: {}", axes.join(", "));
    println!(
        "Realm: loyalty {:.0}, unrest {:.0}, soldiers {:.0}",
        world.realm.loyalty, world.realm.unrest, world.forces.soldiers
    );
    for region in &world.regions {
        let p = &region.pressures;
        println!(
            "  {}{:<14} law {:>3.0} unrest {:>3.0} piety {:>3.0} heresy {:>3.0}",
            if region.controlled { "*" } else { " " },
            region.name,
            p.lawfulness,
            p.unrest,
            p.piety,
            p.heresy
        );
    }
    for faction in &world.factions {
        println!("  {:<20} {:<8} power {:.0}", faction.name, faction.stance.as_str(), faction.power);
    }
    if !world.traits.is_empty() {
        let traits: Vec<&str> = world.traits.iter().map(String::as_str).collect();
        println!("Conditions: {}", traits.join(", "));
    }
}

fn print_goals(session: &GameSession) {
    let graph = session.graph();
    println!("\nGoals ({}/{} met):", graph.met_count(), graph.len());
    for node in graph.nodes() {
        let mark = match node.status {
            NodeStatus::Met => "x",
            _ if graph.is_ready(node) => ">",
            _ => " ",
        };
        println!("  [{}] {} (tier {})", mark, node.label, node.tier);
    }
}

fn print_proposals(session: &GameSession) {
    println!("\nYou could:");
    for (i, p) in session.proposals().iter().enumerate() {
        println!("  {}. {} [{}] score {:.2}", i + 1, p.label, p.id, p.score);
    }
}

fn print_events(session: &GameSession) {
    if session.pending_events().is_empty() {
        println!("No pending events.");
    }
    for card in session.pending_events() {
        println!("\n** {} ** ({})", card.title, card.id);
        println!("   {}", card.text);
        for choice in &card.choices {
            println!("   - {}: {}", choice.id, choice.label);
        }
    }
}

fn print_report(report: &TurnReport) {
    println!("\n=== Turn {} ===", report.tick);
    if let Some(chosen) = &report.chosen {
        println!("You chose {}.", chosen);
    }
    for risk in &report.fired_risks {
        println!("  Misfortune: {} ({})", risk.kind, risk.action_id);
    }
    for action in &report.faction_actions {
        println!("  {}", action.summary);
    }
    for dream in &report.dreams {
        println!("  You dream of {} ({:.2}).", dream.domain, dream.threshold);
    }
    for goal in &report.new_goals {
        println!("  New goal: {}", goal);
    }
    for card in &report.events {
        println!("\n** {} ** ({})", card.title, card.id);
        println!("   {}", card.text);
        for choice in &card.choices {
            println!("   - {}: {}", choice.id, choice.label);
        }
    }
    println!("\nYou could:");
    for (i, p) in report.proposals.iter().enumerate() {
        println!("  {}. {} [{}]", i + 1, p.label, p.id);
    }
}
