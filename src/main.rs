//! Stellar Dominion - headless turn runner
//!
//! Builds a small sample galaxy and runs turns through the orchestrator,
//! printing a per-turn summary or the raw `TurnResult` as JSON.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use stellar_dominion::core::types::{FactionId, Position, SystemId};
use stellar_dominion::core::{GameRules, SeededRandom};
use stellar_dominion::galaxy::{FactionKind, FleetStance, GameState, ResourceLedger, ShipDesign, StateChange};
use stellar_dominion::turn::{AiProcessor, CollaboratorResult, Collaborators, EconomyProcessor, GameRegistry, GameSession};

/// Headless turn runner for a sample galaxy
#[derive(Parser, Debug)]
#[command(name = "stellar-dominion")]
#[command(about = "Run simulation turns on a sample galaxy")]
struct Args {
    /// Number of turns to run
    #[arg(long, default_value_t = 25)]
    turns: u32,

    /// Random seed for combat and crisis rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Rules file (TOML); defaults apply when omitted
    #[arg(long)]
    rules: Option<String>,

    /// Print each TurnResult as JSON
    #[arg(long)]
    json: bool,
}

/// Every colony yields credits and food in proportion to its population
struct ColonyIncome;

impl EconomyProcessor for ColonyIncome {
    fn process_economy_turn(&mut self, state: &GameState) -> CollaboratorResult {
        Ok(state
            .colonies
            .iter()
            .map(|colony| StateChange::Resources {
                faction: colony.owner,
                delta: ResourceLedger {
                    credits: colony.population * 2.0,
                    energy: colony.population,
                    food: colony.population * 0.5,
                    research: 0.0,
                },
            })
            .collect())
    }

    fn process_trade_routes(&mut self, _state: &GameState) -> CollaboratorResult {
        Ok(Vec::new())
    }
}

/// Sends idle fleets toward the nearest system the faction does not control
struct Expansionist;

impl AiProcessor for Expansionist {
    fn process_ai_turn(&mut self, state: &GameState, faction: FactionId) -> CollaboratorResult {
        let mut orders = Vec::new();
        for fleet in state.fleets_of(faction).filter(|f| !f.is_en_route() && !f.is_empty()) {
            let Some(here) = state.get_system(fleet.location) else {
                continue;
            };
            let target = here
                .hyperlanes
                .iter()
                .filter_map(|&id| state.get_system(id))
                .filter(|s| s.controller != Some(faction))
                .min_by(|a, b| here.position.distance(&a.position).total_cmp(&here.position.distance(&b.position)))
                .map(|s| s.id);
            if let Some(destination) = target {
                orders.push(StateChange::FleetOrdered {
                    fleet: fleet.id,
                    destination: Some(destination),
                });
            }
        }
        Ok(orders)
    }
}

fn sample_galaxy() -> GameState {
    let mut state = GameState::new();

    let accord = state.add_faction("Terran Accord", FactionKind::Player);
    let hegemony = state.add_faction("Vask Hegemony", FactionKind::Ai);
    let league = state.add_faction("Free League", FactionKind::Ai);

    let names = ["Sol", "Vega", "Altair", "Deneb", "Rigel", "Procyon"];
    let systems: Vec<SystemId> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let angle = i as f32 / names.len() as f32 * std::f32::consts::TAU;
            state.add_system(*name, Position::new(angle.cos() * 10.0, angle.sin() * 10.0))
        })
        .collect();
    for i in 0..systems.len() {
        state.connect(systems[i], systems[(i + 1) % systems.len()]);
    }
    if let Some(altair) = state.get_system_mut(systems[2]) {
        altair.industry = 4;
    }

    state.add_colony(systems[0], accord, 12.0);
    state.add_colony(systems[2], hegemony, 9.0);
    state.add_colony(systems[4], league, 7.0);

    state.commission_fleet(
        accord,
        systems[0],
        "Home Fleet",
        &[ShipDesign::cruiser(), ShipDesign::destroyer(), ShipDesign::destroyer()],
        FleetStance::Defensive,
    );
    state.commission_fleet(
        hegemony,
        systems[2],
        "Vask Strike Group",
        &[ShipDesign::destroyer(), ShipDesign::destroyer(), ShipDesign::corvette()],
        FleetStance::Aggressive,
    );
    state.commission_fleet(
        league,
        systems[4],
        "League Patrol",
        &[ShipDesign::corvette(), ShipDesign::corvette()],
        FleetStance::Evasive,
    );

    state.relations.set_war(accord, hegemony, true);
    state.relations.set_war(hegemony, league, true);
    state
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stellar_dominion=info")),
        )
        .init();

    let rules = match &args.rules {
        Some(path) => GameRules::load(path)?,
        None => GameRules::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, turns = args.turns, "Starting sample galaxy");

    let collaborators = Collaborators::default()
        .with_economy(ColonyIncome)
        .with_ai(Expansionist);
    let session = GameSession::new(sample_galaxy(), rules)
        .with_rng(SeededRandom::new(seed))
        .with_collaborators(collaborators);

    let mut registry = GameRegistry::new();
    let game_id = registry.insert(session);

    for _ in 0..args.turns {
        let result = registry.process_turn(game_id)?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "Turn {:>3}: {} arrival(s), {} battle(s), {} event(s)",
                result.previous_turn,
                result.arrivals.len(),
                result.combats.len(),
                result.events.len()
            );
            for combat in &result.combats {
                println!(
                    "          system {:?}: {} round(s), winner {:?}{}",
                    combat.system,
                    combat.rounds_fought(),
                    combat.winning_faction(),
                    if combat.was_retreat { " (retreat)" } else { "" }
                );
            }
        }

        if let Some(winner) = &result.winner {
            println!("{} wins by {:?} on turn {}", winner.name, winner.victory_type, winner.turn);
            break;
        }
    }

    if !args.json {
        if let Some(session) = registry.get(game_id) {
            for faction in session.state.factions.iter().filter(|f| !f.is_crisis()) {
                if let Some(summary) = session.turn_summary(faction.id) {
                    println!(
                        "{:<16} credits {:>+8.1}  wars {}  allies {}  {}",
                        faction.name,
                        summary.credits_delta,
                        summary.wars,
                        summary.allies,
                        if faction.defeated { "defeated" } else { "" }
                    );
                }
            }
        }
    }

    Ok(())
}
