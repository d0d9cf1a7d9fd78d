use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use duel_core::{CareerStats, MatchConfig, MatchSession, Side};

pub struct SimulateArgs {
    pub matches: u32,
    pub seed: u64,
    pub rounds: u32,
    pub log: bool,
    pub json: bool,
    pub spellbook: Option<PathBuf>,
}

struct MatchRow {
    seed: u64,
    winner: Option<Side>,
    rounds: u32,
    player_hp: String,
    enemy_hp: String,
    dealt: u64,
    taken: u64,
    healed: u64,
}

pub fn run(args: &SimulateArgs) -> Result<(), String> {
    if args.matches == 0 {
        return Err("--matches must be at least 1".into());
    }
    let book = Arc::new(super::load_spellbook(args.spellbook.as_deref())?);
    let career = Arc::new(Mutex::new(CareerStats::default()));

    let mut rows = Vec::with_capacity(args.matches as usize);
    for i in 0..args.matches {
        let seed = args.seed.wrapping_add(u64::from(i));
        let config = MatchConfig::default().with_seed(seed).ai_vs_ai();
        let mut session = MatchSession::new(config, Arc::clone(&book));
        session.add_stats_sink(Arc::clone(&career));

        if args.log {
            println!(
                "  {} {}",
                format!("Match {}", i + 1).bold().underline(),
                format!("(seed={seed})").dimmed()
            );
            println!("  {}", session.combatant(Side::Player));
            println!("  {}", session.combatant(Side::Enemy));
            println!();
        }

        let mut last = Instant::now();
        while session.round() <= args.rounds {
            let now = Instant::now();
            session.elapse(now.duration_since(last));
            last = now;
            if session.advance().is_none() {
                break;
            }
        }

        if args.log {
            let names = &session.config().names;
            for record in session.log().events() {
                let line = super::describe_event(&record.event, &book, names);
                if !line.is_empty() {
                    println!("  {} {line}", format!("[{:>3}]", record.seq).dimmed());
                }
            }
            if session.winner().is_none() {
                println!("  {}", "(undecided)".dimmed());
            }
            println!();
        }

        let stats = session.stats();
        rows.push(MatchRow {
            seed,
            winner: session.winner(),
            rounds: session.round(),
            player_hp: super::hp_bar(session.combatant(Side::Player)),
            enemy_hp: super::hp_bar(session.combatant(Side::Enemy)),
            dealt: stats.damage_dealt,
            taken: stats.damage_taken,
            healed: stats.damage_healed,
        });
    }

    let career = career
        .lock()
        .map_err(|_| "career stats lock poisoned".to_string())?
        .clone();

    if args.json {
        let json = serde_json::to_string_pretty(&career)
            .map_err(|e| format!("cannot serialize career stats: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    println!(
        "  {} {}",
        "Simulation".bold(),
        format!(
            "({} matches, seed={}, max {} rounds)",
            args.matches, args.seed, args.rounds
        )
        .dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Seed", "Winner", "Rounds", "Player", "Enemy", "Dealt", "Taken", "Healed",
    ]);
    for row in &rows {
        let winner = match row.winner {
            Some(Side::Player) => "player".green().bold().to_string(),
            Some(Side::Enemy) => "enemy".red().bold().to_string(),
            None => "undecided".dimmed().to_string(),
        };
        table.add_row(vec![
            row.seed.to_string(),
            winner,
            row.rounds.to_string(),
            row.player_hp.clone(),
            row.enemy_hp.clone(),
            row.dealt.to_string(),
            row.taken.to_string(),
            row.healed.to_string(),
        ]);
    }
    println!("{table}");
    println!();

    let undecided = rows.iter().filter(|r| r.winner.is_none()).count();
    println!("  {}", "Career".bold().underline());
    println!(
        "  {} wins, {} losses, ratio {:.2}",
        career.wins,
        career.losses,
        career.win_loss_ratio()
    );
    if undecided > 0 {
        println!("  {}", format!("{undecided} undecided").dimmed());
    }
    println!(
        "  dealt {}, taken {}, healed {}",
        career.lifetime_damage_dealt, career.lifetime_damage_taken, career.lifetime_damage_healed
    );
    if let Some(best) = career.best_time {
        println!("  fastest match {}", format!("{best:.3}s").dimmed());
    }

    Ok(())
}
