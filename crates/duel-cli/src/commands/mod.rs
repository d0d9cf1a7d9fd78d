pub mod character;
pub mod roll;
pub mod simulate;
pub mod spells;

use std::path::Path;

use colored::Colorize;
use duel_core::{BattleEvent, Combatant, PerSide, Side, Spellbook};

/// Load a spellbook from a JSON file, or the built-in one when no path is given.
fn load_spellbook(path: Option<&Path>) -> Result<Spellbook, String> {
    let Some(path) = path else {
        return Ok(Spellbook::standard());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Spellbook::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

/// One line of text for a presented phase.
fn describe_event(event: &BattleEvent, book: &Spellbook, names: &PerSide<String>) -> String {
    let name = |side: Side| names.get(side).as_str();
    let spell_name = |id| book.get(id).map_or("?", |s| s.name.as_str());

    match event {
        BattleEvent::TurnChanged { side, round } => {
            format!("{} round {round}: {}'s turn", "--".dimmed(), name(*side))
                .bold()
                .to_string()
        }
        BattleEvent::ActionAnnounced { side, spell } => {
            format!("{} casts {}", name(*side), spell_name(*spell).cyan())
        }
        BattleEvent::RollRevealed {
            value,
            modifier,
            total,
            is_critical,
        } => {
            let crit = if *is_critical {
                " CRITICAL".yellow().bold().to_string()
            } else {
                String::new()
            };
            format!("  rolled {value} ({modifier:+}) = {total}{crit}")
        }
        BattleEvent::HitResolved { success, threshold } => {
            let against = threshold.map_or_else(String::new, |t| format!(" against {t}"));
            if *success {
                format!("  hit{against}").green().to_string()
            } else {
                format!("  miss{against}").dimmed().to_string()
            }
        }
        BattleEvent::AmountRolled {
            dice,
            subtotal,
            total,
            critical,
        } => {
            let doubled = if *critical { " doubled" } else { "" };
            format!("  {dice} came to {subtotal}{doubled}, total {total}")
        }
        BattleEvent::DamageApplied { target, amount } => {
            format!("  {} takes {amount} damage", name(*target))
                .red()
                .to_string()
        }
        BattleEvent::HealApplied { target, amount } => {
            format!("  {} heals {amount} HP", name(*target))
                .green()
                .to_string()
        }
        BattleEvent::StatusChanged {
            target,
            kind,
            enabled,
        } => {
            let verb = if *enabled { "gains" } else { "loses" };
            format!("  {} {verb} {kind}", name(*target))
                .yellow()
                .to_string()
        }
        BattleEvent::ActionPointsChanged { side, current } => {
            format!("  {} has {current} AP", name(*side)).dimmed().to_string()
        }
        BattleEvent::CooldownTicked {
            side,
            spell,
            remaining,
        } => format!(
            "  {}'s {} cools to {remaining}",
            name(*side),
            spell_name(*spell)
        )
        .dimmed()
        .to_string(),
        BattleEvent::TurnSkipped { side } => {
            format!("{} is stunned and loses the turn", name(*side))
                .yellow()
                .bold()
                .to_string()
        }
        BattleEvent::ResolutionComplete { .. } => String::new(),
        BattleEvent::PolicyDegraded {
            side,
            rejected_draws,
        } => format!(
            "  {} hesitates after {rejected_draws} rejected picks",
            name(*side)
        )
        .yellow()
        .to_string(),
        BattleEvent::CombatantsRerolled => "combatants rerolled".bold().to_string(),
        BattleEvent::MatchEnded { winner } => {
            format!("{} wins", name(*winner)).bold().underline().to_string()
        }
    }
}

/// An HP bar in the style `[#####-----]  27/54`.
fn hp_bar(combatant: &Combatant) -> String {
    let fraction = combatant.hp_fraction();
    let filled = (fraction * 10.0).round() as usize;
    let empty = 10_usize.saturating_sub(filled);
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));
    let bar = if fraction <= 0.25 {
        bar.red()
    } else if fraction <= 0.5 {
        bar.yellow()
    } else {
        bar.green()
    };
    format!(
        "[{bar}] {:>3}/{}",
        combatant.current_hp, combatant.max_hp
    )
}
