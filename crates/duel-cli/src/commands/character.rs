use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use duel_core::{Attribute, Combatant, MatchConfig, MatchSession, Side};

pub fn run(seed: u64, reroll: bool) -> Result<(), String> {
    let mut session = MatchSession::standard(MatchConfig::default().with_seed(seed));
    if reroll {
        session.request_reroll().map_err(|e| format!("reroll failed: {e}"))?;
    }
    let player = session.combatant(Side::Player);
    let enemy = session.combatant(Side::Enemy);

    println!(
        "  {} {}",
        "Combatants".bold(),
        format!("(seed={seed}{})", if reroll { ", rerolled" } else { "" }).dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", player.name.as_str(), enemy.name.as_str()]);

    for attribute in Attribute::ALL {
        table.add_row(vec![
            attribute.to_string(),
            score_cell(player, attribute),
            score_cell(enemy, attribute),
        ]);
    }
    table.add_row(vec!["AC".to_string(), armor_cell(player), armor_cell(enemy)]);
    table.add_row(vec![
        "HP".to_string(),
        player.max_hp.to_string(),
        enemy.max_hp.to_string(),
    ]);
    table.add_row(vec![
        "AP".to_string(),
        player.max_ap.to_string(),
        enemy.max_ap.to_string(),
    ]);

    println!("{table}");
    Ok(())
}

fn score_cell(combatant: &Combatant, attribute: Attribute) -> String {
    format!(
        "{:>2} ({:+})",
        combatant.attributes.score(attribute),
        combatant.attributes.modifier(attribute)
    )
}

fn armor_cell(combatant: &Combatant) -> String {
    let mut notes = Vec::new();
    if combatant.dex_added_to_armor {
        notes.push("dex");
    }
    if combatant.has_shield {
        notes.push("shield");
    }
    if notes.is_empty() {
        combatant.armor_class.to_string()
    } else {
        format!("{} ({})", combatant.armor_class, notes.join(", "))
    }
}
