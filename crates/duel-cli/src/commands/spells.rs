use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use duel_core::{Spell, SpellEffect};

pub fn run(spellbook: Option<&Path>, json: bool) -> Result<(), String> {
    let book = super::load_spellbook(spellbook)?;

    if json {
        let out = book
            .to_json()
            .map_err(|e| format!("cannot serialize spellbook: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Id", "Name", "Category", "AP", "Cooldown", "Dice", "Modifier", "Effect",
    ]);

    for spell in book.spells() {
        let modifier = spell
            .modifier
            .map_or_else(|| "—".to_string(), |a| a.to_string());
        table.add_row(vec![
            spell.id.0.to_string(),
            spell.name.clone(),
            spell.category.to_string(),
            spell.effective_cost().to_string(),
            spell.cooldown.to_string(),
            spell.dice.to_string(),
            modifier,
            effect_label(spell),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} spells", book.len());

    Ok(())
}

fn effect_label(spell: &Spell) -> String {
    match spell.effect {
        SpellEffect::Damage { inflicts: None } => "damage".into(),
        SpellEffect::Damage {
            inflicts: Some(kind),
        } => format!("damage, {kind}"),
        SpellEffect::Heal => "heal".into(),
        SpellEffect::Grant { status } => format!("grants {status}"),
        SpellEffect::Recharge { amount } => format!("+{amount} AP"),
    }
}
