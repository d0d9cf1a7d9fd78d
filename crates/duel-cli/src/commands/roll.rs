use colored::Colorize;
use duel_core::dice::{MAX_COUNT, MAX_SIDES};
use duel_core::{DiceRoller, DiceSpec};

pub fn run(notation: &str, seed: u64) -> Result<(), String> {
    let spec = DiceSpec::parse(notation).ok_or_else(|| {
        format!(
            "invalid dice '{notation}', expected NdM such as 3d6 \
             (at most {MAX_COUNT} dice of {MAX_SIDES} sides)"
        )
    })?;

    let mut dice = DiceRoller::seeded(seed);
    let faces = dice.roll_each(spec.die, spec.count);
    let total: u64 = faces.iter().copied().map(u64::from).sum();
    let faces = faces
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "  {} {} = {}",
        spec.to_string().bold(),
        format!("[{faces}]").dimmed(),
        total.to_string().bold()
    );
    Ok(())
}
