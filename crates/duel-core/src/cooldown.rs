//! Per-spell cooldown counters.
//!
//! Each side owns one tracker. It is ticked once at the start of each of
//! that side's turns, so a cooldown of `n` keeps a spell out of the next
//! `n - 1` turns after the one it was cast in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::spell::{SpellId, Spellbook};

/// The cooldown state of one spell.
///
/// `remaining == 0` exactly when `on_cooldown` is false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownEntry {
    /// Whether the spell is unavailable.
    pub on_cooldown: bool,
    /// Turns left until it is available.
    pub remaining: u32,
}

/// Cooldown entries for every spell in a spellbook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownTracker {
    entries: BTreeMap<SpellId, CooldownEntry>,
}

impl CooldownTracker {
    /// One idle entry per spell in the book.
    pub fn for_spellbook(book: &Spellbook) -> Self {
        Self {
            entries: book
                .spells()
                .iter()
                .map(|s| (s.id, CooldownEntry::default()))
                .collect(),
        }
    }

    /// Put a spell on cooldown for `total` turns. A total of 0 leaves it usable.
    pub fn start_cooldown(&mut self, id: SpellId, total: u32) {
        self.entries.insert(
            id,
            CooldownEntry {
                on_cooldown: total > 0,
                remaining: total,
            },
        );
    }

    /// Count one turn off a spell's cooldown. Returns the new remaining count
    /// if the spell was cooling down.
    pub fn tick(&mut self, id: SpellId) -> Option<u32> {
        let entry = self.entries.get_mut(&id)?;
        if !entry.on_cooldown {
            return None;
        }
        entry.remaining = entry.remaining.saturating_sub(1);
        if entry.remaining == 0 {
            entry.on_cooldown = false;
        }
        Some(entry.remaining)
    }

    /// Tick every spell. Returns the spells that were cooling down with
    /// their new remaining counts.
    pub fn tick_all(&mut self) -> Vec<(SpellId, u32)> {
        let ids: Vec<SpellId> = self.entries.keys().copied().collect();
        ids.into_iter()
            .filter_map(|id| self.tick(id).map(|remaining| (id, remaining)))
            .collect()
    }

    /// Whether the spell is unavailable.
    pub fn is_on_cooldown(&self, id: SpellId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.on_cooldown)
    }

    /// Turns left; 0 when available or unknown.
    pub fn remaining(&self, id: SpellId) -> u32 {
        self.entries.get(&id).map_or(0, |e| e.remaining)
    }

    /// The entry for a spell.
    pub fn entry(&self, id: SpellId) -> Option<CooldownEntry> {
        self.entries.get(&id).copied()
    }

    /// All entries, ordered by spell id.
    pub fn entries(&self) -> impl Iterator<Item = (SpellId, CooldownEntry)> + '_ {
        self.entries.iter().map(|(id, e)| (*id, *e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let tracker = CooldownTracker::for_spellbook(&Spellbook::standard());
        assert_eq!(tracker.entries().count(), 9);
        assert!(tracker.entries().all(|(_, e)| !e.on_cooldown && e.remaining == 0));
    }

    #[test]
    fn counts_down_and_clears() {
        let mut tracker = CooldownTracker::default();
        let id = SpellId(3);
        tracker.start_cooldown(id, 2);
        assert!(tracker.is_on_cooldown(id));
        assert_eq!(tracker.tick(id), Some(1));
        assert!(tracker.is_on_cooldown(id));
        assert_eq!(tracker.tick(id), Some(0));
        assert!(!tracker.is_on_cooldown(id));
        assert_eq!(tracker.tick(id), None);
        assert_eq!(tracker.remaining(id), 0);
    }

    #[test]
    fn zero_total_stays_available() {
        let mut tracker = CooldownTracker::default();
        tracker.start_cooldown(SpellId(1), 0);
        assert_eq!(
            tracker.entry(SpellId(1)),
            Some(CooldownEntry {
                on_cooldown: false,
                remaining: 0
            })
        );
    }

    #[test]
    fn tick_all_reports_only_cooling_spells() {
        let mut tracker = CooldownTracker::for_spellbook(&Spellbook::standard());
        tracker.start_cooldown(SpellId(7), 2);
        tracker.start_cooldown(SpellId(0), 1);
        let ticked = tracker.tick_all();
        assert_eq!(ticked, vec![(SpellId(0), 0), (SpellId(7), 1)]);
    }

    #[test]
    fn unknown_spell_is_available() {
        let tracker = CooldownTracker::default();
        assert!(!tracker.is_on_cooldown(SpellId(99)));
        assert_eq!(tracker.entry(SpellId(99)), None);
    }
}
