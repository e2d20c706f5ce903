//! Position ledger — app-facing state container, SDK-provided update logic.

use super::Position;
use crate::shared::PositionId;

/// Insertion-ordered collection of positions known to this client.
///
/// Append-only from the client's perspective: entries are added when a
/// trade fill is reconciled and are otherwise only ever replaced wholesale
/// by an authoritative backend update. There is no partial field patching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionLedger {
    entries: Vec<Position>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly opened position.
    pub fn add(&mut self, position: Position) {
        self.entries.push(position);
    }

    /// Replace the entry with the same id by an authoritative snapshot.
    ///
    /// Returns `false` (and stores nothing) when the id is unknown — an
    /// update for a position this client never opened is dropped rather
    /// than invented.
    pub fn replace(&mut self, position: Position) -> bool {
        match self.entries.iter_mut().find(|p| p.id == position.id) {
            Some(slot) => {
                *slot = position;
                true
            }
            None => false,
        }
    }

    /// All positions, in insertion order.
    pub fn all(&self) -> &[Position] {
        &self.entries
    }

    pub fn get(&self, id: &PositionId) -> Option<&Position> {
        self.entries.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::PositionStatus;
    use crate::shared::{Direction, Leverage};
    use rust_decimal::Decimal;

    fn make_position(id: &str, status: PositionStatus) -> Position {
        Position {
            id: PositionId::from(id),
            direction: Direction::Long,
            amount: Decimal::from(100),
            entry_price: Decimal::from(65_000),
            leverage: Leverage::X100,
            status,
        }
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut ledger = PositionLedger::new();
        ledger.add(make_position("a", PositionStatus::Active));
        ledger.add(make_position("b", PositionStatus::Active));
        ledger.add(make_position("c", PositionStatus::Active));
        let ids: Vec<_> = ledger.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_replace_swaps_full_entry_in_place() {
        let mut ledger = PositionLedger::new();
        ledger.add(make_position("a", PositionStatus::Active));
        ledger.add(make_position("b", PositionStatus::Active));

        let settled = make_position("a", PositionStatus::Closed);
        assert!(ledger.replace(settled.clone()));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(&PositionId::from("a")), Some(&settled));
        // Order untouched.
        assert_eq!(ledger.all()[0].id.as_str(), "a");
    }

    #[test]
    fn test_replace_unknown_id_is_dropped() {
        let mut ledger = PositionLedger::new();
        ledger.add(make_position("a", PositionStatus::Active));
        assert!(!ledger.replace(make_position("ghost", PositionStatus::Closed)));
        assert_eq!(ledger.len(), 1);
    }
}
