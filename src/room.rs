//! Room definitions.
//!
//! Every location is a `Room` with a fixed array of eight directional exit
//! slots. An occupied slot holds an [`Edge`]: the destination plus the time
//! states during which it can be crossed (tide-gated paths). Rooms also track
//! the items and characters currently present, whether the player has ever
//! entered, and any room-authored special commands.

use crate::command::Command;
use crate::direction::Direction;
use crate::timecycle::TimeState;

/// A directional, possibly time-gated connection to another room.
#[derive(Debug, Clone)]
pub struct Edge {
    pub to: String,
    /// Time state names during which the edge is open. Empty means always.
    pub access_times: Vec<String>,
    /// Optional room-authored override for the "can't go that way" text.
    pub barred_message: Option<String>,
}

impl Edge {
    /// An always-open edge to the named room.
    pub fn new(to: &str) -> Self {
        Self {
            to: to.to_string(),
            access_times: Vec::new(),
            barred_message: None,
        }
    }

    /// An edge open only during the named time states.
    pub fn gated(to: &str, access_times: &[&str]) -> Self {
        Self {
            to: to.to_string(),
            access_times: access_times.iter().map(ToString::to_string).collect(),
            barred_message: None,
        }
    }

    pub fn set_barred_msg(&mut self, msg: Option<String>) {
        self.barred_message = msg;
    }

    /// True if the edge can be crossed during `time`.
    pub fn open_at(&self, time: &TimeState) -> bool {
        self.access_times.is_empty() || self.access_times.iter().any(|n| *n == time.name)
    }
}

/// Authored description variants for a room.
#[derive(Debug, Clone, Default)]
pub struct RoomText {
    /// Shown the very first time the player enters.
    pub on_first_enter: String,
    /// Shown on later entries.
    pub on_enter: String,
    /// Shown when the player looks around.
    pub on_look: String,
    /// Short orientation line used as the idle prompt preamble.
    pub on_stay: String,
}

impl RoomText {
    pub fn new(on_first_enter: &str, on_enter: &str, on_look: &str, on_stay: &str) -> Self {
        Self {
            on_first_enter: on_first_enter.to_string(),
            on_enter: on_enter.to_string(),
            on_look: on_look.to_string(),
            on_stay: on_stay.to_string(),
        }
    }
}

/// Any visitable location in the game world.
#[derive(Debug)]
pub struct Room {
    pub name: String,
    pub exits: [Option<Edge>; 8],
    /// Items currently on the ground here, in placement order.
    pub items: Vec<String>,
    /// Characters currently present.
    pub npcs: Vec<String>,
    pub visited: bool,
    pub text: RoomText,
    /// Room-authored actions beyond the standard verbs, e.g. opening a crate.
    pub special_commands: Vec<Command>,
}

impl Room {
    pub fn new(name: &str, text: RoomText) -> Self {
        Self {
            name: name.to_string(),
            exits: std::array::from_fn(|_| None),
            items: Vec::new(),
            npcs: Vec::new(),
            visited: false,
            text,
            special_commands: Vec::new(),
        }
    }

    pub fn exit(&self, dir: Direction) -> Option<&Edge> {
        self.exits[dir.slot()].as_ref()
    }

    pub fn set_exit(&mut self, dir: Direction, edge: Option<Edge>) {
        self.exits[dir.slot()] = edge;
    }

    /// Directions with an exit open at `time`.
    pub fn open_directions(&self, time: &TimeState) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| self.exit(*dir).is_some_and(|edge| edge.open_at(time)))
            .collect()
    }

    pub fn add_item(&mut self, item: &str) {
        if !self.items.iter().any(|i| i == item) {
            self.items.push(item.to_string());
        }
    }

    pub fn remove_item(&mut self, item: &str) {
        self.items.retain(|i| i != item);
    }

    pub fn contains_item(&self, item: &str) -> bool {
        self.items.iter().any(|i| i == item)
    }

    pub fn add_npc(&mut self, npc: &str) {
        if !self.npcs.iter().any(|n| n == npc) {
            self.npcs.push(npc.to_string());
        }
    }

    /// The entry description for the player's current visit history.
    pub fn enter_text(&self) -> &str {
        if self.visited { &self.text.on_enter } else { &self.text.on_first_enter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecycle::island_cycle;

    fn test_room(name: &str) -> Room {
        Room::new(name, RoomText::new("first", "again", "look", "stay"))
    }

    #[test]
    fn ungated_edge_is_always_open() {
        let edge = Edge::new("Cove");
        let cycle = island_cycle();
        assert!(edge.open_at(cycle.current()));
    }

    #[test]
    fn gated_edge_only_opens_in_its_window() {
        let edge = Edge::gated("Hermit Cave", &["Evening"]);
        let mut cycle = island_cycle();
        assert!(!edge.open_at(cycle.current())); // Afternoon
        cycle.advance(); // Evening
        assert!(edge.open_at(cycle.current()));
        cycle.advance(); // Sunset
        assert!(!edge.open_at(cycle.current()));
    }

    #[test]
    fn open_directions_respects_gating() {
        let mut room = test_room("Shipwreck");
        room.set_exit(Direction::East, Some(Edge::new("Field")));
        room.set_exit(Direction::West, Some(Edge::gated("Western Coast", &["Evening"])));
        let cycle = island_cycle();
        assert_eq!(room.open_directions(cycle.current()), vec![Direction::East]);
    }

    #[test]
    fn item_list_stays_unique() {
        let mut room = test_room("Field");
        room.add_item("Coconut");
        room.add_item("Coconut");
        assert_eq!(room.items.len(), 1);
        room.remove_item("Coconut");
        assert!(!room.contains_item("Coconut"));
    }

    #[test]
    fn enter_text_tracks_visits() {
        let mut room = test_room("Cove");
        assert_eq!(room.enter_text(), "first");
        room.visited = true;
        assert_eq!(room.enter_text(), "again");
    }
}
