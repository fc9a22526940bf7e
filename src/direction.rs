//! The eight compass directions a player can move in.

use std::fmt::Display;

/// Compass direction, doubling as a room exit slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// All directions, in slot order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Northeast,
        Direction::Northwest,
        Direction::Southeast,
        Direction::Southwest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::Northeast => "Northeast",
            Direction::Northwest => "Northwest",
            Direction::Southeast => "Southeast",
            Direction::Southwest => "Southwest",
        }
    }

    /// Input pattern for moving this way, e.g. `(go )?(ne|northeast)`.
    pub fn pattern(self) -> &'static str {
        match self {
            Direction::North => r"(go )?(n|north)",
            Direction::South => r"(go )?(s|south)",
            Direction::East => r"(go )?(e|east)",
            Direction::West => r"(go )?(w|west)",
            Direction::Northeast => r"(go )?(ne|northeast)",
            Direction::Northwest => r"(go )?(nw|northwest)",
            Direction::Southeast => r"(go )?(se|southeast)",
            Direction::Southwest => r"(go )?(sw|southwest)",
        }
    }

    /// The direction you'd arrive from when travelling this way.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Northeast => Direction::Southwest,
            Direction::Northwest => Direction::Southeast,
            Direction::Southeast => Direction::Northwest,
            Direction::Southwest => Direction::Northeast,
        }
    }

    /// Fixed slot index in a room's exit array.
    pub fn slot(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
            Direction::Northeast => 4,
            Direction::Northwest => 5,
            Direction::Southeast => 6,
            Direction::Southwest => 7,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_an_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.reverse().reverse(), dir);
        }
    }

    #[test]
    fn slots_are_distinct_and_in_range() {
        let mut seen = [false; 8];
        for dir in Direction::ALL {
            assert!(!seen[dir.slot()]);
            seen[dir.slot()] = true;
        }
    }

    #[test]
    fn patterns_accept_shorthand() {
        use crate::matcher::Matcher;
        let m = Matcher::compile(Direction::Northwest.pattern()).unwrap();
        assert!(m.is_match("nw"));
        assert!(m.is_match("go northwest"));
        assert!(!m.is_match("go n"));
    }
}
