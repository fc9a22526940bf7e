//! World time and tides.
//!
//! Time moves through a fixed, ordered sequence of named states, each with a
//! numeric tide level. The cycle never ends: advancing past the last state
//! wraps to the first. Certain graph edges are only open during configured
//! low- or high-tide windows, which are membership sets over state names
//! rather than anything derived from the raw tide numbers.

use log::info;

use anyhow::{Result, anyhow};

/// One named step of the world clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeState {
    pub name: String,
    /// How the time reads in-game, e.g. "3:00 PM".
    pub display: String,
    pub tide_level: i8,
}

impl TimeState {
    pub fn new(name: &str, display: &str, tide_level: i8) -> Self {
        Self {
            name: name.to_string(),
            display: display.to_string(),
            tide_level,
        }
    }
}

impl std::fmt::Display for TimeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.display)
    }
}

/// The repeating sequence of [`TimeState`]s and a cursor into it.
///
/// The cursor is a plain index incremented modulo the sequence length, so the
/// cycle is trivially restartable with [`TimeCycle::reset`].
#[derive(Debug, Clone)]
pub struct TimeCycle {
    states: Vec<TimeState>,
    cursor: usize,
    start: usize,
    low_tide: Vec<String>,
    high_tide: Vec<String>,
}

impl TimeCycle {
    /// Build a cycle from an ordered state list plus tide window configuration.
    ///
    /// # Errors
    /// Fails if `states` is empty or `start` names no state in the list; both
    /// are setup-time authoring errors.
    pub fn new(states: Vec<TimeState>, start: &str, low_tide: &[&str], high_tide: &[&str]) -> Result<Self> {
        let start_idx = states
            .iter()
            .position(|s| s.name == start)
            .ok_or_else(|| anyhow!("time cycle start state '{start}' is not in the sequence"))?;
        Ok(Self {
            states,
            cursor: start_idx,
            start: start_idx,
            low_tide: low_tide.iter().map(ToString::to_string).collect(),
            high_tide: high_tide.iter().map(ToString::to_string).collect(),
        })
    }

    /// The state at the cursor, without advancing.
    pub fn current(&self) -> &TimeState {
        &self.states[self.cursor]
    }

    /// Step the cursor forward one state, wrapping after the last.
    pub fn advance(&mut self) -> &TimeState {
        self.cursor = (self.cursor + 1) % self.states.len();
        let state = &self.states[self.cursor];
        info!("time advanced to {} (tide level {})", state.name, state.tide_level);
        state
    }

    /// Return the cursor to the configured start state.
    pub fn reset(&mut self) {
        self.cursor = self.start;
        info!("time cycle reset to {}", self.current().name);
    }

    pub fn is_low_tide(&self, state: &TimeState) -> bool {
        self.low_tide.iter().any(|n| *n == state.name)
    }

    pub fn is_high_tide(&self, state: &TimeState) -> bool {
        self.high_tide.iter().any(|n| *n == state.name)
    }

    /// Names of the low-tide window states.
    pub fn low_tide_states(&self) -> &[String] {
        &self.low_tide
    }

    /// Names of the high-tide window states.
    pub fn high_tide_states(&self) -> &[String] {
        &self.high_tide
    }
}

/// The island's day: eight 3-hour steps starting mid-afternoon.
///
/// Low tide falls in the evening and high tide at sunrise.
pub fn island_cycle() -> TimeCycle {
    let states = vec![
        TimeState::new("Afternoon", "3:00 PM", 3),
        TimeState::new("Evening", "6:00 PM", 4),
        TimeState::new("Sunset", "9:00 PM", 3),
        TimeState::new("Midnight", "12:00 AM", 2),
        TimeState::new("Night", "3:00 AM", 1),
        TimeState::new("Sunrise", "6:00 AM", 0),
        TimeState::new("Morning", "9:00 AM", 1),
        TimeState::new("Noon", "12:00 PM", 2),
    ];
    TimeCycle::new(states, "Afternoon", &["Evening"], &["Sunrise"]).expect("island cycle config is static")
}
