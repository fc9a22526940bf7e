//! Commands and their effects.
//!
//! A [`Command`] pairs a compiled input pattern with an [`Effect`]: a closed,
//! inspectable description of what the command does to the world. Effects
//! replace ad hoc callbacks so that every side effect can be examined and
//! exercised in isolation.
//!
//! [`CommandPool`] is the per-turn candidate list: ordered for match
//! precedence, keyed by command name so that a later registration with the
//! same identity replaces the earlier one in place.

use std::collections::HashMap;

use anyhow::Result;
use log::{info, warn};

use crate::direction::Direction;
use crate::matcher::Matcher;
use crate::view::View;
use crate::world::World;

/// What the turn loop should do after a command or dialogue step runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Read the next line as usual.
    Continue,
    /// Enter the conversation loop with the named character.
    Conversation(String),
    /// Enter the settings menu.
    Settings,
    /// Ask the player to confirm exiting the game.
    QuitRequested,
}

/// A side effect a command can have on the world.
///
/// Item, room, and character arguments are identity names; lookups happen at
/// apply time against current world state.
#[derive(Debug, Clone)]
pub enum Effect {
    Move(Direction),
    LookAround,
    Wait,
    ShowInventory,
    ShowHelp,
    OpenSettings,
    RequestQuit,
    TakeItem(String),
    DropItem(String),
    InspectItem(String),
    UseItem(String),
    /// "Use tool on target". Only eligible while the target item is reachable
    /// (in inventory or the current room); the aggregator reads `target` to
    /// decide. The authored inner effect is what actually runs.
    UseItemOn {
        tool: String,
        target: String,
        effect: Box<Effect>,
    },
    InvalidUse(String),
    TalkTo(String),
    TradeWith {
        npc: String,
        offered: String,
    },
    /// Print a fixed line.
    Emit(String),
    /// One-shot placement of an unplaced item into a room, with distinct
    /// first-time and repeat messages.
    RevealItem {
        item: String,
        room: String,
        on_reveal: String,
        on_repeat: String,
    },
    /// Open a graph edge at runtime (always traversable).
    OpenPath {
        from: String,
        dir: Direction,
        to: String,
        reciprocal: bool,
    },
    /// Close a graph edge at runtime.
    ClosePath {
        from: String,
        dir: Direction,
        reciprocal: bool,
    },
    /// Run several effects in order. If any yields a non-`Continue` outcome,
    /// the last such outcome is returned.
    Sequence(Vec<Effect>),
}

impl Effect {
    /// Apply this effect against the world, pushing any output into `view`.
    ///
    /// # Errors
    /// Propagates world-state lookup failures (a name referencing a missing
    /// entity is an authoring bug, not a player mistake).
    pub fn apply(&self, world: &mut World, view: &mut View) -> Result<TurnOutcome> {
        match self {
            Effect::Move(dir) => {
                world.move_player(*dir, view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::LookAround => {
                world.look_around(view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::Wait => {
                world.wait(view);
                Ok(TurnOutcome::Continue)
            }
            Effect::ShowInventory => {
                world.show_inventory(view);
                Ok(TurnOutcome::Continue)
            }
            Effect::ShowHelp => {
                world.show_help(view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::OpenSettings => Ok(TurnOutcome::Settings),
            Effect::RequestQuit => Ok(TurnOutcome::QuitRequested),
            Effect::TakeItem(item) => {
                world.take_item(item, view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::DropItem(item) => {
                world.drop_item(item, view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::InspectItem(item) => {
                world.inspect_item(item, view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::UseItem(item) => {
                world.use_item(item, view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::UseItemOn { effect, .. } => effect.apply(world, view),
            Effect::InvalidUse(item) => {
                world.invalid_use(item, view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::TalkTo(npc) => Ok(TurnOutcome::Conversation(npc.clone())),
            Effect::TradeWith { npc, offered } => {
                world.trade_with_npc(npc, offered, view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::Emit(text) => {
                view.push(text.clone());
                Ok(TurnOutcome::Continue)
            }
            Effect::RevealItem {
                item,
                room,
                on_reveal,
                on_repeat,
            } => {
                world.reveal_item(item, room, on_reveal, on_repeat, view)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::OpenPath {
                from,
                dir,
                to,
                reciprocal,
            } => {
                world.link_rooms(from, *dir, to, *reciprocal, &[])?;
                Ok(TurnOutcome::Continue)
            }
            Effect::ClosePath { from, dir, reciprocal } => {
                world.unlink_rooms(from, *dir, *reciprocal)?;
                Ok(TurnOutcome::Continue)
            }
            Effect::Sequence(effects) => {
                let mut outcome = TurnOutcome::Continue;
                for effect in effects {
                    let step = effect.apply(world, view)?;
                    if step != TurnOutcome::Continue {
                        outcome = step;
                    }
                }
                Ok(outcome)
            }
        }
    }

    /// For "use A on B" effects, the target item's name. The aggregator uses
    /// this to drop candidates whose target is out of reach.
    pub fn target_item(&self) -> Option<&str> {
        match self {
            Effect::UseItemOn { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// A named, pattern-matched action available to the player.
#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub matcher: Matcher,
    pub effect: Effect,
}

impl Command {
    /// Compile a command from its match expression.
    ///
    /// # Errors
    /// Fails on an invalid pattern; commands are built at setup, so this
    /// aborts startup rather than surfacing in play.
    pub fn new(name: &str, pattern: &str, effect: Effect) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            matcher: Matcher::compile(pattern)?,
            effect,
        })
    }
}

/// The precedence-ordered candidate list assembled fresh each turn.
///
/// Scan order is insertion order. Inserting a command whose name is already
/// present replaces the earlier entry *in place* (keeping its position), which
/// is also logged: identity collisions across contributors are an authoring
/// error, not a feature.
#[derive(Default)]
pub struct CommandPool<'a> {
    order: Vec<&'a Command>,
    index: HashMap<&'a str, usize>,
}

impl<'a> CommandPool<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, command: &'a Command) {
        if let Some(&pos) = self.index.get(command.name.as_str()) {
            warn!(
                "command pool: duplicate identity '{}' overwrites earlier registration",
                command.name
            );
            self.order[pos] = command;
        } else {
            self.index.insert(command.name.as_str(), self.order.len());
            self.order.push(command);
        }
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = &'a Command>) {
        for command in commands {
            self.insert(command);
        }
    }

    /// First command in scan order whose pattern matches the trimmed input.
    pub fn find_match(&self, input: &str) -> Option<&'a Command> {
        let found = self.order.iter().find(|c| c.matcher.is_match(input)).copied();
        if let Some(command) = found {
            info!("input {input:?} matched command '{}'", command.name);
        }
        found
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Command names in scan order. Used by tests and debug logging.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(|c| c.name.as_str()).collect()
    }
}
