//! Item definitions.
//!
//! An item's player-facing verbs are not authored one by one: they are
//! derived from its aliases and attributes when the item is constructed, as
//! pre-compiled command groups (inspect, standalone use, take/drop,
//! use-on-target, and an invalid-use fallback). The per-turn aggregator picks
//! which groups to expose based on where the item currently is.

use anyhow::Result;
use log::debug;

use crate::command::{Command, Effect};
use crate::matcher::KEYWORDS;

/// Capability flags, one fresh copy per item.
#[derive(Debug, Clone, Copy)]
pub struct ItemAttrs {
    pub can_carry: bool,
    pub can_use: bool,
    /// Usable without picking it up first.
    pub always_usable: bool,
}

impl Default for ItemAttrs {
    fn default() -> Self {
        Self {
            can_carry: true,
            can_use: true,
            always_usable: false,
        }
    }
}

/// Authored responses to the standard item verbs.
///
/// `None` falls back to a generic line built from the display name (take and
/// drop) or the matching global error string (use and invalid use).
#[derive(Debug, Clone, Default)]
pub struct ItemMessages {
    pub on_take: Option<String>,
    pub on_drop: Option<String>,
    pub on_inspect: String,
    pub on_use: Option<String>,
    pub invalid_use: Option<String>,
}

/// One legal "use this on X" pairing and what it does.
#[derive(Debug, Clone)]
pub struct UseTarget {
    /// Identity name of the target item.
    pub name: String,
    /// Alias pattern the player may call the target by.
    pub pattern: String,
    pub effect: Effect,
}

/// An object the player can find, inspect, carry, or use.
///
/// The only mutable aspect of an item after setup is which collection holds
/// it (a room's item list or the inventory); that bookkeeping lives on
/// [`crate::world::World`].
#[derive(Debug, Clone)]
pub struct Item {
    pub name: String,
    /// In-game rendering, e.g. "a dull rock".
    pub display: String,
    /// Alias pattern the player may refer to it by.
    pub aliases: String,
    pub attrs: ItemAttrs,
    pub messages: ItemMessages,
    base_commands: Vec<Command>,
    use_commands: Vec<Command>,
    carry_commands: Vec<Command>,
    target_commands: Vec<Command>,
    failsafe_commands: Vec<Command>,
}

impl Item {
    /// Build an item and compile its derived command groups.
    ///
    /// # Errors
    /// Fails if any alias or target pattern doesn't compile; this is an
    /// authoring error surfaced at setup.
    pub fn new(
        name: &str,
        aliases: &str,
        display: &str,
        attrs: ItemAttrs,
        messages: ItemMessages,
        targets: Vec<UseTarget>,
        special_commands: Vec<Command>,
    ) -> Result<Self> {
        let mut base_commands = vec![Command::new(
            &format!("Inspect {name}"),
            &format!("{} ({aliases})", KEYWORDS.inspect_item),
            Effect::InspectItem(name.to_string()),
        )?];
        base_commands.extend(special_commands);

        let use_commands = vec![Command::new(
            &format!("Use {name}"),
            &format!("{} ({aliases})", KEYWORDS.use_item),
            Effect::UseItem(name.to_string()),
        )?];

        let carry_commands = vec![
            Command::new(
                &format!("Take {name}"),
                &format!("{} ({aliases})", KEYWORDS.take_item),
                Effect::TakeItem(name.to_string()),
            )?,
            Command::new(
                &format!("Drop {name}"),
                &format!("{} ({aliases})", KEYWORDS.drop_item),
                Effect::DropItem(name.to_string()),
            )?,
        ];

        let mut target_commands = Vec::with_capacity(targets.len());
        for target in targets {
            target_commands.push(Command::new(
                &format!("Use {name} on {}", target.name),
                &format!("{} ({aliases}) on ({})", KEYWORDS.use_item, target.pattern),
                Effect::UseItemOn {
                    tool: name.to_string(),
                    target: target.name,
                    effect: Box::new(target.effect),
                },
            )?);
        }

        let failsafe_commands = vec![Command::new(
            &format!("Invalid Use of {name}"),
            &format!("{} ({aliases}) on .*", KEYWORDS.use_item),
            Effect::InvalidUse(name.to_string()),
        )?];

        debug!(
            "item '{name}' compiled: {} base, {} target command(s)",
            base_commands.len(),
            target_commands.len()
        );

        Ok(Self {
            name: name.to_string(),
            display: display.to_string(),
            aliases: aliases.to_string(),
            attrs,
            messages,
            base_commands,
            use_commands,
            carry_commands,
            target_commands,
            failsafe_commands,
        })
    }

    /// Inspect plus any authored special commands. Always exposed wherever
    /// the item is reachable.
    pub fn base_commands(&self) -> &[Command] {
        &self.base_commands
    }

    /// The standalone "use" command.
    pub fn use_commands(&self) -> &[Command] {
        &self.use_commands
    }

    /// Take and drop.
    pub fn carry_commands(&self) -> &[Command] {
        &self.carry_commands
    }

    /// "Use this on X" for each authored pairing.
    pub fn target_commands(&self) -> &[Command] {
        &self.target_commands
    }

    /// The broad "use this on anything" fallback, checked after targets.
    pub fn failsafe_commands(&self) -> &[Command] {
        &self.failsafe_commands
    }
}
