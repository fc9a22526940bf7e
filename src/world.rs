//! World state and the gameplay operations over it.
//!
//! [`World`] owns every room, item and character, the player's inventory and
//! position, the time cycle, and the global command list. One call to
//! [`World::dispatch`] resolves one line of player input: the candidate
//! command pool is assembled fresh (inventory items first, then room items,
//! room specials, characters present, then the global/navigation commands and
//! their failsafes), scanned in order, and exactly one effect runs.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use log::{info, warn};
use rand::prelude::IndexedRandom;
use thiserror::Error;

use crate::command::{Command, CommandPool, Effect, TurnOutcome};
use crate::direction::Direction;
use crate::item::Item;
use crate::matcher::{KEYWORDS, MATCH_ALL, union};
use crate::npc::{DialogEffect, Npc};
use crate::room::{Edge, Room};
use crate::text::GameText;
use crate::timecycle::TimeCycle;
use crate::view::View;

/// Why a move failed. Both normally read as "you can't go that way"; the
/// distinction exists for room-specific messaging and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Blocked {
    #[error("no path exists that way")]
    NoPath,
    #[error("the path is closed at this time")]
    ClosedAtThisTime,
}

/// Result of one dialogue transition step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueOutcome {
    /// Keep the conversation going.
    Continue,
    /// The player said goodbye; the farewell has been queued and control
    /// belongs back in the main turn loop.
    Ended,
}

/// Turn-scoped state outside any single entity.
#[derive(Debug, Clone)]
pub struct WorldFlags {
    /// Show the room's "stay" line as the next prompt preamble. Reset by
    /// dispatch each turn; re-enabled when returning from settings.
    pub show_stay_message: bool,
}

impl Default for WorldFlags {
    fn default() -> Self {
        Self {
            show_stay_message: true,
        }
    }
}

/// Complete state of the running game.
pub struct World {
    pub rooms: HashMap<String, Room>,
    pub items: HashMap<String, Item>,
    pub npcs: HashMap<String, Npc>,
    /// Items the player carries, in acquisition order. Membership is
    /// mutually exclusive with any room's item list.
    pub inventory: Vec<String>,
    pub current_room: String,
    pub clock: TimeCycle,
    /// Global and navigation commands, in precedence order, failsafes last.
    commands: Vec<Command>,
    pub flags: WorldFlags,
    pub text: GameText,
}

impl World {
    /// Create an empty world with the standard global command set.
    ///
    /// # Errors
    /// Fails only if a built-in command pattern doesn't compile.
    pub fn new(text: GameText, clock: TimeCycle) -> Result<Self> {
        let commands = build_global_commands(&text)?;
        Ok(Self {
            rooms: HashMap::new(),
            items: HashMap::new(),
            npcs: HashMap::new(),
            inventory: Vec::new(),
            current_room: String::new(),
            clock,
            commands,
            flags: WorldFlags::default(),
            text,
        })
    }

    // ----- lookups -----

    /// The room the player occupies.
    ///
    /// # Errors
    /// Fails if the current room name resolves to nothing; that's a logic
    /// error in setup or an effect, never a player mistake.
    pub fn current_room_ref(&self) -> Result<&Room> {
        self.rooms
            .get(&self.current_room)
            .ok_or_else(|| anyhow!("current room '{}' not found in world", self.current_room))
    }

    fn room_mut(&mut self, name: &str) -> Result<&mut Room> {
        self.rooms
            .get_mut(name)
            .ok_or_else(|| anyhow!("room '{name}' not found in world"))
    }

    fn item_ref(&self, name: &str) -> Result<&Item> {
        self.items
            .get(name)
            .ok_or_else(|| anyhow!("item '{name}' not found in world"))
    }

    pub fn in_inventory(&self, item: &str) -> bool {
        self.inventory.iter().any(|i| i == item)
    }

    /// True if the item currently sits in any room or the inventory (as
    /// opposed to unplaced stock, e.g. an NPC's trade goods).
    pub fn item_is_placed(&self, item: &str) -> bool {
        self.in_inventory(item) || self.rooms.values().any(|room| room.contains_item(item))
    }

    // ----- graph -----

    /// Connect `a` to `b` in direction `dir`, gated to `access_times` (empty
    /// means always open). With `reciprocal`, also links `b` back through the
    /// reverse direction sharing the same time set; author the reverse edge
    /// separately via a second call when it needs a different one.
    ///
    /// # Errors
    /// Fails if either room is missing (setup logic error).
    pub fn link_rooms(&mut self, a: &str, dir: Direction, b: &str, reciprocal: bool, access_times: &[&str]) -> Result<()> {
        if !self.rooms.contains_key(b) {
            return Err(anyhow!("link target room '{b}' not found"));
        }
        self.room_mut(a)?.set_exit(dir, Some(Edge::gated(b, access_times)));
        if reciprocal {
            self.room_mut(b)?.set_exit(dir.reverse(), Some(Edge::gated(a, access_times)));
        }
        Ok(())
    }

    /// Clear `a`'s edge in `dir`; with `reciprocal`, also clear the matching
    /// reverse edge on the room it pointed to. Closing an edge that isn't
    /// there is a no-op, not a fault.
    ///
    /// # Errors
    /// Fails only if `a` itself doesn't exist.
    pub fn unlink_rooms(&mut self, a: &str, dir: Direction, reciprocal: bool) -> Result<()> {
        // read the edge before clearing so the far side can still be found
        let target = match self.room_mut(a)?.exit(dir) {
            Some(edge) => edge.to.clone(),
            None => {
                warn!("unlink: '{a}' has no {dir} edge; nothing to close");
                return Ok(());
            }
        };
        self.room_mut(a)?.set_exit(dir, None);
        if reciprocal {
            if let Some(far) = self.rooms.get_mut(&target) {
                if far.exit(dir.reverse()).is_none() {
                    warn!("unlink: reverse edge {} from '{target}' already clear", dir.reverse());
                } else {
                    far.set_exit(dir.reverse(), None);
                }
            }
        }
        Ok(())
    }

    /// True iff the current room has an exit in `dir` open at the current time.
    pub fn can_traverse(&self, dir: Direction) -> bool {
        self.current_room_ref()
            .ok()
            .and_then(|room| room.exit(dir))
            .is_some_and(|edge| edge.open_at(self.clock.current()))
    }

    /// Resolve a move attempt without mutating anything.
    ///
    /// # Errors
    /// [`Blocked::NoPath`] when the slot is empty, [`Blocked::ClosedAtThisTime`]
    /// when an edge exists but the tide/time is wrong.
    pub fn try_move(&self, dir: Direction) -> Result<String, Blocked> {
        let room = self.current_room_ref().map_err(|_| Blocked::NoPath)?;
        let edge = room.exit(dir).ok_or(Blocked::NoPath)?;
        if edge.open_at(self.clock.current()) {
            Ok(edge.to.clone())
        } else {
            Err(Blocked::ClosedAtThisTime)
        }
    }

    /// Move the player, emitting travel and arrival text, or the blocked
    /// message (room-authored override first) when the way is shut.
    ///
    /// # Errors
    /// Fails on broken room references (authoring/setup errors).
    pub fn move_player(&mut self, dir: Direction, view: &mut View) -> Result<()> {
        match self.try_move(dir) {
            Ok(target) => {
                view.push(format!("You went {}.", dir.name().to_lowercase()));
                self.current_room = target;
                let room = self.room_mut(&self.current_room.clone())?;
                view.push(room.enter_text().to_string());
                room.visited = true;
                info!("player moved {dir} to '{}'", self.current_room);
                Ok(())
            }
            Err(blocked) => {
                let barred = self
                    .current_room_ref()?
                    .exit(dir)
                    .and_then(|edge| edge.barred_message.clone());
                view.push(barred.unwrap_or_else(|| self.text.errors.no_path.clone()));
                info!("move {dir} blocked: {blocked}");
                Ok(())
            }
        }
    }

    // ----- items -----

    /// Move an item from the current room into the inventory, if the command
    /// and situation make sense.
    ///
    /// # Errors
    /// Fails if `name` isn't a defined item (authoring error).
    pub fn take_item(&mut self, name: &str, view: &mut View) -> Result<()> {
        let item = self.item_ref(name)?;
        if !item.attrs.can_carry {
            view.push(self.text.errors.cannot_carry_item.clone());
            return Ok(());
        }
        let take_msg = item
            .messages
            .on_take
            .clone()
            .unwrap_or_else(|| format!("You took {}.", item.display));
        if self.in_inventory(name) {
            view.push(self.text.errors.item_already_in_inv.clone());
        } else if !self.current_room_ref()?.contains_item(name) {
            view.push(self.text.errors.cannot_take_item.clone());
        } else {
            self.room_mut(&self.current_room.clone())?.remove_item(name);
            self.inventory.push(name.to_string());
            view.push(take_msg);
            info!("item '{name}' taken into inventory");
        }
        Ok(())
    }

    /// Move an item from the inventory back into the current room.
    ///
    /// # Errors
    /// Fails if `name` isn't a defined item.
    pub fn drop_item(&mut self, name: &str, view: &mut View) -> Result<()> {
        let item = self.item_ref(name)?;
        let drop_msg = item
            .messages
            .on_drop
            .clone()
            .unwrap_or_else(|| format!("You dropped {}.", item.display));
        if self.in_inventory(name) {
            self.inventory.retain(|i| i != name);
            self.room_mut(&self.current_room.clone())?.add_item(name);
            view.push(drop_msg);
            info!("item '{name}' dropped in '{}'", self.current_room);
        } else if self.current_room_ref()?.contains_item(name) {
            view.push(self.text.errors.item_not_in_inv.clone());
        } else {
            view.push(self.text.errors.unknown_item.clone());
        }
        Ok(())
    }

    /// # Errors
    /// Fails if `name` isn't a defined item.
    pub fn inspect_item(&self, name: &str, view: &mut View) -> Result<()> {
        view.push(self.item_ref(name)?.messages.on_inspect.clone());
        Ok(())
    }

    /// # Errors
    /// Fails if `name` isn't a defined item.
    pub fn use_item(&self, name: &str, view: &mut View) -> Result<()> {
        let item = self.item_ref(name)?;
        view.push(
            item.messages
                .on_use
                .clone()
                .unwrap_or_else(|| self.text.errors.cannot_use_item.clone()),
        );
        Ok(())
    }

    /// # Errors
    /// Fails if `name` isn't a defined item.
    pub fn invalid_use(&self, name: &str, view: &mut View) -> Result<()> {
        let item = self.item_ref(name)?;
        view.push(
            item.messages
                .invalid_use
                .clone()
                .unwrap_or_else(|| self.text.errors.invalid_item_use.clone()),
        );
        Ok(())
    }

    /// One-shot placement of an unplaced item into a room.
    ///
    /// # Errors
    /// Fails if the room is missing.
    pub fn reveal_item(&mut self, item: &str, room: &str, on_reveal: &str, on_repeat: &str, view: &mut View) -> Result<()> {
        if self.item_is_placed(item) {
            view.push(on_repeat.to_string());
        } else {
            self.room_mut(room)?.add_item(item);
            view.push(on_reveal.to_string());
            info!("item '{item}' revealed in '{room}'");
        }
        Ok(())
    }

    // ----- characters & trade -----

    /// Offer `offered` to `npc_name` per its trade table.
    ///
    /// # Errors
    /// Fails if the character or a referenced item definition is missing.
    pub fn trade_with_npc(&mut self, npc_name: &str, offered: &str, view: &mut View) -> Result<()> {
        let npc = self
            .npcs
            .get(npc_name)
            .ok_or_else(|| anyhow!("npc '{npc_name}' not found in world"))?;

        if !self.in_inventory(offered) {
            // sold out vs. "you don't even have that": different replies
            if npc.originally_sold(offered) && npc.ware_for(offered).is_none() {
                view.push(npc.messages.out_of_stock.clone());
            } else {
                view.push(npc.messages.failed_sale.clone());
            }
            return Ok(());
        }
        if !npc.originally_sold(offered) {
            view.push(npc.messages.unknown_ware.clone());
            return Ok(());
        }
        let Some(received) = npc.ware_for(offered).map(ToString::to_string) else {
            view.push(npc.messages.out_of_stock.clone());
            return Ok(());
        };

        let received_display = self.item_ref(&received)?.display.clone();
        let offered_display = self.item_ref(offered)?.display.clone();
        self.inventory.retain(|i| i != offered);
        self.inventory.push(received.clone());
        if let Some(npc) = self.npcs.get_mut(npc_name) {
            npc.remove_ware(offered);
        }
        view.push(format!("You received {received_display} in exchange for {offered_display}."));
        info!("trade with '{npc_name}': '{offered}' -> '{received}'");
        Ok(())
    }

    /// Run one dialogue transition for `npc_name` against one line of input.
    ///
    /// Scans the currently legal options in defined order, then the
    /// failsafes; fires the first match's side effect, queues its response,
    /// and swaps in its follow-up option set (unless marked unchanged;
    /// failsafes always swap). A goodbye effect queues the farewell and
    /// reports [`DialogueOutcome::Ended`] instead.
    ///
    /// # Errors
    /// Fails if the character is missing or an embedded world effect fails.
    pub fn dialogue_step(&mut self, npc_name: &str, input: &str, view: &mut View) -> Result<DialogueOutcome> {
        let npc = self
            .npcs
            .get(npc_name)
            .ok_or_else(|| anyhow!("npc '{npc_name}' not found in world"))?;

        let Some((option, is_failsafe)) = npc.select(input) else {
            // only reachable without a catch-all failsafe configured
            warn!("npc '{npc_name}': no dialogue option matched {input:?}");
            return Ok(DialogueOutcome::Continue);
        };
        let option_name = option.name.clone();
        let unchanged = option.unchanged;
        let response = option.response.clone();
        let effect = option.effect.clone();
        let next_options = option.next_options.clone();
        let farewell = npc.messages.on_leave.clone();
        info!("npc '{npc_name}': input {input:?} selected option '{option_name}' (failsafe: {is_failsafe})");

        match effect {
            DialogEffect::EndConversation => {
                view.push(farewell);
                return Ok(DialogueOutcome::Ended);
            }
            DialogEffect::ListWares => {
                let npc = &self.npcs[npc_name];
                if npc.has_wares() {
                    view.push(format!("{}\n{}", npc.messages.wares_header, npc.list_wares()));
                } else {
                    view.push(npc.messages.no_wares.clone());
                }
            }
            DialogEffect::Trade { offered } => self.trade_with_npc(npc_name, &offered, view)?,
            DialogEffect::World(effect) => {
                let outcome = effect.apply(self, view)?;
                if outcome != TurnOutcome::Continue {
                    warn!("dialogue world effect produced outcome {outcome:?}; ignored inside conversation");
                }
            }
            DialogEffect::None => {}
        }

        if let Some(response) = response {
            view.push(response);
        }
        if is_failsafe || !unchanged {
            if let Some(npc) = self.npcs.get_mut(npc_name) {
                npc.apply_transition(&option_name, &next_options);
            }
        }
        Ok(DialogueOutcome::Continue)
    }

    // ----- misc turn actions -----

    /// Waiting is how time (and the tide) moves.
    pub fn wait(&mut self, view: &mut View) {
        view.push(self.text.messages.player_did_nothing.clone());
        let state = self.clock.advance();
        view.push(self.text.messages.time_passes.replace("{time}", &state.to_string()));
    }

    /// # Errors
    /// Fails if the current room reference is broken.
    pub fn look_around(&self, view: &mut View) -> Result<()> {
        view.push(self.current_room_ref()?.text.on_look.clone());
        Ok(())
    }

    pub fn show_inventory(&self, view: &mut View) {
        let displays: Vec<&str> = self
            .inventory
            .iter()
            .filter_map(|name| self.items.get(name))
            .map(|item| item.display.as_str())
            .collect();
        if displays.is_empty() {
            view.push(self.text.messages.inventory_empty.clone());
        } else {
            view.push(format!(
                "{} {}.",
                self.text.messages.inventory_contains,
                repr_item_list(&displays)
            ));
        }
    }

    /// Help with a couple of suggestions that actually work right now.
    ///
    /// # Errors
    /// Fails if the current room reference is broken.
    pub fn show_help(&self, view: &mut View) -> Result<()> {
        let mut msg = format!("{}\n look around", self.text.messages.help_intro);
        let room = self.current_room_ref()?;
        let mut rng = rand::rng();
        if let Some(dir) = room.open_directions(self.clock.current()).choose(&mut rng) {
            msg.push_str(&format!("\n go {}", dir.name().to_lowercase()));
        }
        let carryable: Vec<&String> = room
            .items
            .iter()
            .filter(|name| self.items.get(*name).is_some_and(|i| i.attrs.can_carry))
            .collect();
        if let Some(name) = carryable.choose(&mut rng) {
            msg.push_str(&format!("\n take {}", name.to_lowercase()));
        } else if let Some(name) = self.inventory.choose(&mut rng) {
            msg.push_str(&format!("\n drop {}", name.to_lowercase()));
        }
        view.push(msg);
        Ok(())
    }

    // ----- aggregation & dispatch -----

    fn target_reachable(&self, command: &Command) -> bool {
        command.effect.target_item().is_none_or(|target| {
            self.in_inventory(target)
                || self
                    .current_room_ref()
                    .is_ok_and(|room| room.contains_item(target))
        })
    }

    /// Assemble the turn's candidate commands in precedence order:
    /// inventory items, room items, room specials, characters present,
    /// then the global commands with their failsafes last.
    pub fn command_pool(&self) -> CommandPool<'_> {
        let mut pool = CommandPool::new();

        for name in &self.inventory {
            let Some(item) = self.items.get(name) else { continue };
            pool.extend(item.base_commands());
            if item.attrs.can_use {
                pool.extend(item.use_commands());
            }
            pool.extend(item.carry_commands());
            pool.extend(item.target_commands().iter().filter(|c| self.target_reachable(c)));
            pool.extend(item.failsafe_commands());
        }

        if let Ok(room) = self.current_room_ref() {
            for name in &room.items {
                let Some(item) = self.items.get(name) else { continue };
                pool.extend(item.base_commands());
                // items you'd have to pick up first don't expose standalone use
                if item.attrs.always_usable || (item.attrs.can_use && !item.attrs.can_carry) {
                    pool.extend(item.use_commands());
                }
                if item.attrs.can_carry {
                    pool.extend(item.carry_commands());
                }
                pool.extend(item.target_commands().iter().filter(|c| self.target_reachable(c)));
                pool.extend(item.failsafe_commands());
            }

            pool.extend(&room.special_commands);

            for npc_name in &room.npcs {
                if let Some(npc) = self.npcs.get(npc_name) {
                    pool.extend(&npc.commands);
                }
            }
        }

        pool.extend(&self.commands);
        pool
    }

    /// Resolve one line of input: find the first matching candidate and run
    /// its effect. Exactly one command fires per call; the universal
    /// catch-all guarantees something always matches.
    ///
    /// # Errors
    /// Propagates effect failures (broken world references).
    pub fn dispatch(&mut self, input: &str, view: &mut View) -> Result<TurnOutcome> {
        self.flags.show_stay_message = false;
        let chosen = self.command_pool().find_match(input).map(|c| c.effect.clone());
        match chosen {
            Some(effect) => effect.apply(self, view),
            None => Ok(TurnOutcome::Continue),
        }
    }
}

fn build_global_commands(text: &GameText) -> Result<Vec<Command>> {
    let mut commands = vec![
        Command::new("Help", r"help( me)?", Effect::ShowHelp)?,
        Command::new("Look Around", &KEYWORDS.look_around, Effect::LookAround)?,
        Command::new("Do Nothing", &KEYWORDS.do_nothing, Effect::Wait)?,
        Command::new("Exit Game", &format!("{}( (the )?game)?", KEYWORDS.exit_game), Effect::RequestQuit)?,
        Command::new(
            "Check Inventory",
            r"(check (the )?)?(inventory|inv|bag|backpack)",
            Effect::ShowInventory,
        )?,
        Command::new("Open Settings", r"(open (the )?)?(game )?settings", Effect::OpenSettings)?,
    ];
    for dir in Direction::ALL {
        commands.push(Command::new(
            &format!("Move {}", dir.name()),
            dir.pattern(),
            Effect::Move(dir),
        )?);
    }
    // failsafes: recognizable verb, unrecognizable rest -- then the catch-all
    commands.push(Command::new(
        "Unknown Direction",
        &format!("{}.*", KEYWORDS.movement),
        Effect::Emit(text.errors.unknown_dir.clone()),
    )?);
    commands.push(Command::new(
        "Unknown Item",
        &format!(
            "{}.*",
            union(&[
                KEYWORDS.use_item.as_str(),
                KEYWORDS.take_item.as_str(),
                KEYWORDS.drop_item.as_str(),
            ])
        ),
        Effect::Emit(text.errors.unknown_item.clone()),
    )?);
    commands.push(Command::new(
        "Unknown Character",
        &format!("{}.*", KEYWORDS.talk_to),
        Effect::Emit(text.errors.unknown_npc.clone()),
    )?);
    commands.push(Command::new("Unknown Command", MATCH_ALL, Effect::Emit(text.errors.unknown_cmd.clone()))?);
    Ok(commands)
}

/// Render a display-name list as prose: "a", "a and b", "a, b, and c".
pub fn repr_item_list(displays: &[&str]) -> String {
    match displays {
        [] => String::new(),
        [one] => (*one).to_string(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemAttrs, ItemMessages, UseTarget};
    use crate::npc::{DialogOption, NpcMessages};
    use crate::room::{Room, RoomText};
    use crate::timecycle::island_cycle;

    fn test_item(name: &str, aliases: &str, attrs: ItemAttrs) -> Item {
        Item::new(
            name,
            aliases,
            &format!("a {}", name.to_lowercase()),
            attrs,
            ItemMessages {
                on_inspect: format!("You see {name}."),
                ..ItemMessages::default()
            },
            Vec::new(),
            Vec::new(),
        )
        .unwrap()
    }

    fn test_world() -> World {
        let mut world = World::new(GameText::default(), island_cycle()).unwrap();
        for name in ["Beach", "Cove", "Reef"] {
            world.rooms.insert(
                name.to_string(),
                Room::new(name, RoomText::new("first visit", "back again", "looking", "staying")),
            );
        }
        world.current_room = "Beach".to_string();
        world.rooms.get_mut("Beach").unwrap().visited = true;

        let rock = test_item(
            "Dull Rock",
            "dull rock|rock",
            ItemAttrs {
                can_use: false,
                ..ItemAttrs::default()
            },
        );
        world.items.insert(rock.name.clone(), rock);
        world.rooms.get_mut("Beach").unwrap().add_item("Dull Rock");
        world
    }

    fn run(world: &mut World, input: &str) -> Vec<String> {
        let mut view = View::with_width(100);
        world.dispatch(input, &mut view).unwrap();
        view.take_lines()
    }

    #[test]
    fn link_rooms_reciprocal_round_trip() {
        let mut world = test_world();
        world.link_rooms("Beach", Direction::East, "Cove", true, &[]).unwrap();
        assert_eq!(world.rooms["Beach"].exit(Direction::East).unwrap().to, "Cove");
        assert_eq!(world.rooms["Cove"].exit(Direction::West).unwrap().to, "Beach");
    }

    #[test]
    fn unlink_missing_edge_is_a_noop() {
        let mut world = test_world();
        world.unlink_rooms("Beach", Direction::North, true).unwrap();
        world.link_rooms("Beach", Direction::East, "Cove", true, &[]).unwrap();
        world.unlink_rooms("Beach", Direction::East, true).unwrap();
        assert!(world.rooms["Beach"].exit(Direction::East).is_none());
        assert!(world.rooms["Cove"].exit(Direction::West).is_none());
    }

    #[test]
    fn time_gated_edge_blocks_move_without_changing_room() {
        let mut world = test_world();
        world
            .link_rooms("Beach", Direction::East, "Cove", true, &["Evening"])
            .unwrap();
        // Afternoon: closed
        assert_eq!(world.try_move(Direction::East), Err(Blocked::ClosedAtThisTime));
        assert_eq!(world.try_move(Direction::North), Err(Blocked::NoPath));
        let mut view = View::with_width(100);
        world.move_player(Direction::East, &mut view).unwrap();
        assert_eq!(world.current_room, "Beach");
        assert_eq!(view.take_lines(), vec!["You can't go that way."]);

        world.clock.advance(); // Evening
        assert!(world.can_traverse(Direction::East));
        let target = world.try_move(Direction::East).unwrap();
        assert_eq!(target, "Cove");
        // other seven states stay blocked
        for _ in 0..7 {
            world.clock.advance();
            assert!(!world.can_traverse(Direction::East));
        }
    }

    #[test]
    fn move_marks_rooms_visited_and_switches_text() {
        let mut world = test_world();
        world.link_rooms("Beach", Direction::East, "Cove", true, &[]).unwrap();
        let lines = run(&mut world, "go east");
        assert_eq!(lines, vec!["You went east.", "first visit"]);
        assert!(world.rooms["Cove"].visited);
        let lines = run(&mut world, "w");
        assert_eq!(lines[0], "You went west.");
        let lines = run(&mut world, "go e");
        assert_eq!(lines, vec!["You went east.", "back again"]);
    }

    #[test]
    fn barred_message_overrides_default_block_text() {
        let mut world = test_world();
        world
            .link_rooms("Beach", Direction::East, "Cove", false, &["Evening"])
            .unwrap();
        world
            .rooms
            .get_mut("Beach")
            .unwrap()
            .exits[Direction::East.slot()]
            .as_mut()
            .unwrap()
            .set_barred_msg(Some("The sandbar is underwater.".into()));
        let lines = run(&mut world, "go east");
        assert_eq!(lines, vec!["The sandbar is underwater."]);
    }

    #[test]
    fn take_and_drop_keep_item_ownership_exclusive() {
        let mut world = test_world();
        assert_eq!(run(&mut world, "take dull rock"), vec!["You took a dull rock."]);
        assert!(world.in_inventory("Dull Rock"));
        assert!(!world.rooms["Beach"].contains_item("Dull Rock"));
        assert_eq!(world.inventory.iter().filter(|i| *i == "Dull Rock").count(), 1);

        assert_eq!(run(&mut world, "take dull rock"), vec!["You're already carrying that!"]);
        assert_eq!(world.inventory.len(), 1);

        assert_eq!(run(&mut world, "drop dull rock"), vec!["You dropped a dull rock."]);
        assert!(world.inventory.is_empty());
        assert!(world.rooms["Beach"].contains_item("Dull Rock"));
    }

    #[test]
    fn dropping_an_unheld_item_changes_nothing() {
        let mut world = test_world();
        assert_eq!(run(&mut world, "drop rock"), vec!["You're not carrying that item."]);
        assert!(world.inventory.is_empty());
        assert!(world.rooms["Beach"].contains_item("Dull Rock"));
    }

    #[test]
    fn uncarryable_item_cannot_be_taken() {
        let mut world = test_world();
        let anchor = test_item(
            "Anchor",
            "anchor",
            ItemAttrs {
                can_carry: false,
                can_use: false,
                always_usable: false,
            },
        );
        world.items.insert(anchor.name.clone(), anchor);
        world.rooms.get_mut("Beach").unwrap().add_item("Anchor");
        // no take command is exposed for it, so typed input falls through
        assert_eq!(run(&mut world, "take anchor"), vec!["You can't do that."]);
        // and the guard holds even when an authored command forces the attempt
        let mut view = View::with_width(100);
        world.take_item("Anchor", &mut view).unwrap();
        assert_eq!(view.take_lines(), vec!["You can't carry that!"]);
        assert!(world.inventory.is_empty());
    }

    #[test]
    fn dispatch_always_resolves_exactly_one_command() {
        let mut world = test_world();
        let lines = run(&mut world, "wibble wobble ???");
        assert_eq!(lines, vec!["Command not recognized."]);
        let lines = run(&mut world, "travel under the sea");
        assert_eq!(lines, vec!["Which way do you want to go?"]);
        let lines = run(&mut world, "take the ferry");
        assert_eq!(lines, vec!["You can't do that."]);
        let lines = run(&mut world, "talk to the king");
        assert_eq!(lines, vec!["Who?"]);
    }

    #[test]
    fn inventory_item_shadows_room_item_with_shared_alias() {
        let mut world = test_world();
        let mut carried = test_item("Gray Pebble", "pebble", ItemAttrs::default());
        carried.messages.on_use = Some("You used the gray pebble.".into());
        let mut grounded = test_item(
            "White Pebble",
            "pebble",
            ItemAttrs {
                always_usable: true,
                ..ItemAttrs::default()
            },
        );
        grounded.messages.on_use = Some("You used the white pebble.".into());
        world.items.insert(carried.name.clone(), carried);
        world.items.insert(grounded.name.clone(), grounded);
        world.inventory.push("Gray Pebble".to_string());
        world.rooms.get_mut("Beach").unwrap().add_item("White Pebble");

        let lines = run(&mut world, "use pebble");
        assert_eq!(lines, vec!["You used the gray pebble."]);
    }

    #[test]
    fn unreachable_target_excludes_the_command_entirely() {
        let mut world = test_world();
        let knife = Item::new(
            "Rusty Knife",
            "rusty knife|knife",
            "a rusty knife",
            ItemAttrs::default(),
            ItemMessages {
                on_inspect: "Rusty.".into(),
                invalid_use: Some("That won't work.".into()),
                ..ItemMessages::default()
            },
            vec![UseTarget {
                name: "Coconut".into(),
                pattern: "coconut".into(),
                effect: Effect::Emit("The husk splits open.".into()),
            }],
            Vec::new(),
        )
        .unwrap();
        let coconut = test_item("Coconut", "coconut", ItemAttrs::default());
        world.items.insert(knife.name.clone(), knife);
        world.items.insert(coconut.name.clone(), coconut);
        world.inventory.push("Rusty Knife".to_string());

        // coconut is in no room and not carried: the pairing drops out and
        // the invalid-use fallback answers instead
        assert_eq!(run(&mut world, "use knife on coconut"), vec!["That won't work."]);

        world.rooms.get_mut("Beach").unwrap().add_item("Coconut");
        assert_eq!(run(&mut world, "use knife on coconut"), vec!["The husk splits open."]);
    }

    #[test]
    fn sequence_effect_runs_in_order_and_opens_paths() {
        let mut world = test_world();
        let effect = Effect::Sequence(vec![
            Effect::Emit("The ground shakes.".into()),
            Effect::OpenPath {
                from: "Beach".into(),
                dir: Direction::North,
                to: "Reef".into(),
                reciprocal: true,
            },
        ]);
        let mut view = View::with_width(100);
        effect.apply(&mut world, &mut view).unwrap();
        assert_eq!(view.take_lines(), vec!["The ground shakes."]);
        assert!(world.can_traverse(Direction::North));
        assert_eq!(world.rooms["Reef"].exit(Direction::South).unwrap().to, "Beach");

        Effect::ClosePath {
            from: "Beach".into(),
            dir: Direction::North,
            reciprocal: true,
        }
        .apply(&mut world, &mut view)
        .unwrap();
        assert!(!world.can_traverse(Direction::North));
    }

    #[test]
    fn wait_advances_the_clock() {
        let mut world = test_world();
        let lines = run(&mut world, "wait");
        assert_eq!(world.clock.current().name, "Evening");
        assert_eq!(lines[0], "You did nothing.");
        assert!(lines[1].contains("Evening"));
    }

    #[test]
    fn inventory_listing_uses_prose_joins() {
        assert_eq!(repr_item_list(&[]), "");
        assert_eq!(repr_item_list(&["a rock"]), "a rock");
        assert_eq!(repr_item_list(&["a rock", "a shell"]), "a rock and a shell");
        assert_eq!(
            repr_item_list(&["a rock", "a shell", "a crab"]),
            "a rock, a shell, and a crab"
        );
    }

    fn trading_npc() -> Npc {
        Npc::new(
            "Old Man",
            NpcMessages {
                failed_sale: "You don't have that one.".into(),
                unknown_ware: "Don't know what that one is.".into(),
                out_of_stock: "No longer for sale.".into(),
                ..NpcMessages::default()
            },
            Vec::new(),
            Vec::new(),
            &[],
            Vec::new(),
            vec![("Dull Rock", "Shiny Rock")],
        )
        .unwrap()
    }

    #[test]
    fn trade_decision_table() {
        let mut world = test_world();
        let shiny = test_item("Shiny Rock", "shiny rock", ItemAttrs::default());
        world.items.insert(shiny.name.clone(), shiny);
        world.npcs.insert("Old Man".to_string(), trading_npc());
        let mut view = View::with_width(100);

        // not carrying the offered item
        world.trade_with_npc("Old Man", "Dull Rock", &mut view).unwrap();
        assert_eq!(view.take_lines(), vec!["You don't have that one."]);

        // carrying it: exchange goes through and stock is consumed
        world.rooms.get_mut("Beach").unwrap().remove_item("Dull Rock");
        world.inventory.push("Dull Rock".to_string());
        world.trade_with_npc("Old Man", "Dull Rock", &mut view).unwrap();
        assert_eq!(
            view.take_lines(),
            vec!["You received a shiny rock in exchange for a dull rock."]
        );
        assert!(!world.in_inventory("Dull Rock"));
        assert!(world.in_inventory("Shiny Rock"));
        assert_eq!(world.npcs["Old Man"].ware_for("Dull Rock"), None);
        assert!(world.npcs["Old Man"].originally_sold("Dull Rock"));

        // offering it again after selling out
        world.inventory.push("Dull Rock".to_string());
        world.trade_with_npc("Old Man", "Dull Rock", &mut view).unwrap();
        assert_eq!(view.take_lines(), vec!["No longer for sale."]);

        // offering something never dealt in
        world.trade_with_npc("Old Man", "Shiny Rock", &mut view).unwrap();
        assert_eq!(view.take_lines(), vec!["Don't know what that one is."]);
    }

    fn dialogue_npc() -> Npc {
        let next: &[&str] = &["Greeting", "Goodbye"];
        let options = vec![
            DialogOption::new("Greeting", "How are you doing?", r"(how are you doing)(\?)?")
                .unwrap()
                .response("I am good.")
                .unchanged(),
            DialogOption::new("Goodbye", "Goodbye.", r"(good)?bye")
                .unwrap()
                .response("See you later my friend!")
                .effect(crate::npc::DialogEffect::EndConversation)
                .next(next),
        ];
        let failsafes = vec![
            DialogOption::new("Unknown", "unused", MATCH_ALL)
                .unwrap()
                .response("You not making sense.")
                .next(next),
        ];
        Npc::new(
            "Old Man",
            NpcMessages {
                on_leave: "My brother have a good day!".into(),
                ..NpcMessages::default()
            },
            options,
            failsafes,
            next,
            Vec::new(),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn dialogue_step_is_deterministic_and_respects_unchanged() {
        let mut world = test_world();
        world.npcs.insert("Old Man".to_string(), dialogue_npc());
        for _ in 0..3 {
            let mut view = View::with_width(100);
            let outcome = world.dialogue_step("Old Man", "how are you doing?", &mut view).unwrap();
            assert_eq!(outcome, DialogueOutcome::Continue);
            assert_eq!(view.take_lines(), vec!["I am good."]);
            assert_eq!(
                world.npcs["Old Man"].current_options,
                vec!["Greeting".to_string(), "Goodbye".to_string()]
            );
        }
    }

    #[test]
    fn goodbye_ends_the_conversation_with_a_farewell() {
        let mut world = test_world();
        world.npcs.insert("Old Man".to_string(), dialogue_npc());
        let mut view = View::with_width(100);
        let outcome = world.dialogue_step("Old Man", "bye", &mut view).unwrap();
        assert_eq!(outcome, DialogueOutcome::Ended);
        assert_eq!(view.take_lines(), vec!["My brother have a good day!"]);
    }

    #[test]
    fn failsafe_answers_arbitrary_text() {
        let mut world = test_world();
        world.npcs.insert("Old Man".to_string(), dialogue_npc());
        use rand::Rng;
        use rand::distr::Alphanumeric;
        let mut rng = rand::rng();
        for _ in 0..100 {
            let len = rng.random_range(1..24);
            let garbage: String = (&mut rng).sample_iter(Alphanumeric).take(len).map(char::from).collect();
            let mut view = View::with_width(100);
            let outcome = world.dialogue_step("Old Man", &garbage, &mut view).unwrap();
            match outcome {
                DialogueOutcome::Continue => assert!(!view.take_lines().is_empty()),
                DialogueOutcome::Ended => {} // a lucky "bye"-shaped string
            }
        }
    }
}
