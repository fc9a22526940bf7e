//! NPC module.
//!
//! Each character runs its own little state machine: the set of dialogue
//! options currently legal for the player, with declaration-ordered matching
//! (earlier options win ties), per-option follow-up sets, and always-active
//! failsafes checked last. Characters may also trade items; the live trade
//! table shrinks as stock sells, while an immutable copy of the original
//! table distinguishes "sold out" from "never for sale".

use std::collections::HashSet;

use anyhow::{Result, anyhow};

use crate::command::{Command, Effect};
use crate::matcher::Matcher;
use crate::style::GameStyle;

/// Authored lines for talking to and trading with a character.
#[derive(Debug, Clone, Default)]
pub struct NpcMessages {
    pub on_first_talk: String,
    pub on_talk: String,
    pub on_leave: String,
    /// Player offered something they aren't carrying.
    pub failed_sale: String,
    /// Player offered something this character never dealt in.
    pub unknown_ware: String,
    /// Player offered something already sold out.
    pub out_of_stock: String,
    pub wares_header: String,
    pub no_wares: String,
}

/// Side effect of choosing a dialogue option.
#[derive(Debug, Clone)]
pub enum DialogEffect {
    None,
    /// Print the character's current trade table.
    ListWares,
    /// Offer the named inventory item per the trade table.
    Trade { offered: String },
    /// End the conversation; the farewell line is printed at the loop
    /// boundary and control returns to the main turn loop.
    EndConversation,
    /// Any world effect, e.g. opening a path or revealing an item.
    World(Effect),
}

/// A single conversational move.
#[derive(Debug, Clone)]
pub struct DialogOption {
    pub name: String,
    /// Hidden options are left off the menu but still matchable.
    pub hidden: bool,
    /// Leave the current legal set untouched after this option fires.
    pub unchanged: bool,
    /// Menu text shown to the player.
    pub label: String,
    pub matcher: Matcher,
    /// `None` means the side effect alone produces any output.
    pub response: Option<String>,
    pub effect: DialogEffect,
    /// The legal set after this option (ignored when `unchanged`).
    pub next_options: Vec<String>,
}

impl DialogOption {
    /// Start building an option; pattern compiles now, authoring errors
    /// surface at setup.
    ///
    /// # Errors
    /// Fails on an invalid match pattern.
    pub fn new(name: &str, label: &str, pattern: &str) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            hidden: false,
            unchanged: false,
            label: label.to_string(),
            matcher: Matcher::compile(pattern)?,
            response: None,
            effect: DialogEffect::None,
            next_options: Vec::new(),
        })
    }

    pub fn response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    pub fn effect(mut self, effect: DialogEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn next(mut self, options: &[&str]) -> Self {
        self.next_options = options.iter().map(ToString::to_string).collect();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn unchanged(mut self) -> Self {
        self.unchanged = true;
        self
    }
}

/// A non-playable character.
#[derive(Debug, Clone)]
pub struct Npc {
    pub name: String,
    pub messages: NpcMessages,
    /// Flips permanently to true on first talk; selects the greeting line.
    pub talked_to: bool,
    options: Vec<DialogOption>,
    failsafes: Vec<DialogOption>,
    pub current_options: Vec<String>,
    starting_options: Vec<String>,
    /// Commands this character contributes to the pool while present.
    pub commands: Vec<Command>,
    /// Live trade table, offered item -> received item, in authored order.
    wares: Vec<(String, String)>,
    /// Setup-time copy; never mutated.
    original_wares: Vec<(String, String)>,
}

impl Npc {
    /// Build a character, validating the dialogue graph.
    ///
    /// # Errors
    /// Fails if option names collide, or if the starting set or any
    /// `next_options` set names an undefined option. These are authoring
    /// errors and abort setup.
    pub fn new(
        name: &str,
        messages: NpcMessages,
        options: Vec<DialogOption>,
        failsafes: Vec<DialogOption>,
        starting_options: &[&str],
        commands: Vec<Command>,
        wares: Vec<(&str, &str)>,
    ) -> Result<Self> {
        let mut defined: HashSet<&str> = HashSet::new();
        for option in &options {
            if !defined.insert(option.name.as_str()) {
                return Err(anyhow!("npc '{name}': duplicate dialogue option '{}'", option.name));
            }
        }
        let check_refs = |set: &[String], owner: &str| -> Result<()> {
            for referenced in set {
                if !defined.contains(referenced.as_str()) {
                    return Err(anyhow!(
                        "npc '{name}': {owner} references undefined option '{referenced}'"
                    ));
                }
            }
            Ok(())
        };
        for option in options.iter().chain(&failsafes) {
            check_refs(&option.next_options, &format!("option '{}'", option.name))?;
        }
        let starting: Vec<String> = starting_options.iter().map(ToString::to_string).collect();
        check_refs(&starting, "starting set")?;

        let wares: Vec<(String, String)> = wares
            .into_iter()
            .map(|(offered, received)| (offered.to_string(), received.to_string()))
            .collect();

        Ok(Self {
            name: name.to_string(),
            messages,
            talked_to: false,
            options,
            failsafes,
            current_options: starting.clone(),
            starting_options: starting,
            commands,
            original_wares: wares.clone(),
            wares,
        })
    }

    pub fn option(&self, name: &str) -> Option<&DialogOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Pick the option for one line of input: the currently legal options in
    /// their defined order first, then the failsafes in declaration order.
    /// Returns the winning option and whether it came from the failsafe list
    /// (failsafes always replace the legal set, ignoring `unchanged`).
    pub fn select(&self, input: &str) -> Option<(&DialogOption, bool)> {
        for name in &self.current_options {
            if let Some(option) = self.option(name)
                && option.matcher.is_match(input)
            {
                return Some((option, false));
            }
        }
        self.failsafes
            .iter()
            .find(|option| option.matcher.is_match(input))
            .map(|option| (option, true))
    }

    /// Replace the legal set with an option's configured follow-up set.
    pub fn apply_transition(&mut self, option_name: &str, next_options: &[String]) {
        log::info!(
            "npc '{}': option '{}' -> legal set {:?}",
            self.name,
            option_name,
            next_options
        );
        self.current_options = next_options.to_vec();
    }

    /// Restore the starting legal set.
    pub fn reset_options(&mut self) {
        self.current_options = self.starting_options.clone();
    }

    /// Greeting for the current talk, flipping `talked_to` on the first.
    pub fn greeting(&mut self) -> String {
        if self.talked_to {
            self.messages.on_talk.clone()
        } else {
            self.talked_to = true;
            self.messages.on_first_talk.clone()
        }
    }

    /// The player-facing option menu: non-hidden legal options, in order.
    pub fn menu(&self) -> String {
        let labels: Vec<String> = self
            .current_options
            .iter()
            .filter_map(|name| self.option(name))
            .filter(|option| !option.hidden)
            .map(|option| option.label.menu_option_style().to_string())
            .collect();
        format!("[ {} ]", labels.join(" / "))
    }

    /// What the character hands over for `offered`, if still in stock.
    pub fn ware_for(&self, offered: &str) -> Option<&str> {
        self.wares
            .iter()
            .find(|(o, _)| o == offered)
            .map(|(_, received)| received.as_str())
    }

    /// True if `offered` was ever in the trade table.
    pub fn originally_sold(&self, offered: &str) -> bool {
        self.original_wares.iter().any(|(o, _)| o == offered)
    }

    /// Drop a live trade entry after a completed exchange.
    pub fn remove_ware(&mut self, offered: &str) {
        self.wares.retain(|(o, _)| o != offered);
    }

    pub fn has_wares(&self) -> bool {
        !self.wares.is_empty()
    }

    /// The live trade table, one " offered -> received" line each.
    pub fn list_wares(&self) -> String {
        self.wares
            .iter()
            .map(|(offered, received)| format!(" {offered} -> {received}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_npc() -> Npc {
        let options = vec![
            DialogOption::new("Greeting", "How are you doing?", r"(how are you doing)(\?)?")
                .unwrap()
                .response("I am good.")
                .next(&["Greeting", "Goodbye"]),
            DialogOption::new("Goodbye", "Goodbye.", r"(good)?bye")
                .unwrap()
                .response("See you later my friend!")
                .effect(DialogEffect::EndConversation)
                .next(&["Greeting", "Goodbye"]),
        ];
        let failsafes = vec![
            DialogOption::new("Unknown", "you should not be seeing this", crate::matcher::MATCH_ALL)
                .unwrap()
                .response("You not making sense.")
                .next(&["Greeting", "Goodbye"]),
        ];
        Npc::new(
            "Old Man",
            NpcMessages::default(),
            options,
            failsafes,
            &["Greeting", "Goodbye"],
            Vec::new(),
            vec![("Dull Rock", "Shiny Rock")],
        )
        .unwrap()
    }

    #[test]
    fn select_prefers_legal_options_over_failsafes() {
        let npc = simple_npc();
        let (option, is_failsafe) = npc.select("how are you doing?").unwrap();
        assert_eq!(option.name, "Greeting");
        assert!(!is_failsafe);
        let (option, is_failsafe) = npc.select("what is a rock").unwrap();
        assert_eq!(option.name, "Unknown");
        assert!(is_failsafe);
    }

    #[test]
    fn select_ignores_options_not_currently_legal() {
        let mut npc = simple_npc();
        npc.apply_transition("test", &["Goodbye".to_string()]);
        let (option, is_failsafe) = npc.select("how are you doing?").unwrap();
        assert_eq!(option.name, "Unknown"); // Greeting no longer legal
        assert!(is_failsafe);
    }

    #[test]
    fn hidden_options_are_matchable_but_unlisted() {
        let options = vec![
            DialogOption::new("Visible", "Say hi", "hi").unwrap().next(&["Visible", "Secret"]),
            DialogOption::new("Secret", "unused", "xyzzy").unwrap().hidden().next(&["Visible", "Secret"]),
        ];
        let npc = Npc::new(
            "Hermit",
            NpcMessages::default(),
            options,
            Vec::new(),
            &["Visible", "Secret"],
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        assert!(npc.select("xyzzy").is_some());
        assert!(!npc.menu().contains("unused"));
        assert!(npc.menu().contains("Say hi"));
    }

    #[test]
    fn greeting_flips_talked_to_once() {
        let mut npc = simple_npc();
        npc.messages.on_first_talk = "first".into();
        npc.messages.on_talk = "again".into();
        assert_eq!(npc.greeting(), "first");
        assert_eq!(npc.greeting(), "again");
        assert_eq!(npc.greeting(), "again");
    }

    #[test]
    fn trade_table_tracks_sold_out_separately() {
        let mut npc = simple_npc();
        assert_eq!(npc.ware_for("Dull Rock"), Some("Shiny Rock"));
        npc.remove_ware("Dull Rock");
        assert_eq!(npc.ware_for("Dull Rock"), None);
        assert!(npc.originally_sold("Dull Rock"));
        assert!(!npc.originally_sold("Plain Stick"));
    }

    #[test]
    fn undefined_option_reference_fails_setup() {
        let options =
            vec![DialogOption::new("Only", "Only", "only").unwrap().next(&["Missing"])];
        let result = Npc::new(
            "Ghost",
            NpcMessages::default(),
            options,
            Vec::new(),
            &["Only"],
            Vec::new(),
            Vec::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_option_name_fails_setup() {
        let options = vec![
            DialogOption::new("Twin", "a", "a").unwrap(),
            DialogOption::new("Twin", "b", "b").unwrap(),
        ];
        assert!(
            Npc::new("Ghost", NpcMessages::default(), options, Vec::new(), &[], Vec::new(), Vec::new()).is_err()
        );
    }
}
