//! Global game text and configuration.
//!
//! Every message key the engine can emit is an explicit, typed field -- no
//! open-ended key/value bags. The structs deserialize from `data/game.toml`
//! with unknown or missing keys rejected, so a content typo fails at startup
//! instead of mid-game. The `Default` impls carry the stock English strings
//! and are what tests and the built-in world use.

use serde::Deserialize;

/// Presentation knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameConfig {
    /// Maximum output line width before wrapping.
    pub line_wrap: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { line_wrap: 100 }
    }
}

/// Standard (non-error) global messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameMessages {
    pub player_did_nothing: String,
    /// Shown after waiting; `{time}` is replaced with the new time-of-day.
    pub time_passes: String,
    pub inventory_empty: String,
    /// Prefix for a non-empty inventory listing; the item list is appended.
    pub inventory_contains: String,
    pub help_intro: String,
    pub exit_confirm: String,
    pub exit_farewell: String,
    pub settings_menu: String,
    pub not_understood_reply: String,
    pub title_menu: String,
}

impl Default for GameMessages {
    fn default() -> Self {
        Self {
            player_did_nothing: "You did nothing.".into(),
            time_passes: "Time passes. It is now {time}.".into(),
            inventory_empty: "Your inventory is empty.".into(),
            inventory_contains: "Your inventory contains".into(),
            help_intro: "This is the help message. To play the game, type commands to interact with your surroundings. Here are some suggestions:".into(),
            exit_confirm: "Are you sure you want to exit? y/n".into(),
            exit_farewell: "Thanks for playing!".into(),
            settings_menu: "\"settings\" - show this message again\n\"return\" - return to the game".into(),
            not_understood_reply: "Sorry, I don't understand.".into(),
            title_menu: "Type \"start\", \"exit\", or \"settings\".".into(),
        }
    }
}

/// Messages for things the player did wrong or that made no sense.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameErrors {
    /// Direction keyword with no recognizable direction.
    pub unknown_dir: String,
    /// Character name not recognized.
    pub unknown_npc: String,
    /// Item reference not recognized.
    pub unknown_item: String,
    /// "use A on B" with an invalid pairing.
    pub invalid_item_use: String,
    /// Item exists but can't be used right now.
    pub cannot_use_item: String,
    /// Item to take isn't in the current room.
    pub cannot_take_item: String,
    /// Item can never be picked up.
    pub cannot_carry_item: String,
    /// Item already held when trying to take it.
    pub item_already_in_inv: String,
    /// Item not held when trying to drop it.
    pub item_not_in_inv: String,
    /// Input matched nothing but the universal catch-all.
    pub unknown_cmd: String,
    /// Default "you can't go that way" when an exit is missing or closed.
    pub no_path: String,
}

impl Default for GameErrors {
    fn default() -> Self {
        Self {
            unknown_dir: "Which way do you want to go?".into(),
            unknown_npc: "Who?".into(),
            unknown_item: "You can't do that.".into(),
            invalid_item_use: "You can't use it that way.".into(),
            cannot_use_item: "You can't seem to use that.".into(),
            cannot_take_item: "I don't see that in here.".into(),
            cannot_carry_item: "You can't carry that!".into(),
            item_already_in_inv: "You're already carrying that!".into(),
            item_not_in_inv: "You're not carrying that item.".into(),
            unknown_cmd: "Command not recognized.".into(),
            no_path: "You can't go that way.".into(),
        }
    }
}

/// All authored global text, as loaded at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GameText {
    #[serde(default)]
    pub config: GameConfig,
    pub messages: GameMessages,
    pub errors: GameErrors,
}
