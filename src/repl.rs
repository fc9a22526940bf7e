//! The game's read-eval-print loops.
//!
//! One main turn loop, plus the nested loops it can drop into: conversations,
//! the settings menu, the exit confirmation, and the pre-game title menu.
//! Each nested loop owns the prompt until it resolves, so a turn never
//! interleaves with a menu.

mod input;

use anyhow::{Context, Result};
use log::info;

use crate::command::TurnOutcome;
use crate::view::View;
use crate::world::{DialogueOutcome, World};

pub use input::{InputEvent, InputManager};

/// Control flow signal used by menus to exit the REPL.
pub enum ReplControl {
    Continue,
    Quit,
}

const PROMPT: &str = "\n> ";

/// Run the main turn loop until the player confirms quitting.
///
/// # Errors
/// Propagates input failures and world-state errors from dispatch.
pub fn run_repl(world: &mut World) -> Result<()> {
    let mut view = View::with_width(world.text.config.line_wrap);
    let mut inputs = InputManager::new();
    loop {
        let prompt = if world.flags.show_stay_message {
            format!("\n  {}\n{PROMPT}", world.current_room_ref()?.text.on_stay)
        } else {
            PROMPT.to_string()
        };
        let line = match inputs.read_line(&prompt)? {
            InputEvent::Line(line) => line,
            // ^C / ^D ask for confirmation instead of dying mid-game
            InputEvent::Eof | InputEvent::Interrupted => {
                if let ReplControl::Quit = confirm_exit(world, &mut inputs, &mut view)? {
                    break;
                }
                continue;
            }
        };

        let outcome = world.dispatch(&line, &mut view)?;
        view.flush();
        match outcome {
            TurnOutcome::Continue => {}
            TurnOutcome::Conversation(npc) => run_conversation(world, &npc, &mut inputs, &mut view)?,
            TurnOutcome::Settings => settings_menu(world, &mut inputs, &mut view)?,
            TurnOutcome::QuitRequested => {
                if let ReplControl::Quit = confirm_exit(world, &mut inputs, &mut view)? {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// The pre-game title menu: start, exit, or settings.
///
/// # Errors
/// Propagates input failures.
pub fn title_menu(world: &mut World, inputs: &mut InputManager, view: &mut View) -> Result<ReplControl> {
    loop {
        view.push(world.text.messages.title_menu.clone());
        view.flush();
        let line = match inputs.read_line(PROMPT)? {
            InputEvent::Line(line) => line.trim().to_lowercase(),
            InputEvent::Eof | InputEvent::Interrupted => "exit".to_string(),
        };
        match line.as_str() {
            "start" => return Ok(ReplControl::Continue),
            "exit" => return Ok(ReplControl::Quit),
            "settings" => settings_menu(world, inputs, view)?,
            _ => {}
        }
    }
}

/// Talk with a character until the conversation ends.
///
/// The character greets the player (first-time and repeat greetings differ),
/// then the visible option menu is reprinted after every exchange.
fn run_conversation(world: &mut World, npc_name: &str, inputs: &mut InputManager, view: &mut View) -> Result<()> {
    info!("conversation with '{npc_name}' started");
    let greeting = world
        .npcs
        .get_mut(npc_name)
        .with_context(|| format!("npc '{npc_name}' not found for conversation"))?
        .greeting();
    view.push(greeting);
    view.push(world.npcs[npc_name].menu());
    view.flush();
    loop {
        let line = match inputs.read_line(PROMPT)? {
            InputEvent::Line(line) => line,
            InputEvent::Eof | InputEvent::Interrupted => "bye".to_string(),
        };
        match world.dialogue_step(npc_name, &line, view)? {
            DialogueOutcome::Ended => {
                view.flush();
                break;
            }
            DialogueOutcome::Continue => {
                view.push(world.npcs[npc_name].menu());
                view.flush();
            }
        }
    }
    info!("conversation with '{npc_name}' ended");
    Ok(())
}

/// The settings menu; "return" leaves it, re-enabling the stay message.
fn settings_menu(world: &mut World, inputs: &mut InputManager, view: &mut View) -> Result<()> {
    world.flags.show_stay_message = false;
    view.push(world.text.messages.settings_menu.clone());
    view.flush();
    loop {
        let line = match inputs.read_line(PROMPT)? {
            InputEvent::Line(line) => line.trim().to_lowercase(),
            InputEvent::Eof | InputEvent::Interrupted => "return".to_string(),
        };
        match line.as_str() {
            "settings" => {
                view.push(world.text.messages.settings_menu.clone());
                view.flush();
            }
            "return" => {
                world.flags.show_stay_message = true;
                return Ok(());
            }
            _ => {
                view.push(world.text.messages.not_understood_reply.clone());
                view.flush();
            }
        }
    }
}

/// Ask the player to confirm quitting; anything but y/n re-asks.
fn confirm_exit(world: &mut World, inputs: &mut InputManager, view: &mut View) -> Result<ReplControl> {
    world.flags.show_stay_message = false;
    view.push(world.text.messages.exit_confirm.clone());
    view.flush();
    loop {
        let line = match inputs.read_line(PROMPT)? {
            InputEvent::Line(line) => line.trim().to_lowercase(),
            InputEvent::Eof | InputEvent::Interrupted => "y".to_string(),
        };
        match line.as_str() {
            "y" | "yes" => {
                view.push(world.text.messages.exit_farewell.clone());
                view.flush();
                info!("player confirmed exit");
                return Ok(ReplControl::Quit);
            }
            "n" | "no" => {
                world.flags.show_stay_message = true;
                return Ok(ReplControl::Continue);
            }
            _ => {
                view.push(world.text.messages.not_understood_reply.clone());
                view.flush();
            }
        }
    }
}
