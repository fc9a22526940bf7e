#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Tideway **
//! Island adventure on a tide-locked clock

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use log::info;

use tideway::repl::{InputManager, ReplControl, title_menu};
use tideway::style::GameStyle;
use tideway::view::View;
use tideway::{build_world, load_game_text, run_repl};

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: loading game text...");
    let text = load_game_text("data/game.toml").context("while loading game text")?;
    let line_wrap = text.config.line_wrap;
    let mut world = build_world(text).context("while building the island")?;
    info!("island world built successfully");

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush()?;

    let title = fs::read_to_string("data/title.txt").context("while reading data/title.txt")?;
    println!("{}", title.title_style());

    {
        let mut view = View::with_width(line_wrap);
        let mut inputs = InputManager::new();
        if let ReplControl::Quit = title_menu(&mut world, &mut inputs, &mut view)? {
            return Ok(());
        }
    }

    let introduction = fs::read_to_string("data/intro.txt").context("while reading data/intro.txt")?;
    println!("\n{}", introduction.trim_end().description_style());
    info!("starting the game");

    run_repl(&mut world)
}
