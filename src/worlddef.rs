//! The authored island: every room, link, item, and character.
//!
//! Everything here is content. The engine modules know nothing about the
//! island; this module knows nothing about matching or dispatch beyond the
//! patterns it hands to [`Command`] and [`DialogOption`].

use anyhow::{Context, Result};

use crate::command::{Command, Effect};
use crate::direction::Direction;
use crate::item::{Item, ItemAttrs, ItemMessages, UseTarget};
use crate::matcher::{KEYWORDS, MATCH_ALL, union};
use crate::npc::{DialogEffect, DialogOption, Npc, NpcMessages};
use crate::room::{Room, RoomText};
use crate::text::GameText;
use crate::timecycle::island_cycle;
use crate::world::World;

/// Where the player wakes up.
pub const START_ROOM: &str = "Northeast Coast";

/// Build the island world in its starting state.
///
/// # Errors
/// Fails if any authored pattern doesn't compile or a dialogue graph is
/// inconsistent; both abort startup.
pub fn build_world(text: GameText) -> Result<World> {
    let mut world = World::new(text, island_cycle())?;
    add_rooms(&mut world);
    add_links(&mut world)?;
    add_items(&mut world)?;
    add_characters(&mut world)?;
    world.current_room = START_ROOM.to_string();
    world
        .rooms
        .get_mut(START_ROOM)
        .context("start room missing from world")?
        .visited = true;
    Ok(world)
}

fn add_rooms(world: &mut World) {
    let rooms = [
        (
            "Northeast Coast", // where the player starts
            "You reached the northeast coast.",
            "You reached the northeast coast.",
            "Nothing here but sand and your footprints.",
            "You are on the beach.",
        ),
        (
            "Cliff Top",
            "You climbed up to the top of a low cliff overlooking the water.",
            "You reached the cliff top.",
            "Waves slap the rocks far below. A worn path leads south toward a pond, and the ground rises to the east.",
            "You are on the cliff top.",
        ),
        (
            "Cliff Coast",
            "You reached a narrow strip of beach pinned between the cliff and the sea.",
            "You reached the cliff coast.",
            "The cliff looms over you. The sand here is coarse and strewn with broken shells.",
            "You are on the cliff coast.",
        ),
        (
            "Saltwater Pond",
            "You came upon a still pond of brackish water ringed with reeds.",
            "You reached the saltwater pond.",
            "The pond barely moves. Dragonflies skim the surface, and trails lead off in several directions.",
            "You are at the saltwater pond.",
        ),
        (
            "Southeast Coast",
            "You reached the southeast coast of the island.",
            "You reached the southeast coast.",
            "Across a shallow channel to the southeast sits a tiny islet. At the right tide you could wade across.",
            "You are on the southeast coast.",
        ),
        (
            "Southeast Island",
            "You waded across the channel onto a tiny islet of rock and scrub.",
            "You reached the southeast island.",
            "The islet is barely fifty paces across. The main island looks strangely far away from here.",
            "You are on the southeast island.",
        ),
        (
            "Cove",
            "You reached a sheltered cove where the water lies flat and clear.",
            "You reached the cove.",
            "The cove curls around you. In the rock face to the north there is a dark opening at the waterline.",
            "You are at the cove.",
        ),
        (
            "Hermit Cave",
            "You ducked through the opening into a dim, dry cave that smells of woodsmoke.",
            "You entered the hermit cave.",
            "Someone lives here, or did. A fire ring, a sleeping mat, and shelves of scavenged junk line the walls.",
            "You are in the hermit cave.",
        ),
        (
            "Southern Coast",
            "You reached the southern coast of the island.",
            "You reached the southern coast.",
            "The beach here faces the open sea. Driftwood lies scattered as far as you can see.",
            "You are on the southern coast.",
        ),
        (
            "Southwest Coast",
            "You reached the southwestern coast of the island.",
            "You reached the southwest coast.",
            "You are on the southwest coast. There is an underwater sandbar to the east.",
            "You are on the southwest coast.",
        ),
        (
            "Abandoned Dock",
            "You swam out to a rotting wooden dock standing alone in the water.",
            "You reached the abandoned dock.",
            "The pilings are furred with barnacles. Whatever boats moored here are long gone.",
            "You are on the abandoned dock.",
        ),
        (
            "Field",
            "You stepped out of the sand into an open field of tall grass.",
            "You reached the field.",
            "The grass reaches your waist. A few palms stand near the middle of the field.",
            "You are in the field.",
        ),
        (
            "Shipwreck",
            "Ahead of you, half-buried in the sand, lies a broken fiberglass boat.",
            "You reached the shipwreck.",
            "You are at the shipwreck on the western side of the island. The boat is still in fair condition, \
             aside from the fact that it's been cracked open like an egg. Walking around to the back, you notice \
             a faded inscription: \"King of the Blue Tides\". A small supply crate lies next to the wreck. \
             An underwater sandbar extends to the west, the beach extends far to the northeast and southeast, \
             and there is an open field to the east.",
            "You are at the shipwreck.",
        ),
        (
            "Western Coast",
            "You reached the western coast of the island.",
            "You reached the western coast.",
            "There is an underwater sandbar to the east, and nothing but the ocean to the west.",
            "You are on the western coast.",
        ),
        (
            "Northwest Coast",
            "You reached the northwest coast of the island.",
            "You reached the northwest coast.",
            "To the southwest, you can barely make out a dark shape sticking out of the sand, and the beach stretches northeast.",
            "You are on the northwest coast.",
        ),
        (
            "North Coast",
            "You reached the north coast of the island.",
            "You reached the northernmost coast.",
            "The beach stretches as far as the eye can see to the southwest and southeast.",
            "You are on the northern coast.",
        ),
        (
            "Woods 1",
            "You pushed into a stand of crooked trees hung with vines.",
            "You entered the western woods.",
            "The canopy lets through only scraps of light. Paths wander east and south.",
            "You are in the woods.",
        ),
        (
            "Woods 2",
            "You entered a darker stretch of woods where the trees grow close together.",
            "You entered the deep woods.",
            "Roots cross the ground everywhere. You can just make out brighter ground to the southeast.",
            "You are in the deep woods.",
        ),
        (
            "Clearing",
            "You stepped into a round clearing carpeted with short grass.",
            "You reached the clearing.",
            "The sky opens above you. The woods close in again on every side.",
            "You are in the clearing.",
        ),
        (
            "Mountain South",
            "You reached the rocky southern base of the mountain.",
            "You reached the mountain's south face.",
            "Loose scree slopes away below you. A trail climbs to the north.",
            "You are at the south face of the mountain.",
        ),
        (
            "Mountain East",
            "You reached the eastern base of the mountain.",
            "You reached the mountain's east face.",
            "Bare rock rises to the northwest. The cliff top and the pond lie back the way you came.",
            "You are at the east face of the mountain.",
        ),
        (
            "Mountain Trail",
            "You found a narrow trail switchbacking up the mountainside.",
            "You are back on the mountain trail.",
            "The trail climbs north toward the summit and drops south toward the base.",
            "You are on the mountain trail.",
        ),
        (
            "Mountain Summit",
            "You hauled yourself onto the summit. The whole island lies spread out below you.",
            "You reached the summit.",
            "From up here you can see every coast at once, and nothing but water beyond them.",
            "You are on the mountain summit.",
        ),
    ];
    for (name, first, enter, look, stay) in rooms {
        world
            .rooms
            .insert(name.to_string(), Room::new(name, RoomText::new(first, enter, look, stay)));
    }
}

fn add_links(world: &mut World) -> Result<()> {
    let low: Vec<String> = world.clock.low_tide_states().to_vec();
    let high: Vec<String> = world.clock.high_tide_states().to_vec();
    let low: Vec<&str> = low.iter().map(String::as_str).collect();
    let high: Vec<&str> = high.iter().map(String::as_str).collect();

    use Direction::{East, North, Northeast, Northwest, South, Southeast, Southwest, West};
    let always: &[&str] = &[];
    let links: [(&str, Direction, &str, &[&str]); 29] = [
        ("Northeast Coast", Southeast, "Cliff Coast", always),
        ("Northeast Coast", South, "Cliff Top", always),
        ("Northeast Coast", Northwest, "North Coast", always),
        ("Cliff Coast", Southwest, "Saltwater Pond", always),
        ("Cliff Top", East, "Mountain East", always),
        ("Cliff Top", South, "Saltwater Pond", always),
        ("North Coast", Southwest, "Northwest Coast", always),
        ("Saltwater Pond", Northwest, "Mountain East", always),
        ("Saltwater Pond", Southeast, "Southeast Coast", always),
        ("Mountain East", Northwest, "Mountain Trail", always),
        ("Northwest Coast", Southwest, "Shipwreck", always),
        ("Northwest Coast", Southeast, "Woods 2", always),
        ("Southeast Coast", Southeast, "Southeast Island", &low),
        ("Southeast Coast", West, "Cove", always),
        ("Mountain Trail", North, "Mountain Summit", always),
        ("Mountain Trail", South, "Mountain South", always),
        ("Shipwreck", West, "Western Coast", &low),
        ("Shipwreck", East, "Field", always),
        ("Shipwreck", Southeast, "Southwest Coast", always),
        ("Woods 2", Northeast, "Mountain South", always),
        ("Woods 2", Southwest, "Woods 1", always),
        ("Woods 2", Southeast, "Clearing", always),
        ("Cove", North, "Hermit Cave", &low),
        ("Cove", South, "Southern Coast", always),
        ("Field", Southeast, "Woods 1", always),
        ("Woods 1", East, "Clearing", always),
        ("Woods 1", South, "Southwest Coast", always),
        ("Southwest Coast", Southeast, "Southern Coast", always),
        ("Southwest Coast", Southwest, "Abandoned Dock", &high),
    ];
    for (a, dir, b, times) in links {
        world.link_rooms(a, dir, b, true, times)?;
    }

    set_barred(world, "Southeast Coast", Southeast, "The channel is too deep to wade across right now.");
    set_barred(world, "Shipwreck", West, "The sandbar is underwater right now.");
    set_barred(world, "Cove", North, "The cave mouth is flooded.");
    set_barred(world, "Southwest Coast", Southwest, "The dock is out of reach until the water rises.");
    Ok(())
}

fn set_barred(world: &mut World, room: &str, dir: Direction, msg: &str) {
    if let Some(edge) = world.rooms.get_mut(room).and_then(|r| r.exits[dir.slot()].as_mut()) {
        edge.set_barred_msg(Some(msg.to_string()));
    }
}

fn add_items(world: &mut World) -> Result<()> {
    let items = vec![
        Item::new(
            "Dull Rock",
            "(dull )?rock",
            "a dull rock",
            ItemAttrs {
                can_carry: true,
                can_use: false,
                always_usable: false,
            },
            ItemMessages {
                on_take: Some("You picked up the dull rock.".into()),
                on_drop: Some("You dropped the dull rock.".into()),
                on_inspect: "This rock is very dull and has some grains of sand stuck to it.".into(),
                on_use: None,
                invalid_use: Some("You can't use the dull rock that way.".into()),
            },
            Vec::new(),
            Vec::new(),
        )?,
        Item::new(
            "Shiny Rock",
            "shiny rock",
            "a shiny rock",
            ItemAttrs {
                can_carry: true,
                can_use: false,
                always_usable: false,
            },
            ItemMessages {
                on_take: Some("You picked up the shiny rock.".into()),
                on_drop: Some("You dropped the shiny rock.".into()),
                on_inspect: "This rock is very shiny. You bought it from the old man.".into(),
                on_use: None,
                invalid_use: Some("You can't use the shiny rock that way.".into()),
            },
            Vec::new(),
            Vec::new(),
        )?,
        Item::new(
            "Supply Crate",
            "(supply )?crate",
            "a supply crate",
            ItemAttrs {
                can_carry: false,
                can_use: false,
                always_usable: false,
            },
            ItemMessages {
                on_take: None,
                on_drop: None,
                on_inspect: "A small plastic supply crate, scuffed but intact. The lid is held shut by a single latch."
                    .into(),
                on_use: None,
                invalid_use: Some("The crate just sits there.".into()),
            },
            Vec::new(),
            vec![Command::new(
                "Open Supply Crate",
                r"(open|pry open|unlatch) (the )?(supply )?crate",
                Effect::RevealItem {
                    item: "Rusty Knife".into(),
                    room: "Shipwreck".into(),
                    on_reveal: "You flip the latch and lift the lid. Inside, under a coil of rotten rope, lies a rusty knife."
                        .into(),
                    on_repeat: "Nothing left inside but the rotten rope.".into(),
                },
            )?],
        )?,
        Item::new(
            "Rusty Knife",
            "(rusty )?knife",
            "a rusty knife",
            ItemAttrs {
                can_carry: true,
                can_use: true,
                always_usable: false,
            },
            ItemMessages {
                on_take: Some("You took the rusty knife.".into()),
                on_drop: Some("You dropped the rusty knife.".into()),
                on_inspect: "The blade is pitted with rust but still holds an edge.".into(),
                on_use: None,
                invalid_use: Some("The knife is no good for that.".into()),
            },
            vec![UseTarget {
                name: "Coconut".into(),
                pattern: "(the )?coconut".into(),
                effect: Effect::Emit(
                    "You wedge the blade under the husk and twist. The coconut cracks open and you drink the sweet water inside."
                        .into(),
                ),
            }],
            Vec::new(),
        )?,
        Item::new(
            "Coconut",
            "coconut",
            "a coconut",
            ItemAttrs {
                can_carry: true,
                can_use: false,
                always_usable: false,
            },
            ItemMessages {
                on_take: Some("You picked up the coconut.".into()),
                on_drop: Some("You dropped the coconut.".into()),
                on_inspect: "A green coconut, heavy with water. The husk is far too tough for bare hands.".into(),
                on_use: None,
                invalid_use: Some("You can't use the coconut that way.".into()),
            },
            Vec::new(),
            Vec::new(),
        )?,
    ];
    for item in items {
        world.items.insert(item.name.clone(), item);
    }

    for (item, room) in [
        ("Dull Rock", "Northeast Coast"),
        ("Supply Crate", "Shipwreck"),
        ("Coconut", "Field"),
    ] {
        world
            .rooms
            .get_mut(room)
            .with_context(|| format!("room '{room}' missing while placing items"))?
            .add_item(item);
    }
    Ok(())
}

fn add_characters(world: &mut World) -> Result<()> {
    let base: &[&str] = &["Greeting", "Location", "Shop", "Goodbye", "Dull Rock -> Shiny Rock"];
    let with_beach: &[&str] = &[
        "Greeting",
        "Location",
        "Beach Location",
        "Shop",
        "Goodbye",
        "Dull Rock -> Shiny Rock",
    ];

    let sell_rock = union(&[
        format!("{} (dull )?rock( to old man)?", KEYWORDS.sell_item),
        format!("{} shiny rock( from old man)?", KEYWORDS.buy_item),
    ]);
    let sell_anything = union(&[
        format!("{}.*( to old man)?", KEYWORDS.sell_item),
        format!("{}.*( from old man)?", KEYWORDS.buy_item),
    ]);

    let options = vec![
        DialogOption::new("Greeting", "How are you doing?", r"(how are you doing)(\?)?")?
            .response("I am good.")
            .next(base),
        DialogOption::new("Location", "Where am I?", r"(where (am i)|(are we))(\?)?")?
            .response("We are on the beach my friend.")
            .next(with_beach),
        DialogOption::new("Beach Location", "Where is the beach?", r"where is the beach(\?)?")?
            .response("Beach is on the island.")
            .next(base),
        DialogOption::new("Shop", "What's for sale?", r"(what's for sale)(\?)?")?
            .effect(DialogEffect::ListWares)
            .next(base),
        DialogOption::new("Goodbye", "Goodbye.", r"(good)?bye")?
            .effect(DialogEffect::EndConversation)
            .next(base),
        DialogOption::new("Dull Rock -> Shiny Rock", "Buy Shiny Rock", &sell_rock)?
            .hidden()
            .effect(DialogEffect::Trade {
                offered: "Dull Rock".into(),
            })
            .next(base),
    ];
    let failsafes = vec![
        DialogOption::new("Buy/Sell Unknown Item", "Buy Shiny Rock", &sell_anything)?
            .hidden()
            .response("Not for sale habibi.")
            .next(base),
        DialogOption::new("Unknown", "you should not be seeing this", MATCH_ALL)?
            .hidden()
            .response("You not making sense.")
            .next(base),
    ];
    let commands = vec![
        Command::new(
            "Talk to Old Man",
            &format!("{} (the )?old man", KEYWORDS.talk_to),
            Effect::TalkTo("Old Man".into()),
        )?,
        Command::new(
            "Sell Dull Rock to Old Man",
            &sell_rock,
            Effect::TradeWith {
                npc: "Old Man".into(),
                offered: "Dull Rock".into(),
            },
        )?,
        Command::new("Sell Unknown Item to Old Man", &sell_anything, Effect::Emit("Not for sale habibi.".into()))?,
    ];

    let old_man = Npc::new(
        "Old Man",
        NpcMessages {
            on_first_talk: "Hello, I am Sadim. How are you doing my friend?".into(),
            on_talk: "Hello again habibi, how you doing today?".into(),
            on_leave: "My brother have a good day!".into(),
            failed_sale: "My brother are you bull shitting?? You don't have that one habibi so nothing for you.".into(),
            unknown_ware: "You so crazy you not making sense habibi. Don't know what that one is.".into(),
            out_of_stock: "No longer for sale my brother.".into(),
            wares_header: "Here is what I have today my friend:".into(),
            no_wares: "Nothing for sale today habibi :(".into(),
        },
        options,
        failsafes,
        base,
        commands,
        vec![("Dull Rock", "Shiny Rock")],
    )?;
    world.npcs.insert(old_man.name.clone(), old_man);
    world
        .rooms
        .get_mut("Northeast Coast")
        .context("room 'Northeast Coast' missing while placing characters")?
        .add_npc("Old Man");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Blocked;

    #[test]
    fn island_builds_cleanly() {
        let world = build_world(GameText::default()).unwrap();
        assert_eq!(world.rooms.len(), 23);
        assert_eq!(world.current_room, START_ROOM);
        assert!(world.rooms[START_ROOM].visited);
        assert!(world.rooms[START_ROOM].contains_item("Dull Rock"));
        assert!(world.rooms[START_ROOM].npcs.contains(&"Old Man".to_string()));
        assert!(world.inventory.is_empty());
    }

    #[test]
    fn every_link_is_reciprocal() {
        let world = build_world(GameText::default()).unwrap();
        for (name, room) in &world.rooms {
            for dir in Direction::ALL {
                if let Some(edge) = room.exit(dir) {
                    let back = world.rooms[&edge.to]
                        .exit(dir.reverse())
                        .unwrap_or_else(|| panic!("no reverse edge from '{}' back to '{name}'", edge.to));
                    assert_eq!(&back.to, name);
                }
            }
        }
    }

    #[test]
    fn tide_gated_edges_open_only_in_their_window() {
        let mut world = build_world(GameText::default()).unwrap();
        world.current_room = "Shipwreck".to_string();
        // Afternoon start: sandbar submerged
        assert_eq!(world.try_move(Direction::West), Err(Blocked::ClosedAtThisTime));
        world.clock.advance(); // Evening, low tide
        assert_eq!(world.try_move(Direction::West).unwrap(), "Western Coast");

        world.current_room = "Southwest Coast".to_string();
        assert_eq!(world.try_move(Direction::Southwest), Err(Blocked::ClosedAtThisTime));
        for _ in 0..4 {
            world.clock.advance(); // Sunrise, high tide
        }
        assert_eq!(world.clock.current().name, "Sunrise");
        assert_eq!(world.try_move(Direction::Southwest).unwrap(), "Abandoned Dock");
    }

    #[test]
    fn hidden_options_stay_out_of_the_menu() {
        let world = build_world(GameText::default()).unwrap();
        let menu = world.npcs["Old Man"].menu();
        assert!(menu.contains("How are you doing?"));
        assert!(menu.contains("Goodbye."));
        assert!(!menu.contains("Buy Shiny Rock"));
    }

    #[test]
    fn supply_crate_reveals_the_knife_once() {
        let mut world = build_world(GameText::default()).unwrap();
        world.current_room = "Shipwreck".to_string();
        let mut view = crate::view::View::with_width(100);
        world.dispatch("open the crate", &mut view).unwrap();
        assert!(view.take_lines()[0].contains("rusty knife"));
        assert!(world.rooms["Shipwreck"].contains_item("Rusty Knife"));

        world.dispatch("open the crate", &mut view).unwrap();
        assert_eq!(view.take_lines(), vec!["Nothing left inside but the rotten rope."]);

        // the count stays at one even after carrying it elsewhere
        world.dispatch("take knife", &mut view).unwrap();
        world.dispatch("open crate", &mut view).unwrap();
        assert!(world.in_inventory("Rusty Knife"));
        assert!(!world.rooms["Shipwreck"].contains_item("Rusty Knife"));
    }
}
