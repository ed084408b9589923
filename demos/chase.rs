//! Headless chase: a hunter with limited sight tracks a wandering player.
//!
//! Usage: `chase [seed]`. Every frame runs the systems through
//! `EcsEngine::update` and prints the map as ASCII.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use lazarus_core::Position2D;
use lazarus_ecs::{EcsEngine, EntityId, EventListener, Updateable};
use lazarus_paths::{Search, SearchState};
use lazarus_rl::{Dice, FovAlgorithm, MapConfig, SquareGridMap, fov};
use rand::rngs::StdRng;

const MAX_FRAMES: usize = 60;

const LAYOUT: [&str; 9] = [
    "####################",
    "#......#...........#",
    "#......#....####...#",
    "#..........#.......#",
    "#####..#...#...#####",
    "#......#...#.......#",
    "#..#####...####....#",
    "#..................#",
    "####################",
];

// -------------------------------------------------------------------------
// Components
// -------------------------------------------------------------------------

struct Glyph(char);

struct Player;

struct Hunter {
    target: Option<Position2D>,
}

struct Sight {
    range: i32,
    algorithm: FovAlgorithm,
    visible: BTreeSet<Position2D>,
}

// -------------------------------------------------------------------------
// Events
// -------------------------------------------------------------------------

struct Spotted {
    hunter: EntityId,
    at: Position2D,
}

struct Caught {
    hunter: EntityId,
    prey: EntityId,
}

// -------------------------------------------------------------------------
// Systems
// -------------------------------------------------------------------------

/// Moves players to a random walkable neighbour.
struct Wander {
    map: Rc<SquareGridMap>,
    dice: RefCell<Dice<StdRng>>,
}

impl Updateable for Wander {
    fn update(&self, engine: &mut EcsEngine) {
        let map: &SquareGridMap = &self.map;
        let mut dice = self.dice.borrow_mut();
        engine.apply_to_each::<(Position2D, Player), _>(false, |_, (pos, _)| {
            // stand still now and then
            if dice.one_in(4) {
                return;
            }
            if let Ok(options) = map.neighbours(*pos) {
                if let Some(&next) = dice.choose(&options) {
                    *pos = next;
                }
            }
        });
    }
}

/// Recomputes field of view and reports players in sight.
struct Vision {
    map: Rc<SquareGridMap>,
}

impl Updateable for Vision {
    fn update(&self, engine: &mut EcsEngine) {
        let prey: Vec<Position2D> = engine
            .entities_with_components::<(Position2D, Player)>(false)
            .iter()
            .filter_map(|e| e.get::<Position2D>().copied())
            .collect();

        let map: &SquareGridMap = &self.map;
        let mut spotted = Vec::new();
        engine.apply_to_each::<(Position2D, Sight), _>(false, |view, (pos, sight)| {
            sight.visible = fov(*pos, sight.range, map, sight.algorithm);
            for &at in &prey {
                if sight.visible.contains(&at) {
                    spotted.push(Spotted {
                        hunter: view.id(),
                        at,
                    });
                }
            }
        });

        for event in &spotted {
            engine.emit(event);
        }
    }
}

/// Remembers where each hunter last saw a player.
struct Tracker;

impl EventListener<Spotted> for Tracker {
    fn receive(&self, engine: &mut EcsEngine, event: &Spotted) {
        if let Some(hunter) = engine
            .get_entity_mut(event.hunter)
            .and_then(|e| e.get_mut::<Hunter>())
        {
            hunter.target = Some(event.at);
        }
    }
}

/// Steps each hunter one tile along an A* path to its target.
struct Chase {
    map: Rc<SquareGridMap>,
}

impl Updateable for Chase {
    fn update(&self, engine: &mut EcsEngine) {
        let prey: Vec<(EntityId, Position2D)> = engine
            .entities_with_components::<(Position2D, Player)>(false)
            .iter()
            .filter_map(|e| e.get::<Position2D>().map(|p| (e.id(), *p)))
            .collect();

        let map: &SquareGridMap = &self.map;
        let mut caught = Vec::new();
        engine.apply_to_each::<(Position2D, Hunter), _>(false, |view, (pos, hunter)| {
            let Some(target) = hunter.target else {
                return;
            };
            let mut search = Search::astar(map, *pos, target);
            if search.execute() == Ok(SearchState::Success) {
                if let Some(&step) = search.path().ok().and_then(<[_]>::first) {
                    *pos = step;
                }
            }
            if *pos == target {
                hunter.target = None;
            }
            for &(prey_id, at) in &prey {
                if at == *pos {
                    caught.push(Caught {
                        hunter: view.id(),
                        prey: prey_id,
                    });
                }
            }
        });

        for event in &caught {
            engine.emit(event);
        }
    }
}

/// Removes caught players and keeps a record of the catches.
#[derive(Default)]
struct Referee {
    catches: RefCell<Vec<(EntityId, EntityId)>>,
}

impl EventListener<Caught> for Referee {
    fn receive(&self, engine: &mut EcsEngine, event: &Caught) {
        if let Some(prey) = engine.get_entity_mut(event.prey) {
            prey.mark_for_deletion();
            self.catches.borrow_mut().push((event.hunter, event.prey));
        }
    }
}

// -------------------------------------------------------------------------
// Setup and rendering
// -------------------------------------------------------------------------

fn prefab() -> Vec<Vec<i32>> {
    LAYOUT
        .iter()
        .map(|row| row.chars().map(|c| i32::from(c != '#')).collect())
        .collect()
}

fn render(map: &SquareGridMap, engine: &EcsEngine) -> String {
    let mut rows: Vec<Vec<char>> = map
        .to_string()
        .lines()
        .map(|line| line.chars().collect())
        .collect();

    for sight in engine
        .entities_with_components::<(Sight,)>(false)
        .iter()
        .filter_map(|e| e.get::<Sight>())
    {
        for p in &sight.visible {
            if map.is_walkable(*p) {
                rows[p.y as usize][p.x as usize] = ',';
            }
        }
    }

    for entity in engine.entities_with_components::<(Position2D, Glyph)>(false) {
        if let (Some(p), Some(glyph)) = (entity.get::<Position2D>(), entity.get::<Glyph>()) {
            rows[p.y as usize][p.x as usize] = glyph.0;
        }
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>() + "\n")
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let seed: u64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 7,
    };

    let config = MapConfig::default()
        .with_diagonals(true)
        .with_prefab(prefab());
    let map = Rc::new(config.build()?);
    let algorithm: FovAlgorithm = "simple".parse()?;

    let mut engine = EcsEngine::new();

    let player = engine
        .add_entity()
        .add_component(Position2D::new(17, 7))?
        .add_component(Player)?
        .add_component(Glyph('@'))?
        .id();

    let hunter = engine.add_entity();
    hunter.add_component(Position2D::new(2, 1))?;
    hunter.add_component(Hunter { target: None })?;
    hunter.add_component(Sight {
        range: 7,
        algorithm,
        visible: BTreeSet::new(),
    })?;
    hunter.add_component(Glyph('h'))?;

    let wander = Rc::new(Wander {
        map: Rc::clone(&map),
        dice: RefCell::new(Dice::seeded(seed)),
    });
    let vision = Rc::new(Vision {
        map: Rc::clone(&map),
    });
    let chase = Rc::new(Chase {
        map: Rc::clone(&map),
    });
    let tracker = Rc::new(Tracker);
    let referee = Rc::new(Referee::default());

    engine.register_updateable(&wander);
    engine.register_updateable(&vision);
    engine.register_updateable(&chase);
    engine.subscribe::<Spotted, _>(&tracker);
    engine.subscribe::<Caught, _>(&referee);

    for frame in 1..=MAX_FRAMES {
        engine.update();
        println!("frame {frame}");
        print!("{}", render(&map, &engine));
        if engine.get_entity(player).is_none() {
            break;
        }
    }

    match referee.catches.borrow().first() {
        Some((hunter, prey)) => println!("hunter {hunter} caught player {prey}"),
        None => println!("the player got away after {MAX_FRAMES} frames"),
    }
    Ok(())
}
