//! Math Invaders entry point
//!
//! Native demo: plays a full session against a scripted player that fumbles
//! the first problem of every level, then answers everything correctly.
//! Usage: `math-invaders [seed]`

use math_invaders::sim::{Direction, GameEvent, GameSession, Input, tick};
use math_invaders::{GamePhase, Settings};

/// Simulated frame length
const FRAME_MS: u32 = 16;

fn main() {
    env_logger::init();

    let seed = match std::env::args().nth(1).map(|arg| arg.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            eprintln!("invalid seed: {err}");
            std::process::exit(2);
        }
        None => 0,
    };

    let mut session = match GameSession::try_new(Settings::with_seed(seed)) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    log::info!("Math Invaders (native) starting with seed {}", seed);

    let mut fumbled_level = None;
    while session.phase() == GamePhase::Playing {
        let level = session.level().display_level;
        let inputs = if fumbled_level != Some(level) {
            fumbled_level = Some(level);
            let mut fumble = vec![Input::Digit(9), Input::Digit(9), Input::Digit(9), Input::Confirm];
            fumble.extend([Input::Backspace; 3]);
            fumble
        } else {
            answer_inputs(&session)
        };
        if inputs.is_empty() {
            log::warn!("No firing position available, stopping");
            break;
        }
        tick(&mut session, &inputs, FRAME_MS);

        for event in session.drain_events() {
            report(&event);
        }
    }

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize snapshot: {err}"),
    }
}

/// Inputs that answer the problem at the ship's position, moving the ship
/// to an enabled position first if needed
fn answer_inputs(session: &GameSession) -> Vec<Input> {
    let positions = session.positions();
    let current = positions.selected();
    let Some(target) = positions
        .position(current)
        .filter(|p| p.is_enabled())
        .or_else(|| positions.positions().iter().find(|p| p.is_enabled()))
    else {
        return Vec::new();
    };

    let direction = if target.index < current {
        Direction::Left
    } else {
        Direction::Right
    };
    let mut inputs: Vec<Input> = (0..current.abs_diff(target.index))
        .map(|_| Input::Navigate(direction))
        .collect();

    if let Some(product) = target
        .group()
        .and_then(|id| session.wave().group(id))
        .map(|g| g.problem.product)
    {
        inputs.extend(product.to_string().bytes().map(|b| Input::Digit(b - b'0')));
        inputs.push(Input::Confirm);
    }
    inputs
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::LevelStarted { display_level, groups } => {
            println!("== Level {display_level}: {groups} groups");
        }
        GameEvent::AnswerRejected { position, .. } => {
            println!("   miss at position {position}");
        }
        GameEvent::GroupDefeated {
            position,
            group,
            points,
            ..
        } => {
            println!("   hit group {} at position {position} (+{points})", group.get());
        }
        GameEvent::LevelCleared { bonus, .. } if *bonus > 0 => {
            println!("   level cleared, power bonus +{bonus}");
        }
        GameEvent::Victory { score } => println!("Victory! Final score {score}"),
        GameEvent::Defeat { score } => println!("Defeated. Final score {score}"),
        other => log::debug!("{:?}", other),
    }
}
