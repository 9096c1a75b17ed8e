/// Entry point and game loop.

mod ui;

use std::error::Error;
use std::fs::File;
use std::process::ExitCode;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::{error, info, warn};

use ashgate::config::GameConfig;
use ashgate::domain::entity::FrameInput;
use ashgate::domain::tile::validate_catalog;
use ashgate::sim::event::GameEvent;
use ashgate::sim::level::{self, LevelDef, LevelError};
use ashgate::sim::save;
use ashgate::sim::step::step;
use ashgate::sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::{self, InputState};
use ui::renderer::Renderer;
use ui::sound::{Sfx, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// New game, continue, quit.
const TITLE_ITEMS: usize = 3;

fn main() -> ExitCode {
    let config = GameConfig::load();
    init_logging(&config);
    for warning in &config.warnings {
        warn!("{warning}");
    }

    if let Err(e) = validate_catalog() {
        error!("{e}");
        eprintln!("ashgate: {e}");
        return ExitCode::FAILURE;
    }

    let levels = level::available_levels(&config);
    let seed = config.general.seed.unwrap_or_else(clock_seed);
    info!("seed {seed}, {} levels", levels.len());

    let mut world = WorldState::new(seed);
    world.total_levels = levels.len();
    world.best_level = save::load_progress().best_level.min(levels.len().saturating_sub(1));
    world.title_cursor = if world.best_level > 0 { 1 } else { 0 };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return ExitCode::FAILURE;
    }

    let sound = SoundEngine::new();
    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config, &levels);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(()) => {
            println!();
            println!("Thanks for playing Ashgate!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("ashgate: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to a file: the terminal belongs to the renderer. `RUST_LOG`
/// overrides the default `info` filter.
fn init_logging(config: &GameConfig) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(&config.general.log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    levels: &[LevelDef],
) -> Result<(), Box<dyn Error>> {
    let mut kb = InputState::new();
    kb.honor_release = renderer.enable_key_release();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let tick_rate = Duration::from_millis(config.general.tick_rate_ms);
    let mut last_tick = Instant::now();

    // Edge-triggered presses seen between ticks, so short taps aren't lost.
    let mut pending = FrameInput::default();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }
        let phase_before = world.phase;
        let meta = handle_meta(world, renderer, sound, &kb, &gp, levels)?;
        if meta == Meta::Quit {
            break;
        }

        let frame = combine(kb.frame_input(), gp.frame_input());
        latch_presses(&mut pending, frame, world.phase != phase_before, meta);

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            if world.phase == Phase::Playing {
                let input = FrameInput {
                    jump_pressed: pending.jump_pressed,
                    restart: pending.restart,
                    ..frame
                };
                pending = FrameInput::default();

                let events = step(world, input);
                if let Some(sfx) = sound {
                    sfx.play_events(&events);
                }
                for event in &events {
                    if let GameEvent::LevelSwitch { level: next } = *event {
                        switch_level(world, levels, next)?;
                    }
                }
            } else {
                world.tick_message();
            }
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Keep edge presses until the next tick. A press that changed the phase
/// belongs to the menu, and a restart that unpaused belongs to the pause.
fn latch_presses(pending: &mut FrameInput, frame: FrameInput, phase_changed: bool, meta: Meta) {
    if phase_changed {
        return;
    }
    pending.jump_pressed |= frame.jump_pressed;
    if meta != Meta::Unpaused {
        pending.restart |= frame.restart;
    }
}

fn combine(a: FrameInput, b: FrameInput) -> FrameInput {
    FrameInput {
        left: a.left || b.left,
        right: a.right || b.right,
        jump_pressed: a.jump_pressed || b.jump_pressed,
        jump_held: a.jump_held || b.jump_held,
        restart: a.restart || b.restart,
    }
}

/// Load level `index` and record it as reached.
fn switch_level(world: &mut WorldState, levels: &[LevelDef], index: usize) -> Result<(), LevelError> {
    level::load_level(world, levels, index)?;
    if world.phase == Phase::Playing {
        world.best_level = save::record_level(index).best_level;
    }
    Ok(())
}

fn return_to_title(world: &mut WorldState) {
    info!("back to title");
    world.phase = Phase::Title;
    world.paused = false;
    world.title_cursor = if world.best_level > 0 { 1 } else { 0 };
    world.message.clear();
    world.message_timer = 0;
}

// ── Menu and meta keys ──

/// What the meta handler did with this frame's keys.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Meta {
    Pass,
    Quit,
    /// The restart key resumed a paused game.
    Unpaused,
}

/// Handle non-gameplay input.
fn handle_meta(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    kb: &InputState,
    gp: &GamepadState,
    levels: &[LevelDef],
) -> Result<Meta, LevelError> {
    let confirm = kb.any_pressed(input::CONFIRM_KEYS) || gp.confirm_pressed();
    let cancel = kb.esc_pressed() || gp.cancel_pressed();
    let blip = || {
        if let Some(sfx) = sound {
            sfx.play(Sfx::Menu);
        }
    };

    match world.phase {
        Phase::Title => {
            if kb.any_pressed(input::QUIT_KEYS) || cancel {
                return Ok(Meta::Quit);
            }
            if kb.any_pressed(input::MENU_UP_KEYS) || gp.menu_up_pressed() {
                world.title_cursor = (world.title_cursor + TITLE_ITEMS - 1) % TITLE_ITEMS;
                blip();
            }
            if kb.any_pressed(input::MENU_DOWN_KEYS) || gp.menu_down_pressed() {
                world.title_cursor = (world.title_cursor + 1) % TITLE_ITEMS;
                blip();
            }
            if confirm {
                match world.title_cursor {
                    0 => {
                        renderer.reset_camera();
                        switch_level(world, levels, 0)?;
                    }
                    1 if world.best_level > 0 => {
                        let best = world.best_level;
                        renderer.reset_camera();
                        switch_level(world, levels, best)?;
                    }
                    1 => world.set_message("No saved progress yet", 90),
                    _ => return Ok(Meta::Quit),
                }
            }
        }
        Phase::Playing => {
            if cancel {
                return_to_title(world);
            } else if kb.any_pressed(input::PAUSE_KEYS) {
                world.paused = !world.paused;
                info!("paused: {}", world.paused);
            } else if world.paused && kb.any_pressed(input::RESTART_KEYS) {
                world.paused = false;
                return Ok(Meta::Unpaused);
            }
        }
        Phase::GameComplete => {
            if confirm || cancel {
                return_to_title(world);
            }
        }
    }
    Ok(Meta::Pass)
}
