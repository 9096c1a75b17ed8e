/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Level switch check (a finished exit animation ends the tick)
///   2. Corruption automaton (spread, damage, explosions)
///   3. Transition timer, restart hotkey
///   4. Player: control → corruption footprint → gravity → mover → death
///   5. Spike blocks (lowest first)
///   6. Lamps
///   7. Gate (timers, entry, ignition, next-level request)
///
/// Every body moves through `mover::integrate` with its own solidity
/// predicate from `physics`. The grid a body sees is the grid after this
/// tick's corruption pass. Level switches requested here are observed at
/// the start of a later tick.

use glam::IVec2;
use log::{debug, info};

use crate::domain::corruption;
use crate::domain::entity::FrameInput;
use crate::domain::grid::MAX_CORRUPTION_STAGE;
use crate::domain::mover::{self, Limits};
use crate::domain::physics::{self, GATE_HITPOINT, LAMP_HITPOINT};
use crate::domain::rules::{self, GRAVITY};
use super::event::GameEvent;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, input: FrameInput) -> Vec<GameEvent> {
    if world.phase != Phase::Playing || world.paused { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();

    if let Some(level) = world.switch.should_switch_to() {
        events.push(GameEvent::LevelSwitch { level });
        return events;
    }

    world.tick += 1;
    world.tick_message();

    resolve_corruption(world, &mut events);
    world.switch.tick();
    if input.restart {
        let level = world.current_level;
        queue_switch(world, level, &mut events);
    }
    resolve_player(world, &input, &mut events);
    resolve_spikes(world, &mut events);
    resolve_lamps(world, &mut events);
    resolve_gate(world, &mut events);

    events
}

fn queue_switch(world: &mut WorldState, level: usize, events: &mut Vec<GameEvent>) {
    if world.switch.queue(level) {
        info!("switching to level {}", level + 1);
        events.push(GameEvent::SwitchQueued { level });
    }
}

// ══════════════════════════════════════════════════════════════
// Corruption
// ══════════════════════════════════════════════════════════════

fn resolve_corruption(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let report = corruption::tick(&mut world.grid, &mut world.rng);
    if !report.explosions.is_empty() {
        debug!("tick {}: {} blocks exploded", world.tick, report.explosions.len());
    }
    events.extend(report.smolders.into_iter().map(|tile| GameEvent::Smolder { tile }));
    events.extend(report.explosions.into_iter().map(|tile| GameEvent::BlockExploded { tile }));
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_player(world: &mut WorldState, input: &FrameInput, events: &mut Vec<GameEvent>) {
    let can_control = world.player.is_alive() && !world.gate.is_finished();

    let p = &mut world.player;
    p.prev2_vel = p.prev_vel;
    p.prev_vel = p.motion.vel;
    p.prev_ground = p.ground;
    p.ground = physics::player_solid_at(&world.grid, p.pos(), IVec2::Y);

    let control = rules::control_player(p, input, can_control);
    if control.jumped {
        events.push(GameEvent::PlayerJumped { pos: p.pos() });
    }
    if control.landed {
        events.push(GameEvent::PlayerLanded { pos: p.pos() });
    }

    // Everything the player touches starts burning.
    if p.is_alive() {
        for tile in physics::player_corruption_tiles(p.pos()) {
            world.grid.corrupt(tile, MAX_CORRUPTION_STAGE);
        }
    }

    p.motion.vel.y += GRAVITY;

    if can_control {
        let grid = &world.grid;
        mover::integrate(&mut p.motion, &Limits::default(), |pos, off| {
            physics::player_solid_at(grid, pos, off)
        });

        let pos = p.pos();
        let dead = rules::fell_off_map(pos, world.grid.pixel_size())
            || physics::player_touches_lethal_tile(&world.grid, pos)
            || physics::player_touches_spike_block(&world.spikes, pos);
        if dead && p.kill() {
            info!("player died at {pos}");
            events.push(GameEvent::PlayerDied { pos });
        }
    }

    if p.death_timer > 0 {
        p.death_timer += 1;
    }
    if p.death_timer > rules::RESTART_DELAY {
        let level = world.current_level;
        queue_switch(world, level, events);
    }
}

// ══════════════════════════════════════════════════════════════
// Spike blocks
// ══════════════════════════════════════════════════════════════

fn resolve_spikes(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let limits = Limits::default();

    for i in 0..world.spikes.len() {
        let column = world.spike_groups.column(world.spikes[i].pos().x);
        let ground = physics::spike_solid_at(&world.grid, &world.spikes, column, i, world.spikes[i].pos(), IVec2::Y);

        let spike = &mut world.spikes[i];
        spike.prev_ground = spike.ground;
        spike.ground = ground;
        if spike.ground && !spike.prev_ground {
            events.push(GameEvent::SpikeLanded { pos: spike.pos() });
        }
        spike.motion.vel.y += GRAVITY;

        // Move a copy: the predicate reads the sibling list, this block included.
        let mut motion = spike.motion;
        let (grid, spikes) = (&world.grid, &world.spikes);
        mover::integrate(&mut motion, &limits, |pos, off| {
            physics::spike_solid_at(grid, spikes, column, i, pos, off)
        });
        world.spikes[i].motion = motion;
    }
}

// ══════════════════════════════════════════════════════════════
// Lamps
// ══════════════════════════════════════════════════════════════

fn resolve_lamps(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let limits = Limits::default();
    let player_pos = world.player.pos();

    for i in 0..world.lamps.len() {
        let lamp = &mut world.lamps[i];
        if !lamp.lit && rules::lamp_in_reach(lamp.pos(), player_pos) {
            lamp.lit = true;
            lamp.flame_pos = lamp.pos();
            events.push(GameEvent::LampIgnited { pos: lamp.pos() });

            if world.all_lamps_lit() {
                info!("all lamps lit");
                world.gate.ready_timer = 1;
            }
        }

        let lamp = &mut world.lamps[i];
        lamp.motion.vel.y += GRAVITY;
        let grid = &world.grid;
        mover::integrate(&mut lamp.motion, &limits, |pos, off| {
            physics::point_solid_at(grid, LAMP_HITPOINT, pos, off)
        });
    }
}

// ══════════════════════════════════════════════════════════════
// Gate
// ══════════════════════════════════════════════════════════════

fn resolve_gate(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let gate = &mut world.gate;
    if gate.ready_timer > 0 { gate.ready_timer += 1; }
    if gate.finish_timer > 0 { gate.finish_timer += 1; }

    if !gate.is_finished()
        && world.player.is_alive()
        && rules::gate_is_open(gate.ready_timer)
        && rules::gate_in_reach(gate.pos(), world.player.pos())
    {
        gate.finish_timer = 1;
        info!("gate entered");
        events.push(GameEvent::GateEntered);
    }

    if gate.ready_timer == rules::GATE_ANIM_DELAY {
        events.push(GameEvent::LampFireMoves { pos: gate.pos() });
    }
    if gate.ready_timer == rules::GATE_ANIM_DELAY + rules::GATE_ANIM_LEN {
        events.push(GameEvent::GateIgnited { pos: gate.pos() + rules::GATE_CENTER_OFFSET });
    }

    gate.motion.vel.y += GRAVITY;
    let grid = &world.grid;
    mover::integrate(&mut gate.motion, &Limits::default(), |pos, off| {
        physics::point_solid_at(grid, GATE_HITPOINT, pos, off)
    });

    if world.gate.finish_timer == rules::GATE_TRANSITION_DELAY {
        let level = world.current_level + 1;
        queue_switch(world, level, events);
    }
}
