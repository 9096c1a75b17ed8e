/// Events emitted during a simulation step.
/// The presentation layer consumes these for animation/sound.
/// Positions are in pixels unless the field says `tile`.

use glam::IVec2;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PlayerJumped { pos: IVec2 },
    PlayerLanded { pos: IVec2 },
    PlayerDied { pos: IVec2 },
    Smolder { tile: IVec2 },
    BlockExploded { tile: IVec2 },
    LampIgnited { pos: IVec2 },
    /// All lamps are lit; the flames start drifting toward the gate.
    LampFireMoves { pos: IVec2 },
    GateIgnited { pos: IVec2 },
    GateEntered,
    SpikeLanded { pos: IVec2 },
    /// A level switch was queued (restart or next level).
    SwitchQueued { level: usize },
    /// The exit animation is over: load `level` before the next tick.
    LevelSwitch { level: usize },
}
