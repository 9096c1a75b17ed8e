/// Procedural sound effects via rodio.
///
/// Every effect is synthesized once at startup into an in-memory WAV
/// buffer and played fire-and-forget on a detached `Sink`. Game events map
/// to effects through `sfx_for`; several events of one kind in a single
/// frame (a chain of explosions) play once.
///
/// Without the `sound` feature `SoundEngine` is a no-op stub.

use ashgate::sim::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Jump,
    Land,
    Die,
    Smolder,
    Explode,
    Lamp,
    FlameDrift,
    GateOpen,
    Enter,
    SpikeThud,
    Menu,
}

pub const SFX_COUNT: usize = 11;

/// Which effect, if any, an event makes.
pub fn sfx_for(event: &GameEvent) -> Option<Sfx> {
    match event {
        GameEvent::PlayerJumped { .. } => Some(Sfx::Jump),
        GameEvent::PlayerLanded { .. } => Some(Sfx::Land),
        GameEvent::PlayerDied { .. } => Some(Sfx::Die),
        GameEvent::Smolder { .. } => Some(Sfx::Smolder),
        GameEvent::BlockExploded { .. } => Some(Sfx::Explode),
        GameEvent::LampIgnited { .. } => Some(Sfx::Lamp),
        GameEvent::LampFireMoves { .. } => Some(Sfx::FlameDrift),
        GameEvent::GateIgnited { .. } => Some(Sfx::GateOpen),
        GameEvent::GateEntered => Some(Sfx::Enter),
        GameEvent::SpikeLanded { .. } => Some(Sfx::SpikeThud),
        GameEvent::SwitchQueued { .. } | GameEvent::LevelSwitch { .. } => None,
    }
}

/// Distinct effects for a frame's events, in first-seen order.
pub fn frame_effects(events: &[GameEvent]) -> Vec<Sfx> {
    let mut out: Vec<Sfx> = Vec::with_capacity(4);
    for sfx in events.iter().filter_map(sfx_for) {
        if !out.contains(&sfx) {
            out.push(sfx);
        }
    }
    out
}

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::{Sfx, SFX_COUNT};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        buffers: [Arc<Vec<u8>>; SFX_COUNT],
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("audio disabled: {e}");
                    return None;
                }
            };
            let buffers = [
                Sfx::Jump, Sfx::Land, Sfx::Die, Sfx::Smolder, Sfx::Explode, Sfx::Lamp,
                Sfx::FlameDrift, Sfx::GateOpen, Sfx::Enter, Sfx::SpikeThud, Sfx::Menu,
            ]
            .map(|sfx| Arc::new(make_wav(&synth(sfx))));

            Some(SoundEngine { _stream: stream, handle, buffers })
        }

        pub fn play(&self, sfx: Sfx) {
            let buf = &self.buffers[sfx as usize];
            if let Ok(sink) = Sink::try_new(&self.handle) {
                if let Ok(src) = rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Synthesis
    // ════════════════════════════════════════════════════════════

    /// A pitch sweep from `from` to `to` Hz with a decaying envelope.
    /// `noise` mixes in white noise (0 = pure tone).
    #[derive(Clone, Copy)]
    struct Voice {
        from: f32,
        to: f32,
        secs: f32,
        noise: f32,
        volume: f32,
    }

    const fn tone(hz: f32, secs: f32) -> Voice {
        Voice { from: hz, to: hz, secs, noise: 0.0, volume: 0.25 }
    }

    const fn sweep(from: f32, to: f32, secs: f32) -> Voice {
        Voice { from, to, secs, noise: 0.0, volume: 0.25 }
    }

    const fn burst(from: f32, to: f32, secs: f32, noise: f32) -> Voice {
        Voice { from, to, secs, noise, volume: 0.3 }
    }

    fn synth(sfx: Sfx) -> Vec<f32> {
        let voices: Vec<Voice> = match sfx {
            Sfx::Jump => vec![sweep(300.0, 700.0, 0.09)],
            Sfx::Land => vec![burst(180.0, 90.0, 0.06, 0.5)],
            Sfx::Die => vec![tone(440.0, 0.1), tone(349.0, 0.1), tone(262.0, 0.1), sweep(196.0, 98.0, 0.25)],
            Sfx::Smolder => vec![burst(90.0, 60.0, 0.05, 0.9)],
            Sfx::Explode => vec![burst(220.0, 40.0, 0.25, 0.8)],
            Sfx::Lamp => vec![tone(784.0, 0.05), tone(1175.0, 0.12)],
            Sfx::FlameDrift => vec![sweep(400.0, 900.0, 0.4)],
            Sfx::GateOpen => vec![tone(523.0, 0.08), tone(659.0, 0.08), tone(784.0, 0.08), tone(1047.0, 0.25)],
            Sfx::Enter => vec![sweep(1047.0, 262.0, 0.5)],
            Sfx::SpikeThud => vec![burst(120.0, 50.0, 0.12, 0.4)],
            Sfx::Menu => vec![tone(880.0, 0.03)],
        };
        let mut samples = Vec::new();
        let mut noise = NoiseGen(0x2545_f491);
        for v in &voices {
            render_voice(v, &mut noise, &mut samples);
        }
        samples
    }

    fn render_voice(v: &Voice, noise: &mut NoiseGen, out: &mut Vec<f32>) {
        let n = (SAMPLE_RATE as f32 * v.secs) as usize;
        let mut phase = 0.0_f32;
        for i in 0..n {
            let t = i as f32 / n as f32;
            let hz = v.from + (v.to - v.from) * t;
            phase = (phase + hz / SAMPLE_RATE as f32).fract();
            // Sine plus a third harmonic for a square-ish edge.
            let wave = (phase * TAU).sin() * 0.75 + (phase * 3.0 * TAU).sin() * 0.25;
            let mixed = wave * (1.0 - v.noise) + noise.next() * v.noise;
            let env = (1.0 - t).powf(0.7);
            out.push(mixed * env * v.volume);
        }
    }

    /// xorshift32, deterministic so every run sounds the same.
    struct NoiseGen(u32);

    impl NoiseGen {
        fn next(&mut self) -> f32 {
            let mut x = self.0;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            self.0 = x;
            (x as f32 / u32::MAX as f32) * 2.0 - 1.0
        }
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoding (16-bit mono PCM)
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let data_size = samples.len() as u32 * 2;
        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            buf.extend_from_slice(&((s.clamp(-1.0, 1.0) * 32767.0) as i16).to_le_bytes());
        }
        buf
    }

}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}

impl SoundEngine {
    pub fn play_events(&self, events: &[GameEvent]) {
        for sfx in frame_effects(events) {
            self.play(sfx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn chains_play_once() {
        let events = [
            GameEvent::BlockExploded { tile: IVec2::new(1, 1) },
            GameEvent::BlockExploded { tile: IVec2::new(2, 1) },
            GameEvent::SwitchQueued { level: 0 },
            GameEvent::PlayerDied { pos: IVec2::ZERO },
        ];
        assert_eq!(frame_effects(&events), vec![Sfx::Explode, Sfx::Die]);
    }

    #[test]
    fn bookkeeping_events_are_silent() {
        assert_eq!(sfx_for(&GameEvent::LevelSwitch { level: 2 }), None);
        assert_eq!(sfx_for(&GameEvent::GateEntered), Some(Sfx::Enter));
    }
}
