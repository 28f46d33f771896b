//! Menu audio: procedural 8-bit style sounds via rodio.
//!
//! `MenuAudio` implements the menu's audio contract on top of a
//! `SoundEngine`. Sound effects and the built-in tracks are synthesized
//! into in-memory WAV buffers; every audio context plays on its own Sink so
//! it can be stopped independently.
//!
//! Compile without the "sound" feature to disable audio entirely (the stub
//! SoundEngine does nothing).

use crate::data::GameDatabase;
use crate::engine::{AudioContext, AudioOut, SoundTestTrack, TrackKind};

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SAMPLE_RATE: u32 = 22050;

/// Zones whose music occupies the first track ids: acts 1 and 2 of the zone
/// with internal index `n` are tracks `2n + 1` and `2n + 2`.
const ZONE_TRACK_ZONES: u8 = 10;

/// The rest of the built-in collection: key, display name, kind.
const EXTRA_TRACKS: &[(&str, &str, TrackKind)] = &[
    ("26", "Act Clear", TrackKind::Jingle),
    ("2a", "Extra Life", TrackKind::Jingle),
    ("2c", "Invincibility", TrackKind::Music),
    ("2f", "Options", TrackKind::Music),
    ("01_fast", "Angel Island Zone Act 1 (fast)", TrackKind::Music),
    ("03_fast", "Hydrocity Zone Act 1 (fast)", TrackKind::Music),
    ("5b", "Menu Cursor", TrackKind::SoundEffect),
    ("b7", "Menu Change", TrackKind::SoundEffect),
];

fn build_catalog(db: &GameDatabase) -> Vec<SoundTestTrack> {
    let track = |key: String, display_name: String, kind| SoundTestTrack { key, display_name, kind, modded: false };
    let mut tracks = Vec::new();
    for index in 0..ZONE_TRACK_ZONES {
        let Some(zone) = db.zone_by_internal_index(index) else {
            continue;
        };
        for act in 1..=zone.acts_normal.min(2) {
            let key = format!("{:02x}", index * 2 + act);
            tracks.push(track(key, format!("{} Act {act}", zone.display_name), TrackKind::Music));
        }
    }
    tracks.extend(EXTRA_TRACKS.iter().map(|&(key, name, kind)| track(key.to_string(), name.to_string(), kind)));
    tracks
}

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::io::Cursor;

    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

    use super::{make_wav, synth_sfx, synth_tune};
    use crate::engine::{AudioContext, TrackKind};

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_cache: HashMap<u8, Vec<u8>>,
        sinks: HashMap<AudioContext, Sink>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|err| log::warn!("no audio output: {err}"))
                .ok()?;
            Some(SoundEngine { _stream: stream, handle, sfx_cache: HashMap::new(), sinks: HashMap::new() })
        }

        fn sink(&mut self, context: AudioContext) -> Option<&Sink> {
            if !self.sinks.contains_key(&context) {
                let sink = Sink::try_new(&self.handle)
                    .map_err(|err| log::warn!("cannot open audio sink: {err}"))
                    .ok()?;
                self.sinks.insert(context, sink);
            }
            self.sinks.get(&context)
        }

        pub fn play_sfx(&mut self, sfx: u8) {
            let wav = self.sfx_cache.entry(sfx).or_insert_with(|| make_wav(&synth_sfx(sfx))).clone();
            if let (Some(sink), Ok(src)) = (self.sink(AudioContext::Menu), rodio::Decoder::new(Cursor::new(wav))) {
                sink.append(src);
            }
        }

        pub fn play_tune(&mut self, key: &str, kind: TrackKind, context: AudioContext, speed: f32, rich: bool) {
            self.stop(context);
            let wav = make_wav(&synth_tune(key, rich));
            let Ok(src) = rodio::Decoder::new(Cursor::new(wav)) else {
                return;
            };
            let Some(sink) = self.sink(context) else {
                return;
            };
            sink.set_speed(speed);
            match kind {
                TrackKind::Music => sink.append(src.repeat_infinite()),
                TrackKind::Jingle | TrackKind::SoundEffect => sink.append(src),
            }
        }

        pub fn stop(&mut self, context: AudioContext) {
            if let Some(sink) = self.sinks.remove(&context) {
                sink.stop();
            }
        }
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_sfx(&mut self, _sfx: u8) {}
    pub fn play_tune(&mut self, _key: &str, _kind: TrackKind, _context: AudioContext, _speed: f32, _rich: bool) {}
    pub fn stop(&mut self, _context: AudioContext) {}
}

// ── AudioOut ──

pub struct MenuAudio {
    engine: Option<SoundEngine>,
    tracks: Vec<SoundTestTrack>,
    menu_music: Option<u8>,
    remastered_installed: bool,
    active_soundtrack: i32,
}

impl MenuAudio {
    pub fn new(db: &GameDatabase, active_soundtrack: i32) -> Self {
        MenuAudio {
            engine: SoundEngine::new(),
            tracks: build_catalog(db),
            menu_music: None,
            remastered_installed: false,
            active_soundtrack,
        }
    }

    #[cfg(test)]
    fn silent() -> Self {
        MenuAudio {
            engine: None,
            tracks: build_catalog(&GameDatabase::initialize()),
            menu_music: None,
            remastered_installed: false,
            active_soundtrack: 0,
        }
    }

    /// Called by the host once the soundtrack download has been applied or removed.
    pub fn set_remastered_installed(&mut self, installed: bool) {
        self.remastered_installed = installed;
    }

    fn uses_remastered(&self) -> bool {
        self.remastered_installed && self.active_soundtrack == 1
    }
}

impl AudioOut for MenuAudio {
    fn play_sound(&mut self, sfx: u8) {
        if let Some(engine) = &mut self.engine {
            engine.play_sfx(sfx);
        }
    }

    fn play_audio(&mut self, key: &str, kind: TrackKind, context: AudioContext, speed: f32) {
        log::debug!("playing {key} ({kind:?}) at {speed}x in {context:?}");
        let rich = self.uses_remastered();
        if let Some(engine) = &mut self.engine {
            engine.play_tune(key, kind, context, speed, rich);
        }
    }

    fn stop_context(&mut self, context: AudioContext) {
        if let Some(engine) = &mut self.engine {
            engine.stop(context);
        }
    }

    fn set_menu_music(&mut self, track: u8) {
        self.menu_music = Some(track);
        self.restart_menu_music();
    }

    fn restart_menu_music(&mut self) {
        if let Some(track) = self.menu_music {
            self.play_audio(&format!("{track:02x}"), TrackKind::Music, AudioContext::MenuMusic, 1.0);
        }
    }

    fn has_remastered_soundtrack(&self) -> bool {
        self.remastered_installed
    }

    fn on_soundtrack_preferences_changed(&mut self, active_soundtrack: i32) {
        log::info!("active soundtrack changed to {active_soundtrack}");
        self.active_soundtrack = active_soundtrack;
    }

    fn sound_test_tracks(&self) -> Vec<SoundTestTrack> {
        self.tracks.clone()
    }
}

// ════════════════════════════════════════════════════════════
//  Waveform generators: all produce Vec<f32> mono samples
// ════════════════════════════════════════════════════════════

/// Major pentatonic scale over two octaves, starting at C5.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const SCALE: [f32; 10] = [523.0, 587.0, 659.0, 784.0, 880.0, 1047.0, 1175.0, 1319.0, 1568.0, 1760.0];
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const TUNE_NOTES: usize = 16;
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const NOTE_DURATION: f32 = 0.18;

/// Short blip whose pitch is derived from the effect id.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn synth_sfx(sfx: u8) -> Vec<f32> {
    let freq = 400.0 + (sfx as f32) * 4.0;
    let n = (SAMPLE_RATE as f32 * 0.05) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32);
            (t * freq * 2.0 * std::f32::consts::PI).sin() * env * 0.25
        })
        .collect()
}

/// A melody seeded by the track key, so every key has its own loop.
/// `rich` adds harmonics instead of the plain square wave.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn synth_tune(key: &str, rich: bool) -> Vec<f32> {
    let mut rng = key.bytes().fold(2166136261u32, |h, b| (h ^ b as u32).wrapping_mul(16777619));
    let n = (SAMPLE_RATE as f32 * NOTE_DURATION) as usize;
    let mut samples = Vec::with_capacity(n * TUNE_NOTES);
    for _ in 0..TUNE_NOTES {
        rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
        let freq = SCALE[(rng >> 16) as usize % SCALE.len()];
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let phase = t * freq * 2.0 * std::f32::consts::PI;
            let env = 1.0 - (i as f32 / n as f32) * 0.6;
            let wave = if rich {
                phase.sin() * 0.7 + (phase * 2.0).sin() * 0.2 + (phase * 3.0).sin() * 0.1
            } else {
                phase.sin().signum() * 0.5
            };
            samples.push(wave * env * 0.2);
        }
    }
    samples
}

// ════════════════════════════════════════════════════════════
//  WAV encoder: wraps f32 samples into a valid WAV buffer
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2;

    let mut buf = Vec::with_capacity(44 + data_size as usize);
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }
    buf
}
