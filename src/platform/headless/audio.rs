//=========================================================================
// Headless Mixer
//=========================================================================
//
// Validates audio files by their container signature and records what
// plays on which channel. No samples are decoded or mixed.
//
// Channel lifetime:
//   WAV chunks know their duration from the header, so a channel frees
//   itself once `duration × times` has elapsed. Everything else (and
//   anything looping forever) stays busy until halted.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;
use std::time::{Duration, Instant};

use slotmap::SlotMap;

//=== Internal Dependencies ===============================================

use crate::core::resource::{MusicKey, Repeat, SoundKey};
use crate::platform::{AudioSpec, BackendError};

//=== AudioFormat =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AudioFormat {
    Wav,
    Ogg,
    Mp3,
    Flac,
    /// ProTracker module; streamed music only.
    Module,
}

impl AudioFormat {
    pub(crate) fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Some(Self::Wav),
            [b'O', b'g', b'g', b'S', ..] => Some(Self::Ogg),
            [b'f', b'L', b'a', b'C', ..] => Some(Self::Flac),
            [b'I', b'D', b'3', ..] => Some(Self::Mp3),
            [0xFF, second, ..] if second & 0xE0 == 0xE0 => Some(Self::Mp3),
            _ if bytes.get(1080..1084) == Some(&b"M.K."[..]) => Some(Self::Module),
            _ => None,
        }
    }
}

/// Playback length of a PCM WAV file, from its `fmt ` and `data` chunks.
pub(crate) fn wav_duration(bytes: &[u8]) -> Option<Duration> {
    let mut offset = 12;
    let mut byte_rate = None;
    let mut data_len = None;

    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let len = u32::from_le_bytes(bytes[offset + 4..offset + 8].try_into().ok()?) as usize;
        let body = offset + 8;

        match id {
            b"fmt " if body + 12 <= bytes.len() => {
                byte_rate = Some(u32::from_le_bytes(bytes[body + 8..body + 12].try_into().ok()?));
            }
            b"data" => data_len = Some(len),
            _ => {}
        }

        // Chunks are word aligned
        offset = body.saturating_add(len).saturating_add(len & 1);
    }

    match (byte_rate?, data_len?) {
        (0, _) => None,
        (rate, len) => Some(Duration::from_secs_f64(len as f64 / f64::from(rate))),
    }
}

//=== Mixer ===============================================================

struct Chunk {
    duration: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
struct Playback {
    chunk: SoundKey,
    ends_at: Option<Instant>,
}

impl Playback {
    fn is_busy(&self, now: Instant) -> bool {
        self.ends_at.map_or(true, |end| now < end)
    }
}

#[derive(Default)]
pub(crate) struct Mixer {
    device: Option<AudioSpec>,
    chunks: SlotMap<SoundKey, Chunk>,
    tracks: SlotMap<MusicKey, AudioFormat>,
    channels: Vec<Option<Playback>>,
    music: Option<(MusicKey, Repeat)>,
    plays: u64,
}

impl Mixer {
    pub(crate) fn open(&mut self, spec: &AudioSpec) {
        self.device = Some(*spec);
        self.channels = vec![None; spec.mix_channels];
    }

    pub(crate) fn is_open(&self) -> bool {
        self.device.is_some()
    }

    pub(crate) fn device(&self) -> Option<&AudioSpec> {
        self.device.as_ref()
    }

    pub(crate) fn close(&mut self) {
        *self = Self::default();
    }

    fn read(&self, path: &Path) -> Result<(Vec<u8>, AudioFormat), BackendError> {
        if !self.is_open() {
            return Err(BackendError::NotInitialized("audio"));
        }
        let bytes = std::fs::read(path)?;
        let format = AudioFormat::sniff(&bytes)
            .ok_or_else(|| BackendError::Audio("unrecognized format".into()))?;
        Ok((bytes, format))
    }

    //--- Chunks -----------------------------------------------------------

    pub(crate) fn load_chunk(&mut self, path: &Path) -> Result<SoundKey, BackendError> {
        let (bytes, format) = self.read(path)?;
        let duration = match format {
            AudioFormat::Wav => wav_duration(&bytes),
            AudioFormat::Module => {
                return Err(BackendError::Audio("module files can only be played as music".into()))
            }
            _ => None,
        };
        Ok(self.chunks.insert(Chunk { duration }))
    }

    pub(crate) fn free_chunk(&mut self, key: SoundKey) {
        if self.chunks.remove(key).is_some() {
            // A freed chunk must not keep playing
            for channel in &mut self.channels {
                if channel.is_some_and(|p| p.chunk == key) {
                    *channel = None;
                }
            }
        }
    }

    pub(crate) fn play(&mut self, key: SoundKey, repeat: Repeat) -> Result<Option<usize>, BackendError> {
        if !self.is_open() {
            return Err(BackendError::NotInitialized("audio"));
        }
        let chunk = self.chunks.get(key).ok_or(BackendError::InvalidHandle)?;

        let now = Instant::now();
        // Unknown or unrepresentable end times keep the channel busy until halted
        let ends_at = match repeat {
            Repeat::Times(n) => chunk
                .duration
                .and_then(|d| d.checked_mul(n))
                .and_then(|total| now.checked_add(total)),
            Repeat::Forever => None,
        };

        let free = self
            .channels
            .iter()
            .position(|slot| !slot.is_some_and(|p| p.is_busy(now)));

        if let Some(index) = free {
            self.channels[index] = Some(Playback { chunk: key, ends_at });
            self.plays += 1;
        }
        Ok(free)
    }

    pub(crate) fn halt_channels(&mut self) {
        self.channels.iter_mut().for_each(|slot| *slot = None);
    }

    pub(crate) fn busy_channels(&self) -> usize {
        let now = Instant::now();
        self.channels
            .iter()
            .filter(|slot| slot.is_some_and(|p| p.is_busy(now)))
            .count()
    }

    pub(crate) fn total_plays(&self) -> u64 {
        self.plays
    }

    //--- Music ------------------------------------------------------------

    pub(crate) fn load_music(&mut self, path: &Path) -> Result<MusicKey, BackendError> {
        let (_, format) = self.read(path)?;
        Ok(self.tracks.insert(format))
    }

    pub(crate) fn free_music(&mut self, key: MusicKey) {
        if self.tracks.remove(key).is_some() && self.active_music() == Some(key) {
            self.music = None;
        }
    }

    pub(crate) fn play_music(&mut self, key: MusicKey, repeat: Repeat) -> Result<(), BackendError> {
        if !self.is_open() {
            return Err(BackendError::NotInitialized("audio"));
        }
        if !self.tracks.contains_key(key) {
            return Err(BackendError::InvalidHandle);
        }
        self.music = Some((key, repeat));
        Ok(())
    }

    pub(crate) fn halt_music(&mut self) {
        self.music = None;
    }

    pub(crate) fn active_music(&self) -> Option<MusicKey> {
        self.music.map(|(key, _)| key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
