//! Audio surface: one-shot effects and per-stage background music
//!
//! Playback itself is delegated to an [`AudioBackend`] supplied by the host.
//! Backend failures (no device, autoplay policy) are logged and ignored so the
//! game always keeps running without sound.

use crate::consts::{
    DEFAULT_EFFECTS_VOLUME, DEFAULT_MUSIC_VOLUME, LEVELS_PER_STAGE, STAGE_COUNT,
};
use crate::error::AudioError;
use crate::sim::{GameEvent, GamePhase};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball bounces off a side or the top
    WallCollision,
    /// Ball bounces off the paddle
    PaddleCollision,
    /// Ball strikes a brick
    BrickCollision,
    /// A struck brick breaks
    BrickDestroyed,
    BonusPickedUp,
    DebuffPickedUp,
}

impl SoundEffect {
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundEffect::WallCollision => "assets/sounds/wall_collision.ogg",
            SoundEffect::PaddleCollision => "assets/sounds/paddle_collision.ogg",
            SoundEffect::BrickCollision => "assets/sounds/brick_collision.ogg",
            SoundEffect::BrickDestroyed => "assets/sounds/brick_destroyed.ogg",
            SoundEffect::BonusPickedUp => "assets/sounds/bonus_picked_up.ogg",
            SoundEffect::DebuffPickedUp => "assets/sounds/debuff_picked_up.ogg",
        }
    }

    /// Effects to play for a simulation event, in order
    pub fn for_event(event: &GameEvent) -> &'static [SoundEffect] {
        match event {
            GameEvent::WallBounce => &[SoundEffect::WallCollision],
            GameEvent::PaddleBounce => &[SoundEffect::PaddleCollision],
            GameEvent::BrickHit {
                destroyed: true, ..
            } => &[SoundEffect::BrickCollision, SoundEffect::BrickDestroyed],
            GameEvent::BrickHit {
                destroyed: false, ..
            } => &[SoundEffect::BrickCollision],
            GameEvent::PickupCaught { kind } if kind.is_debuff() => &[SoundEffect::DebuffPickedUp],
            GameEvent::PickupCaught { .. } => &[SoundEffect::BonusPickedUp],
            GameEvent::GameStarted
            | GameEvent::BallsLaunched
            | GameEvent::Explosion { .. }
            | GameEvent::PickupSpawned { .. }
            | GameEvent::BallLost { .. }
            | GameEvent::LifeLost { .. }
            | GameEvent::LevelCleared { .. }
            | GameEvent::GameOver { .. }
            | GameEvent::GameWon { .. }
            | GameEvent::ReturnedToWelcome => &[],
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Welcome,
    /// Stage 1..=5, each covering five levels
    Stage(u32),
}

impl MusicTrack {
    /// Stage track for a 1-based level, capped at the last stage
    pub fn for_level(level: u32) -> Self {
        let stage = level.max(1).div_ceil(LEVELS_PER_STAGE).min(STAGE_COUNT);
        MusicTrack::Stage(stage)
    }

    /// Track that should be playing, `None` for silence
    pub fn for_phase(phase: GamePhase, level: u32) -> Option<Self> {
        match phase {
            GamePhase::Welcome => Some(MusicTrack::Welcome),
            GamePhase::Ready | GamePhase::Playing => Some(Self::for_level(level)),
            GamePhase::GameOver | GamePhase::GameWon => None,
        }
    }

    pub fn asset_path(self) -> String {
        match self {
            MusicTrack::Welcome => "assets/sounds/welcome_screen.ogg".to_string(),
            MusicTrack::Stage(n) => format!("assets/sounds/stage_{n}.ogg"),
        }
    }
}

/// Host playback implementation
pub trait AudioBackend {
    /// Fire-and-forget one-shot at `volume` (0.0 - 1.0)
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
    /// Start looping `track`, replacing whatever is playing
    fn start_music(&mut self, track: MusicTrack, volume: f32) -> Result<(), AudioError>;
    fn stop_music(&mut self);
    /// Apply a new volume to the playing track
    fn set_music_volume(&mut self, _volume: f32) {}
}

/// Backend that plays nothing (headless runs, no audio device)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play_effect(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        log::trace!("(silent) {:?}", effect);
        Ok(())
    }

    fn start_music(&mut self, track: MusicTrack, _volume: f32) -> Result<(), AudioError> {
        log::trace!("(silent) music {:?}", track);
        Ok(())
    }

    fn stop_music(&mut self) {}
}

/// Clamp a volume to 0.0 - 1.0; NaN and infinities become `fallback`
pub fn sanitize_volume(volume: f32, fallback: f32) -> f32 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    music_volume: f32,
    effects_volume: f32,
    current_track: Option<MusicTrack>,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B, music_volume: f32, effects_volume: f32) -> Self {
        Self {
            backend,
            music_volume: sanitize_volume(music_volume, DEFAULT_MUSIC_VOLUME),
            effects_volume: sanitize_volume(effects_volume, DEFAULT_EFFECTS_VOLUME),
            current_track: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn effects_volume(&self) -> f32 {
        self.effects_volume
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.current_track
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = sanitize_volume(volume, self.music_volume);
        if self.current_track.is_some() {
            self.backend.set_music_volume(self.music_volume);
        }
    }

    /// Set effects volume (0.0 - 1.0)
    pub fn set_effects_volume(&mut self, volume: f32) {
        self.effects_volume = sanitize_volume(volume, self.effects_volume);
    }

    /// Play a sound effect
    pub fn play_sound(&mut self, effect: SoundEffect) {
        if let Err(e) = self.backend.play_effect(effect, self.effects_volume) {
            log::warn!("Failed to play {:?}: {}", effect, e);
        }
    }

    /// Loop `track`, restarting only when it differs from the current one
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.current_track == Some(track) {
            return;
        }
        if self.current_track.is_some() {
            self.backend.stop_music();
        }
        // Remembered even on failure so a blocked track isn't retried every frame
        self.current_track = Some(track);
        match self.backend.start_music(track, self.music_volume) {
            Ok(()) => log::info!("Music: {:?}", track),
            Err(e) => log::warn!("Failed to start music {:?}: {}", track, e),
        }
    }

    pub fn stop_music(&mut self) {
        if self.current_track.take().is_some() {
            self.backend.stop_music();
        }
    }

    /// Match the music to the current phase and level
    pub fn sync_music(&mut self, phase: GamePhase, level: u32) {
        match MusicTrack::for_phase(phase, level) {
            Some(track) => self.play_music(track),
            None => self.stop_music(),
        }
    }

    /// Play the cues for one tick's events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            for &effect in SoundEffect::for_event(event) {
                self.play_sound(effect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BonusKind, BrickKind, DebuffKind, PickupKind};

    #[derive(Default)]
    struct MockBackend {
        effects: Vec<(SoundEffect, f32)>,
        started: Vec<MusicTrack>,
        stops: usize,
        blocked: bool,
    }

    impl AudioBackend for MockBackend {
        fn play_effect(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
            if self.blocked {
                return Err(AudioError::Blocked("autoplay".into()));
            }
            self.effects.push((effect, volume));
            Ok(())
        }

        fn start_music(&mut self, track: MusicTrack, _volume: f32) -> Result<(), AudioError> {
            if self.blocked {
                return Err(AudioError::Blocked("autoplay".into()));
            }
            self.started.push(track);
            Ok(())
        }

        fn stop_music(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn test_volumes_clamped() {
        let mut audio = AudioManager::new(MockBackend::default(), 1.5, -0.2);
        assert_eq!(audio.music_volume(), 1.0);
        assert_eq!(audio.effects_volume(), 0.0);
        audio.set_effects_volume(0.65);
        audio.set_music_volume(7.0);
        assert_eq!(audio.effects_volume(), 0.65);
        assert_eq!(audio.music_volume(), 1.0);
    }

    #[test]
    fn test_non_finite_volumes_ignored() {
        let mut audio = AudioManager::new(MockBackend::default(), f32::NAN, f32::INFINITY);
        assert_eq!(audio.music_volume(), DEFAULT_MUSIC_VOLUME);
        assert_eq!(audio.effects_volume(), DEFAULT_EFFECTS_VOLUME);
        audio.set_music_volume(0.4);
        audio.set_music_volume(f32::NAN);
        audio.set_effects_volume(f32::NEG_INFINITY);
        assert_eq!(audio.music_volume(), 0.4);
        assert_eq!(audio.effects_volume(), DEFAULT_EFFECTS_VOLUME);
    }

    #[test]
    fn test_stage_buckets() {
        assert_eq!(MusicTrack::for_level(1), MusicTrack::Stage(1));
        assert_eq!(MusicTrack::for_level(5), MusicTrack::Stage(1));
        assert_eq!(MusicTrack::for_level(6), MusicTrack::Stage(2));
        assert_eq!(MusicTrack::for_level(21), MusicTrack::Stage(5));
        assert_eq!(MusicTrack::for_level(25), MusicTrack::Stage(5));
        assert_eq!(MusicTrack::for_level(40), MusicTrack::Stage(5));
    }

    #[test]
    fn test_music_restarts_only_on_change() {
        let mut audio = AudioManager::new(MockBackend::default(), 0.11, 0.65);
        audio.sync_music(GamePhase::Welcome, 1);
        audio.sync_music(GamePhase::Welcome, 1);
        audio.sync_music(GamePhase::Ready, 1);
        audio.sync_music(GamePhase::Playing, 3);
        audio.sync_music(GamePhase::Ready, 6);
        assert_eq!(
            audio.backend().started,
            vec![MusicTrack::Welcome, MusicTrack::Stage(1), MusicTrack::Stage(2)]
        );
        assert_eq!(audio.backend().stops, 2);

        audio.sync_music(GamePhase::GameOver, 6);
        assert_eq!(audio.current_track(), None);
        assert_eq!(audio.backend().stops, 3);
        audio.stop_music();
        assert_eq!(audio.backend().stops, 3);
    }

    #[test]
    fn test_events_map_to_effects() {
        let mut audio = AudioManager::new(MockBackend::default(), 0.11, 0.65);
        audio.handle_events(&[
            GameEvent::WallBounce,
            GameEvent::BrickHit {
                column: 0,
                row: 0,
                kind: BrickKind::Normal,
                destroyed: true,
            },
            GameEvent::PickupCaught {
                kind: PickupKind::Debuff(DebuffKind::DropBricks),
            },
            GameEvent::PickupCaught {
                kind: PickupKind::Bonus(BonusKind::SplitBall),
            },
            GameEvent::LevelCleared { level: 1 },
        ]);
        let played: Vec<_> = audio.backend().effects.iter().map(|(e, _)| *e).collect();
        assert_eq!(
            played,
            vec![
                SoundEffect::WallCollision,
                SoundEffect::BrickCollision,
                SoundEffect::BrickDestroyed,
                SoundEffect::DebuffPickedUp,
                SoundEffect::BonusPickedUp,
            ]
        );
        assert!(audio.backend().effects.iter().all(|(_, v)| *v == 0.65));
    }

    #[test]
    fn test_backend_failures_are_swallowed() {
        let backend = MockBackend {
            blocked: true,
            ..Default::default()
        };
        let mut audio = AudioManager::new(backend, 0.5, 0.5);
        audio.play_sound(SoundEffect::PaddleCollision);
        audio.sync_music(GamePhase::Welcome, 1);
        // Not retried every frame
        audio.sync_music(GamePhase::Welcome, 1);
        assert_eq!(audio.current_track(), Some(MusicTrack::Welcome));
        assert!(audio.backend().effects.is_empty());
    }
}
