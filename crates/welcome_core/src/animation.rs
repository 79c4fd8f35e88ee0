//! Animation clip bookkeeping
//!
//! The mixer tracks which clips are playing and how far along they are.
//! Pose evaluation belongs to the renderer; the scene only needs to switch
//! clips by name.

use std::collections::HashMap;

/// Player animation states
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationState {
    #[default]
    Idle,
    Run,
    JumpRunning,
}

impl AnimationState {
    /// Clip name in the character model
    pub fn clip_name(&self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Run => "run",
            AnimationState::JumpRunning => "jump_running",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ActiveClip {
    name: String,
    time: f32,
}

/// Playback state for one model's clips
#[derive(Clone, Debug, Default)]
pub struct AnimationMixer {
    /// Clip name to channel count
    clips: HashMap<String, usize>,
    active: Vec<ActiveClip>,
    elapsed: f32,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_clip(&mut self, name: &str, channel_count: usize) {
        self.clips.insert(name.to_string(), channel_count);
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Switch to a single clip, restarting it
    ///
    /// Returns false (and leaves playback alone) if the clip is unknown.
    pub fn play(&mut self, name: &str) -> bool {
        if !self.has_clip(name) {
            return false;
        }
        self.active.clear();
        self.active.push(ActiveClip {
            name: name.to_string(),
            time: 0.0,
        });
        true
    }

    /// Play every known clip at once
    pub fn play_all(&mut self) {
        let mut names: Vec<_> = self.clips.keys().cloned().collect();
        names.sort();
        self.active = names
            .into_iter()
            .map(|name| ActiveClip { name, time: 0.0 })
            .collect();
    }

    /// Names of the clips currently playing
    pub fn active_clips(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(|c| c.name.as_str())
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.active.iter().any(|c| c.name == name)
    }

    /// Local time of a playing clip
    pub fn clip_time(&self, name: &str) -> Option<f32> {
        self.active.iter().find(|c| c.name == name).map(|c| c.time)
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        for clip in &mut self.active {
            clip.time += dt;
        }
    }

    /// Total time advanced since creation
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
