//! Scene entities
//!
//! An entity ties a cached model to its physics bodies and animation mixer.
//! Bodies live in the physics world; entities only hold keys.

use welcome_physics::BodyKey;

use crate::animation::{AnimationMixer, AnimationState};
use crate::asset_cache::AssetHandle;
use crate::model::ModelAsset;

/// The controllable character
#[derive(Clone, Debug)]
pub struct PlayerEntity {
    pub mesh: AssetHandle,
    pub body: Option<BodyKey>,
    pub mixer: AnimationMixer,
    current_animation: Option<AnimationState>,
}

impl PlayerEntity {
    /// Player with a mixer holding every named clip of `model`
    pub fn new(mesh: AssetHandle, model: &ModelAsset) -> Self {
        let mut mixer = AnimationMixer::new();
        for clip in model.named_animations() {
            mixer.add_clip(&clip.name, clip.channel_count);
        }
        Self {
            mesh,
            body: None,
            mixer,
            current_animation: None,
        }
    }

    pub fn with_body(mut self, body: BodyKey) -> Self {
        self.body = Some(body);
        self
    }

    /// Play the clip for `state`
    ///
    /// A missing clip is logged and the state is still recorded, so the
    /// controller's state machine does not depend on the model's contents.
    pub fn set_action(&mut self, state: AnimationState) {
        if !self.mixer.play(state.clip_name()) {
            log::warn!("Character has no '{}' clip", state.clip_name());
        }
        self.current_animation = Some(state);
    }

    pub fn current_animation(&self) -> Option<AnimationState> {
        self.current_animation
    }
}

/// The static book level
#[derive(Clone, Debug)]
pub struct BookEntity {
    pub mesh: AssetHandle,
    /// Static bodies for the mesh parts that collide
    pub bodies: Vec<BodyKey>,
    pub mixer: AnimationMixer,
}

impl BookEntity {
    /// Book with every named clip of `model` playing
    pub fn new(mesh: AssetHandle, model: &ModelAsset) -> Self {
        let mut mixer = AnimationMixer::new();
        for clip in model.named_animations() {
            mixer.add_clip(&clip.name, clip.channel_count);
        }
        mixer.play_all();
        Self {
            mesh,
            bodies: Vec::new(),
            mixer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_cache::AssetCache;
    use crate::model::AnimationClip;

    fn model(clips: &[&str]) -> ModelAsset {
        ModelAsset {
            scene_count: 1,
            meshes: Vec::new(),
            animations: clips
                .iter()
                .map(|name| AnimationClip {
                    name: name.to_string(),
                    channel_count: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_player_set_action() {
        let m = model(&["idle", "run", "jump_running"]);
        let mut cache = AssetCache::new();
        let handle = cache.insert("box_man.glb", m.clone());
        let mut player = PlayerEntity::new(handle, &m);

        assert_eq!(player.current_animation(), None);
        player.set_action(AnimationState::Run);
        assert_eq!(player.current_animation(), Some(AnimationState::Run));
        assert!(player.mixer.is_playing("run"));
    }

    #[test]
    fn test_player_missing_clip_still_records_state() {
        let m = model(&["idle"]);
        let mut cache = AssetCache::new();
        let handle = cache.insert("box_man.glb", m.clone());
        let mut player = PlayerEntity::new(handle, &m);

        player.set_action(AnimationState::Idle);
        player.set_action(AnimationState::JumpRunning);
        assert_eq!(player.current_animation(), Some(AnimationState::JumpRunning));
        assert!(player.mixer.is_playing("idle"));
    }

    #[test]
    fn test_book_plays_all_named_clips() {
        let m = model(&["pages", "", "cover"]);
        let mut cache = AssetCache::new();
        let handle = cache.insert("book.glb", m.clone());
        let book = BookEntity::new(handle, &m);

        assert_eq!(book.mixer.clip_count(), 2);
        assert_eq!(book.mixer.active_clips().count(), 2);
        assert!(book.bodies.is_empty());
    }
}
