//! Scene controller behaviour
//!
//! Models are handed to the controller directly as decoded `ModelAsset`s so
//! the tests do not depend on GLB files being present.

use std::f32::consts::PI;
use std::time::Duration;

use welcome_core::{AnimationClip, AnimationState, AssetEvent, AssetKey, MeshInfo, ModelAsset};
use welcome_game::config::AppConfig;
use welcome_game::scene::SceneController;
use welcome_input::Keys;
use welcome_math::Vec3;
use welcome_physics::{Aabb, Collider};
use winit::event::{ElementState, TouchPhase};
use winit::keyboard::KeyCode;

const EPSILON: f32 = 1e-4;

fn character_model() -> ModelAsset {
    ModelAsset {
        scene_count: 1,
        meshes: vec![MeshInfo {
            name: Some("BoxMan".to_string()),
            bounds: None,
        }],
        animations: ["idle", "run", "jump_running", ""]
            .iter()
            .map(|name| AnimationClip {
                name: name.to_string(),
                channel_count: 2,
            })
            .collect(),
    }
}

/// Book whose only collider becomes a floor just under the player spawn
fn floor_book_model() -> ModelAsset {
    // Floor top at y = -4.0 after the (-18.8, 4.35, -15.55) book offset
    let floor = Aabb::new(Vec3::new(48.8, -9.35, 10.55), Vec3::new(58.8, -8.35, 20.55));
    ModelAsset {
        scene_count: 1,
        meshes: vec![
            MeshInfo {
                name: Some("Floor_Mesh".to_string()),
                bounds: Some(floor),
            },
            MeshInfo {
                name: Some("Decoration".to_string()),
                bounds: Some(floor),
            },
        ],
        animations: vec![AnimationClip {
            name: "pages".to_string(),
            channel_count: 1,
        }],
    }
}

fn ready(scene: &mut SceneController, key: AssetKey, model: ModelAsset) {
    scene.on_asset_ready(AssetEvent {
        key,
        path: format!("memory/{}.glb", key).into(),
        result: Ok(model),
    });
}

fn scene_with_player() -> SceneController {
    let mut scene = SceneController::new(AppConfig::default());
    scene.init(800.0, 600.0, 1.0);
    scene.bind_input(false);
    ready(&mut scene, AssetKey::Character, character_model());
    scene
}

fn vy(scene: &SceneController) -> f32 {
    scene.player_body().unwrap().velocity.y
}

#[test]
fn test_update_without_player_is_noop() {
    let mut scene = SceneController::new(AppConfig::default());
    scene.bind_input(false);
    scene.input_mut().keys.set(Keys::FORWARD | Keys::JUMP, true);
    scene.input_mut().move_held = true;

    for delta in [0.0, 1.0 / 60.0, 0.5, 10.0, 1e6] {
        scene.update(delta);
    }

    assert!(scene.can_jump());
    assert!(scene.player().is_none());
    assert!(scene.controls().is_none());
    assert_eq!(scene.physics().body_count(), 0);
}

#[test]
fn test_jump_without_player_is_noop() {
    let mut scene = SceneController::new(AppConfig::default());
    scene.jump();
    assert!(scene.can_jump());
}

#[test]
fn test_character_attach() {
    let scene = scene_with_player();
    let player = scene.player().unwrap();
    assert_eq!(player.current_animation(), Some(AnimationState::Idle));
    assert_eq!(player.mixer.clip_count(), 3);

    let body = scene.player_body().unwrap();
    assert_eq!(body.position, Vec3::new(35.0, -3.5, 0.0));
    assert_eq!(body.radius(), 0.25);
    assert_eq!(body.angular_factor, Vec3::ZERO);

    let controls = scene.controls().unwrap();
    assert!(controls.pointer_lock());
    assert_eq!(controls.theta, 90.0);
    assert_eq!(controls.target_radius, 3.0);
    assert!(scene.assets().handle_named("character").is_some());
}

#[test]
fn test_second_character_is_ignored() {
    let mut scene = scene_with_player();
    ready(&mut scene, AssetKey::Character, character_model());
    assert_eq!(scene.physics().body_count(), 1);
}

#[test]
fn test_jump_cooldown() {
    let mut scene = scene_with_player();

    scene.jump();
    assert!((vy(&scene) - 6.0).abs() < EPSILON);
    assert!(!scene.can_jump());
    assert_eq!(
        scene.player().unwrap().current_animation(),
        Some(AnimationState::JumpRunning)
    );

    // Second jump inside the cooldown adds nothing
    scene.jump();
    assert!((vy(&scene) - 6.0).abs() < EPSILON);

    scene.frame(Duration::from_millis(749));
    assert!(!scene.can_jump());
    scene.frame(Duration::from_millis(1));
    assert!(scene.can_jump());
    assert_eq!(
        scene.player().unwrap().current_animation(),
        Some(AnimationState::Idle)
    );

    let before = vy(&scene);
    scene.jump();
    assert!((vy(&scene) - before - 6.0).abs() < EPSILON);
}

#[test]
fn test_jump_key_triggers_jump() {
    let mut scene = scene_with_player();
    assert!(scene.process_keyboard(KeyCode::Space, ElementState::Pressed));
    scene.update(1.0 / 60.0);
    assert!(!scene.can_jump());
    assert!((vy(&scene) - 6.0).abs() < EPSILON);
}

#[test]
fn test_initial_pose_needs_no_turn() {
    let mut scene = scene_with_player();
    scene.update(1.0 / 60.0);
    assert_eq!(scene.player_body().unwrap().angular_velocity.y, 0.0);
}

#[test]
fn test_aligned_headings_give_zero_yaw() {
    let mut scene = scene_with_player();
    scene.controls_mut().unwrap().face_heading(0.0);
    scene.player_body_mut().unwrap().yaw = 0.0;

    scene.update(1.0 / 60.0);
    assert_eq!(scene.player_body().unwrap().angular_velocity.y, 0.0);
}

#[test]
fn test_quarter_turn_gives_full_yaw_speed() {
    let mut scene = scene_with_player();
    scene.controls_mut().unwrap().face_heading(PI / 2.0);
    scene.player_body_mut().unwrap().yaw = 0.0;

    scene.update(1.0 / 60.0);
    assert_eq!(scene.player_body().unwrap().angular_velocity.y, 8.0);
}

#[test]
fn test_forward_runs_along_camera_heading() {
    let mut scene = scene_with_player();
    scene.controls_mut().unwrap().face_heading(0.0);
    scene.player_body_mut().unwrap().velocity.y = -1.5;

    scene.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
    scene.update(1.0 / 60.0);

    let v = scene.player_body().unwrap().velocity;
    assert!(v.x.abs() < EPSILON);
    assert_eq!(v.y, -1.5);
    assert!((v.z - 4.0).abs() < EPSILON);
    assert_eq!(scene.player().unwrap().current_animation(), Some(AnimationState::Run));

    scene.process_keyboard(KeyCode::KeyW, ElementState::Released);
    scene.update(1.0 / 60.0);
    assert_eq!(scene.player().unwrap().current_animation(), Some(AnimationState::Idle));
}

#[test]
fn test_release_during_jump_keeps_jump_animation() {
    let mut scene = scene_with_player();
    scene.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
    scene.update(1.0 / 60.0);
    scene.jump();

    scene.process_keyboard(KeyCode::KeyW, ElementState::Released);
    scene.update(1.0 / 60.0);
    assert_eq!(
        scene.player().unwrap().current_animation(),
        Some(AnimationState::JumpRunning)
    );
}

#[test]
fn test_resize_keeps_aspect() {
    let mut scene = SceneController::new(AppConfig::default());
    scene.init(800.0, 600.0, 1.0);
    assert_eq!(scene.viewport().fit_height(1600.0), 1200.0);

    let rect = scene.resize(1600.0, 1200.0);
    assert_eq!((rect.width, rect.height), (1600.0, 1200.0));
}

#[test]
fn test_book_colliders_from_matching_meshes() {
    let mut scene = SceneController::new(AppConfig::default());
    ready(&mut scene, AssetKey::Book, floor_book_model());

    let book = scene.book().unwrap();
    assert_eq!(book.bodies.len(), 1);
    assert_eq!(book.mixer.active_clips().count(), 1);

    let body = scene.physics().get_body(book.bodies[0]).unwrap();
    assert!(body.is_static);
    match body.collider {
        Collider::Aabb(aabb) => assert!((aabb.max.y + 4.0).abs() < EPSILON),
        other => panic!("Expected box collider, got {:?}", other),
    }
}

#[test]
fn test_book_mesh_without_bounds_uses_fallback() {
    let mut scene = SceneController::new(AppConfig::default());
    let model = ModelAsset {
        scene_count: 1,
        meshes: vec![MeshInfo {
            name: Some("mesh_0".to_string()),
            bounds: None,
        }],
        animations: Vec::new(),
    };
    ready(&mut scene, AssetKey::Book, model);
    assert_eq!(scene.book().unwrap().bodies.len(), 1);
}

#[test]
fn test_player_lands_on_book() {
    let mut scene = scene_with_player();
    ready(&mut scene, AssetKey::Book, floor_book_model());

    for _ in 0..120 {
        scene.frame(Duration::from_millis(16));
    }

    let body = scene.player_body().unwrap();
    assert!(body.grounded);
    assert!((body.position.y + 3.75).abs() < 0.05);
    // Camera follows the body
    assert_eq!(scene.controls().unwrap().target(), body.position);
}

#[test]
fn test_touch_joystick_drives_scene() {
    let mut scene = SceneController::new(AppConfig::default());
    scene.init(800.0, 600.0, 1.0);
    scene.bind_input(true);
    ready(&mut scene, AssetKey::Character, character_model());
    assert!(!scene.controls().unwrap().pointer_lock());

    // B holds movement
    scene.touch(1, TouchPhase::Started, 665.0, 365.0);
    assert!(scene.input().move_held);
    scene.touch(1, TouchPhase::Ended, 665.0, 365.0);
    assert!(!scene.input().move_held);

    // A jumps
    scene.touch(2, TouchPhase::Started, 740.0, 290.0);
    assert!(!scene.can_jump());

    // Axis pushed right orbits the camera
    let theta = scene.controls().unwrap().theta;
    scene.touch(3, TouchPhase::Started, 70.0, 355.0);
    scene.touch(3, TouchPhase::Moved, 120.0, 355.0);
    assert_eq!(scene.input().joystick_right, 1.0);
    scene.update(1.0 / 60.0);
    assert!((scene.controls().unwrap().theta - (theta - 1.5)).abs() < EPSILON);
}

#[test]
fn test_touch_on_hidpi_surface() {
    let mut scene = SceneController::new(AppConfig::default());
    scene.init(800.0, 600.0, 2.0);
    scene.bind_input(true);
    ready(&mut scene, AssetKey::Character, character_model());
    scene.resize(1600.0, 1200.0);

    // Logical B centre (665, 365) arrives in physical pixels
    scene.touch(1, TouchPhase::Started, 1330.0, 730.0);
    assert!(scene.input().move_held);
    scene.touch(1, TouchPhase::Ended, 1330.0, 730.0);
    assert!(!scene.input().move_held);

    // Same tap with the scale factor back at 1 lands far from B
    scene.set_scale_factor(1.0);
    scene.resize(800.0, 600.0);
    scene.touch(2, TouchPhase::Started, 1330.0, 730.0);
    assert!(!scene.input().move_held);
}

#[test]
fn test_pointer_captured_before_character_loads() {
    let mut scene = SceneController::new(AppConfig::default());
    scene.init(800.0, 600.0, 1.0);
    scene.bind_input(false);
    scene.set_pointer_locked(true);
    ready(&mut scene, AssetKey::Character, character_model());

    let theta = scene.controls().unwrap().theta;
    scene.process_mouse_motion(10.0, 0.0);
    scene.update(1.0 / 60.0);
    assert!((scene.controls().unwrap().theta - (theta - 5.0)).abs() < EPSILON);
}

#[test]
fn test_cooldown_after_teardown() {
    let mut scene = scene_with_player();
    scene.jump();
    scene.teardown();
    assert!(scene.player().is_none());
    assert_eq!(scene.physics().body_count(), 0);

    scene.frame(Duration::from_millis(750));
    assert!(scene.can_jump());
    scene.update(1.0 / 60.0);
}

#[test]
fn test_model_file_loads_synchronously() {
    let dir = std::env::temp_dir().join("welcome_scene_controller_tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("box_man.gltf");
    std::fs::write(
        &path,
        r#"{
            "asset": { "version": "2.0" },
            "scenes": [ { "nodes": [] } ],
            "animations": [
                { "name": "idle", "channels": [], "samplers": [] },
                { "name": "run", "channels": [], "samplers": [] }
            ]
        }"#,
    )
    .unwrap();

    let mut scene = SceneController::new(AppConfig::default());
    scene.load_now(AssetKey::Character, &path).unwrap();
    assert_eq!(scene.player().unwrap().mixer.clip_count(), 2);

    let _ = std::fs::remove_dir_all(&dir);
}
