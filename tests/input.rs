use pixen::input::{InputState, KeyCode, KeyState, MouseButton};

#[test]
fn keys_start_idle() {
    let input = InputState::new();
    assert_eq!(input.key(KeyCode::KeyA), KeyState::Idle);
    assert_eq!(input.mouse(MouseButton::Left), KeyState::Idle);
}

#[test]
fn tap_within_one_frame_reads_pressed_then_released() {
    let mut input = InputState::new();

    input.set_key(KeyCode::Enter, true);
    assert_eq!(input.key(KeyCode::Enter), KeyState::Pressed);
    input.end_frame();

    input.set_key(KeyCode::Enter, false);
    assert_eq!(input.key(KeyCode::Enter), KeyState::Released);
    input.end_frame();

    assert_eq!(input.key(KeyCode::Enter), KeyState::Idle);
}

#[test]
fn holding_reads_held_until_release() {
    let mut input = InputState::new();
    input.set_key(KeyCode::Space, true);
    input.end_frame();
    for _ in 0..3 {
        assert_eq!(input.key(KeyCode::Space), KeyState::Held);
        input.end_frame();
    }
    input.set_key(KeyCode::Space, false);
    assert_eq!(input.key(KeyCode::Space), KeyState::Released);
}

#[test]
fn keys_do_not_interfere() {
    let mut input = InputState::new();
    input.set_key(KeyCode::KeyW, true);
    input.end_frame();
    input.set_key(KeyCode::KeyS, true);

    assert_eq!(input.key(KeyCode::KeyW), KeyState::Held);
    assert_eq!(input.key(KeyCode::KeyS), KeyState::Pressed);
    assert_eq!(input.key(KeyCode::KeyA), KeyState::Idle);
}

#[test]
fn state_is_stable_within_a_frame() {
    let mut input = InputState::new();
    input.set_key(KeyCode::KeyQ, true);
    // polling repeatedly must not consume the Pressed edge
    for _ in 0..5 {
        assert_eq!(input.key(KeyCode::KeyQ), KeyState::Pressed);
    }
}

#[test]
fn mouse_buttons_run_the_same_automaton() {
    let mut input = InputState::new();
    input.set_mouse(MouseButton::Right, true);
    assert_eq!(input.mouse(MouseButton::Right), KeyState::Pressed);
    input.end_frame();
    assert_eq!(input.mouse(MouseButton::Right), KeyState::Held);
    input.set_mouse(MouseButton::Right, false);
    assert_eq!(input.mouse(MouseButton::Right), KeyState::Released);
}

#[test]
fn key_state_predicates() {
    assert!(KeyState::Pressed.pressed());
    assert!(KeyState::Pressed.down());
    assert!(KeyState::Held.held());
    assert!(KeyState::Held.down());
    assert!(KeyState::Released.released());
    assert!(!KeyState::Released.down());
    assert!(KeyState::Idle.idle());
}

#[test]
fn wheel_resets_each_frame() {
    let mut input = InputState::new();
    assert_eq!(input.wheel(), 0.0);
    input.end_frame();
    assert_eq!(input.wheel(), 0.0);
}
