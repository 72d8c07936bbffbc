use std::time::Instant;

use kiss3d::event::{Action, Event, Key, MouseButton, WindowEvent};
use nalgebra::{Point2, Vector2};

use super::view::View;

// Key config, all in one place
const KEY_PREV_FOCUS: Key = Key::Q;
const KEY_NEXT_FOCUS: Key = Key::E;
const KEY_SURFACE_VIEW: Key = Key::V;
const KEY_DETACH: Key = Key::X;
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_REWIND: Key = Key::R;
const KEY_TOGGLE_PAUSE: Key = Key::Space;
const KEY_TOGGLE_ORBITS: Key = Key::O;
const KEY_TOGGLE_MOONS: Key = Key::M;
const KEY_TOGGLE_FOCUS_MOONS: Key = Key::N;
const KEY_CAMERA_MOVE_UP: Key = Key::W;
const KEY_CAMERA_MOVE_DOWN: Key = Key::S;
const KEY_CAMERA_MOVE_LEFT: Key = Key::A;
const KEY_CAMERA_MOVE_RIGHT: Key = Key::D;
const KEY_CAMERA_ZOOM_IN: Key = Key::Equals;
const KEY_CAMERA_ZOOM_OUT: Key = Key::Minus;

const KEY_ANGLE_STEP: f64 = 0.1;
const KEY_ZOOM_STEP: f64 = 1.2;
const DRAG_ANGLE_STEP: f64 = 0.005;
const PAN_STEP: f64 = 0.001;
const SCROLL_RATIO: f64 = 1.2;

pub struct Controller {
    time_scale: f64,
    paused: bool,
    orbits_visible: bool,
    moons_visible: bool,
    cursor_pos: Vector2<f64>,
    // which button is held, if any
    dragging: Option<MouseButton>,
    fps_counter: FpsCounter,
}

pub struct FpsCounter {
    instant: Instant,
    counter: usize,
    window_size_millis: u128,
    previous_fps: f64,
}

impl FpsCounter {
    pub fn new(window_size_millis: u128) -> Self {
        FpsCounter {
            instant: Instant::now(),
            counter: 0,
            previous_fps: 0.0,
            window_size_millis,
        }
    }

    pub fn value(&self) -> f64 {
        self.previous_fps
    }

    pub fn increment(&mut self) {
        self.counter += 1;

        let elapsed = self.instant.elapsed().as_millis();
        if elapsed > self.window_size_millis {
            self.previous_fps = (1000 * self.counter) as f64 / elapsed as f64;
            self.instant = Instant::now();
            self.counter = 0;
        }
    }
}

impl Controller {
    pub fn new(time_scale: f64) -> Self {
        Controller {
            time_scale,
            paused: false,
            orbits_visible: true,
            moons_visible: true,
            cursor_pos: Vector2::zeros(),
            dragging: None,
            fps_counter: FpsCounter::new(1000),
        }
    }

    pub fn process_event(&mut self, event: Event, view: &mut View) {
        match event.value {
            WindowEvent::Key(KEY_NEXT_FOCUS, Action::Press, _) => view.camera_focus_next(),
            WindowEvent::Key(KEY_PREV_FOCUS, Action::Press, _) => view.camera_focus_prev(),
            WindowEvent::Key(KEY_SURFACE_VIEW, Action::Press, _) => view.surface_view(),
            WindowEvent::Key(KEY_DETACH, Action::Press, _) => {
                view.planetarium_mut().detach_camera();
            }
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _) => {
                self.time_scale *= 2.0;
                self.apply_time_scale(view);
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _) => {
                self.time_scale /= 2.0;
                self.apply_time_scale(view);
            }
            WindowEvent::Key(KEY_REWIND, Action::Press, _) => {
                self.time_scale *= -1.0;
                self.paused = false;
                self.apply_time_scale(view);
            }
            WindowEvent::Key(KEY_TOGGLE_PAUSE, Action::Press, _) => {
                self.paused = !self.paused;
                self.apply_time_scale(view);
            }
            WindowEvent::Key(KEY_TOGGLE_ORBITS, Action::Press, _) => {
                self.orbits_visible = !self.orbits_visible;
                view.planetarium_mut()
                    .set_orbit_lines_visible(self.orbits_visible);
            }
            WindowEvent::Key(KEY_TOGGLE_MOONS, Action::Press, _) => {
                self.moons_visible = !self.moons_visible;
                view.planetarium_mut().set_moons_visible(self.moons_visible);
            }
            WindowEvent::Key(KEY_TOGGLE_FOCUS_MOONS, Action::Press, _) => {
                view.toggle_focus_moons();
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_UP, Action::Press, _) => {
                view.planetarium_mut().orbit(0.0, -KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_DOWN, Action::Press, _) => {
                view.planetarium_mut().orbit(0.0, KEY_ANGLE_STEP)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_LEFT, Action::Press, _) => {
                view.planetarium_mut().orbit(-KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_MOVE_RIGHT, Action::Press, _) => {
                view.planetarium_mut().orbit(KEY_ANGLE_STEP, 0.0)
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_IN, Action::Press, _) => {
                view.planetarium_mut().zoom(KEY_ZOOM_STEP.recip())
            }
            WindowEvent::Key(KEY_CAMERA_ZOOM_OUT, Action::Press, _) => {
                view.planetarium_mut().zoom(KEY_ZOOM_STEP)
            }
            WindowEvent::MouseButton(button, Action::Press, _) => {
                self.dragging = Some(button);
                if button == MouseButton::Button1 {
                    view.planetarium_mut()
                        .press_pointer(Point2::from(self.cursor_pos));
                }
            }
            WindowEvent::MouseButton(button, Action::Release, _) => {
                self.dragging = None;
                if button == MouseButton::Button1 {
                    let ndc = view.pixel_to_ndc(&self.cursor_pos);
                    view.planetarium_mut()
                        .release_pointer(Point2::from(self.cursor_pos), &ndc);
                }
            }
            WindowEvent::CursorPos(x, y, _) => {
                let curr_pos = Vector2::new(x, y);
                let dpos = curr_pos - self.cursor_pos;
                match self.dragging {
                    // Rotate the opposite direction as the mouse moves (drag right == camera
                    // glides left)
                    Some(MouseButton::Button1) => view
                        .planetarium_mut()
                        .orbit(-dpos.x * DRAG_ANGLE_STEP, -dpos.y * DRAG_ANGLE_STEP),
                    Some(MouseButton::Button2) => view
                        .planetarium_mut()
                        .pan(-dpos.x * PAN_STEP, dpos.y * PAN_STEP),
                    _ => {}
                }
                self.cursor_pos = curr_pos;
            }
            WindowEvent::Scroll(_, off, _) => {
                // scroll up == zoom in
                if off < 0.0 {
                    view.planetarium_mut().zoom(SCROLL_RATIO);
                } else if off > 0.0 {
                    view.planetarium_mut().zoom(SCROLL_RATIO.recip());
                }
            }
            WindowEvent::FramebufferSize(w, h) if h > 0 => {
                view.planetarium_mut().set_aspect(w as f64 / h as f64);
            }
            _ => {}
        }
    }

    fn apply_time_scale(&self, view: &mut View) {
        let scale = if self.paused { 0.0 } else { self.time_scale };
        view.planetarium_mut().set_time_scale(scale);
        log::info!(
            "Time scale is {}{}",
            self.time_scale,
            if self.paused { " (paused)" } else { "" }
        );
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn fps(&self) -> f64 {
        self.fps_counter.value()
    }

    pub fn increment_frame_counter(&mut self) {
        self.fps_counter.increment()
    }
}
