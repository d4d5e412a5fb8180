//! Input management system
//!
//! Device polling belongs to the platform layer, which exposes raw state
//! through [`InputSource`]. [`Input`] polls that source once per update
//! sequence and tracks logical [`Button`]s and [`Axis`] values on top of it.

use slotmap::SlotMap;

use crate::foundation::math::Vec2;

/// Raw device state supplied by the platform layer
pub trait InputSource {
    /// Check if a key is held
    fn is_key_down(&self, key: KeyCode) -> bool;

    /// Check if a mouse button is held
    fn is_mouse_button_down(&self, button: MouseButton) -> bool;

    /// Wheel movement since the last poll (positive is up)
    fn mouse_wheel_delta(&self) -> i32 {
        0
    }
}

/// Input source with nothing held, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn is_key_down(&self, _key: KeyCode) -> bool {
        false
    }

    fn is_mouse_button_down(&self, _button: MouseButton) -> bool {
        false
    }
}

slotmap::new_key_type! {
    /// Handle of a registered [`Button`]
    pub struct ButtonId;

    /// Handle of a registered [`Axis`]
    pub struct AxisId;
}

/// Logical input state shared with every hook through the frame context
#[derive(Debug, Clone, Default)]
pub struct Input {
    buttons: SlotMap<ButtonId, Button>,
    axes: SlotMap<AxisId, Axis>,
}

impl Input {
    /// Create an input manager with no bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a button
    pub fn add_button(&mut self, button: Button) -> ButtonId {
        self.buttons.insert(button)
    }

    /// Register an axis
    pub fn add_axis(&mut self, axis: Axis) -> AxisId {
        self.axes.insert(axis)
    }

    /// Unregister a button
    pub fn remove_button(&mut self, id: ButtonId) -> Option<Button> {
        self.buttons.remove(id)
    }

    /// Unregister an axis
    pub fn remove_axis(&mut self, id: AxisId) -> Option<Axis> {
        self.axes.remove(id)
    }

    /// Get a registered button
    pub fn button(&self, id: ButtonId) -> Option<&Button> {
        self.buttons.get(id)
    }

    /// Get a registered axis
    pub fn axis(&self, id: AxisId) -> Option<&Axis> {
        self.axes.get(id)
    }

    /// Check if a registered button went down this update
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.button(id).is_some_and(Button::is_pressed)
    }

    /// Check if a registered button is held
    pub fn is_down(&self, id: ButtonId) -> bool {
        self.button(id).is_some_and(Button::is_down)
    }

    /// Read every binding from the source
    pub fn poll(&mut self, source: &dyn InputSource) {
        for button in self.buttons.values_mut() {
            button.poll(source);
        }
        for axis in self.axes.values_mut() {
            axis.poll(source);
        }
    }
}

/// Mouse wheel direction a button can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelDirection {
    /// Wheel moved up
    Up,
    /// Wheel moved down
    Down,
    /// Wheel moved either way
    Any,
}

impl WheelDirection {
    fn matches(self, delta: i32) -> bool {
        match self {
            Self::Up => delta > 0,
            Self::Down => delta < 0,
            Self::Any => delta != 0,
        }
    }
}

/// Logical button bound to any number of keys, mouse buttons and wheel directions
#[derive(Debug, Clone, Default)]
pub struct Button {
    keys: Vec<KeyCode>,
    mouse_buttons: Vec<MouseButton>,
    wheel: Vec<WheelDirection>,
    down: bool,
    previously_down: bool,
}

impl Button {
    /// Create an unbound button
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key
    pub fn with_key(mut self, key: KeyCode) -> Self {
        self.keys.push(key);
        self
    }

    /// Bind a mouse button
    pub fn with_mouse_button(mut self, button: MouseButton) -> Self {
        self.mouse_buttons.push(button);
        self
    }

    /// Bind a wheel direction
    pub fn with_wheel(mut self, direction: WheelDirection) -> Self {
        self.wheel.push(direction);
        self
    }

    /// Held this update
    pub const fn is_down(&self) -> bool {
        self.down
    }

    /// Not held this update
    pub const fn is_up(&self) -> bool {
        !self.down
    }

    /// Went down this update
    pub const fn is_pressed(&self) -> bool {
        self.down && !self.previously_down
    }

    /// Went up this update
    pub const fn is_released(&self) -> bool {
        !self.down && self.previously_down
    }

    /// Sample the bound inputs
    pub fn poll(&mut self, source: &dyn InputSource) {
        self.previously_down = self.down;
        let delta = source.mouse_wheel_delta();
        self.down = self.keys.iter().any(|key| source.is_key_down(*key))
            || self.mouse_buttons.iter().any(|button| source.is_mouse_button_down(*button))
            || self.wheel.iter().any(|direction| direction.matches(delta));
    }
}

/// Two-dimensional digital axis driven by four sets of keys
#[derive(Debug, Clone, Default)]
pub struct Axis {
    up: Vec<KeyCode>,
    left: Vec<KeyCode>,
    down: Vec<KeyCode>,
    right: Vec<KeyCode>,
    value: Vec2,
}

impl Axis {
    /// Create an axis from one key per direction
    pub fn new(up: KeyCode, left: KeyCode, down: KeyCode, right: KeyCode) -> Self {
        Self::default().with_keys(up, left, down, right)
    }

    /// W, A, S, D
    pub fn wasd() -> Self {
        Self::new(KeyCode::W, KeyCode::A, KeyCode::S, KeyCode::D)
    }

    /// Arrow keys
    pub fn arrow_keys() -> Self {
        Self::new(KeyCode::Up, KeyCode::Left, KeyCode::Down, KeyCode::Right)
    }

    /// Bind another key per direction
    pub fn with_keys(mut self, up: KeyCode, left: KeyCode, down: KeyCode, right: KeyCode) -> Self {
        self.up.push(up);
        self.left.push(left);
        self.down.push(down);
        self.right.push(right);
        self
    }

    /// Horizontal value, negative is left
    pub fn x(&self) -> f32 {
        self.value.x
    }

    /// Vertical value, negative is up
    pub fn y(&self) -> f32 {
        self.value.y
    }

    /// Both values
    pub const fn value(&self) -> Vec2 {
        self.value
    }

    /// Sample the bound keys
    pub fn poll(&mut self, source: &dyn InputSource) {
        let held = |keys: &[KeyCode]| keys.iter().filter(|key| source.is_key_down(**key)).count() as f32;
        self.value = Vec2::new(
            held(&self.right) - held(&self.left),
            held(&self.down) - held(&self.up),
        );
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}
