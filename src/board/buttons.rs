//! 9-button input with async debouncing.
//!
//! The badge has a D-pad (up/down/left/right), A, B, Start, Select,
//! and a joystick click button. The demo UI uses them in place of a touch
//! panel: [`Buttons::next_press`] waits on all of them at once.

use embassy_futures::select::select_array;
use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::gpio::{
    Input,
    InputConfig,
    Level,
    Pull,
};

use super::ButtonResources;

/// A single badge button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Stick,
    A,
    B,
    Start,
    Select,
}

impl Button {
    pub const ALL: [Self; 9] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Stick,
        Self::A,
        Self::B,
        Self::Start,
        Self::Select,
    ];
}

/// All nine badge buttons, ready for polling or async edge detection.
pub struct Buttons {
    pub up: Input<'static>,
    pub down: Input<'static>,
    pub left: Input<'static>,
    pub right: Input<'static>,
    pub stick: Input<'static>,
    pub a: Input<'static>,
    pub b: Input<'static>,
    pub start: Input<'static>,
    pub select: Input<'static>,
}

const DEBOUNCE_MS: u64 = 20;

impl From<ButtonResources<'static>> for Buttons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(Pull::Up);
        Self {
            up: Input::new(res.up, pull_up),
            down: Input::new(res.down, pull_up),
            left: Input::new(res.left, pull_up),
            right: Input::new(res.right, pull_up),
            stick: Input::new(res.stick, pull_up),
            a: Input::new(res.a, pull_up),
            b: Input::new(res.b, pull_up),
            start: Input::new(res.start, pull_up),
            select: Input::new(res.select, InputConfig::default().with_pull(Pull::Down)),
        }
    }
}

impl Buttons {
    /// Wait until any button has been pressed and released, and report which.
    pub async fn next_press(&mut self) -> Button {
        let (_, index) = select_array([
            Self::debounce_level(&mut self.up, Level::Low),
            Self::debounce_level(&mut self.down, Level::Low),
            Self::debounce_level(&mut self.left, Level::Low),
            Self::debounce_level(&mut self.right, Level::Low),
            Self::debounce_level(&mut self.stick, Level::Low),
            Self::debounce_level(&mut self.a, Level::Low),
            Self::debounce_level(&mut self.b, Level::Low),
            Self::debounce_level(&mut self.start, Level::Low),
            // Select idles low and reads high when pressed.
            Self::debounce_level(&mut self.select, Level::High),
        ])
        .await;

        let button = Button::ALL[index];
        let released = match button {
            Button::Select => Level::Low,
            _ => Level::High,
        };
        Self::debounce_level(self.input(button), released).await;
        button
    }

    fn input(&mut self, button: Button) -> &mut Input<'static> {
        match button {
            Button::Up => &mut self.up,
            Button::Down => &mut self.down,
            Button::Left => &mut self.left,
            Button::Right => &mut self.right,
            Button::Stick => &mut self.stick,
            Button::A => &mut self.a,
            Button::B => &mut self.b,
            Button::Start => &mut self.start,
            Button::Select => &mut self.select,
        }
    }

    /// Wait for an edge into `level` that is still there after the debounce
    /// time.
    async fn debounce_level(button: &mut Input<'_>, level: Level) {
        loop {
            match level {
                Level::Low => button.wait_for_falling_edge().await,
                Level::High => button.wait_for_rising_edge().await,
            }
            Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
            if button.level() == level {
                return;
            }
        }
    }
}
