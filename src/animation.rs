//! LED bar colour-cycle animation.
//!
//! One cycle rests the bar at its resting brightness, fills it LED by LED with
//! the shared colour, wipes it LED by LED, shows the two side colours and
//! ramps the brightness down. The sequence is a fixed state machine; nothing
//! cuts a cycle short.
//!
//! ```text
//! Rest -> Fill(0) .. Fill(9) -> Clear(0) .. Clear(9) -> SideColors -> Dim(40) .. Dim(1)
//!  ^                                                                              |
//!  +------------------------------------------------------------------------------+
//! ```

use embassy_time::Duration;

use crate::{
    color::Color,
    config::{
        DIM_HOLD,
        DIM_START,
        FILL_HOLD,
        LED_COUNT,
        LEFT_SIDE_COLOR,
        REST_BRIGHTNESS,
        RIGHT_SIDE_COLOR,
    },
    drivers::{
        LedStrip,
        Side,
    },
    guarded::GuardedValue,
    periodic::Periodic,
};

/// One state of the colour cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Paint LED `i` with the shared colour.
    Fill(u8),
    /// Turn LED `i` off.
    Clear(u8),
    /// Paint the left and right bars with the sign-on colours.
    SideColors,
    /// Set the strip brightness to `level`.
    Dim(u8),
    /// Restore the resting brightness and blank the strip.
    Rest,
}

impl Phase {
    /// Every cycle, the first one after boot included, starts from rest.
    pub const FIRST: Self = Self::Rest;

    /// Number of phases in one cycle.
    pub const CYCLE_LEN: usize = 2 * LED_COUNT + 1 + DIM_START as usize + 1;

    const LAST_LED: u8 = LED_COUNT as u8 - 1;

    pub const fn next(self) -> Self {
        match self {
            Self::Fill(i) if i < Self::LAST_LED => Self::Fill(i + 1),
            Self::Fill(_) => Self::Clear(0),
            Self::Clear(i) if i < Self::LAST_LED => Self::Clear(i + 1),
            Self::Clear(_) => Self::SideColors,
            Self::SideColors => Self::Dim(DIM_START),
            Self::Dim(level) if level > 1 => Self::Dim(level - 1),
            Self::Dim(_) => Self::FIRST,
            Self::Rest => Self::Fill(0),
        }
    }

    /// Pause after this phase is shown.
    pub const fn hold(self) -> Duration {
        match self {
            Self::Fill(_) | Self::Clear(_) => FILL_HOLD,
            Self::Dim(_) => DIM_HOLD,
            Self::SideColors | Self::Rest => Duration::MIN,
        }
    }
}

/// The LED bar tab's periodic task.
pub struct ColorCycle<'a, L> {
    strip: L,
    color: &'a GuardedValue<Color>,
    phase: Phase,
}

impl<'a, L: LedStrip> ColorCycle<'a, L> {
    pub const fn new(strip: L, color: &'a GuardedValue<Color>) -> Self {
        Self {
            strip,
            color,
            phase: Phase::FIRST,
        }
    }

    /// The phase the next tick plays.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub fn strip(&self) -> &L {
        &self.strip
    }

    async fn play(&mut self, phase: Phase) {
        match phase {
            Phase::Fill(i) => {
                // Read per LED so slider moves show up mid-fill.
                let color = self.color.get();
                self.strip.set_pixel(usize::from(i), color);
            }
            Phase::Clear(i) => self.strip.set_pixel(usize::from(i), Color::BLACK),
            Phase::SideColors => {
                self.strip.set_side(Side::Left, LEFT_SIDE_COLOR);
                self.strip.set_side(Side::Right, RIGHT_SIDE_COLOR);
            }
            Phase::Dim(level) => self.strip.set_brightness(level),
            Phase::Rest => {
                self.strip.set_brightness(REST_BRIGHTNESS);
                self.strip.clear();
            }
        }
        self.strip.show().await;
    }
}

impl<L: LedStrip> Periodic for ColorCycle<'_, L> {
    async fn tick(&mut self) -> Duration {
        let phase = self.phase;
        self.play(phase).await;
        self.phase = phase.next();
        if self.phase == Phase::FIRST {
            trace!("Colour cycle complete");
        }
        phase.hold()
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use embassy_futures::block_on;

    use super::*;
    use crate::{
        config::DEFAULT_BAR_COLOR,
        periodic::PeriodicTask,
        testing::RecordingDelay,
    };

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum StripCall {
        Pixel(usize, Color),
        Side(Side, Color),
        Brightness(u8),
        Clear,
        Show,
    }

    #[derive(Default)]
    struct RecordingStrip {
        calls: Vec<StripCall>,
    }

    impl LedStrip for RecordingStrip {
        fn set_pixel(&mut self, index: usize, color: Color) {
            self.calls.push(StripCall::Pixel(index, color));
        }

        fn set_side(&mut self, side: Side, color: Color) {
            self.calls.push(StripCall::Side(side, color));
        }

        fn set_brightness(&mut self, level: u8) {
            self.calls.push(StripCall::Brightness(level));
        }

        fn clear(&mut self) {
            self.calls.push(StripCall::Clear);
        }

        async fn show(&mut self) {
            self.calls.push(StripCall::Show);
        }
    }

    fn expected_cycle(color: Color) -> Vec<StripCall> {
        let mut calls = vec![StripCall::Brightness(20), StripCall::Clear, StripCall::Show];
        for i in 0..LED_COUNT {
            calls.extend([StripCall::Pixel(i, color), StripCall::Show]);
        }
        for i in 0..LED_COUNT {
            calls.extend([StripCall::Pixel(i, Color::BLACK), StripCall::Show]);
        }
        calls.extend([
            StripCall::Side(Side::Left, Color::INK),
            StripCall::Side(Side::Right, Color::WHITE),
            StripCall::Show,
        ]);
        for level in (1..=40).rev() {
            calls.extend([StripCall::Brightness(level), StripCall::Show]);
        }
        calls
    }

    #[test]
    fn phases_walk_one_cycle_and_wrap() {
        let mut phase = Phase::FIRST;
        for _ in 0..Phase::CYCLE_LEN {
            phase = phase.next();
        }
        assert_eq!(phase, Phase::FIRST);
        assert_eq!(Phase::CYCLE_LEN, 62);
    }

    #[test]
    fn one_cycle_rests_then_writes_fill_clear_sides_dim_in_order() {
        let color = GuardedValue::new(DEFAULT_BAR_COLOR);
        let mut task = PeriodicTask::new(
            ColorCycle::new(RecordingStrip::default(), &color),
            RecordingDelay::default(),
        );

        block_on(async {
            for _ in 0..Phase::CYCLE_LEN {
                task.step().await;
            }
        });

        assert_eq!(task.work().strip().calls, expected_cycle(DEFAULT_BAR_COLOR));
        assert_eq!(task.work().phase(), Phase::FIRST);
    }

    #[test]
    fn exactly_ten_fills_then_ten_clears_every_cycle() {
        let color = GuardedValue::new(Color::new(1, 2, 3));
        let mut task = PeriodicTask::new(
            ColorCycle::new(RecordingStrip::default(), &color),
            RecordingDelay::default(),
        );

        block_on(async {
            for _ in 0..2 * Phase::CYCLE_LEN {
                task.step().await;
            }
        });

        let pixels: Vec<_> = task
            .work()
            .strip()
            .calls
            .iter()
            .filter_map(|call| match *call {
                StripCall::Pixel(i, c) => Some((i, c)),
                _ => None,
            })
            .collect();
        assert_eq!(pixels.len(), 4 * LED_COUNT);
        for cycle in pixels.chunks(2 * LED_COUNT) {
            let (fills, clears) = cycle.split_at(LED_COUNT);
            assert!(fills.iter().enumerate().all(|(n, &(i, c))| i == n && c == Color::new(1, 2, 3)));
            assert!(clears.iter().enumerate().all(|(n, &(i, c))| i == n && c == Color::BLACK));
        }
    }

    #[test]
    fn fill_reads_the_latest_color_per_led() {
        let color = GuardedValue::new(Color::WHITE);
        let mut cycle = ColorCycle::new(RecordingStrip::default(), &color);

        block_on(async {
            cycle.tick().await;
            cycle.strip.calls.clear();
            cycle.tick().await;
            color.set(Color::INK);
            cycle.tick().await;
        });

        assert_eq!(
            cycle.strip().calls,
            [
                StripCall::Pixel(0, Color::WHITE),
                StripCall::Show,
                StripCall::Pixel(1, Color::INK),
                StripCall::Show,
            ]
        );
    }

    #[test]
    fn holds_follow_the_script() {
        let color = GuardedValue::new(DEFAULT_BAR_COLOR);
        let mut task = PeriodicTask::new(
            ColorCycle::new(RecordingStrip::default(), &color),
            RecordingDelay::default(),
        );

        let pauses: Vec<_> = block_on(async {
            let mut pauses = Vec::new();
            for _ in 0..Phase::CYCLE_LEN {
                pauses.push(task.step().await);
            }
            pauses
        });

        let mut expected = vec![Duration::MIN];
        expected.extend([FILL_HOLD; 2 * LED_COUNT]);
        expected.push(Duration::MIN);
        expected.extend([DIM_HOLD; DIM_START as usize]);
        assert_eq!(pauses, expected);
    }

    #[test]
    fn first_fill_after_boot_uses_the_resting_brightness() {
        let color = GuardedValue::new(DEFAULT_BAR_COLOR);
        let mut task = PeriodicTask::new(
            ColorCycle::new(RecordingStrip::default(), &color),
            RecordingDelay::default(),
        );

        block_on(async {
            for _ in 0..2 * Phase::CYCLE_LEN {
                task.step().await;
            }
        });

        // A freshly powered strip runs at full brightness until told otherwise.
        let mut brightness = u8::MAX;
        let mut at_first_fill = Vec::new();
        for call in &task.work().strip().calls {
            match *call {
                StripCall::Brightness(level) => brightness = level,
                StripCall::Pixel(0, c) if c != Color::BLACK => at_first_fill.push(brightness),
                _ => {}
            }
        }
        assert_eq!(at_first_fill, [REST_BRIGHTNESS, REST_BRIGHTNESS]);
    }
}
