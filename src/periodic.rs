//! Forever loops that do one unit of work, then sleep.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

/// One unit of periodic work.
#[allow(async_fn_in_trait)]
pub trait Periodic {
    /// Do the work once and return how long to sleep before the next call.
    /// [`Duration::MIN`] means go again right away.
    async fn tick(&mut self) -> Duration;
}

/// Drives a [`Periodic`] forever with a non-busy delay between ticks.
///
/// The delay is injected: `embassy_time::Delay` on the device, a recording
/// fake in tests, so sequences run without real time passing.
pub struct PeriodicTask<W, D> {
    work: W,
    delay: D,
}

impl<W: Periodic, D: DelayNs> PeriodicTask<W, D> {
    pub const fn new(work: W, delay: D) -> Self {
        Self { work, delay }
    }

    /// One tick followed by its pause. Returns the pause taken.
    pub async fn step(&mut self) -> Duration {
        let pause = self.work.tick().await;
        if pause > Duration::MIN {
            // Pauses here are milliseconds to seconds; saturate rather than wrap.
            let us = u32::try_from(pause.as_micros()).unwrap_or(u32::MAX);
            self.delay.delay_us(us).await;
        }
        pause
    }

    pub async fn run(mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    pub fn work(&self) -> &W {
        &self.work
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::testing::RecordingDelay;

    struct Countdown {
        ticks: u32,
    }

    impl Periodic for Countdown {
        async fn tick(&mut self) -> Duration {
            self.ticks += 1;
            if self.ticks % 2 == 0 {
                Duration::MIN
            } else {
                Duration::from_millis(5)
            }
        }
    }

    #[test]
    fn zero_pause_skips_the_delay() {
        let mut task = PeriodicTask::new(Countdown { ticks: 0 }, RecordingDelay::default());
        block_on(async {
            for _ in 0..4 {
                task.step().await;
            }
        });

        assert_eq!(task.work().ticks, 4);
        assert_eq!(task.delay.waits_ms(), [5, 5]);
    }
}
