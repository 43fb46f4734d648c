//! Factory demo: LED bar, power and Wi-Fi tabs.
//!
//! Left/Right switch tabs, Up/Down move the row cursor, A raises or switches
//! on the selected control and B lowers or switches it off. On the Wi-Fi tab
//! A logs the selected access point and Start asks for a rescan.

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_time::Delay;
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;
#[allow(clippy::wildcard_imports)]
use factory_demo::board::*;
use factory_demo::{
    animation::ColorCycle,
    battery::{
        BatteryPoller,
        PowerSettings,
    },
    color::{
        Channel,
        Color,
    },
    config::{
        BRIGHTNESS_RANGE,
        CHANNEL_RANGE,
        DEFAULT_BAR_COLOR,
    },
    display::DisplayLock,
    event::{
        aux_led_sink,
        brightness_sink,
        color_channel_sink,
        vibration_sink,
    },
    guarded::GuardedValue,
    mk_static,
    periodic::PeriodicTask,
    scan::{
        RowCursor,
        ScanRequest,
        WifiScanner,
        access_point_clicked,
    },
};

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

const COLOR_STEP: i32 = 15;
const BRIGHTNESS_STEP: i32 = 10;

type SharedScreen = DisplayLock<BadgeScreen>;

#[embassy_executor::task]
async fn led_task(task: PeriodicTask<ColorCycle<'static, Leds<'static>>, Delay>) {
    info!("LED bar task started");
    task.run().await
}

#[embassy_executor::task]
async fn battery_task(task: PeriodicTask<BatteryPoller<'static, BadgePower, BadgeScreen>, Delay>) {
    info!("Battery task started");
    task.run().await
}

#[embassy_executor::task]
async fn scan_task(scanner: WifiScanner<'static, EspRadio, BadgeScreen>) {
    info!("Wi-Fi scan task started");
    scanner.run().await
}

/// Redraw the controls of the open tab from the shared values.
async fn draw_controls(
    screen: &SharedScreen,
    color: &GuardedValue<Color>,
    settings: &GuardedValue<PowerSettings>,
    row: usize,
) {
    // Read before locking: no guarded value is touched under the display lock.
    let (color, settings) = (color.get(), settings.get());
    let mut screen = screen.lock().await;
    match screen.tab() {
        Tab::LedBar => screen.draw_color_controls(color, row),
        Tab::Power => screen.draw_power_controls(settings, row),
        Tab::Wifi => screen.select_access_point(row),
    }
}

#[embassy_executor::task]
async fn ui_task(
    mut buttons: Buttons,
    screen: &'static SharedScreen,
    color: &'static GuardedValue<Color>,
    settings: &'static GuardedValue<PowerSettings>,
    scan_request: &'static ScanRequest,
) {
    let channels = Channel::ALL.map(|channel| color_channel_sink(color, channel));
    let brightness = brightness_sink(settings);
    let aux_led = aux_led_sink(settings);
    let vibration = vibration_sink(settings);

    let mut tab = Tab::LedBar;
    let mut cursor = RowCursor::default();
    screen.lock().await.open_tab(tab);
    draw_controls(screen, color, settings, cursor.row()).await;

    loop {
        let button = buttons.next_press().await;
        match button {
            Button::Left | Button::Right => {
                tab = if button == Button::Left { tab.prev() } else { tab.next() };
                cursor.reset();
                info!("Tab: {}", tab.title());
                screen.lock().await.open_tab(tab);
                if tab == Tab::Wifi {
                    cursor.rescan(scan_request);
                }
            }
            Button::Up => cursor.up(),
            Button::Down => {
                let rows = match tab {
                    Tab::Wifi => screen.lock().await.access_point_count(),
                    _ => tab.rows(),
                };
                cursor.down(rows);
            }
            Button::A | Button::B => {
                let row = cursor.row();
                let sign = if button == Button::A { 1 } else { -1 };
                // Sinks only hear about real changes.
                match (tab, row) {
                    (Tab::LedBar, _) => {
                        let current = i32::from(color.get().channel(Channel::ALL[row]));
                        let next = CHANNEL_RANGE.clamp(current + sign * COLOR_STEP);
                        if next != current {
                            channels[row].on_change(next);
                        }
                    }
                    (Tab::Power, 0) => {
                        let current = i32::from(settings.get().backlight);
                        let next = BRIGHTNESS_RANGE.clamp(current + sign * BRIGHTNESS_STEP);
                        if next != current {
                            brightness.on_change(next);
                        }
                    }
                    (Tab::Power, 1) => {
                        if settings.get().aux_led != (sign > 0) {
                            aux_led.on_change(sign > 0);
                        }
                    }
                    (Tab::Power, _) => {
                        if settings.get().vibration != (sign > 0) {
                            vibration.on_change(sign > 0);
                        }
                    }
                    (Tab::Wifi, _) if button == Button::A => {
                        access_point_clicked(screen, row).await;
                    }
                    (Tab::Wifi, _) => {}
                }
            }
            Button::Start if tab == Tab::Wifi => cursor.rescan(scan_request),
            Button::Start | Button::Select | Button::Stick => continue,
        }
        draw_controls(screen, color, settings, cursor.row()).await;
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = factory_demo::board::init();
    let resources = factory_demo::split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 128 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let color = &*mk_static!(GuardedValue<Color>, GuardedValue::new(DEFAULT_BAR_COLOR));
    let settings = &*mk_static!(
        GuardedValue<PowerSettings>,
        GuardedValue::new(PowerSettings::default())
    );
    let scan_request = &*mk_static!(ScanRequest, ScanRequest::new());

    let display: Display<'static> = resources.display.into();
    let screen = &*mk_static!(SharedScreen, DisplayLock::new(BadgeScreen::new(display)));

    let power = BadgePower::new(
        resources.backlight.into(),
        resources.vibra.into(),
        resources.battery.into(),
    );
    let leds: Leds<'static> = resources.leds.into();

    let radio_ctrl = &*mk_static!(
        esp_radio::Controller<'static>,
        esp_radio::init().expect("Failed to initialize radio")
    );
    let radio = EspRadio::new(radio_ctrl, resources.radio).expect("Failed to start Wi-Fi station");

    spawner.must_spawn(led_task(PeriodicTask::new(ColorCycle::new(leds, color), Delay)));
    spawner.must_spawn(battery_task(PeriodicTask::new(
        BatteryPoller::new(power, settings, screen),
        Delay,
    )));
    spawner.must_spawn(scan_task(WifiScanner::new(radio, screen, scan_request)));
    spawner.must_spawn(ui_task(
        resources.buttons.into(),
        screen,
        color,
        settings,
        scan_request,
    ));

    info!("Factory demo running");
    loop {
        embassy_time::Timer::after(embassy_time::Duration::from_secs(600)).await;
    }
}
