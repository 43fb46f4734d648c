//! ST7789 display driver and the three demo tabs drawn on it.
//!
//! Layout on the 320×170 panel:
//!
//! ```text
//! +--------------------------------------------------+
//! | LED Bar | Power | Wi-Fi               o [####]  |  header + battery
//! +--------------------------------------------------+
//! |                                                  |
//! |  tab content                                     |
//! |                                                  |
//! +--------------------------------------------------+
//! ```

use core::fmt::Write as _;

use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::FONT_6X10,
        iso_8859_1::FONT_10X20,
    },
    pixelcolor::{
        Rgb565,
        Rgb888,
    },
    prelude::*,
    primitives::{
        Circle,
        PrimitiveStyle,
        Rectangle,
    },
    text::Text,
};
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Async,
    dma::{
        DmaRxBuf,
        DmaTxBuf,
    },
    dma_buffers,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    spi::master::Spi,
    time::Rate,
};
use palette::Srgb;

use super::DisplayResources;
use crate::{
    battery::{
        BatteryStatus,
        CHARGING_COLOR,
        PowerSettings,
    },
    color::{
        Channel,
        Color,
    },
    config::MAX_ACCESS_POINTS,
    display::Screen,
    mk_static,
    scan::AccessPoint,
};

type SpiInterface<'a> = mipidsi::interface::SpiInterface<
    'a,
    ExclusiveDevice<esp_hal::spi::master::SpiDmaBus<'a, Async>, Output<'a>, esp_hal::delay::Delay>,
    Output<'a>,
>;

/// The badge's ST7789 display, ready to draw on with `embedded-graphics`.
pub type Display<'a> = mipidsi::Display<SpiInterface<'a>, mipidsi::models::ST7789, Output<'a>>;

impl From<DisplayResources<'static>> for Display<'static> {
    fn from(res: DisplayResources<'static>) -> Self {
        let (rx_buffer, rx_descriptors, tx_buffer, tx_descriptors) = dma_buffers!(32000);
        let dma_rx_buf = DmaRxBuf::new(rx_descriptors, rx_buffer).unwrap();
        let dma_tx_buf = DmaTxBuf::new(tx_descriptors, tx_buffer).unwrap();

        let mut delay = esp_hal::delay::Delay::new();

        let dc = Output::new(res.dc, Level::Low, OutputConfig::default());
        let mut rst = Output::new(res.rst, Level::Low, OutputConfig::default());
        rst.set_high();

        let spi = Spi::new(
            res.spi,
            esp_hal::spi::master::Config::default().with_frequency(Rate::from_mhz(80)),
        )
        .unwrap()
        .with_sck(res.sck)
        .with_mosi(res.mosi)
        .with_miso(res.miso)
        .with_dma(res.dma)
        .with_buffers(dma_rx_buf, dma_tx_buf)
        .into_async();

        let cs = Output::new(res.cs, Level::High, OutputConfig::default());
        let spi_device = ExclusiveDevice::new(spi, cs, delay).unwrap();

        let buffer = mk_static!([u8; 32000], [0_u8; 32000]);
        let di = mipidsi::interface::SpiInterface::new(spi_device, dc, buffer);

        mipidsi::Builder::new(mipidsi::models::ST7789, di)
            .reset_pin(rst)
            .display_size(170, 320)
            .invert_colors(mipidsi::options::ColorInversion::Inverted)
            .orientation(
                mipidsi::options::Orientation::new().rotate(mipidsi::options::Rotation::Deg90),
            )
            .display_offset(35, 0)
            .init(&mut delay)
            .unwrap()
    }
}

const W: u32 = 320;
const H: u32 = 170;
const HEADER_H: u32 = 26;
const FOOTER_H: u32 = 14;
const ROW_H: i32 = 18;
const CONTENT_TOP: i32 = HEADER_H as i32 + 8;

const BACKGROUND: Rgb565 = Rgb565::BLACK;
const HEADER_BG: Rgb565 = Rgb565::new(0x04, 0x0b, 0x07);
const HIGHLIGHT: Rgb565 = Rgb565::CSS_ORANGE;

/// The demo's tabs, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tab {
    LedBar,
    Power,
    Wifi,
}

impl Tab {
    pub const ALL: [Self; 3] = [Self::LedBar, Self::Power, Self::Wifi];

    pub const fn title(self) -> &'static str {
        match self {
            Self::LedBar => "LED Bar",
            Self::Power => "Power",
            Self::Wifi => "Wi-Fi",
        }
    }

    /// Caption shown at the foot of the tab.
    pub const fn heading(self) -> &'static str {
        match self {
            Self::LedBar => "LED Bars",
            Self::Power => "Power Mgmt",
            Self::Wifi => "Wi-Fi Scan (2.4GHz)",
        }
    }

    /// Number of selectable rows on the tab.
    pub const fn rows(self) -> usize {
        match self {
            Self::LedBar => Channel::ALL.len(),
            Self::Power => 3,
            Self::Wifi => MAX_ACCESS_POINTS,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::LedBar => Self::Power,
            Self::Power => Self::Wifi,
            Self::Wifi => Self::LedBar,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::LedBar => Self::Wifi,
            Self::Power => Self::LedBar,
            Self::Wifi => Self::Power,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::LedBar => 0,
            Self::Power => 1,
            Self::Wifi => 2,
        }
    }
}

fn rgb565(c: Srgb<u8>) -> Rgb565 {
    Rgb888::new(c.red, c.green, c.blue).into()
}

/// The screen shared by the UI and the periodic tasks.
///
/// Keeps the last battery status and access point list so a tab switch can
/// redraw them without waiting for the next poll or scan.
pub struct BadgeScreen {
    display: Display<'static>,
    tab: Tab,
    battery: Option<BatteryStatus>,
    access_points: heapless::Vec<AccessPoint, MAX_ACCESS_POINTS>,
    scanned: bool,
    selected: usize,
}

impl BadgeScreen {
    pub fn new(display: Display<'static>) -> Self {
        Self {
            display,
            tab: Tab::LedBar,
            battery: None,
            access_points: heapless::Vec::new(),
            scanned: false,
            selected: 0,
        }
    }

    pub const fn tab(&self) -> Tab {
        self.tab
    }

    /// Number of access points currently listed.
    pub fn access_point_count(&self) -> usize {
        self.access_points.len()
    }

    /// Switch tabs and redraw the frame. Tab content is drawn by the caller
    /// (or by the next scan on the Wi-Fi tab).
    pub fn open_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.selected = 0;
        self.fill(Rectangle::new(Point::zero(), Size::new(W, H)), BACKGROUND);
        self.draw_header();
        self.text(
            tab.heading(),
            Point::new(6, H as i32 - 6),
            MonoTextStyle::new(&FONT_6X10, Rgb565::CSS_DIM_GRAY),
        );
        if let Some(status) = self.battery {
            self.draw_battery(status);
        }
        if tab == Tab::Wifi {
            self.draw_access_points();
        }
    }

    /// Redraw the three colour sliders of the LED bar tab.
    pub fn draw_color_controls(&mut self, color: Color, selected: usize) {
        if self.tab != Tab::LedBar {
            return;
        }
        self.selected = selected;
        for (row, channel) in Channel::ALL.into_iter().enumerate() {
            let value = color.channel(channel);
            self.draw_slider(row, channel.name(), i32::from(value), 255);
        }
        self.fill(
            Rectangle::new(Point::new(250, CONTENT_TOP + 4), Size::new(56, 56)),
            rgb565(color.into()),
        );
    }

    /// Redraw the brightness slider and the two switches of the power tab.
    pub fn draw_power_controls(&mut self, settings: PowerSettings, selected: usize) {
        if self.tab != Tab::Power {
            return;
        }
        self.selected = selected;
        self.draw_slider(0, "Brightness", i32::from(settings.backlight), 100);
        self.draw_switch(1, "LED", settings.aux_led);
        self.draw_switch(2, "Vibration", settings.vibration);
    }

    /// Move the Wi-Fi list cursor.
    pub fn select_access_point(&mut self, selected: usize) {
        if self.tab != Tab::Wifi {
            return;
        }
        let previous = core::mem::replace(&mut self.selected, selected);
        self.draw_access_point_row(previous);
        self.draw_access_point_row(selected);
    }

    fn draw_header(&mut self) {
        self.fill(Rectangle::new(Point::zero(), Size::new(W, HEADER_H)), HEADER_BG);
        let mut x = 6;
        for tab in Tab::ALL {
            let color = if tab == self.tab { HIGHLIGHT } else { Rgb565::WHITE };
            self.text(tab.title(), Point::new(x, 19), MonoTextStyle::new(&FONT_10X20, color));
            x += (tab.title().len() as i32 + 2) * 10;
        }
        let underline_x = Tab::ALL[..self.tab.index()]
            .iter()
            .map(|t| (t.title().len() as i32 + 2) * 10)
            .sum::<i32>()
            + 6;
        self.fill(
            Rectangle::new(
                Point::new(underline_x, HEADER_H as i32 - 3),
                Size::new(self.tab.title().len() as u32 * 10, 3),
            ),
            HIGHLIGHT,
        );
    }

    fn draw_battery(&mut self, status: BatteryStatus) {
        const X: i32 = 274;
        const Y: i32 = 5;
        const BAR_W: u32 = 8;

        let outline = Rectangle::new(Point::new(X, Y), Size::new(4 * (BAR_W + 2) + 2, 16));
        self.fill(outline, HEADER_BG);
        self.draw(&outline.into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 1)));
        self.fill(
            Rectangle::new(Point::new(X + outline.size.width as i32, Y + 5), Size::new(3, 6)),
            Rgb565::WHITE,
        );

        let color = rgb565(status.tier.color());
        for bar in 0..i32::from(status.tier.bars()) {
            self.fill(
                Rectangle::new(Point::new(X + 2 + bar * (BAR_W as i32 + 2), Y + 2), Size::new(BAR_W, 12)),
                color,
            );
        }

        // Charge mark left of the glyph, separate from the tier bars.
        let mark = Circle::new(Point::new(X - 14, Y + 3), 10);
        let mark_color = if status.charging { rgb565(CHARGING_COLOR) } else { HEADER_BG };
        self.draw(&mark.into_styled(PrimitiveStyle::with_fill(mark_color)));
    }

    fn draw_slider(&mut self, row: usize, label: &str, value: i32, max: i32) {
        const TRACK_X: i32 = 110;
        const TRACK_W: i32 = 120;

        let y = Self::row_y(row);
        self.draw_row_label(row, label);

        self.fill(Rectangle::new(Point::new(TRACK_X, y + 6), Size::new(TRACK_W as u32, 6)), Rgb565::CSS_DIM_GRAY);
        let filled = (TRACK_W * value / max.max(1)).clamp(0, TRACK_W);
        self.fill(Rectangle::new(Point::new(TRACK_X, y + 6), Size::new(filled as u32, 6)), HIGHLIGHT);

        let mut number = heapless::String::<8>::new();
        let _ = write!(number, "{value:>3}");
        self.fill(Rectangle::new(Point::new(TRACK_X + TRACK_W + 6, y), Size::new(18, 18)), BACKGROUND);
        self.text(&number, Point::new(TRACK_X + TRACK_W + 6, y + 12), MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE));
    }

    fn draw_switch(&mut self, row: usize, label: &str, on: bool) {
        let y = Self::row_y(row);
        self.draw_row_label(row, label);

        let knob = Rectangle::new(Point::new(110, y + 2), Size::new(36, 14));
        self.fill(knob, if on { Rgb565::CSS_LIME_GREEN } else { Rgb565::CSS_DIM_GRAY });
        let x = if on { 128 } else { 112 };
        self.fill(Rectangle::new(Point::new(x, y + 4), Size::new(16, 10)), Rgb565::WHITE);
    }

    fn draw_access_points(&mut self) {
        let area = Rectangle::new(Point::new(0, HEADER_H as i32), Size::new(W, H - HEADER_H - FOOTER_H));
        self.fill(area, BACKGROUND);

        if self.access_points.is_empty() {
            let note = if self.scanned { "No networks found" } else { "Scanning..." };
            self.text(note, Point::new(10, CONTENT_TOP + 12), MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE));
            return;
        }
        for row in 0..self.access_points.len() {
            self.draw_access_point_row(row);
        }
    }

    fn draw_access_point_row(&mut self, row: usize) {
        let Some(ap) = self.access_points.get(row) else {
            return;
        };
        let mut line = heapless::String::<64>::new();
        let _ = write!(line, "{:<32} {:>4} dBm  ch {:>2}", ap.ssid.as_str(), ap.rssi, ap.channel);

        let y = CONTENT_TOP + row as i32 * ROW_H;
        let background = if row == self.selected { HEADER_BG } else { BACKGROUND };
        self.fill(Rectangle::new(Point::new(4, y - 2), Size::new(W - 8, ROW_H as u32 - 2)), background);
        self.text(&line, Point::new(10, y + 12), MonoTextStyle::new(&FONT_6X10, Rgb565::WHITE));
    }

    fn draw_row_label(&mut self, row: usize, label: &str) {
        let y = Self::row_y(row);
        self.fill(Rectangle::new(Point::new(0, y - 2), Size::new(106, ROW_H as u32)), BACKGROUND);
        let color = if row == self.selected { HIGHLIGHT } else { Rgb565::WHITE };
        self.text(label, Point::new(12, y + 12), MonoTextStyle::new(&FONT_6X10, color));
    }

    const fn row_y(row: usize) -> i32 {
        CONTENT_TOP + row as i32 * (ROW_H + 8)
    }

    fn fill(&mut self, area: Rectangle, color: Rgb565) {
        self.draw(&area.into_styled(PrimitiveStyle::with_fill(color)));
    }

    fn text(&mut self, text: &str, at: Point, style: MonoTextStyle<'static, Rgb565>) {
        self.draw(&Text::new(text, at, style));
    }

    fn draw<D>(&mut self, item: &D)
    where
        D: Drawable<Color = Rgb565>,
    {
        if item.draw(&mut self.display).is_err() {
            warn!("Display write failed");
        }
    }
}

impl Screen for BadgeScreen {
    fn show_battery(&mut self, status: BatteryStatus) {
        let unchanged = self
            .battery
            .is_some_and(|shown| shown.tier == status.tier && shown.charging == status.charging);
        self.battery = Some(status);
        if !unchanged {
            self.draw_battery(status);
        }
    }

    fn clear_access_points(&mut self) {
        self.access_points.clear();
        self.selected = 0;
        self.scanned = true;
        if self.tab == Tab::Wifi {
            self.draw_access_points();
        }
    }

    fn append_access_point(&mut self, ap: &AccessPoint) {
        if self.access_points.push(ap.clone()).is_err() {
            return;
        }
        if self.tab == Tab::Wifi {
            self.draw_access_point_row(self.access_points.len() - 1);
        }
    }

    fn access_point(&self, index: usize) -> Option<&AccessPoint> {
        self.access_points.get(index)
    }
}
