//! Water watchface
//!
//! The background fills from the bottom as the hour runs out; the hour sits
//! in the middle and the minute to its right.

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    mono_font::MonoTextStyle,
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    text::{renderer::TextRenderer, Baseline, Text},
    Drawable,
};

use super::{ColorMode, WatchFace};
use crate::{
    config::{WatchFaceConfig, LCD_H, LCD_W},
    refresher::{Frame, RefreshMode},
};

pub struct WaterWatchface {
    config: WatchFaceConfig,
    size: Size,
    center: Point,
}

impl WaterWatchface {
    /// Watch face sized for the PineTime LCD
    pub fn new(config: WatchFaceConfig) -> Self {
        let mut face = Self {
            config,
            size: Size::zero(),
            center: Point::zero(),
        };
        face.on_surface_changed(Size::new(LCD_W, LCD_H));
        face
    }

    pub fn config(&self) -> &WatchFaceConfig {
        &self.config
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// First row of the filled part of the background
    pub fn fill_top(&self, fill_fraction: f32) -> u32 {
        let height = self.size.height;
        height - ((fill_fraction * height as f32) as u32).min(height)
    }

    fn draw_background<D>(&self, target: &mut D, frame: &Frame) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        let palette = &self.config.palette;
        let width = self.size.width;

        if frame.mode == RefreshMode::Ambient {
            return Rectangle::new(Point::zero(), self.size)
                .into_styled(PrimitiveStyle::with_fill(palette.ambient_background))
                .draw(target);
        }

        let top = self.fill_top(frame.state.fill_fraction());
        Rectangle::new(Point::new(0, top as i32), Size::new(width, self.size.height - top))
            .into_styled(PrimitiveStyle::with_fill(palette.filled))
            .draw(target)?;
        Rectangle::new(Point::zero(), Size::new(width, top))
            .into_styled(PrimitiveStyle::with_fill(palette.unfilled))
            .draw(target)
    }

    fn draw_text<D>(&self, target: &mut D, frame: &Frame) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        let color = self.config.palette.text;
        let center = self.center;

        // Hour: centered on the midpoint
        let hour = frame.state.hour_text();
        let style = MonoTextStyle::new(self.config.thin, color);
        let bounds = text_size(&style, hour);
        let position = Point::new(
            center.x - bounds.width as i32 / 2,
            center.y + bounds.height as i32 / 2,
        );
        Text::with_baseline(hour, position, style, Baseline::Alphabetic).draw(target)?;

        // Minute: halfway between the midpoint and the right edge
        let minute = frame.state.minute_text();
        let style = MonoTextStyle::new(self.config.light, color);
        let bounds = text_size(&style, minute);
        let position = Point::new(center.x + center.x / 2, center.y + bounds.height as i32 / 2);
        Text::with_baseline(minute, position, style, Baseline::Alphabetic).draw(target)?;

        Ok(())
    }
}

impl WatchFace for WaterWatchface {
    fn on_surface_changed(&mut self, size: Size) {
        self.size = size;
        self.center = Point::new(size.width as i32 / 2, size.height as i32 / 2);
    }

    fn draw<D>(&self, target: &mut D, frame: &Frame) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>,
    {
        self.draw_background(target, frame)?;
        self.draw_text(target, frame)
    }
}

/// Width and height `text` takes up in `style`
fn text_size(style: &MonoTextStyle<'_, ColorMode>, text: &str) -> Size {
    style
        .measure_string(text, Point::zero(), Baseline::Alphabetic)
        .bounding_box
        .size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{framebuffer::FrameBuffer, ui::DisplayState};
    use chrono::NaiveTime;
    use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

    fn frame(hour: u32, minute: u32, mode: RefreshMode) -> Frame {
        Frame {
            state: DisplayState::at(&NaiveTime::from_hms_opt(hour, minute, 0).unwrap()),
            mode,
        }
    }

    fn render(face: &WaterWatchface, frame: &Frame) -> FrameBuffer {
        let mut buffer = FrameBuffer::new(face.size());
        face.draw(&mut buffer, frame).unwrap();
        buffer
    }

    #[test]
    fn half_hour_fills_lower_half() {
        let face = WaterWatchface::new(WatchFaceConfig::default());
        let palette = face.config().palette;
        let buffer = render(&face, &frame(10, 30, RefreshMode::Interactive));

        assert_eq!(face.fill_top(0.5), 120);
        assert_eq!(buffer.pixel(Point::new(0, 0)), Some(palette.unfilled));
        assert_eq!(buffer.pixel(Point::new(0, 119)), Some(palette.unfilled));
        assert_eq!(buffer.pixel(Point::new(0, 120)), Some(palette.filled));
        assert_eq!(buffer.pixel(Point::new(239, 239)), Some(palette.filled));
    }

    #[test]
    fn top_of_hour_is_empty() {
        let face = WaterWatchface::new(WatchFaceConfig::default());
        let palette = face.config().palette;
        let buffer = render(&face, &frame(11, 0, RefreshMode::Interactive));

        assert_eq!(face.fill_top(0.0), 240);
        assert_eq!(buffer.pixel(Point::new(0, 239)), Some(palette.unfilled));
        assert_eq!(buffer.count_in_columns(0..10, palette.filled), 0);
    }

    #[test]
    fn ambient_background_is_flat() {
        let face = WaterWatchface::new(WatchFaceConfig::default());
        let palette = face.config().palette;
        for minute in [0, 30, 59] {
            let buffer = render(&face, &frame(10, minute, RefreshMode::Ambient));
            assert_eq!(buffer.count(palette.filled), 0);
            assert_eq!(buffer.count(palette.unfilled), 0);
            assert_eq!(buffer.pixel(Point::new(0, 239)), Some(Rgb565::BLACK));
        }
    }

    #[test]
    fn hour_centered_and_minute_to_the_right() {
        let face = WaterWatchface::new(WatchFaceConfig::default());
        let buffer = render(&face, &frame(10, 5, RefreshMode::Interactive));
        let text = face.config().palette.text;

        let hour_width = text_size(&MonoTextStyle::new(face.config().thin, text), "10").width;
        let hour_left = 120 - hour_width / 2;
        assert!(buffer.count_in_columns(hour_left..hour_left + hour_width, text) > 0);
        assert!(buffer.count_in_columns(180..240, text) > 0);
        // Nothing left of the hour
        assert_eq!(buffer.count_in_columns(0..hour_left, text), 0);
    }

    #[test]
    fn resized_surface_moves_layout() {
        let mut face = WaterWatchface::new(WatchFaceConfig::default());
        face.on_surface_changed(Size::new(100, 60));
        assert_eq!(face.center(), Point::new(50, 30));
        assert_eq!(face.fill_top(0.5), 30);

        let palette = face.config().palette;
        let buffer = render(&face, &frame(9, 30, RefreshMode::Interactive));
        assert_eq!(buffer.pixel(Point::new(0, 29)), Some(palette.unfilled));
        assert_eq!(buffer.pixel(Point::new(0, 30)), Some(palette.filled));
    }
}
