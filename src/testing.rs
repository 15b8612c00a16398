//! Test doubles shared by the unit tests

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::ui::core::{Behavior, Canvas, DrawContext, UpdateContext};

/// Draw target that records solid fills (the erase primitive) and counts
/// every other pixel written.
pub struct RecordingCanvas {
    pub fills: Vec<(Rectangle, Rgb565)>,
    pub pixels_drawn: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            fills: Vec::new(),
            pixels_drawn: 0,
        }
    }

    /// Number of solid fills exactly covering `area`.
    pub fn fills_of(&self, area: Rectangle) -> usize {
        self.fills.iter().filter(|(r, _)| *r == area).count()
    }
}

impl OriginDimensions for RecordingCanvas {
    fn size(&self) -> Size {
        Size::new(320, 240)
    }
}

impl DrawTarget for RecordingCanvas {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.pixels_drawn += pixels.into_iter().count();
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fills.push((*area, color));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Draw(&'static str),
    Update(&'static str),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Custom widget that records its hook calls into a shared log.
pub struct Recorder {
    name: &'static str,
    log: Log,
}

impl Recorder {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
        }
    }
}

impl<C: Canvas> Behavior<C> for Recorder {
    fn draw(&mut self, _cx: &mut DrawContext<'_, C>) {
        self.log.borrow_mut().push(Event::Draw(self.name));
    }

    fn update(&mut self, _cx: &mut UpdateContext<'_>) {
        self.log.borrow_mut().push(Event::Update(self.name));
    }
}
