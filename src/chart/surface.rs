use serde::Deserialize;
use crate::chart::ChartError;
/// Position in surface pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
    pub fn offset(self, origin: Point) -> Point {
        Point::new(origin.x + self.x, origin.y + self.y)
    }
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}
impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);
impl Rgb {
    pub fn from_hex(hex: &str) -> Result<Self, ChartError> {
        let invalid = || ChartError::InvalidColor(hex.to_owned());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}
impl TryFrom<String> for Rgb {
    type Error = ChartError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}
/// Minimal 2D canvas a chart renders onto.
pub trait DrawingSurface {
    fn size(&self) -> SurfaceSize;
    /// Surfaces that cannot draw make rendering a no-op.
    fn supports_drawing(&self) -> bool {
        true
    }
    fn clear(&mut self);
    fn line(&mut self, from: Point, to: Point, width: f32, color: Rgb);
    fn filled_circle(&mut self, center: Point, radius: f32, color: Rgb);
}
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgb,
    },
    Circle {
        center: Point,
        radius: f32,
        color: Rgb,
    },
}
/// Retained surface: records what was drawn so a frontend (egui, PNG export)
/// can replay it later.
#[derive(Clone, Debug)]
pub struct Scene {
    size: SurfaceSize,
    drawing_supported: bool,
    primitives: Vec<Primitive>,
    clears: usize,
}
impl Scene {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            drawing_supported: true,
            primitives: Vec::new(),
            clears: 0,
        }
    }
    /// A surface that is laid out but has no drawing context.
    pub fn detached(size: SurfaceSize) -> Self {
        Self {
            drawing_supported: false,
            ..Self::new(size)
        }
    }
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }
    /// Number of times the surface has been cleared.
    #[cfg(test)]
    pub fn clears(&self) -> usize {
        self.clears
    }
}
impl DrawingSurface for Scene {
    fn size(&self) -> SurfaceSize {
        self.size
    }
    fn supports_drawing(&self) -> bool {
        self.drawing_supported
    }
    fn clear(&mut self) {
        self.primitives.clear();
        self.clears += 1;
    }
    fn line(&mut self, from: Point, to: Point, width: f32, color: Rgb) {
        self.primitives.push(Primitive::Line {
            from,
            to,
            width,
            color,
        });
    }
    fn filled_circle(&mut self, center: Point, radius: f32, color: Rgb) {
        self.primitives.push(Primitive::Circle {
            center,
            radius,
            color,
        });
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn parses_hex_colours() {
        assert_eq!(Rgb::from_hex("#65737e").unwrap(), Rgb(0x65, 0x73, 0x7e));
        assert!(Rgb::from_hex("65737e").is_err());
        assert!(Rgb::from_hex("#65737").is_err());
        assert!(Rgb::from_hex("#zz737e").is_err());
    }
    #[test]
    fn clear_drops_recorded_primitives() {
        let mut scene = Scene::new(SurfaceSize::new(10.0, 10.0));
        scene.filled_circle(Point::new(1.0, 1.0), 3.0, Rgb(0, 0, 0));
        assert_eq!(scene.primitives().len(), 1);
        scene.clear();
        assert!(scene.primitives().is_empty());
        assert_eq!(scene.clears(), 1);
    }
}
