use serde::Deserialize;
use crate::chart::buffer::{auto_fit_max, SampleBuffer};
use crate::chart::{DrawingSurface, Point, Rgb, SurfaceSize, TooltipOverlay};
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub line_color: Rgb,
    pub background: Rgb,
    pub line_width: f32,
    pub marker_radius: f32,
    /// Added to the largest sample to get the vertical scale ceiling.
    pub headroom: f32,
    /// Half-width of the square window a pointer must fall in to hit a point.
    pub hit_tolerance: f32,
}
impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_color: Rgb(0x65, 0x73, 0x7e),
            background: Rgb(0x2b, 0x30, 0x3b),
            line_width: 2.0,
            marker_radius: 3.0,
            headroom: 10.0,
            hit_tolerance: 20.0,
        }
    }
}
/// Which sample positions a hit test is resolved against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTestMode {
    /// Positions captured by the last render, so the tooltip always matches
    /// what is on screen.
    #[default]
    LastRendered,
    /// Positions recomputed from the live buffer, which may have moved on
    /// since the last render.
    Live,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartState {
    Empty,
    Populated,
}
/// One sample mapped to surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotPoint {
    pub index: usize,
    pub value: f32,
    pub position: Point,
}
/// Coordinate mapping of a buffer snapshot onto a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartFrame {
    pub scale_max: f32,
    pub points: Vec<PlotPoint>,
}
impl ChartFrame {
    /// Maps `samples` onto a `size` surface; `None` when there is nothing to map.
    pub fn map(samples: &[f32], size: SurfaceSize, headroom: f32) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let scale_max = auto_fit_max(samples) + headroom;
        let step = size.width / samples.len() as f32;
        let points = samples
            .iter()
            .enumerate()
            .map(|(index, &value)| PlotPoint {
                index,
                value,
                position: Point::new(
                    step * index as f32,
                    size.height - (size.height / scale_max) * value,
                ),
            })
            .collect();
        Some(Self { scale_max, points })
    }
    /// First point, oldest first, inside the tolerance window around `pointer`.
    pub fn hit(&self, pointer: Point, tolerance: f32) -> Option<PlotPoint> {
        self.points.iter().copied().find(|p| {
            (p.position.x - pointer.x).abs() < tolerance
                && (p.position.y - pointer.y).abs() < tolerance
        })
    }
}
/// A rolling line chart bound to one drawing surface.
pub struct ChartView<S, O> {
    buffer: SampleBuffer,
    surface: S,
    overlay: O,
    size: SurfaceSize,
    style: ChartStyle,
    hit_test_mode: HitTestMode,
    last_frame: Option<ChartFrame>,
}
impl<S: DrawingSurface, O: TooltipOverlay> ChartView<S, O> {
    /// Surface dimensions are captured here and kept for the view's lifetime.
    pub fn new(surface: S, overlay: O, capacity: usize, style: ChartStyle) -> Self {
        let size = surface.size();
        Self {
            buffer: SampleBuffer::with_capacity(capacity),
            surface,
            overlay,
            size,
            style,
            hit_test_mode: HitTestMode::default(),
            last_frame: None,
        }
    }
    pub fn with_hit_test_mode(mut self, mode: HitTestMode) -> Self {
        self.hit_test_mode = mode;
        self
    }
    pub fn push_value(&mut self, value: f32) {
        self.buffer.append(value);
    }
    pub fn state(&self) -> ChartState {
        if self.buffer.is_empty() {
            ChartState::Empty
        } else {
            ChartState::Populated
        }
    }
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }
    pub fn surface(&self) -> &S {
        &self.surface
    }
    #[cfg(test)]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }
    pub fn style(&self) -> &ChartStyle {
        &self.style
    }
    #[cfg(test)]
    pub fn last_frame(&self) -> Option<&ChartFrame> {
        self.last_frame.as_ref()
    }
    /// Auto-fit maximum used by the most recent render.
    pub fn scale_max(&self) -> Option<f32> {
        self.last_frame.as_ref().map(|f| f.scale_max)
    }
    /// Redraws the whole buffer. Does nothing on a surface that cannot draw
    /// or while no sample has been stored.
    pub fn render(&mut self) {
        if !self.surface.supports_drawing() {
            return;
        }
        let Some(frame) = ChartFrame::map(self.buffer.snapshot(), self.size, self.style.headroom)
        else {
            return;
        };
        self.surface.clear();
        let mut previous: Option<Point> = None;
        for point in &frame.points {
            if let Some(from) = previous {
                self.surface.line(
                    from,
                    point.position,
                    self.style.line_width,
                    self.style.line_color,
                );
            }
            self.surface.filled_circle(
                point.position,
                self.style.marker_radius,
                self.style.line_color,
            );
            previous = Some(point.position);
        }
        log::trace!(
            "rendered {} samples, scale max {}",
            frame.points.len(),
            frame.scale_max
        );
        // Old positions are stale now.
        self.overlay.hide();
        self.last_frame = Some(frame);
    }
    pub fn hit_test(&self, x: f32, y: f32) -> Option<PlotPoint> {
        self.hit_test_with(self.hit_test_mode, x, y)
    }
    pub fn hit_test_with(&self, mode: HitTestMode, x: f32, y: f32) -> Option<PlotPoint> {
        let pointer = Point::new(x, y);
        let tolerance = self.style.hit_tolerance;
        match mode {
            HitTestMode::LastRendered => self.last_frame.as_ref()?.hit(pointer, tolerance),
            HitTestMode::Live => {
                ChartFrame::map(self.buffer.snapshot(), self.size, self.style.headroom)?
                    .hit(pointer, tolerance)
            }
        }
    }
    /// Handles pointer movement over the surface: shows the hit sample's value
    /// next to it, or hides the tooltip. `origin` is the surface's top-left
    /// corner in overlay coordinates.
    pub fn update_tooltip(&mut self, pointer: Point, origin: Point) -> Option<PlotPoint> {
        let hit = self.hit_test(pointer.x, pointer.y);
        match hit {
            Some(point) => self
                .overlay
                .place(point.position.offset(origin), &point.value.to_string()),
            None => self.overlay.hide(),
        }
        hit
    }
}
