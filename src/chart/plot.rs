use std::fmt::Display;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use crate::chart::error::ChartError;
use crate::chart::{ChartStyle, DrawingSurface, Point, Primitive, Rgb, Scene};
fn to_rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}
fn to_pixel(point: Point) -> (i32, i32) {
    (point.x.round() as i32, point.y.round() as i32)
}
fn failed<E: Display>(stage: &'static str) -> impl Fn(E) -> ChartError {
    move |e| ChartError::Export {
        stage,
        reason: e.to_string(),
    }
}
/// Replays a rendered scene onto a bitmap and encodes it as PNG.
pub fn render_scene_png(scene: &Scene, style: &ChartStyle) -> Result<Vec<u8>, ChartError> {
    let size = scene.size();
    let width = (size.width.max(1.0)) as u32;
    let height = (size.height.max(1.0)) as u32;
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&to_rgb(style.background))
            .map_err(failed("filling the background"))?;
        for primitive in scene.primitives() {
            let drawn = match primitive {
                Primitive::Line {
                    from,
                    to,
                    width,
                    color,
                } => {
                    let stroke = to_rgb(*color).stroke_width(width.round().max(1.0) as u32);
                    root.draw(&PathElement::new(vec![to_pixel(*from), to_pixel(*to)], stroke))
                }
                Primitive::Circle {
                    center,
                    radius,
                    color,
                } => root.draw(&Circle::new(
                    to_pixel(*center),
                    radius.round().max(1.0) as i32,
                    to_rgb(*color).filled(),
                )),
            };
            drawn.map_err(failed("drawing"))?;
        }
        root.present().map_err(failed("drawing"))?;
    }
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(failed("encoding"))?;
    Ok(png)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::overlay::Tooltip;
    use crate::chart::{ChartView, SurfaceSize};
    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    #[test]
    fn exports_rendered_chart_as_png() {
        let mut chart = ChartView::new(
            Scene::new(SurfaceSize::new(64.0, 32.0)),
            Tooltip::default(),
            8,
            ChartStyle::default(),
        );
        for v in [15.0, 16.5, 16.0, 18.0] {
            chart.push_value(v);
        }
        chart.render();
        let png = render_scene_png(chart.surface(), chart.style()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }
    #[test]
    fn exports_blank_scene() {
        let scene = Scene::new(SurfaceSize::new(0.0, 0.0));
        let png = render_scene_png(&scene, &ChartStyle::default()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }
}
