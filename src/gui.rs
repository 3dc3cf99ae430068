// src/gui.rs
use anyhow::Context;
use eframe::egui;
use egui::{Color32, Pos2, Sense, Stroke, Vec2};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;
use crate::chart::{
    render_scene_png, ChartState, Dashboard, Point, Primitive, Rgb, Scene, SharedTooltip, SurfaceSize,
};
use crate::config::{AppConfig, ChartConfig};
use crate::engine;
use crate::types::*;

const CONNECTED_COLOR: Color32 = Color32::from_rgb(0x77, 0xb7, 0x80);
const DISCONNECTED_COLOR: Color32 = Color32::from_rgb(0xbf, 0x49, 0x55);
const MAX_LOG_LINES: usize = 8;

pub struct LiveChartApp {
    config: AppConfig,

    // connection state
    is_connected: bool,
    connection_mode: ConnectionMode,

    // charts are created on the first frame, once their regions have a size
    dashboard: Option<Dashboard<Scene, SharedTooltip>>,
    dashboard_error: Option<String>,
    tooltip: SharedTooltip,
    pending: Vec<f64>,

    log_messages: Vec<String>,

    // engine channels
    rx: Receiver<StreamEvent>,
    tx_cmd: Sender<StreamCommand>,
}

impl LiveChartApp {
    pub fn new(config: AppConfig) -> Self {
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();

        engine::spawn_thread(tx, rx_cmd, config.stream.clone());
        tx_cmd.send(StreamCommand::Connect(config.stream.mode)).ok();

        Self {
            connection_mode: config.stream.mode,
            config,
            is_connected: false,
            dashboard: None,
            dashboard_error: None,
            tooltip: SharedTooltip::default(),
            pending: Vec::new(),
            log_messages: vec!["Live chart ready.".to_owned()],
            rx,
            tx_cmd,
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > MAX_LOG_LINES {
            self.log_messages.remove(0);
        }
    }

    fn handle_event(&mut self, event: StreamEvent) {
        match event {
            StreamEvent::Connected => self.is_connected = true,
            StreamEvent::Disconnected => self.is_connected = false,
            StreamEvent::Log(s) => self.log(&s),
            StreamEvent::Value(v) => match &mut self.dashboard {
                Some(dashboard) => dashboard.ingest(v),
                None => self.pending.push(v),
            },
        }
    }

    fn build_dashboard(&mut self, region: Vec2) {
        let size = SurfaceSize::new(region.x, region.y);
        // a collapsed region has nothing to draw on
        let drawable = region.x > 0.0 && region.y > 0.0;
        let tooltip = self.tooltip.clone();
        let built = Dashboard::build(
            &self.config.charts,
            &self.config.style,
            self.config.hit_test,
            |_, _| {
                let scene = if drawable { Scene::new(size) } else { Scene::detached(size) };
                (scene, tooltip.clone())
            },
        );
        match built {
            Ok(mut dashboard) => {
                log::info!("laid out {} charts at {}x{}", dashboard.len(), size.width, size.height);
                for v in self.pending.drain(..) {
                    dashboard.ingest(v);
                }
                self.dashboard = Some(dashboard);
            }
            Err(e) => {
                log::error!("cannot lay out charts: {e}");
                self.dashboard_error = Some(e.to_string());
            }
        }
    }

    fn export_png(&mut self) {
        let Some(dashboard) = &self.dashboard else {
            return;
        };
        let mut messages = Vec::new();
        for (position, chart) in self.config.charts.iter().enumerate() {
            let view = match &chart.id {
                Some(id) => dashboard.get(id),
                None => dashboard.get_by_position(position),
            };
            let Some(view) = view else {
                continue;
            };
            let path = format!("{}.png", chart_label(position, chart));
            let written = render_scene_png(view.surface(), view.style())
                .map_err(anyhow::Error::from)
                .and_then(|png| std::fs::write(&path, png).with_context(|| format!("writing {path}")));
            match written {
                Ok(()) => messages.push(format!("Saved {path}")),
                Err(e) => {
                    log::warn!("export failed: {e:#}");
                    messages.push(format!("Export failed: {e}"));
                }
            }
        }
        for m in messages {
            self.log(&m);
        }
    }

    fn draw_charts(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let count = self.config.charts.len().max(1) as f32;
        let spacing = ui.spacing().item_spacing.y;
        let available = ui.available_size();
        let region = Vec2::new(
            available.x,
            ((available.y - spacing * (count - 1.0)) / count).max(40.0),
        );

        if self.dashboard.is_none() && self.dashboard_error.is_none() {
            self.build_dashboard(region);
        }
        if let Some(e) = &self.dashboard_error {
            ui.label(egui::RichText::new(e).color(DISCONNECTED_COLOR));
            return;
        }
        let Some(dashboard) = &mut self.dashboard else {
            return;
        };
        if dashboard.is_empty() {
            ui.label("No charts configured.");
            return;
        }

        let background = to_color32(self.config.style.background);
        let pointer_moved = ctx.input(|i| i.pointer.is_moving());

        for (position, chart) in self.config.charts.iter().enumerate() {
            let view = match &chart.id {
                Some(id) => dashboard.get_mut(id),
                None => dashboard.get_by_position_mut(position),
            };
            let Some(view) = view else {
                continue;
            };
            let label = chart_label(position, chart);
            let (response, painter) = ui.allocate_painter(region, Sense::hover());
            let origin = response.rect.min;
            painter.rect_filled(response.rect, 0.0, background);
            paint_scene(&painter, origin, view.surface());
            let buffer = view.buffer();
            let caption = match (view.state(), buffer.latest(), view.scale_max()) {
                (ChartState::Populated, Some(latest), Some(scale)) => format!(
                    "{label}  {latest}  peak {}  [{}/{}{}, scale {scale}]",
                    buffer.max(),
                    buffer.len(),
                    buffer.capacity(),
                    if buffer.is_full() { ", rolling" } else { "" },
                ),
                _ => format!("{label}  waiting for samples"),
            };
            painter.text(
                origin + Vec2::new(6.0, 4.0),
                egui::Align2::LEFT_TOP,
                caption,
                egui::FontId::proportional(12.0),
                Color32::GRAY,
            );

            // only pointer movement over this chart re-runs the hit test
            if pointer_moved {
                if let Some(pos) = response.hover_pos() {
                    view.update_tooltip(
                        Point::new(pos.x - origin.x, pos.y - origin.y),
                        Point::new(origin.x, origin.y),
                    );
                }
            }
        }
    }

    fn draw_tooltip(&self, ctx: &egui::Context) {
        let Some(placement) = self.tooltip.placement() else {
            return;
        };
        egui::Area::new(egui::Id::new("chart-tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(Pos2::new(placement.position.x, placement.position.y))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(placement.text.as_str());
                });
            });
    }
}

fn chart_label(position: usize, chart: &ChartConfig) -> String {
    chart
        .id
        .clone()
        .unwrap_or_else(|| format!("chart-{position}"))
}

fn to_color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}

fn paint_scene(painter: &egui::Painter, origin: Pos2, scene: &Scene) {
    let at = |p: Point| origin + Vec2::new(p.x, p.y);
    let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
    for primitive in scene.primitives() {
        match primitive {
            Primitive::Line { from, to, width, color } => {
                if finite(from) && finite(to) {
                    painter.line_segment([at(*from), at(*to)], Stroke::new(*width, to_color32(*color)));
                }
            }
            Primitive::Circle { center, radius, color } => {
                if finite(center) {
                    painter.circle_filled(at(*center), *radius, to_color32(*color));
                }
            }
        }
    }
}

impl eframe::App for LiveChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. stream events
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
        }
        ctx.request_repaint_after(Duration::from_millis(50));

        // 2. controls
        egui::SidePanel::left("controls").min_width(220.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("Live Chart");
            ui.separator();

            let (status, color) = if self.is_connected {
                ("Connected", CONNECTED_COLOR)
            } else {
                ("Disconnected", DISCONNECTED_COLOR)
            };
            ui.label(egui::RichText::new(status).strong().color(color));

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.connection_mode, ConnectionMode::Simulation, "SIM");
                ui.selectable_value(&mut self.connection_mode, ConnectionMode::Tcp, "TCP");
                ui.selectable_value(&mut self.connection_mode, ConnectionMode::WebSocket, "WS");
            });

            let btn_txt = if self.is_connected { "DISCONNECT" } else { "CONNECT" };
            if ui.button(btn_txt).clicked() {
                let cmd = if self.is_connected {
                    StreamCommand::Disconnect
                } else {
                    StreamCommand::Connect(self.connection_mode)
                };
                self.tx_cmd.send(cmd).ok();
            }

            if ui
                .add_enabled(self.dashboard.is_some(), egui::Button::new("EXPORT PNG"))
                .clicked()
            {
                self.export_png();
            }

            ui.add_space(10.0);
            egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
        });

        // 3. charts
        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_charts(ctx, ui);
        });

        self.draw_tooltip(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // app without an engine thread behind it
    fn offline_app() -> LiveChartApp {
        let (_tx, rx) = channel();
        let (tx_cmd, _rx_cmd) = channel();
        LiveChartApp {
            config: AppConfig::default(),
            is_connected: false,
            connection_mode: ConnectionMode::Tcp,
            dashboard: None,
            dashboard_error: None,
            tooltip: SharedTooltip::default(),
            pending: Vec::new(),
            log_messages: Vec::new(),
            rx,
            tx_cmd,
        }
    }

    #[test]
    fn events_update_status_and_buffer_values_until_layout() {
        let mut app = offline_app();
        app.handle_event(StreamEvent::Connected);
        assert!(app.is_connected);
        app.handle_event(StreamEvent::Value(20.0));
        app.handle_event(StreamEvent::Value(21.0));
        assert_eq!(app.pending, vec![20.0, 21.0]);

        app.build_dashboard(Vec2::new(300.0, 120.0));
        assert!(app.pending.is_empty());
        let dashboard = app.dashboard.as_ref().unwrap();
        let inverse = dashboard.get("inverse-chart").unwrap();
        assert_eq!(inverse.buffer().snapshot(), &[235.0, 234.0]);
        assert_eq!(inverse.size(), SurfaceSize::new(300.0, 120.0));

        app.handle_event(StreamEvent::Disconnected);
        assert!(!app.is_connected);
    }

    #[test]
    fn collapsed_region_gets_detached_charts() {
        let mut app = offline_app();
        app.build_dashboard(Vec2::new(0.0, 120.0));
        app.handle_event(StreamEvent::Value(20.0));
        let dashboard = app.dashboard.as_ref().unwrap();
        let chart = dashboard.get("temperature-chart").unwrap();
        assert_eq!(chart.buffer().snapshot(), &[20.0]);
        assert!(chart.surface().primitives().is_empty());
        assert_eq!(chart.scale_max(), None);
    }

    #[test]
    fn unnamed_charts_get_positional_labels() {
        let chart = ChartConfig::default();
        assert_eq!(chart_label(3, &chart), "chart-3");
        assert_eq!(chart_label(0, &AppConfig::default().charts[1]), "inverse-chart");
    }

    #[test]
    fn log_keeps_recent_lines() {
        let mut app = offline_app();
        for i in 0..12 {
            app.handle_event(StreamEvent::Log(format!("line {i}")));
        }
        assert_eq!(app.log_messages.len(), MAX_LOG_LINES);
        assert_eq!(app.log_messages.last().map(String::as_str), Some("> line 11"));
    }
}
