// src/chart/mod.rs
pub mod buffer;
pub mod dashboard;
pub mod error;
pub mod overlay;
pub mod plot;
pub mod source;
pub mod surface;
pub mod view;
pub use buffer::DEFAULT_CAPACITY;
pub use dashboard::Dashboard;
pub use error::ChartError;
pub use overlay::{SharedTooltip, TooltipOverlay};
pub use plot::render_scene_png;
pub use source::{SimulatedSource, TcpLineSource, ValueSource, WebSocketSource, MAX_JITTER};
pub use surface::{DrawingSurface, Point, Primitive, Rgb, Scene, SurfaceSize};
pub use view::{ChartState, ChartStyle, ChartView, HitTestMode};
