use std::collections::HashMap;
use crate::chart::{ChartError, ChartStyle, ChartView, DrawingSurface, HitTestMode, TooltipOverlay};
use crate::config::{ChartConfig, ValueTransform};
struct RoutedChart<S, O> {
    id: Option<String>,
    transform: ValueTransform,
    view: ChartView<S, O>,
}
/// Set of charts fed from one value stream. Charts are reachable by their
/// position in the config and, when they have one, by id.
pub struct Dashboard<S, O> {
    charts: Vec<RoutedChart<S, O>>,
    by_name: HashMap<String, usize>,
}
impl<S: DrawingSurface, O: TooltipOverlay> Dashboard<S, O> {
    /// Builds one view per config entry; `attach` supplies the surface and
    /// overlay for the chart at each position.
    pub fn build(
        configs: &[ChartConfig],
        style: &ChartStyle,
        hit_test: HitTestMode,
        mut attach: impl FnMut(usize, &ChartConfig) -> (S, O),
    ) -> Result<Self, ChartError> {
        let mut charts = Vec::with_capacity(configs.len());
        let mut by_name = HashMap::new();
        for (position, config) in configs.iter().enumerate() {
            if let Some(id) = &config.id {
                if by_name.insert(id.clone(), position).is_some() {
                    return Err(ChartError::DuplicateChart(id.clone()));
                }
            }
            let (surface, overlay) = attach(position, config);
            let view = ChartView::new(surface, overlay, config.capacity(), style.clone())
                .with_hit_test_mode(hit_test);
            log::debug!(
                "chart {position} ({:?}) holds {} samples",
                config.id,
                config.capacity()
            );
            charts.push(RoutedChart {
                id: config.id.clone(),
                transform: config.transform,
                view,
            });
        }
        Ok(Self { charts, by_name })
    }
    /// Pushes `value` through every chart's transform and redraws each chart.
    pub fn ingest(&mut self, value: f64) {
        for chart in &mut self.charts {
            chart.view.push_value(chart.transform.apply(value) as f32);
            chart.view.render();
        }
    }
    pub fn len(&self) -> usize {
        self.charts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
    pub fn get(&self, name: &str) -> Option<&ChartView<S, O>> {
        self.by_name.get(name).map(|&i| &self.charts[i].view)
    }
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ChartView<S, O>> {
        let position = *self.by_name.get(name)?;
        Some(&mut self.charts[position].view)
    }
    pub fn get_by_position(&self, position: usize) -> Option<&ChartView<S, O>> {
        self.charts.get(position).map(|c| &c.view)
    }
    pub fn get_by_position_mut(&mut self, position: usize) -> Option<&mut ChartView<S, O>> {
        self.charts.get_mut(position).map(|c| &mut c.view)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::overlay::Tooltip;
    use crate::chart::{Scene, SurfaceSize};
    use crate::config::AppConfig;
    fn build(configs: &[ChartConfig]) -> Result<Dashboard<Scene, Tooltip>, ChartError> {
        Dashboard::build(
            configs,
            &ChartStyle::default(),
            HitTestMode::LastRendered,
            |_, _| (Scene::new(SurfaceSize::new(200.0, 100.0)), Tooltip::default()),
        )
    }
    #[test]
    fn routes_values_through_transforms() {
        let mut dashboard = build(&AppConfig::default().charts).unwrap();
        for v in [20.0, 21.0] {
            dashboard.ingest(v);
        }
        let temperature = dashboard.get("temperature-chart").unwrap();
        let inverse = dashboard.get("inverse-chart").unwrap();
        assert_eq!(temperature.buffer().snapshot(), &[20.0, 21.0]);
        assert_eq!(inverse.buffer().snapshot(), &[235.0, 234.0]);
        assert_eq!(inverse.scale_max(), Some(245.0));
    }
    #[test]
    fn name_and_position_reach_the_same_chart() {
        let mut dashboard = build(&AppConfig::default().charts).unwrap();
        dashboard.ingest(1.0);
        let by_name = dashboard.get("inverse-chart").unwrap();
        let by_position = dashboard.get_by_position(1).unwrap();
        assert!(std::ptr::eq(by_name, by_position));
        assert!(dashboard.get("missing").is_none());
        assert!(dashboard.get_by_position(2).is_none());
    }
    #[test]
    fn unnamed_charts_are_positional_only() {
        let configs = [ChartConfig::default(), ChartConfig::new("b", ValueTransform::Identity)];
        let mut dashboard = build(&configs).unwrap();
        assert_eq!(dashboard.len(), 2);
        assert!(!dashboard.is_empty());
        let named: *const _ = dashboard.get_mut("b").unwrap();
        assert!(std::ptr::eq(dashboard.get_by_position(1).unwrap(), named));
        assert!(dashboard.get_mut("").is_none());
        assert!(build(&[]).unwrap().is_empty());
    }
    #[test]
    fn capacity_comes_from_config() {
        let mut small = ChartConfig::new("small", ValueTransform::Identity);
        small.buffer = Some(2);
        let mut dashboard = build(&[small]).unwrap();
        for v in [1.0, 2.0, 3.0] {
            dashboard.ingest(v);
        }
        assert_eq!(dashboard.get("small").unwrap().buffer().snapshot(), &[2.0, 3.0]);
    }
    #[test]
    fn rejects_duplicate_ids() {
        let configs = [
            ChartConfig::new("a", ValueTransform::Identity),
            ChartConfig::new("a", ValueTransform::Identity),
        ];
        assert!(matches!(build(&configs), Err(ChartError::DuplicateChart(id)) if id == "a"));
    }
}
