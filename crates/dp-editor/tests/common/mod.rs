//! Shared helpers: a recording host and a couple of chart builders.

#![allow(dead_code)]

use dp_core::axis::{Axis, LinearAxis};
use dp_core::id::PointId;
use dp_core::model::Chart;
use dp_core::options::{ChartOptions, GuideBoxStyle, HandleStyle};
use dp_editor::host::{Animation, ChartHost, DragHandle, Redraw, Renderer};
use kurbo::Rect;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Every call the engine made on its host, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ShowGuide(Rect, GuideBoxStyle),
    UpdateGuide(Rect),
    RemoveGuide,
    ShowHandle(DragHandle),
    HideHandles,
    Redraw(Animation),
}

/// Host double with fixed shape bounds and a hand-driven clock.
pub struct RecordingHost {
    pub bounds: HashMap<PointId, Rect>,
    pub calls: Vec<Call>,
    pub handle_style: Option<HandleStyle>,
    now: Instant,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self { bounds: HashMap::new(), calls: Vec::new(), handle_style: None, now: Instant::now() }
    }

    pub fn with_bounds(mut self, id: &str, rect: Rect) -> Self {
        self.bounds.insert(PointId::intern(id), rect);
        self
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    pub fn redraws(&self) -> Vec<Animation> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Redraw(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn handles(&self) -> Vec<DragHandle> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::ShowHandle(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    pub fn guide_rects(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::ShowGuide(r, _) | Call::UpdateGuide(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, kind: &Call) -> usize {
        self.calls.iter().filter(|c| std::mem::discriminant(*c) == std::mem::discriminant(kind)).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for RecordingHost {
    fn point_bounds(&self, point: PointId) -> Rect {
        self.bounds.get(&point).copied().unwrap_or(Rect::ZERO)
    }

    fn show_guide_box(&mut self, rect: Rect, style: &GuideBoxStyle) {
        self.calls.push(Call::ShowGuide(rect, style.clone()));
    }

    fn update_guide_box(&mut self, rect: Rect) {
        self.calls.push(Call::UpdateGuide(rect));
    }

    fn remove_guide_box(&mut self) {
        self.calls.push(Call::RemoveGuide);
    }

    fn show_handle(&mut self, handle: &DragHandle, style: &HandleStyle) {
        self.handle_style = Some(style.clone());
        self.calls.push(Call::ShowHandle(*handle));
    }

    fn hide_handles(&mut self) {
        self.calls.push(Call::HideHandles);
    }
}

impl Redraw for RecordingHost {
    fn redraw(&mut self, animation: Animation) {
        self.calls.push(Call::Redraw(animation));
    }
}

impl ChartHost for RecordingHost {
    fn now(&self) -> Instant {
        self.now
    }
}

/// Vertical axis with `to_pixels(v) = 2v`.
pub struct Doubling;

impl Axis for Doubling {
    fn to_pixels(&self, value: f64, _ignore_padding: bool) -> f64 {
        value * 2.0
    }

    fn to_value(&self, pixel: f64, _ignore_padding: bool) -> f64 {
        pixel / 2.0
    }

    fn is_reversed(&self) -> bool {
        false
    }

    fn is_horizontal(&self) -> bool {
        false
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn chart_options() -> ChartOptions {
    ChartOptions::from_json(include_str!("../fixtures/chart_options.json")).unwrap()
}

/// Chart with a horizontal 0..10 x axis over 100 px and the given y axis.
pub fn chart_with_y(options: ChartOptions, y: impl Axis + 'static) -> (Chart, usize, usize) {
    let mut chart = Chart::new(options);
    let x = chart.add_axis(LinearAxis::horizontal(0.0, 10.0, 0.0, 100.0));
    let y = chart.add_axis(y);
    (chart, x, y)
}

pub fn id(s: &str) -> PointId {
    PointId::intern(s)
}
