// Server-rendered dashboard page
use crate::domain::chart::{CHART_HEIGHT, CHART_WIDTH, LABEL_X, LABEL_Y};
use crate::domain::view::DashboardView;
use askama::Template;

const BUCKETS: [&str; 3] = ["raw", "hour", "day"];

#[derive(Debug)]
pub struct BucketOption<'a> {
    pub name: &'a str,
    pub selected: bool,
}

/// Page template. The chart is drawn inline as SVG.
#[derive(Debug, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub view: &'a DashboardView,
    pub refresh_seconds: u64,
    pub buckets: Vec<BucketOption<'a>>,
    pub chart_path: String,
    pub chart_label: &'a str,
    pub chart_width: f64,
    pub chart_height: f64,
    pub label_x: f64,
    pub label_y: f64,
}

impl<'a> DashboardTemplate<'a> {
    pub fn new(view: &'a DashboardView, refresh_seconds: u64) -> Self {
        // The selected bucket is always offered, even if it is not a standard one
        let mut names: Vec<&'a str> = BUCKETS.to_vec();
        if !names.contains(&view.bucket.as_str()) {
            names.push(&view.bucket);
        }

        Self {
            view,
            refresh_seconds: refresh_seconds.max(1),
            buckets: names
                .into_iter()
                .map(|name| BucketOption {
                    name,
                    selected: name == view.bucket,
                })
                .collect(),
            chart_path: view.chart.path_data(),
            chart_label: view.chart.label.as_deref().unwrap_or_default(),
            chart_width: CHART_WIDTH,
            chart_height: CHART_HEIGHT,
            label_x: LABEL_X,
            label_y: LABEL_Y,
        }
    }
}
