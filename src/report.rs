//! Collected findings and their rendering.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::warn;
use view_checker::ReportSink;

use crate::host::HostView;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Yaml,
}

/// One node reported as missing its accessibility identifier.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Finding {
    pub path: String,
    pub class: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub reported_at: DateTime<Utc>,
}

impl Finding {
    pub fn from_view(view: &HostView) -> Self {
        Self {
            path: view.path().to_string(),
            class: view.class().to_string(),
            label: view.label().map(str::to_string),
            reported_at: Utc::now(),
        }
    }
}

/// Report sink that keeps every finding and logs it as a warning.
#[derive(Clone, Default)]
pub struct FindingLog {
    entries: Arc<Mutex<Vec<Finding>>>,
}

impl FindingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Finding> {
        self.entries.lock().clone()
    }
}

impl ReportSink<HostView> for FindingLog {
    fn report(&self, node: &Arc<HostView>) {
        let finding = Finding::from_view(node);
        warn!(
            target: "idcheck",
            class = %finding.class,
            path = %finding.path,
            label = finding.label.as_deref().unwrap_or(""),
            "missing accessibility identifier"
        );
        self.entries.lock().push(finding);
    }
}

pub fn render(findings: &[Finding], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(findings)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(findings)?),
        OutputFormat::Human => Ok(render_human(findings)),
    }
}

fn render_human(findings: &[Finding]) -> String {
    if findings.is_empty() {
        return "No missing accessibility identifiers.\n".to_string();
    }
    let mut out = format!(
        "{} view(s) missing an accessibility identifier:\n",
        findings.len()
    );
    for finding in findings {
        match &finding.label {
            Some(label) => out.push_str(&format!(
                "  {} ({}) {:?}\n",
                finding.path, finding.class, label
            )),
            None => out.push_str(&format!("  {} ({})\n", finding.path, finding.class)),
        }
    }
    out
}
