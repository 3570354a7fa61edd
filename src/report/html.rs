//! HTML formatter.
//!
//! Renders a single self-contained page with `tera` (autoescaping on).
//! Severity cards always follow the fixed order CRITICAL, HIGH, MEDIUM,
//! LOW, INFO so the output is reproducible across runs.

use crate::error::ReportError;
use crate::policy::types::{Issue, ScanResult, Severity};
use crate::report::Formatter;
use serde::Serialize;
use tera::{Context, Tera};

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

#[derive(Serialize)]
struct SeverityCard {
    label: &'static str,
    count: usize,
}

#[derive(Serialize)]
struct HtmlView<'a> {
    total_issues: usize,
    severity_cards: Vec<SeverityCard>,
    issues: &'a [Issue],
}

impl<'a> From<&'a ScanResult> for HtmlView<'a> {
    fn from(result: &'a ScanResult) -> Self {
        Self {
            total_issues: result.stats.total_issues,
            severity_cards: Severity::ALL
                .iter()
                .map(|s| SeverityCard {
                    label: s.as_str(),
                    count: result.stats.count(*s),
                })
                .collect(),
            issues: &result.issues,
        }
    }
}

impl Formatter for HtmlFormatter {
    fn format(&self, result: &ScanResult) -> Result<Vec<u8>, ReportError> {
        let context = Context::from_serialize(HtmlView::from(result))?;
        let rendered = Tera::one_off(HTML_TEMPLATE, &context, true)?;
        Ok(rendered.into_bytes())
    }
}

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>HardenaK8s Security Audit Report</title>
    <style>
        :root {
            --primary: #7D56F4;
            --bg: #0f172a;
            --card-bg: #1e293b;
            --text-main: #f8fafc;
            --text-dim: #94a3b8;
            --critical: #ef4444;
            --high: #f97316;
            --medium: #eab308;
            --low: #22c55e;
            --info: #3b82f6;
        }
        body {
            font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
            background-color: var(--bg);
            color: var(--text-main);
            margin: 0;
            padding: 2rem;
            line-height: 1.5;
        }
        .container { max-width: 1000px; margin: 0 auto; }
        header {
            text-align: center;
            margin-bottom: 3rem;
            padding: 3rem;
            background: linear-gradient(135deg, var(--primary), #4c1d95);
            border-radius: 1.5rem;
        }
        h1 { margin: 0; font-size: 3rem; font-weight: 800; }
        .tagline { opacity: 0.8; font-size: 1.1rem; }
        .stats-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
            gap: 1.5rem;
            margin-bottom: 3rem;
        }
        .stat-card {
            background: var(--card-bg);
            padding: 1.5rem;
            border-radius: 1rem;
            text-align: center;
        }
        .stat-value { font-size: 2rem; font-weight: 800; display: block; }
        .stat-label { font-size: 0.8rem; color: var(--text-dim); text-transform: uppercase; }
        .issue-card {
            background: var(--card-bg);
            margin-bottom: 1.5rem;
            border-radius: 1rem;
            overflow: hidden;
        }
        .issue-header {
            padding: 1.5rem;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }
        .severity-badge {
            padding: 0.25rem 0.75rem;
            border-radius: 9999px;
            font-size: 0.75rem;
            font-weight: 700;
        }
        .CRITICAL { border-left: 8px solid var(--critical); color: var(--critical); }
        .HIGH { border-left: 8px solid var(--high); color: var(--high); }
        .MEDIUM { border-left: 8px solid var(--medium); color: var(--medium); }
        .LOW { border-left: 8px solid var(--low); color: var(--low); }
        .INFO { border-left: 8px solid var(--info); color: var(--info); }
        .issue-body { padding: 1.5rem; color: var(--text-main); }
        .remediation {
            background: rgba(0,0,0,0.2);
            padding: 1rem;
            border-radius: 0.5rem;
            border: 1px dashed var(--primary);
        }
        .empty-state { text-align: center; font-size: 1.25rem; color: var(--low); }
        .footer { text-align: center; margin-top: 5rem; color: var(--text-dim); font-size: 0.9rem; }
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>HardenaK8s</h1>
            <p class="tagline">Security Audit &amp; Hardening Report</p>
        </header>

        <div class="stats-grid">
            <div class="stat-card">
                <span class="stat-value">{{ total_issues }}</span>
                <span class="stat-label">Total Issues</span>
            </div>
{%- for card in severity_cards %}
            <div class="stat-card {{ card.label }}">
                <span class="stat-value">{{ card.count }}</span>
                <span class="stat-label">{{ card.label }}</span>
            </div>
{%- endfor %}
        </div>

        <h2>Security Findings</h2>
{%- if issues | length == 0 %}
        <p class="empty-state">No security issues found! Your cluster is hardened.</p>
{%- else %}
{%- for issue in issues %}
        <div class="issue-card {{ issue.severity }}">
            <div class="issue-header">
                <h3>{{ issue.title }}</h3>
                <span class="severity-badge">{{ issue.severity }}</span>
            </div>
            <div class="issue-body">
                <p><strong>Resource:</strong> {{ issue.resource }} ({{ issue.namespace }})</p>
                <p>{{ issue.description }}</p>
                <div class="remediation">
                    <strong>Remediation:</strong> {{ issue.remediation }}
                </div>
            </div>
        </div>
{%- endfor %}
{%- endif %}

        <div class="footer">
            Generated by the hardena CLI.
        </div>
    </div>
</body>
</html>
"#;
