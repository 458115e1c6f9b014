use culturehub_agent::InsightReport;

const POWERED_BY: &str =
    "**Results powered by Qloo's Taste AI (Affinity Scores: >80 Very High, 60-80 High, <50 Low)**";
const PRIVACY_FOOTER: &str =
    "All insights are generated using Qloo's privacy-first Taste AI, ensuring no personal data is required.";

/// Formats a report for terminal output.
pub fn render_report(report: &InsightReport) -> String {
    let mut lines = vec!["Your Cultural Insights".to_string(), "---".to_string()];

    if report.has_results() {
        lines.push(POWERED_BY.to_string());
    } else {
        lines.push(format!(
            "No specific Qloo data found. Here's a general recommendation for {} based on your input:",
            report.location()
        ));
    }
    lines.push(String::new());

    match report.day_sections() {
        Some(sections) => {
            for section in sections {
                let (title, body) = split_heading(&section.body);
                if title.is_empty() {
                    lines.push(format!("Day {}", section.day));
                } else {
                    lines.push(format!("Day {}: {title}", section.day));
                }
                lines.push(body.to_string());
                lines.push(String::new());
            }
        }
        None => {
            lines.push(report.narrative.trim().to_string());
            lines.push(String::new());
        }
    }

    for notice in &report.notices {
        lines.push(format!("[{}] {}", notice.label(), notice.message));
    }
    if !report.notices.is_empty() {
        lines.push(String::new());
    }

    lines.push(PRIVACY_FOOTER.to_string());
    lines.join("\n")
}

/// Splits what follows a `**Day N` marker into the rest of its heading and the body.
///
/// The heading ends at the first closing `**` on the marker's line. Without one, only a
/// leading `:` is dropped.
fn split_heading(section: &str) -> (&str, &str) {
    let first_line = section.split('\n').next().unwrap_or_default();
    match first_line.find("**") {
        Some(close) => {
            let title = section[..close].trim_start_matches(':').trim();
            (title.trim_end_matches(':').trim(), section[close + 2..].trim())
        }
        None => ("", section.trim_start_matches(':').trim()),
    }
}
