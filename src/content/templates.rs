//! HTML for the cards. All text coming from data files is escaped.

use std::fmt::Write;

use crate::content::{Doctrine, Project, Skill, TimelineEntry};

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn spans(class: &str, items: &[String]) -> String {
    items.iter().fold(String::new(), |mut html, item| {
        let _ = write!(html, r#"<span class="{}">{}</span>"#, class, escape(item));
        html
    })
}

pub fn skill_card(skill: &Skill) -> String {
    format!(
        r#"<div class="skill-icon">{icon}</div><h3>{title}</h3><p class="text-muted">{description}</p><div class="skill-tags">{tags}</div>"#,
        icon = escape(&skill.icon),
        title = escape(&skill.title),
        description = escape(&skill.description),
        tags = spans("skill-tag", &skill.tags),
    )
}

pub fn operation_card(project: &Project) -> String {
    let impact = project.impact.iter().fold(String::new(), |mut html, metric| {
        let _ = write!(
            html,
            r#"<div class="impact-item"><div class="impact-value">{}</div><div class="impact-label">{}</div></div>"#,
            escape(&metric.value.to_string()),
            escape(&metric.label)
        );
        html
    });
    format!(
        r#"<div class="operation-icon">{icon}</div><div class="operation-content"><h3>{title}</h3><div class="operation-problem"><strong>Problem:</strong> {problem}</div><div class="operation-impact">{impact}</div><div class="operation-stack">{stack}</div></div>"#,
        icon = escape(&project.icon),
        title = escape(&project.title),
        problem = escape(&project.problem),
        impact = impact,
        stack = spans("stack-badge", &project.stack),
    )
}

pub fn doctrine_card(doctrine: &Doctrine) -> String {
    format!(
        r#"<div class="doctrine-number">{}</div><p class="doctrine-text">{}</p>"#,
        escape(&doctrine.number.to_string()),
        escape(&doctrine.text)
    )
}

pub fn timeline_item(entry: &TimelineEntry) -> String {
    format!(
        r#"<div class="timeline-dot"></div><div class="timeline-body metal-panel"><div class="timeline-year">{}</div><div class="timeline-title">{}</div><div class="timeline-detail text-muted">{}</div></div>"#,
        escape(&entry.year.to_string()),
        escape(&entry.title),
        escape(&entry.detail)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Label, Metric};

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"A" & 'B'</b>"#), "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;");
        assert_eq!(escape("Open source > résumé"), "Open source &gt; résumé");
    }

    #[test]
    fn project_card_lists_metrics_and_stack() {
        let html = operation_card(&Project {
            title: "Rover".into(),
            icon: "R".into(),
            problem: "Drive <alone>".into(),
            impact: vec![Metric {
                value: Label::Text("<200ms".into()),
                label: "Response".into(),
            }],
            stack: vec!["Rust".into(), "wgpu".into()],
        });
        assert!(html.contains("<h3>Rover</h3>"));
        assert!(html.contains("Drive &lt;alone&gt;"));
        assert!(html.contains(r#"<div class="impact-value">&lt;200ms</div>"#));
        assert_eq!(html.matches("stack-badge").count(), 2);
    }

    #[test]
    fn numbers_render_as_text() {
        let html = timeline_item(&TimelineEntry {
            year: Label::Number(2025),
            title: "Started".into(),
            detail: "Day one".into(),
        });
        assert!(html.contains(r#"<div class="timeline-year">2025</div>"#));
    }
}
