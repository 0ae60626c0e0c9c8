//! Portfolio content: the data model, loading it from the asset directory and
//! stamping it into the page as cards.

pub mod templates;

use std::fmt;

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    document::{Document, NodeId},
    resources::load_json,
};

pub const PROJECTS_FILE: &str = "data/projects.json";
pub const SKILLS_FILE: &str = "data/skills.json";
pub const TIMELINE_FILE: &str = "data/timeline.json";
pub const CONTENT_FILE: &str = "data/content.json";

/// A value data files may give either as a number or as a string, like a year.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Label {
    Number(i64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(n) => write!(f, "{}", n),
            Label::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Metric {
    pub value: Label,
    pub label: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Project {
    pub title: String,
    pub icon: String,
    pub problem: String,
    #[serde(default)]
    pub impact: Vec<Metric>,
    #[serde(default)]
    pub stack: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Skill {
    pub title: String,
    pub icon: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub year: Label,
    pub title: String,
    pub detail: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Doctrine {
    pub number: Label,
    pub text: String,
}

/// Everything the card sections show. Loaded once, never changed afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiteData {
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub timeline: Vec<TimelineEntry>,
    pub doctrines: Vec<Doctrine>,
}

/// Read a collection that is either a bare array or stored under `key`.
fn collection<T: DeserializeOwned>(value: Value, key: &str) -> anyhow::Result<Vec<T>> {
    let items = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| anyhow::anyhow!("missing '{}' collection", key))?,
        other => anyhow::bail!("expected an array or an object, got {}", other),
    };
    Ok(serde_json::from_value(items)?)
}

impl SiteData {
    /// Assemble the data from the four parsed data files.
    pub fn from_values(projects: Value, skills: Value, timeline: Value, content: Value) -> anyhow::Result<Self> {
        Ok(Self {
            projects: collection(projects, "projects")?,
            skills: collection(skills, "skills")?,
            timeline: collection(timeline, "timeline")?,
            doctrines: collection(content, "doctrines")?,
        })
    }

    /// Built-in content shown when the data files are unavailable.
    pub fn fallback() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        fn metric(value: &str, label: &str) -> Metric {
            Metric {
                value: Label::Text(value.to_string()),
                label: label.to_string(),
            }
        }

        let projects = vec![
            Project {
                title: "Autonomous Ground Vehicle (AGV)".to_string(),
                icon: "🤖".to_string(),
                problem: "Build an AI-driven rover for autonomous navigation.".to_string(),
                impact: vec![
                    metric("0.5m", "Precision"),
                    metric("92%", "Accuracy"),
                    metric("<200ms", "Response"),
                ],
                stack: strings(&["Python", "OpenCV", "TensorFlow", "SLAM", "Arduino"]),
            },
            Project {
                title: "BOMANI: Livestock Intelligence".to_string(),
                icon: "🐄".to_string(),
                problem: "Help 10M+ Indian farmers identify cattle breeds at scale.".to_string(),
                impact: vec![
                    metric("10M+", "Users"),
                    metric("92%", "Accuracy"),
                    metric("Real-Time", "Processing"),
                ],
                stack: strings(&["React Native", "TensorFlow Lite", "Node.js", "MongoDB", "Firebase"]),
            },
        ];

        let skills = vec![
            Skill {
                title: "Full-Stack Architecture".to_string(),
                icon: "⚡".to_string(),
                description: "React → Node.js → MongoDB. Designed systems serving 1,000+ concurrent users."
                    .to_string(),
                tags: strings(&["React", "Node.js", "MongoDB", "Redis"]),
            },
            Skill {
                title: "AI/ML Integration".to_string(),
                icon: "🧠".to_string(),
                description: "Shipped email automation with 89% accuracy. Computer vision pipeline.".to_string(),
                tags: strings(&["TensorFlow", "OpenAI APIs", "NLP", "Computer Vision"]),
            },
            Skill {
                title: "Blockchain & Web3".to_string(),
                icon: "🔗".to_string(),
                description: "Deployed smart contracts on Ethereum/Polygon. Built dApps.".to_string(),
                tags: strings(&["Solidity", "Web3.js", "Ethereum", "Polygon"]),
            },
        ];

        let timeline = [
            (2025, "Campus Ambassador, Internshala", "500+ students, 40% engagement growth"),
            (2024, "Full-Stack Intern, Optimus Expert", "1,000+ users, 99.8% uptime"),
            (2023, "Blockchain Engineer, Metacrafters", "500+ transactions, certified"),
            (2022, "Started @ Chandigarh University", "CGPA 7.2, Smart India Hackathon"),
        ]
        .into_iter()
        .map(|(year, title, detail)| TimelineEntry {
            year: Label::Number(year),
            title: title.to_string(),
            detail: detail.to_string(),
        })
        .collect();

        let doctrines = [
            "Ship fast, measure, iterate.",
            "Code is communication.",
            "Every system must fail gracefully.",
            "AI is tooling, not magic.",
            "Constraints breed creativity.",
            "Open source > résumé bullets.",
        ]
        .into_iter()
        .zip(1..)
        .map(|(text, number)| Doctrine {
            number: Label::Number(number),
            text: text.to_string(),
        })
        .collect();

        Self {
            projects,
            skills,
            timeline,
            doctrines,
        }
    }
}

/// Fetch all four data files concurrently. Any failure falls back to the built-in content.
pub async fn load_site_data() -> SiteData {
    let (projects, skills, timeline, content) = futures::join!(
        load_json::<Value>(PROJECTS_FILE),
        load_json::<Value>(SKILLS_FILE),
        load_json::<Value>(TIMELINE_FILE),
        load_json::<Value>(CONTENT_FILE),
    );
    let loaded = match (projects, skills, timeline, content) {
        (Ok(p), Ok(s), Ok(t), Ok(c)) => SiteData::from_values(p, s, t, c),
        (Err(e), ..) | (_, Err(e), ..) | (_, _, Err(e), _) | (.., Err(e)) => Err(e),
    };
    match loaded {
        Ok(data) => {
            log::info!(
                "[SYSTEM] Loaded {} projects, {} skills, {} timeline entries, {} doctrines",
                data.projects.len(),
                data.skills.len(),
                data.timeline.len(),
                data.doctrines.len()
            );
            data
        }
        Err(e) => {
            log::warn!("[SYSTEM] Data files not found. Using fallback data. ({:#})", e);
            SiteData::fallback()
        }
    }
}

/// How many cards went into each container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub skills: usize,
    pub projects: usize,
    pub doctrines: usize,
    pub timeline: usize,
}

fn fill<D: Document, T>(
    doc: &mut D,
    container: &str,
    class: &str,
    items: &[T],
    template: impl Fn(&T) -> String,
) -> usize {
    let Some(parent) = doc.query(container) else {
        log::debug!("no {} container, skipping", container);
        return 0;
    };
    let mut count = 0;
    for item in items {
        if append(doc, parent, class, &template(item)) {
            count += 1;
        }
    }
    count
}

fn append(doc: &mut impl Document, parent: NodeId, class: &str, html: &str) -> bool {
    match doc.append_child(parent, "div", class, html) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("could not append card: {:#}", e);
            false
        }
    }
}

/// Append one card per item to the four containers. Calling this twice duplicates the cards.
pub fn render_content(doc: &mut impl Document, data: &SiteData) -> Rendered {
    Rendered {
        skills: fill(doc, "#proof-grid", "skill-vault metal-panel", &data.skills, templates::skill_card),
        projects: fill(
            doc,
            "#operations-container",
            "operation-card metal-panel",
            &data.projects,
            templates::operation_card,
        ),
        doctrines: fill(
            doc,
            "#doctrine-grid",
            "doctrine-card metal-panel",
            &data.doctrines,
            templates::doctrine_card,
        ),
        timeline: fill(
            doc,
            "#timeline-container",
            "timeline-item",
            &data.timeline,
            templates::timeline_item,
        ),
    }
}
