use std::{path::Path, sync::Mutex};

use vault_folio::{
    content::{Rendered, SiteData, load_site_data},
    document::Document,
};

use crate::common::test_utils::site;

mod common;

// The loader reads `./assets/`, so these tests move the working directory.
// The lock keeps them from doing that concurrently.
static CWD: Mutex<()> = Mutex::new(());

fn load_site_data_in(dir: &Path) -> SiteData {
    let _guard = CWD.lock().unwrap_or_else(|e| e.into_inner());
    let previous = std::env::current_dir().expect("cwd");
    std::env::set_current_dir(dir).expect("enter tempdir");
    let data = futures::executor::block_on(load_site_data());
    std::env::set_current_dir(previous).expect("restore cwd");
    data
}

#[test]
fn missing_data_files_fall_back_to_built_in_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = load_site_data_in(dir.path());

    assert_eq!(data, SiteData::fallback());
    assert_eq!(data.projects.len(), 2);
    assert_eq!(data.skills.len(), 3);
    assert_eq!(data.timeline.len(), 4);
    assert_eq!(data.doctrines.len(), 6);

    let (mut site, _) = site(1280, 720);
    assert_eq!(
        site.on_data(&data),
        Rendered {
            skills: 3,
            projects: 2,
            doctrines: 6,
            timeline: 4,
        }
    );
    let doc = site.document();
    assert_eq!(doc.query_all(".operation-card").len(), 2);
    assert_eq!(doc.query_all(".skill-vault").len(), 3);
    assert_eq!(doc.query_all(".doctrine-card").len(), 6);
    assert_eq!(doc.query_all(".timeline-item").len(), 4);
}

#[test]
fn one_malformed_file_discards_the_whole_set() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data_dir = dir.path().join("assets").join("data");
    std::fs::create_dir_all(&data_dir).expect("data dir");
    std::fs::write(data_dir.join("projects.json"), "[]").expect("projects");
    std::fs::write(data_dir.join("skills.json"), "[]").expect("skills");
    std::fs::write(data_dir.join("timeline.json"), "[]").expect("timeline");
    std::fs::write(data_dir.join("content.json"), "{ not json").expect("content");

    let data = load_site_data_in(dir.path());

    assert_eq!(data, SiteData::fallback());
}
