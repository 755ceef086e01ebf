//! Loader for story data exported from Twine in the Twison JSON format.
//!
//! ```json
//! {
//!   "startnode": "1",
//!   "passages": [
//!     { "pid": "1", "name": "Start", "text": "Hello[[Go->Next]]",
//!       "tags": [], "links": [{ "name": "Go", "link": "Next", "pid": "2" }] }
//!   ]
//! }
//! ```
//!
//! Passage ids may be strings or numbers. An optional `altstartnode` names the
//! alternate start; when missing, the alternate start is the regular one.

use serde::Deserialize;

use crate::error::{StoryError, StoryResult};
use crate::graph::PassageGraph;
use crate::passage::{Link, Passage, PassageId};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPid {
    Number(u32),
    Text(String),
}

impl RawPid {
    fn parse(&self) -> StoryResult<PassageId> {
        match self {
            Self::Number(n) => Ok(PassageId(*n)),
            Self::Text(s) => s
                .trim()
                .parse::<u32>()
                .map(PassageId)
                .map_err(|_| StoryError::InvalidPid(s.clone())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawLink {
    name: String,
    link: String,
    pid: RawPid,
}

#[derive(Debug, Deserialize)]
struct RawPassage {
    pid: RawPid,
    name: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawStory {
    startnode: RawPid,
    #[serde(default)]
    altstartnode: Option<RawPid>,
    passages: Vec<RawPassage>,
}

/// Parse Twison JSON into a validated [`PassageGraph`].
pub fn parse_story(json: &str) -> StoryResult<PassageGraph> {
    let raw: RawStory = serde_json::from_str(json)?;
    from_raw(raw)
}

/// Build a [`PassageGraph`] from an already-parsed JSON value.
pub fn from_value(value: serde_json::Value) -> StoryResult<PassageGraph> {
    let raw: RawStory = serde_json::from_value(value)?;
    from_raw(raw)
}

fn from_raw(raw: RawStory) -> StoryResult<PassageGraph> {
    let start = raw.startnode.parse()?;
    let alt_start = match &raw.altstartnode {
        Some(pid) => pid.parse()?,
        None => start,
    };

    let passages = raw
        .passages
        .into_iter()
        .map(|p| -> StoryResult<Passage> {
            let links = p
                .links
                .into_iter()
                .map(|l| -> StoryResult<Link> {
                    Ok(Link {
                        label: l.name,
                        target_name: l.link,
                        target_id: l.pid.parse()?,
                    })
                })
                .collect::<StoryResult<Vec<_>>>()?;
            Ok(Passage {
                id: p.pid.parse()?,
                name: p.name,
                text: p.text,
                tags: p.tags.into_iter().collect(),
                links,
            })
        })
        .collect::<StoryResult<Vec<_>>>()?;

    tracing::debug!(passages = passages.len(), %start, %alt_start, "parsed story");
    PassageGraph::new(passages, start, alt_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passage::StartVariant;

    const STORY: &str = r#"{
        "name": "Test",
        "startnode": "1",
        "passages": [
            {
                "pid": "1",
                "name": "startnode",
                "text": "A fork in the road.\n[[Left->BadPath]]\n[[Right->Meadow]]",
                "tags": [],
                "links": [
                    { "name": "Left", "link": "BadPath", "pid": "2" },
                    { "name": "Right", "link": "Meadow", "pid": "3" }
                ]
            },
            {
                "pid": "2",
                "name": "BadPath",
                "text": "You die.[[Again->startnode]]",
                "tags": ["BAD-END"],
                "links": [{ "name": "Again", "link": "startnode", "pid": "1" }]
            },
            { "pid": 3, "name": "Meadow", "text": "Sunlight.", "tags": ["GOOD", "GOOD"] }
        ]
    }"#;

    #[test]
    fn parses_twison() {
        let graph = parse_story(STORY).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.start(StartVariant::Default), PassageId(1));
        assert_eq!(graph.start(StartVariant::Alt), PassageId(1));

        let first = graph.get(PassageId(1)).unwrap();
        assert_eq!(first.links.len(), 2);
        assert_eq!(first.links[0].label, "Left");
        assert_eq!(first.links[1].target_id, PassageId(3));

        let meadow = graph.get(PassageId(3)).unwrap();
        assert_eq!(meadow.tags.len(), 1);
        assert!(meadow.links.is_empty());
    }

    #[test]
    fn alt_start_is_read() {
        let mut value: serde_json::Value = serde_json::from_str(STORY).unwrap();
        value["altstartnode"] = serde_json::json!("3");
        let graph = from_value(value).unwrap();
        assert_eq!(graph.start(StartVariant::Alt), PassageId(3));
    }

    #[test]
    fn bad_pid_is_reported() {
        let json = r#"{ "startnode": "one", "passages": [] }"#;
        assert!(matches!(parse_story(json), Err(StoryError::InvalidPid(s)) if s == "one"));
    }

    #[test]
    fn dangling_link_is_integrity_error() {
        let json = r#"{
            "startnode": "1",
            "passages": [
                { "pid": "1", "name": "a", "text": "",
                  "links": [{ "name": "x", "link": "b", "pid": "2" }] }
            ]
        }"#;
        assert!(matches!(parse_story(json), Err(StoryError::Integrity(_))));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(parse_story("{"), Err(StoryError::Parse(_))));
    }
}
