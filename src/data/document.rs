// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! On-disk document schema.
//!
//! ```json
//! { "version": { "major": 1, "minor": 0 },
//!   "state": { "vertices": [...], "paths": [...], "points": [...],
//!              "lines": [...], "selection": { ... } } }
//! ```

use crate::editing::selection::{Selection, SelectionRecord};
use crate::model::{Line, ObjectStore, Path, Point, Vertex};
use crate::settings::io;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema version stamped into every document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
}

impl SchemaVersion {
    pub const CURRENT: SchemaVersion = SchemaVersion {
        major: io::SCHEMA_MAJOR,
        minor: io::SCHEMA_MINOR,
    };

    /// Same major version and no newer minor version than this build
    pub fn is_readable(self) -> bool {
        self.major == Self::CURRENT.major && self.minor <= Self::CURRENT.minor
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub paths: Vec<Path>,
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub selection: SelectionRecord,
}

/// A complete saved drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: SchemaVersion,
    pub state: DocumentState,
}

impl Document {
    /// Snapshot the store and selection
    pub fn capture(store: &ObjectStore, selection: &Selection) -> Self {
        Self {
            version: SchemaVersion::CURRENT,
            state: DocumentState {
                vertices: store.vertices().cloned().collect(),
                paths: store.paths().cloned().collect(),
                points: store.points().cloned().collect(),
                lines: store.lines().cloned().collect(),
                selection: selection.to_record(),
            },
        }
    }

    /// Rebuild a store and selection, dropping anything that no longer resolves
    pub fn into_parts(self) -> (ObjectStore, Selection) {
        let DocumentState {
            vertices,
            paths,
            points,
            lines,
            selection,
        } = self.state;
        let store = ObjectStore::from_parts(vertices, paths, points, lines);
        let mut selection = Selection::from_record(selection);
        selection.prune(&store);
        (store, selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PointStyle;
    use kurbo::{Point as KPoint, Vec2};

    #[test]
    fn capture_and_rebuild_keep_everything() {
        let mut store = ObjectStore::new();
        let a = store.create_vertex(KPoint::new(0.0, 0.0));
        let b = store.create_vertex(KPoint::new(10.0, 5.0));
        let c = store.create_vertex(KPoint::new(3.0, 9.0));
        store.vertex_mut(b).unwrap().set_out_handle(Vec2::new(2.0, 2.0));
        let path = store.create_path(vec![a, b, c], true).unwrap();
        store.create_point(a, PointStyle::default()).unwrap();
        store.create_line(a, c).unwrap();
        let mut sel = Selection::new();
        sel.paths_mut().insert(path);

        let doc = Document::capture(&store, &sel);
        let text = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);

        let (rebuilt, selection) = back.into_parts();
        assert_eq!(rebuilt.path(path), store.path(path));
        assert_eq!(rebuilt.vertex(b), store.vertex(b));
        assert!(selection.paths().contains(&path));
    }

    #[test]
    fn stale_selection_ids_are_pruned_on_rebuild() {
        let json = r#"{
            "version": { "major": 1, "minor": 0 },
            "state": { "selection": { "vertices": [7] } }
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        let (store, selection) = doc.into_parts();
        assert!(store.is_empty());
        assert!(selection.is_empty());
    }

    #[test]
    fn newer_minor_or_other_major_is_unreadable() {
        assert!(SchemaVersion::CURRENT.is_readable());
        let newer = SchemaVersion {
            major: SchemaVersion::CURRENT.major,
            minor: SchemaVersion::CURRENT.minor + 1,
        };
        assert!(!newer.is_readable());
        let other = SchemaVersion {
            major: SchemaVersion::CURRENT.major + 1,
            minor: 0,
        };
        assert!(!other.is_readable());
        assert_eq!(SchemaVersion::CURRENT.to_string(), "1.0");
    }
}
