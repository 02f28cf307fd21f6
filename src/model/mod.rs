// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Drawing data model: ids, entities and the object store

pub mod decoration;
pub mod entity_id;
pub mod error;
pub mod path;
pub mod payload;
pub mod store;
pub mod vertex;
pub mod z_order;

pub use decoration::{Line, Point, PointStyle};
pub use entity_id::{EntityId, IdAllocator, LineId, PathId, PointId, VertexId, ZIndex};
pub use error::ModelError;
pub use path::{Color, Path, PathEnd, PathStyle};
pub use payload::{PathKind, Payload};
pub use store::ObjectStore;
pub use vertex::{BezierControl, CurvatureKind, CurvatureState, HandleSide, Vertex};
pub use z_order::ZTarget;
