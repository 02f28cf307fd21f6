// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Errors raised by the object model

use super::entity_id::{LineId, PathId, PointId, VertexId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("{0} not found")]
    PathNotFound(PathId),

    #[error("{0} not found")]
    PointNotFound(PointId),

    #[error("{0} not found")]
    LineNotFound(LineId),

    #[error(
        "{path}: object must have both 'kind' and 'payload' or neither \
         (kind present: {has_kind}, payload present: {has_payload})"
    )]
    KindPayloadMismatch {
        path: PathId,
        has_kind: bool,
        has_payload: bool,
    },

    #[error("{path}: payload does not match its kind: {reason}")]
    InvalidPayload { path: PathId, reason: String },
}
