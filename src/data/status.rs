// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Transient, auto-dismissing status messages

use super::file_io::{IoOutcome, IoStatus};
use chrono::{DateTime, Local};

/// A message shown to the user for a limited time
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub status: IoStatus,
    pub created: DateTime<Local>,
    /// Seconds left before the message is dismissed
    remaining: f64,
}

impl StatusMessage {
    pub fn new(outcome: IoOutcome, lifetime: f64) -> Self {
        Self {
            text: outcome.message,
            status: outcome.status,
            created: Local::now(),
            remaining: lifetime.max(0.0),
        }
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Advance the clock; returns false once the message has expired
    pub fn tick(&mut self, dt: f64) -> bool {
        self.remaining -= dt.max(0.0);
        self.remaining > 0.0
    }

    /// Time of day the message was posted, for display next to it
    pub fn timestamp(&self) -> String {
        self.created.format("%I:%M %p").to_string()
    }
}
