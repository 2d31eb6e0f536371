// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Construction-time validation failures for safety reporting types.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("{0} must be non-empty")]
    EmptyField(&'static str),

    #[error("unknown severity level {0}")]
    InvalidSeverity(i32),

    #[error("unknown wire value {0}")]
    UnknownWireValue(i32),

    #[error("issue cannot have duplicate action ids ({0:?})")]
    DuplicateActionId(String),

    #[error("issue must not contain more than 2 actions, got {0}")]
    TooManyActions(usize),

    #[error("manually actionable issue must contain at least 1 action")]
    MissingAction,

    #[error("custom notification must not contain more than 2 actions, got {0}")]
    TooManyNotificationActions(usize),

    #[error(
        "source severity {status} is below the max issue severity {issue} of an attention-requiring issue"
    )]
    SeverityBelowIssues { status: i32, issue: i32 },

    #[error("issues above information severity require a source status")]
    MissingStatus,

    #[error(transparent)]
    Parcel(#[from] parcel::ParcelError),
}
