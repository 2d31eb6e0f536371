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

//! Safety status reporting surface types: what a safety source submits
//! ([`SafetySourceData`]) and what the center renders back
//! ([`SafetyCenterStatus`], [`SafetyCenterEntry`]).

mod center;
mod error;
mod source;

pub use center::{
    RefreshStatus, SafetyCenterEntry, SafetyCenterEntryBuilder, SafetyCenterStatus,
    SafetyCenterStatusBuilder, SeverityUnspecifiedIconType,
};
pub use error::Error;
pub use source::{
    Action, IssueActionability, Notification, NotificationBehavior, SafetySourceData,
    SafetySourceDataBuilder, SafetySourceIssue, SafetySourceIssueBuilder, SafetySourceStatus,
};

/// Severity levels shared by source-side and center-side types. The
/// numeric gaps are part of the wire contract and leave room for levels
/// between the existing ones.
pub const SEVERITY_LEVEL_UNSPECIFIED: i32 = 100;
pub const SEVERITY_LEVEL_INFORMATION: i32 = 200;
pub const SEVERITY_LEVEL_RECOMMENDATION: i32 = 300;
pub const SEVERITY_LEVEL_CRITICAL_WARNING: i32 = 400;

pub(crate) fn is_valid_severity(level: i32) -> bool {
    matches!(
        level,
        SEVERITY_LEVEL_UNSPECIFIED
            | SEVERITY_LEVEL_INFORMATION
            | SEVERITY_LEVEL_RECOMMENDATION
            | SEVERITY_LEVEL_CRITICAL_WARNING
    )
}
