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

//! What a safety source reports: issues, their actions, and the overall
//! source status, validated before any of it crosses to the center.

use std::collections::HashSet;

use parcel::{Parcel, ParcelReader};

use crate::{is_valid_severity, Error, SEVERITY_LEVEL_INFORMATION};

/// How the user is expected to deal with an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueActionability {
    /// User input is required to resolve the issue.
    #[default]
    Manual,
    /// The issue is a tip the user may review.
    Tip,
    /// The issue was already dealt with automatically.
    Automatic,
}

impl IssueActionability {
    fn to_wire(self) -> i32 {
        match self {
            IssueActionability::Manual => 0,
            IssueActionability::Tip => 100,
            IssueActionability::Automatic => 200,
        }
    }

    fn from_wire(val: i32) -> Result<Self, Error> {
        match val {
            0 => Ok(IssueActionability::Manual),
            100 => Ok(IssueActionability::Tip),
            200 => Ok(IssueActionability::Automatic),
            _ => Err(Error::UnknownWireValue(val)),
        }
    }
}

/// Whether the center should also surface the issue as a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationBehavior {
    #[default]
    Unspecified,
    Never,
    Delayed,
    Immediately,
}

impl NotificationBehavior {
    fn to_wire(self) -> i32 {
        match self {
            NotificationBehavior::Unspecified => 0,
            NotificationBehavior::Never => 100,
            NotificationBehavior::Delayed => 200,
            NotificationBehavior::Immediately => 300,
        }
    }

    fn from_wire(val: i32) -> Result<Self, Error> {
        match val {
            0 => Ok(NotificationBehavior::Unspecified),
            100 => Ok(NotificationBehavior::Never),
            200 => Ok(NotificationBehavior::Delayed),
            300 => Ok(NotificationBehavior::Immediately),
            _ => Err(Error::UnknownWireValue(val)),
        }
    }
}

/// One thing the user can do about an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    id: String,
    label: String,
    resolving: bool,
    success_message: Option<String>,
}

impl Action {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Result<Self, Error> {
        let id = id.into();
        let label = label.into();
        if id.is_empty() {
            return Err(Error::EmptyField("action id"));
        }
        if label.is_empty() {
            return Err(Error::EmptyField("action label"));
        }
        Ok(Action {
            id,
            label,
            resolving: false,
            success_message: None,
        })
    }

    /// Mark the action as resolving the issue when it completes.
    pub fn resolving(mut self, success_message: Option<String>) -> Self {
        self.resolving = true;
        self.success_message = success_message;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_resolving(&self) -> bool {
        self.resolving
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.id);
        parcel.write_string(&self.label);
        parcel.write_presence(self.resolving);
        parcel.write_presence(self.success_message.is_some());
        if let Some(message) = &self.success_message {
            parcel.write_string(message);
        }
    }

    fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let id = reader.read_string()?;
        let label = reader.read_string()?;
        let mut action = Action::new(id, label)?;
        action.resolving = reader.read_presence()?;
        if reader.read_presence()? {
            action.success_message = Some(reader.read_string()?);
        }
        Ok(action)
    }
}

fn enforce_unique_action_ids(actions: &[Action]) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for action in actions {
        if !seen.insert(action.id()) {
            return Err(Error::DuplicateActionId(action.id().to_string()));
        }
    }
    Ok(())
}

const MAX_ACTIONS: usize = 2;

/// Custom notification overriding the center's default title and text
/// for an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    title: String,
    text: String,
    actions: Vec<Action>,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        actions: Vec<Action>,
    ) -> Result<Self, Error> {
        let title = title.into();
        let text = text.into();
        if title.is_empty() {
            return Err(Error::EmptyField("notification title"));
        }
        if text.is_empty() {
            return Err(Error::EmptyField("notification text"));
        }
        enforce_unique_action_ids(&actions)?;
        if actions.len() > MAX_ACTIONS {
            return Err(Error::TooManyNotificationActions(actions.len()));
        }
        Ok(Notification {
            title,
            text,
            actions,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.title);
        parcel.write_string(&self.text);
        parcel.write_i32(self.actions.len() as i32);
        for action in &self.actions {
            action.write_to_parcel(parcel);
        }
    }

    fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let title = reader.read_string()?;
        let text = reader.read_string()?;
        let actions = read_actions(reader)?;
        Notification::new(title, text, actions)
    }
}

fn read_actions(reader: &mut ParcelReader<'_>) -> Result<Vec<Action>, Error> {
    let count = reader.read_i32()?;
    if !(0..=MAX_ACTIONS as i32).contains(&count) {
        return Err(Error::TooManyActions(count.max(0) as usize));
    }
    (0..count).map(|_| Action::read_from_parcel(reader)).collect()
}

/// One safety issue a source wants the user to know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetySourceIssue {
    id: String,
    title: String,
    subtitle: Option<String>,
    summary: String,
    severity_level: i32,
    issue_type_id: String,
    actions: Vec<Action>,
    actionability: IssueActionability,
    notification_behavior: NotificationBehavior,
    custom_notification: Option<Notification>,
}

impl SafetySourceIssue {
    pub fn builder(
        id: impl Into<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        severity_level: i32,
        issue_type_id: impl Into<String>,
    ) -> SafetySourceIssueBuilder {
        SafetySourceIssueBuilder {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            summary: summary.into(),
            severity_level,
            issue_type_id: issue_type_id.into(),
            actions: Vec::new(),
            actionability: IssueActionability::default(),
            notification_behavior: NotificationBehavior::default(),
            custom_notification: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn severity_level(&self) -> i32 {
        self.severity_level
    }

    pub fn issue_type_id(&self) -> &str {
        &self.issue_type_id
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn actionability(&self) -> IssueActionability {
        self.actionability
    }

    pub fn notification_behavior(&self) -> NotificationBehavior {
        self.notification_behavior
    }

    pub fn custom_notification(&self) -> Option<&Notification> {
        self.custom_notification.as_ref()
    }

    pub fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.id);
        parcel.write_string(&self.title);
        parcel.write_presence(self.subtitle.is_some());
        if let Some(subtitle) = &self.subtitle {
            parcel.write_string(subtitle);
        }
        parcel.write_string(&self.summary);
        parcel.write_i32(self.severity_level);
        parcel.write_string(&self.issue_type_id);
        parcel.write_i32(self.actions.len() as i32);
        for action in &self.actions {
            action.write_to_parcel(parcel);
        }
        parcel.write_i32(self.actionability.to_wire());
        parcel.write_i32(self.notification_behavior.to_wire());
        parcel.write_presence(self.custom_notification.is_some());
        if let Some(notification) = &self.custom_notification {
            notification.write_to_parcel(parcel);
        }
    }

    pub fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let id = reader.read_string()?;
        let title = reader.read_string()?;
        let subtitle = if reader.read_presence()? {
            Some(reader.read_string()?)
        } else {
            None
        };
        let summary = reader.read_string()?;
        let severity_level = reader.read_i32()?;
        let issue_type_id = reader.read_string()?;
        let actions = read_actions(reader)?;
        let actionability = IssueActionability::from_wire(reader.read_i32()?)?;
        let notification_behavior = NotificationBehavior::from_wire(reader.read_i32()?)?;

        let mut builder = SafetySourceIssue::builder(id, title, summary, severity_level, issue_type_id)
            .actionability(actionability)
            .notification_behavior(notification_behavior);
        if let Some(subtitle) = subtitle {
            builder = builder.subtitle(subtitle);
        }
        for action in actions {
            builder = builder.add_action(action);
        }
        if reader.read_presence()? {
            builder = builder.custom_notification(Notification::read_from_parcel(reader)?);
        }
        builder.build()
    }
}

pub struct SafetySourceIssueBuilder {
    id: String,
    title: String,
    subtitle: Option<String>,
    summary: String,
    severity_level: i32,
    issue_type_id: String,
    actions: Vec<Action>,
    actionability: IssueActionability,
    notification_behavior: NotificationBehavior,
    custom_notification: Option<Notification>,
}

impl SafetySourceIssueBuilder {
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn add_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn actionability(mut self, actionability: IssueActionability) -> Self {
        self.actionability = actionability;
        self
    }

    pub fn notification_behavior(mut self, behavior: NotificationBehavior) -> Self {
        self.notification_behavior = behavior;
        self
    }

    pub fn custom_notification(mut self, notification: Notification) -> Self {
        self.custom_notification = Some(notification);
        self
    }

    pub fn build(self) -> Result<SafetySourceIssue, Error> {
        for (field, value) in [
            ("issue id", &self.id),
            ("issue title", &self.title),
            ("issue summary", &self.summary),
            ("issue type id", &self.issue_type_id),
        ] {
            if value.is_empty() {
                return Err(Error::EmptyField(field));
            }
        }
        if !is_valid_severity(self.severity_level) {
            return Err(Error::InvalidSeverity(self.severity_level));
        }
        enforce_unique_action_ids(&self.actions)?;
        if self.actions.is_empty() && self.actionability == IssueActionability::Manual {
            return Err(Error::MissingAction);
        }
        if self.actions.len() > MAX_ACTIONS {
            return Err(Error::TooManyActions(self.actions.len()));
        }
        Ok(SafetySourceIssue {
            id: self.id,
            title: self.title,
            subtitle: self.subtitle,
            summary: self.summary,
            severity_level: self.severity_level,
            issue_type_id: self.issue_type_id,
            actions: self.actions,
            actionability: self.actionability,
            notification_behavior: self.notification_behavior,
            custom_notification: self.custom_notification,
        })
    }
}

/// Overall status line a source reports alongside its issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetySourceStatus {
    title: String,
    summary: String,
    severity_level: i32,
}

impl SafetySourceStatus {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        severity_level: i32,
    ) -> Result<Self, Error> {
        let title = title.into();
        let summary = summary.into();
        if title.is_empty() {
            return Err(Error::EmptyField("status title"));
        }
        if summary.is_empty() {
            return Err(Error::EmptyField("status summary"));
        }
        if !is_valid_severity(severity_level) {
            return Err(Error::InvalidSeverity(severity_level));
        }
        Ok(SafetySourceStatus {
            title,
            summary,
            severity_level,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn severity_level(&self) -> i32 {
        self.severity_level
    }

    fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.title);
        parcel.write_string(&self.summary);
        parcel.write_i32(self.severity_level);
    }

    fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let title = reader.read_string()?;
        let summary = reader.read_string()?;
        let severity_level = reader.read_i32()?;
        SafetySourceStatus::new(title, summary, severity_level)
    }
}

/// Everything one source reports in one submission. The severity of the
/// status must cover every issue that requires attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetySourceData {
    status: Option<SafetySourceStatus>,
    issues: Vec<SafetySourceIssue>,
}

impl SafetySourceData {
    pub fn builder() -> SafetySourceDataBuilder {
        SafetySourceDataBuilder::default()
    }

    pub fn status(&self) -> Option<&SafetySourceStatus> {
        self.status.as_ref()
    }

    pub fn issues(&self) -> &[SafetySourceIssue] {
        &self.issues
    }

    pub fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_presence(self.status.is_some());
        if let Some(status) = &self.status {
            status.write_to_parcel(parcel);
        }
        parcel.write_i32(self.issues.len() as i32);
        for issue in &self.issues {
            issue.write_to_parcel(parcel);
        }
    }

    pub fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let mut builder = SafetySourceData::builder();
        if reader.read_presence()? {
            builder = builder.status(SafetySourceStatus::read_from_parcel(reader)?);
        }
        let count = reader.read_i32()?;
        if count < 0 {
            return Err(Error::Parcel(parcel::ParcelError::Malformed(format!(
                "negative issue count {count}"
            ))));
        }
        for _ in 0..count {
            builder = builder.add_issue(SafetySourceIssue::read_from_parcel(reader)?);
        }
        builder.build()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut parcel = Parcel::new();
        self.write_to_parcel(&mut parcel);
        parcel.into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = ParcelReader::new(bytes);
        let data = SafetySourceData::read_from_parcel(&mut reader)?;
        reader.finish()?;
        Ok(data)
    }
}

#[derive(Default)]
pub struct SafetySourceDataBuilder {
    status: Option<SafetySourceStatus>,
    issues: Vec<SafetySourceIssue>,
}

impl SafetySourceDataBuilder {
    pub fn status(mut self, status: SafetySourceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn add_issue(mut self, issue: SafetySourceIssue) -> Self {
        self.issues.push(issue);
        self
    }

    pub fn build(self) -> Result<SafetySourceData, Error> {
        // An issue above INFORMATION requires user attention; the
        // source-level severity must acknowledge it.
        let max_attention_severity = self
            .issues
            .iter()
            .map(SafetySourceIssue::severity_level)
            .filter(|&level| level > SEVERITY_LEVEL_INFORMATION)
            .max();
        if let Some(issue_severity) = max_attention_severity {
            match &self.status {
                None => return Err(Error::MissingStatus),
                Some(status) if status.severity_level() < issue_severity => {
                    return Err(Error::SeverityBelowIssues {
                        status: status.severity_level(),
                        issue: issue_severity,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(SafetySourceData {
            status: self.status,
            issues: self.issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        SEVERITY_LEVEL_CRITICAL_WARNING, SEVERITY_LEVEL_INFORMATION,
        SEVERITY_LEVEL_RECOMMENDATION, SEVERITY_LEVEL_UNSPECIFIED,
    };

    fn action(id: &str) -> Action {
        Action::new(id, "Fix it").unwrap()
    }

    fn issue(id: &str, severity: i32) -> SafetySourceIssue {
        SafetySourceIssue::builder(id, "Title", "Summary", severity, "type")
            .add_action(action("a1"))
            .build()
            .unwrap()
    }

    #[test]
    fn action_requires_id_and_label() {
        assert_eq!(Action::new("", "label"), Err(Error::EmptyField("action id")));
        assert_eq!(Action::new("id", ""), Err(Error::EmptyField("action label")));

        let resolving = action("a").resolving(Some("done".into()));
        assert!(resolving.is_resolving());
        assert_eq!(resolving.success_message(), Some("done"));
    }

    #[test]
    fn issue_requires_at_least_one_action_when_manual() {
        let result = SafetySourceIssue::builder(
            "i1",
            "Title",
            "Summary",
            SEVERITY_LEVEL_INFORMATION,
            "type",
        )
        .build();
        assert_eq!(result, Err(Error::MissingAction));

        // Non-manual issues may carry no actions.
        assert!(SafetySourceIssue::builder(
            "i1",
            "Title",
            "Summary",
            SEVERITY_LEVEL_INFORMATION,
            "type",
        )
        .actionability(IssueActionability::Tip)
        .build()
        .is_ok());
    }

    #[test]
    fn issue_rejects_more_than_two_actions() {
        let result = SafetySourceIssue::builder(
            "i1",
            "Title",
            "Summary",
            SEVERITY_LEVEL_INFORMATION,
            "type",
        )
        .add_action(action("a1"))
        .add_action(action("a2"))
        .add_action(action("a3"))
        .build();
        assert_eq!(result, Err(Error::TooManyActions(3)));
    }

    #[test]
    fn issue_rejects_duplicate_action_ids() {
        let result = SafetySourceIssue::builder(
            "i1",
            "Title",
            "Summary",
            SEVERITY_LEVEL_INFORMATION,
            "type",
        )
        .add_action(action("a1"))
        .add_action(action("a1"))
        .build();
        assert_eq!(result, Err(Error::DuplicateActionId("a1".to_string())));
    }

    #[test]
    fn issue_rejects_unknown_severity() {
        let result =
            SafetySourceIssue::builder("i1", "Title", "Summary", 250, "type")
                .add_action(action("a1"))
                .build();
        assert_eq!(result, Err(Error::InvalidSeverity(250)));
    }

    #[test]
    fn notification_caps_actions_at_two() {
        assert!(Notification::new("t", "x", vec![action("a"), action("b")]).is_ok());
        assert_eq!(
            Notification::new("t", "x", vec![action("a"), action("b"), action("c")]),
            Err(Error::TooManyNotificationActions(3))
        );
        assert_eq!(
            Notification::new("t", "x", vec![action("a"), action("a")]),
            Err(Error::DuplicateActionId("a".to_string()))
        );
    }

    #[test]
    fn data_requires_status_to_cover_attention_issues() {
        // Critical issue with an information-level status: rejected.
        let status =
            SafetySourceStatus::new("OK", "All good", SEVERITY_LEVEL_INFORMATION).unwrap();
        let result = SafetySourceData::builder()
            .status(status)
            .add_issue(issue("i1", SEVERITY_LEVEL_CRITICAL_WARNING))
            .build();
        assert_eq!(
            result,
            Err(Error::SeverityBelowIssues {
                status: SEVERITY_LEVEL_INFORMATION,
                issue: SEVERITY_LEVEL_CRITICAL_WARNING,
            })
        );

        // Status at or above the issue severity: accepted.
        let status =
            SafetySourceStatus::new("Warning", "Act now", SEVERITY_LEVEL_CRITICAL_WARNING)
                .unwrap();
        assert!(SafetySourceData::builder()
            .status(status)
            .add_issue(issue("i1", SEVERITY_LEVEL_CRITICAL_WARNING))
            .build()
            .is_ok());

        // No status at all with an attention-requiring issue: rejected.
        assert_eq!(
            SafetySourceData::builder()
                .add_issue(issue("i1", SEVERITY_LEVEL_RECOMMENDATION))
                .build(),
            Err(Error::MissingStatus)
        );

        // Information-only issues need no status.
        assert!(SafetySourceData::builder()
            .add_issue(issue("i1", SEVERITY_LEVEL_INFORMATION))
            .build()
            .is_ok());
    }

    #[test]
    fn unspecified_status_cannot_carry_attention_issues() {
        let status = SafetySourceStatus::new("?", "?", SEVERITY_LEVEL_UNSPECIFIED).unwrap();
        assert!(SafetySourceData::builder()
            .status(status)
            .add_issue(issue("i1", SEVERITY_LEVEL_RECOMMENDATION))
            .build()
            .is_err());
    }

    #[test]
    fn data_parcel_round_trip() {
        let status =
            SafetySourceStatus::new("Warning", "Act now", SEVERITY_LEVEL_CRITICAL_WARNING)
                .unwrap();
        let notification = Notification::new(
            "Heads up",
            "Something needs you",
            vec![action("n1").resolving(None)],
        )
        .unwrap();
        let issue = SafetySourceIssue::builder(
            "i1",
            "Title",
            "Summary",
            SEVERITY_LEVEL_CRITICAL_WARNING,
            "type",
        )
        .subtitle("Subtitle")
        .add_action(action("a1"))
        .add_action(action("a2").resolving(Some("fixed".into())))
        .notification_behavior(NotificationBehavior::Immediately)
        .custom_notification(notification)
        .build()
        .unwrap();

        let data = SafetySourceData::builder()
            .status(status)
            .add_issue(issue)
            .build()
            .unwrap();

        let decoded = SafetySourceData::from_bytes(&data.to_bytes()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn decode_reapplies_validation() {
        // Corrupt the severity field of a valid parcel and decoding must
        // fail through the same gate as direct construction.
        let status = SafetySourceStatus::new("OK", "Fine", SEVERITY_LEVEL_INFORMATION).unwrap();
        let data = SafetySourceData::builder().status(status).build().unwrap();
        let mut bytes = data.to_bytes();
        // status severity is the last i32 of the status block
        let len = bytes.len();
        bytes[len - 8..len - 4].copy_from_slice(&999i32.to_le_bytes());
        assert!(matches!(
            SafetySourceData::from_bytes(&bytes),
            Err(Error::InvalidSeverity(999))
        ));
    }
}
