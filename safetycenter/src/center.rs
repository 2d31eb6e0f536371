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

//! Center-side rendering models: the aggregated status banner and the
//! per-source entries shown in the safety UI.

use parcel::{Parcel, ParcelReader};

use crate::{is_valid_severity, Error};

/// Whether a refresh of the underlying sources is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshStatus {
    #[default]
    None,
    DataFetchInFlight,
    FullRescanInFlight,
}

impl RefreshStatus {
    fn to_wire(self) -> i32 {
        match self {
            RefreshStatus::None => 0,
            RefreshStatus::DataFetchInFlight => 10,
            RefreshStatus::FullRescanInFlight => 20,
        }
    }

    fn from_wire(val: i32) -> Result<Self, Error> {
        match val {
            0 => Ok(RefreshStatus::None),
            10 => Ok(RefreshStatus::DataFetchInFlight),
            20 => Ok(RefreshStatus::FullRescanInFlight),
            _ => Err(Error::UnknownWireValue(val)),
        }
    }
}

/// Aggregated safety status across all sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyCenterStatus {
    title: String,
    summary: String,
    overall_severity_level: i32,
    refresh_status: RefreshStatus,
}

impl SafetyCenterStatus {
    pub fn builder(
        title: impl Into<String>,
        summary: impl Into<String>,
    ) -> SafetyCenterStatusBuilder {
        SafetyCenterStatusBuilder {
            title: title.into(),
            summary: summary.into(),
            overall_severity_level: crate::SEVERITY_LEVEL_UNSPECIFIED,
            refresh_status: RefreshStatus::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn overall_severity_level(&self) -> i32 {
        self.overall_severity_level
    }

    pub fn refresh_status(&self) -> RefreshStatus {
        self.refresh_status
    }

    pub fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.title);
        parcel.write_string(&self.summary);
        parcel.write_i32(self.overall_severity_level);
        parcel.write_i32(self.refresh_status.to_wire());
    }

    pub fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let title = reader.read_string()?;
        let summary = reader.read_string()?;
        let severity = reader.read_i32()?;
        let refresh = RefreshStatus::from_wire(reader.read_i32()?)?;
        SafetyCenterStatus::builder(title, summary)
            .overall_severity_level(severity)
            .refresh_status(refresh)
            .build()
    }
}

pub struct SafetyCenterStatusBuilder {
    title: String,
    summary: String,
    overall_severity_level: i32,
    refresh_status: RefreshStatus,
}

impl SafetyCenterStatusBuilder {
    pub fn overall_severity_level(mut self, level: i32) -> Self {
        self.overall_severity_level = level;
        self
    }

    pub fn refresh_status(mut self, refresh_status: RefreshStatus) -> Self {
        self.refresh_status = refresh_status;
        self
    }

    pub fn build(self) -> Result<SafetyCenterStatus, Error> {
        if self.title.is_empty() {
            return Err(Error::EmptyField("status title"));
        }
        if !is_valid_severity(self.overall_severity_level) {
            return Err(Error::InvalidSeverity(self.overall_severity_level));
        }
        Ok(SafetyCenterStatus {
            title: self.title,
            summary: self.summary,
            overall_severity_level: self.overall_severity_level,
            refresh_status: self.refresh_status,
        })
    }
}

/// Icon variant for entries whose severity is unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityUnspecifiedIconType {
    #[default]
    NoIcon,
    Privacy,
    NoRecommendation,
}

impl SeverityUnspecifiedIconType {
    fn to_wire(self) -> i32 {
        match self {
            SeverityUnspecifiedIconType::NoIcon => 0,
            SeverityUnspecifiedIconType::Privacy => 1,
            SeverityUnspecifiedIconType::NoRecommendation => 2,
        }
    }

    fn from_wire(val: i32) -> Result<Self, Error> {
        match val {
            0 => Ok(SeverityUnspecifiedIconType::NoIcon),
            1 => Ok(SeverityUnspecifiedIconType::Privacy),
            2 => Ok(SeverityUnspecifiedIconType::NoRecommendation),
            _ => Err(Error::UnknownWireValue(val)),
        }
    }
}

/// One row in the safety UI, backed by one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyCenterEntry {
    id: String,
    title: String,
    summary: Option<String>,
    severity_level: i32,
    severity_unspecified_icon_type: SeverityUnspecifiedIconType,
    enabled: bool,
}

impl SafetyCenterEntry {
    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> SafetyCenterEntryBuilder {
        SafetyCenterEntryBuilder {
            id: id.into(),
            title: title.into(),
            summary: None,
            severity_level: crate::SEVERITY_LEVEL_UNSPECIFIED,
            severity_unspecified_icon_type: SeverityUnspecifiedIconType::default(),
            enabled: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn severity_level(&self) -> i32 {
        self.severity_level
    }

    pub fn severity_unspecified_icon_type(&self) -> SeverityUnspecifiedIconType {
        self.severity_unspecified_icon_type
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn write_to_parcel(&self, parcel: &mut Parcel) {
        parcel.write_string(&self.id);
        parcel.write_string(&self.title);
        parcel.write_presence(self.summary.is_some());
        if let Some(summary) = &self.summary {
            parcel.write_string(summary);
        }
        parcel.write_i32(self.severity_level);
        parcel.write_i32(self.severity_unspecified_icon_type.to_wire());
        parcel.write_i32(self.enabled as i32);
    }

    pub fn read_from_parcel(reader: &mut ParcelReader<'_>) -> Result<Self, Error> {
        let id = reader.read_string()?;
        let title = reader.read_string()?;
        let summary = if reader.read_presence()? {
            Some(reader.read_string()?)
        } else {
            None
        };
        let severity = reader.read_i32()?;
        let icon = SeverityUnspecifiedIconType::from_wire(reader.read_i32()?)?;
        let enabled = reader.read_presence()?;

        let mut builder = SafetyCenterEntry::builder(id, title)
            .severity_level(severity)
            .severity_unspecified_icon_type(icon)
            .enabled(enabled);
        if let Some(summary) = summary {
            builder = builder.summary(summary);
        }
        builder.build()
    }
}

pub struct SafetyCenterEntryBuilder {
    id: String,
    title: String,
    summary: Option<String>,
    severity_level: i32,
    severity_unspecified_icon_type: SeverityUnspecifiedIconType,
    enabled: bool,
}

impl SafetyCenterEntryBuilder {
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn severity_level(mut self, level: i32) -> Self {
        self.severity_level = level;
        self
    }

    pub fn severity_unspecified_icon_type(mut self, icon: SeverityUnspecifiedIconType) -> Self {
        self.severity_unspecified_icon_type = icon;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn build(self) -> Result<SafetyCenterEntry, Error> {
        if self.id.is_empty() {
            return Err(Error::EmptyField("entry id"));
        }
        if self.title.is_empty() {
            return Err(Error::EmptyField("entry title"));
        }
        if !is_valid_severity(self.severity_level) {
            return Err(Error::InvalidSeverity(self.severity_level));
        }
        Ok(SafetyCenterEntry {
            id: self.id,
            title: self.title,
            summary: self.summary,
            severity_level: self.severity_level,
            severity_unspecified_icon_type: self.severity_unspecified_icon_type,
            enabled: self.enabled,
        })
    }
}
