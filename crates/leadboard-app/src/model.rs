// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

pub const STATUS_WORKING_CONTACTED: &str = "Working - Contacted";
pub const STATUS_CLOSED_NOT_CONVERTED: &str = "Closed - Not Converted";
pub const STATUS_OPEN_NOT_CONTACTED: &str = "Open - Not Contacted";

/// Nested owner reference as the backend returns it. Either part may be
/// missing on records the caller cannot fully see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OwnerRef {
    #[serde(default)]
    pub id: Option<OwnerId>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A lead exactly as the record source hands it over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LeadRecord {
    pub id: LeadId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub owner: Option<OwnerRef>,
    #[serde(default)]
    pub lead_source: Option<String>,
}

impl LeadRecord {
    pub fn owner_name(&self) -> &str {
        self.owner
            .as_ref()
            .and_then(|owner| owner.name.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusClass {
    Success,
    Error,
    Weak,
    None,
}

impl StatusClass {
    /// Exact, case-sensitive match on the raw status value.
    pub fn for_status(status: &str) -> Self {
        match status {
            STATUS_WORKING_CONTACTED => Self::Success,
            STATUS_CLOSED_NOT_CONVERTED => Self::Error,
            STATUS_OPEN_NOT_CONTACTED => Self::Weak,
            _ => Self::None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Weak => "weak",
            Self::None => "",
        }
    }
}

/// Read-only projection of a lead with the presentation fields filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLead {
    pub id: LeadId,
    pub name: String,
    pub company: String,
    pub status: String,
    pub owner_name: String,
    pub lead_source: String,
    pub status_class: StatusClass,
}

impl ViewLead {
    pub fn from_record(record: &LeadRecord) -> Self {
        let status = record.status.clone().unwrap_or_default();
        Self {
            id: record.id.clone(),
            name: record.name.clone().unwrap_or_default(),
            company: record.company.clone().unwrap_or_default(),
            status_class: StatusClass::for_status(&status),
            status,
            owner_name: record.owner_name().to_owned(),
            lead_source: record.lead_source.clone().unwrap_or_default(),
        }
    }

    pub fn field(&self, field: LeadField) -> &str {
        match field {
            LeadField::Name => &self.name,
            LeadField::Company => &self.company,
            LeadField::Status => &self.status,
            LeadField::Owner => &self.owner_name,
            LeadField::LeadSource => &self.lead_source,
        }
    }

    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        LeadField::ALL.iter().any(|field| {
            let value = self.field(*field);
            !value.is_empty() && value.to_lowercase().contains(needle)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    Name,
    Company,
    Status,
    Owner,
    LeadSource,
}

impl LeadField {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Company,
        Self::Status,
        Self::Owner,
        Self::LeadSource,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Company => "Company",
            Self::Status => "Status",
            Self::Owner => "Owner",
            Self::LeadSource => "Lead Source",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickOption {
    pub value: String,
    pub label: String,
}

impl PickOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionLists {
    pub statuses: Vec<PickOption>,
    pub owners: Vec<PickOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Success)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Warning)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(title, message, Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::{LeadRecord, OwnerRef, Severity, StatusClass, ViewLead};
    use crate::LeadId;
    use anyhow::Result;

    #[test]
    fn status_class_mapping_is_exact() {
        assert_eq!(
            StatusClass::for_status("Working - Contacted"),
            StatusClass::Success
        );
        assert_eq!(
            StatusClass::for_status("Closed - Not Converted"),
            StatusClass::Error
        );
        assert_eq!(
            StatusClass::for_status("Open - Not Contacted"),
            StatusClass::Weak
        );
        assert_eq!(StatusClass::for_status("Unknown"), StatusClass::None);
        assert_eq!(
            StatusClass::for_status("working - contacted"),
            StatusClass::None
        );
        assert_eq!(StatusClass::for_status(""), StatusClass::None);
    }

    #[test]
    fn class_and_severity_tags() {
        let tags: Vec<&str> = [
            "Working - Contacted",
            "Closed - Not Converted",
            "Open - Not Contacted",
            "Closed - Converted",
        ]
        .into_iter()
        .map(|status| StatusClass::for_status(status).as_str())
        .collect();
        assert_eq!(tags, vec!["success", "error", "weak", ""]);

        assert_eq!(Severity::Success.as_str(), "success");
        assert_eq!(Severity::Warning.as_str(), "warning");
        assert_eq!(Severity::Error.as_str(), "error");
    }

    #[test]
    fn view_lead_flattens_missing_owner_to_empty() {
        let record = LeadRecord {
            id: LeadId::from("00Q1"),
            name: Some("Ada Byron".to_owned()),
            company: None,
            status: None,
            owner: None,
            lead_source: None,
        };
        let view = ViewLead::from_record(&record);
        assert_eq!(view.owner_name, "");
        assert_eq!(view.company, "");
        assert_eq!(view.status_class, StatusClass::None);

        let nameless_owner = LeadRecord {
            owner: Some(OwnerRef::default()),
            ..record
        };
        assert_eq!(ViewLead::from_record(&nameless_owner).owner_name, "");
    }

    #[test]
    fn empty_fields_never_match() {
        let view = ViewLead::from_record(&LeadRecord {
            id: LeadId::from("00Q1"),
            name: Some("Grace".to_owned()),
            ..LeadRecord::default()
        });
        assert!(view.matches("gra"));
        assert!(!view.matches("acme"));
    }

    #[test]
    fn lead_record_decodes_backend_shape() -> Result<()> {
        let raw = r#"[
            {"Id":"00Q1","Name":"Ada","Company":"Acme","Status":"Open - Not Contacted",
             "Owner":{"Id":"005A","Name":"Sam Ortiz"},"LeadSource":"Web"},
            {"Id":"00Q2","Name":"Bob"}
        ]"#;
        let records: Vec<LeadRecord> = serde_json::from_str(raw)?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].owner_name(), "Sam Ortiz");
        assert_eq!(records[1].owner_name(), "");
        assert_eq!(records[1].status, None);
        Ok(())
    }
}
