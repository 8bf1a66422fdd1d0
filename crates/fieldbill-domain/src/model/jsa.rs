//! Job Safety Analysis form
//!
//! A four-step form: job details, hazard breakdown, crew sign-off and a
//! final review. The crew list is dynamic and every member signs with a
//! captured PNG signature.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use fieldbill_types::{Error, Result};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JsaStep {
    #[default]
    JobInfo,
    Hazards,
    Personnel,
    Review,
}

impl JsaStep {
    pub const ALL: [JsaStep; 4] = [
        JsaStep::JobInfo,
        JsaStep::Hazards,
        JsaStep::Personnel,
        JsaStep::Review,
    ];

    pub fn next(self) -> Option<JsaStep> {
        match self {
            JsaStep::JobInfo => Some(JsaStep::Hazards),
            JsaStep::Hazards => Some(JsaStep::Personnel),
            JsaStep::Personnel => Some(JsaStep::Review),
            JsaStep::Review => None,
        }
    }

    pub fn prev(self) -> Option<JsaStep> {
        match self {
            JsaStep::JobInfo => None,
            JsaStep::Hazards => Some(JsaStep::JobInfo),
            JsaStep::Personnel => Some(JsaStep::Hazards),
            JsaStep::Review => Some(JsaStep::Personnel),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            JsaStep::JobInfo => "Job Info",
            JsaStep::Hazards => "Hazards",
            JsaStep::Personnel => "Personnel",
            JsaStep::Review => "Review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardField {
    Step,
    Hazard,
    Control,
}

/// One job step with its hazard and the control applied to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardEntry {
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub hazard: String,
    #[serde(default)]
    pub control: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub data_url: String,
    pub signed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personnel {
    pub id: PersonId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub signature: Option<Signature>,
}

impl Personnel {
    fn new(id: PersonId) -> Self {
        Self {
            id,
            name: String::new(),
            signature: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub step: JsaStep,
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(step: JsaStep, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.step.title(), self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsaForm {
    #[serde(default)]
    pub job: JobInfo,
    #[serde(default)]
    hazards: Vec<HazardEntry>,
    #[serde(default)]
    personnel: Vec<Personnel>,
    #[serde(default)]
    step: JsaStep,
    #[serde(default)]
    next_person_id: u64,
}

impl Default for JsaForm {
    fn default() -> Self {
        Self::new()
    }
}

impl JsaForm {
    /// A blank form with one hazard entry and one crew member slot
    pub fn new() -> Self {
        let mut form = Self {
            job: JobInfo::default(),
            hazards: vec![HazardEntry::default()],
            personnel: Vec::new(),
            step: JsaStep::JobInfo,
            next_person_id: 1,
        };
        form.add_personnel();
        form
    }

    pub fn step(&self) -> JsaStep {
        self.step
    }

    pub fn hazards(&self) -> &[HazardEntry] {
        &self.hazards
    }

    pub fn personnel(&self) -> &[Personnel] {
        &self.personnel
    }

    pub fn person(&self, id: PersonId) -> Option<&Personnel> {
        self.personnel.iter().find(|p| p.id == id)
    }

    fn person_mut(&mut self, id: PersonId) -> Option<&mut Personnel> {
        self.personnel.iter_mut().find(|p| p.id == id)
    }

    // Forms loaded from disk may carry ids beyond the stored counter.
    fn allocate_person_id(&mut self) -> PersonId {
        let max_existing = self.personnel.iter().map(|p| p.id.0).max().unwrap_or(0);
        let id = self.next_person_id.max(max_existing + 1);
        self.next_person_id = id + 1;
        PersonId(id)
    }

    pub fn add_personnel(&mut self) -> PersonId {
        let id = self.allocate_person_id();
        self.personnel.push(Personnel::new(id));
        id
    }

    /// Remove a crew member; the last remaining slot is never removed
    pub fn remove_personnel(&mut self, id: PersonId) -> bool {
        if self.personnel.len() <= 1 {
            return false;
        }
        let before = self.personnel.len();
        self.personnel.retain(|p| p.id != id);
        before != self.personnel.len()
    }

    pub fn set_personnel_name(&mut self, id: PersonId, name: impl Into<String>) -> bool {
        match self.person_mut(id) {
            Some(person) => {
                person.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Attach a captured signature (`data:image/png;base64,...`)
    pub fn attach_signature(&mut self, id: PersonId, data_url: &str) -> Result<()> {
        validate_signature(data_url)?;
        let person = self
            .person_mut(id)
            .ok_or_else(|| Error::NotFound(format!("crew member {}", id.0)))?;
        person.signature = Some(Signature {
            data_url: data_url.to_string(),
            signed_at: Utc::now(),
        });
        debug!(person = id.0, "signature attached");
        Ok(())
    }

    pub fn clear_signature(&mut self, id: PersonId) -> bool {
        match self.person_mut(id) {
            Some(person) => person.signature.take().is_some(),
            None => false,
        }
    }

    pub fn add_hazard(&mut self) -> usize {
        self.hazards.push(HazardEntry::default());
        self.hazards.len() - 1
    }

    /// Remove a hazard entry; the last remaining entry is never removed
    pub fn remove_hazard(&mut self, index: usize) -> bool {
        if self.hazards.len() <= 1 || index >= self.hazards.len() {
            return false;
        }
        self.hazards.remove(index);
        true
    }

    pub fn update_hazard(&mut self, index: usize, field: HazardField, value: impl Into<String>) -> bool {
        let Some(entry) = self.hazards.get_mut(index) else {
            return false;
        };
        let value = value.into();
        match field {
            HazardField::Step => entry.step = value,
            HazardField::Hazard => entry.hazard = value,
            HazardField::Control => entry.control = value,
        }
        true
    }

    pub fn validate_step(&self, step: JsaStep) -> Vec<ValidationIssue> {
        match step {
            JsaStep::JobInfo => self.validate_job_info(),
            JsaStep::Hazards => self.validate_hazards(),
            JsaStep::Personnel => self.validate_personnel(),
            JsaStep::Review => {
                let mut issues = self.validate_job_info();
                issues.extend(self.validate_hazards());
                issues.extend(self.validate_personnel());
                issues
            }
        }
    }

    fn validate_job_info(&self) -> Vec<ValidationIssue> {
        let step = JsaStep::JobInfo;
        let mut issues = Vec::new();
        if self.job.company.trim().is_empty() {
            issues.push(ValidationIssue::new(step, "company", "company is required"));
        }
        if self.job.location.trim().is_empty() {
            issues.push(ValidationIssue::new(step, "location", "location is required"));
        }
        if self.job.job_description.trim().is_empty() {
            issues.push(ValidationIssue::new(
                step,
                "jobDescription",
                "job description is required",
            ));
        }
        issues
    }

    fn validate_hazards(&self) -> Vec<ValidationIssue> {
        let complete = self
            .hazards
            .iter()
            .any(|h| !h.hazard.trim().is_empty() && !h.control.trim().is_empty());
        if complete {
            Vec::new()
        } else {
            vec![ValidationIssue::new(
                JsaStep::Hazards,
                "hazards",
                "at least one hazard with a control is required",
            )]
        }
    }

    fn validate_personnel(&self) -> Vec<ValidationIssue> {
        let step = JsaStep::Personnel;
        let mut issues = Vec::new();
        if self.personnel.is_empty() {
            issues.push(ValidationIssue::new(
                step,
                "personnel",
                "at least one crew member is required",
            ));
        }
        for (index, person) in self.personnel.iter().enumerate() {
            if person.name.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    step,
                    format!("personnel[{}].name", index),
                    "name is required",
                ));
            }
            if person.signature.is_none() {
                issues.push(ValidationIssue::new(
                    step,
                    format!("personnel[{}].signature", index),
                    "signature is required",
                ));
            }
        }
        issues
    }

    /// Move to the next step if the current one validates
    pub fn advance(&mut self) -> Result<JsaStep> {
        let issues = self.validate_step(self.step);
        if !issues.is_empty() {
            let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
            return Err(Error::Validation(messages.join("; ")));
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> JsaStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }
}

fn validate_signature(data_url: &str) -> Result<()> {
    let payload = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| Error::InvalidSignature("expected a PNG data URL".to_string()))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::InvalidSignature(e.to_string()))?;
    if !bytes.starts_with(&PNG_MAGIC) {
        return Err(Error::InvalidSignature("payload is not a PNG image".to_string()));
    }
    Ok(())
}
