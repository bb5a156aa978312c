//! The fixed PM inspection checklist and stage results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Choice answer meaning the checkpoint passed
pub const CHOICE_CHECK_MARK: &str = "Check mark";
/// Choice answer meaning a fault was observed
pub const CHOICE_ERROR: &str = "Error";

const CHECK_OPTIONS: &[&str] = &[CHOICE_CHECK_MARK, CHOICE_ERROR];

/// How a stage is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// One of a closed set of options
    Choice { options: &'static [&'static str] },
    /// Free text
    Text,
}

/// One checkpoint of the inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDef {
    pub name: &'static str,
    pub kind: StageKind,
}

/// The fixed ordered inspection checklist. Every PM record carries exactly
/// one answer per stage listed here.
pub const PM_STAGES: &[StageDef] = &[
    StageDef { name: "Sound", kind: StageKind::Choice { options: CHECK_OPTIONS } },
    StageDef { name: "Vibration", kind: StageKind::Choice { options: CHECK_OPTIONS } },
    StageDef { name: "Heat", kind: StageKind::Choice { options: CHECK_OPTIONS } },
    StageDef { name: "Motor umbrella", kind: StageKind::Choice { options: CHECK_OPTIONS } },
    StageDef { name: "Status", kind: StageKind::Choice { options: CHECK_OPTIONS } },
    StageDef { name: "Note", kind: StageKind::Text },
];

/// Look up a stage definition by name
pub fn stage_def(name: &str) -> Option<&'static StageDef> {
    PM_STAGES.iter().find(|s| s.name == name)
}

/// Why a set of stage results was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageValidationError {
    #[error("Missing answer for stage '{stage}'")]
    MissingStage { stage: String },

    #[error("Answer for unknown stage '{stage}'")]
    UnknownStage { stage: String },

    #[error("'{value}' is not a valid answer for stage '{stage}'")]
    InvalidChoice { stage: String, value: String },
}

/// Answers for one inspection, keyed by stage name.
///
/// Serializes as the `pm_data` object of the persisted record layout.
/// Display order always follows [`PM_STAGES`], not map order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageResults(BTreeMap<String, String>);

impl StageResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stage: impl Into<String>, value: impl Into<String>) {
        self.0.insert(stage.into(), value.into());
    }

    pub fn get(&self, stage: &str) -> Option<&str> {
        self.0.get(stage).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Answers in checklist order, pairing each stage with its value.
    /// Only complete after a successful [`StageResults::validate`].
    pub fn ordered(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> {
        PM_STAGES.iter().map(|def| (def.name, self.get(def.name)))
    }

    /// Check the record invariant: exactly one answer per defined stage,
    /// and choice-typed answers within that stage's allowed options.
    pub fn validate(&self) -> Result<(), StageValidationError> {
        for def in PM_STAGES {
            let value = self.get(def.name).ok_or_else(|| {
                StageValidationError::MissingStage { stage: def.name.to_string() }
            })?;

            if let StageKind::Choice { options } = def.kind {
                if !options.contains(&value) {
                    return Err(StageValidationError::InvalidChoice {
                        stage: def.name.to_string(),
                        value: value.to_string(),
                    });
                }
            }
        }

        // No stray entries beyond the checklist
        for stage in self.0.keys() {
            if stage_def(stage).is_none() {
                return Err(StageValidationError::UnknownStage { stage: stage.clone() });
            }
        }

        Ok(())
    }
}

impl FromIterator<(String, String)> for StageResults {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_results() -> StageResults {
        let mut results = StageResults::new();
        for def in PM_STAGES {
            match def.kind {
                StageKind::Choice { .. } => results.insert(def.name, CHOICE_CHECK_MARK),
                StageKind::Text => results.insert(def.name, "bearing greased"),
            }
        }
        results
    }

    #[test]
    fn complete_results_validate() {
        assert!(complete_results().validate().is_ok());
    }

    #[test]
    fn missing_stage_rejected() {
        let results: StageResults = complete_results()
            .ordered()
            .filter(|(name, _)| *name != "Heat")
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.to_string())))
            .collect();

        assert_eq!(
            results.validate(),
            Err(StageValidationError::MissingStage { stage: "Heat".into() })
        );
    }

    #[test]
    fn invalid_choice_rejected() {
        let mut results = complete_results();
        results.insert("Vibration", "Fine I guess");

        assert_eq!(
            results.validate(),
            Err(StageValidationError::InvalidChoice {
                stage: "Vibration".into(),
                value: "Fine I guess".into()
            })
        );
    }

    #[test]
    fn unknown_stage_rejected() {
        let mut results = complete_results();
        results.insert("Paint", CHOICE_CHECK_MARK);

        assert_eq!(
            results.validate(),
            Err(StageValidationError::UnknownStage { stage: "Paint".into() })
        );
    }

    #[test]
    fn note_accepts_free_text() {
        let mut results = complete_results();
        results.insert("Note", "");
        assert!(results.validate().is_ok());
    }

    #[test]
    fn ordered_follows_checklist() {
        let results = complete_results();
        let names: Vec<_> = results.ordered().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["Sound", "Vibration", "Heat", "Motor umbrella", "Status", "Note"]
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let results = complete_results();
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["Sound"], CHOICE_CHECK_MARK);
        assert_eq!(json["Note"], "bearing greased");
    }
}
