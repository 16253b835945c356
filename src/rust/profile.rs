//! The structured record the router answers questions about.
//!
//! Every field is optional so a partially filled profile still loads;
//! renderers decide what to say when something is missing.

use std::path::Path;
use serde::{Deserialize, Deserializer, Serialize};

const BUILTIN_PROFILE: &str = include_str!("../../data/profile.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub full_name: Option<String>,
    pub birth_year: Option<u32>,
    pub birthplace: Option<String>,
    pub origin: Option<String>,
    pub current_location: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub cities_lived: Vec<String>,
    /// Stored order is render order (newest first by convention)
    #[serde(deserialize_with = "null_as_empty")]
    pub education: Vec<EducationEntry>,
    pub tutoring_career: Option<TutoringCareer>,
    /// Stored order is render order (newest first by convention)
    #[serde(deserialize_with = "null_as_empty")]
    pub professional_experience: Vec<ExperienceEntry>,
    pub tools_and_skills: Option<SkillSet>,
    pub childhood: Option<String>,
    pub personal_life: Option<PersonalLife>,
    #[serde(deserialize_with = "null_as_empty")]
    pub travel_countries: Vec<String>,
    pub stats: Option<ProfileStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub years: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutoringCareer {
    pub summary: Option<String>,
    pub since: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub topics: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub years: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub highlights: Vec<String>,
}

/// Skill lists by category. Categories render in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSet {
    #[serde(deserialize_with = "null_as_empty")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub testing: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub devops: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub cloud: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub data_ai: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub other: Vec<String>,
}

impl SkillSet {
    /// (category key, skills) pairs in render order
    pub fn categories(&self) -> [(&'static str, &[String]); 6] {
        [
            ("languages", self.languages.as_slice()),
            ("testing", self.testing.as_slice()),
            ("devops", self.devops.as_slice()),
            ("cloud", self.cloud.as_slice()),
            ("data_ai", self.data_ai.as_slice()),
            ("other", self.other.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalLife {
    pub family: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub hobbies: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub fun_facts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileStats {
    pub countries_visited: Option<u32>,
    pub years_of_life: Option<u32>,
    pub years_in_tech_approx: Option<String>,
    pub countries_lived_in: Option<u32>,
}

/// Reads `null` as an empty list, the same as a missing field.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Profile {
    /// The profile shipped with the crate
    pub fn builtin() -> serde_json::Result<Self> {
        Self::from_json(BUILTIN_PROFILE)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, NO_EDUCATION, NO_PERSONAL_LIFE};
    use crate::Intent;

    #[test]
    fn test_builtin_profile_loads() {
        let profile = Profile::builtin().unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Faruk Hasan"));
        assert_eq!(profile.birth_year, Some(1988));
        assert_eq!(profile.education.len(), 8);
        assert_eq!(profile.professional_experience.len(), 3);
        assert_eq!(
            profile.tools_and_skills.as_ref().map(|s| s.cloud.clone()),
            Some(vec!["AWS".to_string()])
        );
        assert_eq!(profile.stats.as_ref().and_then(|s| s.countries_visited), Some(14));
    }

    #[test]
    fn test_missing_fields_default() {
        let profile = Profile::from_json(r#"{"full_name": "Ada", "education": [{}]}"#).unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Ada"));
        assert!(profile.birthplace.is_none());
        assert_eq!(profile.education, vec![EducationEntry::default()]);
        assert!(profile.professional_experience.is_empty());
        assert!(profile.personal_life.is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let profile = Profile::from_json(r#"{"nickname": "A", "origin": "Wales"}"#).unwrap();
        assert_eq!(profile.origin.as_deref(), Some("Wales"));
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let profile = Profile::from_json(
            r#"{"education": null, "cities_lived": null,
                "professional_experience": [{"title": "Engineer", "highlights": null}],
                "personal_life": {"hobbies": null, "fun_facts": null}}"#,
        )
        .unwrap();
        assert!(profile.education.is_empty());
        assert!(profile.cities_lived.is_empty());
        assert!(profile.professional_experience[0].highlights.is_empty());
        assert_eq!(render(Intent::Education, &profile), NO_EDUCATION);
        assert_eq!(render(Intent::PersonalLife, &profile), NO_PERSONAL_LIFE);
        assert_eq!(
            render(Intent::ProfessionalCareer, &profile),
            "Professional Experience:\n- Engineer @ Company"
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let profile = Profile::builtin().unwrap();
        std::fs::write(&path, serde_json::to_string_pretty(&profile).unwrap()).unwrap();
        assert_eq!(Profile::from_file(&path).unwrap(), profile);

        std::fs::write(&path, r#"{"education": "none"}"#).unwrap();
        let err = Profile::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
        assert!(Profile::from_file(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(Profile::from_json(r#"{"education": "none"}"#).is_err());
    }
}
