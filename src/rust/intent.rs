use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierError;

/// The closed set of intents the router can emit.
///
/// Declaration order is the class ordering used to break exact score ties
/// in the classifier: when two intents score the same, the one declared
/// first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Help,
    Thanks,
    FullName,
    Origin,
    CurrentLocation,
    Education,
    TutoringCareer,
    ProfessionalCareer,
    ToolsAndSkills,
    Childhood,
    PersonalLife,
}

impl Intent {
    /// Every intent, in class order
    pub const ALL: [Intent; 12] = [
        Intent::Greeting,
        Intent::Help,
        Intent::Thanks,
        Intent::FullName,
        Intent::Origin,
        Intent::CurrentLocation,
        Intent::Education,
        Intent::TutoringCareer,
        Intent::ProfessionalCareer,
        Intent::ToolsAndSkills,
        Intent::Childhood,
        Intent::PersonalLife,
    ];

    /// The snake_case label used in training data and persisted artifacts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Help => "help",
            Self::Thanks => "thanks",
            Self::FullName => "full_name",
            Self::Origin => "origin",
            Self::CurrentLocation => "current_location",
            Self::Education => "education",
            Self::TutoringCareer => "tutoring_career",
            Self::ProfessionalCareer => "professional_career",
            Self::ToolsAndSkills => "tools_and_skills",
            Self::Childhood => "childhood",
            Self::PersonalLife => "personal_life",
        }
    }

    /// Position of this intent in the fixed class ordering
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| ClassifierError::ValidationError(format!("Unknown intent label '{}'", s)))
    }
}
