//! Deterministic answers rendered from a [`Profile`].
//!
//! Every renderer is a plain `fn(&Profile) -> String`: it never fails and
//! never mutates the profile. Blank strings are treated the same as missing
//! fields.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use log::warn;

use crate::profile::{EducationEntry, ExperienceEntry, Profile};
use crate::Intent;

/// A pure rendering function
pub type Renderer = fn(&Profile) -> String;

/// Highlights shown per professional-experience entry
pub const MAX_HIGHLIGHTS: usize = 4;

const PLACEHOLDER: &str = "—";

pub const GREETING: &str = "Hi! Ask about my education, tools, work, tutoring, or personal life.";
pub const HELP: &str = "You can ask about my full name, where I'm from/born, where I live, \
my education, tutoring career, professional experience, tools/skills, childhood, or personal life.";
pub const THANKS: &str = "You're welcome!";

pub const NO_EDUCATION: &str = "Education: (add items in PROFILE['education']).";
pub const NO_EXPERIENCE: &str =
    "Professional experience: (add items in PROFILE['professional_experience']).";
pub const NO_SKILLS: &str = "Skills: (add lists in PROFILE['tools_and_skills']).";
pub const NO_TUTORING: &str = "I teach coding/AI courses.";
pub const NO_CHILDHOOD: &str = "I grew up loving technology and problem-solving.";
pub const NO_PERSONAL_LIFE: &str = "I enjoy family time, travel, and teaching.";

/// Returns the renderer for an intent. The match is exhaustive, so adding an
/// intent without a renderer does not compile.
pub fn renderer_for(intent: Intent) -> Renderer {
    match intent {
        Intent::Greeting => render_greeting,
        Intent::Help => render_help,
        Intent::Thanks => render_thanks,
        Intent::FullName => render_full_name,
        Intent::Origin => render_origin,
        Intent::CurrentLocation => render_location,
        Intent::Education => render_education,
        Intent::TutoringCareer => render_tutoring,
        Intent::ProfessionalCareer => render_professional,
        Intent::ToolsAndSkills => render_tools,
        Intent::Childhood => render_childhood,
        Intent::PersonalLife => render_personal,
    }
}

pub fn render(intent: Intent, profile: &Profile) -> String {
    renderer_for(intent)(profile)
}

/// Maps classifier labels to renderer keys.
///
/// Labels and renderers are one-to-one by default, but the index is kept
/// separate so a persisted bundle can route several labels to one renderer.
/// A label missing from the index renders the help text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererRegistry {
    answers_index: BTreeMap<String, Intent>,
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererRegistry {
    /// Identity mapping: every intent label renders with its own renderer
    pub fn new() -> Self {
        Self {
            answers_index: Intent::ALL
                .iter()
                .map(|intent| (intent.as_str().to_string(), *intent))
                .collect(),
        }
    }

    pub fn from_index(answers_index: BTreeMap<String, Intent>) -> Self {
        Self { answers_index }
    }

    pub fn answers_index(&self) -> &BTreeMap<String, Intent> {
        &self.answers_index
    }

    /// Renderer key for a label, falling back to help for unmapped labels
    pub fn resolve(&self, label: &str) -> Intent {
        match self.answers_index.get(label) {
            Some(intent) => *intent,
            None => {
                warn!("No renderer registered for label '{}', answering with help", label);
                Intent::Help
            }
        }
    }

    pub fn render_label(&self, label: &str, profile: &Profile) -> String {
        render(self.resolve(label), profile)
    }

    /// Intents from `classes` whose label is absent from the index
    pub fn unmapped(&self, classes: &[Intent]) -> Vec<Intent> {
        classes
            .iter()
            .copied()
            .filter(|intent| !self.answers_index.contains_key(intent.as_str()))
            .collect()
    }
}

/// Trimmed, non-blank contents of an optional string
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn non_blank(values: &[String]) -> Vec<&str> {
    values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()).collect()
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn render_greeting(_: &Profile) -> String {
    GREETING.to_string()
}

fn render_help(_: &Profile) -> String {
    HELP.to_string()
}

fn render_thanks(_: &Profile) -> String {
    THANKS.to_string()
}

fn render_full_name(p: &Profile) -> String {
    format!("My full name is {}.", present(&p.full_name).unwrap_or(PLACEHOLDER))
}

fn render_origin(p: &Profile) -> String {
    if let Some(birthplace) = present(&p.birthplace) {
        return format!("I was born in {}.", birthplace);
    }
    format!("I'm originally from {}.", present(&p.origin).unwrap_or(PLACEHOLDER))
}

fn render_location(p: &Profile) -> String {
    format!("I currently live in {}.", present(&p.current_location).unwrap_or(PLACEHOLDER))
}

fn education_line(entry: &EducationEntry) -> String {
    let institution = present(&entry.institution).unwrap_or("Institution");
    let parts: Vec<&str> = [&entry.degree, &entry.field, &entry.years]
        .into_iter()
        .filter_map(present)
        .collect();

    let mut line = format!("- {}", institution);
    if !parts.is_empty() {
        line.push_str(" — ");
        line.push_str(&parts.join(" • "));
    }
    if let Some(notes) = present(&entry.notes) {
        line.push_str(" • ");
        line.push_str(notes);
    }
    line
}

fn render_education(p: &Profile) -> String {
    if p.education.is_empty() {
        return NO_EDUCATION.to_string();
    }
    let lines: Vec<String> = p.education.iter().map(education_line).collect();
    format!("Education:\n{}", lines.join("\n"))
}

fn render_tutoring(p: &Profile) -> String {
    let Some(tutoring) = &p.tutoring_career else {
        return NO_TUTORING.to_string();
    };

    let mut parts = Vec::new();
    if let Some(summary) = present(&tutoring.summary) {
        parts.push(summary.to_string());
    }
    if let Some(since) = present(&tutoring.since) {
        parts.push(format!("Teaching since {}.", since));
    }
    let topics = non_blank(&tutoring.topics);
    if !topics.is_empty() {
        parts.push(format!("Topics: {}.", topics.join(", ")));
    }
    let platforms = non_blank(&tutoring.platforms);
    if !platforms.is_empty() {
        parts.push(format!("Platforms: {}.", platforms.join(", ")));
    }

    if parts.is_empty() {
        NO_TUTORING.to_string()
    } else {
        parts.join(" ")
    }
}

fn experience_lines(job: &ExperienceEntry, out: &mut Vec<String>) {
    let title = present(&job.title).unwrap_or("Role");
    let company = present(&job.company).unwrap_or("Company");
    match present(&job.years) {
        Some(years) => out.push(format!("- {} @ {} ({})", title, company, years)),
        None => out.push(format!("- {} @ {}", title, company)),
    }
    for highlight in non_blank(&job.highlights).into_iter().take(MAX_HIGHLIGHTS) {
        out.push(format!("   • {}", highlight));
    }
}

fn render_professional(p: &Profile) -> String {
    if p.professional_experience.is_empty() {
        return NO_EXPERIENCE.to_string();
    }
    let mut out = vec!["Professional Experience:".to_string()];
    for job in &p.professional_experience {
        experience_lines(job, &mut out);
    }
    out.join("\n")
}

fn render_tools(p: &Profile) -> String {
    let Some(skills) = &p.tools_and_skills else {
        return NO_SKILLS.to_string();
    };
    let buckets: Vec<String> = skills
        .categories()
        .iter()
        .filter_map(|(key, values)| {
            let values = non_blank(values);
            (!values.is_empty()).then(|| format!("{}: {}", title_case(key), values.join(", ")))
        })
        .collect();

    if buckets.is_empty() {
        NO_SKILLS.to_string()
    } else {
        buckets.join(" | ")
    }
}

fn render_childhood(p: &Profile) -> String {
    present(&p.childhood).unwrap_or(NO_CHILDHOOD).to_string()
}

fn render_personal(p: &Profile) -> String {
    let Some(personal) = &p.personal_life else {
        return NO_PERSONAL_LIFE.to_string();
    };

    let mut parts = Vec::new();
    if let Some(family) = present(&personal.family) {
        parts.push(family.to_string());
    }
    let hobbies = non_blank(&personal.hobbies);
    if !hobbies.is_empty() {
        parts.push(format!("Hobbies: {}.", hobbies.join(", ")));
    }
    let fun_facts = non_blank(&personal.fun_facts);
    if !fun_facts.is_empty() {
        parts.push(format!("Fun facts: {}.", fun_facts.join("; ")));
    }

    if parts.is_empty() {
        NO_PERSONAL_LIFE.to_string()
    } else {
        parts.join(" ")
    }
}
