//! The hand-authored training phrases shipped with the crate.
//!
//! `help` carries the most examples, so input with no known words (the
//! empty string included) routes to the help text.

use crate::{ClassDefinition, Intent};

/// One class definition per intent, in class order.
pub fn builtin_classes() -> Vec<ClassDefinition> {
    BUILTIN_CORPUS
        .iter()
        .map(|&(intent, description, examples)| {
            ClassDefinition::new(intent, description).with_examples(examples.to_vec())
        })
        .collect()
}

const BUILTIN_CORPUS: [(Intent, &str, &[&str]); 12] = [
    (
        Intent::Greeting,
        "Salutations and small talk",
        &["hi", "hello", "hey", "good morning", "good evening", "how are you"],
    ),
    (
        Intent::Help,
        "Questions about what the bot can answer",
        &[
            "help",
            "what can you do",
            "commands",
            "how to use this",
            "help me",
            "what can i ask",
            "how does this work",
            "show me the options",
            "menu",
        ],
    ),
    (
        Intent::Thanks,
        "Expressions of gratitude",
        &["thanks", "thank you", "thx", "thanks a lot", "thank you so much", "many thanks"],
    ),
    (
        Intent::FullName,
        "The person's name",
        &[
            "what is your full name",
            "tell me your name",
            "who are you",
            "what should I call you",
            "full name",
            "name",
        ],
    ),
    (
        Intent::Origin,
        "Birthplace and country of origin",
        &[
            "where are you from",
            "which country are you from",
            "your birthplace",
            "origin",
            "born where",
        ],
    ),
    (
        Intent::CurrentLocation,
        "Where the person lives now",
        &[
            "where do you live",
            "current location",
            "city you live in",
            "where are you based",
            "location",
        ],
    ),
    (
        Intent::Education,
        "Schools, degrees and studies",
        &[
            "what is your education background",
            "tell me about your education",
            "education",
            "degree",
            "university",
            "college",
            "where did you study",
        ],
    ),
    (
        Intent::TutoringCareer,
        "Teaching and tutoring work",
        &[
            "tell me about your tutoring career",
            "what do you teach",
            "teaching",
            "tutor",
            "courses you teach",
            "how long have you been teaching",
        ],
    ),
    (
        Intent::ProfessionalCareer,
        "Jobs and professional experience",
        &[
            "tell me about your professional career",
            "what do you do for work",
            "where do you work",
            "job experience",
            "profession",
            "resume",
            "what is your job",
        ],
    ),
    (
        Intent::ToolsAndSkills,
        "Technical tools and skills",
        &[
            "what tools do you know",
            "skills",
            "tech stack",
            "programming languages",
            "software you use",
            "tools",
            "technologies",
        ],
    ),
    (
        Intent::Childhood,
        "Early life",
        &[
            "tell me about your childhood",
            "how was your childhood",
            "early life",
            "early days",
        ],
    ),
    (
        Intent::PersonalLife,
        "Family, hobbies and interests",
        &[
            "tell me about your personal life",
            "are you married",
            "do you have kids",
            "hobbies",
            "interests",
            "family",
            "kids",
        ],
    ),
];

/// The quick questions offered by the chat front end, with the intent each
/// one is expected to route to.
pub const QUICK_QUESTIONS: [(&str, Intent); 9] = [
    ("full name", Intent::FullName),
    ("where are you from", Intent::Origin),
    ("where do you live", Intent::CurrentLocation),
    ("education", Intent::Education),
    ("tutoring career", Intent::TutoringCareer),
    ("professional career", Intent::ProfessionalCareer),
    ("tools and skills", Intent::ToolsAndSkills),
    ("childhood", Intent::Childhood),
    ("personal life", Intent::PersonalLife),
];
