//! Core data model types for vakya.
//!
//! These types describe a sentence as the sentence service delivers it:
//! the surface text, a typed grammatical record for each role, and the
//! precomputed hint metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ExerciseError;

/// One of the semantic slots a token can be placed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Subject,
    Object,
    Verb,
}

impl Role {
    /// All roles in display order.
    pub const ALL: [Role; 3] = [Role::Subject, Role::Object, Role::Verb];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Subject => "subject",
            Role::Object => "object",
            Role::Verb => "verb",
        }
    }

    /// Heading used when presenting the role to the learner.
    pub fn title(&self) -> &'static str {
        match self {
            Role::Subject => "Subject",
            Role::Object => "Object",
            Role::Verb => "Verb",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ExerciseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "subject" | "subj" | "s" => Ok(Role::Subject),
            "object" | "obj" | "o" => Ok(Role::Object),
            "verb" | "v" => Ok(Role::Verb),
            other => Err(ExerciseError::UnknownRole(other.to_string())),
        }
    }
}

/// A named grammatical attribute of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Root,
    Form,
    Number,
    Gender,
    Person,
    Stem,
    Class,
    Meaning,
}

impl Property {
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Root => "root",
            Property::Form => "form",
            Property::Number => "number",
            Property::Gender => "gender",
            Property::Person => "person",
            Property::Stem => "stem",
            Property::Class => "class",
            Property::Meaning => "meaning",
        }
    }

    /// `true` for the properties only verbs carry.
    pub fn is_verb_only(&self) -> bool {
        matches!(self, Property::Class | Property::Meaning)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = ExerciseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "root" => Ok(Property::Root),
            "form" => Ok(Property::Form),
            "number" => Ok(Property::Number),
            "gender" => Ok(Property::Gender),
            "person" => Ok(Property::Person),
            "stem" => Ok(Property::Stem),
            "class" => Ok(Property::Class),
            "meaning" => Ok(Property::Meaning),
            other => Err(ExerciseError::UnknownProperty(other.to_string())),
        }
    }
}

/// Properties checked for a noun, in checking order.
pub const NOUN_PROPERTIES: [Property; 6] = [
    Property::Root,
    Property::Form,
    Property::Number,
    Property::Gender,
    Property::Person,
    Property::Stem,
];

/// Properties checked for a verb, in checking order.
pub const VERB_PROPERTIES: [Property; 8] = [
    Property::Root,
    Property::Form,
    Property::Number,
    Property::Gender,
    Property::Person,
    Property::Stem,
    Property::Class,
    Property::Meaning,
];

/// Grammatical record for a subject or object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NounWord {
    /// Surface form as it appears in the sentence.
    #[serde(deserialize_with = "scalar")]
    pub form: String,
    #[serde(default, deserialize_with = "scalar")]
    pub root: String,
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub stem: Option<String>,
}

/// Grammatical record for a verb.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerbWord {
    /// Surface form as it appears in the sentence.
    #[serde(deserialize_with = "scalar")]
    pub form: String,
    #[serde(default, deserialize_with = "scalar")]
    pub root: String,
    /// Verb class (gaṇa), e.g. `"1"`.
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar", skip_serializing_if = "Option::is_none")]
    pub stem: Option<String>,
}

/// A word record whose class is known only at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Word {
    Noun(NounWord),
    Verb(VerbWord),
}

/// What a word says about one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    /// The word defines the property.
    Defined(&'a str),
    /// The property belongs to this word class but the record leaves it out.
    Missing,
    /// The property does not exist for this word class.
    NotApplicable,
}

impl<'a> PropertyValue<'a> {
    pub fn defined(self) -> Option<&'a str> {
        match self {
            PropertyValue::Defined(v) => Some(v),
            _ => None,
        }
    }
}

fn present(value: &str) -> PropertyValue<'_> {
    if value.trim().is_empty() {
        PropertyValue::Missing
    } else {
        PropertyValue::Defined(value)
    }
}

fn present_opt(value: &Option<String>) -> PropertyValue<'_> {
    value.as_deref().map_or(PropertyValue::Missing, present)
}

impl Word {
    pub fn form(&self) -> &str {
        match self {
            Word::Noun(w) => &w.form,
            Word::Verb(w) => &w.form,
        }
    }

    pub fn is_verb(&self) -> bool {
        matches!(self, Word::Verb(_))
    }

    /// Properties checked for this word class, in checking order.
    pub fn checked_properties(&self) -> &'static [Property] {
        match self {
            Word::Noun(_) => &NOUN_PROPERTIES,
            Word::Verb(_) => &VERB_PROPERTIES,
        }
    }

    /// Analysis slots for this word class, in display order.
    pub fn slots(&self) -> Vec<Property> {
        let mut slots = vec![
            Property::Root,
            Property::Form,
            Property::Gender,
            Property::Number,
            Property::Person,
            Property::Stem,
        ];
        if self.is_verb() {
            slots.extend([Property::Class, Property::Meaning]);
        }
        slots
    }

    /// Looks up one property of the word.
    pub fn property(&self, property: Property) -> PropertyValue<'_> {
        match (self, property) {
            (Word::Noun(w), Property::Root) => present(&w.root),
            (Word::Noun(w), Property::Form) => present(&w.form),
            (Word::Noun(w), Property::Number) => present_opt(&w.number),
            (Word::Noun(w), Property::Gender) => present_opt(&w.gender),
            (Word::Noun(w), Property::Person) => present_opt(&w.person),
            (Word::Noun(w), Property::Stem) => present_opt(&w.stem),
            (Word::Noun(_), Property::Class | Property::Meaning) => PropertyValue::NotApplicable,
            (Word::Verb(w), Property::Root) => present(&w.root),
            (Word::Verb(w), Property::Form) => present(&w.form),
            (Word::Verb(w), Property::Number) => present_opt(&w.number),
            // Verbs carry no gender, but the slot is still offered.
            (Word::Verb(_), Property::Gender) => PropertyValue::Missing,
            (Word::Verb(w), Property::Person) => present_opt(&w.person),
            (Word::Verb(w), Property::Stem) => present_opt(&w.stem),
            (Word::Verb(w), Property::Class) => present_opt(&w.class),
            (Word::Verb(w), Property::Meaning) => present_opt(&w.meaning),
        }
    }
}

/// Hint metadata for a subject or object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NounHint {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub number: Option<String>,
}

/// Hint metadata for a verb.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerbHint {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub class: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub meaning: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub person: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub number: Option<String>,
}

/// Precomputed hint metadata shipped with a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentenceHint {
    #[serde(default)]
    pub subject: Option<NounHint>,
    #[serde(default)]
    pub object: Option<NounHint>,
    #[serde(default)]
    pub verb: Option<VerbHint>,
}

/// A sentence as delivered by the sentence service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// Space-delimited surface form.
    pub sentence: String,
    #[serde(default)]
    pub subject: Option<NounWord>,
    /// Absent for intransitive sentences.
    #[serde(default)]
    pub object: Option<NounWord>,
    #[serde(default)]
    pub verb: Option<VerbWord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hint: SentenceHint,
}

impl SentenceRecord {
    /// Splits the sentence into its surface tokens.
    pub fn tokens(&self) -> Vec<&str> {
        self.sentence.split_whitespace().collect()
    }

    /// Surface form the learner must place into `role`, if any.
    pub fn answer_form(&self, role: Role) -> Option<&str> {
        match role {
            Role::Subject => self.subject.as_ref().map(|w| w.form.as_str()),
            Role::Object => self.object.as_ref().map(|w| w.form.as_str()),
            Role::Verb => self.verb.as_ref().map(|w| w.form.as_str()),
        }
    }

    /// The word record for `role`, if the sentence has one.
    pub fn word(&self, role: Role) -> Option<Word> {
        match role {
            Role::Subject => self.subject.clone().map(Word::Noun),
            Role::Object => self.object.clone().map(Word::Noun),
            Role::Verb => self.verb.clone().map(Word::Verb),
        }
    }

    /// Checks the record invariants: at least one token, and subject and
    /// verb never both absent.
    pub fn validate(&self) -> Result<(), ExerciseError> {
        if self.tokens().is_empty() {
            return Err(ExerciseError::InvalidSentence("sentence has no words".into()));
        }
        if self.subject.is_none() && self.verb.is_none() {
            return Err(ExerciseError::InvalidSentence(
                "sentence has neither subject nor verb".into(),
            ));
        }
        Ok(())
    }
}

/// A token shown to the learner. `id` is its position in the sentence, so
/// repeated surface forms stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub id: usize,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Scalar coercion
// ---------------------------------------------------------------------------

fn scalar_text(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn opt_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(scalar_text))
}

fn scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_scalar(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
