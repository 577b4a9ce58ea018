//! The built-in sentence used when the sentence service is unreachable.

use crate::model::{NounHint, NounWord, SentenceHint, SentenceRecord, VerbHint, VerbWord};

/// "Rāma goes": a two-word intransitive sentence with no object.
pub fn fallback_sentence() -> SentenceRecord {
    SentenceRecord {
        sentence: "रामः गच्छति".into(),
        subject: Some(NounWord {
            form: "रामः".into(),
            root: "राम".into(),
            gender: Some("masculine".into()),
            number: Some("singular".into()),
            person: Some("third".into()),
            stem: None,
        }),
        object: None,
        verb: Some(VerbWord {
            form: "गच्छति".into(),
            root: "गम्".into(),
            class: Some("1".into()),
            meaning: Some("goes".into()),
            person: Some("third".into()),
            number: Some("singular".into()),
            stem: None,
        }),
        hint: SentenceHint {
            subject: Some(NounHint {
                gender: Some("masculine".into()),
                number: Some("singular".into()),
            }),
            object: None,
            verb: Some(VerbHint {
                class: Some("1".into()),
                meaning: Some("goes".into()),
                person: Some("third".into()),
                number: Some("singular".into()),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn fallback_is_valid_and_objectless() {
        let record = fallback_sentence();
        assert!(record.validate().is_ok());
        assert_eq!(record.tokens(), vec!["रामः", "गच्छति"]);
        assert_eq!(record.answer_form(Role::Object), None);
        assert_eq!(record.answer_form(Role::Verb), Some("गच्छति"));
    }
}
