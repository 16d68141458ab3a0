use grader_core::{FormVariant, GradeForm, RubricField};
use serde::Deserialize;
use serde_json::Value;

/// One line of `grader session` input, keyed by the wire field names.
///
/// Missing fields are empty strings. `assignmentrubric` may be given either as
/// raw text or as a JSON value; a value is re-encoded so it parses back the same.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormLine {
    pub userid: String,
    pub assignmentid: String,
    pub github_link: String,
    pub assignmentname: String,
    pub assignmentactivity: String,
    pub assignmentrubric: Option<Value>,
    pub assignmentintro: String,
    pub rubric_key: String,
}

impl FormLine {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn into_form(self, variant: FormVariant) -> GradeForm {
        let rubric = match variant {
            FormVariant::Inline => RubricField::Inline(match self.assignmentrubric {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(text)) => text,
                Some(other) => other.to_string(),
            }),
            FormVariant::Keyed => RubricField::Keyed {
                assignmentintro: self.assignmentintro,
                rubric_key: self.rubric_key,
            },
        };
        GradeForm {
            userid: self.userid,
            assignmentid: self.assignmentid,
            github_link: self.github_link,
            assignmentname: self.assignmentname,
            assignmentactivity: self.assignmentactivity,
            rubric,
        }
    }
}
