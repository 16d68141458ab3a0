use serde::Serialize;
use serde_json::{Map, Value};

/// Raw grading form fields as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GradeForm {
    pub userid: String,
    pub assignmentid: String,
    pub github_link: String,
    pub assignmentname: String,
    pub assignmentactivity: String,
    pub rubric: RubricField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RubricField {
    /// Free text expected to hold a JSON rubric.
    Inline(String),
    Keyed {
        assignmentintro: String,
        rubric_key: String,
    },
}

impl Default for RubricField {
    fn default() -> Self {
        RubricField::Inline(String::new())
    }
}

/// Body of `POST /grade`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRequest {
    pub userid: String,
    pub assignmentid: String,
    pub github_link: String,
    pub assignmentname: String,
    pub assignmentactivity: String,
    #[serde(flatten)]
    pub rubric: RubricPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RubricPayload {
    Inline {
        assignmentrubric: Value,
    },
    Keyed {
        assignmentintro: String,
        rubric_key: String,
    },
}

impl GradeForm {
    /// Builds the submit request. Fields are passed through unvalidated.
    ///
    /// An inline rubric that does not parse is replaced by `{}`; the parse
    /// error is returned alongside so callers can warn about it.
    pub fn into_request(self) -> (GradeRequest, Option<String>) {
        let (rubric, fallback) = match self.rubric {
            RubricField::Inline(text) => match parse_rubric(&text) {
                Ok(value) => (RubricPayload::Inline { assignmentrubric: value }, None),
                Err(err) => (
                    RubricPayload::Inline {
                        assignmentrubric: Value::Object(Map::new()),
                    },
                    Some(err.to_string()),
                ),
            },
            RubricField::Keyed {
                assignmentintro,
                rubric_key,
            } => (
                RubricPayload::Keyed {
                    assignmentintro,
                    rubric_key,
                },
                None,
            ),
        };

        let request = GradeRequest {
            userid: self.userid,
            assignmentid: self.assignmentid,
            github_link: self.github_link,
            assignmentname: self.assignmentname,
            assignmentactivity: self.assignmentactivity,
            rubric,
        };
        (request, fallback)
    }
}

/// Parses inline rubric text. Empty text means an empty mapping.
pub fn parse_rubric(text: &str) -> Result<Value, serde_json::Error> {
    if text.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(text)
}
