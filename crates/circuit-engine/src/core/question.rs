use serde::{Deserialize, Serialize};

use crate::api::types::WireId;

/// A prompt/answer pair carried by one wire. Immutable for the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Doubles as the id of the wire that carries this question.
    pub id: WireId,
    /// Text shown on the wire's card.
    #[serde(alias = "question")]
    pub prompt: String,
    /// The answer that must sit in the socket this wire is plugged into.
    pub answer: String,
    #[serde(default)]
    pub category: String,
    /// Score awarded for a correct connection.
    #[serde(default)]
    pub points: u32,
}

impl Question {
    pub fn new(id: u32, prompt: &str, answer: &str) -> Self {
        Self {
            id: WireId(id),
            prompt: prompt.to_string(),
            answer: answer.to_string(),
            category: String::new(),
            points: 0,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_question_with_legacy_field_name() {
        let json = r#"{ "id": 3, "question": "What converts AC to DC?", "answer": "Diode" }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, WireId(3));
        assert_eq!(q.prompt, "What converts AC to DC?");
        assert_eq!(q.category, "");
        assert_eq!(q.points, 0);
    }

    #[test]
    fn builder_sets_fields() {
        let q = Question::new(1, "Limits current?", "Resistor")
            .with_category("Electronics")
            .with_points(100);
        assert_eq!(q.category, "Electronics");
        assert_eq!(q.points, 100);
    }
}
