//! Payload schemas. Every field is checked and all problems are reported
//! together, in field order, followed by any unexpected keys.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    error::{AppErr, AppResult},
    utils::sanitize,
};

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Required string, non-empty once sanitized.
    Text,
    /// Required string equal to one of the listed values once sanitized.
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
}

#[derive(Debug, Clone, Copy)]
pub struct Schema(pub &'static [Field]);

/// Sanitized values of a payload that passed its schema.
#[derive(Debug, Default)]
pub struct Fields(BTreeMap<&'static str, String>);

impl Fields {
    /// Fails when `name` is not a field this payload's schema produced.
    pub fn take(&mut self, name: &str) -> AppResult<String> {
        self.0
            .remove(name)
            .ok_or_else(|| AppErr::Invalid(vec![format!("\"{name}\" is required")]))
    }
}

impl Schema {
    pub fn check(&self, body: &Value) -> AppResult<Fields> {
        let Some(obj) = body.as_object() else {
            return Err(AppErr::Invalid(vec!["\"value\" must be of type object".into()]));
        };

        let mut errors = Vec::new();
        let mut fields = Fields::default();

        for field in self.0 {
            let name = field.name;
            let raw = match obj.get(name) {
                None => {
                    errors.push(format!("\"{name}\" is required"));
                    continue;
                }
                Some(Value::String(s)) => s,
                Some(_) => {
                    errors.push(format!("\"{name}\" must be a string"));
                    continue;
                }
            };

            let value = sanitize::clean(raw);
            match field.rule {
                Rule::Text if value.is_empty() => {
                    errors.push(format!("\"{name}\" is not allowed to be empty"));
                }
                Rule::OneOf(allowed) if !allowed.contains(&value.as_str()) => {
                    errors.push(format!("\"{name}\" must be one of [{}]", allowed.join(", ")));
                }
                _ => {
                    fields.0.insert(name, value);
                }
            }
        }

        for key in obj.keys() {
            if !self.0.iter().any(|f| f.name == key.as_str()) {
                errors.push(format!("\"{key}\" is not allowed"));
            }
        }

        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(AppErr::Invalid(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MSG: Schema = Schema(&[
        Field { name: "to", rule: Rule::Text },
        Field { name: "text", rule: Rule::Text },
        Field { name: "type", rule: Rule::OneOf(&["message", "private_message"]) },
    ]);

    fn errors(body: Value) -> Vec<String> {
        match MSG.check(&body) {
            Err(AppErr::Invalid(list)) => list,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn accepts_and_sanitizes() {
        let mut f = MSG
            .check(&json!({"to": " Todos ", "text": "<i>oi</i>", "type": "message"}))
            .unwrap();
        assert_eq!(f.take("to").unwrap(), "Todos");
        assert_eq!(f.take("text").unwrap(), "oi");
        assert_eq!(f.take("type").unwrap(), "message");
    }

    #[test]
    fn taking_an_unchecked_field_fails() {
        let mut f = MSG
            .check(&json!({"to": "Todos", "text": "oi", "type": "message"}))
            .unwrap();
        assert!(f.take("to").is_ok());
        assert!(matches!(f.take("to"), Err(AppErr::Invalid(_))));
        assert!(matches!(f.take("name"), Err(AppErr::Invalid(_))));
    }

    #[test]
    fn reports_every_problem() {
        let list = errors(json!({"text": 5, "type": "status", "extra": true}));
        assert_eq!(
            list,
            vec![
                "\"to\" is required",
                "\"text\" must be a string",
                "\"type\" must be one of [message, private_message]",
                "\"extra\" is not allowed",
            ]
        );
    }

    #[test]
    fn markup_only_text_is_empty() {
        let list = errors(json!({"to": "Todos", "text": "<b></b>", "type": "message"}));
        assert_eq!(list, vec!["\"text\" is not allowed to be empty"]);
    }

    #[test]
    fn non_object_body() {
        assert_eq!(errors(json!(["to"])), vec!["\"value\" must be of type object"]);
    }
}
