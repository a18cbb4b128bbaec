//! serde-backed formats

use super::registry::{FormatError, Formatter};
use crate::stache::token::Template;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        serde_json::to_string_pretty(template)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Token tree and partial list as pretty-printed JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, template: &Template) -> Result<String, FormatError> {
        serde_yaml::to_string(template).map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Token tree and partial list as YAML"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stache::parsing::{tokenize, Options};
    use serde_json::json;

    #[test]
    fn test_json_shape() {
        let template = tokenize("Hi {{&name}}{{>footer}}", &Options::default()).unwrap();
        let output = JsonFormatter.serialize(&template).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            value,
            json!({
                "tokens": [
                    { "static": "Hi " },
                    { "output": { "tag": { "name": "name", "expression": "name" }, "escape": false } },
                    { "partial": { "name": "footer", "expression": "footer" } }
                ],
                "partials": ["footer"]
            })
        );
    }

    #[test]
    fn test_json_deserializes_back() {
        let template = tokenize("{{#a}}x{{/a}}", &Options::default()).unwrap();
        let output = JsonFormatter.serialize(&template).unwrap();
        let parsed: Template = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, template);
    }

    #[test]
    fn test_yaml_mentions_sections() {
        let template = tokenize("{{^none}}empty{{/none}}", &Options::default()).unwrap();
        let output = YamlFormatter.serialize(&template).unwrap();
        assert!(output.contains("inverted_section"));
        assert!(output.contains("raw: empty"));
    }
}
