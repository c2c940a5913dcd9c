//! Function metadata types

use serde::{Deserialize, Serialize};

/// Parameter declared by a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterView {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Default value (if any)
    pub default_value: Option<String>,
    /// Whether this parameter is required
    pub required: bool,
}

impl ParameterView {
    /// Create a required parameter
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default_value: None,
            required: true,
        }
    }

    /// Create an optional parameter with a default value
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default_value: Some(default_value.into()),
            required: false,
        }
    }
}

/// Description of a registered function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionView {
    pub name: String,
    pub skill_name: String,
    pub description: String,
    pub is_semantic: bool,
    pub parameters: Vec<ParameterView>,
}

impl FunctionView {
    /// Render as a line of a functions manual, e.g. for planner prompts
    pub fn to_manual_entry(&self) -> String {
        let mut entry = format!("{}.{}: {}", self.skill_name, self.name, self.description);
        for param in &self.parameters {
            entry.push_str(&format!("\n  - {}: {}", param.name, param.description));
            if let Some(default) = &param.default_value {
                entry.push_str(&format!(" (default: '{}')", default));
            }
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_entry_lists_parameters() {
        let view = FunctionView {
            name: "poem".to_string(),
            skill_name: "writer".to_string(),
            description: "Write a short poem".to_string(),
            is_semantic: true,
            parameters: vec![
                ParameterView::required("input", "Topic of the poem"),
                ParameterView::optional("style", "Poem style", "haiku"),
            ],
        };
        assert_eq!(
            view.to_manual_entry(),
            "writer.poem: Write a short poem\n  - input: Topic of the poem\n  - style: Poem style (default: 'haiku')"
        );
    }
}
