use thiserror::Error;

pub type IdomResult<T> = Result<T, IdomError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdomError {
    // --- structural errors ---

    #[error("Mismatched closing tag '{found}': {}", describe_open(.expected))]
    MismatchedTag {
        expected: Option<String>,
        found: String,
    },

    #[error("Element '{tag}' was never closed ({depth} element(s) still open when rendering finished)")]
    UnclosedElement { tag: String, depth: usize },

    #[error("'{operation}' called while no element is accepting attributes")]
    InvalidAttributeContext { operation: String },

    #[error("Opening tag of '{tag}' is still accepting attributes; call element_open_end first")]
    UnterminatedOpenTag { tag: String },

    #[error("Maximum nesting depth ({max_depth}) exceeded")]
    MaxNestingDepthExceeded { max_depth: usize },

    // --- name validation ---

    #[error("Invalid tag name '{tag}'")]
    InvalidTagName { tag: String },

    #[error("Invalid attribute name '{name}'")]
    InvalidAttributeName { name: String },

    // --- configuration and scripts ---

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Unknown formatter '{name}'")]
    UnknownFormatter { name: String },
}

fn describe_open(expected: &Option<String>) -> String {
    match expected {
        Some(tag) => format!("innermost open element is '{}'", tag),
        None => "no element is open".to_string(),
    }
}

impl From<serde_yaml::Error> for IdomError {
    fn from(err: serde_yaml::Error) -> Self {
        IdomError::Script(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_tag_messages() {
        let err = IdomError::MismatchedTag {
            expected: Some("div".to_string()),
            found: "span".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Mismatched closing tag 'span': innermost open element is 'div'"
        );

        let err = IdomError::MismatchedTag {
            expected: None,
            found: "span".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Mismatched closing tag 'span': no element is open"
        );
    }
}
