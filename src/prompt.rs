//! Single-shot prompt form.
//!
//! Fields arrive as raw text (form inputs or CLI flags); blank optional
//! fields become `null` on the wire.

use thiserror::Error;

use crate::api::PromptRequest;

/// Validation errors for user-entered form fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
}

/// Raw field values of the prompt form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptForm {
    pub prompt: String,
    pub provider: String,
    pub system: String,
    pub temperature: String,
    pub max_tokens: String,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse an optional float field; blank means `None`.
pub fn parse_float(field: &'static str, value: &str) -> Result<Option<f64>, FormError> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|_| FormError::NotANumber { field, value: raw })
}

/// Parse an optional unsigned integer field; blank means `None`.
pub fn parse_integer(field: &'static str, value: &str) -> Result<Option<u32>, FormError> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|_| FormError::NotANumber { field, value: raw })
}

/// Temperature bounded to `0..=2`, as the story endpoint requires.
pub fn parse_temperature(value: &str) -> Result<Option<f64>, FormError> {
    let parsed = parse_float("temperature", value)?;
    if parsed.is_some_and(|t| !(0.0..=2.0).contains(&t)) {
        return Err(FormError::OutOfRange {
            field: "temperature",
            min: 0.0,
            max: 2.0,
        });
    }
    Ok(parsed)
}

/// Positive token limit, as the story endpoint requires.
pub fn parse_max_tokens(value: &str) -> Result<Option<u32>, FormError> {
    let parsed = parse_integer("max_tokens", value)?;
    if parsed == Some(0) {
        return Err(FormError::OutOfRange {
            field: "max_tokens",
            min: 1.0,
            max: f64::from(u32::MAX),
        });
    }
    Ok(parsed)
}

impl PromptForm {
    /// Validate the form and build the request body.
    pub fn to_request(&self) -> Result<PromptRequest, FormError> {
        let prompt = non_blank(&self.prompt).ok_or(FormError::Empty("prompt"))?;
        Ok(PromptRequest {
            provider: non_blank(&self.provider),
            prompt,
            system: non_blank(&self.system),
            temperature: parse_float("temperature", &self.temperature)?,
            max_tokens: parse_integer("max_tokens", &self.max_tokens)?,
        })
    }
}

/// Display label for a provider id (`openai` -> `Openai`).
pub fn provider_label(provider: &str) -> String {
    let mut chars = provider.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_become_none() {
        let form = PromptForm {
            prompt: "  Write a haiku  ".into(),
            provider: "".into(),
            system: "   ".into(),
            temperature: "".into(),
            max_tokens: "".into(),
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.prompt, "Write a haiku");
        assert_eq!(request.provider, None);
        assert_eq!(request.system, None);
        assert_eq!(request.temperature, None);
        assert_eq!(request.max_tokens, None);
    }

    #[test]
    fn test_numbers_are_parsed() {
        let form = PromptForm {
            prompt: "hi".into(),
            provider: "anthropic".into(),
            temperature: "0.7".into(),
            max_tokens: "256".into(),
            ..Default::default()
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.provider.as_deref(), Some("anthropic"));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(256));
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let form = PromptForm {
            prompt: "\n\t".into(),
            ..Default::default()
        };
        assert_eq!(form.to_request(), Err(FormError::Empty("prompt")));
        assert_eq!(
            FormError::Empty("prompt").to_string(),
            "prompt cannot be empty"
        );
    }

    #[test]
    fn test_prompt_numbers_are_unbounded() {
        let form = PromptForm {
            prompt: "hi".into(),
            temperature: "2.5".into(),
            max_tokens: "0".into(),
            ..Default::default()
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.temperature, Some(2.5));
        assert_eq!(request.max_tokens, Some(0));

        let form = PromptForm {
            prompt: "hi".into(),
            temperature: "hot".into(),
            ..Default::default()
        };
        assert!(matches!(
            form.to_request(),
            Err(FormError::NotANumber {
                field: "temperature",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            parse_float("temperature", "warm"),
            Err(FormError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_integer("max_tokens", "1.5"),
            Err(FormError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_temperature("warm"),
            Err(FormError::NotANumber { .. })
        ));
        assert!(matches!(
            parse_temperature("2.5"),
            Err(FormError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_max_tokens("0"),
            Err(FormError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse_max_tokens("-3"),
            Err(FormError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_provider_label() {
        assert_eq!(provider_label("openai"), "Openai");
        assert_eq!(provider_label("huggingface"), "Huggingface");
        assert_eq!(provider_label(""), "");
    }
}
