//! Error types for the class runtime
//!
//! Misuse of the runtime is a closed set of programmer-error kinds, each
//! displayed as `"<name>: <message>"`. They are surfaced by returning, never
//! caught or retried inside the runtime. Failures raised by user method
//! bodies travel through [`ClassError::Raised`] and are propagated unchanged.

use thiserror::Error;

/// Result type for class runtime calls
pub type ClassResult<T> = Result<T, ClassError>;

/// Class runtime error kinds
#[derive(Debug, Clone, Error)]
pub enum ClassError {
    /// A descriptor explicitly named a falsy parent in `extend`
    #[error("NonTruthyExtendError: {class} declares a non-truthy parent in extend")]
    NonTruthyExtend {
        /// Stringified name of the offending descriptor
        class: String,
    },

    /// No ancestor template defines the method `inherited()` asked for
    #[error("InheritedMethodNotFoundError: {instance} has no ancestor definition of {method}")]
    InheritedMethodNotFound {
        /// Display name of the receiver
        instance: String,
        /// Name of the method being dispatched
        method: String,
    },

    /// A super-call or bind was attempted from something that is not a tagged method
    #[error("MissingCalleeError: {instance} needs a tagged method to resolve a super-call")]
    MissingCallee {
        /// Display name of the receiver
        instance: String,
    },

    /// Failure raised by a user method body; never produced by the runtime itself
    #[error("{0}")]
    Raised(String),
}

impl ClassError {
    /// The error kind's name, as it appears before the colon in `Display`
    pub fn name(&self) -> &'static str {
        match self {
            ClassError::NonTruthyExtend { .. } => "NonTruthyExtendError",
            ClassError::InheritedMethodNotFound { .. } => "InheritedMethodNotFoundError",
            ClassError::MissingCallee { .. } => "MissingCalleeError",
            ClassError::Raised(_) => "Error",
        }
    }

    /// The message part of `Display`, without the kind name
    pub fn message(&self) -> String {
        match self {
            ClassError::Raised(message) => message.clone(),
            other => {
                let rendered = other.to_string();
                match rendered.split_once(": ") {
                    Some((_, message)) => message.to_string(),
                    None => rendered,
                }
            }
        }
    }
}

impl From<String> for ClassError {
    fn from(s: String) -> Self {
        ClassError::Raised(s)
    }
}

impl From<&str> for ClassError {
    fn from(s: &str) -> Self {
        ClassError::Raised(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contract() {
        let err = ClassError::NonTruthyExtend {
            class: "Modal".to_string(),
        };
        assert_eq!(
            err.to_string(),
            format!("{}: {}", err.name(), err.message())
        );
    }

    #[test]
    fn test_names() {
        let not_found = ClassError::InheritedMethodNotFound {
            instance: "Tabs".to_string(),
            method: "show".to_string(),
        };
        assert_eq!(not_found.name(), "InheritedMethodNotFoundError");

        let missing = ClassError::MissingCallee {
            instance: "Tabs".to_string(),
        };
        assert_eq!(missing.name(), "MissingCalleeError");
    }

    #[test]
    fn test_raised_from_str() {
        let err: ClassError = "boom".into();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn test_message_carries_context() {
        let err = ClassError::InheritedMethodNotFound {
            instance: "Slider".to_string(),
            method: "setValue".to_string(),
        };
        assert!(err.message().contains("Slider"));
        assert!(err.message().contains("setValue"));
    }
}
