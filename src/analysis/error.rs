// Wed Jan 21 2026 - Alex

use thiserror::Error;

/// Every failure the analysis passes can report. All of these are
/// structural: an operation either fully succeeds or fails with one of
/// these kinds, never with a partial artifact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("inheritance cycle through class '{class}'")]
    Cycle { class: String },

    #[error("'{class}' is abstract: pure slot '{slot}' has no implementation")]
    AbstractClass { class: String, slot: String },

    #[error("no unique final overrider for '{slot}' in '{class}': candidates {candidates:?}")]
    AmbiguousOverrider {
        class: String,
        slot: String,
        candidates: Vec<String>,
    },

    #[error("member '{name}' is ambiguous in '{class}': declared in subobjects {subobjects:?}")]
    AmbiguousName {
        class: String,
        name: String,
        subobjects: Vec<String>,
    },

    #[error("no member named '{name}' reachable from '{class}'")]
    NameNotFound { class: String, name: String },

    #[error("virtual base '{base}' of '{class}' has no default constructor and the most derived class supplied no initializer")]
    MissingVirtualBaseInitializer { class: String, base: String },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
