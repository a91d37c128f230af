use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("invalid character in name '{0}'")]
    InvalidCharacter(String),
    #[error("'{0}' is not a valid custom element name")]
    InvalidCustomElementName(String),
    #[error("the new child is an ancestor of the parent")]
    HierarchyRequest,
}
