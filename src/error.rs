//! Error types for connector framework operations.
//!
//! Errors are split by concern: construction-time validation of value
//! objects, translation consistency faults, schema declaration errors and
//! operation failures reported by the dispatcher.

use std::time::Duration;

/// Main error type for connector operations.
///
/// Returned by the [`OperationDispatcher`](crate::operations::OperationDispatcher)
/// and by connector implementations of the SPI operation traits.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Operation arguments or resource data failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The filter translator produced inconsistent results
    #[error("Filter translation failed: {0}")]
    Translation(#[from] TranslationError),

    /// Schema declaration errors
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Framework configuration is invalid
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Object class is not supported by the requested operation
    #[error("Object class '{object_class}' is not supported by operation '{operation}'")]
    UnsupportedObjectClass {
        object_class: String,
        operation: String,
    },

    /// Operation option is not supported by the requested operation
    #[error("Operation option '{option}' is not supported by operation '{operation}'")]
    UnsupportedOption { option: String, operation: String },

    /// Target object does not exist on the resource
    #[error("Object not found: {object_class} with Uid {uid}")]
    ObjectNotFound { object_class: String, uid: String },

    /// Object already exists on the resource
    #[error("Object already exists: {object_class} with Uid {uid}")]
    AlreadyExists { object_class: String, uid: String },

    /// Authentication against the resource failed
    #[error("Invalid credential for user '{username}'")]
    InvalidCredential { username: String },

    /// Operation did not complete within the configured timeout
    #[error("Operation '{operation}' timed out after {timeout:?}")]
    OperationTimeout {
        operation: String,
        timeout: Duration,
    },

    /// The resource could not be reached
    #[error("Connection to resource failed: {message}")]
    ConnectionFailed { message: String },

    /// Errors raised by the resource while executing an operation
    #[error("Resource error: {0}")]
    Resource(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Internal framework errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Construction-time validation errors.
///
/// Raised at builder and constructor boundaries; values are never coerced
/// into a valid shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Attribute, object class or option name is blank
    #[error("Name must not be blank")]
    BlankName,

    /// Uid value is blank
    #[error("Uid value must not be blank")]
    BlankUid,

    /// Attribute requires exactly one value
    #[error("Attribute '{attribute}' must have exactly one value, got {actual}")]
    ExpectedSingleValue { attribute: String, actual: usize },

    /// Attribute requires at least one value
    #[error("Attribute '{attribute}' must have at least one value")]
    ExpectedValues { attribute: String },

    /// Attribute value has the wrong type
    #[error("Attribute '{attribute}' has invalid type, expected {expected}, got {actual}")]
    InvalidValueType {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Comparison filter over a value without an ordering
    #[error("Attribute '{attribute}' value of type {actual} is not comparable")]
    NotComparable { attribute: String, actual: String },

    /// Uid used in a filter other than Equals
    #[error("Uid attribute may only be used in an Equals filter, not in {filter}")]
    UidNotAllowed { filter: String },

    /// Connector object is missing its Uid attribute
    #[error("Connector object must contain a Uid attribute")]
    MissingUid,

    /// Connector object is missing its Name attribute
    #[error("Connector object must contain a Name attribute")]
    MissingName,

    /// Attribute name occurs more than once
    #[error("Duplicate attribute '{attribute}'")]
    DuplicateAttribute { attribute: String },

    /// Attribute may not be used in the given context
    #[error("Attribute '{attribute}' is not allowed: {reason}")]
    AttributeNotAllowed { attribute: String, reason: String },

    /// Sync delta is incomplete or inconsistent
    #[error("Invalid sync delta: {message}")]
    InvalidSyncDelta { message: String },

    /// General validation error with custom message
    #[error("Validation failed: {message}")]
    Custom { message: String },
}

/// Filter translation consistency faults.
///
/// These indicate a translator whose hooks answered differently during the
/// simplification pass and the final translation pass. The result of such a
/// translation cannot be trusted, so no partial query list is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    /// A simplified, non-everything operand translated to no expression
    #[error("Operand '{filter}' translated to no expressions after simplification")]
    EmptyOperand { filter: String },

    /// An AND operand did not translate to exactly one expression
    #[error("AND operand '{filter}' translated to {count} expressions, expected exactly one")]
    AndOperandNotSingular { filter: String, count: usize },

    /// The AND hook rejected operands it accepted during simplification
    #[error("AND expression was rejected for '{filter}' after simplification accepted it")]
    AndRejected { filter: String },

    /// An operand with several expressions was not an OR
    #[error("Operand '{filter}' produced several expressions but is not an OR")]
    UnexpectedMultiExpression { filter: String },

    /// NOT wraps a composite filter after normalization
    #[error("NOT over composite filter '{filter}' survived normalization")]
    UnnormalizedNot { filter: String },
}

/// Errors raised while declaring a connector schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Object class declared twice
    #[error("Object class '{name}' is already defined")]
    DuplicateObjectClass { name: String },

    /// Operation option declared twice
    #[error("Operation option '{name}' is already defined")]
    DuplicateOperationOption { name: String },

    /// Object class referenced but never declared
    #[error("Object class '{name}' is not defined in the schema")]
    UndefinedObjectClass { name: String },

    /// Operation option referenced but never declared
    #[error("Operation option '{name}' is not defined in the schema")]
    UndefinedOperationOption { name: String },

    /// Operation not implemented by the connector
    #[error("Operation '{operation}' is not implemented by the connector")]
    OperationNotImplemented { operation: String },

    /// Two attribute infos share a name
    #[error("Object class '{object_class}' declares attribute '{attribute}' more than once")]
    DuplicateAttributeInfo {
        object_class: String,
        attribute: String,
    },

    /// Attribute info is malformed
    #[error("Invalid attribute info '{attribute}': {message}")]
    InvalidAttributeInfo { attribute: String, message: String },

    /// Schema without object classes
    #[error("Schema must define at least one object class")]
    NoObjectClasses,

    /// Name is blank
    #[error("Schema element name must not be blank")]
    BlankName,
}

// Convenience methods for creating common errors
impl ConnectorError {
    /// Create an object not found error
    pub fn object_not_found(object_class: impl Into<String>, uid: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            object_class: object_class.into(),
            uid: uid.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a connection failure
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
        }
    }

    /// Wrap an error raised by the resource
    pub fn resource<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Resource(Box::new(error))
    }

    /// Whether the error comes from a translator bug rather than the resource.
    pub fn is_translation_fault(&self) -> bool {
        matches!(self, Self::Translation(_))
    }
}

impl ValidationError {
    /// Create an invalid type error
    pub fn invalid_type(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidValueType {
            attribute: attribute.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an attribute-not-allowed error
    pub fn not_allowed(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AttributeNotAllowed {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Create a custom validation error
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}

// Result type aliases for convenience
pub type ConnectorResult<T> = Result<T, ConnectorError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
pub type TranslationResult<T> = Result<T, TranslationError>;
pub type SchemaResult<T> = Result<T, SchemaError>;
