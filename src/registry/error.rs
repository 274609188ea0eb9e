//! Failure reasons for lending operations.
//!
//! Every variant's display text is the human-readable reason handed back to
//! the caller verbatim inside a failure result.

use thiserror::Error;

/// Result type for lending operations.
///
/// The success payload is the confirmation message.
pub type LendingResult<T = String> = Result<T, LendingError>;

/// Reasons a lending operation can be refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LendingError {
    /// A book with the same identifier is already registered.
    #[error("Book already exists.")]
    BookExists,

    /// No book is registered under the identifier.
    #[error("Book not found.")]
    BookNotFound,

    /// The book exists but every copy is out.
    #[error("Book not available for issue.")]
    BookUnavailable,

    /// No person is registered under the identifier.
    #[error("Person not found.")]
    PersonNotFound,

    /// A person with the same identifier is already registered.
    #[error("Person already exists.")]
    PersonExists,

    /// The person does not currently hold a copy of the book.
    #[error("This book was not issued to the given person.")]
    NotIssued,

    /// Adding copies would overflow the copy counters.
    #[error("Copy count overflow.")]
    CopyCountOverflow,

    /// An identifier was empty or blank.
    #[error("Invalid {kind} identifier: must not be empty.")]
    InvalidIdentifier {
        /// Which kind of identifier was rejected ("book" or "person").
        kind: &'static str,
    },
}
