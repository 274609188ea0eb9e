//! Wire-level result of a lending operation and the operation catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LendingResult;

/// Outcome of a lending operation as seen by remote callers.
///
/// Serialises as `{"kind": "Success", "message": "..."}` or
/// `{"kind": "Failure", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum OperationResult {
    /// The operation was applied; carries a confirmation message.
    Success(String),
    /// The operation was refused; carries the reason.
    Failure(String),
}

impl OperationResult {
    /// Returns `true` for [`OperationResult::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the message carried by either case.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Failure(message) => message,
        }
    }
}

impl From<LendingResult> for OperationResult {
    fn from(result: LendingResult) -> Self {
        match result {
            Ok(message) => Self::Success(message),
            Err(e) => Self::Failure(e.to_string()),
        }
    }
}

/// Remotely callable registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Register a new book.
    AddBook,
    /// Lend a copy to a person.
    IssueBook,
    /// Take a copy back from a person.
    ReturnBook,
    /// Grow a book's stock.
    IncrementBookCopies,
    /// Describe a book and its availability.
    GetBookDetails,
    /// Register a new borrower.
    RegisterPerson,
}

impl Operation {
    /// Every operation, in catalogue order.
    pub const ALL: [Self; 6] = [
        Self::AddBook,
        Self::IssueBook,
        Self::ReturnBook,
        Self::IncrementBookCopies,
        Self::GetBookDetails,
        Self::RegisterPerson,
    ];

    /// The name callers use to invoke this operation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AddBook => "add_book",
            Self::IssueBook => "issue_book",
            Self::ReturnBook => "return_book",
            Self::IncrementBookCopies => "increment_book_copies",
            Self::GetBookDetails => "get_book_details",
            Self::RegisterPerson => "register_person",
        }
    }

    /// Returns `true` if the operation never mutates registry state.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::GetBookDetails)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown operation name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}
