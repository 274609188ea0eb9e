//! Domain records held by the lending registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LendingError;

/// Declares a validated, trimmed text identifier newtype.
macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from text, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns [`LendingError::InvalidIdentifier`] if the trimmed text is empty.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, LendingError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(LendingError::InvalidIdentifier { kind: $kind });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = LendingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = LendingError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

identifier!(
    /// Unique key of a book (ISBN-like text).
    BookId,
    "book"
);

identifier!(
    /// Unique key of a registered person.
    PersonId,
    "person"
);

/// A title held by the library, with its copy counters and reader history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    title: String,
    author_name: String,
    id: BookId,
    total_copies: u64,
    available_copies: u64,
    readers: Vec<PersonId>,
}

impl Book {
    /// Creates a book with every copy on the shelf and no reader history.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author_name: impl Into<String>,
        id: BookId,
        total_copies: u64,
    ) -> Self {
        Self {
            title: title.into(),
            author_name: author_name.into(),
            id,
            total_copies,
            available_copies: total_copies,
            readers: Vec::new(),
        }
    }

    /// Book title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Author name.
    #[must_use]
    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    /// Book identifier.
    #[must_use]
    pub const fn id(&self) -> &BookId {
        &self.id
    }

    /// Number of copies the library owns.
    #[must_use]
    pub const fn total_copies(&self) -> u64 {
        self.total_copies
    }

    /// Number of copies currently on the shelf.
    #[must_use]
    pub const fn available_copies(&self) -> u64 {
        self.available_copies
    }

    /// Returns `true` if at least one copy can be issued.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Everyone who has ever borrowed this book, in borrow order.
    ///
    /// Repeat borrowers appear once per borrow. Returns never shrink this list.
    #[must_use]
    pub fn readers(&self) -> &[PersonId] {
        &self.readers
    }

    /// Takes one copy off the shelf for `reader`.
    ///
    /// Returns `false` (and changes nothing) when no copy is available.
    pub(crate) fn checkout(&mut self, reader: PersonId) -> bool {
        let Some(remaining) = self.available_copies.checked_sub(1) else {
            return false;
        };
        self.available_copies = remaining;
        self.readers.push(reader);
        true
    }

    /// Puts one copy back on the shelf.
    ///
    /// Returns `false` (and changes nothing) when every copy is already in.
    pub(crate) fn checkin(&mut self) -> bool {
        if self.available_copies >= self.total_copies {
            return false;
        }
        self.available_copies += 1;
        true
    }

    /// Adds copies to both counters, refusing on overflow.
    pub(crate) fn add_copies(&mut self, additional: u64) -> Result<(), LendingError> {
        let total = self
            .total_copies
            .checked_add(additional)
            .ok_or(LendingError::CopyCountOverflow)?;
        let available = self
            .available_copies
            .checked_add(additional)
            .ok_or(LendingError::CopyCountOverflow)?;
        self.total_copies = total;
        self.available_copies = available;
        Ok(())
    }
}

/// A registered borrower.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    id: PersonId,
    name: String,
}

impl Person {
    /// Creates a person record.
    #[must_use]
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Person identifier.
    #[must_use]
    pub const fn id(&self) -> &PersonId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_id(s: &str) -> BookId {
        BookId::new(s).unwrap()
    }

    #[test]
    fn identifier_trims_whitespace() {
        let id = BookId::new("  978-1 ").unwrap();
        assert_eq!(id.as_str(), "978-1");
        assert_eq!(id.to_string(), "978-1");
    }

    #[test]
    fn identifier_rejects_blank() {
        assert_eq!(
            PersonId::new("   ").unwrap_err(),
            LendingError::InvalidIdentifier { kind: "person" }
        );
        assert!("".parse::<BookId>().is_err());
    }

    #[test]
    fn identifier_deserialise_validates() {
        let id: PersonId = serde_json::from_str(r#"" p1 ""#).unwrap();
        assert_eq!(id.as_str(), "p1");
        assert!(serde_json::from_str::<PersonId>(r#""""#).is_err());
    }

    #[test]
    fn new_book_has_all_copies_available() {
        let book = Book::new("Dune", "Frank Herbert", book_id("978-1"), 2);
        assert_eq!(book.total_copies(), 2);
        assert_eq!(book.available_copies(), 2);
        assert!(book.readers().is_empty());
        assert!(book.is_available());
    }

    #[test]
    fn checkout_stops_at_zero() {
        let mut book = Book::new("Dune", "Frank Herbert", book_id("978-1"), 1);
        let reader = PersonId::new("p1").unwrap();

        assert!(book.checkout(reader.clone()));
        assert!(!book.checkout(reader));
        assert_eq!(book.available_copies(), 0);
        assert_eq!(book.readers().len(), 1);
    }

    #[test]
    fn checkin_stops_at_total() {
        let mut book = Book::new("Dune", "Frank Herbert", book_id("978-1"), 1);
        assert!(!book.checkin());
        assert_eq!(book.available_copies(), 1);
    }

    #[test]
    fn add_copies_overflow_leaves_book_unchanged() {
        let mut book = Book::new("Dune", "Frank Herbert", book_id("978-1"), 5);
        assert_eq!(
            book.add_copies(u64::MAX),
            Err(LendingError::CopyCountOverflow)
        );
        assert_eq!(book.total_copies(), 5);
        assert_eq!(book.available_copies(), 5);
    }
}
