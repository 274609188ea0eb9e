//! In-memory lending registry.
//!
//! The registry owns three mappings and is the only place they change:
//!
//! - books by [`BookId`]
//! - people by [`PersonId`]
//! - the loan index: for each book, the people currently holding a copy
//!
//! Every mutation is a single check-then-apply step. After any operation, for
//! every book, `available_copies <= total_copies` and the loan-index entry has
//! exactly `total_copies - available_copies` holders.
//!
//! A book's reader history is separate from the loan index: it records every
//! borrow (repeats included) and returns never shrink it.

pub mod error;
pub mod model;
pub mod outcome;

pub use error::{LendingError, LendingResult};
pub use model::{Book, BookId, Person, PersonId};
pub use outcome::{Operation, OperationResult, UnknownOperation};

use indexmap::IndexMap;

/// Book inventory, registered people and active loans.
#[derive(Debug, Default)]
pub struct LendingRegistry {
    books: IndexMap<BookId, Book>,
    people: IndexMap<PersonId, Person>,
    loans: IndexMap<BookId, Vec<PersonId>>,
}

impl LendingRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new book with every copy available.
    ///
    /// # Errors
    ///
    /// [`LendingError::BookExists`] if `id` is taken; the existing book is left untouched.
    pub fn add_book(
        &mut self,
        title: &str,
        author_name: &str,
        id: BookId,
        total_copies: u64,
    ) -> LendingResult {
        if self.books.contains_key(&id) {
            return Err(LendingError::BookExists);
        }

        tracing::debug!(book_id = %id, total_copies, "Adding book");
        self.books
            .insert(id.clone(), Book::new(title, author_name, id, total_copies));

        Ok(format!("Book {title} added successfully"))
    }

    /// Lends one copy of a book to a registered person.
    ///
    /// The same person may hold several copies of one book at once.
    ///
    /// # Errors
    ///
    /// - [`LendingError::BookNotFound`] if the book is unknown
    /// - [`LendingError::BookUnavailable`] if no copy is on the shelf
    /// - [`LendingError::PersonNotFound`] if the person is unknown
    pub fn issue_book(&mut self, id: &BookId, person_id: &PersonId) -> LendingResult {
        let book = self.books.get_mut(id).ok_or(LendingError::BookNotFound)?;
        if !book.is_available() {
            return Err(LendingError::BookUnavailable);
        }
        if !self.people.contains_key(person_id) {
            return Err(LendingError::PersonNotFound);
        }

        if !book.checkout(person_id.clone()) {
            return Err(LendingError::BookUnavailable);
        }
        self.loans
            .entry(id.clone())
            .or_default()
            .push(person_id.clone());

        tracing::debug!(
            book_id = %id,
            person_id = %person_id,
            available = book.available_copies(),
            "Issued book"
        );
        Ok(format!("Book {id} issued to {person_id}"))
    }

    /// Takes back one copy of a book from a person holding it.
    ///
    /// Only one loan is closed even if the person holds several copies.
    ///
    /// # Errors
    ///
    /// - [`LendingError::BookNotFound`] if the book is unknown
    /// - [`LendingError::NotIssued`] if the person holds no copy of the book
    pub fn return_book(&mut self, id: &BookId, person_id: &PersonId) -> LendingResult {
        let book = self.books.get_mut(id).ok_or(LendingError::BookNotFound)?;
        let holders = self.loans.get_mut(id).ok_or(LendingError::NotIssued)?;
        let position = holders
            .iter()
            .position(|holder| holder == person_id)
            .ok_or(LendingError::NotIssued)?;

        if !book.checkin() {
            // Loan index and counters disagree; refuse rather than exceed the total.
            tracing::warn!(book_id = %id, "Loan recorded but every copy is already in");
            return Err(LendingError::NotIssued);
        }
        holders.remove(position);

        tracing::debug!(
            book_id = %id,
            person_id = %person_id,
            available = book.available_copies(),
            "Returned book"
        );
        Ok(format!("Book {id} returned by {person_id}"))
    }

    /// Adds copies to a book's stock; all new copies are available.
    ///
    /// # Errors
    ///
    /// - [`LendingError::BookNotFound`] if the book is unknown
    /// - [`LendingError::CopyCountOverflow`] if the counters would overflow
    pub fn increment_book_copies(&mut self, id: &BookId, additional_copies: u64) -> LendingResult {
        let book = self.books.get_mut(id).ok_or(LendingError::BookNotFound)?;
        book.add_copies(additional_copies)?;

        tracing::debug!(
            book_id = %id,
            additional_copies,
            total = book.total_copies(),
            "Incremented book copies"
        );
        Ok(format!("Added {additional_copies} copies to book {id}"))
    }

    /// Describes a book and whether a copy can be issued right now.
    ///
    /// # Errors
    ///
    /// [`LendingError::BookNotFound`] if the book is unknown.
    pub fn get_book_details(&self, id: &BookId) -> LendingResult {
        let book = self.books.get(id).ok_or(LendingError::BookNotFound)?;
        let availability = if book.is_available() {
            "Available"
        } else {
            "Not Available"
        };

        Ok(format!(
            "Book \"{}\" by {} is {availability}.",
            book.title(),
            book.author_name()
        ))
    }

    /// Registers a borrower.
    ///
    /// # Errors
    ///
    /// [`LendingError::PersonExists`] if `id` is taken.
    pub fn register_person(&mut self, id: PersonId, name: &str) -> LendingResult {
        if self.people.contains_key(&id) {
            return Err(LendingError::PersonExists);
        }

        tracing::debug!(person_id = %id, "Registering person");
        let message = format!("Person {id} registered");
        self.people.insert(id.clone(), Person::new(id, name));
        Ok(message)
    }

    /// Looks up a book.
    #[must_use]
    pub fn book(&self, id: &BookId) -> Option<&Book> {
        self.books.get(id)
    }

    /// Looks up a person.
    #[must_use]
    pub fn person(&self, id: &PersonId) -> Option<&Person> {
        self.people.get(id)
    }

    /// People currently holding a copy of the book, in issue order.
    ///
    /// Empty if the book is unknown or has no open loans.
    #[must_use]
    pub fn loans(&self, id: &BookId) -> &[PersonId] {
        self.loans.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// All books, in the order they were added.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Number of registered books.
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Number of registered people.
    #[must_use]
    pub fn person_count(&self) -> usize {
        self.people.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_id(s: &str) -> BookId {
        BookId::new(s).unwrap()
    }

    fn person_id(s: &str) -> PersonId {
        PersonId::new(s).unwrap()
    }

    /// Registry with "Dune" (978-1, 2 copies) and people p1, p2.
    fn dune_registry() -> LendingRegistry {
        let mut registry = LendingRegistry::new();
        registry
            .add_book("Dune", "Frank Herbert", book_id("978-1"), 2)
            .unwrap();
        registry.register_person(person_id("p1"), "Paul").unwrap();
        registry.register_person(person_id("p2"), "Chani").unwrap();
        registry
    }

    fn assert_invariants(registry: &LendingRegistry) {
        for book in registry.books() {
            assert!(book.available_copies() <= book.total_copies());
            let outstanding = book.total_copies() - book.available_copies();
            assert_eq!(registry.loans(book.id()).len() as u64, outstanding);
        }
    }

    #[test]
    fn add_book_then_details() {
        let mut registry = LendingRegistry::new();
        let msg = registry
            .add_book("Dune", "Frank Herbert", book_id("978-1"), 2)
            .unwrap();
        assert_eq!(msg, "Book Dune added successfully");

        let details = registry.get_book_details(&book_id("978-1")).unwrap();
        assert_eq!(details, "Book \"Dune\" by Frank Herbert is Available.");
        assert_invariants(&registry);
    }

    #[test]
    fn duplicate_add_keeps_first_book() {
        let mut registry = dune_registry();
        let err = registry
            .add_book("Other", "Someone", book_id("978-1"), 9)
            .unwrap_err();
        assert_eq!(err, LendingError::BookExists);

        let book = registry.book(&book_id("978-1")).unwrap();
        assert_eq!(book.title(), "Dune");
        assert_eq!(book.total_copies(), 2);
        assert_eq!(registry.book_count(), 1);
    }

    #[test]
    fn issue_same_person_twice_until_empty() {
        let mut registry = dune_registry();
        let id = book_id("978-1");
        let p1 = person_id("p1");

        let msg = registry.issue_book(&id, &p1).unwrap();
        assert_eq!(msg, "Book 978-1 issued to p1");
        assert_eq!(registry.book(&id).unwrap().available_copies(), 1);

        registry.issue_book(&id, &p1).unwrap();
        assert_eq!(registry.book(&id).unwrap().available_copies(), 0);
        assert_eq!(registry.loans(&id), &[p1.clone(), p1.clone()]);

        let err = registry.issue_book(&id, &p1).unwrap_err();
        assert_eq!(err.to_string(), "Book not available for issue.");
        assert_invariants(&registry);
    }

    #[test]
    fn issue_unknown_book_or_person() {
        let mut registry = dune_registry();
        assert_eq!(
            registry.issue_book(&book_id("nope"), &person_id("p1")),
            Err(LendingError::BookNotFound)
        );
        assert_eq!(
            registry.issue_book(&book_id("978-1"), &person_id("ghost")),
            Err(LendingError::PersonNotFound)
        );
        assert_eq!(registry.book(&book_id("978-1")).unwrap().available_copies(), 2);
        assert!(registry.loans(&book_id("978-1")).is_empty());
    }

    #[test]
    fn issue_then_return_round_trip() {
        let mut registry = dune_registry();
        let id = book_id("978-1");
        let p1 = person_id("p1");

        registry.issue_book(&id, &p1).unwrap();
        let msg = registry.return_book(&id, &p1).unwrap();
        assert_eq!(msg, "Book 978-1 returned by p1");

        let book = registry.book(&id).unwrap();
        assert_eq!(book.available_copies(), 2);
        assert!(registry.loans(&id).is_empty());
        // Reader history is append-only.
        assert_eq!(book.readers(), &[p1]);
        assert_invariants(&registry);
    }

    #[test]
    fn return_removes_single_occurrence() {
        let mut registry = dune_registry();
        let id = book_id("978-1");
        let p1 = person_id("p1");

        registry.issue_book(&id, &p1).unwrap();
        registry.issue_book(&id, &p1).unwrap();
        registry.return_book(&id, &p1).unwrap();

        assert_eq!(registry.loans(&id), &[p1.clone()]);
        assert_eq!(registry.book(&id).unwrap().available_copies(), 1);
        assert_eq!(registry.book(&id).unwrap().readers().len(), 2);
        assert_invariants(&registry);
    }

    #[test]
    fn return_not_issued() {
        let mut registry = dune_registry();
        let id = book_id("978-1");

        // No loan entry at all.
        assert_eq!(
            registry.return_book(&id, &person_id("p2")),
            Err(LendingError::NotIssued)
        );

        // Loan entry exists but for someone else.
        registry.issue_book(&id, &person_id("p1")).unwrap();
        let err = registry.return_book(&id, &person_id("p2")).unwrap_err();
        assert_eq!(err.to_string(), "This book was not issued to the given person.");
        assert_eq!(registry.book(&id).unwrap().available_copies(), 1);
        assert_invariants(&registry);
    }

    #[test]
    fn return_unknown_book() {
        let mut registry = dune_registry();
        assert_eq!(
            registry.return_book(&book_id("nope"), &person_id("p1")),
            Err(LendingError::BookNotFound)
        );
    }

    #[test]
    fn increment_copies_restores_availability() {
        let mut registry = dune_registry();
        let id = book_id("978-1");
        registry.issue_book(&id, &person_id("p1")).unwrap();
        registry.issue_book(&id, &person_id("p2")).unwrap();
        assert_eq!(
            registry.get_book_details(&id).unwrap(),
            "Book \"Dune\" by Frank Herbert is Not Available."
        );

        let msg = registry.increment_book_copies(&id, 3).unwrap();
        assert_eq!(msg, "Added 3 copies to book 978-1");

        let book = registry.book(&id).unwrap();
        assert_eq!(book.total_copies(), 5);
        assert_eq!(book.available_copies(), 3);
        assert!(registry.get_book_details(&id).unwrap().ends_with("is Available."));
        assert_invariants(&registry);
    }

    #[test]
    fn increment_unknown_book() {
        let mut registry = LendingRegistry::new();
        assert_eq!(
            registry.increment_book_copies(&book_id("nope"), 1),
            Err(LendingError::BookNotFound)
        );
    }

    #[test]
    fn increment_overflow_is_refused() {
        let mut registry = dune_registry();
        let id = book_id("978-1");
        assert_eq!(
            registry.increment_book_copies(&id, u64::MAX),
            Err(LendingError::CopyCountOverflow)
        );
        assert_eq!(registry.book(&id).unwrap().total_copies(), 2);
    }

    #[test]
    fn details_unknown_book() {
        let registry = LendingRegistry::new();
        let err = registry.get_book_details(&book_id("unknown-isbn")).unwrap_err();
        assert_eq!(err.to_string(), "Book not found.");
    }

    #[test]
    fn zero_copy_book_is_not_available() {
        let mut registry = dune_registry();
        let id = book_id("978-0");
        registry.add_book("Empty", "Nobody", id.clone(), 0).unwrap();
        assert_eq!(
            registry.issue_book(&id, &person_id("p1")),
            Err(LendingError::BookUnavailable)
        );
        assert!(registry.get_book_details(&id).unwrap().ends_with("Not Available."));
    }

    #[test]
    fn register_duplicate_person() {
        let mut registry = dune_registry();
        assert_eq!(
            registry.register_person(person_id("p1"), "Someone else"),
            Err(LendingError::PersonExists)
        );
        assert_eq!(registry.person(&person_id("p1")).unwrap().name(), "Paul");
        assert_eq!(registry.person_count(), 2);
    }
}
