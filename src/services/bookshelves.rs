//! Book shelf use-cases

use std::sync::Arc;

use async_trait::async_trait;

use super::UseCase;
use crate::{
    error::{AppError, AppResult},
    models::{
        bookshelf::{
            AddBookToBookShelfRequest, CreateBookShelfRequest, RemoveBookFromBookShelfRequest,
            UpdateBookShelfRequest,
        },
        new_id, Book, BookShelf, Page, PaginatedQuery,
    },
    repository::{BookRepository, BookShelfRepository, Repository},
};

/// Page through the books of one shelf
#[derive(Debug, Clone)]
pub struct GetBookShelfBooksRequest {
    pub book_shelf_id: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Fails with `AlreadyExists` when a shelf other than `own_id` uses `title`.
/// Only a not-found lookup means the title is free.
async fn ensure_title_free(
    book_shelves: &dyn BookShelfRepository,
    title: &str,
    own_id: Option<&str>,
) -> AppResult<()> {
    match book_shelves.find_by_title(title).await {
        Ok(existing) if Some(existing.id.as_str()) == own_id => Ok(()),
        Ok(_) => Err(AppError::AlreadyExists(format!(
            "A bookshelf titled '{}' already exists",
            title
        ))),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e),
    }
}

pub struct CreateBookShelfUseCase {
    book_shelves: Arc<dyn BookShelfRepository>,
}

impl CreateBookShelfUseCase {
    pub fn new(book_shelves: Arc<dyn BookShelfRepository>) -> Self {
        Self { book_shelves }
    }
}

#[async_trait]
impl UseCase<CreateBookShelfRequest, BookShelf> for CreateBookShelfUseCase {
    async fn execute(&self, request: CreateBookShelfRequest) -> AppResult<BookShelf> {
        let book_shelf = BookShelf::create(new_id(), request.title, Vec::new())?;

        ensure_title_free(self.book_shelves.as_ref(), &book_shelf.title, None).await?;

        let created = self.book_shelves.create(&book_shelf).await?;
        tracing::info!(book_shelf_id = %created.id, title = %created.title, "Book shelf created");
        Ok(created)
    }
}

pub struct GetBookShelfByIdUseCase {
    book_shelves: Arc<dyn BookShelfRepository>,
}

impl GetBookShelfByIdUseCase {
    pub fn new(book_shelves: Arc<dyn BookShelfRepository>) -> Self {
        Self { book_shelves }
    }
}

#[async_trait]
impl UseCase<String, BookShelf> for GetBookShelfByIdUseCase {
    async fn execute(&self, id: String) -> AppResult<BookShelf> {
        self.book_shelves.find_by_id(&id).await
    }
}

pub struct GetBookShelvesUseCase {
    book_shelves: Arc<dyn BookShelfRepository>,
}

impl GetBookShelvesUseCase {
    pub fn new(book_shelves: Arc<dyn BookShelfRepository>) -> Self {
        Self { book_shelves }
    }
}

#[async_trait]
impl UseCase<PaginatedQuery, Page<BookShelf>> for GetBookShelvesUseCase {
    async fn execute(&self, query: PaginatedQuery) -> AppResult<Page<BookShelf>> {
        self.book_shelves.find_all(query.limit, query.offset).await
    }
}

pub struct UpdateBookShelfUseCase {
    book_shelves: Arc<dyn BookShelfRepository>,
}

impl UpdateBookShelfUseCase {
    pub fn new(book_shelves: Arc<dyn BookShelfRepository>) -> Self {
        Self { book_shelves }
    }
}

#[async_trait]
impl UseCase<UpdateBookShelfRequest, BookShelf> for UpdateBookShelfUseCase {
    async fn execute(&self, request: UpdateBookShelfRequest) -> AppResult<BookShelf> {
        let current = self.book_shelves.find_by_id(&request.id).await?;
        let renamed = request.title.as_ref().is_some_and(|t| *t != current.title);

        let book_shelf = BookShelf::create(
            current.id,
            request.title.unwrap_or(current.title),
            current.books,
        )?;

        if renamed {
            ensure_title_free(
                self.book_shelves.as_ref(),
                &book_shelf.title,
                Some(book_shelf.id.as_str()),
            )
            .await?;
        }

        self.book_shelves.update(&request.id, &book_shelf).await
    }
}

pub struct DeleteBookShelfUseCase {
    book_shelves: Arc<dyn BookShelfRepository>,
}

impl DeleteBookShelfUseCase {
    pub fn new(book_shelves: Arc<dyn BookShelfRepository>) -> Self {
        Self { book_shelves }
    }
}

#[async_trait]
impl UseCase<String, BookShelf> for DeleteBookShelfUseCase {
    async fn execute(&self, id: String) -> AppResult<BookShelf> {
        let deleted = self.book_shelves.delete(&id).await?;
        tracing::info!(book_shelf_id = %deleted.id, "Book shelf deleted");
        Ok(deleted)
    }
}

/// Idempotent: adding a book already on the shelf returns the shelf untouched
pub struct AddBookToBookShelfUseCase {
    book_shelves: Arc<dyn BookShelfRepository>,
    books: Arc<dyn BookRepository>,
}

impl AddBookToBookShelfUseCase {
    pub fn new(book_shelves: Arc<dyn BookShelfRepository>, books: Arc<dyn BookRepository>) -> Self {
        Self { book_shelves, books }
    }
}

#[async_trait]
impl UseCase<AddBookToBookShelfRequest, BookShelf> for AddBookToBookShelfUseCase {
    async fn execute(&self, request: AddBookToBookShelfRequest) -> AppResult<BookShelf> {
        let book_shelf = self.book_shelves.find_by_id(&request.book_shelf_id).await?;
        if book_shelf.contains_book(&request.book_id) {
            return Ok(book_shelf);
        }

        self.books.find_by_id(&request.book_id).await?;

        self.book_shelves
            .add_book(&request.book_shelf_id, &request.book_id)
            .await?;
        tracing::debug!(
            book_shelf_id = %request.book_shelf_id,
            book_id = %request.book_id,
            "Book added to shelf"
        );

        // The add is not rolled back if this read fails
        self.book_shelves.find_by_id(&request.book_shelf_id).await
    }
}

/// Idempotent: removing a book that is not on the shelf returns the shelf untouched
pub struct RemoveBookFromBookShelfUseCase {
    book_shelves: Arc<dyn BookShelfRepository>,
}

impl RemoveBookFromBookShelfUseCase {
    pub fn new(book_shelves: Arc<dyn BookShelfRepository>) -> Self {
        Self { book_shelves }
    }
}

#[async_trait]
impl UseCase<RemoveBookFromBookShelfRequest, BookShelf> for RemoveBookFromBookShelfUseCase {
    async fn execute(&self, request: RemoveBookFromBookShelfRequest) -> AppResult<BookShelf> {
        let book_shelf = self.book_shelves.find_by_id(&request.book_shelf_id).await?;
        if !book_shelf.contains_book(&request.book_id) {
            return Ok(book_shelf);
        }

        self.book_shelves
            .remove_book(&request.book_shelf_id, &request.book_id)
            .await?;
        tracing::debug!(
            book_shelf_id = %request.book_shelf_id,
            book_id = %request.book_id,
            "Book removed from shelf"
        );

        self.book_shelves.find_by_id(&request.book_shelf_id).await
    }
}

/// Shelves containing a given book
pub struct GetBookShelvesByBookUseCase {
    book_shelves: Arc<dyn BookShelfRepository>,
}

impl GetBookShelvesByBookUseCase {
    pub fn new(book_shelves: Arc<dyn BookShelfRepository>) -> Self {
        Self { book_shelves }
    }
}

#[async_trait]
impl UseCase<String, Vec<BookShelf>> for GetBookShelvesByBookUseCase {
    async fn execute(&self, book_id: String) -> AppResult<Vec<BookShelf>> {
        self.book_shelves.find_by_book_id(&book_id).await
    }
}

pub struct GetBookShelfBooksUseCase {
    book_shelves: Arc<dyn BookShelfRepository>,
    books: Arc<dyn BookRepository>,
}

impl GetBookShelfBooksUseCase {
    pub fn new(book_shelves: Arc<dyn BookShelfRepository>, books: Arc<dyn BookRepository>) -> Self {
        Self { book_shelves, books }
    }
}

#[async_trait]
impl UseCase<GetBookShelfBooksRequest, Page<Book>> for GetBookShelfBooksUseCase {
    async fn execute(&self, request: GetBookShelfBooksRequest) -> AppResult<Page<Book>> {
        let book_shelf = self.book_shelves.find_by_id(&request.book_shelf_id).await?;
        self.books
            .find_by_book_shelf(&book_shelf, request.limit, request.offset)
            .await
    }
}

#[derive(Clone)]
pub struct BookShelfUseCases {
    pub create: Arc<CreateBookShelfUseCase>,
    pub get_by_id: Arc<GetBookShelfByIdUseCase>,
    pub list: Arc<GetBookShelvesUseCase>,
    pub update: Arc<UpdateBookShelfUseCase>,
    pub delete: Arc<DeleteBookShelfUseCase>,
    pub add_book: Arc<AddBookToBookShelfUseCase>,
    pub remove_book: Arc<RemoveBookFromBookShelfUseCase>,
    pub by_book: Arc<GetBookShelvesByBookUseCase>,
    pub books: Arc<GetBookShelfBooksUseCase>,
}

impl BookShelfUseCases {
    pub fn new(repository: &Repository) -> Self {
        let shelves = &repository.book_shelves;
        let books = &repository.books;
        Self {
            create: Arc::new(CreateBookShelfUseCase::new(shelves.clone())),
            get_by_id: Arc::new(GetBookShelfByIdUseCase::new(shelves.clone())),
            list: Arc::new(GetBookShelvesUseCase::new(shelves.clone())),
            update: Arc::new(UpdateBookShelfUseCase::new(shelves.clone())),
            delete: Arc::new(DeleteBookShelfUseCase::new(shelves.clone())),
            add_book: Arc::new(AddBookToBookShelfUseCase::new(shelves.clone(), books.clone())),
            remove_book: Arc::new(RemoveBookFromBookShelfUseCase::new(shelves.clone())),
            by_book: Arc::new(GetBookShelvesByBookUseCase::new(shelves.clone())),
            books: Arc::new(GetBookShelfBooksUseCase::new(shelves.clone(), books.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{books::MockBookRepository, bookshelves::MockBookShelfRepository};

    fn book(id: &str) -> Book {
        Book::create(id, format!("Book {}", id), "Author", format!("{}.epub", id)).unwrap()
    }

    fn shelf(books: Vec<Book>) -> BookShelf {
        BookShelf::create("shelf-1", "Favorites", books).unwrap()
    }

    fn add_request(book_id: &str) -> AddBookToBookShelfRequest {
        AddBookToBookShelfRequest {
            book_shelf_id: "shelf-1".into(),
            book_id: book_id.into(),
        }
    }

    fn remove_request(book_id: &str) -> RemoveBookFromBookShelfRequest {
        RemoveBookFromBookShelfRequest {
            book_shelf_id: "shelf-1".into(),
            book_id: book_id.into(),
        }
    }

    #[tokio::test]
    async fn test_add_book_already_member_short_circuits() {
        let current = shelf(vec![book("b-1")]);
        let returned = current.clone();

        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(returned.clone()));
        shelves.expect_add_book().never();
        let mut books = MockBookRepository::new();
        books.expect_find_by_id().never();

        let use_case = AddBookToBookShelfUseCase::new(Arc::new(shelves), Arc::new(books));
        assert_eq!(use_case.execute(add_request("b-1")).await.unwrap(), current);
    }

    #[tokio::test]
    async fn test_add_book_missing_shelf_propagates() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_id()
            .returning(|_| Err(AppError::BookShelfNotFound));
        shelves.expect_add_book().never();
        let mut books = MockBookRepository::new();
        books.expect_find_by_id().never();

        let use_case = AddBookToBookShelfUseCase::new(Arc::new(shelves), Arc::new(books));
        assert_eq!(
            use_case.execute(add_request("b-1")).await.unwrap_err(),
            AppError::BookShelfNotFound
        );
    }

    #[tokio::test]
    async fn test_add_book_missing_book_propagates() {
        let mut shelves = MockBookShelfRepository::new();
        shelves.expect_find_by_id().returning(|_| Ok(shelf(vec![])));
        shelves.expect_add_book().never();
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .withf(|id| id == "b-9")
            .returning(|_| Err(AppError::BookNotFound));

        let use_case = AddBookToBookShelfUseCase::new(Arc::new(shelves), Arc::new(books));
        assert_eq!(
            use_case.execute(add_request("b-9")).await.unwrap_err(),
            AppError::BookNotFound
        );
    }

    #[tokio::test]
    async fn test_add_book_adds_and_refetches() {
        let mut shelves = MockBookShelfRepository::new();
        let mut seq = mockall::Sequence::new();
        shelves
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(shelf(vec![])));
        shelves
            .expect_add_book()
            .withf(|shelf_id, book_id| shelf_id == "shelf-1" && book_id == "b-2")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        shelves
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(shelf(vec![book("b-2")])));

        let mut books = MockBookRepository::new();
        books.expect_find_by_id().times(1).returning(|_| Ok(book("b-2")));

        let use_case = AddBookToBookShelfUseCase::new(Arc::new(shelves), Arc::new(books));
        let updated = use_case.execute(add_request("b-2")).await.unwrap();
        assert!(updated.contains_book("b-2"));
    }

    #[tokio::test]
    async fn test_add_book_add_failure_propagates() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(shelf(vec![])));
        shelves
            .expect_add_book()
            .returning(|_, _| Err(AppError::Unexpected("insert failed".into())));
        let mut books = MockBookRepository::new();
        books.expect_find_by_id().returning(|_| Ok(book("b-2")));

        let use_case = AddBookToBookShelfUseCase::new(Arc::new(shelves), Arc::new(books));
        assert_eq!(
            use_case.execute(add_request("b-2")).await.unwrap_err(),
            AppError::Unexpected("insert failed".into())
        );
    }

    #[tokio::test]
    async fn test_add_book_refetch_failure_is_surfaced() {
        let mut shelves = MockBookShelfRepository::new();
        let mut seq = mockall::Sequence::new();
        shelves
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(shelf(vec![])));
        shelves
            .expect_add_book()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        shelves
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::Unexpected("read timeout".into())));

        let mut books = MockBookRepository::new();
        books.expect_find_by_id().returning(|_| Ok(book("b-2")));

        let use_case = AddBookToBookShelfUseCase::new(Arc::new(shelves), Arc::new(books));
        assert_eq!(
            use_case.execute(add_request("b-2")).await.unwrap_err(),
            AppError::Unexpected("read timeout".into())
        );
    }

    #[tokio::test]
    async fn test_remove_book_not_member_short_circuits() {
        let current = shelf(vec![book("b-1")]);
        let returned = current.clone();

        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(returned.clone()));
        shelves.expect_remove_book().never();

        let use_case = RemoveBookFromBookShelfUseCase::new(Arc::new(shelves));
        assert_eq!(use_case.execute(remove_request("b-7")).await.unwrap(), current);
    }

    #[tokio::test]
    async fn test_remove_book_removes_and_refetches() {
        let mut shelves = MockBookShelfRepository::new();
        let mut seq = mockall::Sequence::new();
        shelves
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(shelf(vec![book("b-1"), book("b-2")])));
        shelves
            .expect_remove_book()
            .withf(|shelf_id, book_id| shelf_id == "shelf-1" && book_id == "b-1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        shelves
            .expect_find_by_id()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(shelf(vec![book("b-2")])));

        let use_case = RemoveBookFromBookShelfUseCase::new(Arc::new(shelves));
        let updated = use_case.execute(remove_request("b-1")).await.unwrap();
        assert!(!updated.contains_book("b-1"));
        assert!(updated.contains_book("b-2"));
    }

    #[tokio::test]
    async fn test_remove_book_missing_shelf_propagates() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_id()
            .returning(|_| Err(AppError::BookShelfNotFound));
        shelves.expect_remove_book().never();

        let use_case = RemoveBookFromBookShelfUseCase::new(Arc::new(shelves));
        assert_eq!(
            use_case.execute(remove_request("b-1")).await.unwrap_err(),
            AppError::BookShelfNotFound
        );
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_title() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_title()
            .withf(|title| title == "Favorites")
            .returning(|_| Ok(shelf(vec![])));
        shelves.expect_create().never();

        let use_case = CreateBookShelfUseCase::new(Arc::new(shelves));
        let err = use_case
            .execute(CreateBookShelfRequest {
                title: "Favorites".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_create_new_title() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_title()
            .returning(|_| Err(AppError::BookShelfNotFound));
        shelves
            .expect_create()
            .withf(|s| s.title == "To Read" && !s.id.is_empty() && s.books.is_empty())
            .times(1)
            .returning(|s| Ok(s.clone()));

        let use_case = CreateBookShelfUseCase::new(Arc::new(shelves));
        let created = use_case
            .execute(CreateBookShelfRequest {
                title: "To Read".into(),
            })
            .await
            .unwrap();
        assert_eq!(created.title, "To Read");
    }

    #[tokio::test]
    async fn test_create_propagates_lookup_failure() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_title()
            .returning(|_| Err(AppError::Unexpected("db down".into())));
        shelves.expect_create().never();

        let use_case = CreateBookShelfUseCase::new(Arc::new(shelves));
        let err = use_case
            .execute(CreateBookShelfRequest {
                title: "To Read".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, AppError::Unexpected("db down".into()));
    }

    #[tokio::test]
    async fn test_update_renames_and_keeps_books() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_id()
            .returning(|_| Ok(shelf(vec![book("b-1")])));
        shelves
            .expect_find_by_title()
            .withf(|title| title == "Renamed")
            .returning(|_| Err(AppError::BookShelfNotFound));
        shelves
            .expect_update()
            .withf(|id, s| id == "shelf-1" && s.title == "Renamed" && s.contains_book("b-1"))
            .times(1)
            .returning(|_, s| Ok(s.clone()));

        let use_case = UpdateBookShelfUseCase::new(Arc::new(shelves));
        let updated = use_case
            .execute(UpdateBookShelfRequest {
                id: "shelf-1".into(),
                title: Some("Renamed".into()),
            })
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
    }

    #[tokio::test]
    async fn test_update_rename_to_taken_title_is_conflict() {
        let mut shelves = MockBookShelfRepository::new();
        shelves.expect_find_by_id().returning(|_| Ok(shelf(vec![])));
        shelves
            .expect_find_by_title()
            .withf(|title| title == "To Read")
            .returning(|_| Ok(BookShelf::create("shelf-2", "To Read", vec![]).unwrap()));
        shelves.expect_update().never();

        let use_case = UpdateBookShelfUseCase::new(Arc::new(shelves));
        let err = use_case
            .execute(UpdateBookShelfRequest {
                id: "shelf-1".into(),
                title: Some("To Read".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_update_same_title_skips_lookup() {
        let mut shelves = MockBookShelfRepository::new();
        shelves.expect_find_by_id().returning(|_| Ok(shelf(vec![])));
        shelves.expect_find_by_title().never();
        shelves
            .expect_update()
            .times(1)
            .returning(|_, s| Ok(s.clone()));

        let use_case = UpdateBookShelfUseCase::new(Arc::new(shelves));
        tokio_test::assert_ok!(
            use_case
                .execute(UpdateBookShelfRequest {
                    id: "shelf-1".into(),
                    title: Some("Favorites".into()),
                })
                .await
        );
    }

    #[tokio::test]
    async fn test_update_title_lookup_failure_propagates() {
        let mut shelves = MockBookShelfRepository::new();
        shelves.expect_find_by_id().returning(|_| Ok(shelf(vec![])));
        shelves
            .expect_find_by_title()
            .returning(|_| Err(AppError::Unexpected("connection reset".into())));
        shelves.expect_update().never();

        let use_case = UpdateBookShelfUseCase::new(Arc::new(shelves));
        let err = use_case
            .execute(UpdateBookShelfRequest {
                id: "shelf-1".into(),
                title: Some("To Read".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_update_missing_shelf_never_updates() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_id()
            .returning(|_| Err(AppError::BookShelfNotFound));
        shelves.expect_update().never();

        let use_case = UpdateBookShelfUseCase::new(Arc::new(shelves));
        let err = use_case
            .execute(UpdateBookShelfRequest {
                id: "missing".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err, AppError::BookShelfNotFound);
    }

    #[tokio::test]
    async fn test_get_books_passes_full_shelf() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_id()
            .returning(|_| Ok(shelf(vec![book("b-1"), book("b-2")])));
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_book_shelf()
            .withf(|s, limit, offset| {
                s.id == "shelf-1" && s.books.len() == 2 && *limit == Some(1) && offset.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(Page::new(vec![book("b-1")], 1, 0, 2)));

        let use_case = GetBookShelfBooksUseCase::new(Arc::new(shelves), Arc::new(books));
        let page = use_case
            .execute(GetBookShelfBooksRequest {
                book_shelf_id: "shelf-1".into(),
                limit: Some(1),
                offset: None,
            })
            .await
            .unwrap();
        assert_eq!(page.next_cursor, Some(1));
    }

    #[tokio::test]
    async fn test_get_books_missing_shelf_skips_query() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_id()
            .returning(|_| Err(AppError::BookShelfNotFound));
        let mut books = MockBookRepository::new();
        books.expect_find_by_book_shelf().never();

        let use_case = GetBookShelfBooksUseCase::new(Arc::new(shelves), Arc::new(books));
        let err = use_case
            .execute(GetBookShelfBooksRequest {
                book_shelf_id: "missing".into(),
                limit: None,
                offset: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, AppError::BookShelfNotFound);
    }

    #[tokio::test]
    async fn test_by_book_and_delete_delegate() {
        let mut shelves = MockBookShelfRepository::new();
        shelves
            .expect_find_by_book_id()
            .withf(|id| id == "b-1")
            .returning(|_| Ok(vec![shelf(vec![book("b-1")])]));
        shelves
            .expect_delete()
            .withf(|id| id == "shelf-1")
            .times(1)
            .returning(|_| Ok(shelf(vec![])));
        let shelves: Arc<dyn BookShelfRepository> = Arc::new(shelves);

        let containing = GetBookShelvesByBookUseCase::new(shelves.clone())
            .execute("b-1".into())
            .await
            .unwrap();
        assert_eq!(containing.len(), 1);

        let deleted = DeleteBookShelfUseCase::new(shelves)
            .execute("shelf-1".into())
            .await
            .unwrap();
        assert_eq!(deleted.id, "shelf-1");
    }
}
