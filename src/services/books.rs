//! Book use-cases

use std::sync::Arc;

use async_trait::async_trait;

use super::UseCase;
use crate::{
    error::AppResult,
    models::{
        book::{parse_published_year, CreateBookRequest, UpdateBookRequest},
        new_id, Book, Page, PaginatedQuery,
    },
    repository::{BookRepository, Repository},
};

/// Books written by one author
#[derive(Debug, Clone)]
pub struct GetBooksByAuthorRequest {
    pub author: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub struct CreateBookUseCase {
    books: Arc<dyn BookRepository>,
}

impl CreateBookUseCase {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl UseCase<CreateBookRequest, Book> for CreateBookUseCase {
    async fn execute(&self, request: CreateBookRequest) -> AppResult<Book> {
        let book = Book::create(new_id(), request.title, request.author, request.file_name)?
            .favorite(request.is_favorite.unwrap_or(false))
            .published_in(parse_published_year(request.published_year.as_deref()))
            .with_cover(request.cover_image_file_name)
            .with_summary(request.summary);

        let created = self.books.create(&book).await?;
        tracing::info!(book_id = %created.id, title = %created.title, "Book created");
        Ok(created)
    }
}

pub struct GetBookByIdUseCase {
    books: Arc<dyn BookRepository>,
}

impl GetBookByIdUseCase {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl UseCase<String, Book> for GetBookByIdUseCase {
    async fn execute(&self, id: String) -> AppResult<Book> {
        self.books.find_by_id(&id).await
    }
}

pub struct GetBooksUseCase {
    books: Arc<dyn BookRepository>,
}

impl GetBooksUseCase {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl UseCase<PaginatedQuery, Page<Book>> for GetBooksUseCase {
    async fn execute(&self, query: PaginatedQuery) -> AppResult<Page<Book>> {
        self.books.find_all(query.limit, query.offset).await
    }
}

pub struct GetFavoriteBooksUseCase {
    books: Arc<dyn BookRepository>,
}

impl GetFavoriteBooksUseCase {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl UseCase<PaginatedQuery, Page<Book>> for GetFavoriteBooksUseCase {
    async fn execute(&self, query: PaginatedQuery) -> AppResult<Page<Book>> {
        self.books.find_favorites(query.limit, query.offset).await
    }
}

pub struct GetBooksByAuthorUseCase {
    books: Arc<dyn BookRepository>,
}

impl GetBooksByAuthorUseCase {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl UseCase<GetBooksByAuthorRequest, Page<Book>> for GetBooksByAuthorUseCase {
    async fn execute(&self, request: GetBooksByAuthorRequest) -> AppResult<Page<Book>> {
        self.books
            .find_by_author(&request.author, request.limit, request.offset)
            .await
    }
}

pub struct UpdateBookUseCase {
    books: Arc<dyn BookRepository>,
}

impl UpdateBookUseCase {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl UseCase<UpdateBookRequest, Book> for UpdateBookUseCase {
    async fn execute(&self, request: UpdateBookRequest) -> AppResult<Book> {
        let current = self.books.find_by_id(&request.id).await?;

        let book = Book::create(
            current.id,
            request.title.unwrap_or(current.title),
            request.author.unwrap_or(current.author),
            current.file_name,
        )?
        .favorite(request.is_favorite.unwrap_or(current.is_favorite))
        .published_in(request.published_year.unwrap_or(current.published_year))
        .with_cover(
            request
                .cover_image_file_name
                .unwrap_or(current.cover_image_file_name),
        )
        .with_summary(request.summary.unwrap_or(current.summary));

        self.books.update(&request.id, &book).await
    }
}

/// Deletes the book record together with its uploaded files
pub struct DeleteBookUseCase {
    books: Arc<dyn BookRepository>,
}

impl DeleteBookUseCase {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl UseCase<String, Book> for DeleteBookUseCase {
    async fn execute(&self, id: String) -> AppResult<Book> {
        let deleted = self.books.delete(&id).await?;
        tracing::info!(book_id = %deleted.id, "Book deleted");
        Ok(deleted)
    }
}

#[derive(Clone)]
pub struct BookUseCases {
    pub create: Arc<CreateBookUseCase>,
    pub get_by_id: Arc<GetBookByIdUseCase>,
    pub list: Arc<GetBooksUseCase>,
    pub favorites: Arc<GetFavoriteBooksUseCase>,
    pub by_author: Arc<GetBooksByAuthorUseCase>,
    pub update: Arc<UpdateBookUseCase>,
    pub delete: Arc<DeleteBookUseCase>,
}

impl BookUseCases {
    pub fn new(repository: &Repository) -> Self {
        let books = &repository.books;
        Self {
            create: Arc::new(CreateBookUseCase::new(books.clone())),
            get_by_id: Arc::new(GetBookByIdUseCase::new(books.clone())),
            list: Arc::new(GetBooksUseCase::new(books.clone())),
            favorites: Arc::new(GetFavoriteBooksUseCase::new(books.clone())),
            by_author: Arc::new(GetBooksByAuthorUseCase::new(books.clone())),
            update: Arc::new(UpdateBookUseCase::new(books.clone())),
            delete: Arc::new(DeleteBookUseCase::new(books.clone())),
        }
    }
}
