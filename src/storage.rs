//! Uploaded file storage (book files and cover images)

use std::path::{Component, Path, PathBuf};

use crate::{error::AppResult, models::Book};

const BOOKS_DIR: &str = "books";
const COVERS_DIR: &str = "cover-images";

/// True when `name` is a single path segment, so joining it under an upload
/// directory cannot leave that directory
pub fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    uploads_directory: PathBuf,
}

impl FileStorage {
    pub fn new(uploads_directory: impl Into<PathBuf>) -> Self {
        Self {
            uploads_directory: uploads_directory.into(),
        }
    }

    pub fn book_path(&self, file_name: &str) -> PathBuf {
        self.uploads_directory.join(BOOKS_DIR).join(file_name)
    }

    pub fn cover_path(&self, file_name: &str) -> PathBuf {
        self.uploads_directory.join(COVERS_DIR).join(file_name)
    }

    /// Remove the e-book file and cover image of `book`, skipping files that do not exist
    ///
    /// Names that are not a single path segment are never touched.
    pub async fn remove_book_files(&self, book: &Book) -> AppResult<()> {
        if !book.file_name.is_empty() {
            self.remove_stored(BOOKS_DIR, &book.file_name).await?;
        }
        if let Some(cover) = book.cover_image_file_name.as_deref().filter(|c| !c.is_empty()) {
            self.remove_stored(COVERS_DIR, cover).await?;
        }
        Ok(())
    }

    async fn remove_stored(&self, dir: &str, file_name: &str) -> AppResult<()> {
        if !is_plain_file_name(file_name) {
            tracing::warn!("Refusing to remove {:?} outside {}", file_name, dir);
            return Ok(());
        }
        remove_if_exists(&self.uploads_directory.join(dir).join(file_name)).await
    }
}

async fn remove_if_exists(path: &Path) -> AppResult<()> {
    if tokio::fs::try_exists(path).await? {
        tokio::fs::remove_file(path).await?;
        tracing::debug!("Removed {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book_with_cover(cover: Option<&str>) -> Book {
        Book::create("book-1", "Title", "Author", "book.epub")
            .unwrap()
            .with_cover(cover.map(str::to_string))
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("book.epub"));
        assert!(is_plain_file_name("cover image.jpg"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name("."));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../book.epub"));
        assert!(!is_plain_file_name("books/book.epub"));
        assert!(!is_plain_file_name("/etc/passwd"));
    }

    #[tokio::test]
    async fn test_absolute_file_name_is_not_removed() {
        let uploads = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let victim = outside.path().join("keep.epub");
        std::fs::write(&victim, b"epub").unwrap();
        let storage = FileStorage::new(uploads.path());

        let book = Book::create("book-1", "Title", "Author", victim.to_str().unwrap())
            .unwrap()
            .with_cover(Some(victim.to_str().unwrap().to_string()));
        storage.remove_book_files(&book).await.unwrap();

        assert!(victim.exists());
    }

    #[tokio::test]
    async fn test_parent_relative_file_name_is_not_removed() {
        let root = tempfile::tempdir().unwrap();
        let uploads = root.path().join("uploads");
        std::fs::create_dir_all(uploads.join("books")).unwrap();
        std::fs::create_dir_all(uploads.join("cover-images")).unwrap();
        let victim = root.path().join("config.toml");
        std::fs::write(&victim, b"secret").unwrap();
        let storage = FileStorage::new(&uploads);

        let book = Book::create("book-1", "Title", "Author", "../../config.toml")
            .unwrap()
            .with_cover(Some("../../config.toml".into()));
        storage.remove_book_files(&book).await.unwrap();

        assert!(victim.exists());
    }

    #[tokio::test]
    async fn test_removes_book_and_cover() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::create_dir_all(dir.path().join("books")).unwrap();
        std::fs::create_dir_all(dir.path().join("cover-images")).unwrap();
        std::fs::write(storage.book_path("book.epub"), b"epub").unwrap();
        std::fs::write(storage.cover_path("cover.jpg"), b"jpg").unwrap();

        storage
            .remove_book_files(&book_with_cover(Some("cover.jpg")))
            .await
            .unwrap();

        assert!(!storage.book_path("book.epub").exists());
        assert!(!storage.cover_path("cover.jpg").exists());
    }

    #[tokio::test]
    async fn test_missing_files_are_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let result = storage.remove_book_files(&book_with_cover(Some("gone.jpg"))).await;
        tokio_test::assert_ok!(result);
    }

    #[tokio::test]
    async fn test_cover_left_alone_when_book_has_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::create_dir_all(dir.path().join("cover-images")).unwrap();
        std::fs::write(storage.cover_path("other.jpg"), b"jpg").unwrap();

        storage.remove_book_files(&book_with_cover(None)).await.unwrap();

        assert!(storage.cover_path("other.jpg").exists());
    }
}
