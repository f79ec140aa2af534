/*!
 * Common test utilities for the lector test suite
 */

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use lector::database::{DatabaseConnection, Repository};
use lector::providers::mock::MockTranslator;
use lector::translation::VocabularyService;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Path of the vocabulary database inside a test directory
pub fn database_path(dir: &Path) -> PathBuf {
    dir.join("data").join("vocabulary.sqlite")
}

/// Opens (or creates) the vocabulary store at `path`
pub fn open_repository(path: &Path) -> Result<Repository> {
    Ok(Repository::new(DatabaseConnection::new(path)?))
}

/// Builds a service over the store at `path` with the given mock backend
pub fn open_service(path: &Path, translator: MockTranslator) -> Result<VocabularyService> {
    Ok(VocabularyService::new(open_repository(path)?, Arc::new(translator)))
}
