//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::{FileRepository, LocalRepository};
use super::repository::{RepositoryError, RepositoryResult, YardRepository};

/// Environment variable selecting the backend.
pub const REPOSITORY_TYPE_ENV: &str = "REPOSITORY_TYPE";
/// Environment variable pointing at the store document; implies the file backend.
pub const DATA_FILE_ENV: &str = "YARD_DATA_FILE";

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
    /// JSON document on disk
    File,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("local", "memory", "file", "json")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "file" | "json" => Ok(Self::File),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variables.
    ///
    /// Reads `REPOSITORY_TYPE`. When it is unset, defaults to File if
    /// `YARD_DATA_FILE` is present, otherwise Local. An unparseable value
    /// falls back to Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var(REPOSITORY_TYPE_ENV) {
            return val.parse().unwrap_or_else(|e| {
                log::warn!("{}; falling back to local repository", e);
                Self::Local
            });
        }

        if data_path_from_env().is_some() {
            Self::File
        } else {
            Self::Local
        }
    }
}

/// Store document path from `YARD_DATA_FILE`, ignoring blank values.
pub fn data_path_from_env() -> Option<PathBuf> {
    std::env::var(DATA_FILE_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use yard_stock::db::{RepositoryFactory, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let file_repo =
///         RepositoryFactory::create(RepositoryType::File, Some("data/store.json".as_ref())).await?;
///     let local_repo = RepositoryFactory::create_local();
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `data_path` - Store document path (required for File)
    pub async fn create(
        repo_type: RepositoryType,
        data_path: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn YardRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::File => {
                let path = data_path.ok_or_else(|| {
                    RepositoryError::configuration("File repository requires a data path")
                })?;
                let repo = Self::create_file(path).await?;
                Ok(repo as Arc<dyn YardRepository>)
            }
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn YardRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Open a JSON-file repository.
    pub async fn create_file(path: &Path) -> RepositoryResult<Arc<FileRepository>> {
        let repo = FileRepository::open(path).await?;
        Ok(Arc::new(repo))
    }

    /// Create repository from environment configuration.
    ///
    /// See [`RepositoryType::from_env`]. The file backend reads its path from
    /// `YARD_DATA_FILE`, falling back to the default data path.
    pub async fn from_env() -> RepositoryResult<Arc<dyn YardRepository>> {
        RepositoryBuilder::new().from_env()?.build().await
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn YardRepository>> {
        RepositoryBuilder::new()
            .from_config_file(config_path)?
            .build()
            .await
    }

    /// Create repository from the default configuration file location.
    ///
    /// Searches for `repository.toml` in standard locations and creates
    /// the appropriate repository instance.
    pub async fn from_default_config() -> RepositoryResult<Arc<dyn YardRepository>> {
        RepositoryBuilder::new().from_default_config()?.build().await
    }
}

/// Builder for configuring repository creation.
///
/// # Example
/// ```ignore
/// use yard_stock::db::{RepositoryBuilder, RepositoryType};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let repo = RepositoryBuilder::new()
///         .repository_type(RepositoryType::File)
///         .data_path("data/store.json")
///         .build()
///         .await?;
///     Ok(())
/// }
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    data_path: Option<PathBuf>,
}

impl RepositoryBuilder {
    /// Create a new repository builder defaulting to Local.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::Local,
            data_path: None,
        }
    }

    /// Set the repository type.
    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    /// Set the store document path.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, RepositoryError> {
        self.repo_type = RepositoryType::from_env();
        if self.repo_type == RepositoryType::File {
            self.data_path =
                Some(data_path_from_env().unwrap_or_else(RepositoryConfig::default_data_path));
        }
        Ok(self)
    }

    /// Load configuration from a TOML file.
    pub fn from_config_file<P: AsRef<Path>>(
        self,
        config_path: P,
    ) -> Result<Self, RepositoryError> {
        let repo_config = RepositoryConfig::from_file(config_path)?;
        self.from_repository_config(&repo_config)
    }

    /// Load configuration from default location.
    ///
    /// Searches for `repository.toml` in standard locations.
    pub fn from_default_config(self) -> Result<Self, RepositoryError> {
        let repo_config = RepositoryConfig::from_default_location()?;
        self.from_repository_config(&repo_config)
    }

    fn from_repository_config(mut self, config: &RepositoryConfig) -> Result<Self, RepositoryError> {
        self.repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        if self.repo_type == RepositoryType::File {
            self.data_path = Some(config.data_path().to_path_buf());
        }
        Ok(self)
    }

    /// Build the repository instance.
    pub async fn build(self) -> RepositoryResult<Arc<dyn YardRepository>> {
        RepositoryFactory::create(self.repo_type, self.data_path.as_deref()).await
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
