pub mod config_storage;
pub mod file_document_repository;
pub mod paths;
pub mod secret_service;

pub use crate::config_storage::{load_config, load_config_from};
pub use crate::file_document_repository::FileDocumentRepository;
pub use crate::paths::QuillPaths;
pub use crate::secret_service::SecretServiceImpl;
