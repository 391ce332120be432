//! Persistence of the published token list.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::{models::Catalog, services::catalog::CatalogError};

/// Storage of the single current catalog
#[async_trait]
pub trait CatalogStorage: Send + Sync {
	/// Reads the current catalog; a missing or unreadable one is `None`
	async fn load(&self) -> Option<Catalog>;

	/// Empties the output location before a publication
	async fn reset(&self) -> Result<(), CatalogError>;

	/// Writes `catalog` as the current one
	async fn save(&self, catalog: &Catalog) -> Result<(), CatalogError>;
}

/// Serializes `catalog` as UTF-8 JSON indented with four spaces
pub fn to_pretty_json(catalog: &Catalog) -> Result<Vec<u8>, CatalogError> {
	let mut buffer = Vec::new();
	let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
	let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
	catalog.serialize(&mut serializer)?;
	Ok(buffer)
}

/// [`CatalogStorage`] keeping `<file_name>.json` in an output directory
#[derive(Debug, Clone)]
pub struct FileCatalogStorage {
	output_dir: PathBuf,
	file_path: PathBuf,
}

impl FileCatalogStorage {
	pub fn new(output_dir: impl Into<PathBuf>, list_file_name: &str) -> Self {
		let output_dir = output_dir.into();
		let file_path = output_dir.join(format!("{}.json", list_file_name));
		Self {
			output_dir,
			file_path,
		}
	}

	pub fn file_path(&self) -> &Path {
		&self.file_path
	}
}

#[async_trait]
impl CatalogStorage for FileCatalogStorage {
	async fn load(&self) -> Option<Catalog> {
		let content = match tokio::fs::read(&self.file_path).await {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				tracing::info!(path = %self.file_path.display(), "No previous token list");
				return None;
			}
			Err(e) => {
				tracing::warn!(path = %self.file_path.display(), error = %e, "Previous token list is unreadable");
				return None;
			}
		};

		match serde_json::from_slice(&content) {
			Ok(catalog) => Some(catalog),
			Err(e) => {
				tracing::warn!(path = %self.file_path.display(), error = %e, "Previous token list is corrupt");
				None
			}
		}
	}

	async fn reset(&self) -> Result<(), CatalogError> {
		match tokio::fs::remove_dir_all(&self.output_dir).await {
			Ok(()) => {}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
			Err(e) => {
				return Err(CatalogError::storage_error(format!(
					"Failed to remove {}: {}",
					self.output_dir.display(),
					e
				)));
			}
		}

		tokio::fs::create_dir_all(&self.output_dir)
			.await
			.map_err(|e| {
				CatalogError::storage_error(format!(
					"Failed to create {}: {}",
					self.output_dir.display(),
					e
				))
			})
	}

	async fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
		let json = to_pretty_json(catalog)?;
		// The directory may be gone when a previous reset failed
		tokio::fs::create_dir_all(&self.output_dir).await?;
		tokio::fs::write(&self.file_path, json).await?;
		Ok(())
	}
}
