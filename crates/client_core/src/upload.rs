//! Files handed to the part importer and the multipart request built from them.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use url::Url;

use crate::error::ClientError;

/// Multipart field the import endpoint reads the file from.
pub const UPLOAD_FIELD: &str = "upload";

/// Where the bytes of an offered file live until upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Vec<u8>),
}

impl FileSource {
    pub async fn read(&self) -> Result<Vec<u8>, ClientError> {
        match self {
            FileSource::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| ClientError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            FileSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// A file as offered by a drop or a file picker, before staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferedFile {
    pub name: String,
    pub source: FileSource,
}

impl OfferedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: FileSource::Path(path),
        }
    }

    pub fn in_memory(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }
}

/// One import submission: target url (options already in the query) and the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartUpload {
    pub url: Url,
    pub file_name: String,
    pub source: FileSource,
}

impl PartUpload {
    pub async fn into_form(self) -> Result<Form, ClientError> {
        let bytes = self.source.read().await?;
        let mime = mime_guess::from_path(Path::new(&self.file_name)).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(self.file_name)
            .mime_str(mime.essence_str())?;
        Ok(Form::new().part(UPLOAD_FIELD, part))
    }
}
