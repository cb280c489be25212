use crate::error::{ClientError, NO_SOURCE_SELECTED};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// What the user picked in the ingestion form. Either side may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSelection {
    pub file: Option<FilePayload>,
    pub url: Option<String>,
}

impl SourceSelection {
    pub fn file(file: FilePayload) -> Self {
        Self {
            file: Some(file),
            url: None,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self {
            file: None,
            url: Some(url.into()),
        }
    }
}

/// A validated source: exactly one origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(FilePayload),
    Url(String),
}

impl Source {
    pub fn describe(&self) -> &str {
        match self {
            Source::File(file) => &file.filename,
            Source::Url(url) => url,
        }
    }
}

impl TryFrom<SourceSelection> for Source {
    type Error = ClientError;

    /// A selected file wins over a URL; a blank URL counts as no URL.
    fn try_from(selection: SourceSelection) -> Result<Self, Self::Error> {
        if let Some(file) = selection.file {
            return Ok(Source::File(file));
        }

        match selection.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(Source::Url(url.to_string())),
            _ => Err(ClientError::Validation(NO_SOURCE_SELECTED.to_string())),
        }
    }
}
