use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    error::ErrorResponse,
    protocol::{
        AskRequest, AskResponse, UploadResponse, ASK_ROUTE, DOCUMENT_FIELD, UPLOAD_ROUTE,
        URL_FIELD,
    },
};
use tracing::debug;
use url::Url;

use crate::{error::ClientError, source::Source};

/// The ingestion/QA backend. Both calls wait indefinitely for a response.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn upload(&self, source: &Source) -> Result<UploadResponse, ClientError>;
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ClientError>;
}

pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url.trim())
            .map_err(|err| ClientError::Validation(format!("invalid server url: {err}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(route)
            .map_err(|err| ClientError::Validation(format!("invalid endpoint {route}: {err}")))
    }
}

fn source_form(source: &Source) -> Result<Form, ClientError> {
    let form = match source {
        Source::File(file) => {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.filename.clone());
            if let Some(mime_type) = &file.mime_type {
                part = part.mime_str(mime_type).map_err(|err| {
                    ClientError::Validation(format!("invalid mime type {mime_type}: {err}"))
                })?;
            }
            Form::new().part(DOCUMENT_FIELD, part)
        }
        Source::Url(url) => Form::new().text(URL_FIELD, url.clone()),
    };
    Ok(form)
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(ClientError::transport);
    }

    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.message().map(str::to_string));
    Err(ClientError::Server {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload(&self, source: &Source) -> Result<UploadResponse, ClientError> {
        let endpoint = self.endpoint(UPLOAD_ROUTE)?;
        let form = source_form(source)?;
        debug!(endpoint = %endpoint, source = source.describe(), "upload: sending source");
        let response = self
            .http
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::transport)?;
        decode_response(response).await
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse, ClientError> {
        let endpoint = self.endpoint(ASK_ROUTE)?;
        debug!(endpoint = %endpoint, filename = %request.filename, "ask: sending question");
        let response = self
            .http
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(ClientError::transport)?;
        decode_response(response).await
    }
}
