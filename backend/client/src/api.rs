use std::{path::PathBuf, time::Duration};

use reqwest::{
    Client, RequestBuilder,
    multipart::{Form, Part},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::{
    contact::{ContactForm, FieldErrors, PhotoUpload},
    models::{Page, Person, SearchParams},
};

pub const TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Erro ao carregar dados das pessoas desaparecidas: {0}")]
    LoadPersons(#[source] reqwest::Error),

    #[error("Erro ao carregar dados da pessoa: {0}")]
    LoadPerson(#[source] reqwest::Error),

    #[error("Erro ao enviar informações: {0}")]
    Submit(#[source] reqwest::Error),

    #[error("Pessoa sem ocorrência registrada, não é possível enviar informações")]
    NoOccurrence,

    #[error("Formulário inválido:\n{0}")]
    Invalid(FieldErrors),

    #[error("Não foi possível ler {path}: {source}")]
    Photo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} excede o limite de 5MB")]
    PhotoTooLarge(PathBuf),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Relay answer to a submitted tip.
#[derive(Debug, Deserialize)]
pub struct TipReceipt {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get_persons(&self, params: &SearchParams) -> Result<Page<Person>, ClientError> {
        let url = format!("{}/pessoas/aberto/filtro", self.base_url);
        debug!("GET {url} {:?}", params.to_query());

        fetch(self.http.get(url).query(&params.to_query()))
            .await
            .map_err(ClientError::LoadPersons)
    }

    pub async fn get_person(&self, id: u64) -> Result<Person, ClientError> {
        let url = format!("{}/pessoas/{id}", self.base_url);
        debug!("GET {url}");

        fetch(self.http.get(url))
            .await
            .map_err(ClientError::LoadPerson)
    }

    /// Validates the form first; an invalid form never leaves the machine.
    pub async fn submit_information(
        &self,
        oco_id: u64,
        form: &ContactForm,
    ) -> Result<TipReceipt, ClientError> {
        form.validate().map_err(ClientError::Invalid)?;
        let photo = form.load_photo()?;

        let url = format!("{}/informacoes", self.base_url);
        debug!("POST {url} for occurrence {oco_id}");

        let mut multipart = Form::new()
            .text("ocoId", oco_id.to_string())
            .text("observacoes", form.informacao())
            .text("dataVisto", form.data_visto());

        if let Some(PhotoUpload {
            file_name,
            content_type,
            bytes,
        }) = photo
        {
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(content_type)?;
            multipart = multipart.part("foto", part);
        }

        fetch(self.http.post(url).multipart(multipart))
            .await
            .map_err(ClientError::Submit)
    }
}

async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, reqwest::Error> {
    request.send().await?.error_for_status()?.json().await
}
