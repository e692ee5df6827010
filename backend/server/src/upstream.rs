//! # Upstream Registry
//!
//! The missing persons registry API is the only source of truth. Nothing it returns is
//! cached or reshaped: search and detail bodies travel back to the browser as raw bytes.
//!
//! Each method maps one relay route onto one upstream call. A call is attempted exactly
//! once and is bounded by the client timeout set at startup.
//!
//! | Relay | Upstream |
//! |---|---|
//! | `GET /api/pessoas/aberto/filtro?q` | `GET /pessoas/aberto/filtro?q` |
//! | `GET /api/pessoas/{id}` | `GET /pessoas/{id}` |
//! | `POST /api/informacoes` | `POST /ocorrencias/informacoes-desaparecido?ocoId&informacao&data&descricao` |
use std::time::Duration;

use axum::body::Bytes;
use reqwest::{
    Client,
    header::ACCEPT,
    multipart::{Form, Part},
};
use tracing::debug;

use crate::tip::TipSubmission;

pub const FILTER_PATH: &str = "/pessoas/aberto/filtro";
pub const PERSON_PATH: &str = "/pessoas";
pub const TIP_PATH: &str = "/ocorrencias/informacoes-desaparecido";

/// Multipart part name the upstream expects attachments under.
pub const FILES_PART: &str = "files";

#[derive(Clone)]
pub struct Upstream {
    http: Client,
    base_url: String,
}

impl Upstream {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    pub fn filter_url(&self, raw_query: Option<&str>) -> String {
        match raw_query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{}{FILTER_PATH}?{query}", self.base_url),
            None => format!("{}{FILTER_PATH}", self.base_url),
        }
    }

    pub fn person_url(&self, id: u64) -> String {
        format!("{}{PERSON_PATH}/{id}", self.base_url)
    }

    /// Query string is forwarded as received; filter semantics belong to the upstream.
    pub async fn filter(&self, raw_query: Option<&str>) -> Result<Bytes, reqwest::Error> {
        self.get(self.filter_url(raw_query)).await
    }

    pub async fn person(&self, id: u64) -> Result<Bytes, reqwest::Error> {
        self.get(self.person_url(id)).await
    }

    pub async fn submit_tip(&self, tip: TipSubmission) -> Result<Bytes, reqwest::Error> {
        let descricao = tip.descricao();
        let query = [
            ("ocoId", tip.oco_id.to_string()),
            ("informacao", tip.observacoes),
            ("data", tip.data_visto),
            ("descricao", descricao.to_string()),
        ];

        let mut form = Form::new();
        if let Some(foto) = tip.foto {
            debug!("Attaching {} ({} bytes)", foto.file_name, foto.bytes.len());

            let part = Part::bytes(foto.bytes)
                .file_name(foto.file_name)
                .mime_str(&foto.content_type)?;
            form = form.part(FILES_PART, part);
        }

        let url = format!("{}{TIP_PATH}", self.base_url);
        debug!("POST {url}");

        self.http
            .post(url)
            .query(&query)
            .header(ACCEPT, "*/*")
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await
    }

    async fn get(&self, url: String) -> Result<Bytes, reqwest::Error> {
        debug!("GET {url}");

        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await
    }
}
