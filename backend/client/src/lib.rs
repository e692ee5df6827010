//! # Registry Client
//!
//! Terminal counterpart of the web client. Talks only to the relay, never to the registry.
//!
//! ## Flow
//!
//! - `buscar`: filters go out as a query string, one page comes back and is printed as a grid
//! - `detalhes`: one person by id, every section the registry filled in
//! - `informar`: the tip form is validated locally, then the person is fetched to learn the
//!   occurrence id and the form is posted as multipart
//!
//! Every view reflects the latest fetch; nothing is kept between runs.
//!
//! ## Notes
//! - A new search always starts from page 0
//! - Status labels follow the current vocabulary (`DESAPARECIDA`/`LOCALIZADA`); older
//!   masculine values are normalized on the way in
use std::time::Duration;

use chrono::{Local, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

pub mod api;
pub mod contact;
pub mod models;
pub mod render;
pub mod utils;

use api::{ClientError, RelayClient, TipReceipt};
use contact::ContactForm;
use models::SearchParams;
use render::{render_page, render_person};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn search(client: &RelayClient, params: &SearchParams) -> Result<String, ClientError> {
    let spinner = spinner("Buscando pessoas...");
    let page = client.get_persons(params).await;
    spinner.finish_and_clear();

    let page = page?;
    info!("Fetched page {} of {}", page.number, page.total_pages);

    Ok(render_page(&page, today()))
}

pub async fn show(client: &RelayClient, id: u64) -> Result<String, ClientError> {
    let spinner = spinner("Carregando...");
    let person = client.get_person(id).await;
    spinner.finish_and_clear();

    Ok(render_person(&person?, today()))
}

pub async fn inform(
    client: &RelayClient,
    id: u64,
    form: ContactForm,
) -> Result<TipReceipt, ClientError> {
    let form = form.masked();
    form.validate().map_err(ClientError::Invalid)?;

    let spinner = spinner("Enviando informações...");
    let receipt = async {
        let person = client.get_person(id).await?;
        let oco_id = person
            .ultima_ocorrencia
            .oco_id
            .ok_or(ClientError::NoOccurrence)?;

        info!("Sending tip for {} (occurrence {oco_id})", person.nome);
        client.submit_information(oco_id, &form).await
    }
    .await;
    spinner.finish_and_clear();

    receipt
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}
