use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{
    api::RelayClient,
    contact::ContactForm,
    models::{DEFAULT_API_URL, DEFAULT_PAGE_SIZE, SearchParams, Status},
    today,
};

#[derive(Parser, Debug)]
#[command(
    name = "registry-client",
    author,
    version,
    about = "Search the missing persons registry and send tips"
)]
struct Args {
    /// Relay base URL
    #[arg(long, env = "RELAY_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search people with open cases
    Buscar {
        /// Part of the name
        #[arg(long)]
        nome: Option<String>,
        /// Minimum age
        #[arg(long)]
        idade_min: Option<u32>,
        /// Maximum age
        #[arg(long)]
        idade_max: Option<u32>,
        /// MASCULINO or FEMININO
        #[arg(long)]
        sexo: Option<String>,
        /// DESAPARECIDA or LOCALIZADA
        #[arg(long)]
        status: Option<String>,
        /// Page to show, starting at 0
        #[arg(long, default_value_t = 0)]
        pagina: u32,
        /// Results per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        por_pagina: u32,
    },
    /// Show every detail of one person
    Detalhes { id: u64 },
    /// Send information about where a person was seen
    Informar {
        /// Person id
        id: u64,
        /// Your name
        #[arg(long)]
        nome: String,
        /// Your phone, digits only is fine
        #[arg(long)]
        telefone: String,
        /// Your email
        #[arg(long)]
        email: String,
        /// Where the person was seen
        #[arg(long)]
        localizacao: String,
        /// What you saw
        #[arg(long, default_value = "")]
        observacoes: String,
        /// When the person was seen (YYYY-MM-DD), defaults to today
        #[arg(long)]
        data_visto: Option<NaiveDate>,
        /// Optional photo, image up to 5MB
        #[arg(long)]
        foto: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let relay = RelayClient::new(&args.api_url)?;

    match args.command {
        Command::Buscar {
            nome,
            idade_min,
            idade_max,
            sexo,
            status,
            pagina,
            por_pagina,
        } => {
            let filters = SearchParams {
                nome,
                faixa_idade_inicial: idade_min,
                faixa_idade_final: idade_max,
                sexo,
                status: status.map(|s| Status::from(s.to_uppercase())),
                ..Default::default()
            };
            let params = SearchParams {
                por_pagina,
                ..SearchParams::new()
            }
            .with_filters(filters)
            .with_page(pagina);

            print!("{}", client::search(&relay, &params).await?);
        }
        Command::Detalhes { id } => {
            print!("{}", client::show(&relay, id).await?);
        }
        Command::Informar {
            id,
            nome,
            telefone,
            email,
            localizacao,
            observacoes,
            data_visto,
            foto,
        } => {
            let form = ContactForm {
                nome,
                telefone,
                email,
                localizacao,
                observacoes,
                data_visto: data_visto.unwrap_or_else(today),
                foto,
            };

            let receipt = client::inform(&relay, id, form).await?;
            println!("{}", receipt.message);
        }
    }

    Ok(())
}
