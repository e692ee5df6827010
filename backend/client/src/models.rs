use chrono::NaiveDate;
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Spring-style page returned by the filter endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u64,
    pub nome: String,
    pub idade: Option<u32>,
    pub data_nascimento: Option<String>,
    pub sexo: Option<String>,
    pub vivo: Option<bool>,
    pub url_foto: Option<String>,
    #[serde(default)]
    pub ultima_ocorrencia: UltimaOcorrencia,
    pub caracteristicas: Option<Caracteristicas>,
    pub contato: Option<Contato>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UltimaOcorrencia {
    pub oco_id: Option<u64>,
    pub dt_desaparecimento: Option<String>,
    #[serde(alias = "localDesaparecimento")]
    pub local_desaparecimento_concat: Option<String>,
    pub boletim_ocorrencia: Option<String>,
    pub status: Option<Status>,
    pub data_localizacao: Option<String>,
    pub encontrado_vivo: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caracteristicas {
    pub cor: Option<String>,
    pub sexo: Option<String>,
    pub olhos: Option<String>,
    pub cabelos: Option<String>,
    pub tipo_fisico: Option<String>,
    pub altura: Option<String>,
    pub peso: Option<String>,
    pub deficiencia: Option<String>,
    pub acessorio: Option<String>,
    pub cicatriz: Option<String>,
    pub tatuagem: Option<String>,
    pub outros: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Contato {
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
}

/// Occurrence status. The older masculine vocabulary is folded into the current one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Status {
    Desaparecida,
    Localizada,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Desaparecida => "DESAPARECIDA",
            Status::Localizada => "LOCALIZADA",
            Status::Other(raw) => raw,
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "DESAPARECIDA" | "DESAPARECIDO" => Status::Desaparecida,
            "LOCALIZADA" | "LOCALIZADO" => Status::Localizada,
            _ => Status::Other(raw),
        }
    }
}

impl UltimaOcorrencia {
    /// Some upstream revisions omit `status`; a location date then means the person was found.
    pub fn status(&self) -> Status {
        match (&self.status, &self.data_localizacao) {
            (Some(status), _) => status.clone(),
            (None, Some(_)) => Status::Localizada,
            (None, None) => Status::Desaparecida,
        }
    }
}

impl Person {
    pub fn age(&self, today: NaiveDate) -> Option<u32> {
        self.idade.or_else(|| {
            self.data_nascimento
                .as_deref()
                .and_then(|birth| crate::utils::age_on(birth, today))
        })
    }
}

/// Filters understood by the upstream filter endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    pub nome: Option<String>,
    pub faixa_idade_inicial: Option<u32>,
    pub faixa_idade_final: Option<u32>,
    pub sexo: Option<String>,
    pub status: Option<Status>,
    pub pagina: u32,
    pub por_pagina: u32,
}

impl SearchParams {
    pub fn new() -> Self {
        Self {
            por_pagina: DEFAULT_PAGE_SIZE,
            ..Default::default()
        }
    }

    /// A changed filter always starts again from the first page.
    pub fn with_filters(self, filters: SearchParams) -> Self {
        Self {
            pagina: 0,
            por_pagina: self.por_pagina,
            ..filters
        }
    }

    pub fn with_page(self, pagina: u32) -> Self {
        Self { pagina, ..self }
    }

    /// Blank or absent filters are left out so the upstream applies its own defaults.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if let Some(nome) = self.nome.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            query.push(("nome", nome.to_string()));
        }
        if let Some(inicial) = self.faixa_idade_inicial {
            query.push(("faixaIdadeInicial", inicial.to_string()));
        }
        if let Some(final_) = self.faixa_idade_final {
            query.push(("faixaIdadeFinal", final_.to_string()));
        }
        if let Some(sexo) = self.sexo.as_deref().filter(|s| !s.is_empty()) {
            query.push(("sexo", sexo.to_string()));
        }
        if let Some(status) = &self.status {
            query.push(("status", status.as_str().to_string()));
        }

        query.push(("pagina", self.pagina.to_string()));
        query.push(("porPagina", self.por_pagina.to_string()));

        query
    }
}
