//! # Tip Submission
//!
//! Inbound multipart form posted by the browser when someone reports a sighting.
//!
//! ## Fields
//!
//! - `ocoId`: occurrence the tip belongs to, numeric
//! - `observacoes`: free text
//! - `dataVisto`: date the person was seen
//! - `foto`: optional image, at most 5 MiB
//!
//! Anything else in the form (reporter name, phone, ...) is ignored.
//!
//! ## Upload Rules
//!
//! - The photo content type is checked before any byte is read, so a non-image is always
//!   rejected as such no matter its size
//! - The photo is streamed chunk by chunk and rejected the moment it crosses the limit
//! - Required fields are checked only after the whole form is read, and always before
//!   the upstream is contacted
use axum::extract::{Multipart, multipart::Field};
use tracing::debug;

use crate::error::AppError;

pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

pub const OCO_ID: &str = "ocoId";
pub const OBSERVACOES: &str = "observacoes";
pub const DATA_VISTO: &str = "dataVisto";
pub const FOTO: &str = "foto";

#[derive(Debug)]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct TipSubmission {
    pub oco_id: u64,
    pub observacoes: String,
    pub data_visto: String,
    pub foto: Option<Photo>,
}

#[derive(Debug, Default)]
pub struct TipForm {
    pub oco_id: Option<String>,
    pub observacoes: Option<String>,
    pub data_visto: Option<String>,
    pub foto: Option<Photo>,
}

impl TipSubmission {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = TipForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);

            match name.as_deref() {
                Some(OCO_ID) => form.oco_id = Some(field.text().await?),
                Some(OBSERVACOES) => form.observacoes = Some(field.text().await?),
                Some(DATA_VISTO) => form.data_visto = Some(field.text().await?),
                Some(FOTO) => form.foto = read_photo(field).await?,
                other => debug!("Ignoring form field {:?}", other),
            }
        }

        form.validate()
    }

    /// Upstream wants a hint of what the attachment is.
    pub fn descricao(&self) -> &'static str {
        match self.foto {
            Some(_) => "imagem",
            None => "descricao",
        }
    }
}

impl TipForm {
    pub fn validate(self) -> Result<TipSubmission, AppError> {
        let oco_id = present(self.oco_id);
        let observacoes = present(self.observacoes);
        let data_visto = present(self.data_visto);

        let missing: Vec<&str> = [
            (OCO_ID, oco_id.is_none()),
            (OBSERVACOES, observacoes.is_none()),
            (DATA_VISTO, data_visto.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (oco_id, observacoes, data_visto) {
            (Some(oco_id), Some(observacoes), Some(data_visto)) => Ok(TipSubmission {
                oco_id: oco_id
                    .trim()
                    .parse()
                    .map_err(|_| AppError::InvalidField(OCO_ID))?,
                observacoes,
                data_visto: data_visto.trim().to_string(),
                foto: self.foto,
            }),
            _ => Err(AppError::MissingFields(missing.join(", "))),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn read_photo(mut field: Field<'_>) -> Result<Option<Photo>, AppError> {
    // Browsers send an empty part when the file input was left untouched
    let file_name = match field.file_name() {
        Some("") => return Ok(None),
        Some(name) => name.to_string(),
        None => FOTO.to_string(),
    };

    let content_type = field.content_type().unwrap_or_default().to_string();
    if !content_type.starts_with("image/") {
        return Err(AppError::InvalidFileType);
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if bytes.len() + chunk.len() > MAX_PHOTO_BYTES {
            return Err(AppError::FileTooLarge);
        }

        bytes.extend_from_slice(&chunk);
    }

    Ok(Some(Photo {
        file_name,
        content_type,
        bytes,
    }))
}

#[cfg(test)]
mod tests {
    use super::{AppError, Photo, TipForm};

    fn form(oco_id: &str, observacoes: &str, data_visto: &str) -> TipForm {
        TipForm {
            oco_id: Some(oco_id.to_string()),
            observacoes: Some(observacoes.to_string()),
            data_visto: Some(data_visto.to_string()),
            foto: None,
        }
    }

    #[test]
    fn test_complete_form() {
        let tip = form(" 42 ", "Vista na praça", "2024-03-01").validate().unwrap();

        assert_eq!(tip.oco_id, 42);
        assert_eq!(tip.observacoes, "Vista na praça");
        assert_eq!(tip.data_visto, "2024-03-01");
        assert_eq!(tip.descricao(), "descricao");
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let err = TipForm {
            observacoes: Some("algo".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        match err {
            AppError::MissingFields(fields) => assert_eq!(fields, "ocoId, dataVisto"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let err = form("7", "   ", "2024-03-01").validate().unwrap_err();

        assert!(matches!(err, AppError::MissingFields(fields) if fields == "observacoes"));
    }

    #[test]
    fn test_non_numeric_occurrence() {
        let err = form("12abc", "texto", "2024-03-01").validate().unwrap_err();

        assert!(matches!(err, AppError::InvalidField("ocoId")));
    }

    #[test]
    fn test_photo_changes_description() {
        let mut tip_form = form("1", "texto", "2024-03-01");
        tip_form.foto = Some(Photo {
            file_name: "rua.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8],
        });

        assert_eq!(tip_form.validate().unwrap().descricao(), "imagem");
    }
}
