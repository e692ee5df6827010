//! # Tip Form
//!
//! What a person fills in before sending a sighting. Everything here is checked locally and
//! nothing touches the network until the form is clean.
//!
//! The upstream only stores one free-text field per tip, so the reporter's location and
//! contact details are folded into the observation text.
use std::{collections::BTreeMap, fmt, fs, path::PathBuf, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;

use crate::{api::ClientError, utils::mask_phone_input};

/// Same cap the web upload widget enforces.
pub const MAX_PHOTO_BYTES: u64 = 5_000_000;

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{2}\)\s\d{4,5}-\d{4}$").expect("phone pattern"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

#[derive(Debug, Clone)]
pub struct ContactForm {
    pub nome: String,
    pub telefone: String,
    pub email: String,
    pub localizacao: String,
    pub observacoes: String,
    pub data_visto: NaiveDate,
    pub foto: Option<PathBuf>,
}

#[derive(Debug)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Field name to message.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(pub BTreeMap<&'static str, &'static str>);

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, message) in &self.0 {
            writeln!(f, "  {field}: {message}")?;
        }

        Ok(())
    }
}

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }
}

impl ContactForm {
    /// Applies the same phone mask the input field uses while typing.
    pub fn masked(self) -> Self {
        Self {
            telefone: mask_phone_input(&self.telefone),
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = BTreeMap::new();

        if self.nome.trim().is_empty() {
            errors.insert("nome", "Nome é obrigatório");
        }

        if self.telefone.trim().is_empty() {
            errors.insert("telefone", "Telefone é obrigatório");
        } else if !PHONE.is_match(&self.telefone) {
            errors.insert("telefone", "Formato de telefone inválido");
        }

        if self.email.trim().is_empty() {
            errors.insert("email", "Email é obrigatório");
        } else if !EMAIL.is_match(&self.email) {
            errors.insert("email", "Email inválido");
        }

        if self.localizacao.trim().is_empty() {
            errors.insert("localizacao", "Localização é obrigatória");
        }

        if let Some(path) = &self.foto {
            if image_type(path).is_none() {
                errors.insert("foto", "Apenas arquivos de imagem são permitidos");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors(errors))
        }
    }

    /// Text sent as `observacoes`.
    pub fn informacao(&self) -> String {
        let mut text = String::new();

        let observacoes = self.observacoes.trim();
        if !observacoes.is_empty() {
            text.push_str(observacoes);
            text.push_str("\n\n");
        }

        text.push_str(&format!("Local: {}\n", self.localizacao.trim()));
        text.push_str(&format!(
            "Informante: {} | {} | {}",
            self.nome.trim(),
            self.telefone,
            self.email.trim()
        ));

        text
    }

    pub fn data_visto(&self) -> String {
        self.data_visto.format("%Y-%m-%d").to_string()
    }

    pub fn load_photo(&self) -> Result<Option<PhotoUpload>, ClientError> {
        let Some(path) = &self.foto else {
            return Ok(None);
        };

        let photo_error = |source| ClientError::Photo {
            path: path.clone(),
            source,
        };

        let size = fs::metadata(path).map_err(photo_error)?.len();
        if size > MAX_PHOTO_BYTES {
            return Err(ClientError::PhotoTooLarge(path.clone()));
        }

        let mut errors = FieldErrors::default();
        let Some(content_type) = image_type(path) else {
            errors
                .0
                .insert("foto", "Apenas arquivos de imagem são permitidos");
            return Err(ClientError::Invalid(errors));
        };

        Ok(Some(PhotoUpload {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "foto".to_string()),
            content_type,
            bytes: fs::read(path).map_err(photo_error)?,
        }))
    }
}

fn image_type(path: &std::path::Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use chrono::NaiveDate;

    use super::{ContactForm, MAX_PHOTO_BYTES};
    use crate::api::ClientError;

    fn form() -> ContactForm {
        ContactForm {
            nome: "Carla Dias".to_string(),
            telefone: "65999998888".to_string(),
            email: "carla@example.com".to_string(),
            localizacao: "Praça Alencastro".to_string(),
            observacoes: "Estava sentada no banco".to_string(),
            data_visto: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            foto: None,
        }
        .masked()
    }

    #[test]
    fn test_valid_form() {
        let form = form();

        assert_eq!(form.telefone, "(65) 99999-8888");
        assert!(form.validate().is_ok());
        assert_eq!(form.data_visto(), "2024-03-01");
    }

    #[test]
    fn test_required_fields() {
        let empty = ContactForm {
            nome: " ".to_string(),
            telefone: String::new(),
            email: String::new(),
            localizacao: String::new(),
            ..form()
        };

        let errors = empty.validate().unwrap_err();

        assert_eq!(errors.get("nome"), Some("Nome é obrigatório"));
        assert_eq!(errors.get("telefone"), Some("Telefone é obrigatório"));
        assert_eq!(errors.get("email"), Some("Email é obrigatório"));
        assert_eq!(errors.get("localizacao"), Some("Localização é obrigatória"));
        assert_eq!(errors.get("observacoes"), None);
    }

    #[test]
    fn test_malformed_contact() {
        let malformed = ContactForm {
            telefone: "9999".to_string(),
            email: "carla@example".to_string(),
            ..form()
        }
        .masked();

        let errors = malformed.validate().unwrap_err();

        assert_eq!(errors.get("telefone"), Some("Formato de telefone inválido"));
        assert_eq!(errors.get("email"), Some("Email inválido"));
        assert_eq!(errors.0.len(), 2);
    }

    #[test]
    fn test_landline_is_valid() {
        let landline = ContactForm {
            telefone: "6533334444".to_string(),
            ..form()
        }
        .masked();

        assert!(landline.validate().is_ok());
    }

    #[test]
    fn test_photo_must_be_image() {
        let with_pdf = ContactForm {
            foto: Some(PathBuf::from("boletim.pdf")),
            ..form()
        };

        assert_eq!(
            with_pdf.validate().unwrap_err().get("foto"),
            Some("Apenas arquivos de imagem são permitidos")
        );
    }

    #[test]
    fn test_informacao_folds_contact() {
        assert_eq!(
            form().informacao(),
            "Estava sentada no banco\n\nLocal: Praça Alencastro\nInformante: Carla Dias | (65) 99999-8888 | carla@example.com"
        );

        let silent = ContactForm {
            observacoes: String::new(),
            ..form()
        };
        assert!(silent.informacao().starts_with("Local: Praça Alencastro"));
    }

    #[test]
    fn test_load_photo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Rua.JPG");
        fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

        let photo = ContactForm {
            foto: Some(path),
            ..form()
        }
        .load_photo()
        .unwrap()
        .unwrap();

        assert_eq!(photo.file_name, "Rua.JPG");
        assert_eq!(photo.content_type, "image/jpeg");
        assert_eq!(photo.bytes.len(), 3);
    }

    #[test]
    fn test_load_photo_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grande.png");
        fs::write(&path, vec![0u8; MAX_PHOTO_BYTES as usize + 1]).unwrap();

        let result = ContactForm {
            foto: Some(path),
            ..form()
        }
        .load_photo();

        assert!(matches!(result, Err(ClientError::PhotoTooLarge(_))));
    }
}
