use chrono::{Datelike, NaiveDate};
use comfy_table::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Red,
    Green,
    Neutral,
}

impl StatusTone {
    /// Utility classes the web client paints status badges with.
    pub fn css_class(self) -> &'static str {
        match self {
            StatusTone::Red => "text-red-600 bg-red-100",
            StatusTone::Green => "text-green-600 bg-green-100",
            StatusTone::Neutral => "text-gray-600 bg-gray-100",
        }
    }

    pub fn color(self) -> Color {
        match self {
            StatusTone::Red => Color::Red,
            StatusTone::Green => Color::Green,
            StatusTone::Neutral => Color::Grey,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLabel {
    pub text: String,
    pub tone: StatusTone,
}

pub fn status_label(status: &str) -> StatusLabel {
    let (text, tone) = match status {
        "DESAPARECIDA" => ("Desaparecida", StatusTone::Red),
        "LOCALIZADA" => ("Localizada", StatusTone::Green),
        other => (other, StatusTone::Neutral),
    };

    StatusLabel {
        text: text.to_string(),
        tone,
    }
}

fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// `11999998888` -> `(11) 99999-8888`, `1133334444` -> `(11) 3333-4444`.
/// Anything that is not a 10 or 11 digit number is returned as given.
pub fn format_phone(phone: &str) -> String {
    let cleaned = digits(phone);

    match cleaned.len() {
        11 => format!("({}) {}-{}", &cleaned[..2], &cleaned[2..7], &cleaned[7..]),
        10 => format!("({}) {}-{}", &cleaned[..2], &cleaned[2..6], &cleaned[6..]),
        _ => phone.to_string(),
    }
}

/// Progressive mask applied while a phone number is being typed.
pub fn mask_phone_input(input: &str) -> String {
    let value = digits(input);
    let slice = |start: usize, end: usize| &value[start.min(value.len())..end.min(value.len())];

    match value.len() {
        0..=1 => value.clone(),
        2..=6 => format!("({}) {}", slice(0, 2), slice(2, value.len())),
        7..=10 => format!("({}) {}-{}", slice(0, 2), slice(2, 6), slice(6, 10)),
        _ => format!("({}) {}-{}", slice(0, 2), slice(2, 7), slice(7, 11)),
    }
}

/// Upstream dates come as `YYYY-MM-DD`, optionally followed by a time.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let date = input.trim().get(..10)?;

    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Brazilian `dd/mm/yyyy`. Unparseable input is shown as is.
pub fn format_date(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    match parse_date(input) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => input.to_string(),
    }
}

pub fn age_on(birth: &str, today: NaiveDate) -> Option<u32> {
    let birth = parse_date(birth)?;
    let mut age = today.year() - birth.year();

    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }

    u32::try_from(age).ok()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{StatusTone, age_on, format_date, format_phone, mask_phone_input, status_label};

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("11999998888"), "(11) 99999-8888");
        assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
        assert_eq!(format_phone("(11) 99999-8888"), "(11) 99999-8888");
        assert_eq!(format_phone("190"), "190");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn test_mask_phone_input() {
        assert_eq!(mask_phone_input(""), "");
        assert_eq!(mask_phone_input("6"), "6");
        assert_eq!(mask_phone_input("65"), "(65) ");
        assert_eq!(mask_phone_input("65999"), "(65) 999");
        assert_eq!(mask_phone_input("6599998"), "(65) 9999-8");
        assert_eq!(mask_phone_input("6533334444"), "(65) 3333-4444");
        assert_eq!(mask_phone_input("65999998888"), "(65) 99999-8888");
        assert_eq!(mask_phone_input("(65) 99999-88889"), "(65) 99999-8888");
    }

    #[test]
    fn test_status_label() {
        let missing = status_label("DESAPARECIDA");
        assert_eq!(missing.text, "Desaparecida");
        assert_eq!(missing.tone, StatusTone::Red);
        assert!(missing.tone.css_class().contains("red"));

        let found = status_label("LOCALIZADA");
        assert_eq!(found.text, "Localizada");
        assert_eq!(found.tone, StatusTone::Green);
        assert!(found.tone.css_class().contains("green"));

        let other = status_label("EM_ANALISE");
        assert_eq!(other.text, "EM_ANALISE");
        assert_eq!(other.tone, StatusTone::Neutral);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2023-05-10"), "10/05/2023");
        assert_eq!(format_date("2023-05-10T14:30:00.000+00:00"), "10/05/2023");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("ontem"), "ontem");
    }

    #[test]
    fn test_age_on() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        assert_eq!(age_on("1990-06-15", today), Some(34));
        assert_eq!(age_on("1990-06-16", today), Some(33));
        assert_eq!(age_on("2030-01-01", today), None);
        assert_eq!(age_on("desconhecida", today), None);
    }
}
