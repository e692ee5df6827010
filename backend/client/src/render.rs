use chrono::NaiveDate;
use comfy_table::{Cell, Table};

use crate::{
    models::{Page, Person},
    utils::{format_date, format_phone, status_label},
};

const MISSING: &str = "-";

pub fn render_page(page: &Page<Person>, today: NaiveDate) -> String {
    if page.content.is_empty() {
        return "Nenhuma pessoa encontrada.\n".to_string();
    }

    let mut output = format!(
        "=== Pessoas ({} encontradas) ===\n\n",
        page.total_elements
    );

    let mut table = Table::new();
    table.set_header(vec!["ID", "Nome", "Idade", "Desaparecimento", "Local", "Situação"]);
    for person in &page.content {
        let ocorrencia = &person.ultima_ocorrencia;
        let status = status_label(ocorrencia.status().as_str());

        table.add_row(vec![
            Cell::new(person.id),
            Cell::new(&person.nome),
            Cell::new(age_text(person, today)),
            Cell::new(date_text(ocorrencia.dt_desaparecimento.as_deref())),
            Cell::new(
                ocorrencia
                    .local_desaparecimento_concat
                    .as_deref()
                    .unwrap_or(MISSING),
            ),
            Cell::new(status.text).fg(status.tone.color()),
        ]);
    }
    output.push_str(&table.to_string());
    output.push('\n');

    output.push_str(&format!(
        "\nPágina {} de {}",
        page.number + 1,
        page.total_pages.max(1)
    ));
    if !page.last {
        output.push_str(&format!(" (próxima: --pagina {})", page.number + 1));
    }
    output.push('\n');

    output
}

pub fn render_person(person: &Person, today: NaiveDate) -> String {
    let ocorrencia = &person.ultima_ocorrencia;
    let status = status_label(ocorrencia.status().as_str());

    let mut output = format!("=== {} ===\n", person.nome);
    output.push_str(&format!("Situação:        {}\n", status.text));
    output.push_str(&format!("Idade:           {}\n", age_text(person, today)));
    if let Some(birth) = &person.data_nascimento {
        output.push_str(&format!("Nascimento:      {}\n", format_date(birth)));
    }
    if let Some(sexo) = &person.sexo {
        output.push_str(&format!("Sexo:            {sexo}\n"));
    }
    if let Some(foto) = &person.url_foto {
        output.push_str(&format!("Foto:            {foto}\n"));
    }

    output.push_str("\n--- Ocorrência ---\n");
    push_field(&mut output, "Número", ocorrencia.oco_id.map(|id| id.to_string()).as_deref());
    push_field(
        &mut output,
        "Desaparecimento",
        ocorrencia.dt_desaparecimento.as_deref().map(format_date).as_deref(),
    );
    push_field(&mut output, "Local", ocorrencia.local_desaparecimento_concat.as_deref());
    push_field(&mut output, "Boletim", ocorrencia.boletim_ocorrencia.as_deref());
    push_field(
        &mut output,
        "Localização",
        ocorrencia.data_localizacao.as_deref().map(format_date).as_deref(),
    );
    if let Some(vivo) = ocorrencia.encontrado_vivo {
        push_field(&mut output, "Encontrado vivo", Some(if vivo { "Sim" } else { "Não" }));
    }

    if let Some(c) = &person.caracteristicas {
        output.push_str("\n--- Características ---\n");
        for (label, value) in [
            ("Cor da pele", &c.cor),
            ("Sexo", &c.sexo),
            ("Olhos", &c.olhos),
            ("Cabelos", &c.cabelos),
            ("Tipo físico", &c.tipo_fisico),
            ("Altura", &c.altura),
            ("Peso", &c.peso),
            ("Deficiência", &c.deficiencia),
            ("Acessórios", &c.acessorio),
            ("Cicatrizes", &c.cicatriz),
            ("Tatuagens", &c.tatuagem),
            ("Outros", &c.outros),
        ] {
            push_field(&mut output, label, value.as_deref());
        }
    }

    if let Some(contato) = &person.contato {
        output.push_str("\n--- Contato ---\n");
        push_field(&mut output, "Nome", contato.nome.as_deref());
        push_field(
            &mut output,
            "Telefone",
            contato.telefone.as_deref().map(format_phone).as_deref(),
        );
        push_field(&mut output, "Email", contato.email.as_deref());
    }

    output
}

fn push_field(output: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        output.push_str(&format!("{:<16} {value}\n", format!("{label}:")));
    }
}

fn age_text(person: &Person, today: NaiveDate) -> String {
    person
        .age(today)
        .map(|age| format!("{age} anos"))
        .unwrap_or_else(|| MISSING.to_string())
}

fn date_text(date: Option<&str>) -> String {
    date.map(format_date).unwrap_or_else(|| MISSING.to_string())
}
