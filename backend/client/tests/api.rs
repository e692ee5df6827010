use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use client::{
    api::{ClientError, RelayClient},
    contact::ContactForm,
    models::{SearchParams, Status},
};
use serde_json::json;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<(String, HashMap<String, String>)>>>);

impl Recorder {
    fn push(&self, path: String, fields: HashMap<String, String>) {
        self.0.lock().unwrap().push((path, fields));
    }

    fn calls(&self) -> Vec<(String, HashMap<String, String>)> {
        self.0.lock().unwrap().clone()
    }
}

async fn fake_filter(
    State(recorder): State<Recorder>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    recorder.push("/api/pessoas/aberto/filtro".to_string(), params);

    Json(json!({
        "content": [
            { "id": 7, "nome": "MARIA", "idade": 34, "ultimaOcorrencia": { "ocoId": 70, "status": "DESAPARECIDA" } },
            { "id": 8, "nome": "JOSE", "idade": 51, "ultimaOcorrencia": { "ocoId": 80, "status": "LOCALIZADO" } }
        ],
        "totalElements": 2,
        "totalPages": 1,
        "size": 10,
        "number": 0,
        "first": true,
        "last": true
    }))
}

async fn fake_person(State(recorder): State<Recorder>, Path(id): Path<u64>) -> Response {
    recorder.push(format!("/api/pessoas/{id}"), HashMap::new());

    match id {
        7 => Json(json!({ "id": 7, "nome": "MARIA", "ultimaOcorrencia": { "ocoId": 70 } }))
            .into_response(),
        9 => Json(json!({ "id": 9, "nome": "SEM OCORRENCIA" })).into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Erro ao carregar dados da pessoa", "message": "503" })),
        )
            .into_response(),
    }
}

async fn fake_tip(State(recorder): State<Recorder>, mut multipart: Multipart) -> impl IntoResponse {
    let mut fields = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let value = match file_name {
            Some(file_name) => format!("file:{file_name}"),
            None => field.text().await.unwrap_or_default(),
        };
        fields.insert(name, value);
    }
    recorder.push("/api/informacoes".to_string(), fields);

    Json(json!({ "success": true, "message": "Informações enviadas com sucesso", "data": null }))
}

async fn spawn_relay() -> (RelayClient, Recorder) {
    let recorder = Recorder::default();

    let relay = Router::new()
        .route("/api/pessoas/aberto/filtro", get(fake_filter))
        .route("/api/pessoas/{id}", get(fake_person))
        .route("/api/informacoes", post(fake_tip))
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, relay).await.unwrap() });

    let client = RelayClient::new(&format!("http://{address}/api/")).unwrap();

    (client, recorder)
}

fn contact_form() -> ContactForm {
    ContactForm {
        nome: "Carla Dias".to_string(),
        telefone: "65999998888".to_string(),
        email: "carla@example.com".to_string(),
        localizacao: "Praça Alencastro".to_string(),
        observacoes: "Estava sentada no banco".to_string(),
        data_visto: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        foto: None,
    }
}

#[tokio::test]
async fn test_search_sends_filters() {
    let (relay, recorder) = spawn_relay().await;

    let params = SearchParams {
        nome: Some("maria".to_string()),
        status: Some(Status::Desaparecida),
        ..SearchParams::new()
    };
    let page = relay.get_persons(&params).await.unwrap();

    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[1].ultima_ocorrencia.status(), Status::Localizada);

    let calls = recorder.calls();
    assert_eq!(calls[0].1["nome"], "maria");
    assert_eq!(calls[0].1["status"], "DESAPARECIDA");
    assert_eq!(calls[0].1["pagina"], "0");
    assert_eq!(calls[0].1["porPagina"], "10");
    assert!(!calls[0].1.contains_key("sexo"));
}

#[tokio::test]
async fn test_relay_error_surfaces() {
    let (relay, _) = spawn_relay().await;

    let err = relay.get_person(5).await.unwrap_err();

    assert!(matches!(err, ClientError::LoadPerson(_)));
}

#[tokio::test]
async fn test_inform_posts_tip_for_occurrence() {
    let (relay, recorder) = spawn_relay().await;

    let receipt = client::inform(&relay, 7, contact_form()).await.unwrap();

    assert!(receipt.success);
    assert_eq!(receipt.message, "Informações enviadas com sucesso");

    let calls = recorder.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "/api/pessoas/7");

    let (path, fields) = &calls[1];
    assert_eq!(path, "/api/informacoes");
    assert_eq!(fields["ocoId"], "70");
    assert_eq!(fields["dataVisto"], "2024-03-01");
    assert!(fields["observacoes"].starts_with("Estava sentada no banco"));
    assert!(fields["observacoes"].contains("(65) 99999-8888"));
    assert!(!fields.contains_key("foto"));
}

#[tokio::test]
async fn test_inform_attaches_photo() {
    let (relay, recorder) = spawn_relay().await;

    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("praca.png");
    std::fs::write(&photo, [0x89, b'P', b'N', b'G']).unwrap();

    let form = ContactForm {
        foto: Some(photo),
        ..contact_form()
    };
    client::inform(&relay, 7, form).await.unwrap();

    assert_eq!(recorder.calls()[1].1["foto"], "file:praca.png");
}

#[tokio::test]
async fn test_invalid_form_stays_local() {
    let (relay, recorder) = spawn_relay().await;

    let form = ContactForm {
        email: "sem-arroba".to_string(),
        ..contact_form()
    };
    let err = client::inform(&relay, 7, form).await.unwrap_err();

    match err {
        ClientError::Invalid(errors) => assert_eq!(errors.get("email"), Some("Email inválido")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_person_without_occurrence() {
    let (relay, recorder) = spawn_relay().await;

    let err = client::inform(&relay, 9, contact_form()).await.unwrap_err();

    assert!(matches!(err, ClientError::NoOccurrence));
    assert_eq!(recorder.calls().len(), 1);
}
