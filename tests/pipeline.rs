//! End-to-end: packed corpus files -> prepared indexes -> search service -> HTTP.

use std::path::Path;
use std::sync::Arc;
use folio::core::config::Config;
use folio::core::error::ErrorKind;
use folio::corpus::prepare::CorpusPreparer;
use folio::index::memory::MemoryIndex;
use folio::query::ast::{QueryInput, QuerySpec};
use folio::search::service::SearchService;
use serde_json::json;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn write_corpus(dir: &Path) {
    let emma = json!([
        {
            "_id": 1, "title": "Emma", "author": "Jane Austen", "url": "https://example.org/emma",
            "year": 1815, "volume": 1, "chapter": 1, "paragraph": 1,
            "text": "Emma Woodhouse, handsome, clever, and rich, with a comfortable home and happy disposition, seemed to unite some of the best blessings of existence."
        },
        {
            "_id": 2, "title": "Emma", "author": "Jane Austen", "url": "https://example.org/emma",
            "year": 1815, "volume": 1, "chapter": 5, "paragraph": 3,
            "text": "“Dear Emma,” said Mr. Knightley, “you are _very_ fond of Harriet Smith.”"
        }
    ]);
    let persuasion = json!([
        {
            "_id": 3, "title": "Persuasion", "author": "Jane Austen", "url": "https://example.org/persuasion",
            "year": 1817, "chapter": "Preface", "paragraph": 1,
            "text": "Sir Walter Elliot, of Kellynch Hall, never took up any book but the Baronetage. Mrs. B. arrived. She left."
        }
    ]);
    std::fs::write(dir.join("emma.json"), emma.to_string()).unwrap();
    std::fs::write(dir.join("persuasion.json"), persuasion.to_string()).unwrap();
}

fn service(dir: &TempDir) -> SearchService<MemoryIndex> {
    write_corpus(dir.path());
    let config = Config { corpus_dir: dir.path().to_path_buf(), workers: 2, ..Config::default() };
    let prepared = CorpusPreparer::from_config(&config).prepare(&config.corpus_dir).unwrap();
    assert_eq!(prepared.stats.paragraphs, 3);
    SearchService::new(Arc::new(prepared.paragraphs), Arc::new(prepared.phrases), config)
}

#[tokio::test]
async fn test_single_word_prefix_search() {
    let dir = TempDir::new().unwrap();
    let response = service(&dir).search("Harr").await.unwrap();

    assert_eq!(response.query_tokens, vec!["harr"]);
    assert_eq!(response.items.len(), 1);
    let item = &response.items[0];
    assert_eq!(item.icon, "emma.jpg");
    assert_eq!(item.citation(), "Vol. 1, Ch. 5");
    assert!(item.html.as_deref().unwrap().contains("<strong>Harriet</strong>"));
    assert!(item.html.as_deref().unwrap().contains("<em>very</em>"));
}

#[tokio::test]
async fn test_phrase_prefix_and_exact_phrase() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let typing = service.search("dear em").await.unwrap();
    assert_eq!(typing.items.len(), 1);
    assert_eq!(typing.items[0].paragraph.as_deref(), Some("3"));

    // Quoted text needs the complete word
    let exact = service.search("\"dear em\"").await.unwrap();
    assert!(exact.items.is_empty());
    let exact = service.search("\"dear Emma\"").await.unwrap();
    assert_eq!(exact.items.len(), 1);
}

#[tokio::test]
async fn test_honorific_does_not_break_sentences() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    // "Mrs. B. arrived" stays one sentence, so the phrase index holds it
    let items = service.typeahead("Mrs. B. arr").await.unwrap().items;
    assert_eq!(items, vec![vec!["Mrs.", "B.", "arrived"]]);

    let hits = service.search(QueryInput::CompiledQuery(QuerySpec::phrase(
        &["mrs.".to_string(), "b.".to_string(), "arrived".to_string()],
        "text",
    ))).await.unwrap();
    assert_eq!(hits.items.len(), 1);
    assert_eq!(hits.items[0].clip.chars().count(), 80);
    assert!(hits.items[0].clip.ends_with("..."));
}

#[tokio::test]
async fn test_typeahead_restores_case_and_ranks() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let items = service.typeahead("EM").await.unwrap().items;
    assert_eq!(items, vec![vec!["EMma"]]);

    let items = service.typeahead("h").await.unwrap().items;
    assert_eq!(items, vec![
        vec!["hall"], vec!["handsome"], vec!["happy"], vec!["harriet"], vec!["home"],
    ]);
}

#[tokio::test]
async fn test_query_with_sentence_punctuation() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let response = service.search("Kellynch Hall.").await.unwrap();
    assert_eq!(response.query_tokens, vec!["kellynch", "hall"]);
    assert_eq!(response.items.len(), 1);
    assert!(response.items[0].html.as_deref().unwrap().contains("<strong>Kellynch Hall</strong>"));

    assert_eq!(service.search("Knightley?").await.unwrap().items.len(), 1);
}

#[tokio::test]
async fn test_unknown_field_is_an_index_failure() {
    let dir = TempDir::new().unwrap();
    let err = service(&dir)
        .search(QuerySpec::term("emma", "body"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownField);
}

async fn http_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path);
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_http_routes() {
    let dir = TempDir::new().unwrap();
    let app = folio::server::router(Arc::new(service(&dir)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let typeahead = http_get(addr, "/typeahead/?q=Dear%20Em").await;
    assert!(typeahead.starts_with("HTTP/1.1 200"));
    assert!(typeahead.contains(r#""items":[["Dear","Emma"]]"#));

    let search = http_get(addr, "/search/?q=kellynch").await;
    assert!(search.starts_with("HTTP/1.1 200"));
    assert!(search.contains(r#""title":"Persuasion""#));
    assert!(search.contains(r#""queryTokens":["kellynch"]"#));

    let empty = http_get(addr, "/search/").await;
    assert!(empty.contains(r#""items":[]"#));
}
