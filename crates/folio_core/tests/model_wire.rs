use folio_core::{Document, DocumentKind, LinkItem, QuizQuestion};
use serde_json::json;
use uuid::Uuid;

#[test]
fn document_serializes_with_snake_case_kind() {
    let mut document = Document::new(DocumentKind::Note, "Title", "Body", 10);
    document.category_tags.insert("rust".to_string());

    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(value["kind"], "note");
    assert_eq!(value["category_tags"], json!(["rust"]));
    assert_eq!(value["created_at"], 10);
}

#[test]
fn document_without_tags_deserializes_with_empty_set() {
    let id = Uuid::new_v4();
    let document: Document = serde_json::from_value(json!({
        "id": id,
        "kind": "post",
        "title": "T",
        "body": "",
        "created_at": 1,
        "updated_at": 2
    }))
    .unwrap();
    assert_eq!(document.id, id);
    assert_eq!(document.kind, DocumentKind::Post);
    assert!(document.category_tags.is_empty());
    assert_eq!(document.primary_timestamp(), 1);
}

#[test]
fn link_item_and_question_shapes() {
    let link = LinkItem {
        kind: DocumentKind::Post,
        title: "T".to_string(),
        timestamp: 5,
        url: "/blog/x/".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&link).unwrap(),
        json!({"kind": "post", "title": "T", "timestamp": 5, "url": "/blog/x/"})
    );

    let question: QuizQuestion = serde_json::from_value(json!({
        "prompt": "p",
        "choices": ["a", "b"],
        "answer_index": 1
    }))
    .unwrap();
    assert_eq!(question.answer(), "b");
}
