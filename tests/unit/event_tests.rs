/*!
 * Wire-format tests for the client-visible event model.
 *
 * These shapes are the contract with the demo page and any external client;
 * field names and the `type` tag must not drift.
 */

use serde_json::Value;
use streamlate::pipeline::StreamEvent;

fn to_value(event: &StreamEvent) -> Value {
    serde_json::to_value(event).expect("serialize event")
}

#[test]
fn test_original_shouldSerializeWithTypeTag() {
    let value = to_value(&StreamEvent::Original { text: "chunk".to_string() });
    assert_eq!(value["type"], "original");
    assert_eq!(value["text"], "chunk");
}

#[test]
fn test_translation_shouldCarrySequenceIndex() {
    let value = to_value(&StreamEvent::Translation { index: 7, text: "hola".to_string() });
    assert_eq!(value["type"], "translation");
    assert_eq!(value["index"], 7);
    assert_eq!(value["text"], "hola");
}

#[test]
fn test_streamScopedError_shouldHaveNoIndexField() {
    let value = to_value(&StreamEvent::Error {
        index: None,
        message: "upstream failed".to_string(),
    });
    assert_eq!(value["type"], "error");
    assert!(value.get("index").is_none());
}

#[test]
fn test_sentenceScopedError_shouldHaveIndexField() {
    let value = to_value(&StreamEvent::Error {
        index: Some(3),
        message: "translation failed".to_string(),
    });
    assert_eq!(value["index"], 3);
}

#[test]
fn test_done_shouldSerializeToBareTypeObject() {
    let value = to_value(&StreamEvent::Done);
    assert_eq!(value, serde_json::json!({ "type": "done" }));
}

#[test]
fn test_events_shouldDeserializeFromClientShapes() {
    let event: StreamEvent =
        serde_json::from_str(r#"{"type":"translation","index":1,"text":"bonjour"}"#)
            .expect("deserialize");
    assert_eq!(event, StreamEvent::Translation { index: 1, text: "bonjour".to_string() });
}
