//! Integration tests for the activity feed
//!
//! These tests verify:
//! - Builder validation and rendered context shape
//! - Serialization of object graphs, masking included
//! - Exception context extraction
//! - Fan-out and level gating through the feed
//! - JSON output end to end

use activity_feed::masking::{self, reveal_edges, Masked};
use activity_feed::prelude::*;
use activity_feed::recorders::{JsonSink, MemorySink};
use activity_feed::{context, context_from, impl_masked_serialize, traced_error, ContextValue};
use parking_lot::Mutex;
use serde::Serialize;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Serialize)]
struct Person {
    name: String,
    age: u32,
}

struct FullName(String);

impl MaskedValue for FullName {}

#[derive(Serialize)]
struct Account {
    id: u64,
    #[serde(serialize_with = "masking::serialize")]
    holder: FullName,
    owner: Masked<String>,
}

struct CardNumber(String);

impl MaskedValue for CardNumber {}
impl_masked_serialize!(CardNumber);

#[derive(Serialize)]
struct Checkout {
    cards: Vec<CardNumber>,
    fallback: Option<CardNumber>,
}

fn rendered_inner(activity: &Activity) -> Context {
    activity
        .context()
        .get("context")
        .and_then(ContextValue::as_map)
        .cloned()
        .expect("rendered context")
}

#[test]
fn test_build_renders_identifier_only() {
    for level in ActivityLevel::ALL {
        let activity = an_activity()
            .level(level)
            .with_identifier("heartbeat")
            .with_message("Heartbeat")
            .build()
            .expect("valid activity");

        let inner = rendered_inner(&activity);
        assert_eq!(inner.len(), 1);
        assert_eq!(inner.get("identifier"), Some(&ContextValue::from("heartbeat")));
    }
}

#[test]
fn test_blank_fields_fail_at_build_time() {
    let blank_identifier = an_informational_activity()
        .with_identifier(" \t")
        .with_message("Message")
        .build();
    let blank_message = an_informational_activity()
        .with_identifier("id")
        .with_message("")
        .build();

    assert!(blank_identifier.unwrap_err().is_invalid_argument());
    assert!(blank_message.unwrap_err().is_invalid_argument());
}

#[test]
fn test_person_serializes_in_declaration_order() {
    let serializer = ContextSerializer::new();
    let person = Person {
        name: "Jane Doe".to_string(),
        age: 20,
    };

    let context = serializer.to_context_map(&person).expect("serializable");

    assert_eq!(context.keys().collect::<Vec<_>>(), vec!["name", "age"]);
    assert_eq!(context.get("name"), Some(&ContextValue::from("Jane Doe")));
    assert_eq!(context.get("age"), Some(&ContextValue::Int(20)));
    assert_eq!(context, serializer.to_context_map(&person).expect("serializable"));
}

#[test]
fn test_masked_fields_never_leak() {
    let serializer = ContextSerializer::new();
    let account = Account {
        id: 1,
        holder: FullName("Jane Doe".to_string()),
        owner: Masked::with("Jane Doe".to_string(), |name: &String, out: &mut String| {
            reveal_edges(name, out)
        }),
    };

    let context = serializer.to_context_map(&account).expect("serializable");

    assert_eq!(context.get("holder").and_then(ContextValue::as_str), Some("*****"));
    assert_eq!(context.get("owner").and_then(ContextValue::as_str), Some("J*****e"));
    let json = serde_json::to_string(&context).expect("json");
    assert!(!json.contains("Jane Doe"));
}

#[test]
fn test_masked_type_stays_masked_inside_containers() {
    let checkout = Checkout {
        cards: vec![
            CardNumber("4111111111111111".to_string()),
            CardNumber("5500000000000004".to_string()),
        ],
        fallback: Some(CardNumber("340000000000009".to_string())),
    };

    let activity = an_informational_activity()
        .with_identifier("checkout-started")
        .with_message("Checkout started")
        .with_serialized("checkout", &checkout, &ContextSerializer::new())
        .expect("serializable")
        .build()
        .expect("valid activity");

    let json = serde_json::to_string(&activity.context()).expect("json");
    assert!(json.contains(r#""cards":["*****","*****"]"#));
    assert!(json.contains(r#""fallback":"*****""#));
    for number in ["4111111111111111", "5500000000000004", "340000000000009"] {
        assert!(!json.contains(number));
    }

    let direct = serde_json::to_string(&checkout).expect("json");
    assert_eq!(direct, r#"{"cards":["*****","*****"],"fallback":"*****"}"#);
}

#[test]
fn test_exception_chain_in_activity() {
    let cause = traced_error!("Previous exception");
    let error = traced_error!("Something went wrong").caused_by(cause);

    let activity = an_error_activity()
        .with_identifier("application-error")
        .with_message("Application error")
        .with_exception(&error)
        .build()
        .expect("valid activity");

    let exception = rendered_inner(&activity)
        .get("exception")
        .and_then(ContextValue::as_map)
        .cloned()
        .expect("exception context");
    assert_eq!(exception.get("message"), Some(&ContextValue::from("Something went wrong")));
    assert!(!exception
        .get("trace")
        .and_then(ContextValue::as_sequence)
        .expect("trace")
        .is_empty());
    let previous = exception.get("previous").and_then(ContextValue::as_map).expect("previous");
    assert_eq!(previous.get("message"), Some(&ContextValue::from("Previous exception")));
}

#[test]
fn test_frameless_error_context() {
    let error = TracedError::new("Something went wrong");

    let context = context_from(&error);

    assert_eq!(
        context,
        context! {
            "message" => "Something went wrong",
            "trace" => Vec::<String>::new(),
        }
    );
}

struct Journal {
    name: &'static str,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl ActivityRecorder for Journal {
    fn record(&self, _activity: &Activity) -> Result<()> {
        self.calls.lock().push(self.name);
        Ok(())
    }
}

#[test]
fn test_fan_out_calls_each_recorder_once() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let feed = ActivityFeed::builder()
        .recorder(Journal {
            name: "A",
            calls: Arc::clone(&calls),
        })
        .recorder(Journal {
            name: "B",
            calls: Arc::clone(&calls),
        })
        .build()
        .expect("non-empty feed");

    feed.add(&Activity::info("file-saved", "File saved").expect("valid"))
        .expect("recorded");

    assert_eq!(*calls.lock(), vec!["A", "B"]);
}

#[test]
fn test_gating_through_feed() {
    let sink = Arc::new(MemorySink::with_min_level(ActivityLevel::Warn));
    let feed = ActivityFeed::with_logging(Arc::clone(&sink));

    feed.add(&Activity::debug("cache-miss", "Cache miss").expect("valid"))
        .expect("recorded");
    assert!(sink.is_empty());

    let warning = Activity::warn_with("disk-low", "Disk space low", |context| {
        context.insert("free_mb", 120);
    })
    .expect("valid");
    feed.add(&warning).expect("recorded");

    let emissions = sink.emissions();
    assert_eq!(emissions.len(), 1);
    assert_eq!(emissions[0].message, "Disk space low");
    assert_eq!(emissions[0].context, warning.context());
}

#[test]
fn test_json_output_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("activities.jsonl");

    {
        let sink = JsonSink::file(&path)
            .expect("Failed to create sink")
            .with_min_level(ActivityLevel::Info);
        let feed = ActivityFeed::with_logging(sink);
        let serializer = ContextSerializer::new();

        let activity = an_informational_activity()
            .with_identifier("person-registered")
            .with_message("Person registered")
            .with_serialized(
                "person",
                &Person {
                    name: "Jane Doe".to_string(),
                    age: 20,
                },
                &serializer,
            )
            .expect("serializable")
            .build()
            .expect("valid");
        feed.add(&activity).expect("recorded");
        feed.add(&Activity::trace("ignored", "Ignored").expect("valid"))
            .expect("recorded");
    }

    let content = fs::read_to_string(&path).expect("Failed to read output");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);

    let parsed: serde_json::Value = serde_json::from_str(lines[0]).expect("valid JSON");
    assert_eq!(parsed["level"], "INFO");
    assert_eq!(parsed["context"]["identifier"], "person-registered");
    assert_eq!(parsed["context"]["person"]["name"], "Jane Doe");
    assert_eq!(parsed["context"]["person"]["age"], 20);
}

#[test]
fn test_level_parsed_from_configuration() {
    let level: ActivityLevel = "warning".parse().expect("known level");
    let sink = MemorySink::with_min_level(level);

    assert!(!sink.is_level_enabled(ActivityLevel::Info));
    assert!(sink.is_level_enabled(ActivityLevel::Error));
}
