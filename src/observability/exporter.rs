//! OpenTelemetry span exporter writing one JSON object per finished span.
//!
//! Each line looks like:
//!
//! ```json
//! {"name":"api_request","traceId":"…","spanId":"…","parentSpanId":"…",
//!  "start":"2026-10-19T12:00:00.000000Z","durationMicros":5120,
//!  "attributes":{"operation":"create order"},"events":[],"status":"unset"}
//! ```

use super::file_writer::RotatingWriter;
use chrono::{DateTime, SecondsFormat, Utc};
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

/// Exports spans to a [`RotatingWriter`] as JSON lines.
#[derive(Debug)]
pub struct JsonLinesExporter {
    writer: RotatingWriter,
    is_shutdown: AtomicBool,
}

impl JsonLinesExporter {
    #[must_use]
    pub const fn new(writer: RotatingWriter) -> Self {
        Self {
            writer,
            is_shutdown: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        for span in batch {
            self.writer
                .write_line(&span_to_json(span).to_string())
                .map_err(|e| TraceError::from(e.to_string()))?;
        }
        Ok(())
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = if self.is_shutdown.load(Ordering::SeqCst) {
            Err(TraceError::from("exporter is shut down"))
        } else {
            self.write_batch(&batch)
        };
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }
}

/// Builds a provider that exports every span as soon as it ends.
#[must_use]
pub fn create_tracer_provider(writer: RotatingWriter, resource: Resource) -> TracerProvider {
    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(JsonLinesExporter::new(writer))
        .build()
}

fn timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

fn attributes(pairs: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = pairs
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn status(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description.to_string() }),
    }
}

/// One span as a JSON object.
#[must_use]
pub fn span_to_json(span: &SpanData) -> JsonValue {
    let duration = span
        .end_time
        .duration_since(span.start_time)
        .unwrap_or_default();

    let parent = (span.parent_span_id != SpanId::INVALID)
        .then(|| format!("{:016x}", span.parent_span_id));

    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "name": event.name,
                "time": timestamp(event.timestamp),
                "attributes": attributes(&event.attributes),
            })
        })
        .collect();

    json!({
        "name": span.name,
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": parent,
        "start": timestamp(span.start_time),
        "durationMicros": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
        "attributes": attributes(&span.attributes),
        "events": events,
        "status": status(&span.status),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{Span as _, Tracer as _, TracerProvider as _};

    #[test]
    fn finished_spans_become_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let provider =
            create_tracer_provider(RotatingWriter::new(path.clone()), Resource::empty());

        let tracer = provider.tracer("test");
        let mut span = tracer.start("api_request");
        span.set_attribute(KeyValue::new("operation", "create order"));
        span.set_attribute(KeyValue::new("items", 2_i64));
        span.end();

        let content = std::fs::read_to_string(&path).unwrap();
        let line: JsonValue = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(line["name"], "api_request");
        assert_eq!(line["attributes"]["operation"], "create order");
        assert_eq!(line["attributes"]["items"], 2);
        assert_eq!(line["parentSpanId"], JsonValue::Null);
        assert_eq!(line["status"], "unset");
        assert!(line["start"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn shut_down_exporter_rejects_batches() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter =
            JsonLinesExporter::new(RotatingWriter::new(dir.path().join("trace.jsonl")));
        exporter.shutdown();

        let result = futures_util::FutureExt::now_or_never(exporter.export(Vec::new()));
        assert!(matches!(result, Some(Err(_))));
    }
}
