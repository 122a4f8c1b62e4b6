//! Prometheus counters for form generation, served on `/metrics/forms`. HTTP request
//! metrics stay on `/metrics` with the middleware's own registry.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref FORMS_GENERATED: IntCounterVec = register(
        "forms_generated_total",
        "Filled PDF documents produced",
        &["form"],
    );
    pub static ref FIELD_WARNINGS: IntCounterVec = register(
        "form_field_warnings_total",
        "Fields that could not be written",
        &["form", "reason"],
    );
    pub static ref GENERATION_FAILURES: IntCounterVec = register(
        "form_generation_failures_total",
        "Generation calls aborted by a structural error",
        &["form"],
    );
}

fn register(name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    let counter = IntCounterVec::new(Opts::new(name, help), labels)
        .expect("counter options are statically valid");
    if let Err(e) = REGISTRY.register(Box::new(counter.clone())) {
        log::error!("Failed to register metric {}: {}", name, e);
    }
    counter
}

/// Text exposition of every form counter.
pub fn render() -> Result<(String, String), prometheus::Error> {
    let encoder = TextEncoder::new();
    let text = encoder.encode_to_string(&REGISTRY.gather())?;
    Ok((encoder.format_type().to_string(), text))
}
