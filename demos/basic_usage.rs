//! Basic activity feed usage example
//!
//! Demonstrates a feed that fans out to the console and to a JSON lines file,
//! with level gating, masked values and an exception chain.
//!
//! Run with: cargo run --example basic_usage

use activity_feed::prelude::*;
use activity_feed::{traced_error, ConsoleSink, JsonSink};
use serde::Serialize;

#[derive(Serialize)]
struct Customer {
    id: u64,
    name: String,
    email: Masked<String>,
}

fn main() -> Result<()> {
    println!("=== Activity Feed - Basic Usage Example ===\n");

    let path = std::env::temp_dir().join("activity_feed_basic_usage.jsonl");

    // Console shows INFO and above, the file keeps everything
    let feed = ActivityFeed::builder()
        .logging(ConsoleSink::new().with_min_level(ActivityLevel::Info))
        .logging(JsonSink::file(&path)?.with_min_level(ActivityLevel::Trace))
        .build()?;

    println!("1. Recording activities at different levels:");
    feed.add(&Activity::debug("config-loading", "Loading configuration")?)?;
    feed.add(
        &an_informational_activity()
            .with_identifier("file-saved")
            .with_message("File saved")
            .with("filename", "example.pdf")
            .with("size", 1024)
            .build()?,
    )?;
    feed.add(&Activity::warn_with(
        "quota-near",
        "Quota nearly used",
        |context| {
            context.insert("used", 95);
            context.insert("limit", 100);
        },
    )?)?;

    println!("\n2. Recording a serialized value with a masked field:");
    let customer = Customer {
        id: 42,
        name: "Jane Doe".to_string(),
        email: Masked::new("jane@example.com".to_string()),
    };
    feed.add(
        &an_informational_activity()
            .with_identifier("customer-saved")
            .with_message("Customer saved")
            .with_serialized("customer", &customer, &ContextSerializer::new())?
            .build()?,
    )?;

    println!("\n3. Recording an error with its cause:");
    let error = traced_error!("Order {} could not be shipped", 7)
        .caused_by(std::io::Error::new(std::io::ErrorKind::NotFound, "warehouse offline"));
    feed.add(
        &an_error_activity()
            .with_identifier("shipping-failed")
            .with_message("Shipping failed")
            .with_exception(&error)
            .build()?,
    )?;

    println!("\n4. Skipping work for disabled levels:");
    let recorded = feed.add_if_enabled(ActivityLevel::Trace, || {
        Activity::trace("cache-lookup", "Cache lookup")
    })?;
    println!("   trace activity recorded: {}", recorded);

    // Dropping the feed flushes the JSON sink
    drop(feed);

    println!("\n=== Example completed successfully! ===");
    println!("Check '{}' for the JSON lines output", path.display());

    Ok(())
}
