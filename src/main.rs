use anyhow::{anyhow, Result};
use elemental::dom::EventInit;
use elemental::{logging, Config, Document, ElementFactory, ElementOptions, Event, Tags, Value};
use serde_json::json;
use tracing::info;

fn main() -> Result<()> {
    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("world"));

    let config = Config::from_env()?;
    logging::init_tracing(&config.log_filter);

    let document = Document::new();
    let tags = Tags::new(ElementFactory::with_config(config).with_document(document.clone()));

    let title = tags.h1("elemental")?;
    let status = tags.span(
        ElementOptions::new()
            .attribute("id", "status")
            .content("idle"),
    )?;
    let button = tags.button(
        ElementOptions::new()
            .attribute("type", "button")
            .style("padding", "4px 8px")
            .content("Greet"),
    )?;

    let status_text = status.original_prototype().clone();
    button.event().set(
        "click",
        Value::function(move |_| status_text.set_text_content("clicked")),
    );
    let greeting = status.original_prototype().clone();
    button.event().set(
        "greet",
        Value::function(move |event: &Event| {
            let who = event.detail()["name"].as_str().unwrap_or("nobody");
            greeting.set_text_content(&format!("hello, {who}"));
        }),
    );

    let app = tags.div(
        ElementOptions::new()
            .attribute("class", "app")
            .child(&title)
            .child(&status)
            .child(&button),
    )?;
    document
        .body()
        .ok_or_else(|| anyhow!("document has no body"))?
        .append_child(&app)?;

    button.dispatch_event(&Event::new("click", EventInit::default()));
    info!(status = %status.text_content(), "after click");

    let greet = button
        .event()
        .context("greet")
        .ok_or_else(|| anyhow!("greet binding missing"))?;
    greet.fire("greet", json!({ "name": name }));

    println!("{}", document.to_html());
    Ok(())
}
