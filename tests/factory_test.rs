use std::collections::BTreeMap;

use elemental::{Document, DomError, ElementFactory, ElementOptions, Value};

fn factory() -> (Document, ElementFactory) {
    let document = Document::new();
    let factory = ElementFactory::new().with_document(document.clone());
    (document, factory)
}

#[test]
fn create_div_from_options_record() {
    let (_document, factory) = factory();
    let element = factory
        .create(
            "div",
            Value::object([
                ("content", Value::from("hi")),
                ("attributes", Value::object([("id", Value::from("x"))])),
            ]),
        )
        .expect("create div");

    assert_eq!(element.local_name(), "div");
    assert_eq!(element.get_attribute("id").as_deref(), Some("x"));
    assert_eq!(element.text_content(), "hi");
    assert_eq!(element.outer_html(), r#"<div id="x">hi</div>"#);
}

#[test]
fn created_element_reflects_every_option() {
    let (_document, factory) = factory();
    let options = ElementOptions::new()
        .attribute("id", "card")
        .attribute("data-kind", "note")
        .style("color", "red")
        .style("margin-top", "2px")
        .content("body text");

    let element = factory
        .create("article", options.clone())
        .expect("create article");

    assert_eq!(element.local_name(), "article");
    assert_eq!(
        element.attributes().get("data-kind").map(String::as_str),
        Some("note")
    );
    assert_eq!(element.attributes().get("id").map(String::as_str), Some("card"));
    let style: BTreeMap<String, String> = element.style().into_iter().collect();
    assert_eq!(style, options.style);
    assert_eq!(element.text_content(), "body text");
}

#[test]
fn positional_arguments_are_used_verbatim() {
    let (_document, factory) = factory();
    let element = factory
        .create_with(
            "p",
            "text",
            Some(BTreeMap::from([("color".to_string(), "blue".to_string())])),
            Some(BTreeMap::from([("title".to_string(), "t".to_string())])),
            None,
            None,
            &[],
        )
        .expect("create p");
    assert_eq!(element.text_content(), "text");
    assert_eq!(element.style_property("color").as_deref(), Some("blue"));
    assert_eq!(element.get_attribute("title").as_deref(), Some("t"));
}

#[test]
fn options_record_overrides_positional_arguments() {
    let (_document, factory) = factory();
    let element = factory
        .create_with(
            "p",
            Value::object([("content", Value::from("record"))]),
            Some(BTreeMap::from([("color".to_string(), "blue".to_string())])),
            Some(BTreeMap::from([("title".to_string(), "t".to_string())])),
            None,
            None,
            &[],
        )
        .expect("create p");
    assert_eq!(element.text_content(), "record");
    assert!(element.style().is_empty());
    assert!(!element.has_attribute("title"));
}

#[test]
fn non_string_content_is_never_assigned() {
    let (document, factory) = factory();
    let child = document
        .create_element("b", Default::default())
        .expect("create child");
    let element = factory
        .create_with("div", Value::Number(5.0), None, None, None, None, &[child])
        .expect("create div");
    assert_eq!(element.children().len(), 1);
    assert_eq!(element.inner_html(), "<b></b>");
}

#[test]
fn content_is_literal_text() {
    let (_document, factory) = factory();
    let element = factory.create("div", "<em>x</em>").expect("create div");
    assert!(element.children().is_empty());
    assert_eq!(element.text_content(), "<em>x</em>");
}

#[test]
fn steps_apply_in_order() {
    let (_document, factory) = factory();
    let first = factory.create("li", "one").expect("create li");
    let second = factory.create("li", "two").expect("create li");
    let list = factory
        .create(
            "ul",
            ElementOptions::new()
                .attribute("style", "color: red;")
                .style("color", "green")
                .content("items:")
                .child(&first)
                .child(&second),
        )
        .expect("create ul");

    assert_eq!(list.style_property("color").as_deref(), Some("green"));
    assert_eq!(
        list.outer_html(),
        r#"<ul style="color: green;">items:<li>one</li><li>two</li></ul>"#
    );
    let children = list.children();
    assert!(children[0].ptr_eq(&first));
    assert!(children[1].ptr_eq(&second));
}

#[test]
fn use_document_selects_host_document() {
    let (default_document, factory) = factory();
    let other = Document::new();
    let element = factory
        .create("span", ElementOptions::new().document(&other))
        .expect("create span");
    assert!(element.owner_document().expect("owner").ptr_eq(&other));
    assert_eq!(other.created_elements(), 1);
    assert_eq!(default_document.created_elements(), 0);
}

#[test]
fn web_component_name_sets_extension_point() {
    let (_document, factory) = factory();
    let element = factory
        .create(
            "button",
            Value::object([("webComponentName", Value::from("fancy-button"))]),
        )
        .expect("create customized button");
    assert_eq!(element.local_name(), "button");
    assert_eq!(element.is_value().as_deref(), Some("fancy-button"));
}

#[test]
fn host_errors_propagate() {
    let (_document, factory) = factory();
    assert_eq!(
        factory.create("not a tag", ()).unwrap_err(),
        DomError::InvalidCharacter("not a tag".to_string())
    );
    assert_eq!(
        factory
            .create("div", ElementOptions::new().attribute("bad=name", "x"))
            .unwrap_err(),
        DomError::InvalidCharacter("bad=name".to_string())
    );
}

#[test]
fn ambient_document_is_the_default() {
    let factory = ElementFactory::new();
    let element = factory.create("div", ()).expect("create div");
    assert!(element
        .owner_document()
        .expect("owner")
        .ptr_eq(&Document::ambient()));
}

#[test]
fn custom_properties_keep_their_case() {
    let (_document, factory) = factory();
    let options = ElementOptions::new()
        .style("--accentColor", "red")
        .style("color", "blue");
    let element = factory.create("div", options.clone()).expect("create div");

    let style: BTreeMap<String, String> = element.style().into_iter().collect();
    assert_eq!(style, options.style);
    assert_eq!(element.style_property("--accentColor").as_deref(), Some("red"));
    assert_eq!(element.style_property("--accentcolor"), None);
}
