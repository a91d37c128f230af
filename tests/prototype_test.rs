use std::cell::Cell;
use std::rc::Rc;

use elemental::prototype::{EVENT_KEY, ORIGINAL_PROTOTYPE_KEY};
use elemental::{
    Document, ElementFactory, ElementOptions, Event, EventInit, EventTarget, Evented,
    PropertyAccess, Value,
};

fn factory() -> ElementFactory {
    ElementFactory::new().with_document(Document::new())
}

#[test]
fn original_prototype_is_the_host_element() {
    let document = Document::new();
    let element = ElementFactory::new()
        .with_document(document.clone())
        .create("div", ())
        .expect("create div");

    assert_eq!(element.original_prototype().tag_name(), "DIV");
    assert!(element
        .original_prototype()
        .owner_document()
        .expect("owner")
        .ptr_eq(&document));
    assert_eq!(
        element.property(ORIGINAL_PROTOTYPE_KEY),
        Value::from(element.original_prototype())
    );
}

#[test]
fn host_members_are_forwarded_unchanged() {
    let factory = factory();
    let element = factory
        .create(
            "section",
            ElementOptions::new()
                .attribute("id", "intro")
                .attribute("class", "lead wide")
                .style("color", "red")
                .content("hello"),
        )
        .expect("create section");
    let host = element.original_prototype();

    for key in host.enumerable_keys() {
        assert_eq!(element.property(&key), host.property(&key), "{key}");
    }
    assert_eq!(element.property("className"), Value::from("lead wide"));
    assert_eq!(element.property("textContent"), Value::from("hello"));
    assert_eq!(element.property("isConnected"), Value::Bool(false));
}

#[test]
fn event_key_is_reserved_per_element() {
    let factory = factory();
    let first = factory.create("div", ()).expect("create div");
    let second = factory.create("div", ()).expect("create div");

    let registry = first.property(EVENT_KEY);
    assert!(registry
        .as_registry()
        .expect("registry")
        .ptr_eq(first.event()));
    assert!(!first.event().ptr_eq(second.event()));
    assert!(!first.enumerable_keys().iter().any(|key| key == EVENT_KEY));
}

#[test]
fn bindings_are_isolated_between_elements() {
    let factory = factory();
    let first = factory.create("button", ()).expect("create button");
    let second = factory.create("button", ()).expect("create button");
    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);

    first
        .event()
        .set("click", Value::function(move |_| seen.set(seen.get() + 1)));

    second.dispatch_event(&Event::new("click", EventInit::default()));
    assert_eq!(hits.get(), 0);
    assert!(second.event().get("click").is_none());

    first.dispatch_event(&Event::new("click", EventInit::default()));
    assert_eq!(hits.get(), 1);
}

#[test]
fn handles_share_one_element_and_namespace() {
    let factory = factory();
    let element = factory.create("div", ()).expect("create div");
    let handle = element.clone();

    handle.set_attribute("title", "shared").expect("set title");
    assert_eq!(element.get_attribute("title").as_deref(), Some("shared"));
    assert!(handle.event().ptr_eq(element.event()));
    assert!(handle.target_element().ptr_eq(&element));
}

#[test]
fn bubbling_reaches_parent_bindings() {
    let factory = factory();
    let child = factory.create("button", ()).expect("create button");
    let parent = factory
        .create("form", ElementOptions::new().child(&child))
        .expect("create form");
    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);
    let expected_target = child.original_prototype().clone();

    parent.event().set(
        "press",
        Value::function(move |event: &Event| {
            assert!(event.target().expect("target").ptr_eq(&expected_target));
            seen.set(seen.get() + 1);
        }),
    );

    child.dispatch_event(&Event::new("press", EventInit::default().bubbling()));
    child.dispatch_event(&Event::new("press", EventInit::default()));
    assert_eq!(hits.get(), 1);
}

#[test]
fn bindings_outlive_the_handle_that_made_them() {
    let factory = factory();
    let hits = Rc::new(Cell::new(0));
    let parent = {
        let child = factory.create("button", ()).expect("create button");
        let seen = Rc::clone(&hits);
        child
            .event()
            .set("click", Value::function(move |_| seen.set(seen.get() + 1)));
        factory
            .create("div", ElementOptions::new().child(&child))
            .expect("create div")
    };

    let host = parent.children()[0].clone();
    let rewrapped = Evented::install(host.clone());
    assert!(rewrapped.event().get("click").is_some());
    assert!(rewrapped
        .event()
        .ptr_eq(Evented::install(host.clone()).event()));

    host.dispatch_event(&Event::new("click", EventInit::default()));
    assert_eq!(hits.get(), 1);

    assert!(rewrapped.event().delete("click"));
    host.dispatch_event(&Event::new("click", EventInit::default()));
    assert_eq!(hits.get(), 1);
    assert_eq!(host.listener_count("click"), 0);
}
