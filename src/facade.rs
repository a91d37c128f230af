//! Tag-name sugar over [`ElementFactory`]: `tags.div(..)` is
//! `factory.create("div", ..)`, and `tags.tag(name)` does the same for any
//! tag without listing it up front.

use std::collections::BTreeMap;
use std::ops::Deref;

use crate::dom::{Document, DomError, HtmlElement};
use crate::factory::{Content, Element, ElementFactory};
use crate::value::Value;

/// Members resolved to the factory itself by [`Tags::member`].
pub const FACTORY_MEMBERS: &[&str] = &["create", "createWith", "build", "document", "config"];

#[derive(Debug, Clone, Default)]
pub struct Tags {
    factory: ElementFactory,
}

/// A constructor with its tag name bound.
#[derive(Debug, Clone)]
pub struct TagConstructor<'a> {
    factory: &'a ElementFactory,
    tag_name: String,
}

pub enum Member<'a> {
    Factory(&'a ElementFactory),
    Tag(TagConstructor<'a>),
}

impl Tags {
    pub fn new(factory: ElementFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &ElementFactory {
        &self.factory
    }

    pub fn tag(&self, tag_name: impl Into<String>) -> TagConstructor<'_> {
        TagConstructor {
            factory: &self.factory,
            tag_name: tag_name.into(),
        }
    }

    /// Real factory members for their own names, a bound constructor for
    /// every other name.
    pub fn member(&self, name: &str) -> Member<'_> {
        if FACTORY_MEMBERS.contains(&name) {
            Member::Factory(&self.factory)
        } else {
            Member::Tag(self.tag(name))
        }
    }
}

impl Deref for Tags {
    type Target = ElementFactory;

    fn deref(&self) -> &Self::Target {
        &self.factory
    }
}

impl TagConstructor<'_> {
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn call(&self, content: impl Into<Content>) -> Result<Element, DomError> {
        self.factory.create(&self.tag_name, content)
    }

    pub fn call_with(
        &self,
        content_or_options: impl Into<Value>,
        style: Option<BTreeMap<String, String>>,
        attributes: Option<BTreeMap<String, String>>,
        web_component_name: Option<&str>,
        use_document: Option<&Document>,
        children: &[HtmlElement],
    ) -> Result<Element, DomError> {
        self.factory.create_with(
            &self.tag_name,
            content_or_options,
            style,
            attributes,
            web_component_name,
            use_document,
            children,
        )
    }
}

macro_rules! tag_methods {
    ($($tag:ident),* $(,)?) => {
        impl Tags {
            $(
                pub fn $tag(&self, content: impl Into<Content>) -> Result<Element, DomError> {
                    self.factory.create(stringify!($tag), content)
                }
            )*
        }
    };
}

tag_methods!(
    a, article, aside, button, canvas, code, div, em, footer, form, h1, h2, h3, h4, header, i,
    img, input, label, li, main, nav, ol, option, p, pre, section, select, small, span, strong,
    table, tbody, td, textarea, th, thead, tr, ul,
);
