use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
    NodeList,
};

use crate::error::{InteractionError, Result};

pub fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or(InteractionError::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(InteractionError::NoDocument)
}

fn collect_html(list: NodeList) -> Vec<HtmlElement> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// All HTML elements matching `selector`; an invalid selector matches nothing.
pub fn query_all(document: &Document, selector: &str) -> Vec<HtmlElement> {
    document
        .query_selector_all(selector)
        .map(collect_html)
        .unwrap_or_default()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<HtmlElement> {
    root.query_selector_all(selector)
        .map(collect_html)
        .unwrap_or_default()
}

pub fn query_one(document: &Document, selector: &str) -> Option<HtmlElement> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

pub fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) {
    for (property, value) in styles {
        set_style(element, property, value);
    }
}

pub fn create_html(document: &Document, tag: &str) -> Result<HtmlElement> {
    let element = document.create_element(tag)?;
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| InteractionError::Dom(format!("<{}> is not an HTMLElement", tag)))
}

/// A short-lived decoration that only needs restyling and eventual removal.
pub trait TransientNode {
    fn set_style(&self, property: &str, value: &str);
    /// Removes the node. Must be a no-op if it is already gone.
    fn detach(&self);
}

impl TransientNode for HtmlElement {
    fn set_style(&self, property: &str, value: &str) {
        set_style(self, property, value);
    }

    fn detach(&self) {
        if self.parent_node().is_some() {
            self.remove();
        }
    }
}

/// The three native controls a form field can be.
#[derive(Clone)]
pub enum FormField {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
    Select(HtmlSelectElement),
}

impl FormField {
    pub fn from_element(element: Element) -> Option<Self> {
        let element = match element.dyn_into::<HtmlInputElement>() {
            Ok(input) => return Some(FormField::Input(input)),
            Err(element) => element,
        };
        let element = match element.dyn_into::<HtmlTextAreaElement>() {
            Ok(area) => return Some(FormField::TextArea(area)),
            Err(element) => element,
        };
        element.dyn_into::<HtmlSelectElement>().ok().map(FormField::Select)
    }

    pub fn element(&self) -> &HtmlElement {
        match self {
            FormField::Input(el) => el.as_ref(),
            FormField::TextArea(el) => el.as_ref(),
            FormField::Select(el) => el.as_ref(),
        }
    }

    pub fn value(&self) -> String {
        match self {
            FormField::Input(el) => el.value(),
            FormField::TextArea(el) => el.value(),
            FormField::Select(el) => el.value(),
        }
    }

    pub fn check_validity(&self) -> bool {
        match self {
            FormField::Input(el) => el.check_validity(),
            FormField::TextArea(el) => el.check_validity(),
            FormField::Select(el) => el.check_validity(),
        }
    }
}
