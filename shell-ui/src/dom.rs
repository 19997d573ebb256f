//! Selector-based DOM helpers: class-list manipulation and geometry lookups.
//!
//! A selector that matches nothing is not an error; lookups return `None` and
//! mutations do nothing.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOp {
    Add,
    Remove,
    Toggle,
}

pub(crate) fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Split a whitespace-separated class list, dropping empty entries.
pub fn split_class_list(classes: &str) -> Vec<&str> {
    classes.split_whitespace().collect()
}

/// All elements matching `selector`. An invalid selector is logged and matches nothing.
pub fn query_all(selector: &str) -> Vec<Element> {
    let Some(document) = document() else {
        return Vec::new();
    };

    match document.query_selector_all(selector) {
        Ok(nodes) => (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect(),
        Err(e) => {
            log::warn!("invalid selector {selector:?}: {e:?}");
            Vec::new()
        }
    }
}

fn query_one(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

/// Apply `op` for every class in `classes` on every element matching `selector`.
pub fn apply_classes(selector: &str, classes: &str, op: ClassOp) {
    let class_names = split_class_list(classes);
    if class_names.is_empty() {
        return;
    }

    for element in query_all(selector) {
        let list = element.class_list();
        for class_name in &class_names {
            let result = match op {
                ClassOp::Add => list.add_1(class_name),
                ClassOp::Remove => list.remove_1(class_name),
                ClassOp::Toggle => list.toggle(class_name).map(|_| ()),
            };
            if let Err(e) = result {
                log::warn!("failed to {op:?} class {class_name:?} on {selector:?}: {e:?}");
            }
        }
    }
}

pub fn add_classes(selector: &str, classes: &str) {
    apply_classes(selector, classes, ClassOp::Add);
}

pub fn remove_classes(selector: &str, classes: &str) {
    apply_classes(selector, classes, ClassOp::Remove);
}

pub fn toggle_classes(selector: &str, classes: &str) {
    apply_classes(selector, classes, ClassOp::Toggle);
}

/// Computed value of a CSS property (custom properties included) on the first
/// element matching `selector`. `None` if the element is missing or the value is empty.
pub fn get_style(selector: &str, property: &str) -> Option<String> {
    let element = query_one(selector)?;
    let styles = web_sys::window()?.get_computed_style(&element).ok()??;
    let value = styles.get_property_value(property).ok()?;
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub fn element_offset_height(selector: &str) -> Option<i32> {
    query_one(selector)?
        .dyn_into::<HtmlElement>()
        .ok()
        .map(|element| element.offset_height())
}

pub fn element_offset_width(selector: &str) -> Option<i32> {
    query_one(selector)?
        .dyn_into::<HtmlElement>()
        .ok()
        .map(|element| element.offset_width())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_list_drops_empty_entries() {
        assert_eq!(
            split_class_list("  visible menu-visible\tactive \n"),
            vec!["visible", "menu-visible", "active"]
        );
        assert!(split_class_list("   ").is_empty());
        assert!(split_class_list("").is_empty());
    }
}
