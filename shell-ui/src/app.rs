use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{FileList, HtmlInputElement};

use crate::canvas::{CanvasBinding, CanvasRegistry, SharedCanvasRegistry};
use crate::config::{shell_config, ShellConfig};
use crate::dom::{document, remove_classes, toggle_classes};
use crate::events::{forward_backend_events, BackendEventForwarding};
use crate::files::ingest_files;
use crate::theme::{set_detected_theme, set_theme, ThemeKind};

const FILE_INPUT_ID: &str = "file-select";

#[component]
pub fn App() -> Element {
    let config = shell_config();
    use_context_provider(|| {
        SharedCanvasRegistry::new(CanvasRegistry::new(config.redraw_interval_ms))
    });

    // Forwarding stops when this is dropped, so it lives as long as the app.
    let _forwarding = use_hook(|| start_host_tasks(config));

    let holder_id = config.graph_state_holder_id.clone();

    rsx! {
        div {
            id: "{holder_id}",
            class: "main-layout",
            Sidebar {}
            div {
                class: "main-content",
                LiveCanvas {
                    canvas_id: "graph".to_string(),
                    container_id: "graph-container".to_string(),
                }
            }
        }
    }
}

/// Backend event forwarding, filled in once the host accepts the listeners.
pub type ForwardingSlot = Rc<RefCell<Option<BackendEventForwarding>>>;

/// Start backend event forwarding and theme detection. Neither waits for the other.
pub fn start_host_tasks(config: &'static ShellConfig) -> ForwardingSlot {
    let slot = ForwardingSlot::default();

    let filled = slot.clone();
    wasm_bindgen_futures::spawn_local(async move {
        match forward_backend_events(&config.graph_state_holder_id).await {
            Ok(active) => *filled.borrow_mut() = Some(active),
            Err(e) => log::warn!("backend events are not forwarded: {e}"),
        }
    });

    wasm_bindgen_futures::spawn_local(async move {
        set_detected_theme(&config.theme_toggle_selector, config.default_theme).await;
    });

    slot
}

/// Canvas kept at its container's size, with its lifecycle held in the shared registry.
#[component]
pub fn LiveCanvas(canvas_id: String, container_id: String) -> Element {
    let registry = use_context::<SharedCanvasRegistry>();
    let binding = use_hook(|| Rc::new(RefCell::new(CanvasBinding::new(registry))));

    // Re-runs when either prop changes; binding a new id releases the old one.
    {
        let binding = binding.clone();
        let canvas_id = canvas_id.clone();
        let container_id = container_id.clone();
        use_effect(use_reactive!(|(canvas_id, container_id)| {
            binding.borrow_mut().bind(&canvas_id, &container_id);
        }));
    }

    use_drop(move || binding.borrow_mut().release());

    rsx! {
        div {
            id: "{container_id}",
            class: "canvas-container",
            canvas { id: "{canvas_id}" }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        div {
            class: "sidebar",
            button {
                class: "button settings-button",
                onclick: move |_| open_menu("settings-button", "settings-menu"),
                "Settings"
            }
            button {
                class: "button file-upload-button",
                onclick: move |_| open_menu("file-upload-button", "file-upload-menu"),
                "Upload"
            }
        }
        div {
            class: "sidemenu settings-menu",
            ThemeSwitch {}
        }
        div {
            class: "sidemenu file-upload-menu",
            FileSelect {}
        }
    }
}

/// Show one side menu and its button highlight, hiding the others.
fn open_menu(button_class: &str, menu_class: &str) {
    remove_classes(&format!(".sidebar .button:not(.{button_class})"), "menu-visible");
    toggle_classes(&format!(".sidebar .{button_class}"), "menu-visible");

    remove_classes(&format!(".sidemenu:not(.{menu_class})"), "visible");
    toggle_classes(&format!(".sidemenu.{menu_class}"), "visible");
}

#[component]
fn ThemeSwitch() -> Element {
    rsx! {
        label {
            class: "theme-switch",
            input {
                r#type: "checkbox",
                onchange: move |evt: FormEvent| {
                    // Checked is dark mode
                    let theme = if evt.checked() { ThemeKind::Dark } else { ThemeKind::Light };
                    set_theme(theme, &shell_config().theme_toggle_selector);
                },
            }
            span { class: "slider" }
        }
    }
}

#[component]
fn FileSelect() -> Element {
    let mut notices = use_signal(Vec::<String>::new);

    rsx! {
        form {
            label { r#for: FILE_INPUT_ID, "Select files:" }
            input {
                r#type: "file",
                id: FILE_INPUT_ID,
                accept: ".csv,text/csv",
                multiple: true,
                onchange: move |_| {
                    let Some(files) = selected_files(FILE_INPUT_ID) else {
                        return;
                    };
                    spawn(async move {
                        let report = ingest_files(&files).await;
                        let mut lines: Vec<String> = report.summary().into_iter().collect();
                        lines.extend(report.failed.iter().map(|e| e.to_string()));
                        notices.set(lines);
                    });
                },
            }
        }
        for notice in notices.read().iter() {
            p { class: "notification", "{notice}" }
        }
    }
}

fn selected_files(input_id: &str) -> Option<FileList> {
    document()?
        .get_element_by_id(input_id)?
        .dyn_into::<HtmlInputElement>()
        .ok()?
        .files()
}
