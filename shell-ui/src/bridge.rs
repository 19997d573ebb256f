//! Invoke/event bridge to the desktop host.
//!
//! Front-end code fires named commands at the backend with a serde argument
//! record and awaits the reply, and subscribes to backend-originated events.
//! Both go through the host globals injected into the webview
//! (`window.__TAURI__`). In a plain browser those globals are missing and every
//! call fails with [`BridgeError::Unavailable`].

use js_sys::{Function, Promise, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{RetrieveSolarDataArgs, COMMAND_RETRIEVE_SOLAR_DATA};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{js_error_text, BridgeError};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__"], js_name = invoke, catch)]
    fn host_invoke(command: &str, args: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "event"], js_name = listen, catch)]
    fn host_listen(event: &str, handler: &Function) -> Result<Promise, JsValue>;
}

/// Fire a backend command and decode its reply.
pub async fn invoke<A, R>(command: &str, args: &A) -> Result<R, BridgeError>
where
    A: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let reply = invoke_raw(command, args).await?;
    from_js(&reply)
}

/// Fire a backend command, ignoring whatever it replies with.
pub async fn invoke_unit<A>(command: &str, args: &A) -> Result<(), BridgeError>
where
    A: Serialize + ?Sized,
{
    invoke_raw(command, args).await.map(|_| ())
}

async fn invoke_raw<A>(command: &str, args: &A) -> Result<JsValue, BridgeError>
where
    A: Serialize + ?Sized,
{
    let args = to_js(args)?;
    log::debug!("invoking backend command {command}");

    let promise =
        host_invoke(command, &args).map_err(|e| BridgeError::Unavailable(js_error_text(&e)))?;

    JsFuture::from(promise)
        .await
        .map_err(|e| BridgeError::Rejected {
            command: command.to_string(),
            message: js_error_text(&e),
        })
}

/// Ask the backend for graph data. The request is an opaque JSON string.
pub async fn retrieve_solar_data(graph_state_request: String) -> Result<(), BridgeError> {
    invoke_unit(
        COMMAND_RETRIEVE_SOLAR_DATA,
        &RetrieveSolarDataArgs {
            graph_state_request,
        },
    )
    .await
}

/// Live listener registration on a backend event.
///
/// Dropping it unregisters the listener with the host.
pub struct Subscription {
    event: String,
    unlisten: Function,
    _handler: Closure<dyn FnMut(JsValue)>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Err(e) = self.unlisten.call0(&JsValue::NULL) {
            log::warn!(
                "failed to unlisten from {}: {}",
                self.event,
                js_error_text(&e)
            );
        }
    }
}

/// Register `handler` for a backend event. The handler receives the event
/// payload verbatim.
pub async fn subscribe<F>(event: &str, mut handler: F) -> Result<Subscription, BridgeError>
where
    F: FnMut(JsValue) + 'static,
{
    let callback = Closure::wrap(Box::new(move |host_event: JsValue| {
        let payload =
            Reflect::get(&host_event, &JsValue::from_str("payload")).unwrap_or(JsValue::UNDEFINED);
        handler(payload);
    }) as Box<dyn FnMut(JsValue)>);

    let promise = host_listen(event, callback.as_ref().unchecked_ref())
        .map_err(|e| BridgeError::Unavailable(js_error_text(&e)))?;

    let unlisten = JsFuture::from(promise)
        .await
        .map_err(|e| BridgeError::Rejected {
            command: format!("listen({event})"),
            message: js_error_text(&e),
        })?
        .dyn_into::<Function>()
        .map_err(|_| BridgeError::Decode(format!("listen({event}) returned no unlisten function")))?;

    log::debug!("subscribed to backend event {event}");

    Ok(Subscription {
        event: event.to_string(),
        unlisten,
        _handler: callback,
    })
}

/// Theme string reported by the host window (`"dark"` or `"light"`).
pub async fn app_window_theme() -> Result<String, BridgeError> {
    let window = web_sys::window()
        .ok_or_else(|| BridgeError::Unavailable("no global `window` exists".to_string()))?;
    let root: JsValue = window.into();
    let app_window = lookup_path(&root, &["__TAURI__", "window", "appWindow"])?;

    let theme = Reflect::get(&app_window, &JsValue::from_str("theme"))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or_else(|| BridgeError::Unavailable("appWindow.theme is not a function".to_string()))?;

    let pending = theme
        .call0(&app_window)
        .map_err(|e| BridgeError::Unavailable(js_error_text(&e)))?;

    let reported = JsFuture::from(Promise::resolve(&pending))
        .await
        .map_err(|e| BridgeError::Rejected {
            command: "appWindow.theme".to_string(),
            message: js_error_text(&e),
        })?;

    reported
        .as_string()
        .ok_or_else(|| BridgeError::Decode(format!("unexpected theme value: {reported:?}")))
}

fn lookup_path(root: &JsValue, path: &[&str]) -> Result<JsValue, BridgeError> {
    path.iter().try_fold(root.clone(), |current, key| {
        let next = Reflect::get(&current, &JsValue::from_str(key))
            .map_err(|e| BridgeError::Unavailable(js_error_text(&e)))?;
        if next.is_undefined() || next.is_null() {
            Err(BridgeError::Unavailable(format!(
                "window.{} is not defined",
                path.join(".")
            )))
        } else {
            Ok(next)
        }
    })
}

fn to_js<T>(value: &T) -> Result<JsValue, BridgeError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|e| BridgeError::Serialize(e.to_string()))?;
    js_sys::JSON::parse(&json).map_err(|e| BridgeError::Serialize(js_error_text(&e)))
}

fn from_js<R>(value: &JsValue) -> Result<R, BridgeError>
where
    R: DeserializeOwned,
{
    let json = if value.is_undefined() {
        "null".to_string()
    } else {
        js_sys::JSON::stringify(value)
            .map(String::from)
            .map_err(|e| BridgeError::Decode(js_error_text(&e)))?
    };
    serde_json::from_str(&json).map_err(|e| BridgeError::Decode(e.to_string()))
}
