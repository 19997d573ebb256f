//! Re-dispatch backend events as DOM custom events on the graph-state holder.

use shared_types::BackendEvent;
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit};

use crate::bridge::{self, Subscription};
use crate::dom::document;
use crate::error::BridgeError;

/// Dispatch a `CustomEvent` named `name` carrying `detail` on the element `target_id`.
/// Returns `false` if the target is not mounted.
pub fn dispatch_custom_event(target_id: &str, name: &str, detail: &JsValue) -> bool {
    let Some(target) = document().and_then(|d| d.get_element_by_id(target_id)) else {
        log::warn!("cannot forward {name}: element #{target_id} not found");
        return false;
    };

    let init = CustomEventInit::new();
    init.set_detail(detail);
    let event = match CustomEvent::new_with_event_init_dict(name, &init) {
        Ok(event) => event,
        Err(e) => {
            log::warn!("failed to create {name} event: {e:?}");
            return false;
        }
    };

    target.dispatch_event(&event).is_ok()
}

/// Keeps the backend event subscriptions alive. Drop to stop forwarding.
pub struct BackendEventForwarding {
    _subscriptions: Vec<Subscription>,
}

/// Forward every [`BackendEvent`] to the element `holder_id`, payload as `detail`.
pub async fn forward_backend_events(holder_id: &str) -> Result<BackendEventForwarding, BridgeError> {
    let mut subscriptions = Vec::with_capacity(BackendEvent::ALL.len());

    for event in BackendEvent::ALL {
        let holder_id = holder_id.to_string();
        let subscription = bridge::subscribe(event.as_str(), move |payload| {
            log::debug!("received {}", event.as_str());
            dispatch_custom_event(&holder_id, event.as_str(), &payload);
        })
        .await?;
        subscriptions.push(subscription);
    }

    Ok(BackendEventForwarding {
        _subscriptions: subscriptions,
    })
}
