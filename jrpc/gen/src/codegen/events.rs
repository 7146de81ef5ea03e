//! Event publish/subscribe binding generation.

use proc_macro2::TokenStream;
use quote::quote;

use super::ident;
use crate::plan::{EventPlan, MessagePlan};

/// Generates the publish method and subscriber wrapper for an event message.
///
/// Publishing validates first, so an invalid event never reaches the
/// transport. The subscriber wrapper decodes the payload and hands the typed
/// event to the user closure; a payload that fails to decode is discarded
/// without invoking it.
///
/// ## Examples
///
/// For `SetSceneEvent` published as `set-scene`:
///
/// ```ignore
/// impl SetSceneEvent {
///     pub const EVENT_NAME: &'static str = "set-scene";
///     pub fn publish(&self, publisher: &dyn rt::firehose::Publisher) -> Result<(), rt::Error>;
/// }
///
/// pub struct SetSceneEventHandler { ... }
///
/// impl rt::firehose::EventHandler for SetSceneEventHandler { ... }
/// ```
pub fn generate_event(message: &MessagePlan, event: &EventPlan) -> TokenStream {
    let name = ident(&message.ident);
    let handler = ident(&event.handler_ident);
    let event_name = &event.name;
    let handler_doc = format!(" Subscriber for `{}` events.", event_name);

    quote! {
        impl #name {
            /// Name this event is published and subscribed under.
            pub const EVENT_NAME: &'static str = #event_name;

            /// Validates the event and hands it to `publisher`.
            ///
            /// Invalid events are rejected before the transport is touched.
            /// Transport errors are returned unchanged.
            pub fn publish(&self, publisher: &dyn rt::firehose::Publisher) -> Result<(), rt::Error> {
                rt::Validate::validate(self)?;
                rt::firehose::publish(publisher, Self::EVENT_NAME, self)
            }
        }

        #[doc = #handler_doc]
        pub struct #handler {
            handler: Box<dyn Fn(#name) -> rt::firehose::EventResult + Send + Sync>,
        }

        impl #handler {
            /// Wraps a typed event handler.
            pub fn new<F>(handler: F) -> Self
            where
                F: Fn(#name) -> rt::firehose::EventResult + Send + Sync + 'static,
            {
                Self {
                    handler: Box::new(handler),
                }
            }
        }

        impl rt::firehose::EventHandler for #handler {
            fn event_name(&self) -> &str {
                #name::EVENT_NAME
            }

            fn handle_event(&self, event: &rt::firehose::Event) -> rt::firehose::EventResult {
                match event.decode::<#name>() {
                    Ok(payload) => (self.handler)(payload),
                    Err(err) => {
                        let err = err.with_message("failed to unmarshal payload");
                        rt::tracing::warn!(event = #name::EVENT_NAME, error = %err, "Discarding event");
                        rt::firehose::EventResult::Discard(err)
                    }
                }
            }
        }
    }
}
