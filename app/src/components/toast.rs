use dioxus::prelude::*;
use crate::{Toast, ToastKind, ToastQueue, TOAST_TIMEOUT_MS};

#[component]
pub fn ToastViewport() -> Element {
    let toasts = use_context::<Signal<ToastQueue>>();

    rsx! {
        div { class: "fixed bottom-4 right-4 z-50 flex flex-col space-y-2 w-80",
            for toast in toasts.read().toasts.iter().cloned() {
                ToastItem { key: "{toast.id}", toast }
            }
        }
    }
}

#[component]
fn ToastItem(toast: Toast) -> Element {
    let mut toasts = use_context::<Signal<ToastQueue>>();
    let id = toast.id;

    // The timer lives as long as the toast is on screen.
    use_future(move || async move {
        gloo_timers::future::TimeoutFuture::new(TOAST_TIMEOUT_MS).await;
        toasts.write().dismiss(id);
    });

    let class = match toast.kind {
        ToastKind::Info => "elevated-border text-high",
        ToastKind::Success => "bg-green-500/10 border-green-500/30 text-green-400",
        ToastKind::Error => "bg-red-500/10 border-red-500/30 text-red-400",
    };

    rsx! {
        div { class: "elevated border rounded-lg p-3 shadow-lg {class}",
            div { class: "flex justify-between items-start",
                div {
                    p { class: "font-semibold", "{toast.title}" }
                    p { class: "text-sm text-mid", "{toast.description}" }
                }
                button {
                    class: "text-low hover:text-high ml-3",
                    onclick: move |_| toasts.write().dismiss(id),
                    "×"
                }
            }
        }
    }
}
