use dioxus::prelude::*;
use crate::route::Route;
use crate::components::{ToastViewport, WalletButton};
use crate::Services;

#[component]
pub fn Layout() -> Element {
    let contract = use_context::<Services>().config.contract_address;

    rsx! {
        div { class: "min-h-screen flex flex-col",
            style: "background-color: var(--surface-base);",
            // Navigation
            nav { class: "border-b elevated-border backdrop-blur sticky top-0 z-50",
                style: "background-color: var(--surface-base);",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8",
                    div { class: "flex justify-between h-16",
                        div { class: "flex items-center space-x-8",
                            Link { to: Route::Home {}, class: "flex items-center space-x-2",
                                span { class: "text-2xl font-bold text-gold", "CryptoLotto" }
                            }

                            div { class: "hidden sm:flex sm:items-center sm:space-x-4",
                                NavLink { to: Route::Home {}, label: "Browse Lotteries" }
                                NavLink { to: Route::MyLotteries {}, label: "My Lotteries" }
                            }
                        }

                        div { class: "flex items-center",
                            WalletButton {}
                        }
                    }
                }
            }

            main { class: "flex-1 w-full max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8",
                Outlet::<Route> {}
            }

            footer { class: "border-t elevated-border py-8 mt-auto",
                div { class: "max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 text-center text-low",
                    p { "CryptoLotto - Decentralized lotteries" }
                    p { class: "text-sm mt-2",
                        "Contract: "
                        code { class: "text-gold", "{contract}" }
                    }
                }
            }

            ToastViewport {}
        }
    }
}

#[component]
fn NavLink(to: Route, label: &'static str) -> Element {
    rsx! {
        Link {
            to: to,
            class: "text-mid hover:text-gold px-3 py-2 text-sm font-medium transition-colors",
            active_class: "text-gold",
            "{label}"
        }
    }
}
