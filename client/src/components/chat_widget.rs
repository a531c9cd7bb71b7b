//! Floating assistant chat widget.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the page's single [`ChatSession`] in an `RwSignal`. Opening the
//! window runs a health probe and then greets; submissions go through
//! [`submit`], which enforces the offline gate and the one-in-flight latch.

use leptos::prelude::*;

use super::markdown::render_markdown_html;
use crate::net::api::HttpRelay;
use crate::state::chat::{ChatSession, ThreadRole, probe, submit};
use crate::state::connectivity::{Connectivity, input_placeholder, status_label};

#[component]
pub fn ChatWidget() -> impl IntoView {
    let session = RwSignal::new(ChatSession::new());
    let open = RwSignal::new(false);
    let input = RwSignal::new(String::new());
    let transport = HttpRelay::default();

    let connectivity = move || session.with(|s| s.connectivity().state());
    let is_online = move || connectivity() == Connectivity::Online;
    let is_processing = move || session.with(ChatSession::is_processing);

    let on_toggle = {
        let transport = transport.clone();
        move |_| {
            let opening = !open.get_untracked();
            open.set(opening);
            if opening {
                let transport = transport.clone();
                spawn(async move {
                    probe(&session, &transport, now_ms()).await;
                    session.update(ChatSession::greet);
                });
            }
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = input.get_untracked();
        if text.trim().is_empty() || session.with_untracked(ChatSession::is_processing) {
            return;
        }
        // Offline submissions are answered with an advisory; keep the draft.
        if !session.with_untracked(|s| s.connectivity().is_offline()) {
            input.set(String::new());
        }
        let transport = transport.clone();
        spawn(async move {
            submit(&session, &transport, &text).await;
        });
    };

    let can_send = move || !input.get().trim().is_empty() && !is_processing() && connectivity() != Connectivity::Offline;

    view! {
        <div class="chat-widget">
            <button class="chat-widget__toggle" aria-label="Toggle chat" on:click=on_toggle>
                <span class="chat-widget__toggle-label">"Ask me"</span>
                <span class="chat-widget__dot" class:chat-widget__dot--online=is_online></span>
            </button>

            <div class="chat-widget__window" class:chat-widget__window--open=move || open.get()>
                <div class="chat-widget__header">
                    <span class="chat-widget__title">"AI Assistant"</span>
                    <span class="chat-widget__status" class:chat-widget__status--online=is_online>
                        {move || status_label(connectivity())}
                    </span>
                    <button class="chat-widget__close" aria-label="Close chat" on:click=move |_| open.set(false)>
                        "\u{00d7}"
                    </button>
                </div>

                {move || {
                    session
                        .with(|s| s.connectivity().notice().map(str::to_owned))
                        .map(|notice| view! { <div class="chat-widget__banner">{notice}</div> })
                }}

                <div class="chat-widget__messages">
                    {move || {
                        session
                            .with(|s| s.thread().to_vec())
                            .into_iter()
                            .map(|entry| {
                                let is_user = entry.role == ThreadRole::User;
                                let is_error = entry.role == ThreadRole::Error;
                                view! {
                                    <div
                                        class="chat-widget__message"
                                        class:chat-widget__message--user=is_user
                                        class:chat-widget__message--error=is_error
                                    >
                                        {if entry.role == ThreadRole::Assistant {
                                            let rendered = render_markdown_html(&entry.text);
                                            view! { <div class="chat-widget__markdown" inner_html=rendered></div> }
                                                .into_any()
                                        } else {
                                            view! { <span>{entry.text}</span> }.into_any()
                                        }}
                                    </div>
                                }
                            })
                            .collect::<Vec<_>>()
                            .into_any()
                    }}

                    {move || {
                        is_processing()
                            .then(|| {
                                view! {
                                    <div class="chat-widget__typing">
                                        <span></span>
                                        <span></span>
                                        <span></span>
                                    </div>
                                }
                            })
                    }}
                </div>

                <form class="chat-widget__form" on:submit=on_submit>
                    <input
                        class="chat-widget__input"
                        type="text"
                        placeholder=move || input_placeholder(connectivity())
                        prop:value=move || input.get()
                        on:input=move |ev| input.set(event_target_value(&ev))
                    />
                    <button type="submit" class="chat-widget__send" disabled=move || !can_send()>
                        "Send"
                    </button>
                </form>
            </div>
        </div>
    }
}

fn spawn(fut: impl Future<Output = ()> + 'static) {
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(fut);
    #[cfg(not(feature = "csr"))]
    drop(fut);
}

fn now_ms() -> f64 {
    #[cfg(feature = "csr")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(feature = "csr"))]
    {
        0.0
    }
}
