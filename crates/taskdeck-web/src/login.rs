//! Login view: exchanges credentials for a bearer token via the login proxy.

use dominator::{Dom, EventOptions, events};
use futures_signals::signal::{Mutable, SignalExt};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;

use taskdeck_api::LoginRequest;

use crate::api::{ApiClient, ApiError};
use crate::browser;
use crate::session::Session;

pub struct LoginPage {
    session: Rc<Session>,
    api: Rc<ApiClient>,
    email: Mutable<String>,
    password: Mutable<String>,
    busy: Mutable<bool>,
}

impl LoginPage {
    pub fn new(session: Rc<Session>) -> Rc<Self> {
        Rc::new(Self {
            api: ApiClient::new(session.clone()),
            session,
            email: Mutable::new(String::new()),
            password: Mutable::new(String::new()),
            busy: Mutable::new(false),
        })
    }

    async fn submit(self: Rc<Self>) {
        let email = self.email.get_cloned();
        let password = self.password.get_cloned();
        if email.trim().is_empty() || password.is_empty() {
            browser::alert("Email and password are required");
            return;
        }

        self.busy.set_neq(true);
        let result = self.api.login(&LoginRequest { email, password }).await;
        self.busy.set_neq(false);

        match result {
            Ok(response) => match response.data {
                Some(data) => {
                    self.session.store(&data.access_token);
                    crate::go_to_dashboard();
                }
                None => browser::alert(&response.message),
            },
            Err(ApiError::Backend(message)) => browser::alert(&message),
            Err(ApiError::Connection(_)) => browser::alert("Could not reach the server"),
            Err(err) => browser::alert(&format!("Login failed: {err}")),
        }
    }

    pub fn render(this: Rc<Self>) -> Dom {
        html!("section", {
            .class("login")
            .child(html!("h1", { .text("Task Management System") }))
            .child(html!("form", {
                .class("login-form")
                .event_with_options(&EventOptions::preventable(), clone!(this => move |event: events::Submit| {
                    event.prevent_default();
                    spawn_local(clone!(this => async move { this.submit().await }));
                }))
                .child(html!("label", {
                    .class("field")
                    .text("Email")
                    .child(html!("input" => HtmlInputElement, {
                        .attr("type", "email")
                        .attr("placeholder", "you@example.com")
                        .prop_signal("value", this.email.signal_cloned())
                        .with_node!(element => {
                            .event(clone!(this => move |_: events::Input| {
                                this.email.set_neq(element.value());
                            }))
                        })
                    }))
                }))
                .child(html!("label", {
                    .class("field")
                    .text("Password")
                    .child(html!("input" => HtmlInputElement, {
                        .attr("type", "password")
                        .prop_signal("value", this.password.signal_cloned())
                        .with_node!(element => {
                            .event(clone!(this => move |_: events::Input| {
                                this.password.set_neq(element.value());
                            }))
                        })
                    }))
                }))
                .child(html!("button", {
                    .attr("type", "submit")
                    .prop_signal("disabled", this.busy.signal())
                    .text_signal(this.busy.signal().map(|busy| {
                        if busy { "Signing in…" } else { "Sign in" }
                    }))
                }))
            }))
        })
    }
}
