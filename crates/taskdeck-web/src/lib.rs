//! Browser dashboard for taskdeck, compiled to WebAssembly.
//!
//! Two hash-fragment routes: the login view and the protected dashboard.
//! All data access goes through the gateway's same-origin proxy routes; the
//! credential token lives behind the [`session::Session`] provider.

#[macro_use]
extern crate dominator;

mod api;
mod browser;
mod dashboard;
mod login;
mod session;

use dominator::{Dom, routing};
use futures_signals::signal::{Signal, SignalExt};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

use crate::session::Session;

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Hash-fragment routes of the single-page app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Login,
    Dashboard,
}

impl Route {
    fn from_url(url: &str) -> Self {
        match url.split('#').nth(1) {
            Some("/login") => Route::Login,
            _ => Route::Dashboard,
        }
    }

    fn signal() -> impl Signal<Item = Route> {
        routing::url()
            .signal_ref(|url| Route::from_url(url))
            .dedupe()
    }
}

pub(crate) fn go_to_login() {
    routing::go_to_url("#/login");
}

pub(crate) fn go_to_dashboard() {
    routing::go_to_url("#/");
}

struct App {
    session: Rc<Session>,
}

impl App {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            session: Rc::new(Session::new()),
        })
    }

    fn render(app: Rc<Self>) -> Dom {
        html!("div", {
            .class("app")
            .child_signal(Route::signal().map(clone!(app => move |route| {
                Some(match route {
                    Route::Login => {
                        login::LoginPage::render(login::LoginPage::new(app.session.clone()))
                    }
                    Route::Dashboard => {
                        dashboard::Dashboard::render(dashboard::Dashboard::new(app.session.clone()))
                    }
                })
            })))
        })
    }
}

#[wasm_bindgen(start)]
pub fn main_js() {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();

    dominator::append_dom(&dominator::body(), App::render(App::new()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_without_a_login_hash_land_on_the_dashboard() {
        assert_eq!(Route::from_url("http://localhost:3000/"), Route::Dashboard);
        assert_eq!(Route::from_url("http://localhost:3000/#/"), Route::Dashboard);
        assert_eq!(
            Route::from_url("http://localhost:3000/#/login"),
            Route::Login
        );
    }
}
