//! The protected dashboard view: task form, filter panel, results table, and
//! pagination, plus the fetch/mutation controllers behind them.
//!
//! Filter edits are debounced and every listing request carries a generation
//! number; a response that resolves after a newer request has been issued is
//! discarded instead of clobbering newer state.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use dominator::{Dom, EventOptions, events};
use futures_signals::map_ref;
use futures_signals::signal::{Mutable, Signal, SignalExt};
use futures_signals::signal_vec::{MutableVec, SignalVecExt};
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use taskdeck_api::{
    CreateTaskRequest, PageInfo, Task, TaskFilterRequest, TaskListResponse, TaskStatus,
    UpdateTaskRequest,
};

use crate::api::{ApiClient, ApiError};
use crate::browser;
use crate::session::Session;

pub const PAGE_SIZE: u64 = 5;

/// Filter edits inside this window collapse into a single fetch.
const FILTER_DEBOUNCE_MS: u32 = 400;

/// Deadline applied when the form's deadline field is left empty.
const DEFAULT_DEADLINE: &str = "2025-12-31T23:59:59Z";

pub struct Dashboard {
    session: Rc<Session>,
    api: Rc<ApiClient>,

    tasks: MutableVec<Task>,
    total: Mutable<u64>,
    page: Mutable<u64>,
    loading: Mutable<bool>,

    // form state
    edit_id: Mutable<Option<u64>>,
    title: Mutable<String>,
    description: Mutable<String>,
    status: Mutable<TaskStatus>,
    deadline: Mutable<String>,

    // filter state
    filter_status: Mutable<Option<TaskStatus>>,
    start_date: Mutable<String>,
    end_date: Mutable<String>,

    // Only the newest pending debounce survives its timeout, and only the
    // newest issued request may apply its response to the view state.
    debounce_epoch: Cell<u64>,
    fetch_epoch: Cell<u64>,
}

impl Dashboard {
    pub fn new(session: Rc<Session>) -> Rc<Self> {
        Rc::new(Self {
            api: ApiClient::new(session.clone()),
            session,
            tasks: MutableVec::new(),
            total: Mutable::new(0),
            page: Mutable::new(1),
            loading: Mutable::new(false),
            edit_id: Mutable::new(None),
            title: Mutable::new(String::new()),
            description: Mutable::new(String::new()),
            status: Mutable::new(TaskStatus::Todo),
            deadline: Mutable::new(String::new()),
            filter_status: Mutable::new(None),
            start_date: Mutable::new(String::new()),
            end_date: Mutable::new(String::new()),
            debounce_epoch: Cell::new(0),
            fetch_epoch: Cell::new(0),
        })
    }

    fn filter_request(&self) -> TaskFilterRequest {
        TaskFilterRequest::new(
            self.filter_status.get(),
            parse_date(&self.start_date.get_cloned()),
            parse_date(&self.end_date.get_cloned()),
            Utc::now().date_naive(),
        )
    }

    async fn fetch_tasks(self: Rc<Self>) {
        if self.session.token().is_none() {
            crate::go_to_login();
            return;
        }

        let epoch = self.fetch_epoch.get() + 1;
        self.fetch_epoch.set(epoch);
        self.loading.set_neq(true);

        let result = self.api.tasks_by_filter(&self.filter_request()).await;

        // A newer request owns the view state now.
        if self.fetch_epoch.get() != epoch {
            return;
        }

        match result {
            Ok(body) => self.apply_listing(body),
            Err(err) => {
                match &err {
                    ApiError::Connection(_) => {
                        browser::alert("Could not connect to the server. Is the gateway running?");
                    }
                    _ => browser::alert("Failed to load tasks"),
                }
                self.clear_listing();
            }
        }

        self.loading.set_neq(false);
    }

    fn apply_listing(&self, body: Value) {
        if !body.get("data").is_some_and(Value::is_array) {
            browser::warn("Unexpected listing response shape; treating as empty");
            self.clear_listing();
            return;
        }

        match serde_json::from_value::<TaskListResponse>(body) {
            Ok(listing) => {
                self.total.set_neq(listing.total);
                self.tasks.lock_mut().replace_cloned(listing.data);
            }
            Err(err) => {
                browser::warn(&format!("Listing response failed to decode: {err}"));
                self.clear_listing();
            }
        }
    }

    fn clear_listing(&self) {
        self.tasks.lock_mut().clear();
        self.total.set_neq(0);
    }

    /// Debounced reaction to a filter edit. Always resets to page 1.
    fn schedule_filter_fetch(self: &Rc<Self>) {
        let epoch = self.debounce_epoch.get() + 1;
        self.debounce_epoch.set(epoch);

        let this = self.clone();
        spawn_local(async move {
            TimeoutFuture::new(FILTER_DEBOUNCE_MS).await;
            if this.debounce_epoch.get() != epoch {
                return;
            }
            this.page.set_neq(1);
            this.clone().fetch_tasks().await;
        });
    }

    fn go_to_page(self: &Rc<Self>, page: u64) {
        self.page.set_neq(page.max(1));
        let this = self.clone();
        spawn_local(async move { this.fetch_tasks().await });
    }

    async fn submit(self: Rc<Self>) {
        if self.session.token().is_none() {
            crate::go_to_login();
            return;
        }

        let title = self.title.get_cloned();
        let description = self.description.get_cloned();
        if title.trim().is_empty() || description.trim().is_empty() {
            browser::alert("Title and description are required");
            return;
        }

        let result = if let Some(id) = self.edit_id.get() {
            let request = UpdateTaskRequest {
                title: Some(title),
                description: Some(description),
                status: Some(self.status.get()),
                deadline: None,
            };
            self.api.update_task(id, &request).await.map(|_| "Task updated")
        } else {
            let Some(claims) = self.session.claims() else {
                browser::alert("Could not read the account from the stored session");
                return;
            };
            let request = CreateTaskRequest {
                title,
                description,
                status: self.status.get(),
                deadline: form_deadline(&self.deadline.get_cloned()),
                account_id: claims.user_id,
            };
            self.api.create_task(&request).await.map(|_| "Task added")
        };

        match result {
            Ok(message) => {
                browser::alert(message);
                self.reset_form();
                self.clone().fetch_tasks().await;
            }
            Err(ApiError::Backend(message)) => browser::alert(&message),
            Err(_) => browser::alert("Operation failed"),
        }
    }

    async fn delete(self: Rc<Self>, id: u64) {
        if !browser::confirm("Delete this task permanently?") {
            return;
        }

        if self.session.token().is_none() {
            crate::go_to_login();
            return;
        }

        match self.api.delete_task(id).await {
            Ok(()) => {
                browser::alert("Task deleted");
                self.clone().fetch_tasks().await;
            }
            Err(ApiError::Backend(message)) => browser::alert(&message),
            Err(_) => browser::alert("Could not delete the task"),
        }
    }

    fn start_edit(&self, task: &Task) {
        self.title.set(task.title.clone());
        self.description.set(task.description.clone());
        self.status.set(task.status);
        self.edit_id.set(Some(task.id));
        browser::scroll_to_top();
    }

    fn reset_form(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.status.set(TaskStatus::Todo);
        self.deadline.set(String::new());
        self.edit_id.set(None);
    }

    fn reset_filter(self: &Rc<Self>) {
        self.filter_status.set(None);
        self.start_date.set(String::new());
        self.end_date.set(String::new());
        self.schedule_filter_fetch();
    }

    fn logout(&self) {
        self.session.clear();
        crate::go_to_login();
    }

    fn page_info_signal(&self) -> impl Signal<Item = PageInfo> + use<> {
        map_ref! {
            let page = self.page.signal(),
            let total = self.total.signal() =>
            PageInfo::new(*page, *total, PAGE_SIZE)
        }
    }

    fn filters_active_signal(&self) -> impl Signal<Item = bool> + use<> {
        map_ref! {
            let status = self.filter_status.signal(),
            let start = self.start_date.signal_cloned(),
            let end = self.end_date.signal_cloned() =>
            status.is_some() || !start.is_empty() || !end.is_empty()
        }
    }

    pub fn render(this: Rc<Self>) -> Dom {
        // Auth gate: without a stored credential this view renders nothing
        // and hands over to the login route.
        if this.session.token().is_none() {
            spawn_local(async { crate::go_to_login() });
            return html!("section", { .class("auth-gate") });
        }

        html!("main", {
            .class("dashboard")
            .future(clone!(this => async move {
                this.fetch_tasks().await;
            }))
            .children(&mut [
                Self::render_header(this.clone()),
                Self::render_form(this.clone()),
                Self::render_filters(this.clone()),
                Self::render_table(this.clone()),
            ])
        })
    }

    fn render_header(this: Rc<Self>) -> Dom {
        html!("header", {
            .class("dashboard-header")
            .child(html!("div", {
                .child(html!("h1", { .text("Task Dashboard") }))
                .child(html!("p", {
                    .class("subtitle")
                    .text("Manage your tasks in one place")
                }))
            }))
            .child(html!("button", {
                .attr("type", "button")
                .class("logout")
                .text("Logout")
                .event(clone!(this => move |_: events::Click| {
                    this.logout();
                }))
            }))
        })
    }

    fn render_form(this: Rc<Self>) -> Dom {
        html!("section", {
            .class("task-form")
            .child(html!("header", {
                .class("form-header")
                .child(html!("h2", {
                    .text_signal(this.edit_id.signal().map(|edit| {
                        if edit.is_some() { "Edit Task" } else { "Add Task" }
                    }))
                }))
                .child_signal(this.edit_id.signal().map(clone!(this => move |edit| {
                    edit.map(|_| html!("button", {
                        .attr("type", "button")
                        .class("cancel-edit")
                        .text("✕ Cancel")
                        .event(clone!(this => move |_: events::Click| {
                            this.reset_form();
                        }))
                    }))
                })))
            }))
            .child(html!("form", {
                .event_with_options(&EventOptions::preventable(), clone!(this => move |event: events::Submit| {
                    event.prevent_default();
                    spawn_local(clone!(this => async move { this.submit().await }));
                }))
                .child(html!("label", {
                    .class("field")
                    .text("Title *")
                    .child(html!("input" => HtmlInputElement, {
                        .attr("placeholder", "What needs doing?")
                        .prop_signal("value", this.title.signal_cloned())
                        .with_node!(element => {
                            .event(clone!(this => move |_: events::Input| {
                                this.title.set_neq(element.value());
                            }))
                        })
                    }))
                }))
                .child(html!("div", {
                    .class("field-row")
                    .child(html!("label", {
                        .class("field")
                        .text("Status")
                        .child(html!("select" => HtmlSelectElement, {
                            .children(TaskStatus::ALL.iter().map(|status| {
                                html!("option", {
                                    .attr("value", status.as_str())
                                    .text(status_label(*status))
                                })
                            }))
                            .prop_signal("value", this.status.signal().map(|status| status.as_str()))
                            .with_node!(element => {
                                .event(clone!(this => move |_: events::Change| {
                                    if let Ok(status) = element.value().parse() {
                                        this.status.set_neq(status);
                                    }
                                }))
                            })
                        }))
                    }))
                    .child(html!("label", {
                        .class("field")
                        .text("Deadline")
                        .child(html!("input" => HtmlInputElement, {
                            .attr("type", "datetime-local")
                            .prop_signal("value", this.deadline.signal_cloned())
                            .with_node!(element => {
                                .event(clone!(this => move |_: events::Input| {
                                    this.deadline.set_neq(element.value());
                                }))
                            })
                        }))
                    }))
                }))
                .child(html!("label", {
                    .class("field")
                    .text("Description *")
                    .child(html!("textarea" => HtmlTextAreaElement, {
                        .attr("rows", "4")
                        .attr("placeholder", "Describe the task…")
                        .prop_signal("value", this.description.signal_cloned())
                        .with_node!(element => {
                            .event(clone!(this => move |_: events::Input| {
                                this.description.set_neq(element.value());
                            }))
                        })
                    }))
                }))
                .child(html!("button", {
                    .attr("type", "submit")
                    .class("submit")
                    .prop_signal("disabled", this.loading.signal())
                    .text_signal(this.edit_id.signal().map(|edit| {
                        if edit.is_some() { "Update Task" } else { "Add Task" }
                    }))
                }))
            }))
        })
    }

    fn render_filters(this: Rc<Self>) -> Dom {
        html!("section", {
            .class("filter-panel")
            .child(html!("header", {
                .class("filter-header")
                .child(html!("h2", { .text("Filter Tasks") }))
                .child(html!("button", {
                    .attr("type", "button")
                    .class("reset-filter")
                    .text("Reset Filter")
                    .event(clone!(this => move |_: events::Click| {
                        this.reset_filter();
                    }))
                }))
            }))
            .child(html!("div", {
                .class("field-row")
                .child(html!("label", {
                    .class("field")
                    .text("Status")
                    .child(html!("select" => HtmlSelectElement, {
                        .child(html!("option", {
                            .attr("value", "")
                            .text("All statuses")
                        }))
                        .children(TaskStatus::ALL.iter().map(|status| {
                            html!("option", {
                                .attr("value", status.as_str())
                                .text(status_label(*status))
                            })
                        }))
                        .prop_signal("value", this.filter_status.signal().map(|status| {
                            status.map(|status| status.as_str()).unwrap_or("")
                        }))
                        .with_node!(element => {
                            .event(clone!(this => move |_: events::Change| {
                                this.filter_status.set_neq(element.value().parse().ok());
                                this.schedule_filter_fetch();
                            }))
                        })
                    }))
                }))
                .child(Self::render_date_filter(this.clone(), "Start date", |this| &this.start_date))
                .child(Self::render_date_filter(this.clone(), "End date", |this| &this.end_date))
            }))
        })
    }

    fn render_date_filter(
        this: Rc<Self>,
        label: &str,
        field: fn(&Self) -> &Mutable<String>,
    ) -> Dom {
        html!("label", {
            .class("field")
            .text(label)
            .child(html!("input" => HtmlInputElement, {
                .attr("type", "date")
                .prop_signal("value", field(&this).signal_cloned())
                .with_node!(element => {
                    .event(clone!(this => move |_: events::Input| {
                        field(&this).set_neq(element.value());
                        this.schedule_filter_fetch();
                    }))
                })
            }))
        })
    }

    fn render_table(this: Rc<Self>) -> Dom {
        html!("section", {
            .class("task-table")
            .child_signal(this.loading.signal().map(clone!(this => move |loading| {
                Some(if loading {
                    html!("p", { .class("loading") .text("Loading tasks…") })
                } else {
                    Self::render_results(this.clone())
                })
            })))
        })
    }

    fn render_results(this: Rc<Self>) -> Dom {
        html!("div", {
            .child(html!("table", {
                .child(html!("thead", {
                    .child(html!("tr", {
                        .children(["Task", "Status", "Deadline", "Actions"].map(|heading| {
                            html!("th", { .text(heading) })
                        }))
                    }))
                }))
                .child(html!("tbody", {
                    .children_signal_vec(this.tasks.signal_vec_cloned().map(clone!(this => move |task| {
                        Self::render_row(this.clone(), task)
                    })))
                }))
            }))
            .child_signal(Self::empty_state(this.clone()))
            .child_signal(Self::pagination(this.clone()))
        })
    }

    fn render_row(this: Rc<Self>, task: Task) -> Dom {
        html!("tr", {
            .child(html!("td", {
                .child(html!("p", { .class("task-title") .text(&task.title) }))
                .child(html!("p", { .class("task-description") .text(&task.description) }))
            }))
            .child(html!("td", {
                .child(html!("span", {
                    .class(["badge", status_badge_class(task.status)])
                    .text(status_label(task.status))
                }))
            }))
            .child(html!("td", {
                .child(html!("p", {
                    .text(&task.deadline.format("%b %e, %Y").to_string())
                }))
                .child(html!("p", {
                    .class("deadline-time")
                    .text(&task.deadline.format("%H:%M").to_string())
                }))
            }))
            .child(html!("td", {
                .class("actions")
                .child(html!("button", {
                    .attr("type", "button")
                    .class("edit")
                    .text("Edit")
                    .event(clone!(this, task => move |_: events::Click| {
                        this.start_edit(&task);
                    }))
                }))
                .child(html!("button", {
                    .attr("type", "button")
                    .class("delete")
                    .text("Delete")
                    .event(clone!(this => move |_: events::Click| {
                        let this = this.clone();
                        let id = task.id;
                        spawn_local(async move { this.delete(id).await });
                    }))
                }))
            }))
        })
    }

    fn empty_state(this: Rc<Self>) -> impl Signal<Item = Option<Dom>> {
        map_ref! {
            let count = this.tasks.signal_vec_cloned().len(),
            let filtered = this.filters_active_signal() =>
            if *count == 0 {
                let filtered = *filtered;
                Some(html!("div", {
                    .class("empty-state")
                    .child(html!("p", {
                        .class("empty-title")
                        .text(if filtered {
                            "No tasks match the current filter"
                        } else {
                            "No tasks yet"
                        })
                    }))
                    .apply_if(!filtered, |dom| dom.child(html!("p", {
                        .class("empty-hint")
                        .text("Start by adding a task above")
                    })))
                }))
            } else {
                None
            }
        }
    }

    fn pagination(this: Rc<Self>) -> impl Signal<Item = Option<Dom>> {
        let shown = this.tasks.signal_vec_cloned().len();
        map_ref! {
            let shown = shown,
            let info = this.page_info_signal() =>
            if *shown == 0 {
                None
            } else {
                Some(Self::render_pagination(this.clone(), *shown, *info))
            }
        }
    }

    fn render_pagination(this: Rc<Self>, shown: usize, info: PageInfo) -> Dom {
        html!("footer", {
            .class("pagination")
            .child(html!("p", {
                .text(&format!("Showing {shown} of {} tasks", info.total))
            }))
            .child(html!("div", {
                .class("page-controls")
                .child(html!("button", {
                    .attr("type", "button")
                    .text("← Previous")
                    .prop("disabled", !info.has_prev())
                    .event(clone!(this => move |_: events::Click| {
                        let page = this.page.get();
                        if page > 1 {
                            this.go_to_page(page - 1);
                        }
                    }))
                }))
                .child(html!("span", {
                    .text(&format!("Page {} of {}", info.page, info.total_pages()))
                }))
                .child(html!("button", {
                    .attr("type", "button")
                    .text("Next →")
                    .prop("disabled", !info.has_next())
                    .event(clone!(this => move |_: events::Click| {
                        let info = PageInfo::new(this.page.get(), this.total.get(), PAGE_SIZE);
                        if info.has_next() {
                            this.go_to_page(info.page + 1);
                        }
                    }))
                }))
            }))
        })
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse the `datetime-local` form value, falling back to the fixed
/// far-future default when the field is empty or malformed.
fn form_deadline(value: &str) -> DateTime<Utc> {
    let fallback = || DEFAULT_DEADLINE.parse::<DateTime<Utc>>().unwrap();
    if value.is_empty() {
        return fallback();
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(|_| fallback())
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "To Do",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::Done => "Done",
    }
}

fn status_badge_class(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "badge-todo",
        TaskStatus::InProgress => "badge-in-progress",
        TaskStatus::Done => "badge-done",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_deadline_falls_back_to_the_far_future_default() {
        assert_eq!(
            form_deadline("").to_rfc3339(),
            "2025-12-31T23:59:59+00:00"
        );
        assert_eq!(
            form_deadline("garbage").to_rfc3339(),
            "2025-12-31T23:59:59+00:00"
        );
    }

    #[test]
    fn datetime_local_values_parse_as_utc() {
        assert_eq!(
            form_deadline("2025-06-30T17:30").to_rfc3339(),
            "2025-06-30T17:30:00+00:00"
        );
    }

    #[test]
    fn filter_dates_parse_only_full_iso_days() {
        assert_eq!(
            parse_date("2025-06-30"),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("30/06/2025"), None);
    }
}
