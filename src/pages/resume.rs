//! Guarded resume route.
//!
//! The editor itself is a separate collaborator; this page only anchors the
//! `/resume/:id` route so the guard and post-login return have a target.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

#[component]
pub fn ResumePage() -> impl IntoView {
    let params = use_params_map();
    let resume_id = move || params.with(|p| p.get("id").unwrap_or_default());

    view! {
        <div class="resume-page" data-resume-id=resume_id>
            <h2>"Resume " {resume_id}</h2>
        </div>
    }
}
