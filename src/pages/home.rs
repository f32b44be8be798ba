//! Signed-in landing page.

use leptos::prelude::*;

use crate::state::session::Session;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<Session>>();
    let greeting = move || {
        session.with(|s| {
            s.user()
                .map(|u| format!("Welcome back, {}", u.name))
                .unwrap_or_default()
        })
    };
    let plan = move || {
        session.with(|s| {
            s.user()
                .and_then(|u| u.plan_type.clone())
                .unwrap_or_else(|| "free".to_owned())
        })
    };

    view! {
        <div class="home-page">
            <h1>{greeting}</h1>
            <p class="home-page__plan">"Current plan: " {plan}</p>
        </div>
    }
}
