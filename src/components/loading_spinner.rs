//! Neutral loading placeholder.

use leptos::prelude::*;

/// Spinner with an optional caption. Renders no navigation side effects.
#[component]
pub fn LoadingSpinner(#[prop(default = 40)] size: u32, #[prop(optional, into)] label: Option<String>) -> impl IntoView {
    let label = label.unwrap_or_else(|| "Loading...".to_owned());
    view! {
        <div class="loading-container" role="status" aria-live="polite">
            <svg
                class="loading-spinner"
                width=size
                height=size
                viewBox="0 0 24 24"
                xmlns="http://www.w3.org/2000/svg"
            >
                <circle
                    cx="12"
                    cy="12"
                    r="8"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-dasharray="32"
                    stroke-linecap="round"
                ></circle>
            </svg>
            <p>{label}</p>
        </div>
    }
}
