use dioxus::prelude::*;
use shared_types::{OutlineView, OutlineWizard, WizardStep};

use crate::effects::{confirm_outline, regenerate_outline, submit_prompt};

const CARD_STYLE: &str = "background: white; padding: 2rem; border-radius: 0.75rem; box-shadow: 0 25px 50px -12px rgba(0,0,0,0.25); max-width: 42rem; width: 100%; text-align: center; color: #1f2937;";
const TEXTAREA_STYLE: &str = "width: 100%; padding: 1rem; border: 1px solid #d1d5db; border-radius: 0.5rem; margin-bottom: 1.5rem; font-size: 1.125rem; resize: vertical; box-sizing: border-box;";
const BUTTON_STYLE: &str = "flex: 1; width: 100%; color: white; font-weight: 600; padding: 0.75rem 1.5rem; border: none; border-radius: 0.5rem; font-size: 1.125rem; cursor: pointer;";

#[component]
pub fn OutlineWizardView() -> Element {
    let wizard = use_signal(OutlineWizard::new);
    let step = wizard.read().step();

    rsx! {
        div {
            class: "outline-wizard",
            style: CARD_STYLE,
            match step {
                WizardStep::PromptEntry => rsx! { PromptStep { wizard } },
                WizardStep::OutlineReview => rsx! { OutlineReviewStep { wizard } },
            }
        }
    }
}

#[component]
pub fn PromptStep(wizard: Signal<OutlineWizard>) -> Element {
    let mut wizard = wizard;
    let (prompt, can_submit, label, error) = {
        let state = wizard.read();
        (
            state.prompt().to_string(),
            state.can_submit(),
            state.submit_label(),
            state.error().map(str::to_string),
        )
    };

    rsx! {
        h1 {
            style: "font-size: 2.25rem; font-weight: 700; margin-bottom: 1.5rem;",
            "为你的孩子创作专属故事绘本"
        }
        p {
            style: "color: #4b5563; margin-bottom: 2rem; font-size: 1.125rem;",
            "输入一个故事主题或关键词，让AI帮你构思奇妙的冒险！"
        }
        textarea {
            class: "prompt-input",
            style: "{TEXTAREA_STYLE} min-height: 100px;",
            placeholder: "例如：一只勇敢的小猫的冒险故事",
            rows: "4",
            value: "{prompt}",
            oninput: move |e| wizard.write().set_prompt(e.value()),
        }
        button {
            class: "submit-btn",
            style: "{BUTTON_STYLE} background: #2563eb; font-size: 1.25rem;",
            disabled: !can_submit,
            onclick: move |_| submit_prompt(wizard),
            "{label}"
        }
        if let Some(message) = error {
            ErrorNotice { message, spacing: "margin-top: 1rem;" }
        }
    }
}

#[component]
pub fn OutlineReviewStep(wizard: Signal<OutlineWizard>) -> Element {
    let mut wizard = wizard;
    let (surface, can_submit, can_confirm, regenerate_label) = {
        let state = wizard.read();
        let surface = match state.outline_view() {
            OutlineView::Busy => Surface::Busy,
            OutlineView::Error(message) => Surface::Error(message.to_string()),
            OutlineView::Editor(text) => Surface::Editor(text.to_string()),
        };
        (
            surface,
            state.can_submit(),
            state.can_confirm(),
            state.regenerate_label(),
        )
    };

    rsx! {
        h1 {
            style: "font-size: 1.875rem; font-weight: 700; margin-bottom: 1.5rem;",
            "故事大纲"
        }

        match surface {
            Surface::Busy => rsx! {
                div {
                    class: "outline-busy",
                    style: "color: #2563eb; font-size: 1.125rem; margin-bottom: 1.5rem;",
                    p { "AI 正在生成大纲，请稍候..." }
                }
            },
            Surface::Error(message) => rsx! {
                ErrorNotice { message, spacing: "margin-bottom: 1rem;" }
            },
            Surface::Editor(text) => rsx! {
                textarea {
                    class: "outline-editor",
                    style: "{TEXTAREA_STYLE} min-height: 200px;",
                    rows: "10",
                    value: "{text}",
                    oninput: move |e| {
                        wizard.write().edit_outline(e.value());
                    },
                }
            },
        }

        div {
            style: "display: flex; gap: 1rem; justify-content: center;",
            button {
                class: "regenerate-btn",
                style: "{BUTTON_STYLE} background: #3b82f6;",
                disabled: !can_submit,
                onclick: move |_| regenerate_outline(wizard),
                "{regenerate_label}"
            }
            button {
                class: "confirm-btn",
                style: "{BUTTON_STYLE} background: #16a34a;",
                disabled: !can_confirm,
                onclick: move |_| confirm_outline(wizard),
                "确认大纲并继续"
            }
        }
    }
}

#[component]
fn ErrorNotice(message: String, spacing: &'static str) -> Element {
    rsx! {
        div {
            class: "outline-error",
            style: "color: #dc2626; font-size: 1.125rem; {spacing}",
            "{message}"
        }
    }
}

/// Owned copy of [`OutlineView`] so the signal is not borrowed while rendering
enum Surface {
    Busy,
    Error(String),
    Editor(String),
}
