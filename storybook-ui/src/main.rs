use dioxus::launch;
use dioxus::prelude::*;
use dioxus_logger::tracing::Level;

use storybook_ui::OutlineWizardView;

fn main() {
    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::default());
    dioxus_logger::init(Level::INFO).ok();

    launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        div {
            style: "min-height: 100vh; display: flex; align-items: center; justify-content: center; padding: 1rem; background: linear-gradient(135deg, #dbeafe, #ede9fe);",
            OutlineWizardView {}
        }
    }
}
