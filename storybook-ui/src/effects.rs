use dioxus::prelude::*;
use shared_types::wizard::CONFIRMED_MESSAGE;
use shared_types::{OutlineSource, OutlineWizard, RequestTicket};

use crate::api::HttpOutlineSource;
use crate::interop::notify;

/// Run the request behind `ticket` and fold its result back into the wizard.
///
/// `None` means the wizard refused to start a request; nothing is sent.
pub fn dispatch_outline_request(
    mut wizard: Signal<OutlineWizard>,
    ticket: Option<RequestTicket>,
) {
    let Some(ticket) = ticket else {
        return;
    };
    let prompt = wizard.read().prompt().to_string();

    spawn(async move {
        let result = HttpOutlineSource.fetch_outline(&prompt).await;
        if let Err(e) = &result {
            dioxus_logger::tracing::error!("Outline request failed: {}", e);
        }

        if !wizard.write().complete_request(ticket, result) {
            dioxus_logger::tracing::debug!("Discarded stale outline response {}", ticket.id());
        }
    });
}

pub fn submit_prompt(mut wizard: Signal<OutlineWizard>) {
    let ticket = wizard.write().submit_prompt();
    dispatch_outline_request(wizard, ticket);
}

pub fn regenerate_outline(mut wizard: Signal<OutlineWizard>) {
    let ticket = wizard.write().regenerate();
    dispatch_outline_request(wizard, ticket);
}

pub fn confirm_outline(wizard: Signal<OutlineWizard>) {
    let confirmed = wizard
        .read()
        .confirm_outline()
        .map(|outline| outline.chars().count());

    if let Some(chars) = confirmed {
        dioxus_logger::tracing::info!("Outline confirmed ({} chars)", chars);
        notify(CONFIRMED_MESSAGE);
    }
}
