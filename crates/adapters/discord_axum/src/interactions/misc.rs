//! `/help` and `/faq`.

use crate::model::{InteractionData, InteractionResponse};
use crate::render;

pub(super) fn help(data: &InteractionData) -> InteractionResponse {
    let ephemeral = data.bool_option("ephemeral").unwrap_or(true);
    InteractionResponse::message(render::help(ephemeral))
}

pub(super) fn faq(data: &InteractionData) -> InteractionResponse {
    let ephemeral = data.bool_option("ephemeral").unwrap_or(true);
    InteractionResponse::message(render::faq(ephemeral))
}

pub(super) fn faq_answer(question: u8) -> InteractionResponse {
    InteractionResponse::message(render::faq_answer(question))
}
