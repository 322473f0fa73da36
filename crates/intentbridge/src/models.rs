//! These models represent the objects passed through the webhook
//!
//! There are two wire formats we need to interact with:
//! - dialogflow fulfillment requests/responses, exchanged with the calling platform
//! - openai chat completion requests, sent from the webhook to the LLM
//!
//! Both are request scoped. Nothing here is cached or shared between calls.
pub mod fulfillment;
pub mod message;
