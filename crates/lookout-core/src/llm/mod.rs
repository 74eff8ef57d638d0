//! Answer providers over remote language models.
//!
//! Provides a provider abstraction over interchangeable backends
//! (OpenAI-compatible chat completions, Gemini generateContent) and the
//! shared prompt rendering and transport seam they use.

pub(crate) mod gemini;
pub(crate) mod openai;
pub mod prompt;
pub(crate) mod provider;
pub(crate) mod retry;
pub(crate) mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use gemini::{GeminiBackend, GenerateBackend, GenerateRequest, GenerativeProvider};
pub use openai::ChatCompletionProvider;
pub use provider::{AnswerProvider, ProviderFactory};
pub use transport::{HttpTransport, Transport, TransportResponse};
