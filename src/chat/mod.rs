mod message;
mod sse;
mod stream;
mod traits;
mod usage;

pub use message::{ChatMessage, ChatRole};
pub use stream::{StreamChoice, StreamDelta, StreamResponse};
pub use traits::{
    ChatCompletion, CompletionChoice, CompletionMessage, CompletionProvider, CompletionRequest,
    CompletionStream,
};
pub use usage::Usage;

pub(crate) use sse::create_sse_stream;
