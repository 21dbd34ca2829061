pub mod mistral_api_agent;
pub mod prompts;
pub mod sse;
pub mod stream_accumulator;
pub mod transport;

pub use mistral_api_agent::MistralApiAgent;
pub use stream_accumulator::{StreamAccumulator, StreamUpdate};
pub use transport::{ChatTransport, DeltaStream};
