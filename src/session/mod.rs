pub mod exchange;
pub mod state;

pub use exchange::{respond, ExchangeEvent, ExchangeOutcome, ExchangePhase, StreamAssembler};
pub use state::{SessionState, TokenCount};
