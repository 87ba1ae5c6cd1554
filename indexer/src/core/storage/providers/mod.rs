mod account;
mod app_state;
mod block;
mod cycle;
mod operation;
mod protocol;
mod quote;
mod rights;
mod voting;

pub use account::AccountProvider;
pub use app_state::AppStateProvider;
pub use block::BlockProvider;
pub use cycle::CycleProvider;
pub use operation::OperationProvider;
pub use protocol::ProtocolProvider;
pub use quote::QuoteProvider;
pub use rights::RightsProvider;
pub use voting::VotingProvider;
