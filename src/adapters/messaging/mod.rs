//! Messaging adapters.
//!
//! Implementations of the MessageDispatcher port.

mod mock_dispatcher;

pub use mock_dispatcher::MockMessageDispatcher;
