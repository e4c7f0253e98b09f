//! Command classification and execution.
//!
//! A tokenized request first becomes a typed [`Command`] (classification and
//! arity checking), which the scheduler then runs against the selected
//! database via [`executor`]. Construction never fails loudly: unknown verbs
//! yield `None` and are dropped, malformed-but-known requests carry their
//! invalid flag into execution and answer `[""]`.

pub mod command;
pub mod executor;

pub use command::{
    CliCommand, CliVerb, Command, DbCommand, DbVerb, HashCommand, HashVerb, ListCommand, ListVerb,
    SetCommand, SetVerb, StrCommand, StrVerb, ZSetCommand, ZSetVerb,
};
pub use executor::execute;
