use synthetic_event::EventError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum DispatchError {
    #[error("event: {0}")]
    Event(#[from] EventError),

    #[error("propagation path is empty")]
    EmptyPath,

    #[error("dispatch config has no registration name: kind={kind}")]
    MissingRegistrationName { kind: String },
}

pub type DispatchResult<T> = Result<T, DispatchError>;
