use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unknown backend command: {0}")]
    UnknownCommand(String),
    #[error("backend command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },
    #[error(transparent)]
    Codec(#[from] serde_json::Error),
}

/// Opaque contract for the native backend: invoke a named remote operation,
/// await a typed result. All business logic (pattern learning, scoring,
/// trigger detection, plugin execution) lives behind this seam; the layout
/// core has no dependency on it.
pub trait Backend {
    fn invoke(
        &self,
        command: &str,
        args: Value,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send;
}

/// Serializes `args`, invokes `command`, and deserializes the result into `T`.
pub async fn invoke_typed<B, A, T>(backend: &B, command: &str, args: &A) -> Result<T, BackendError>
where
    B: Backend,
    A: Serialize,
    T: DeserializeOwned,
{
    let args = serde_json::to_value(args)?;
    let result = backend.invoke(command, args).await?;
    Ok(serde_json::from_value(result)?)
}
