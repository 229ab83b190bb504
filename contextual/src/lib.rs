use std::fmt::{Debug, Display};

/// An error annotated with what the caller was doing when it happened.
#[derive(Debug)]
pub struct Error<E> {
    pub context: String,
    pub source: E,
}

pub trait Context<T, E> {
    fn context(self, context: impl ToString) -> Result<T, Error<E>>;
    fn context_with(self, context: impl FnOnce() -> String) -> Result<T, Error<E>>;
}

impl<T, E> Context<T, E> for Result<T, E> {
    fn context(self, context: impl ToString) -> Result<T, Error<E>> {
        self.map_err(|source| Error {
            context: context.to_string(),
            source,
        })
    }

    fn context_with(self, context: impl FnOnce() -> String) -> Result<T, Error<E>> {
        self.map_err(|source| Error {
            context: context(),
            source,
        })
    }
}

impl<E> std::error::Error for Error<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl<E> Display for Error<E>
where
    E: std::error::Error + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.context)?;
        let mut source = <Self as std::error::Error>::source(self);
        while let Some(err) = source {
            write!(f, " :: {err}")?;
            source = err.source();
        }
        Ok(())
    }
}
