//! Error taxonomy for the simulation core.
//!
//! Mirrors the severity classes of the error-handling design: configuration
//! errors are returned before the round loop starts, invariant violations
//! abort the whole simulation, out-of-bounds conditions are debug
//! assertions promoted to errors only in instrumented builds, transient I/O
//! is reported and the simulation continues.

macro_rules! define_errors {
    ($(($name:ident, $docstring:expr)),+) => {
        $(
            #[doc = $docstring]
            #[derive(Clone, Debug)]
            pub struct $name {
                pub message: String,
            }

            impl $name {
                pub fn new(message: impl Into<String>) -> Self {
                    $name { message: message.into() }
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    write!(f, "{}", self.message)
                }
            }

            impl std::error::Error for $name {}
        )+
    }
}

define_errors!(
    (ConfigError, "A scenario selected an incompatible geometry or an out-of-range parameter."),
    (InvariantError, "A core invariant was violated; the whole simulation must abort."),
    (BoundaryError, "An out-of-bounds sphere index or voxel coordinate was requested."),
    (IoError, "A transient I/O failure (file write, datastore) occurred; the run continues."),
    (CalcError, "A geometry or force computation could not be carried out."),
    (RequestError, "An async shadow-agent or dictionary request could not be served.")
);

/// Union of every fallible outcome the simulation core can produce, used at
/// the CLI boundary where a single exit code decides success or failure.
#[derive(Debug)]
pub enum EmbryoGenError {
    Config(ConfigError),
    Invariant(InvariantError),
    Boundary(BoundaryError),
    Io(IoError),
    Calc(CalcError),
    Request(RequestError),
}

impl std::fmt::Display for EmbryoGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            EmbryoGenError::Config(e) => write!(f, "{e}"),
            EmbryoGenError::Invariant(e) => write!(f, "{e}"),
            EmbryoGenError::Boundary(e) => write!(f, "{e}"),
            EmbryoGenError::Io(e) => write!(f, "{e}"),
            EmbryoGenError::Calc(e) => write!(f, "{e}"),
            EmbryoGenError::Request(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EmbryoGenError {}

macro_rules! impl_from {
    ($variant:ident, $errty:ident) => {
        impl From<$errty> for EmbryoGenError {
            fn from(e: $errty) -> Self {
                EmbryoGenError::$variant(e)
            }
        }
    };
}

impl_from!(Config, ConfigError);
impl_from!(Invariant, InvariantError);
impl_from!(Boundary, BoundaryError);
impl_from!(Io, IoError);
impl_from!(Calc, CalcError);
impl_from!(Request, RequestError);

/// Formats an invariant violation the way the user-visible failure contract
/// requires: `function(): message`.
pub fn invariant_violation(function: &str, message: impl std::fmt::Display) -> InvariantError {
    InvariantError::new(format!("{function}(): {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_violation_formats_with_function_prefix() {
        let e = invariant_violation("publish_geometry", "version did not advance");
        assert_eq!(e.message, "publish_geometry(): version did not advance");
    }
}
