use shopcat_core::RepositoryError;
use shopcat_mapper::{ConversionError, PricingError};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("operation not allowed: {0}")]
    OperationNotAllowed(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{context}: {source}")]
    Conversion {
        context: String,
        #[source]
        source: ConversionError,
    },

    #[error("{context}: {source}")]
    Service {
        context: String,
        #[source]
        source: BoxError,
    },
}

pub type FacadeResult<T> = Result<T, FacadeError>;

impl FacadeError {
    pub(crate) fn service(
        context: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        FacadeError::Service {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Maps a storage failure: missing rows become [`FacadeError::NotFound`],
    /// uniqueness conflicts [`FacadeError::OperationNotAllowed`], anything
    /// else a service error carrying `context`.
    pub(crate) fn storage(context: impl Into<String>) -> impl FnOnce(RepositoryError) -> Self {
        let context = context.into();
        move |err| match err {
            RepositoryError::Missing { entity, id } => {
                FacadeError::NotFound(format!("{entity} [{id}]"))
            }
            RepositoryError::Conflict(message) => FacadeError::OperationNotAllowed(message),
            other @ RepositoryError::Backend(_) => FacadeError::service(context, other),
        }
    }

    /// Payload problems surface as validation errors; everything else the
    /// mapper reports is a conversion failure.
    pub(crate) fn conversion(context: impl Into<String>) -> impl FnOnce(ConversionError) -> Self {
        let context = context.into();
        move |err| match err {
            ConversionError::Validation(message) => FacadeError::Validation(message),
            ConversionError::InvalidDate { field, value } => {
                FacadeError::Validation(format!("invalid date for {field}: \"{value}\""))
            }
            source => FacadeError::Conversion { context, source },
        }
    }

    pub(crate) fn pricing(context: impl Into<String>) -> impl FnOnce(PricingError) -> Self {
        let context = context.into();
        move |err| FacadeError::service(context, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_become_not_found() {
        let err = FacadeError::storage("saving")(RepositoryError::Missing {
            entity: "product",
            id: 4,
        });
        assert!(matches!(err, FacadeError::NotFound(ref m) if m == "product [4]"));
    }

    #[test]
    fn conflicts_are_not_allowed() {
        let err = FacadeError::storage("saving")(RepositoryError::Conflict("dup".into()));
        assert!(matches!(err, FacadeError::OperationNotAllowed(_)));
    }

    #[test]
    fn backend_failures_keep_context() {
        let err = FacadeError::storage("Cannot update product")(RepositoryError::Backend(
            "connection reset".into(),
        ));
        assert_eq!(
            err.to_string(),
            "Cannot update product: storage backend error: connection reset"
        );
    }

    #[test]
    fn payload_errors_are_validation() {
        let err = FacadeError::conversion("converting")(ConversionError::InvalidDate {
            field: "date",
            value: "soon".into(),
        });
        assert!(matches!(err, FacadeError::Validation(_)));

        let err = FacadeError::conversion("converting")(ConversionError::UnknownWeightUnit(
            "ST".into(),
        ));
        assert!(matches!(err, FacadeError::Conversion { .. }));
    }
}
