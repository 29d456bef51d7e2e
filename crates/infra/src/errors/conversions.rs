//! Conversions from external infrastructure errors into domain errors.

use daytrace_common::storage::StorageError;
use daytrace_domain::DaytraceError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DaytraceError);

impl From<InfraError> for DaytraceError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DaytraceError> for InfraError {
    fn from(value: DaytraceError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDaytraceError {
    fn into_daytrace(self) -> DaytraceError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → DaytraceError */
/* -------------------------------------------------------------------------- */

impl IntoDaytraceError for SqlError {
    fn into_daytrace(self) -> DaytraceError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => DaytraceError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        DaytraceError::Database("database is locked".into())
                    }
                    ErrorCode::DiskFull => DaytraceError::Database("database disk is full".into()),
                    ErrorCode::ReadOnly => DaytraceError::Database("database is read-only".into()),
                    ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt => {
                        DaytraceError::Database(format!("database file is unusable: {message}"))
                    }
                    _ => DaytraceError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                DaytraceError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                DaytraceError::Database(format!("invalid column type for {name}: {ty}"))
            }
            RE::InvalidPath(path) => DaytraceError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => DaytraceError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_daytrace())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → DaytraceError */
/* -------------------------------------------------------------------------- */

impl IntoDaytraceError for StorageError {
    fn into_daytrace(self) -> DaytraceError {
        match self {
            StorageError::Rusqlite(err) => err.into_daytrace(),
            StorageError::InvalidConfig(msg) => DaytraceError::Config(msg),
            other => DaytraceError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_daytrace())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DaytraceError */
/* -------------------------------------------------------------------------- */

impl IntoDaytraceError for HttpError {
    fn into_daytrace(self) -> DaytraceError {
        if self.is_timeout() {
            return DaytraceError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return DaytraceError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return DaytraceError::Internal(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            return DaytraceError::Remote { status: status.as_u16(), body: String::new() };
        }

        if self.is_decode() {
            return DaytraceError::Internal(format!("failed to decode HTTP response: {self}"));
        }

        DaytraceError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_daytrace())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
