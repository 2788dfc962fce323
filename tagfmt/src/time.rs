use time::format_description::well_known::Rfc2822;

use crate::{Error, RuntimeError, Value};

pub use time::OffsetDateTime;

/// Formatted as rfc2822.
impl TryFrom<OffsetDateTime> for Value {
    type Error = Error;

    fn try_from(value: OffsetDateTime) -> Result<Self, Self::Error> {
        match value.format(&Rfc2822) {
            Ok(ok) => Ok(Value::from(ok)),
            Err(err) => Err(RuntimeError::Custom(err.to_string()).into()),
        }
    }
}
