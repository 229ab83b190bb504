#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    message: String,

    #[serde(serialize_with = "ser_iso8601")]
    datetime: time::OffsetDateTime,

    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            datetime: time::OffsetDateTime::now_utc(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl ToString) -> Self {
        self.help = Some(help.to_string());
        self
    }
}

fn ser_iso8601<S: serde::Serializer>(
    datetime: &time::OffsetDateTime,
    s: S,
) -> Result<S::Ok, S::Error> {
    let formatted = datetime
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .map_err(serde::ser::Error::custom)?;
    s.serialize_str(&formatted)
}
