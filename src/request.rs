use crate::form::FormParameters;

/// An inbound request as seen by the extractor.
///
/// Hosts build one of these per request from their framework's request type
/// and pass it explicitly. The request ID is only used to correlate log
/// events.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Unique identifier for this request
    pub request_id: String,
    /// Form parameters submitted with the request
    pub form: FormParameters,
}

impl RequestContext {
    /// Creates a request with an empty form.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            form: FormParameters::new(),
        }
    }

    /// Replaces the form of this request.
    pub fn with_form(mut self, form: FormParameters) -> Self {
        self.form = form;
        self
    }

    /// Sets a single form field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(key, value);
        self
    }
}
