/// Request validation
///
/// Input checks applied to every request before it is planned, so oversized
/// or malformed requests are rejected without touching a registered
/// collection.
use jsonquery_core::error::{Error, Result};
use jsonquery_core::QueryRequest;

/// Maximum length of a source name
pub const MAX_SOURCE_NAME_LENGTH: usize = 256;

/// Validates a source name
///
/// # Security
///
/// - Prevents empty names
/// - Prevents oversized names
/// - Prevents control characters (log injection)
///
/// # Errors
///
/// Returns Error::Validation if validation fails
#[inline]
pub fn validate_source_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("From is required".to_string()));
    }

    if name.len() > MAX_SOURCE_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "Source name length {} exceeds maximum {}",
            name.len(),
            MAX_SOURCE_NAME_LENGTH
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(Error::Validation(format!(
            "Source name '{}' contains control characters",
            sanitize_for_logging(name, 64)
        )));
    }

    Ok(())
}

/// Validates the size of a selector path
///
/// Whether each segment names a field is decided later by the resolver;
/// this only bounds the work the resolver will do.
///
/// # Errors
///
/// Returns Error::Validation if validation fails
#[inline]
pub fn validate_selector(selector: &str, limits: &ResourceLimits) -> Result<()> {
    if selector.len() > limits.max_selector_length {
        return Err(Error::Validation(format!(
            "Selector '{}' length {} exceeds maximum {}",
            sanitize_for_logging(selector, 64),
            selector.len(),
            limits.max_selector_length
        )));
    }

    let depth = selector.split('.').count();
    if depth > limits.max_selector_depth {
        return Err(Error::Validation(format!(
            "Selector '{}' depth {} exceeds maximum {}",
            sanitize_for_logging(selector, 64),
            depth,
            limits.max_selector_depth
        )));
    }

    Ok(())
}

fn check_count(what: &str, count: usize, max: usize) -> Result<()> {
    if count > max {
        return Err(Error::Validation(format!(
            "{} has {} entries, maximum is {}",
            what, count, max
        )));
    }
    Ok(())
}

/// Validates a request against `limits`
///
/// # Security
///
/// Prevents:
/// - Resource exhaustion through huge select, where or orderBy lists
/// - Oversized `IN` sets
/// - Deep or long selector paths
///
/// # Errors
///
/// Returns Error::Validation if validation fails
pub fn validate_request(request: &QueryRequest, limits: &ResourceLimits) -> Result<()> {
    validate_source_name(&request.from)?;

    check_count("Select", request.select.len(), limits.max_select)?;
    check_count("Where", request.where_clauses.len(), limits.max_where)?;
    check_count("OrderBy", request.order_by.len(), limits.max_order_by)?;

    for item in &request.select {
        validate_selector(&item.selector, limits)?;
    }

    for clause in &request.where_clauses {
        validate_selector(&clause.selector, limits)?;
        if let Some(ref value) = clause.value {
            // An unquoted value is a second selector
            if !value.starts_with('\'') {
                validate_selector(value, limits)?;
            }
        }
        if let Some(ref set) = clause.value_set {
            check_count("ValueSet", set.len(), limits.max_in_values)?;
        }
    }

    for key in &request.order_by {
        validate_selector(&key.selector, limits)?;
    }

    Ok(())
}

/// Sanitizes request text for safe logging
///
/// Replaces control characters and truncates long strings.
pub fn sanitize_for_logging(input: &str, max_len: usize) -> String {
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_control())
        .take(max_len)
        .collect();

    if input.chars().count() > max_len {
        format!("{}... (truncated)", sanitized)
    } else {
        sanitized
    }
}

/// Bounds on the size of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum number of projected columns
    pub max_select: usize,
    /// Maximum number of filter clauses
    pub max_where: usize,
    /// Maximum number of sort keys
    pub max_order_by: usize,
    /// Maximum number of entries in one `IN` set
    pub max_in_values: usize,
    /// Maximum number of segments in a selector
    pub max_selector_depth: usize,
    /// Maximum selector length in bytes
    pub max_selector_length: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_select: 256,
            max_where: 64,
            max_order_by: 16,
            max_in_values: 10_000,
            max_selector_depth: 16,
            max_selector_length: 1024,
        }
    }
}

impl ResourceLimits {
    /// Limits that never reject a request
    pub fn unlimited() -> Self {
        Self {
            max_select: usize::MAX,
            max_where: usize::MAX,
            max_order_by: usize::MAX,
            max_in_values: usize::MAX,
            max_selector_depth: usize::MAX,
            max_selector_length: usize::MAX,
        }
    }

    /// Validates that the limits themselves are usable
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("max_select", self.max_select),
            ("max_where", self.max_where),
            ("max_order_by", self.max_order_by),
            ("max_in_values", self.max_in_values),
            ("max_selector_depth", self.max_selector_depth),
            ("max_selector_length", self.max_selector_length),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(Error::Validation(format!("{} cannot be zero", name)));
            }
        }
        Ok(())
    }
}
